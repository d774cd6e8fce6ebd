/*
MIT License

Copyright (c) 2026 Raja Lehtihet and Wael El Oraiby

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! `nom` parser for the equation DSL.
//!
//! The grammar supports:
//! - `var name = literal;` unknown-variable declarations
//! - `lvar name = literal;` locked-variable declarations
//! - `expr = expr;` terminal equations
//! - `eq name(p1,p2,...){ ... }` equation definitions
//! - `name(arg, param:expr, ...);` definition invocations
//! - `//` line comments
//!
//! Numeric literals carry an optional `:` separated imaginary part, an
//! optional SI prefix from the configured [`PrefixTable`], and an optional
//! bracketed unit. Trivia is consumed after every token, never before; only
//! the `system` entry skips leading trivia. All alternatives backtrack from
//! the same saved input, and the reported parse error is the failure that
//! reached furthest into the input (ties keep the first found).

mod expr;
mod statements;
mod utils;

use crate::ast::{SourceSpan, Span, System};
use crate::diagnostics::CompileError;
use crate::prefix::PrefixTable;
use nom::IResult;
use nom::error::{ContextError, ErrorKind, ParseError};

use self::statements::{TopItem, top_item};
use self::utils::trivia0;

type PResult<'a, O> = IResult<Span<'a>, O, SyntaxError>;

/// Parses full DSL source into a spanned equation system.
pub fn parse_system(source: &str, prefixes: &PrefixTable) -> Result<System, CompileError> {
    let mut input = match trivia0(Span::new(source)) {
        Ok((input, ())) => input,
        Err(err) => return Err(syntax_error_to_compile_error(err, source)),
    };

    let mut system = System {
        vars: Vec::new(),
        defs: Vec::new(),
        equations: Vec::new(),
    };

    // Statements are pulled in a manual loop instead of `many0` so a failure
    // deep inside one statement keeps its furthest-error position instead of
    // being swallowed as "unparsed trailing input".
    while !input.fragment().is_empty() {
        let (next, item) = match top_item(prefixes, input) {
            Ok(v) => v,
            Err(err) => return Err(syntax_error_to_compile_error(err, source)),
        };
        match item {
            TopItem::Var(decl) => system.vars.push(decl),
            TopItem::Def(def) => system.defs.push(def),
            TopItem::Equation(eq) => system.equations.push(eq),
        }
        input = next;
    }

    Ok(system)
}

/// What the failing rule was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expected {
    /// A specific character token.
    Char(char),
    /// A labeled construct (`context` name).
    Label(&'static str),
    /// An unlabeled token class; reported generically.
    Token,
}

/// Furthest-failure parse error.
///
/// `or` keeps whichever failure reached the greater byte offset, so an
/// `alt` chain reports the most locally relevant alternative rather than the
/// last one tried. Ties keep the earlier alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SyntaxError {
    /// Byte offset of the failure.
    offset: usize,
    /// 1-based line of the failure.
    line: usize,
    /// 1-based UTF-8 column of the failure.
    column: usize,
    /// Byte offset of the start of the failing line.
    line_start: usize,
    /// Most relevant expectation at the failure position.
    expected: Expected,
}

impl SyntaxError {
    /// Records a failure at the given input position.
    fn at(input: Span<'_>, expected: Expected) -> Self {
        let offset = input.location_offset();
        Self {
            offset,
            line: input.location_line() as usize,
            column: input.get_utf8_column(),
            line_start: offset - (input.get_column() - 1),
            expected,
        }
    }

    /// Returns the failure position as a zero-length span.
    fn span(&self) -> SourceSpan {
        SourceSpan {
            start: self.offset,
            end: self.offset,
            line: self.line,
            column: self.column,
            line_start: self.line_start,
        }
    }

    /// Renders the diagnostic message for this failure.
    fn message(&self) -> String {
        match self.expected {
            Expected::Char(c) => format!("Syntax error: expected '{}'", c),
            Expected::Label(label) => format!("Syntax error: expected {}", label),
            Expected::Token => "Syntax error: unexpected input".to_string(),
        }
    }
}

impl<'a> ParseError<Span<'a>> for SyntaxError {
    fn from_error_kind(input: Span<'a>, _kind: ErrorKind) -> Self {
        Self::at(input, Expected::Token)
    }

    fn append(_input: Span<'a>, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: Span<'a>, c: char) -> Self {
        Self::at(input, Expected::Char(c))
    }

    fn or(self, other: Self) -> Self {
        // Longest match wins; ties keep the first alternative tried.
        if other.offset > self.offset { other } else { self }
    }
}

impl<'a> ContextError<Span<'a>> for SyntaxError {
    fn add_context(input: Span<'a>, ctx: &'static str, other: Self) -> Self {
        // A label only renames a failure at the labeled rule's own start;
        // failures further inside keep their more specific expectation.
        if input.location_offset() == other.offset {
            Self::at(input, Expected::Label(ctx))
        } else {
            other
        }
    }
}

/// Converts a parser failure to a crate-level compile diagnostic.
fn syntax_error_to_compile_error(err: nom::Err<SyntaxError>, source: &str) -> CompileError {
    match err {
        nom::Err::Incomplete(_) => CompileError::message_only("Syntax error: incomplete input"),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            CompileError::from_span(e.message(), source, &e.span())
        }
    }
}
