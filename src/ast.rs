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

//! AST definitions for the equation DSL with precise source spans.
//!
//! The parser creates this AST first. A later lowering phase binds variables,
//! expands equation-definition calls, and converts it to a flat residual
//! system for the Newton solver. Numeric literals keep the exact byte spans of
//! their real and imaginary parts so solved values can be written back into
//! the original source text.

use crate::prefix::SiPrefix;
use nom_locate::LocatedSpan;
use num_complex::Complex64;

/// Parser input span type carrying byte offsets and line/column info.
pub type Span<'a> = LocatedSpan<&'a str>;

/// Source range and anchor position for diagnostics and text patching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpan {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based UTF-8 column.
    pub column: usize,
    /// Byte offset of the first character of the line holding `start`.
    pub line_start: usize,
}

impl SourceSpan {
    /// Creates a source span from parser start/end positions.
    pub fn from_bounds(start: Span<'_>, end: Span<'_>) -> Self {
        Self {
            start: start.location_offset(),
            end: end.location_offset(),
            line: start.location_line() as usize,
            column: start.get_utf8_column(),
            line_start: start.location_offset() - (start.get_column() - 1),
        }
    }

    /// Returns span length in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` when the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns a span that starts at `self` and ends at `other`.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            start: self.start,
            end: other.end,
            line: self.line,
            column: self.column,
            line_start: self.line_start,
        }
    }
}

/// Imaginary component of a numeric literal.
///
/// Present only when the literal was written with a `:` separated imaginary
/// part; the value and its span always travel together.
#[derive(Debug, Clone, PartialEq)]
pub struct ImaginaryPart {
    /// Unscaled imaginary value as written.
    pub value: f64,
    /// Exact span of the imaginary digits, used for text patching.
    pub span: SourceSpan,
}

/// Numeric literal with prefix/unit annotations and patchable spans.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericLiteral {
    /// Unscaled real value as written.
    pub real: f64,
    /// Exact span of the real digits, used for text patching.
    pub real_span: SourceSpan,
    /// Optional imaginary part with its own span.
    pub imag: Option<ImaginaryPart>,
    /// Matched SI prefix (the empty prefix when none was written).
    pub prefix: SiPrefix,
    /// Optional bracketed unit string; display-only.
    pub unit: Option<String>,
    /// Span of the whole literal.
    pub span: SourceSpan,
}

impl NumericLiteral {
    /// Returns the prefix-scaled complex value of the literal.
    pub fn value(&self) -> Complex64 {
        let imag = self.imag.as_ref().map(|i| i.value).unwrap_or(0.0);
        Complex64::new(self.real, imag) * self.prefix.factor
    }
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
}

/// Named call argument (`param: expr`).
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArg {
    /// Target parameter name.
    pub name: String,
    /// Bound argument expression.
    pub value: Expr,
    /// Span covering `name: expr`.
    pub span: SourceSpan,
}

/// Call with positional-then-named arguments.
///
/// At the value level the callee must be a builtin function; at the equation
/// level it must be an equation definition.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    /// Callee name.
    pub name: String,
    /// Positional arguments, in call order.
    pub positional: Vec<Expr>,
    /// Named arguments, in call order. Always after every positional one.
    pub named: Vec<NamedArg>,
    /// Span of the whole call.
    pub span: SourceSpan,
}

/// Expression node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Numeric literal.
    Number(NumericLiteral),
    /// Symbol reference.
    Symbol(String),
    /// Parenthesized sub-expression.
    Paren(Box<Expr>),
    /// Builtin function call.
    Call(CallExpr),
    /// Binary operation.
    Binary {
        /// Operator kind.
        op: BinOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
}

/// Spanned expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Expression payload.
    pub kind: ExprKind,
    /// Source location for diagnostics.
    pub span: SourceSpan,
}

/// Equation statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum EquationKind {
    /// Terminal equation (`left = right;`); contributes one residual.
    Terminal {
        /// Left-hand expression.
        left: Expr,
        /// Right-hand expression.
        right: Expr,
    },
    /// Equation-definition invocation (`name(args);`).
    Call(CallExpr),
}

/// Spanned equation statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    /// Equation payload.
    pub kind: EquationKind,
    /// Source location for diagnostics.
    pub span: SourceSpan,
}

/// Equation-definition parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Source location for diagnostics.
    pub span: SourceSpan,
}

/// Named, parameterized, reusable equation block (`eq name(params){ ... }`).
#[derive(Debug, Clone, PartialEq)]
pub struct EquationDef {
    /// Definition name.
    pub name: String,
    /// Ordered parameter list.
    pub params: Vec<Param>,
    /// Body equations; expanded at every call site during lowering.
    pub body: Vec<Equation>,
    /// Source location for diagnostics.
    pub span: SourceSpan,
}

/// In-source variable declaration (`var`/`lvar name = literal;`).
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    /// Declared symbol name.
    pub name: String,
    /// Initial (or locked) value literal with patchable spans.
    pub literal: NumericLiteral,
    /// `true` for `lvar`: the value is fixed input, never solved for.
    pub locked: bool,
    /// Source location for diagnostics.
    pub span: SourceSpan,
}

/// Full parsed equation system.
#[derive(Debug, Clone, PartialEq)]
pub struct System {
    /// Variable declarations, in source order.
    pub vars: Vec<VarDecl>,
    /// Equation definitions, in source order. Names must be unique.
    pub defs: Vec<EquationDef>,
    /// Top-level equations (terminal and call forms), in source order.
    pub equations: Vec<Equation>,
}
