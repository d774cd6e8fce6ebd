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

//! Expression, value, call, and numeric-literal parsers.

use crate::ast::{
    BinOp, CallExpr, Expr, ExprKind, ImaginaryPart, NamedArg, NumericLiteral, SourceSpan, Span,
};
use crate::prefix::{PrefixTable, SiPrefix};
use nom::Parser;
use nom::{
    branch::alt, bytes::complete::take_while, character::complete::char, combinator::opt,
    error::context,
};

use super::PResult;
use super::utils::{decimal_number, identifier, lexeme, token_char, trivia0, word};

/// Top-level expression parser.
pub(super) fn expression<'a>(prefixes: &PrefixTable, input: Span<'a>) -> PResult<'a, Expr> {
    context("an expression", |i| parse_add_sub(prefixes, i)).parse(input)
}

/// Parses left-associative `+`/`-`.
fn parse_add_sub<'a>(prefixes: &PrefixTable, input: Span<'a>) -> PResult<'a, Expr> {
    let (mut input, mut left) = parse_mul_div(prefixes, input)?;
    loop {
        let (next, op) = opt(alt((token_char('+'), token_char('-')))).parse(input)?;
        let Some(op_char) = op else {
            break;
        };

        // Left-associative fold: `a-b-c` becomes `(a-b)-c`.
        let (next, right) = parse_mul_div(prefixes, next)?;
        let op = if op_char == '+' {
            BinOp::Add
        } else {
            BinOp::Sub
        };
        let span = left.span.merge(&right.span);
        left = Expr {
            kind: ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        };
        input = next;
    }
    Ok((input, left))
}

/// Parses left-associative `*`/`/`.
fn parse_mul_div<'a>(prefixes: &PrefixTable, input: Span<'a>) -> PResult<'a, Expr> {
    let (mut input, mut left) = parse_value(prefixes, input)?;
    loop {
        let (next, op) = opt(alt((token_char('*'), token_char('/')))).parse(input)?;
        let Some(op_char) = op else {
            break;
        };

        // Left-associative fold: `a/b/c` becomes `(a/b)/c`.
        let (next, right) = parse_value(prefixes, next)?;
        let op = if op_char == '*' {
            BinOp::Mul
        } else {
            BinOp::Div
        };
        let span = left.span.merge(&right.span);
        left = Expr {
            kind: ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        };
        input = next;
    }
    Ok((input, left))
}

/// Parses expression atoms in ordered-choice order.
fn parse_value<'a>(prefixes: &PrefixTable, input: Span<'a>) -> PResult<'a, Expr> {
    alt((
        |i| parse_parenthesized(prefixes, i),
        |i| parse_number(prefixes, i),
        |i| parse_symbol_or_call(prefixes, i),
    ))
    .parse(input)
}

/// Parses parenthesized expressions.
fn parse_parenthesized<'a>(prefixes: &PrefixTable, input: Span<'a>) -> PResult<'a, Expr> {
    let start = input;
    let (input, _) = token_char('(').parse(input)?;
    let (input, inner) = expression(prefixes, input)?;
    let (after, _) = context("')'", char(')')).parse(input)?;
    let span = SourceSpan::from_bounds(start, after);
    let (input, ()) = trivia0(after)?;
    Ok((
        input,
        Expr {
            kind: ExprKind::Paren(Box::new(inner)),
            span,
        },
    ))
}

/// Parses numeric-literal expressions.
fn parse_number<'a>(prefixes: &PrefixTable, input: Span<'a>) -> PResult<'a, Expr> {
    let (input, literal) = numeric_value(prefixes, input)?;
    let span = literal.span.clone();
    Ok((
        input,
        Expr {
            kind: ExprKind::Number(literal),
            span,
        },
    ))
}

/// Parses a full numeric literal and trailing trivia.
///
/// Grammar: signed decimal, optional `:` separated imaginary part, optional
/// SI prefix from the configured table, optional `[unit]`. The real and
/// imaginary digit spans are recorded exactly so the solver can overwrite
/// them in place.
pub(super) fn numeric_value<'a>(
    prefixes: &PrefixTable,
    input: Span<'a>,
) -> PResult<'a, NumericLiteral> {
    let start = input;
    let (input, (real, real_span)) = decimal_number(input)?;

    // Once the `:` separator is seen the imaginary digits are mandatory.
    let (input, colon) = opt(char(':')).parse(input)?;
    let (input, imag) = match colon {
        Some(_) => {
            let (input, (value, span)) = context("a numeric value", decimal_number).parse(input)?;
            (input, Some(ImaginaryPart { value, span }))
        }
        None => (input, None),
    };

    let (input, prefix) = si_prefix(prefixes, input)?;
    let (input, unit) = unit_string(input)?;

    // Bare `m` with no unit means metres, not milli-of-nothing.
    let (prefix, unit) = match (prefix, unit) {
        (Some(p), None) if p.symbol == "m" => (SiPrefix::none(), Some("m".to_string())),
        (p, u) => (p.unwrap_or_else(SiPrefix::none), u),
    };

    let span = SourceSpan::from_bounds(start, input);
    let (input, ()) = trivia0(input)?;
    Ok((
        input,
        NumericLiteral {
            real,
            real_span,
            imag,
            prefix,
            unit,
            span,
        },
    ))
}

/// Matches an SI prefix immediately after the digits.
fn si_prefix<'a>(prefixes: &PrefixTable, input: Span<'a>) -> PResult<'a, Option<SiPrefix>> {
    match prefixes.match_symbol(input.fragment()) {
        Some(p) => {
            let (input, _) = nom::bytes::complete::tag(p.symbol.as_str()).parse(input)?;
            Ok((input, Some(p.clone())))
        }
        None => Ok((input, None)),
    }
}

/// Matches an optional bracketed unit (`[Hz]`, `[m/s]`).
fn unit_string(input: Span<'_>) -> PResult<'_, Option<String>> {
    let (input, open) = opt(char('[')).parse(input)?;
    if open.is_none() {
        return Ok((input, None));
    }
    // The closing bracket is mandatory once the unit is opened.
    let (input, unit) = take_while(|c| c != ']' && c != '\n' && c != '\r').parse(input)?;
    let (input, _) = context("']'", char(']')).parse(input)?;
    Ok((input, Some(unit.fragment().to_string())))
}

/// Parses either a symbol reference or a builtin call expression.
fn parse_symbol_or_call<'a>(prefixes: &PrefixTable, input: Span<'a>) -> PResult<'a, Expr> {
    let start = input;
    let (after_ident, name) = identifier(input)?;
    let ident_span = SourceSpan::from_bounds(start, after_ident);
    let (input, ()) = trivia0(after_ident)?;

    // A name followed by `(...)` is parsed as a call, otherwise a symbol.
    let (input, open) = opt(token_char('(')).parse(input)?;
    if open.is_none() {
        return Ok((
            input,
            Expr {
                kind: ExprKind::Symbol(name),
                span: ident_span,
            },
        ));
    }

    let (input, call) = call_tail(prefixes, name, start, input)?;
    let span = call.span.clone();
    Ok((
        input,
        Expr {
            kind: ExprKind::Call(call),
            span,
        },
    ))
}

/// Parses a call with mandatory parentheses (equation-level invocations).
pub(super) fn call<'a>(prefixes: &PrefixTable, input: Span<'a>) -> PResult<'a, CallExpr> {
    let start = input;
    let (input, name) = lexeme(identifier)(input)?;
    let (input, _) = token_char('(').parse(input)?;
    call_tail(prefixes, name, start, input)
}

/// Parses the argument list and closing parenthesis of a call.
fn call_tail<'a>(
    prefixes: &PrefixTable,
    name: String,
    start: Span<'a>,
    input: Span<'a>,
) -> PResult<'a, CallExpr> {
    let (input, (positional, named)) = call_args(prefixes, input)?;
    let (after, _) = context("')'", char(')')).parse(input)?;
    let span = SourceSpan::from_bounds(start, after);
    let (input, ()) = trivia0(after)?;
    Ok((
        input,
        CallExpr {
            name,
            positional,
            named,
            span,
        },
    ))
}

/// Parses call arguments: positional expressions, then named arguments.
///
/// Once a `name:` pattern is seen every remaining argument must be named; a
/// positional argument after a named one is a parse failure.
fn call_args<'a>(
    prefixes: &PrefixTable,
    input: Span<'a>,
) -> PResult<'a, (Vec<Expr>, Vec<NamedArg>)> {
    let mut positional = Vec::new();
    let mut named: Vec<NamedArg> = Vec::new();

    // Empty argument list.
    if input.fragment().starts_with(')') {
        return Ok((input, (positional, named)));
    }

    let mut input = input;
    loop {
        if !named.is_empty() || at_named_arg(input) {
            let (next, arg) = named_arg(prefixes, input)?;
            named.push(arg);
            input = next;
        } else {
            let (next, e) = expression(prefixes, input)?;
            positional.push(e);
            input = next;
        }

        // A comma commits to another argument; anything else ends the list.
        let (next, comma) = opt(token_char(',')).parse(input)?;
        input = next;
        if comma.is_none() {
            break;
        }
    }
    Ok((input, (positional, named)))
}

/// Returns whether the next argument uses `name: value` form.
fn at_named_arg(input: Span<'_>) -> bool {
    let Ok((rest, _)) = word(input) else {
        return false;
    };
    let Ok((rest, ())) = trivia0(rest) else {
        return false;
    };
    rest.fragment().starts_with(':')
}

/// Parses one named argument (`name: expression`).
fn named_arg<'a>(prefixes: &PrefixTable, input: Span<'a>) -> PResult<'a, NamedArg> {
    let start = input;
    let (input, name) = context("a parameter name", lexeme(identifier)).parse(input)?;
    let (input, _) = token_char(':').parse(input)?;
    let (input, value) = expression(prefixes, input)?;
    let span = SourceSpan::from_bounds(start, start).merge(&value.span);
    Ok((input, NamedArg { name, value, span }))
}
