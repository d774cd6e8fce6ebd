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

//! Statement and top-level item parsers.

use crate::ast::{Equation, EquationDef, EquationKind, Param, SourceSpan, Span, VarDecl};
use crate::prefix::PrefixTable;
use nom::Parser;
use nom::{
    branch::alt,
    character::complete::char,
    combinator::{map, opt, value},
    error::context,
    multi::separated_list0,
};

use super::PResult;
use super::expr::{call, expression, numeric_value};
use super::utils::{identifier, keyword, lexeme, token_char, trivia0};

/// One top-level AST item.
pub(super) enum TopItem {
    Var(VarDecl),
    Def(EquationDef),
    Equation(Equation),
}

/// Parses one top-level item.
pub(super) fn top_item<'a>(prefixes: &PrefixTable, input: Span<'a>) -> PResult<'a, TopItem> {
    // Keyword-led forms go first so an equation never swallows `var`/`eq`.
    context(
        "a declaration, definition, or equation",
        alt((
            map(|i| variable_declaration(prefixes, i), TopItem::Var),
            map(|i| equation_definition(prefixes, i), TopItem::Def),
            map(|i| equation(prefixes, i), TopItem::Equation),
        )),
    )
    .parse(input)
}

/// Parses a variable declaration (`var`/`lvar name = literal;`).
fn variable_declaration<'a>(prefixes: &PrefixTable, input: Span<'a>) -> PResult<'a, VarDecl> {
    let start = input;
    // `var` declares an unknown, `lvar` a locked value.
    let (input, locked) = alt((
        value(false, keyword("var")),
        value(true, keyword("lvar")),
    ))
    .parse(input)?;
    let (input, name) = context("a variable name", lexeme(identifier)).parse(input)?;
    let (input, _) = token_char('=').parse(input)?;
    let (input, literal) =
        context("a numeric value", |i| numeric_value(prefixes, i)).parse(input)?;
    let (after, _) = context("';'", char(';')).parse(input)?;
    let span = SourceSpan::from_bounds(start, after);
    let (input, ()) = trivia0(after)?;
    Ok((
        input,
        VarDecl {
            name,
            literal,
            locked,
            span,
        },
    ))
}

/// Parses an equation definition (`eq name(p1,p2,...){ equations }`).
fn equation_definition<'a>(prefixes: &PrefixTable, input: Span<'a>) -> PResult<'a, EquationDef> {
    let start = input;
    let (input, _) = keyword("eq").parse(input)?;
    let (input, name) = context("a definition name", lexeme(identifier)).parse(input)?;
    let (input, _) = token_char('(').parse(input)?;
    let (input, params) = separated_list0(token_char(','), param).parse(input)?;
    let (input, _) = context("')'", token_char(')')).parse(input)?;
    let (input, _) = context("'{'", token_char('{')).parse(input)?;

    let mut body = Vec::new();
    let mut input = input;
    loop {
        // `}` closes the body; otherwise another equation is required.
        let (next, close) = opt(char('}')).parse(input)?;
        if close.is_some() {
            let span = SourceSpan::from_bounds(start, next);
            let (next, ()) = trivia0(next)?;
            return Ok((
                next,
                EquationDef {
                    name,
                    params,
                    body,
                    span,
                },
            ));
        }
        let (next, eq) = equation(prefixes, input)?;
        body.push(eq);
        input = next;
    }
}

/// Parses one equation-definition parameter name.
fn param(input: Span<'_>) -> PResult<'_, Param> {
    let start = input;
    let (after, name) = identifier(input)?;
    let span = SourceSpan::from_bounds(start, after);
    let (input, ()) = trivia0(after)?;
    Ok((input, Param { name, span }))
}

/// Parses one equation and trailing semicolon.
fn equation<'a>(prefixes: &PrefixTable, input: Span<'a>) -> PResult<'a, Equation> {
    let start = input;
    // An equation is either a terminal assignment or a definition invocation.
    let (input, kind) = alt((
        |i| terminal_equation(prefixes, i),
        map(|i| call(prefixes, i), EquationKind::Call),
    ))
    .parse(input)?;
    let (after, _) = context("';'", char(';')).parse(input)?;
    let span = SourceSpan::from_bounds(start, after);
    let (input, ()) = trivia0(after)?;
    Ok((input, Equation { kind, span }))
}

/// Parses a terminal equation body (`left = right`).
fn terminal_equation<'a>(prefixes: &PrefixTable, input: Span<'a>) -> PResult<'a, EquationKind> {
    let (input, left) = expression(prefixes, input)?;
    let (input, _) = token_char('=').parse(input)?;
    let (input, right) = expression(prefixes, input)?;
    Ok((input, EquationKind::Terminal { left, right }))
}
