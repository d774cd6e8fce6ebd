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

//! Parser trivia and lexical helpers.

use crate::ast::{SourceSpan, Span};
use nom::Parser;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace1, not_line_ending},
    combinator::{map, opt, recognize, value, verify},
    multi::many0,
    number::complete::recognize_float,
    sequence::{pair, terminated},
};

use super::{Expected, PResult, SyntaxError};

/// Skips zero-or-more whitespace/comments.
pub(super) fn trivia0(input: Span<'_>) -> PResult<'_, ()> {
    // Spaces, tabs, CR/LF and line comments are all trivia.
    value((), many0(alt((value((), multispace1), comment)))).parse(input)
}

/// Parses line comments (`// ...`).
fn comment(input: Span<'_>) -> PResult<'_, ()> {
    value((), pair(tag("//"), opt(not_line_ending))).parse(input)
}

/// Wraps a parser with trailing whitespace/comment skipping.
///
/// Trivia is consumed after every token-producing rule, never before; only
/// the `system` entry point skips leading trivia once.
pub(super) fn lexeme<'a, O, P>(mut parser: P) -> impl FnMut(Span<'a>) -> PResult<'a, O>
where
    P: FnMut(Span<'a>) -> PResult<'a, O>,
{
    move |input| terminated(&mut parser, trivia0).parse(input)
}

/// Parses a specific character token and trailing trivia.
pub(super) fn token_char<'a>(c: char) -> impl FnMut(Span<'a>) -> PResult<'a, char> {
    lexeme(char(c))
}

/// Parses a whole-word keyword and trailing trivia.
///
/// Whole-word matching keeps `var` from swallowing the start of `variance`.
pub(super) fn keyword<'a>(kw: &'static str) -> impl FnMut(Span<'a>) -> PResult<'a, ()> {
    lexeme(value((), verify(word, move |w: &Span<'_>| *w.fragment() == kw)))
}

/// Parses a raw identifier fragment without trivia handling.
pub(super) fn word(input: Span<'_>) -> PResult<'_, Span<'_>> {
    recognize(pair(
        take_while1(is_ident_start),
        take_while(is_ident_continue),
    ))
    .parse(input)
}

/// Parses identifiers (`[A-Za-z_][A-Za-z0-9_]*`) without trivia handling.
pub(super) fn identifier(input: Span<'_>) -> PResult<'_, String> {
    map(word, |s: Span<'_>| s.fragment().to_string()).parse(input)
}

/// Returns whether a char can start an identifier.
fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

/// Returns whether a char can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// Scans a signed decimal number (optional exponent) without trivia handling.
///
/// Returns the parsed value together with the exact byte span of the digits,
/// which variable declarations keep for solved-value write-back.
pub(super) fn decimal_number(input: Span<'_>) -> PResult<'_, (f64, SourceSpan)> {
    let start = input;
    let (rest, frag) = recognize_float(input)?;
    let value = match frag.fragment().parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            return Err(nom::Err::Error(SyntaxError::at(
                start,
                Expected::Label("a numeric value"),
            )));
        }
    };
    Ok((rest, (value, SourceSpan::from_bounds(start, rest))))
}
