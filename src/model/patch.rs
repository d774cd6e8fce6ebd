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

//! Post-solve source-text patching.

use super::{VarOrigin, Variable};

/// Rewrites solved values into the numeric spans they were parsed from.
///
/// Edits are applied highest offset first on a copy of the source so earlier
/// spans stay valid while later ones are replaced. The real span is always
/// rewritten, the imaginary span only when the literal originally carried
/// one. Locked declarations are left byte-identical.
pub(super) fn patch_source(source: &str, variables: &[Variable]) -> String {
    let mut edits: Vec<(usize, usize, String)> = Vec::new();
    for variable in variables {
        if variable.locked {
            continue;
        }
        let VarOrigin::Source { literal } = &variable.origin else {
            continue;
        };
        // The patched text carries the value back under the declared prefix,
        // inverting the parse-time scaling.
        let factor = literal.prefix.factor;
        edits.push((
            literal.real_span.start,
            literal.real_span.end,
            format_number(variable.value.re / factor),
        ));
        if let Some(imag) = &literal.imag {
            edits.push((
                imag.span.start,
                imag.span.end,
                format_number(variable.value.im / factor),
            ));
        }
    }

    edits.sort_by(|a, b| b.0.cmp(&a.0));
    let mut patched = source.to_string();
    for (start, end, text) in edits {
        patched.replace_range(start..end, &text);
    }
    patched
}

/// Formats a solved component so it re-parses through the numeric grammar.
pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-4..1e15).contains(&magnitude) {
        format!("{value}")
    } else {
        format!("{value:e}")
    }
}
