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

//! Variable definitions shared between the caller and the solver.

use crate::ast::NumericLiteral;
use num_complex::Complex64;

/// A variable supplied by the caller, independent of the source text.
///
/// External variables share one flat namespace with in-source `var`/`lvar`
/// declarations; a name collision across the two origins is a compile error.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalVariable {
    /// Variable name as referenced from DSL expressions.
    pub name: String,
    /// Current value, already scaled by the SI prefix.
    pub value: Complex64,
    /// Locked variables are fixed inputs and never adjusted by the solver.
    pub locked: bool,
    /// SI-prefix factor the caller displays the value under.
    pub si_prefix_factor: f64,
}

impl ExternalVariable {
    /// Creates an external variable definition.
    pub fn new(
        name: impl Into<String>,
        value: Complex64,
        locked: bool,
        si_prefix_factor: f64,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            locked,
            si_prefix_factor,
        }
    }
}

/// Where a variable entered the system.
#[derive(Debug, Clone)]
pub(crate) enum VarOrigin {
    /// Supplied by the caller; carries its display prefix factor.
    External { si_prefix_factor: f64 },
    /// Declared in source; the literal's spans drive post-solve patching.
    Source { literal: NumericLiteral },
}

/// One entry in the model's flat variable table.
#[derive(Debug, Clone)]
pub(crate) struct Variable {
    pub(crate) name: String,
    /// Current value; the solver mutates a working copy during iteration.
    pub(crate) value: Complex64,
    pub(crate) locked: bool,
    /// First of two consecutive derivative slots, `None` for locked variables.
    pub(crate) slot: Option<usize>,
    pub(crate) origin: VarOrigin,
}

impl Variable {
    /// Returns the SI-prefix factor the variable's value is displayed under.
    pub(crate) fn prefix_factor(&self) -> f64 {
        match &self.origin {
            VarOrigin::External { si_prefix_factor } => *si_prefix_factor,
            VarOrigin::Source { literal } => literal.prefix.factor,
        }
    }
}
