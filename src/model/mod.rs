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

//! Compiled model, evaluation tree, and solver entry points.

mod errors;
mod patch;
mod result;
mod solve;
mod vars;

use crate::dual::{Dual, DualComplex};
use num_complex::Complex64;

pub use errors::{ResidualIssue, SolveError, SolveFailureReport};
pub use result::SolveResult;
pub use solve::NewtonSettings;
pub use vars::ExternalVariable;

pub(crate) use patch::format_number;
pub(crate) use vars::{VarOrigin, Variable};

/// Builtin value-level functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    /// Principal-branch complex square root.
    Sqrt,
    /// Four-quadrant arc tangent of the real projections of `(y, x)`.
    Atan2,
}

impl Builtin {
    /// Resolves a builtin by its DSL name.
    pub(crate) fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "sqrt" => Some(Builtin::Sqrt),
            "atan2" => Some(Builtin::Atan2),
            _ => None,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Builtin::Sqrt => "sqrt",
            Builtin::Atan2 => "atan2",
        }
    }

    pub(crate) fn arity(self) -> usize {
        match self {
            Builtin::Sqrt => 1,
            Builtin::Atan2 => 2,
        }
    }

    /// Applies the builtin to evaluated arguments.
    ///
    /// The argument count is validated at compile time, so `args` always
    /// matches [`Builtin::arity`].
    pub(crate) fn apply(self, args: &[DualComplex]) -> DualComplex {
        match self {
            Builtin::Sqrt => args[0].sqrt(),
            Builtin::Atan2 => {
                let y = &args[0];
                let x = &args[1];
                DualComplex {
                    re: y.re.atan2(&x.re),
                    im: Dual::constant(0.0, y.re.deriv.len()),
                }
            }
        }
    }
}

/// Lowered expression evaluated against current variable values.
///
/// Compilation resolves every symbol to a variable index or substitutes a
/// bound parameter expression, so evaluation performs no name lookups.
#[derive(Debug, Clone)]
pub(crate) enum BoundExpr {
    /// Literal constant (also the placeholder substituted while compile
    /// diagnostics accumulate).
    Const(Complex64),
    /// Declared variable, indexed into the model's variable table.
    Var(usize),
    Add(Box<BoundExpr>, Box<BoundExpr>),
    Sub(Box<BoundExpr>, Box<BoundExpr>),
    Mul(Box<BoundExpr>, Box<BoundExpr>),
    Div(Box<BoundExpr>, Box<BoundExpr>),
    /// Builtin function application.
    Call(Builtin, Vec<BoundExpr>),
}

/// Source mapping attached to each lowered equation.
#[derive(Debug, Clone)]
pub(crate) struct EquationOrigin {
    /// Human-readable origin description (top level, or call chain).
    pub(crate) description: String,
    pub(crate) line: usize,
    pub(crate) column: usize,
    /// Source line snippet at the equation.
    pub(crate) snippet: String,
    /// Caret pointer for `snippet`.
    pub(crate) pointer: String,
}

/// One lowered residual equation with its source origin.
#[derive(Debug, Clone)]
pub(crate) struct LoweredEquation {
    pub(crate) residual: BoundExpr,
    pub(crate) origin: EquationOrigin,
}

/// A compiled equation system ready to be solved.
///
/// `Model` stores the lowered residual equations, the flat variable table
/// with derivative-slot assignments, and the original source text for
/// post-solve patching.
#[derive(Debug, Clone)]
pub struct Model {
    pub(crate) source: String,
    /// Externally supplied variables first, then in-source declarations.
    pub(crate) variables: Vec<Variable>,
    pub(crate) external_count: usize,
    /// Total derivative-vector length, two slots per unknown.
    pub(crate) unknown_len: usize,
    pub(crate) equations: Vec<LoweredEquation>,
}

impl Model {
    pub(crate) fn from_lowered_parts(
        source: String,
        variables: Vec<Variable>,
        external_count: usize,
        unknown_len: usize,
        equations: Vec<LoweredEquation>,
    ) -> Self {
        Self {
            source,
            variables,
            external_count,
            unknown_len,
            equations,
        }
    }

    /// Returns the number of lowered equations.
    ///
    /// Each contributes two scalar residual rows, real and imaginary.
    pub fn equation_count(&self) -> usize {
        self.equations.len()
    }

    /// Returns the total derivative-slot count (two per unknown variable).
    pub fn unknown_slot_count(&self) -> usize {
        self.unknown_len
    }

    /// Returns declared variable names, externally supplied ones first.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables
            .iter()
            .map(|variable| variable.name.as_str())
            .collect()
    }
}
