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

//! Error types and failure reporting surfaced by compile/solve APIs.

use crate::diagnostics::{CompileError, CompileErrors};
use std::fmt;

/// Errors produced by parse, compile, or solve stages.
#[derive(Debug)]
pub enum SolveError {
    /// Malformed syntax; fatal to the whole calculation.
    Parse(CompileError),
    /// Semantic errors collected across the full lowering pass.
    Compile(CompileErrors),
    /// A requested variable was not present in the solved system.
    MissingValue(String),
    /// The linear step failed (singular or ill-conditioned Jacobian).
    Numerical(String),
    /// Newton iteration stopped without reaching tolerance.
    NoConvergence(SolveFailureReport),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Parse(err) => write!(f, "{err}"),
            SolveError::Compile(errs) => write!(f, "{errs}"),
            SolveError::MissingValue(name) => write!(f, "Missing value for variable '{name}'"),
            SolveError::Numerical(message) => write!(f, "Numerical failure: {message}"),
            SolveError::NoConvergence(report) => write!(f, "{report}"),
        }
    }
}

impl std::error::Error for SolveError {}

impl From<CompileError> for SolveError {
    fn from(value: CompileError) -> Self {
        SolveError::Parse(value)
    }
}

impl From<CompileErrors> for SolveError {
    fn from(value: CompileErrors) -> Self {
        SolveError::Compile(value)
    }
}

impl SolveError {
    /// Returns the structured failure report when available.
    pub fn failure_report(&self) -> Option<&SolveFailureReport> {
        match self {
            SolveError::NoConvergence(report) => Some(report),
            _ => None,
        }
    }
}

/// One high-residual equation mapped back to DSL source.
#[derive(Debug, Clone)]
pub struct ResidualIssue {
    /// Equation index in the lowered equation list.
    pub equation_index: usize,
    /// Residual magnitude (complex norm) at failure time.
    pub magnitude: f64,
    /// Human-readable origin description (top level, or call chain).
    pub description: String,
    /// 1-based source line of the originating equation.
    pub line: usize,
    /// 1-based source column of the originating equation.
    pub column: usize,
    /// Source line snippet.
    pub snippet: String,
    /// Caret pointer for `snippet`.
    pub pointer: String,
}

/// Structured report returned when Newton iteration fails.
#[derive(Debug, Clone)]
pub struct SolveFailureReport {
    /// Iteration count reached before failure.
    pub iterations: usize,
    /// Final residual norm.
    pub error: f64,
    /// Damping factor at failure time.
    pub damping: f64,
    /// Number of lowered equations (each contributes two residual rows).
    pub equation_count: usize,
    /// Number of unknown derivative slots.
    pub unknown_count: usize,
    /// Worst residual equations, ranked by magnitude.
    pub worst: Vec<ResidualIssue>,
}

impl fmt::Display for SolveFailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No convergence after {} iteration(s) (residual {:.3e}, damping {:.3})",
            self.iterations, self.error, self.damping
        )?;
        for issue in &self.worst {
            write!(
                f,
                "\n  residual {:.3e} in {} at line {}, column {}",
                issue.magnitude, issue.description, issue.line, issue.column
            )?;
        }
        Ok(())
    }
}
