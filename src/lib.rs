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

//! Equation-sheet DSL: declare variables, write equations, solve, and get the
//! solved values patched back into the source text.
//!
//! This crate provides:
//! - A spanned DSL parser (`var`/`lvar` declarations, terminal equations,
//!   reusable `eq` definitions, `//` comments).
//! - Complex-valued numeric literals with SI prefixes and bracketed units.
//! - Lowering with depth-first expansion of equation-definition calls and
//!   batched semantic diagnostics.
//! - Forward-mode dual-number differentiation and a damped Newton iteration.
//! - Source patching that rewrites solved `var` literals in place.
//!
//! # Pipeline
//!
//! 1. Parse DSL into AST with source spans.
//! 2. Lower into bound residual equations (`f(x) - g(x) = 0`).
//! 3. Iterate damped Newton steps over all unknowns at once.
//! 4. Patch solved values back into a copy of the source text.
//!
//! # Example
//!
//! ```
//! use eqsolve::solve_dsl;
//!
//! let source = "
//!     var a = 1;
//!     lvar b = 3;
//!     var c = 1;
//!     a * b = c;
//!     c = 6;
//! ";
//!
//! let result = solve_dsl(source, &[]).unwrap();
//! assert!((result.real("a").unwrap() - 2.0).abs() < 1e-9);
//! assert!((result.real("c").unwrap() - 6.0).abs() < 1e-9);
//! // `a` and `c` are rewritten in the patched source; locked `b` is not.
//! assert!(result.source().contains("var a = 2"));
//! assert!(result.source().contains("lvar b = 3"));
//! ```
//!
//! # Variables
//!
//! Unknowns come from two places that share one namespace: in-source
//! `var`/`lvar` declarations and caller-supplied [`ExternalVariable`]s.
//! Locked variables (`lvar`, or `locked: true`) keep their value and act as
//! constants during differentiation. Every value is a `Complex64`; real-only
//! systems simply keep the imaginary parts at zero.

mod ast;
mod compiler;
mod diagnostics;
mod dual;
mod model;
mod parser;
mod prefix;
#[cfg(test)]
mod tests;

pub use ast::{
    BinOp, CallExpr, Equation, EquationDef, EquationKind, Expr, ExprKind, ImaginaryPart, NamedArg,
    NumericLiteral, Param, SourceSpan, System, VarDecl,
};
pub use diagnostics::{CompileError, CompileErrors};
pub use model::{
    ExternalVariable, Model, NewtonSettings, ResidualIssue, SolveError, SolveFailureReport,
    SolveResult,
};
pub use prefix::{PrefixTable, SiPrefix};

use parser::parse_system;

/// Parses DSL source into a spanned AST [`System`] using the default
/// SI-prefix table.
pub fn parse_dsl(source: &str) -> Result<System, CompileError> {
    parse_system(source, &PrefixTable::default())
}

/// Parses DSL source into a spanned AST [`System`] with an explicit
/// SI-prefix table.
pub fn parse_dsl_with_prefixes(
    source: &str,
    prefixes: &PrefixTable,
) -> Result<System, CompileError> {
    parse_system(source, prefixes)
}

/// Parses and lowers DSL source into a ready-to-solve [`Model`].
///
/// `externals` are registered ahead of in-source declarations and share the
/// same namespace; a collision is reported as a compile error.
///
/// # Errors
///
/// Returns [`SolveError::Parse`] with line/column and caret highlight when
/// parsing fails, or [`SolveError::Compile`] with the full batch of semantic
/// diagnostics when lowering fails.
pub fn compile_dsl(source: &str, externals: &[ExternalVariable]) -> Result<Model, SolveError> {
    compile_dsl_with_prefixes(source, externals, &PrefixTable::default())
}

/// Parses and lowers DSL source with an explicit SI-prefix table.
pub fn compile_dsl_with_prefixes(
    source: &str,
    externals: &[ExternalVariable],
    prefixes: &PrefixTable,
) -> Result<Model, SolveError> {
    let system = parse_system(source, prefixes)?;
    let model = compiler::compile(source, &system, externals)?;
    Ok(model)
}

/// Convenience function that compiles and solves in one step.
pub fn solve_dsl(source: &str, externals: &[ExternalVariable]) -> Result<SolveResult, SolveError> {
    let model = compile_dsl(source, externals)?;
    model.solve()
}

/// Compiles and solves with explicit SI prefixes and Newton settings.
pub fn solve_dsl_with(
    source: &str,
    externals: &[ExternalVariable],
    prefixes: &PrefixTable,
    settings: &NewtonSettings,
) -> Result<SolveResult, SolveError> {
    let model = compile_dsl_with_prefixes(source, externals, prefixes)?;
    model.solve_with(settings)
}
