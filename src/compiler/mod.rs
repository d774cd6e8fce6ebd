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

//! DSL lowering from parsed AST into residual equations.

mod builtins;
mod calls;
mod context;
mod decls;
mod expr;

use crate::ast::{
    BinOp, CallExpr, Equation, EquationDef, EquationKind, Expr, ExprKind, SourceSpan, System,
    VarDecl,
};
use crate::diagnostics::{CompileError, CompileErrors};
use crate::model::{
    BoundExpr, Builtin, EquationOrigin, ExternalVariable, LoweredEquation, Model, VarOrigin,
    Variable,
};
use num_complex::Complex64;
use std::collections::HashMap;

use self::context::LowerContext;

/// Lowers a parsed system against externally supplied variables.
///
/// Semantic diagnostics are collected across the whole pass; a non-empty
/// batch means no model is produced and the solver never runs.
pub(crate) fn compile(
    source: &str,
    system: &System,
    externals: &[ExternalVariable],
) -> Result<Model, CompileErrors> {
    let mut ctx = LowerContext::new(source);
    ctx.register_externals(externals);
    for decl in &system.vars {
        ctx.register_declaration(decl);
    }
    ctx.assign_slots();
    ctx.collect_definitions(&system.defs);
    // Top-level equations are lowered in source order.
    for equation in &system.equations {
        ctx.lower_equation(equation);
    }
    ctx.finish()
}

/// Placeholder value substituted while diagnostics accumulate, so one pass
/// can report every problem in the source.
pub(super) fn placeholder() -> BoundExpr {
    BoundExpr::Const(Complex64::new(0.0, 0.0))
}
