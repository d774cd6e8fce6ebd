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

//! Lowering context and core state management.

use super::*;

/// Lowering context for one compilation unit.
///
/// Holds the variable table, the equation-definition registry, the scope
/// stack for parameter bindings, emitted equations, and the diagnostic batch.
pub(super) struct LowerContext<'a> {
    pub(super) source: &'a str,
    pub(super) defs: HashMap<String, EquationDef>,
    pub(super) variables: Vec<Variable>,
    pub(super) var_index: HashMap<String, usize>,
    pub(super) external_count: usize,
    pub(super) unknown_len: usize,
    pub(super) scopes: Vec<HashMap<String, BoundExpr>>,
    pub(super) equations: Vec<LoweredEquation>,
    pub(super) call_stack: Vec<String>,
    pub(super) errors: CompileErrors,
}

impl<'a> LowerContext<'a> {
    /// Creates a fresh lowering context bound to source text.
    pub(super) fn new(source: &'a str) -> Self {
        Self {
            source,
            defs: HashMap::new(),
            variables: Vec::new(),
            var_index: HashMap::new(),
            external_count: 0,
            unknown_len: 0,
            scopes: Vec::new(),
            equations: Vec::new(),
            call_stack: Vec::new(),
            errors: CompileErrors::new(),
        }
    }

    /// Finalizes lowering, producing a [`Model`] or the diagnostic batch.
    pub(super) fn finish(self) -> Result<Model, CompileErrors> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        Ok(Model::from_lowered_parts(
            self.source.to_string(),
            self.variables,
            self.external_count,
            self.unknown_len,
            self.equations,
        ))
    }

    /// Records a source-mapped compile diagnostic.
    pub(super) fn error_at(&mut self, message: impl Into<String>, span: &SourceSpan) {
        self.errors
            .push(CompileError::from_span(message, self.source, span));
    }

    pub(super) fn current_context_description(&self) -> String {
        if self.call_stack.is_empty() {
            "equation".to_string()
        } else {
            format!("equation [call {}]", self.call_stack.join(" -> "))
        }
    }

    pub(super) fn equation_origin(&self, span: &SourceSpan) -> EquationOrigin {
        let marker = CompileError::from_span("equation", self.source, span);
        EquationOrigin {
            description: self.current_context_description(),
            line: span.line,
            column: span.column,
            snippet: marker.snippet,
            pointer: marker.pointer,
        }
    }

    pub(super) fn push_equation(&mut self, residual: BoundExpr, origin: EquationOrigin) {
        self.equations.push(LoweredEquation { residual, origin });
    }

    pub(super) fn push_scope(&mut self, scope: HashMap<String, BoundExpr>) {
        self.scopes.push(scope);
    }

    pub(super) fn pop_scope(&mut self) {
        let _ = self.scopes.pop();
    }

    /// Resolves a bound parameter, innermost call scope first.
    pub(super) fn resolve_binding(&self, name: &str) -> Option<BoundExpr> {
        for scope in self.scopes.iter().rev() {
            if let Some(value) = scope.get(name) {
                return Some(value.clone());
            }
        }
        None
    }
}
