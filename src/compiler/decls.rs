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

//! Variable registration, slot assignment, and equation dispatch.

use super::*;

impl LowerContext<'_> {
    /// Registers caller-supplied variables ahead of in-source declarations.
    pub(super) fn register_externals(&mut self, externals: &[ExternalVariable]) {
        for external in externals {
            if self.var_index.contains_key(&external.name) {
                self.errors.push(CompileError::message_only(format!(
                    "Duplicate variable '{}'",
                    external.name
                )));
                continue;
            }
            let index = self.variables.len();
            self.var_index.insert(external.name.clone(), index);
            self.variables.push(Variable {
                name: external.name.clone(),
                value: external.value,
                locked: external.locked,
                slot: None,
                origin: VarOrigin::External {
                    si_prefix_factor: external.si_prefix_factor,
                },
            });
        }
        self.external_count = self.variables.len();
    }

    /// Registers one in-source `var`/`lvar` declaration.
    ///
    /// External and in-source variables share one flat namespace; on a
    /// duplicate name the first registration wins so later references still
    /// resolve while the batch is collected.
    pub(super) fn register_declaration(&mut self, decl: &VarDecl) {
        if self.var_index.contains_key(&decl.name) {
            self.error_at(
                format!("Duplicate declaration of variable '{}'", decl.name),
                &decl.span,
            );
            return;
        }
        let index = self.variables.len();
        self.var_index.insert(decl.name.clone(), index);
        self.variables.push(Variable {
            name: decl.name.clone(),
            value: decl.literal.value(),
            locked: decl.locked,
            slot: None,
            origin: VarOrigin::Source {
                literal: decl.literal.clone(),
            },
        });
    }

    /// Assigns two consecutive derivative slots (real, imaginary) to every
    /// unknown, in registration order. Locked variables never receive one.
    pub(super) fn assign_slots(&mut self) {
        let mut next = 0;
        for variable in &mut self.variables {
            if !variable.locked {
                variable.slot = Some(next);
                next += 2;
            }
        }
        self.unknown_len = next;
    }

    /// Indexes equation definitions by name and validates their parameters.
    pub(super) fn collect_definitions(&mut self, defs: &[EquationDef]) {
        for def in defs {
            for (index, param) in def.params.iter().enumerate() {
                if def.params[..index].iter().any(|p| p.name == param.name) {
                    self.error_at(
                        format!(
                            "Duplicate parameter '{}' in definition '{}'",
                            param.name, def.name
                        ),
                        &param.span,
                    );
                }
            }
            if self.defs.contains_key(&def.name) {
                self.error_at(
                    format!("Duplicate equation definition '{}'", def.name),
                    &def.span,
                );
                continue;
            }
            self.defs.insert(def.name.clone(), def.clone());
        }
    }

    /// Lowers one top-level or definition-body equation.
    pub(super) fn lower_equation(&mut self, equation: &Equation) {
        match &equation.kind {
            EquationKind::Terminal { left, right } => {
                // A terminal equation contributes one residual: left - right.
                let lhs = self.lower_expr(left);
                let rhs = self.lower_expr(right);
                let origin = self.equation_origin(&equation.span);
                self.push_equation(BoundExpr::Sub(Box::new(lhs), Box::new(rhs)), origin);
            }
            EquationKind::Call(call) => self.lower_equation_call(call),
        }
    }
}
