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

//! Expression lowering.

use super::*;

impl LowerContext<'_> {
    /// Recursively lowers an AST expression into a bound evaluation tree.
    ///
    /// Resolution failures are recorded in the diagnostic batch and replaced
    /// with a placeholder constant so the pass can continue.
    pub(super) fn lower_expr(&mut self, expr: &Expr) -> BoundExpr {
        match &expr.kind {
            ExprKind::Number(literal) => BoundExpr::Const(literal.value()),
            ExprKind::Symbol(name) => {
                // Bound parameters shadow declared variables.
                if let Some(value) = self.resolve_binding(name) {
                    return value;
                }
                if let Some(&index) = self.var_index.get(name) {
                    return BoundExpr::Var(index);
                }
                self.error_at(format!("Unknown symbol '{name}'"), &expr.span);
                placeholder()
            }
            ExprKind::Paren(inner) => self.lower_expr(inner),
            ExprKind::Call(call) => self.lower_value_call(call),
            ExprKind::Binary { op, left, right } => {
                let lhs = Box::new(self.lower_expr(left));
                let rhs = Box::new(self.lower_expr(right));
                match op {
                    BinOp::Add => BoundExpr::Add(lhs, rhs),
                    BinOp::Sub => BoundExpr::Sub(lhs, rhs),
                    BinOp::Mul => BoundExpr::Mul(lhs, rhs),
                    BinOp::Div => BoundExpr::Div(lhs, rhs),
                }
            }
        }
    }
}
