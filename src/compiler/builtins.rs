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

//! Lowering for builtin expression functions.

use super::*;

impl LowerContext<'_> {
    /// Lowers a value-level function call.
    ///
    /// Supported builtins:
    /// - `sqrt(x)`
    /// - `atan2(y, x)`
    ///
    /// Builtins take positional arguments only.
    pub(super) fn lower_value_call(&mut self, call: &CallExpr) -> BoundExpr {
        let Some(builtin) = Builtin::lookup(&call.name) else {
            self.error_at(format!("Unknown function '{}'", call.name), &call.span);
            return placeholder();
        };

        if let Some(named) = call.named.first() {
            self.error_at(
                format!("'{}' does not take named arguments", builtin.name()),
                &named.span,
            );
            return placeholder();
        }

        if call.positional.len() != builtin.arity() {
            self.error_at(
                format!(
                    "'{}' expects exactly {} argument(s), found {}",
                    builtin.name(),
                    builtin.arity(),
                    call.positional.len()
                ),
                &call.span,
            );
            return placeholder();
        }

        let mut args = Vec::with_capacity(call.positional.len());
        for arg in &call.positional {
            args.push(self.lower_expr(arg));
        }
        BoundExpr::Call(builtin, args)
    }
}
