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

//! Expansion of equation-definition invocations.

use super::*;

impl LowerContext<'_> {
    /// Expands one equation-definition invocation (`name(args...);`).
    ///
    /// The definition's body equations are lowered in place, depth-first,
    /// with bound parameters shadowing outer names.
    pub(super) fn lower_equation_call(&mut self, call: &CallExpr) {
        let Some(def) = self.defs.get(&call.name).cloned() else {
            self.error_at(
                format!("Unknown equation definition '{}'", call.name),
                &call.span,
            );
            return;
        };

        if self.call_stack.iter().any(|name| name == &def.name) {
            self.error_at(
                format!("Recursive invocation of equation definition '{}'", def.name),
                &call.span,
            );
            return;
        }

        let Some(bound) = self.bind_arguments(&def, call) else {
            return;
        };

        self.call_stack.push(def.name.clone());
        self.push_scope(bound);
        for equation in &def.body {
            self.lower_equation(equation);
        }
        self.pop_scope();
        let _ = self.call_stack.pop();
    }

    /// Binds positional-then-named arguments against the declared parameters.
    ///
    /// The bound name set must exactly equal the declared parameter set; on
    /// any mismatch the diagnostics are recorded and the call is not
    /// expanded.
    fn bind_arguments(
        &mut self,
        def: &EquationDef,
        call: &CallExpr,
    ) -> Option<HashMap<String, BoundExpr>> {
        if call.positional.len() > def.params.len() {
            self.error_at(
                format!(
                    "'{}' declares {} parameter(s), found {} positional argument(s)",
                    def.name,
                    def.params.len(),
                    call.positional.len()
                ),
                &call.span,
            );
            return None;
        }

        // Arguments are lowered in the caller's scope, before the parameter
        // scope is pushed.
        let mut bound = HashMap::new();
        for (param, arg) in def.params.iter().zip(call.positional.iter()) {
            let value = self.lower_expr(arg);
            bound.insert(param.name.clone(), value);
        }

        let mut complete = true;
        for named in &call.named {
            if !def.params.iter().any(|param| param.name == named.name) {
                self.error_at(
                    format!("Unknown parameter '{}' for '{}'", named.name, def.name),
                    &named.span,
                );
                complete = false;
                continue;
            }
            if bound.contains_key(&named.name) {
                self.error_at(
                    format!(
                        "Parameter '{}' of '{}' is bound more than once",
                        named.name, def.name
                    ),
                    &named.span,
                );
                complete = false;
                continue;
            }
            let value = self.lower_expr(&named.value);
            bound.insert(named.name.clone(), value);
        }

        let missing: Vec<String> = def
            .params
            .iter()
            .filter(|param| !bound.contains_key(&param.name))
            .map(|param| format!("'{}'", param.name))
            .collect();
        if !missing.is_empty() {
            self.error_at(
                format!(
                    "Missing argument(s) for parameter(s) {} of '{}'",
                    missing.join(", "),
                    def.name
                ),
                &call.span,
            );
            complete = false;
        }

        complete.then_some(bound)
    }
}
