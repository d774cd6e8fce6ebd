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

//! Newton iteration and residual evaluation.

use nalgebra::{DMatrix, DVector};

use super::patch::patch_source;
use super::{
    BoundExpr, ExternalVariable, Model, ResidualIssue, SolveError, SolveFailureReport,
    SolveResult, Variable,
};
use crate::dual::DualComplex;

/// Tuning knobs for the damped Newton iteration.
#[derive(Debug, Clone)]
pub struct NewtonSettings {
    /// Residual norm below which the solve is accepted.
    pub tolerance: f64,
    /// Hard cap on the number of Newton steps.
    pub max_iterations: usize,
    /// Damping factor floor; dropping below it fails the solve.
    pub damping_floor: f64,
    /// Multiplier applied to the damping factor after a non-improving step.
    pub damping_shrink: f64,
    /// A step counts as improving only when it shrinks the residual to below
    /// this fraction of the previous one.
    pub improvement_ratio: f64,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-14,
            max_iterations: 100,
            damping_floor: 0.1,
            damping_shrink: 0.9,
            improvement_ratio: 0.99,
        }
    }
}

struct NewtonOutcome {
    iterations: usize,
    residual: f64,
}

impl Model {
    /// Solves the system with default Newton settings.
    pub fn solve(&self) -> Result<SolveResult, SolveError> {
        self.solve_with(&NewtonSettings::default())
    }

    /// Runs damped Newton iteration, then patches solved values back into the
    /// source text.
    ///
    /// The model itself is never mutated; every invocation works on a fresh
    /// copy of the variable table. On failure the source text stays untouched.
    pub fn solve_with(&self, settings: &NewtonSettings) -> Result<SolveResult, SolveError> {
        let mut variables = self.variables.clone();
        let outcome = self.run_newton(&mut variables, settings)?;

        let source = patch_source(&self.source, &variables[self.external_count..]);
        let externals = variables[..self.external_count]
            .iter()
            .map(|variable| ExternalVariable {
                name: variable.name.clone(),
                value: variable.value,
                locked: variable.locked,
                si_prefix_factor: variable.prefix_factor(),
            })
            .collect();
        let values = variables
            .iter()
            .map(|variable| (variable.name.clone(), variable.value))
            .collect();

        Ok(SolveResult {
            source,
            variables: externals,
            values,
            iterations: outcome.iterations,
            residual: outcome.residual,
        })
    }

    fn run_newton(
        &self,
        variables: &mut [Variable],
        settings: &NewtonSettings,
    ) -> Result<NewtonOutcome, SolveError> {
        let rows = self.equations.len() * 2;
        let mut damping = 1.0_f64;
        let mut previous_error = f64::INFINITY;
        let mut iterations = 0_usize;

        loop {
            // Assemble the Jacobian and negated residual vector. Every
            // equation contributes a real and an imaginary row.
            let mut jacobian = DMatrix::<f64>::zeros(rows, self.unknown_len);
            let mut negated = DVector::<f64>::zeros(rows);
            let mut magnitudes = vec![0.0_f64; self.equations.len()];
            for (index, equation) in self.equations.iter().enumerate() {
                let value = self.evaluate(&equation.residual, variables);
                let re_row = index * 2;
                let im_row = re_row + 1;
                for col in 0..self.unknown_len {
                    jacobian[(re_row, col)] = value.re.deriv[col];
                    jacobian[(im_row, col)] = value.im.deriv[col];
                }
                negated[re_row] = -value.re.value;
                negated[im_row] = -value.im.value;
                magnitudes[index] = value.value().norm();
            }

            let error = negated.norm();
            if error < settings.tolerance {
                return Ok(NewtonOutcome {
                    iterations,
                    residual: error,
                });
            }
            if iterations >= settings.max_iterations {
                return Err(SolveError::NoConvergence(self.failure_report(
                    iterations,
                    error,
                    damping,
                    &magnitudes,
                )));
            }

            // Every step is accepted; a non-improving one only shrinks the
            // damping factor used from the next step on.
            if error >= settings.improvement_ratio * previous_error {
                damping *= settings.damping_shrink;
                if damping < settings.damping_floor {
                    return Err(SolveError::NoConvergence(self.failure_report(
                        iterations,
                        error,
                        damping,
                        &magnitudes,
                    )));
                }
            }
            previous_error = error;

            let delta = self.solve_linear_step(jacobian, &negated)?;
            for variable in variables.iter_mut() {
                if let Some(slot) = variable.slot {
                    variable.value.re += damping * delta[slot];
                    variable.value.im += damping * delta[slot + 1];
                }
            }
            iterations += 1;
        }
    }

    /// Solves `J·δ = -r`, exactly for square systems, least-squares otherwise.
    fn solve_linear_step(
        &self,
        jacobian: DMatrix<f64>,
        negated: &DVector<f64>,
    ) -> Result<DVector<f64>, SolveError> {
        if jacobian.ncols() == 0 {
            // Every variable is locked; a nonzero residual cannot move.
            return Err(SolveError::Numerical("system has no unknowns".to_string()));
        }
        if jacobian.nrows() == jacobian.ncols() {
            jacobian
                .lu()
                .solve(negated)
                .ok_or_else(|| SolveError::Numerical("Jacobian is singular".to_string()))
        } else {
            // A non-square system indicates a modeling mismatch; a
            // least-squares step is still attempted.
            jacobian
                .svd(true, true)
                .solve(negated, f64::EPSILON)
                .map_err(|message| SolveError::Numerical(message.to_string()))
        }
    }

    /// Evaluates a lowered expression against current variable values.
    fn evaluate(&self, expr: &BoundExpr, variables: &[Variable]) -> DualComplex {
        match expr {
            BoundExpr::Const(value) => DualComplex::constant(*value, self.unknown_len),
            BoundExpr::Var(index) => {
                let variable = &variables[*index];
                match variable.slot {
                    Some(slot) => DualComplex::seeded(variable.value, slot, self.unknown_len),
                    None => DualComplex::constant(variable.value, self.unknown_len),
                }
            }
            BoundExpr::Add(l, r) => self.evaluate(l, variables) + self.evaluate(r, variables),
            BoundExpr::Sub(l, r) => self.evaluate(l, variables) - self.evaluate(r, variables),
            BoundExpr::Mul(l, r) => self.evaluate(l, variables) * self.evaluate(r, variables),
            BoundExpr::Div(l, r) => self.evaluate(l, variables) / self.evaluate(r, variables),
            BoundExpr::Call(builtin, args) => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.evaluate(arg, variables));
                }
                builtin.apply(&values)
            }
        }
    }

    fn failure_report(
        &self,
        iterations: usize,
        error: f64,
        damping: f64,
        magnitudes: &[f64],
    ) -> SolveFailureReport {
        let mut ranked: Vec<(usize, f64)> = magnitudes.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut worst = Vec::new();
        for (equation_index, magnitude) in ranked.into_iter().take(8) {
            let origin = &self.equations[equation_index].origin;
            worst.push(ResidualIssue {
                equation_index,
                magnitude,
                description: origin.description.clone(),
                line: origin.line,
                column: origin.column,
                snippet: origin.snippet.clone(),
                pointer: origin.pointer.clone(),
            });
        }

        SolveFailureReport {
            iterations,
            error,
            damping,
            equation_count: self.equations.len(),
            unknown_count: self.unknown_len,
            worst,
        }
    }
}
