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

//! Solved output returned to the caller.

use num_complex::Complex64;

use super::{ExternalVariable, SolveError};

/// Output of a successful solve.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub(crate) source: String,
    pub(crate) variables: Vec<ExternalVariable>,
    pub(crate) values: Vec<(String, Complex64)>,
    pub(crate) iterations: usize,
    pub(crate) residual: f64,
}

impl SolveResult {
    /// Returns the source text with solved values patched in place.
    ///
    /// Comments, formatting, and locked declarations are byte-identical to
    /// the input; only unknown declarations' numeric spans are rewritten.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the updated externally supplied variable definitions.
    ///
    /// Locked entries pass through their original value; unknown entries
    /// carry the solved value.
    pub fn variables(&self) -> &[ExternalVariable] {
        &self.variables
    }

    /// Returns the solved value for a variable by name.
    pub fn value(&self, name: &str) -> Result<Complex64, SolveError> {
        self.values
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| SolveError::MissingValue(name.to_string()))
    }

    /// Returns the real part of a solved value by name.
    pub fn real(&self, name: &str) -> Result<f64, SolveError> {
        Ok(self.value(name)?.re)
    }

    /// Returns the number of Newton steps taken.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns the final residual norm.
    pub fn residual(&self) -> f64 {
        self.residual
    }
}
