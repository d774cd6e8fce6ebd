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

//! Forward-mode automatic differentiation for the Newton solver.
//!
//! A [`Dual`] carries a value plus partial derivatives with respect to the
//! solve-wide unknown ordering; a [`DualComplex`] composes two real duals with
//! standard complex algebra. Every dual participating in one solve carries a
//! derivative vector of identical length; the engine does not enforce this,
//! the compiler guarantees it by construction.

use nalgebra::DVector;
use num_complex::Complex64;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Real dual number: value plus a derivative vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Dual {
    /// Scalar value.
    pub value: f64,
    /// Partial derivatives, indexed by the solve-wide unknown ordering.
    pub deriv: DVector<f64>,
}

impl Dual {
    /// Creates a constant with a zero derivative vector of length `len`.
    pub fn constant(value: f64, len: usize) -> Self {
        Self {
            value,
            deriv: DVector::zeros(len),
        }
    }

    /// Creates an unknown seeded with a one-hot derivative at `slot`.
    pub fn seeded(value: f64, slot: usize, len: usize) -> Self {
        let mut deriv = DVector::zeros(len);
        deriv[slot] = 1.0;
        Self { value, deriv }
    }

    /// Scales value and derivatives by a plain constant.
    pub fn scale(&self, k: f64) -> Self {
        Self {
            value: self.value * k,
            deriv: &self.deriv * k,
        }
    }

    /// Multiplicative inverse: `(1/v, -d_i/v²)`.
    pub fn recip(&self) -> Self {
        let inv = 1.0 / self.value;
        Self {
            value: inv,
            deriv: &self.deriv * (-inv * inv),
        }
    }

    /// Square root: `(√v, d_i/(2√v))`.
    pub fn sqrt(&self) -> Self {
        let root = self.value.sqrt();
        Self {
            value: root,
            deriv: &self.deriv * (0.5 / root),
        }
    }

    /// Four-quadrant arc tangent of `self` (y) and `x`:
    /// `(atan2(y,x), (x·dy_i − y·dx_i)/(x²+y²))`.
    pub fn atan2(&self, x: &Dual) -> Self {
        let denom = x.value * x.value + self.value * self.value;
        Self {
            value: self.value.atan2(x.value),
            deriv: (&self.deriv * x.value - &x.deriv * self.value) / denom,
        }
    }
}

impl Add<&Dual> for &Dual {
    type Output = Dual;

    fn add(self, rhs: &Dual) -> Dual {
        Dual {
            value: self.value + rhs.value,
            deriv: &self.deriv + &rhs.deriv,
        }
    }
}

impl Sub<&Dual> for &Dual {
    type Output = Dual;

    fn sub(self, rhs: &Dual) -> Dual {
        Dual {
            value: self.value - rhs.value,
            deriv: &self.deriv - &rhs.deriv,
        }
    }
}

impl Mul<&Dual> for &Dual {
    type Output = Dual;

    fn mul(self, rhs: &Dual) -> Dual {
        // Product rule: (ab)' = a·b' + b·a'.
        Dual {
            value: self.value * rhs.value,
            deriv: &rhs.deriv * self.value + &self.deriv * rhs.value,
        }
    }
}

impl Div<&Dual> for &Dual {
    type Output = Dual;

    fn div(self, rhs: &Dual) -> Dual {
        // Division composes as multiplication by the inverse.
        self * &rhs.recip()
    }
}

impl Neg for &Dual {
    type Output = Dual;

    fn neg(self) -> Dual {
        Dual {
            value: -self.value,
            deriv: -&self.deriv,
        }
    }
}

impl Add for Dual {
    type Output = Dual;

    fn add(self, rhs: Dual) -> Dual {
        &self + &rhs
    }
}

impl Sub for Dual {
    type Output = Dual;

    fn sub(self, rhs: Dual) -> Dual {
        &self - &rhs
    }
}

impl Mul for Dual {
    type Output = Dual;

    fn mul(self, rhs: Dual) -> Dual {
        &self * &rhs
    }
}

impl Div for Dual {
    type Output = Dual;

    fn div(self, rhs: Dual) -> Dual {
        &self / &rhs
    }
}

impl Neg for Dual {
    type Output = Dual;

    fn neg(self) -> Dual {
        -&self
    }
}

/// Complex dual number: two real duals composed with complex algebra.
#[derive(Debug, Clone, PartialEq)]
pub struct DualComplex {
    /// Real component.
    pub re: Dual,
    /// Imaginary component.
    pub im: Dual,
}

impl DualComplex {
    /// Creates a constant with zero derivative vectors of length `len`.
    pub fn constant(value: Complex64, len: usize) -> Self {
        Self {
            re: Dual::constant(value.re, len),
            im: Dual::constant(value.im, len),
        }
    }

    /// Creates an unknown whose real part seeds `slot` and whose imaginary
    /// part seeds `slot + 1`.
    pub fn seeded(value: Complex64, slot: usize, len: usize) -> Self {
        Self {
            re: Dual::seeded(value.re, slot, len),
            im: Dual::seeded(value.im, slot + 1, len),
        }
    }

    /// Returns the plain complex value, dropping derivatives.
    pub fn value(&self) -> Complex64 {
        Complex64::new(self.re.value, self.im.value)
    }

    /// Multiplicative inverse via the conjugate over the squared modulus.
    pub fn recip(&self) -> Self {
        let m2 = &self.re * &self.re + &self.im * &self.im;
        Self {
            re: &self.re / &m2,
            im: -(&self.im / &m2),
        }
    }

    /// Principal-branch complex square root.
    ///
    /// Built from the real-dual primitive set: `a = √((|z|+re)/2)` and
    /// `b = im/(2a)`, falling back to `(0, √(-re))` on the negative real
    /// axis where `a` vanishes.
    pub fn sqrt(&self) -> Self {
        let modulus = (&self.re * &self.re + &self.im * &self.im).sqrt();
        let a = (&modulus + &self.re).scale(0.5).sqrt();
        if a.value == 0.0 {
            let len = self.re.deriv.len();
            return Self {
                re: Dual::constant(0.0, len),
                im: (-&self.re).sqrt(),
            };
        }
        let b = &self.im / &a.scale(2.0);
        Self { re: a, im: b }
    }
}

impl Add<&DualComplex> for &DualComplex {
    type Output = DualComplex;

    fn add(self, rhs: &DualComplex) -> DualComplex {
        DualComplex {
            re: &self.re + &rhs.re,
            im: &self.im + &rhs.im,
        }
    }
}

impl Sub<&DualComplex> for &DualComplex {
    type Output = DualComplex;

    fn sub(self, rhs: &DualComplex) -> DualComplex {
        DualComplex {
            re: &self.re - &rhs.re,
            im: &self.im - &rhs.im,
        }
    }
}

impl Mul<&DualComplex> for &DualComplex {
    type Output = DualComplex;

    fn mul(self, rhs: &DualComplex) -> DualComplex {
        // (a+bi)(c+di) = (ac−bd) + (ad+bc)i
        DualComplex {
            re: &self.re * &rhs.re - &self.im * &rhs.im,
            im: &self.re * &rhs.im + &self.im * &rhs.re,
        }
    }
}

impl Div<&DualComplex> for &DualComplex {
    type Output = DualComplex;

    fn div(self, rhs: &DualComplex) -> DualComplex {
        self * &rhs.recip()
    }
}

impl Neg for &DualComplex {
    type Output = DualComplex;

    fn neg(self) -> DualComplex {
        DualComplex {
            re: -&self.re,
            im: -&self.im,
        }
    }
}

impl Add for DualComplex {
    type Output = DualComplex;

    fn add(self, rhs: DualComplex) -> DualComplex {
        &self + &rhs
    }
}

impl Sub for DualComplex {
    type Output = DualComplex;

    fn sub(self, rhs: DualComplex) -> DualComplex {
        &self - &rhs
    }
}

impl Mul for DualComplex {
    type Output = DualComplex;

    fn mul(self, rhs: DualComplex) -> DualComplex {
        &self * &rhs
    }
}

impl Div for DualComplex {
    type Output = DualComplex;

    fn div(self, rhs: DualComplex) -> DualComplex {
        &self / &rhs
    }
}

impl Neg for DualComplex {
    type Output = DualComplex;

    fn neg(self) -> DualComplex {
        -&self
    }
}
