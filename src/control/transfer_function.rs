//! Transfer functions in polynomial form
//!
//! A SISO transfer function
//!   H(s) = (b_n s^n + ... + b_0) / (a_n s^n + ... + a_0)
//! is realized in state-space form
//!   dx/dt = Ax + Bu,  y = Cx + Du
//! and advanced with a backward (implicit) Euler step, which stays stable
//! for any positive timestep on the stable filters used by the controller.
//!
//! References:
//! - Ogata, K. (2010). Modern Control Engineering (5th ed.). Section 5.6

use nalgebra::{DMatrix, DVector, RowDVector};

use crate::error::{Error, Result};

/// SISO transfer function realized as a state-space system
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    a: DMatrix<f64>,
    b: DVector<f64>,
    c: RowDVector<f64>,
    d: f64,
    /// Numerator and denominator in descending powers, normalized
    num: Vec<f64>,
    den: Vec<f64>,
}

impl TransferFunction {
    /// Build from numerator and denominator coefficients in descending powers of s
    ///
    /// The realization is the same companion form as scipy's `tf2ss`:
    ///   A = [-a_{n-1} ... -a_0; I 0],  B = e_0,
    ///   C = strictly proper numerator,  D = b_n when the degrees match.
    pub fn new(num: &[f64], den: &[f64]) -> Result<Self> {
        let leading = den.first().copied().unwrap_or(0.0);
        if leading == 0.0 || !leading.is_finite() {
            return Err(Error::InvalidTransferFunction(
                "leading denominator coefficient must be finite and non-zero".into(),
            ));
        }
        if num.is_empty() || num.len() > den.len() {
            return Err(Error::InvalidTransferFunction(format!(
                "improper transfer function (num.len()={}, den.len()={})",
                num.len(),
                den.len()
            )));
        }
        if num.iter().chain(den.iter()).any(|x| !x.is_finite()) {
            return Err(Error::InvalidTransferFunction(
                "coefficients must be finite".into(),
            ));
        }

        let den_norm: Vec<f64> = den.iter().map(|&x| x / leading).collect();
        let mut num_norm = vec![0.0; den.len() - num.len()];
        num_norm.extend(num.iter().map(|&x| x / leading));

        let order = den_norm.len() - 1;
        let d = num_norm[0];

        // Strictly proper part: num - D*den, leading term drops out
        let proper: Vec<f64> = num_norm
            .iter()
            .zip(den_norm.iter())
            .map(|(&n, &a)| n - d * a)
            .collect();

        let mut a = DMatrix::zeros(order, order);
        let mut b = DVector::zeros(order);
        let mut c = RowDVector::zeros(order);

        if order > 0 {
            for j in 0..order {
                a[(0, j)] = -den_norm[j + 1];
                c[j] = proper[j + 1];
            }
            for i in 0..order - 1 {
                a[(i + 1, i)] = 1.0;
            }
            b[0] = 1.0;
        }

        Ok(Self {
            a,
            b,
            c,
            d,
            num: num_norm,
            den: den_norm,
        })
    }

    /// Number of states
    pub fn order(&self) -> usize {
        self.a.nrows()
    }

    /// Value of H(s) at s = 0
    ///
    /// Infinite when the denominator has a pole at the origin.
    pub fn dc_gain(&self) -> f64 {
        let n0 = self.num.last().copied().unwrap_or(0.0);
        let d0 = self.den.last().copied().unwrap_or(0.0);
        if d0 == 0.0 {
            f64::INFINITY
        } else {
            n0 / d0
        }
    }

    /// Zero state vector of the right dimension
    pub fn zero_state(&self) -> DVector<f64> {
        DVector::zeros(self.order())
    }

    /// Equilibrium state for a constant input `u`: solves `A x = -B u`
    ///
    /// Falls back to the zero state when `A` is singular.
    pub fn steady_state(&self, u: f64) -> DVector<f64> {
        if self.order() == 0 {
            return self.zero_state();
        }
        let rhs = -&self.b * u;
        self.a
            .clone()
            .lu()
            .solve(&rhs)
            .unwrap_or_else(|| self.zero_state())
    }

    /// Output `y = Cx + Du`
    pub fn output(&self, state: &DVector<f64>, u: f64) -> f64 {
        let cx = if self.order() == 0 {
            0.0
        } else {
            (&self.c * state)[0]
        };
        cx + self.d * u
    }

    /// Backward Euler step: `x' = (I - dt A)^-1 (x + dt B u)`
    pub fn advance(&self, state: &DVector<f64>, u: f64, dt: f64) -> DVector<f64> {
        let n = self.order();
        if n == 0 {
            return self.zero_state();
        }
        let rhs = state + &self.b * (dt * u);
        let lhs = DMatrix::identity(n, n) - &self.a * dt;
        match lhs.lu().solve(&rhs) {
            Some(next) => next,
            // Singular only for dt equal to a pole time constant; forward Euler instead
            None => state + (&self.a * state + &self.b * u) * dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_order_step_response() {
        // H(s) = 1/(s+1)
        let tf = TransferFunction::new(&[1.0], &[1.0, 1.0]).unwrap();
        assert_eq!(tf.order(), 1);

        let dt = 0.01;
        let mut x = tf.zero_state();
        for _ in 0..500 {
            x = tf.advance(&x, 1.0, dt);
        }

        // After 5 time constants the output is within 1% of the final value
        assert!((tf.output(&x, 1.0) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_dc_gain() {
        // H(s) = 3(2s+1)/((4s+1)(s+1)) = (6s+3)/(4s^2+5s+1)
        let tf = TransferFunction::new(&[6.0, 3.0], &[4.0, 5.0, 1.0]).unwrap();
        assert_relative_eq!(tf.dc_gain(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_passthrough() {
        // H(s) = (s+1)/(s+2): D = 1, initial output with zero state is u
        let tf = TransferFunction::new(&[1.0, 1.0], &[1.0, 2.0]).unwrap();
        assert_relative_eq!(tf.output(&tf.zero_state(), 1.0), 1.0, epsilon = 1e-12);

        // Steady state output is H(0) = 0.5
        let x = tf.steady_state(1.0);
        assert_relative_eq!(tf.output(&x, 1.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_steady_state_is_fixed_point() {
        let tf = TransferFunction::new(&[2.0], &[3.0, 4.0, 1.0]).unwrap();
        let x = tf.steady_state(1.5);
        let next = tf.advance(&x, 1.5, 0.1);
        assert_relative_eq!(next, x, epsilon = 1e-12);
        assert_relative_eq!(tf.output(&x, 1.5), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pure_gain() {
        let tf = TransferFunction::new(&[5.0], &[2.0]).unwrap();
        assert_eq!(tf.order(), 0);
        assert_relative_eq!(tf.output(&tf.zero_state(), 2.0), 5.0, epsilon = 1e-12);
        assert_eq!(tf.advance(&tf.zero_state(), 2.0, 0.1).len(), 0);
    }

    #[test]
    fn test_rejects_improper() {
        assert!(TransferFunction::new(&[1.0, 0.0, 0.0], &[1.0, 1.0]).is_err());
        assert!(TransferFunction::new(&[1.0], &[0.0, 1.0]).is_err());
        assert!(TransferFunction::new(&[f64::NAN], &[1.0, 1.0]).is_err());
    }
}
