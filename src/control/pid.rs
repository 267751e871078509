//! Discrete PID / PI control law
//!
//! Gain-time (ISA) parameterization:
//!
//! ```text
//! u = Kc * ( e + (1/Ti) ∫e dt + Td de/dt )
//! ```
//!
//! The integral is a rectangular sum updated before the output is computed,
//! and the derivative is a backward difference against the previous error.

use serde::{Deserialize, Serialize};

/// Contributions of each term to the controller output (%)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PidComponents {
    pub proportional: f64,
    pub integral: f64,
    pub derivative: f64,
    /// Sum of all feedforward terms, present only with feedforward control
    pub feedforward: Option<f64>,
}

impl PidComponents {
    /// Unclamped controller output
    pub fn total(&self) -> f64 {
        self.proportional + self.integral + self.derivative + self.feedforward.unwrap_or(0.0)
    }
}

/// Integral and derivative memory carried between ticks
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PidMemory {
    pub error_sum: f64,
    pub last_error: f64,
}

/// PID law with gains `kc`, `ti`, `td`
///
/// `ti <= 0` disables integral action (the integral time is a divisor), and
/// `derivative = false` gives a PI controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidLaw {
    pub kc: f64,
    pub ti: f64,
    pub td: f64,
    pub derivative: bool,
}

impl PidLaw {
    /// Full PID
    pub fn pid(kc: f64, ti: f64, td: f64) -> Self {
        Self {
            kc,
            ti,
            td,
            derivative: true,
        }
    }

    /// PI, derivative time ignored
    pub fn pi(kc: f64, ti: f64) -> Self {
        Self {
            kc,
            ti,
            td: 0.0,
            derivative: false,
        }
    }

    /// True when the integral term contributes
    pub fn has_integral(&self) -> bool {
        self.ti > 0.0
    }

    /// Evaluate one tick for `error`, returning the terms and the next memory
    pub fn evaluate(&self, memory: PidMemory, error: f64, dt: f64) -> (PidComponents, PidMemory) {
        let error_sum = memory.error_sum + error * dt;

        let proportional = self.kc * error;

        let integral = if self.has_integral() {
            self.kc * error_sum / self.ti
        } else {
            0.0
        };

        let derivative = if self.derivative && dt > 0.0 {
            self.kc * self.td * (error - memory.last_error) / dt
        } else {
            0.0
        };

        let components = PidComponents {
            proportional,
            integral,
            derivative,
            feedforward: None,
        };

        let next = PidMemory {
            error_sum,
            last_error: error,
        };

        (components, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_proportional_only() {
        let law = PidLaw::pid(2.0, 0.0, 0.0);
        let (terms, _) = law.evaluate(PidMemory::default(), 1.5, 0.1);
        assert_eq!(terms.proportional, 3.0);
        assert_eq!(terms.integral, 0.0);
        assert_eq!(terms.derivative, 0.0);
        assert_eq!(terms.total(), 3.0);
    }

    #[test]
    fn test_integral_accumulates() {
        let law = PidLaw::pi(1.0, 2.0);
        let dt = 0.1;
        let mut memory = PidMemory::default();
        let mut terms = PidComponents::default();

        // Constant error of 1.0 for 1 second
        for _ in 0..10 {
            (terms, memory) = law.evaluate(memory, 1.0, dt);
        }

        assert_relative_eq!(memory.error_sum, 1.0, epsilon = 1e-12);
        // Kc * sum / Ti = 1.0 * 1.0 / 2.0
        assert_relative_eq!(terms.integral, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_integral_time_disables_integral() {
        let law = PidLaw::pi(1.0, 0.0);
        let (terms, memory) = law.evaluate(PidMemory::default(), 1.0, 0.1);
        assert!(terms.integral.is_finite());
        assert_eq!(terms.integral, 0.0);
        // The sum still tracks the error history
        assert_relative_eq!(memory.error_sum, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_derivative_backward_difference() {
        let law = PidLaw::pid(2.0, 0.0, 0.5);
        let memory = PidMemory {
            error_sum: 0.0,
            last_error: 0.2,
        };
        let (terms, next) = law.evaluate(memory, 0.3, 0.1);
        // Kc * Td * (0.3 - 0.2) / 0.1 = 2 * 0.5 * 1.0
        assert_relative_eq!(terms.derivative, 1.0, epsilon = 1e-12);
        assert_eq!(next.last_error, 0.3);
    }

    #[test]
    fn test_pi_has_no_derivative() {
        let law = PidLaw::pi(2.0, 10.0);
        let (terms, _) = law.evaluate(PidMemory::default(), 5.0, 0.1);
        assert_eq!(terms.derivative, 0.0);
    }

    #[test]
    fn test_zero_dt_skips_derivative() {
        let law = PidLaw::pid(1.0, 1.0, 1.0);
        let (terms, _) = law.evaluate(PidMemory::default(), 1.0, 0.0);
        assert!(terms.derivative.is_finite());
        assert_eq!(terms.derivative, 0.0);
    }
}
