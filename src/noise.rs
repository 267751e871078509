//! Inflow noise injection
//!
//! Gaussian samples are produced with the Box-Muller transform from two
//! uniform draws taken from an injectable [`UniformSource`], so tests can
//! substitute a deterministic sequence.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};

use crate::utils::constants::{lpm_to_m3s, max_inflow, NOISE_STD_DEV_LPM};

/// Source of uniform samples in `[0, 1)`
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

/// Uniform source backed by a seedable `StdRng`
///
/// # Example
///
/// ```
/// use tanksim::noise::{RngSource, UniformSource};
///
/// let mut a = RngSource::new(Some(42));
/// let mut b = RngSource::new(Some(42));
/// assert_eq!(a.next_uniform(), b.next_uniform());
/// ```
#[derive(Debug, Clone)]
pub struct RngSource {
    rng: StdRng,
    distribution: Uniform<f64>,
}

impl RngSource {
    /// Create a source with an optional seed; `None` seeds from entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        Self {
            rng,
            distribution: Uniform::new(0.0, 1.0),
        }
    }
}

impl Default for RngSource {
    fn default() -> Self {
        Self::new(None)
    }
}

impl UniformSource for RngSource {
    fn next_uniform(&mut self) -> f64 {
        self.distribution.sample(&mut self.rng)
    }
}

/// Standard normal sample via Box-Muller
///
/// The first draw is mapped to `1 - u`, in `(0, 1]`, so the logarithm is
/// always finite even when the source returns exactly 0.
pub fn gaussian<S: UniformSource + ?Sized>(source: &mut S) -> f64 {
    let u1 = 1.0 - source.next_uniform();
    let u2 = source.next_uniform();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Perturb an inflow (m³/s) with Gaussian noise scaled by `intensity`
///
/// The standard deviation is [`NOISE_STD_DEV_LPM`] converted to m³/s. The
/// result is clamped to `[0, MAX_INFLOW]`. A non-positive intensity returns
/// `inflow` untouched and consumes no samples.
pub fn add_noise_to_inflow<S: UniformSource + ?Sized>(inflow: f64, intensity: f64, source: &mut S) -> f64 {
    if intensity <= 0.0 || !intensity.is_finite() {
        return inflow;
    }
    let noise = gaussian(source) * lpm_to_m3s(NOISE_STD_DEV_LPM) * intensity;
    (inflow + noise).clamp(0.0, max_inflow())
}
