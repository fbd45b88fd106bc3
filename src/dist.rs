//! Bounded normal sampling used by every measurement simulator.
//!
//! Clipping a sampled value to a realistic range is the intended
//! fidelity control of the simulation, not an error condition, so
//! the bounds live next to the mean and standard deviation in a
//! single parameter struct that can be declared as a constant.
//!

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// A normal distribution together with the clipping range applied
/// to every draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedNormal {
    pub mean: f64,
    pub sd: f64,
    pub min: f64,
    pub max: f64,
}

impl BoundedNormal {
    pub const fn new(mean: f64, sd: f64, min: f64, max: f64) -> Self {
        Self { mean, sd, min, max }
    }

    /// Draw one value and clip it to [min, max]. A standard
    /// deviation of zero always yields the (clipped) mean.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        let normal = Normal::new(self.mean, self.sd)
            .expect("standard deviation must be finite and non-negative");
        normal.sample(rng).clamp(self.min, self.max)
    }
}

/// Round to one decimal place (the resolution of the scales used
/// for weight measurements).
pub fn round_dp1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
