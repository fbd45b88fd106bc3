//! Per-patient physiological baselines.
//!
//! Height and body-mass index are drawn from sex-conditioned normal
//! distributions and combined into a baseline weight. The two draws
//! are independent but share the sex conditioning, which is enough to
//! produce plausible (not causally modelled) height/weight pairs.
//! The baseline weight is a hidden intermediate: it seeds the noisy
//! per-visit weight measurements but is never emitted itself.
//!

use rand_chacha::ChaCha8Rng;

use crate::dist::{round_dp1, BoundedNormal};
use crate::population::{Patient, Sex};

/// Distribution parameters for one sex category. Kept as a lookup
/// table rather than inline branches so that adding categories or
/// attributes only means adding rows here.
#[derive(Debug, Clone, Copy)]
struct BaselineParams {
    height_cm: BoundedNormal,
    bmi: BoundedNormal,
    weight_min_kg: f64,
    weight_max_kg: f64,
}

const MALE_PARAMS: BaselineParams = BaselineParams {
    height_cm: BoundedNormal::new(178.0, 7.0, 150.0, 200.0),
    bmi: BoundedNormal::new(26.0, 3.0, f64::NEG_INFINITY, f64::INFINITY),
    weight_min_kg: 50.0,
    weight_max_kg: 160.0,
};

const FEMALE_PARAMS: BaselineParams = BaselineParams {
    height_cm: BoundedNormal::new(165.0, 6.0, 145.0, 185.0),
    bmi: BoundedNormal::new(25.0, 4.0, f64::NEG_INFINITY, f64::INFINITY),
    weight_min_kg: 40.0,
    weight_max_kg: 140.0,
};

fn params(sex: Sex) -> &'static BaselineParams {
    match sex {
        Sex::Male => &MALE_PARAMS,
        Sex::Female => &FEMALE_PARAMS,
    }
}

/// A patient's latent physiological reference values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    /// Clipped to the sex-conditioned range and rounded to whole cm.
    pub height_cm: i64,
    /// Mean weight in kg, one decimal. Seeds the per-visit weights.
    pub weight_kg: f64,
}

/// Height and weight bounds for a sex, as used by the derivation.
/// Exposed for the invariant checks in the tests.
pub fn height_bounds(sex: Sex) -> (f64, f64) {
    let params = params(sex);
    (params.height_cm.min, params.height_cm.max)
}

pub fn weight_bounds(sex: Sex) -> (f64, f64) {
    let params = params(sex);
    (params.weight_min_kg, params.weight_max_kg)
}

/// Derive one baseline conditioned on `sex`.
pub fn derive_baseline(rng: &mut ChaCha8Rng, sex: Sex) -> Baseline {
    let params = params(sex);
    let height_cm = params.height_cm.sample(rng).round() as i64;
    let bmi = params.bmi.sample(rng);
    let height_m = height_cm as f64 / 100.0;
    let weight_kg = (bmi * height_m * height_m).clamp(params.weight_min_kg, params.weight_max_kg);
    Baseline {
        height_cm,
        weight_kg: round_dp1(weight_kg),
    }
}

/// Derive baselines for the whole cohort, indexed by `patient_id`.
pub fn derive_baselines(rng: &mut ChaCha8Rng, patients: &[Patient]) -> Vec<Baseline> {
    patients
        .iter()
        .map(|patient| derive_baseline(rng, patient.sex))
        .collect()
}
