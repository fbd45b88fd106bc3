//! Measurement values for retained clinic visits.
//!
//! Draws are independent across visits: a patient's glycemia and
//! blood pressure do not autocorrelate over their visit history.
//! That is a deliberate simplification of the simulation.
//!

use chrono::NaiveDateTime;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::baseline::Baseline;
use crate::dist::{round_dp1, BoundedNormal};
use crate::schedule::ScheduledVisit;

/// Capillary glycemia in mg/dL. The population has more variance
/// than the textbook 70-110 fasting range.
pub const GLYCEMIA_MG_DL: BoundedNormal = BoundedNormal::new(95.0, 15.0, 60.0, 250.0);

/// Blood pressure in mmHg.
pub const SYSTOLIC_MM_HG: BoundedNormal = BoundedNormal::new(125.0, 15.0, 90.0, 200.0);
pub const DIASTOLIC_MM_HG: BoundedNormal = BoundedNormal::new(80.0, 10.0, 50.0, 130.0);

/// Day-to-day fluctuation around the baseline weight. Deliberately
/// not re-clipped against the baseline bounds: a measured weight may
/// drift slightly outside them.
pub const WEIGHT_NOISE_SD_KG: f64 = 1.0;

/// One clinic visit with its measurements, as emitted in the
/// appointments table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appointment {
    pub patient_id: i64,
    pub date: NaiveDateTime,
    /// Baseline height in cm; constant across a patient's visits.
    pub height: i64,
    /// Measured weight in kg, one decimal.
    pub weight: f64,
    pub gm_id: i64,
    pub glycemia: f64,
    pub bp_sys: f64,
    pub bp_dia: f64,
}

/// Simulate the measurements of one retained visit.
pub fn simulate_visit(
    rng: &mut ChaCha8Rng,
    visit: &ScheduledVisit,
    baseline: &Baseline,
) -> Appointment {
    let weight_noise = Normal::new(0.0, WEIGHT_NOISE_SD_KG)
        .expect("standard deviation must be finite and non-negative")
        .sample(rng);
    Appointment {
        patient_id: visit.patient_id,
        date: visit.date,
        height: baseline.height_cm,
        weight: round_dp1(baseline.weight_kg + weight_noise),
        gm_id: visit.gm_id,
        glycemia: GLYCEMIA_MG_DL.sample(rng),
        bp_sys: SYSTOLIC_MM_HG.sample(rng).round(),
        bp_dia: DIASTOLIC_MM_HG.sample(rng).round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeded_rng::make_rng;
    use chrono::NaiveDate;

    fn visit_example() -> ScheduledVisit {
        ScheduledVisit {
            patient_id: 12,
            date: NaiveDate::from_ymd_opt(2017, 6, 3)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            gm_id: 4,
        }
    }

    fn baseline_example() -> Baseline {
        Baseline {
            height_cm: 171,
            weight_kg: 72.4,
        }
    }

    #[test]
    fn identity_columns_come_from_the_scheduled_visit() {
        let mut rng = make_rng(11, "values");
        let appointment = simulate_visit(&mut rng, &visit_example(), &baseline_example());
        assert_eq!(appointment.patient_id, 12);
        assert_eq!(appointment.date, visit_example().date);
        assert_eq!(appointment.gm_id, 4);
        assert_eq!(appointment.height, 171);
    }

    #[test]
    fn measurements_respect_the_clinical_ranges() {
        let mut rng = make_rng(11, "values");
        for _ in 0..5_000 {
            let appointment = simulate_visit(&mut rng, &visit_example(), &baseline_example());
            assert!((60.0..=250.0).contains(&appointment.glycemia));
            assert!((90.0..=200.0).contains(&appointment.bp_sys));
            assert!((50.0..=130.0).contains(&appointment.bp_dia));
            assert_eq!(appointment.bp_sys, appointment.bp_sys.round());
            assert_eq!(appointment.bp_dia, appointment.bp_dia.round());
        }
    }

    #[test]
    fn weight_fluctuates_around_the_baseline() {
        let mut rng = make_rng(11, "values");
        let baseline = baseline_example();
        for _ in 0..5_000 {
            let appointment = simulate_visit(&mut rng, &visit_example(), &baseline);
            // 6 sigma around the baseline mean.
            assert!((appointment.weight - baseline.weight_kg).abs() < 6.0 * WEIGHT_NOISE_SD_KG);
            let tenths = appointment.weight * 10.0;
            assert!((tenths - tenths.round()).abs() < 1e-9);
        }
    }
}
