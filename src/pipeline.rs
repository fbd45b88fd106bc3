//! The simulation pipeline.
//!
//! Each stage fully materializes its output before the next stage
//! starts, consuming only the previous stage's rows and its own
//! seeded sub-stream. Re-running with the same seed and reference
//! population reproduces the tables exactly.
//!

use tracing::{info, warn};

use crate::baseline::derive_baselines;
use crate::glucometers::{self, Glucometer};
use crate::glycemia::{stream_for_patient, GlycemiaReading};
use crate::population::{sample_cohort, Patient, PopulationError, ReferencePopulation};
use crate::schedule::{draw_enrollment_window, thin_visits, visit_candidates};
use crate::seeded_rng::make_rng;
use crate::values::{simulate_visit, Appointment};

#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    /// Controls every random draw of the run.
    pub global_seed: u64,
    /// Number of patients to sample from the reference population.
    pub cohort_size: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            global_seed: 42,
            cohort_size: 100,
        }
    }
}

/// The complete dataset of one run, plus counts of the patients that
/// randomness left without dependent rows.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub patients: Vec<Patient>,
    pub glucometers: &'static [Glucometer],
    pub appointments: Vec<Appointment>,
    pub readings: Vec<GlycemiaReading>,
    /// Patients whose every visit was thinned away.
    pub patients_without_visits: usize,
    /// Patients with visits but an empty reading window.
    pub patients_without_readings: usize,
}

/// Run the whole pipeline: cohort sampling, baseline derivation,
/// scheduling, visit values and the at-home reading stream.
pub fn simulate(
    reference: &ReferencePopulation,
    config: &SimulationConfig,
) -> Result<Simulation, PopulationError> {
    let mut population_rng = make_rng(config.global_seed, "population");
    let patients = sample_cohort(&mut population_rng, reference, config.cohort_size)?;
    info!(patients = patients.len(), "sampled cohort");

    let mut baseline_rng = make_rng(config.global_seed, "baseline");
    let baselines = derive_baselines(&mut baseline_rng, &patients);

    let catalog = glucometers::catalog();

    let mut schedule_rng = make_rng(config.global_seed, "schedule");
    let mut candidates = Vec::new();
    for patient in &patients {
        let window = draw_enrollment_window(&mut schedule_rng);
        candidates.extend(visit_candidates(
            &mut schedule_rng,
            patient.patient_id,
            &window,
            catalog,
        ));
    }
    let scheduled = candidates.len();
    let retained = thin_visits(&mut schedule_rng, candidates);
    info!(
        scheduled,
        retained = retained.len(),
        "scheduled visits after thinning"
    );

    let mut values_rng = make_rng(config.global_seed, "values");
    let appointments: Vec<Appointment> = retained
        .iter()
        .map(|visit| {
            simulate_visit(&mut values_rng, visit, &baselines[visit.patient_id as usize])
        })
        .collect();

    let mut stream_rng = make_rng(config.global_seed, "glycemia");
    let mut readings = Vec::new();
    let mut patients_without_visits = 0;
    let mut patients_without_readings = 0;
    for patient in &patients {
        let visits: Vec<Appointment> = appointments
            .iter()
            .filter(|appointment| appointment.patient_id == patient.patient_id)
            .copied()
            .collect();
        if visits.is_empty() {
            patients_without_visits += 1;
            warn!(
                patient_id = patient.patient_id,
                "patient has no appointments after thinning"
            );
            continue;
        }
        let stream = stream_for_patient(&mut stream_rng, &visits);
        if stream.is_empty() {
            patients_without_readings += 1;
            warn!(
                patient_id = patient.patient_id,
                "follow-up too short for at-home readings"
            );
        }
        readings.extend(stream);
    }
    info!(readings = readings.len(), "generated at-home readings");

    Ok(Simulation {
        patients,
        glucometers: catalog,
        appointments,
        readings,
        patients_without_visits,
        patients_without_readings,
    })
}
