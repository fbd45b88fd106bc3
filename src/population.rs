//! Reference population loading, eligibility filtering and weighted
//! cohort sampling.
//!
//! The reference table comes from national birth statistics: one row
//! per (first name, birth year, sex) with the number of births as the
//! sampling weight. The cohort is drawn from it with replacement, so
//! the same reference row may back several distinct synthetic
//! patients.
//!

use chrono::{Duration, NaiveDate};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use thiserror::Error;

/// Eligible birth years: outside this range the source statistics are
/// too sparse to be useful.
pub const MIN_BIRTH_YEAR: i32 = 1926;
pub const MAX_BIRTH_YEAR: i32 = 1997;

/// Biological sex as coded in the reference table (1 = male,
/// 2 = female).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "i64")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// The 1/2 integer coding used in the reference table and in the
    /// emitted patients table.
    pub fn code(self) -> i64 {
        match self {
            Sex::Male => 1,
            Sex::Female => 2,
        }
    }
}

impl TryFrom<i64> for Sex {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Sex::Male),
            2 => Ok(Sex::Female),
            _ => Err(format!("Unrecognised sex code {code}")),
        }
    }
}

/// One row of the reference population table. The serde renames map
/// the column names of the source csv (periode;prenom;sexe;valeur).
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceRow {
    #[serde(rename = "prenom")]
    pub name: String,
    #[serde(rename = "periode")]
    pub birth_year: i32,
    #[serde(rename = "sexe")]
    pub sex: Sex,
    #[serde(rename = "valeur")]
    pub weight: f64,
}

/// The in-memory reference population handed over by the boundary
/// reader.
#[derive(Debug, Clone)]
pub struct ReferencePopulation {
    rows: Vec<ReferenceRow>,
}

impl ReferencePopulation {
    pub fn new(rows: Vec<ReferenceRow>) -> Self {
        Self { rows }
    }

    /// Rows surviving the eligibility filter: birth year in range and
    /// a name made only of plain ASCII letters (and hyphens for
    /// compound names). The name restriction is a data-cleanliness
    /// normalization of the source, which mixes encodings for
    /// accented characters.
    fn eligible(&self) -> Vec<&ReferenceRow> {
        self.rows
            .iter()
            .filter(|row| {
                (MIN_BIRTH_YEAR..=MAX_BIRTH_YEAR).contains(&row.birth_year)
                    && !row.name.is_empty()
                    && row
                        .name
                        .chars()
                        .all(|c| c.is_ascii_alphabetic() || c == '-')
            })
            .collect()
    }
}

/// Fatal input problems detected before any sampling begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PopulationError {
    #[error("reference population is empty after eligibility filtering")]
    EmptyAfterFilter,
    #[error("reference population has no strictly positive sampling weight")]
    NonPositiveWeights,
}

/// A synthetic patient of the cohort. Immutable once sampled; later
/// stages only ever read it.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    /// 0-based draw order, dense in [0, cohort size).
    pub patient_id: i64,
    pub name: String,
    pub sex: Sex,
    pub birthdate: NaiveDate,
}

/// Draw a cohort of `cohort_size` patients from the reference
/// population, with replacement, weighted by the reference row
/// weights.
pub fn sample_cohort(
    rng: &mut ChaCha8Rng,
    reference: &ReferencePopulation,
    cohort_size: usize,
) -> Result<Vec<Patient>, PopulationError> {
    let eligible = reference.eligible();
    if eligible.is_empty() {
        return Err(PopulationError::EmptyAfterFilter);
    }
    let weights: Vec<f64> = eligible.iter().map(|row| row.weight).collect();
    let valid = weights.iter().all(|w| w.is_finite() && *w >= 0.0)
        && weights.iter().sum::<f64>() > 0.0;
    if !valid {
        return Err(PopulationError::NonPositiveWeights);
    }
    let index =
        WeightedIndex::new(&weights).map_err(|_| PopulationError::NonPositiveWeights)?;

    let mut patients = Vec::with_capacity(cohort_size);
    for patient_id in 0..cohort_size {
        let row = eligible[index.sample(rng)];
        patients.push(Patient {
            patient_id: patient_id as i64,
            name: row.name.clone(),
            sex: row.sex,
            birthdate: random_birthdate(rng, row.birth_year),
        });
    }
    Ok(patients)
}

/// Spread birthdates over the birth year by adding a uniform second
/// offset to Jan 1 and truncating back to day resolution.
fn random_birthdate(rng: &mut ChaCha8Rng, birth_year: i32) -> NaiveDate {
    let jan_first = NaiveDate::from_ymd_opt(birth_year, 1, 1)
        .expect("January 1st exists in every year")
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time");
    let offset = rng.gen_range(0..365 * 24 * 3600);
    (jan_first + Duration::seconds(offset)).date()
}
