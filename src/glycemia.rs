//! At-home glycemia reading stream.
//!
//! Three readings per day at a nominal 08:00/14:00/20:00 cadence,
//! jittered by a few minutes, spanning the days strictly between a
//! patient's first and last clinic visit. Readings reuse the device
//! of the earliest visit: once a patient starts self-monitoring they
//! keep the glucometer they were first handed.
//!

use chrono::{Duration, NaiveDateTime};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::values::{Appointment, GLYCEMIA_MG_DL};

/// Nominal reading times, hours since midnight.
pub const READING_HOURS: [u32; 3] = [8, 14, 20];

/// Spread of the minute jitter around each nominal time.
pub const JITTER_SD_MINUTES: f64 = 5.0;

/// One at-home reading, as emitted in the glycemia table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlycemiaReading {
    pub patient_id: i64,
    pub date: NaiveDateTime,
    pub gm_id: i64,
    pub glycemia: f64,
}

/// Generate the reading stream for one patient from that patient's
/// retained visits. The stream covers one calendar day per 24 h tick
/// inside [first visit + 24 h, last visit - 24 h]; when that window
/// is empty or inverted the patient contributes no readings.
///
/// All rows of `visits` must belong to the same patient.
pub fn stream_for_patient(rng: &mut ChaCha8Rng, visits: &[Appointment]) -> Vec<GlycemiaReading> {
    let Some(first) = visits.iter().min_by_key(|visit| visit.date) else {
        return Vec::new();
    };
    let last = visits
        .iter()
        .map(|visit| visit.date)
        .max()
        .expect("visits is non-empty");
    let patient_id = first.patient_id;
    let gm_id = first.gm_id;

    let window_start = first.date + Duration::hours(24);
    let window_end = last - Duration::hours(24);
    let jitter = Normal::new(0.0, JITTER_SD_MINUTES)
        .expect("standard deviation must be finite and non-negative");

    let mut readings = Vec::new();
    let mut tick = window_start;
    while tick <= window_end {
        let day = tick.date();
        for hour in READING_HOURS {
            let nominal = day
                .and_hms_opt(hour, 0, 0)
                .expect("nominal reading time is a valid time");
            // Truncation toward zero keeps whole minutes, so jitter
            // can shift a reading across the day boundary but never
            // by fractional minutes.
            let minutes = jitter.sample(rng) as i64;
            readings.push(GlycemiaReading {
                patient_id,
                date: nominal + Duration::minutes(minutes),
                gm_id,
                glycemia: GLYCEMIA_MG_DL.sample(rng),
            });
        }
        tick += Duration::hours(24);
    }
    readings
}
