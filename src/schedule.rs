//! Per-patient enrollment windows and the monthly visit schedule.
//!
//! Every patient gets a random enrollment window inside the campaign
//! interval, one visit candidate per enrolled month, and then a
//! global random thinning that models missed visits. Thinning is a
//! realism knob, not an error: a short-enrollment patient can lose
//! every visit, and the pipeline only counts and logs those.
//!

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::glucometers::Glucometer;

/// Patients enroll somewhere in 2015-01-01..=2020-01-01 and are
/// followed until 2020-12-31 at the latest.
fn campaign_enrollment_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).expect("valid campaign date")
}

fn campaign_enrollment_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid campaign date")
}

fn campaign_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 12, 31).expect("valid campaign date")
}

/// Minimum enrollment length, guaranteeing at least one monthly
/// candidate in every window.
pub const MIN_ENROLLMENT_DAYS: i64 = 32;

/// Probability that a scheduled visit actually happens.
pub const RETENTION_PROBABILITY: f64 = 0.9;

/// Visits are perturbed by up to this many days past the nominal
/// month start.
pub const MAX_DAY_OFFSET: i64 = 5;

/// Clinic hours as 15-minute slots since midnight: 09:00 inclusive
/// to 18:00 exclusive, so the last bookable slot is 17:45.
const FIRST_SLOT: i64 = 9 * 4;
const LAST_SLOT: i64 = 18 * 4;

/// The interval during which a patient can have appointments and
/// readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnrollmentWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A visit candidate before value simulation: when, who and with
/// which device the measurements will be taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledVisit {
    pub patient_id: i64,
    pub date: NaiveDateTime,
    pub gm_id: i64,
}

fn random_date(rng: &mut ChaCha8Rng, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days();
    start + Duration::days(rng.gen_range(0..=span))
}

/// Draw an enrollment window: a uniform start inside the enrollment
/// interval, then a uniform end between start + 32 days and the
/// campaign end.
pub fn draw_enrollment_window(rng: &mut ChaCha8Rng) -> EnrollmentWindow {
    let start = random_date(rng, campaign_enrollment_start(), campaign_enrollment_end());
    let end = random_date(rng, start + Duration::days(MIN_ENROLLMENT_DAYS), campaign_end());
    EnrollmentWindow { start, end }
}

fn truncate_to_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .expect("the first of the month is a valid date")
}

fn next_month(month_start: NaiveDate) -> NaiveDate {
    let (year, month) = if month_start.month() == 12 {
        (month_start.year() + 1, 1)
    } else {
        (month_start.year(), month_start.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("the first of the month is a valid date")
}

/// One visit candidate per month between the month-truncated start
/// and end of the window. Each candidate gets a uniform 0..=5 day
/// offset, a uniform 15-minute clinic-hours slot, and a device drawn
/// uniformly from the catalog (patients may switch devices between
/// visits).
pub fn visit_candidates(
    rng: &mut ChaCha8Rng,
    patient_id: i64,
    window: &EnrollmentWindow,
    catalog: &[Glucometer],
) -> Vec<ScheduledVisit> {
    let last = truncate_to_month(window.end);
    let mut month = truncate_to_month(window.start);
    let mut visits = Vec::new();
    while month <= last {
        let day_offset = Duration::days(rng.gen_range(0..=MAX_DAY_OFFSET));
        let slot_offset = Duration::minutes(rng.gen_range(FIRST_SLOT..LAST_SLOT) * 15);
        let midnight = month
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time");
        let gm_id = catalog[rng.gen_range(0..catalog.len())].gm_id;
        visits.push(ScheduledVisit {
            patient_id,
            date: midnight + day_offset + slot_offset,
            gm_id,
        });
        month = next_month(month);
    }
    visits
}

/// Global thinning: every candidate is independently retained with
/// probability [`RETENTION_PROBABILITY`], modelling missed visits.
pub fn thin_visits(rng: &mut ChaCha8Rng, visits: Vec<ScheduledVisit>) -> Vec<ScheduledVisit> {
    visits
        .into_iter()
        .filter(|_| rng.gen_bool(RETENTION_PROBABILITY))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glucometers::catalog;
    use crate::seeded_rng::make_rng;
    use chrono::Timelike;

    fn window(start: (i32, u32, u32), end: (i32, u32, u32)) -> EnrollmentWindow {
        EnrollmentWindow {
            start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        }
    }

    #[test]
    fn enrollment_windows_stay_inside_the_campaign() {
        let mut rng = make_rng(9, "schedule");
        for _ in 0..1_000 {
            let window = draw_enrollment_window(&mut rng);
            assert!(window.start >= campaign_enrollment_start());
            assert!(window.start <= campaign_enrollment_end());
            assert!(window.end >= window.start + Duration::days(MIN_ENROLLMENT_DAYS));
            assert!(window.end <= campaign_end());
        }
    }

    #[test]
    fn minimum_window_yields_at_least_one_candidate() {
        let mut rng = make_rng(9, "schedule");
        let window = window((2019, 11, 30), (2020, 1, 1));
        let visits = visit_candidates(&mut rng, 0, &window, catalog());
        assert!(!visits.is_empty());
    }

    #[test]
    fn one_candidate_per_enrolled_month() {
        let mut rng = make_rng(9, "schedule");
        let window = window((2016, 3, 20), (2016, 8, 2));
        let visits = visit_candidates(&mut rng, 0, &window, catalog());
        // March through August inclusive.
        assert_eq!(visits.len(), 6);
    }

    #[test]
    fn candidates_respect_day_offset_and_clinic_hours() {
        let mut rng = make_rng(9, "schedule");
        let window = window((2017, 5, 10), (2018, 5, 10));
        for visit in visit_candidates(&mut rng, 3, &window, catalog()) {
            assert_eq!(visit.patient_id, 3);
            assert!(visit.date.day() <= 1 + MAX_DAY_OFFSET as u32);
            let minutes = i64::from(visit.date.hour()) * 60 + i64::from(visit.date.minute());
            assert!(minutes >= FIRST_SLOT * 15);
            assert!(minutes < LAST_SLOT * 15);
            assert_eq!(minutes % 15, 0);
            assert!(catalog().iter().any(|gm| gm.gm_id == visit.gm_id));
        }
    }

    #[test]
    fn thinning_only_removes_rows() {
        let mut rng = make_rng(9, "schedule");
        let window = window((2015, 1, 1), (2020, 12, 31));
        let candidates = visit_candidates(&mut rng, 0, &window, catalog());
        let retained = thin_visits(&mut rng, candidates.clone());
        assert!(retained.len() <= candidates.len());
        for visit in &retained {
            assert!(candidates.contains(visit));
        }
    }
}
