//! Arrow emission of the four output tables.
//!
//! Column vectors are accumulated row by row and combined with
//! `RecordBatch::try_from_iter`, which keeps the declared column
//! names next to their data. The boundary layer decides where the
//! batches go (parquet files here, anything downstream).
//!

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use datafusion::arrow::array::{
    Date32Array, Float64Array, Int64Array, StringArray, TimestampSecondArray,
};
use datafusion::arrow::error::ArrowError;
use datafusion::arrow::record_batch::RecordBatch;

use crate::glucometers::Glucometer;
use crate::glycemia::GlycemiaReading;
use crate::population::Patient;
use crate::values::Appointment;

fn days_since_epoch(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("the unix epoch is a valid date");
    (date - epoch).num_days() as i32
}

fn seconds_since_epoch(date_time: NaiveDateTime) -> i64 {
    date_time.and_utc().timestamp()
}

/// patients: patient_id, name, sex, birthdate.
pub fn patients_table(patients: &[Patient]) -> Result<RecordBatch, ArrowError> {
    let mut patient_id = Vec::new();
    let mut name = Vec::new();
    let mut sex = Vec::new();
    let mut birthdate = Vec::new();

    for patient in patients {
        patient_id.push(patient.patient_id);
        name.push(patient.name.clone());
        sex.push(patient.sex.code());
        birthdate.push(days_since_epoch(patient.birthdate));
    }

    RecordBatch::try_from_iter([
        ("patient_id", Arc::new(Int64Array::from(patient_id)) as _),
        ("name", Arc::new(StringArray::from(name)) as _),
        ("sex", Arc::new(Int64Array::from(sex)) as _),
        ("birthdate", Arc::new(Date32Array::from(birthdate)) as _),
    ])
}

/// glucometers: gm_id, model_name, manufacturer, year, class.
pub fn glucometers_table(glucometers: &[Glucometer]) -> Result<RecordBatch, ArrowError> {
    let mut gm_id = Vec::new();
    let mut model_name = Vec::new();
    let mut manufacturer = Vec::new();
    let mut year = Vec::new();
    let mut class = Vec::new();

    for glucometer in glucometers {
        gm_id.push(glucometer.gm_id);
        model_name.push(glucometer.model_name);
        manufacturer.push(glucometer.manufacturer);
        year.push(glucometer.year);
        class.push(glucometer.class);
    }

    RecordBatch::try_from_iter([
        ("gm_id", Arc::new(Int64Array::from(gm_id)) as _),
        ("model_name", Arc::new(StringArray::from(model_name)) as _),
        (
            "manufacturer",
            Arc::new(StringArray::from(manufacturer)) as _,
        ),
        ("year", Arc::new(Int64Array::from(year)) as _),
        ("class", Arc::new(StringArray::from(class)) as _),
    ])
}

/// appointments: date, patient_id, height, weight, gm_id, glycemia,
/// bp_sys, bp_dia.
pub fn appointments_table(appointments: &[Appointment]) -> Result<RecordBatch, ArrowError> {
    let mut date = Vec::new();
    let mut patient_id = Vec::new();
    let mut height = Vec::new();
    let mut weight = Vec::new();
    let mut gm_id = Vec::new();
    let mut glycemia = Vec::new();
    let mut bp_sys = Vec::new();
    let mut bp_dia = Vec::new();

    for appointment in appointments {
        date.push(seconds_since_epoch(appointment.date));
        patient_id.push(appointment.patient_id);
        height.push(appointment.height);
        weight.push(appointment.weight);
        gm_id.push(appointment.gm_id);
        glycemia.push(appointment.glycemia);
        bp_sys.push(appointment.bp_sys);
        bp_dia.push(appointment.bp_dia);
    }

    RecordBatch::try_from_iter([
        ("date", Arc::new(TimestampSecondArray::from(date)) as _),
        ("patient_id", Arc::new(Int64Array::from(patient_id)) as _),
        ("height", Arc::new(Int64Array::from(height)) as _),
        ("weight", Arc::new(Float64Array::from(weight)) as _),
        ("gm_id", Arc::new(Int64Array::from(gm_id)) as _),
        ("glycemia", Arc::new(Float64Array::from(glycemia)) as _),
        ("bp_sys", Arc::new(Float64Array::from(bp_sys)) as _),
        ("bp_dia", Arc::new(Float64Array::from(bp_dia)) as _),
    ])
}

/// glycemia: date, patient_id, gm_id, glycemia.
pub fn glycemia_table(readings: &[GlycemiaReading]) -> Result<RecordBatch, ArrowError> {
    let mut date = Vec::new();
    let mut patient_id = Vec::new();
    let mut gm_id = Vec::new();
    let mut glycemia = Vec::new();

    for reading in readings {
        date.push(seconds_since_epoch(reading.date));
        patient_id.push(reading.patient_id);
        gm_id.push(reading.gm_id);
        glycemia.push(reading.glycemia);
    }

    RecordBatch::try_from_iter([
        ("date", Arc::new(TimestampSecondArray::from(date)) as _),
        ("patient_id", Arc::new(Int64Array::from(patient_id)) as _),
        ("gm_id", Arc::new(Int64Array::from(gm_id)) as _),
        ("glycemia", Arc::new(Float64Array::from(glycemia)) as _),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glucometers::catalog;
    use crate::population::Sex;

    #[test]
    fn patients_table_has_the_declared_columns() {
        let patients = vec![Patient {
            patient_id: 0,
            name: String::from("Jean"),
            sex: Sex::Male,
            birthdate: NaiveDate::from_ymd_opt(1950, 6, 15).unwrap(),
        }];
        let batch = patients_table(&patients).unwrap();
        assert_eq!(batch.num_rows(), 1);
        let schema = batch.schema();
        let names: Vec<&str> = schema
            .fields()
            .iter()
            .map(|field| field.name().as_str())
            .collect();
        assert_eq!(names, ["patient_id", "name", "sex", "birthdate"]);
    }

    #[test]
    fn glucometers_table_covers_the_catalog() {
        let batch = glucometers_table(catalog()).unwrap();
        assert_eq!(batch.num_rows(), 5);
        assert_eq!(batch.num_columns(), 5);
    }

    #[test]
    fn appointments_table_has_the_declared_columns() {
        let appointments = vec![Appointment {
            patient_id: 3,
            date: NaiveDate::from_ymd_opt(2017, 6, 3)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            height: 171,
            weight: 72.4,
            gm_id: 4,
            glycemia: 101.2,
            bp_sys: 120.0,
            bp_dia: 79.0,
        }];
        let batch = appointments_table(&appointments).unwrap();
        assert_eq!(batch.num_rows(), 1);
        let schema = batch.schema();
        let names: Vec<&str> = schema
            .fields()
            .iter()
            .map(|field| field.name().as_str())
            .collect();
        assert_eq!(
            names,
            ["date", "patient_id", "height", "weight", "gm_id", "glycemia", "bp_sys", "bp_dia"]
        );
    }

    #[test]
    fn glycemia_table_has_the_declared_columns() {
        let readings = vec![GlycemiaReading {
            patient_id: 3,
            date: NaiveDate::from_ymd_opt(2017, 6, 4)
                .unwrap()
                .and_hms_opt(8, 2, 0)
                .unwrap(),
            gm_id: 4,
            glycemia: 88.0,
        }];
        let batch = glycemia_table(&readings).unwrap();
        assert_eq!(batch.num_rows(), 1);
        let schema = batch.schema();
        let names: Vec<&str> = schema
            .fields()
            .iter()
            .map(|field| field.name().as_str())
            .collect();
        assert_eq!(names, ["date", "patient_id", "gm_id", "glycemia"]);
    }
}
