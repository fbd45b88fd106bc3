//! Synthetic longitudinal medical follow-up data.
//!
//! Generates an internally consistent demo dataset from a single
//! seed: a cohort of patients sampled from a weighted reference
//! population, a static glucometer catalog, a multi-year schedule of
//! clinic appointments per patient, and a three-a-day at-home
//! glycemia reading stream between appointments. All randomness is
//! driven by seeded sub-streams, so the same seed and reference
//! input always reproduce the same four tables.
//!

use datafusion::arrow::record_batch::RecordBatch;
use datafusion::parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use datafusion::parquet::arrow::arrow_writer::ArrowWriter;
use std::fs;

use anyhow::Context;

pub use pipeline::{simulate, Simulation, SimulationConfig};
pub use population::{
    Patient, PopulationError, ReferencePopulation, ReferenceRow, Sex,
};

pub mod baseline;
pub mod dist;
pub mod glucometers;
pub mod glycemia;
pub mod pipeline;
pub mod population;
pub mod schedule;
pub mod seeded_rng;
pub mod tables;
pub mod values;

pub fn save_record_batch(filename: &str, batch: RecordBatch) -> Result<(), anyhow::Error> {
    let file = fs::File::create(filename)
        .with_context(|| format!("Failed to create {filename}"))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

pub fn load_record_batch(filename: &str) -> Result<RecordBatch, anyhow::Error> {
    let file =
        fs::File::open(filename).with_context(|| format!("Failed to open {filename}"))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let mut reader = builder.build()?;
    let record_batch = reader
        .next()
        .context("Parquet file contains no record batch")??;
    Ok(record_batch)
}
