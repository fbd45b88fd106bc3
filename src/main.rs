use std::fs;
use std::path::Path;

use anyhow::Context;
use datafusion::prelude::SessionContext;
use tracing::info;
use tracing_subscriber::EnvFilter;

use synth_follow_up::tables::{
    appointments_table, glucometers_table, glycemia_table, patients_table,
};
use synth_follow_up::{
    load_record_batch, save_record_batch, simulate, ReferencePopulation, ReferenceRow,
    SimulationConfig,
};

/// Semicolon-separated reference population export (columns periode,
/// prenom, sexe, valeur).
const SOURCE_PATH: &str = "source.csv";
const OUTPUT_DIR: &str = "generated";

fn read_reference_population(path: &str) -> Result<ReferencePopulation, anyhow::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .with_context(|| format!("Failed to open reference population {path}"))?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: ReferenceRow = record.context("Malformed reference population row")?;
        rows.push(row);
    }
    Ok(ReferencePopulation::new(rows))
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let reference = read_reference_population(SOURCE_PATH)?;
    let config = SimulationConfig::default();
    let simulation = simulate(&reference, &config)?;
    info!(
        patients_without_visits = simulation.patients_without_visits,
        patients_without_readings = simulation.patients_without_readings,
        "simulation finished"
    );

    fs::create_dir_all(OUTPUT_DIR)
        .with_context(|| format!("Failed to create {OUTPUT_DIR}"))?;
    let out = |table: &str| {
        Path::new(OUTPUT_DIR)
            .join(format!("{table}.parquet"))
            .to_string_lossy()
            .into_owned()
    };

    save_record_batch(&out("patients"), patients_table(&simulation.patients)?)?;
    save_record_batch(
        &out("glucometers"),
        glucometers_table(simulation.glucometers)?,
    )?;
    save_record_batch(
        &out("appointments"),
        appointments_table(&simulation.appointments)?,
    )?;
    save_record_batch(&out("glycemia"), glycemia_table(&simulation.readings)?)?;

    // Preview what landed on disk.
    let batch = load_record_batch(&out("appointments"))?;
    let ctx = SessionContext::new();
    let df = ctx
        .read_batch(batch)
        .context("Failed to convert batch to dataframe")?;
    df.show_limit(20).await?;

    Ok(())
}
