use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use indexmap::IndexMap;
use reconcile::repair::RepairReport;
use reconcile::tables::{
    HouseholdRecord, HouseholdSummary, LegRecord, OutputTables, PersonRecord, TripRecord,
};
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde::Serialize;
use survey::normalize::NormalizationReport;
use survey::RejectedUnit;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("could not write {file}: {source}")]
    Csv {
        file: &'static str,
        source: csv::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Everything that was dropped, changed or left broken on the way from the
/// survey rows to the tables.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct Audit<'a> {
    pub normalization: &'a NormalizationReport,
    pub repair: &'a RepairReport,
    pub rejected: Vec<&'a RejectedUnit>,
    pub households: &'a HouseholdSummary,
    pub corrections_file: Option<String>,
}

fn write_csv<T: Serialize>(dir: &Path, file: &'static str, records: &[T]) -> Result<(), OutputError> {
    let to_error = |source| OutputError::Csv { file, source };
    let mut writer = csv::Writer::from_path(dir.join(file)).map_err(to_error)?;
    for record in records {
        writer.serialize(record).map_err(to_error)?;
    }
    writer.flush()?;
    log::info!("wrote {} rows to {file}", records.len());
    Ok(())
}

fn write_json<T: Serialize>(dir: &Path, file: &str, value: &T) -> Result<(), OutputError> {
    let writer = BufWriter::new(File::create(dir.join(file))?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

/// JSON schemas of the written tables, keyed by file name.
pub fn table_schemas() -> IndexMap<&'static str, RootSchema> {
    IndexMap::from([
        ("trips.csv", schema_for!(TripRecord)),
        ("legs.csv", schema_for!(LegRecord)),
        ("people.csv", schema_for!(PersonRecord)),
        ("households.csv", schema_for!(HouseholdRecord)),
    ])
}

pub fn write_all(dir: &Path, tables: &OutputTables, audit: &Audit<'_>) -> Result<(), OutputError> {
    fs::create_dir_all(dir)?;
    write_csv(dir, "trips.csv", &tables.trips)?;
    write_csv(dir, "legs.csv", &tables.legs)?;
    write_csv(dir, "people.csv", &tables.people)?;
    write_csv(dir, "households.csv", &tables.households)?;
    write_json(dir, "audit.json", audit)?;
    write_json(dir, "schema.json", &table_schemas())?;
    log::info!("tables written to {}", dir.display());
    Ok(())
}
