use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use utility::progress::Progress;

pub mod data_model;
pub mod database;
pub mod error;
pub mod fixes;
pub mod normalize;

pub use error::{DataError, NormalizeError, RejectedUnit};

/// What to do with a unit (person or household) that fails a structural
/// precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitPolicy {
    /// The first failing unit aborts the run.
    #[default]
    Abort,

    /// Failing units are left out and listed as rejected.
    Skip,
}

/// Reads every row of a CSV table, logging progress for large files.
pub fn read_rows<T, R>(label: &'static str, reader: R) -> Result<Vec<T>, NormalizeError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut progress = Progress::new(label, 10_000);
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for row in csv_reader.deserialize() {
        rows.push(row?);
        progress.inc();
    }
    log::info!("read {} {label} rows", progress.count());
    Ok(rows)
}

pub fn read_rows_from_file<T>(label: &'static str, path: &Path) -> Result<Vec<T>, NormalizeError>
where
    T: DeserializeOwned,
{
    read_rows(label, File::open(path)?)
}
