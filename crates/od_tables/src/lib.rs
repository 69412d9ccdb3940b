use std::error::Error;

use itertools::Itertools;
use reconcile::repair::CorrectionRuleset;
use reconcile::sequencer::sequence_trips;
use reconcile::tables::OutputTables;
use survey::fixes::NormalizationFixes;
use survey::normalize::{normalize_legs, normalize_survey};
use survey::read_rows_from_file;

pub mod config;
pub mod output;

use config::RunConfig;
use output::Audit;

/// Reads the survey, reconciles it and writes the tables.
pub fn run(config: &RunConfig) -> Result<(), Box<dyn Error>> {
    let fixes = match &config.fixes_path {
        Some(path) => NormalizationFixes::from_json_file(path)?,
        None => NormalizationFixes::default(),
    };
    let corrections = match &config.corrections_path {
        Some(path) => CorrectionRuleset::from_json_file(path)?,
        None => {
            log::warn!("no corrections file given, only the rule based repairs run");
            CorrectionRuleset::default()
        }
    };

    let rows = read_rows_from_file("survey", &config.survey_path)?;
    let (mut database, mut normalization) = normalize_survey(rows, &fixes, config.policy)?;
    if let Some(path) = &config.legs_path {
        let rows = read_rows_from_file("leg", path)?;
        normalize_legs(rows, &fixes, &mut database, &mut normalization)?;
    }

    let sequenced = sequence_trips(database, config.policy)?;
    let reconciled = reconcile::reconcile(sequenced, corrections)?;
    reconciled.report.print();

    let tables = OutputTables::build(&reconciled);
    for (mode, count) in tables.trips.iter().counts_by(|trip| trip.mode) {
        log::info!("{}: {count} trips", mode.display_text());
    }
    let audit = Audit {
        normalization: &normalization,
        repair: &reconciled.report,
        rejected: normalization
            .rejected
            .iter()
            .chain(&reconciled.rejected)
            .collect(),
        households: &tables.household_summary,
        corrections_file: config
            .corrections_path
            .as_ref()
            .map(|path| path.display().to_string()),
    };
    output::write_all(&config.output_dir, &tables, &audit)?;
    Ok(())
}
