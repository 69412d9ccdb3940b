//! Reconciliation of surveyed trip chains.
//!
//! The survey crate turns the questionnaire rows into households, persons and
//! trips. This crate puts every person's trips in order, repairs the chains so
//! that each trip starts where the previous one ended, derives the person
//! attributes that depend on the repaired chain and builds the output tables.

use indexmap::IndexMap;
use model::leg::Leg;
use model::person::PersonKey;
use survey::database::{HouseholdTable, PersonTable, TripTable};
use survey::RejectedUnit;

pub mod chain;
pub mod error;
pub mod impute;
pub mod repair;
pub mod sequencer;
pub mod tables;

#[cfg(test)]
mod fixtures;

pub use error::{InvariantViolation, ReconcileError};
pub use survey::DataError;

use impute::PersonAttributes;
use repair::{CorrectionRuleset, RepairPipeline, RepairReport};
use sequencer::Sequenced;

/// The repaired survey.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub households: HouseholdTable,
    pub people: PersonTable,
    pub trips: TripTable,
    pub legs: Vec<Leg>,
    pub attributes: IndexMap<PersonKey, PersonAttributes>,
    pub report: RepairReport,
    pub rejected: Vec<RejectedUnit>,
}

/// Runs the standard repair passes over the sequenced survey and derives the
/// person attributes from the result.
pub fn reconcile(
    sequenced: Sequenced,
    corrections: CorrectionRuleset,
) -> Result<Reconciled, ReconcileError> {
    let Sequenced {
        households,
        people,
        trips,
        legs,
        rejected,
        ..
    } = sequenced;

    let pipeline = RepairPipeline::standard(corrections);
    let (trips, report) = pipeline.run(trips, &households, &people)?;
    log::info!(
        "{} persons with broken chains after repair, {} before",
        report.missing_trips_after.len(),
        report.missing_trips_before.len()
    );

    let attributes = impute::impute_all(&people, &trips);
    Ok(Reconciled {
        households,
        people,
        trips,
        legs,
        attributes,
        report,
        rejected,
    })
}
