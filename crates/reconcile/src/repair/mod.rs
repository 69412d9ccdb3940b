//! Rule based repair of trip chains.
//!
//! Each pass takes the whole trip table, fixes one kind of defect and hands
//! the table on. Passes only ever make a chain more consistent: after every
//! pass the chains are audited again and a person whose chain was intact
//! before the repair but is broken now stops the run.

use indexmap::IndexSet;
use model::person::PersonKey;
use model::place::PlaceCategory;
use model::purpose::Purpose;
use model::trip::TripKey;
use serde::Serialize;
use survey::database::{HouseholdTable, PersonTable, TripTable};

use crate::chain::{overlaps, purpose_transitions, ChainAudit, PurposeTransition};
use crate::{InvariantViolation, ReconcileError};

pub mod carry_over;
pub mod corrections;
pub mod first_trip;
pub mod home_purpose;
pub mod home_zone;
pub mod purpose;

pub use corrections::CorrectionRuleset;

/// What a pass sees besides the table it repairs.
pub struct RepairContext<'a> {
    pub households: &'a HouseholdTable,
    pub people: &'a PersonTable,

    /// Audit of the table as it was handed to the pass.
    pub audit: &'a ChainAudit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassOutcome {
    /// Trips changed by the pass.
    pub modified: usize,

    /// Trips the pass should have fixed but had no rule for.
    pub flagged: Vec<TripKey>,
}

impl PassOutcome {
    pub fn modified(modified: usize) -> Self {
        Self {
            modified,
            flagged: Vec::new(),
        }
    }
}

pub trait RepairPass {
    fn name(&self) -> &'static str;

    fn apply(
        &self,
        table: TripTable,
        context: &RepairContext<'_>,
    ) -> Result<(TripTable, PassOutcome), ReconcileError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub pass: &'static str,
    pub modified: usize,
    pub flagged: usize,
}

/// Everything the repair changed and everything it could not fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    pub passes: Vec<PassSummary>,

    /// Persons with a broken chain before any repair.
    pub missing_trips_before: IndexSet<PersonKey>,

    /// Persons whose chain is still broken. Their trips are kept as they are
    /// and left out of the purpose transitions.
    pub missing_trips_after: IndexSet<PersonKey>,

    pub residual_audit: ChainAudit,
    pub overlaps: Vec<TripKey>,
    pub unresolved_purposes: Vec<TripKey>,
    pub conflicting_home_trips_before: usize,
    pub conflicting_home_trips_after: usize,
    pub purpose_transitions: Vec<PurposeTransition>,
}

impl RepairReport {
    pub fn print(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(report) => log::info!("repair report: {report}"),
            Err(e) => log::error!("could not format repair report: {e}"),
        }
    }
}

pub struct RepairPipeline {
    passes: Vec<Box<dyn RepairPass>>,
}

impl RepairPipeline {
    pub fn new(passes: Vec<Box<dyn RepairPass>>) -> Self {
        Self { passes }
    }

    /// The passes in the order they have to run: explicit corrections first,
    /// home zone unification last since it relies on settled categories.
    pub fn standard(corrections: CorrectionRuleset) -> Self {
        Self::new(vec![
            Box::new(corrections::ExplicitCorrections::new(corrections)),
            Box::new(first_trip::FirstTripOrigin),
            Box::new(carry_over::CarryOverOrigins),
            Box::new(home_purpose::HomeToHomeWork),
            Box::new(purpose::PurposeFromDestination),
            Box::new(purpose::PurposeDestinationAgreement),
            Box::new(home_zone::HomeZoneUnification),
        ])
    }

    pub fn run(
        &self,
        mut table: TripTable,
        households: &HouseholdTable,
        people: &PersonTable,
    ) -> Result<(TripTable, RepairReport), ReconcileError> {
        let baseline = ChainAudit::of(&table);
        let conflicting_home_trips_before = home_zone::conflicting_trips(&table, households);
        log::info!(
            "{} persons with broken chains before repair",
            baseline.missing_trips().len()
        );

        let mut audit = baseline.clone();
        let mut passes = Vec::with_capacity(self.passes.len());
        for pass in &self.passes {
            let context = RepairContext {
                households,
                people,
                audit: &audit,
            };
            let (repaired, outcome) = pass.apply(table, &context)?;
            table = repaired;

            let next = ChainAudit::of(&table);
            let regressions = next.regressions_from(&baseline);
            if !regressions.is_empty() {
                return Err(InvariantViolation::ChainRegression {
                    pass: pass.name(),
                    persons: regressions,
                }
                .into());
            }

            log::info!(
                "{}: {} trips modified, {} flagged",
                pass.name(),
                outcome.modified,
                outcome.flagged.len()
            );
            passes.push(PassSummary {
                pass: pass.name(),
                modified: outcome.modified,
                flagged: outcome.flagged.len(),
            });
            audit = next;
        }

        let missing_trips_after = audit.missing_trips();
        let report = RepairReport {
            passes,
            missing_trips_before: baseline.missing_trips(),
            overlaps: overlaps(&table),
            unresolved_purposes: unresolved_purposes(&table),
            conflicting_home_trips_before,
            conflicting_home_trips_after: home_zone::conflicting_trips(&table, households),
            purpose_transitions: purpose_transitions(&table, &missing_trips_after),
            missing_trips_after,
            residual_audit: audit,
        };
        Ok((table, report))
    }
}

/// Trips whose purpose is still unknown or still contradicts the destination.
pub fn unresolved_purposes(table: &TripTable) -> Vec<TripKey> {
    table
        .trips()
        .filter(|trip| {
            !trip.purpose.is_specified()
                || (trip.purpose == Purpose::ReturnHome
                    && trip.destination != PlaceCategory::Home)
        })
        .map(|trip| trip.key.clone())
        .collect()
}
