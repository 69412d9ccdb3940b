use itertools::Itertools;
use model::person::PersonKey;
use model::trip::TripKey;
use model::ZoneId;
use survey::DataError;
use thiserror::Error;

/// A state the repair rules are built never to reach. Hitting one means a rule
/// or its input assumptions are wrong, so the run stops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error(
        "trip {trip}: origin zone {origin_zone:?} does not continue destination zone \
         {previous_destination_zone:?} at a home stop"
    )]
    HomeZoneMismatch {
        trip: TripKey,
        origin_zone: Option<ZoneId>,
        previous_destination_zone: Option<ZoneId>,
    },

    #[error("trip {trip}: both sides of a zone break are the household zone {zone}")]
    UnresolvableZoneConflict { trip: TripKey, zone: ZoneId },

    #[error("pass {pass} broke the chain of {}", .persons.iter().join(", "))]
    ChainRegression {
        pass: &'static str,
        persons: Vec<PersonKey>,
    },
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}
