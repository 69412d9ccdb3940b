use model::household::HouseholdId;
use model::person::PersonKey;
use serde::Serialize;
use thiserror::Error;
use utility::serde::TimeFormatError;

use crate::data_model::IdLabel;

/// A structural precondition the survey data does not meet and that no repair
/// rule can fix. Depending on the run's [`UnitPolicy`](crate::UnitPolicy) the
/// affected unit is skipped or the run is aborted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("person {0} has no trips")]
    PersonWithoutTrips(PersonKey),

    #[error("person {0} belongs to a household without a household record")]
    UnknownHousehold(PersonKey),

    #[error("correction targets {0}, which is not in the survey")]
    UnknownCorrectionTarget(String),

    #[error("household {0} has no home zone")]
    MissingHouseholdZone(HouseholdId),
}

impl DataError {
    /// The unit (person or household) that has to be dropped to get past the
    /// error, if there is one.
    pub fn unit(&self) -> Option<String> {
        match self {
            Self::PersonWithoutTrips(person) | Self::UnknownHousehold(person) => {
                Some(person.to_string())
            }
            Self::MissingHouseholdZone(household) => Some(household.to_string()),
            Self::UnknownCorrectionTarget(_) => None,
        }
    }
}

/// A unit left out of the output, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedUnit {
    pub unit: String,
    pub reason: String,
}

impl RejectedUnit {
    pub fn from_error(error: &DataError) -> Option<Self> {
        Some(Self {
            unit: error.unit()?,
            reason: error.to_string(),
        })
    }
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("could not read survey table: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not read normalization fixes: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed id label {0:?}")]
    InvalidIdLabel(IdLabel),

    #[error("row {label:?}: {source}")]
    InvalidTime {
        label: IdLabel,
        #[source]
        source: TimeFormatError,
    },

    #[error("row {0:?} has no survey date")]
    MissingSurveyDate(IdLabel),

    #[error(transparent)]
    Data(#[from] DataError),
}
