use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDateTime;
use model::household::HouseholdId;
use model::person::PersonKey;
use model::place::PlaceCategory;
use model::purpose::Purpose;
use model::trip::{Trip, TripKey};
use model::ZoneId;
use serde::Deserialize;
use survey::database::{PrimaryKeyTable, TripTable};
use survey::DataError;
use utility::serde::date_time;

use super::{PassOutcome, RepairContext, RepairPass};
use crate::ReconcileError;

/// Field values to write over one trip. Fields left out are kept.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TripCorrection {
    pub household: String,
    pub person: u8,
    pub sequence: u32,

    #[serde(default)]
    pub origin: Option<PlaceCategory>,
    #[serde(default)]
    pub destination: Option<PlaceCategory>,
    #[serde(default)]
    pub origin_zone: Option<ZoneId>,
    #[serde(default)]
    pub destination_zone: Option<ZoneId>,
    #[serde(default)]
    pub purpose: Option<Purpose>,
    #[serde(default, deserialize_with = "date_time::deserialize_option")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "date_time::deserialize_option")]
    pub end_time: Option<NaiveDateTime>,
}

impl TripCorrection {
    pub fn key(&self) -> TripKey {
        TripKey::new(
            PersonKey::new(HouseholdId::from_label(&self.household), self.person),
            self.sequence,
        )
    }

    /// Writes the correction over `trip`. Returns whether anything changed.
    fn apply_to(&self, trip: &mut Trip) -> bool {
        let before = trip.clone();
        if let Some(origin) = self.origin {
            trip.origin = origin;
        }
        if let Some(destination) = self.destination {
            trip.destination = destination;
        }
        if let Some(zone) = self.origin_zone {
            trip.origin_zone = Some(zone);
        }
        if let Some(zone) = self.destination_zone {
            trip.destination_zone = Some(zone);
        }
        if let Some(purpose) = self.purpose {
            trip.purpose = purpose;
        }
        if let Some(start) = self.start_time {
            trip.start_time = Some(start);
        }
        if let Some(end) = self.end_time {
            trip.end_time = Some(end);
        }
        *trip != before
    }
}

/// A zone code that was captured wrongly for a whole household, replaced on
/// every trip of every member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZoneSubstitution {
    pub household: String,
    pub from: ZoneId,
    pub to: ZoneId,
}

/// Corrections found by inspecting individual chains by hand. Loaded from a
/// JSON file so they can be reviewed and extended without touching the rules.
///
/// ```json
/// {
///   "trips": [
///     { "household": "14493-6", "person": 1, "sequence": 2,
///       "origin": "Otro", "destination": "Hogar",
///       "origin_zone": 634, "destination_zone": 404 }
///   ],
///   "zone_substitutions": [ { "household": "1342012-26", "from": 617, "to": 206 } ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CorrectionRuleset {
    pub trips: Vec<TripCorrection>,
    pub zone_substitutions: Vec<ZoneSubstitution>,
}

impl CorrectionRuleset {
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty() && self.zone_substitutions.is_empty()
    }
}

pub struct ExplicitCorrections {
    ruleset: CorrectionRuleset,
}

impl ExplicitCorrections {
    pub fn new(ruleset: CorrectionRuleset) -> Self {
        Self { ruleset }
    }
}

impl RepairPass for ExplicitCorrections {
    fn name(&self) -> &'static str {
        "explicit corrections"
    }

    fn apply(
        &self,
        mut table: TripTable,
        context: &RepairContext<'_>,
    ) -> Result<(TripTable, PassOutcome), ReconcileError> {
        // Every target is checked before anything is written, so a stale
        // ruleset fails without leaving a half corrected table behind.
        for correction in &self.ruleset.trips {
            let key = correction.key();
            if table.get(&key).is_none() {
                return Err(DataError::UnknownCorrectionTarget(format!("trip {key}")).into());
            }
        }
        for substitution in &self.ruleset.zone_substitutions {
            let household = HouseholdId::from_label(&substitution.household);
            if !context.households.contains(&household) {
                return Err(
                    DataError::UnknownCorrectionTarget(format!("household {household}")).into(),
                );
            }
        }

        let mut modified = 0;
        for correction in &self.ruleset.trips {
            if let Some(trip) = table.get_mut(&correction.key()) {
                if correction.apply_to(trip) {
                    modified += 1;
                }
            }
        }
        for substitution in &self.ruleset.zone_substitutions {
            let household = HouseholdId::from_label(&substitution.household);
            for (person, chain) in table.chains_mut() {
                if person.household != household {
                    continue;
                }
                for trip in chain.iter_mut() {
                    if trip.replace_zone(substitution.from, substitution.to) {
                        modified += 1;
                    }
                }
            }
        }

        Ok((table, PassOutcome::modified(modified)))
    }
}
