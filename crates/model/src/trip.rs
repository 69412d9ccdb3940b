use std::fmt;

use chrono::{Duration, NaiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::leg::ModeGroup;
use crate::person::PersonKey;
use crate::place::PlaceCategory;
use crate::purpose::Purpose;
use crate::{ExpansionFactor, ZoneId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct TripKey {
    pub person: PersonKey,

    /// Dense, 1-based position of the trip in the person's day.
    pub sequence: u32,
}

impl TripKey {
    pub fn new(person: PersonKey, sequence: u32) -> Self {
        Self { person, sequence }
    }
}

impl fmt::Display for TripKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.person, self.sequence)
    }
}

/// A trip as reported, before it has a position in the person's chain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SurveyedTrip {
    pub person: PersonKey,
    pub raw_label: u8,
    pub origin: PlaceCategory,
    pub destination: PlaceCategory,
    pub origin_zone: Option<ZoneId>,
    pub destination_zone: Option<ZoneId>,
    pub purpose: Purpose,
    pub mode: ModeGroup,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub expansion_factor: Option<ExpansionFactor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Trip {
    pub key: TripKey,

    /// Trip number as written on the questionnaire. Kept to trace a repaired
    /// trip back to the raw record.
    pub raw_label: u8,

    pub origin: PlaceCategory,
    pub destination: PlaceCategory,
    pub origin_zone: Option<ZoneId>,
    pub destination_zone: Option<ZoneId>,
    pub purpose: Purpose,
    pub mode: ModeGroup,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub expansion_factor: Option<ExpansionFactor>,
}

impl Trip {
    pub fn sequenced(key: TripKey, trip: SurveyedTrip) -> Self {
        Self {
            key,
            raw_label: trip.raw_label,
            origin: trip.origin,
            destination: trip.destination,
            origin_zone: trip.origin_zone,
            destination_zone: trip.destination_zone,
            purpose: trip.purpose,
            mode: trip.mode,
            start_time: trip.start_time,
            end_time: trip.end_time,
            expansion_factor: trip.expansion_factor,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        Some(self.end_time? - self.start_time?)
    }

    pub fn duration_minutes(&self) -> Option<f64> {
        self.duration().map(|d| d.num_seconds() as f64 / 60.0)
    }

    /// Replaces every occurrence of `from` in the trip's zones. Returns whether
    /// anything changed.
    pub fn replace_zone(&mut self, from: ZoneId, to: ZoneId) -> bool {
        let mut changed = false;
        for zone in [&mut self.origin_zone, &mut self.destination_zone] {
            if *zone == Some(from) && from != to {
                *zone = Some(to);
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use utility::id::Id;

    use super::*;

    fn trip() -> Trip {
        let person = PersonKey::new(Id::new("H1".to_owned()), 1);
        Trip::sequenced(
            TripKey::new(person, 1),
            SurveyedTrip {
                origin_zone: Some(100),
                destination_zone: Some(100),
                ..Default::default()
            },
        )
    }

    #[test]
    fn duration_needs_both_ends() {
        let mut trip = trip();
        assert_eq!(trip.duration_minutes(), None);

        let day = NaiveDate::from_ymd_opt(2019, 9, 18).and_then(|d| d.and_hms_opt(7, 0, 0));
        trip.start_time = day;
        trip.end_time = day.map(|d| d + Duration::minutes(45));
        assert_eq!(trip.duration_minutes(), Some(45.0));
    }

    #[test]
    fn zone_replacement_touches_both_ends() {
        let mut trip = trip();
        assert!(trip.replace_zone(100, 105));
        assert_eq!(trip.origin_zone, Some(105));
        assert_eq!(trip.destination_zone, Some(105));
        assert!(!trip.replace_zone(100, 105));
    }
}
