use model::leg::ModeGroup;
use model::person::{Education, Occupation, Sex};
use model::place::PlaceCategory;
use model::purpose::Purpose;
use model::{ExpansionFactor, ZoneId};
use serde::Deserialize;
use utility::serde::default_if_empty;

use super::{flag, non_empty, optional_age, optional_whole_number, IdLabel};

/// One row of the survey file: a single trip of a single respondent, with the
/// person and household answers repeated on every row.
///
/// Respondents who did not travel on the survey day have one row with trip
/// number 0.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct RawSurveyRow {
    /// `HOUSEHOLD/PERSON-TRIP`, e.g. `25161-4/2-3`.
    pub id_label: IdLabel,

    /// Zone of the dwelling.
    #[serde(default, deserialize_with = "optional_whole_number")]
    pub household_zone: Option<ZoneId>,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub municipality: Option<u32>,

    #[serde(default)]
    pub expansion_factor: Option<ExpansionFactor>,

    /// Interview date. Members of a household were sometimes recorded with
    /// different dates, only the first one seen is used.
    #[serde(default)]
    pub survey_date: Option<String>,

    /// Departure clock time.
    #[serde(default)]
    pub start_time: Option<String>,

    /// Door-to-door travel time, written as a clock time.
    #[serde(default)]
    pub travel_time: Option<String>,

    #[serde(default, deserialize_with = "default_if_empty")]
    pub origin: PlaceCategory,

    #[serde(default, deserialize_with = "default_if_empty")]
    pub destination: PlaceCategory,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub origin_zone: Option<ZoneId>,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub destination_zone: Option<ZoneId>,

    #[serde(default, deserialize_with = "default_if_empty")]
    pub purpose: Purpose,

    #[serde(default, deserialize_with = "default_if_empty")]
    pub mode: ModeGroup,

    #[serde(default, deserialize_with = "optional_age")]
    pub age: Option<u8>,

    #[serde(default, deserialize_with = "default_if_empty")]
    pub sex: Sex,

    #[serde(default, deserialize_with = "default_if_empty")]
    pub occupation: Occupation,

    #[serde(default, deserialize_with = "default_if_empty")]
    pub education: Education,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub total_members: Option<u32>,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub members_over_6: Option<u32>,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub members_under_5: Option<u32>,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub workers_14_plus: Option<u32>,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub cars: Option<u32>,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub pickups: Option<u32>,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub motorcycles: Option<u32>,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub bicycles: Option<u32>,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub bedrooms: Option<u32>,

    #[serde(default, deserialize_with = "flag")]
    pub telephone: bool,

    #[serde(default, deserialize_with = "flag")]
    pub internet: bool,

    #[serde(default, deserialize_with = "non_empty")]
    pub interior_number: bool,
}
