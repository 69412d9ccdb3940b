use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{ExpansionFactor, ZoneId};

pub type HouseholdId = Id<Household>;

/// Member counts as declared by the respondent at the door. Surveys are often
/// incomplete, so these can disagree with the people actually interviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct DeclaredMembers {
    pub total: u32,
    pub over_6: u32,
    pub under_5: u32,
    pub workers_14_plus: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Vehicles {
    pub cars: u32,
    pub pickups: u32,
    pub motorcycles: u32,
    pub bicycles: u32,
}

impl Vehicles {
    /// Motorized vehicles available to the household.
    pub fn motorized(&self) -> u32 {
        self.cars + self.pickups + self.motorcycles
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Household {
    pub id: HouseholdId,

    /// The zone the dwelling is located in. This is the ground truth every home
    /// stop of every member is reconciled against.
    pub zone: ZoneId,

    pub municipality: Option<u32>,
    pub expansion_factor: Option<ExpansionFactor>,
    pub survey_date: NaiveDate,
    pub members: DeclaredMembers,
    pub vehicles: Vehicles,
    pub bedrooms: Option<u32>,
    pub telephone: bool,
    pub internet: bool,

    /// Whether the address carries an interior number, which marks apartments
    /// and other shared dwellings.
    pub interior_number: bool,
}

impl HasId for Household {
    type IdType = String;
}
