use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::place::PlaceCategory;

/// The declared reason for a trip.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    #[serde(alias = "regreso a casa")]
    ReturnHome,

    #[serde(alias = "trabajo")]
    Work,

    #[serde(alias = "estudios")]
    Study,

    #[serde(alias = "compras")]
    Shopping,

    #[serde(alias = "salud")]
    Health,

    #[serde(alias = "recreación")]
    Recreation,

    #[serde(alias = "acompañar / recoger")]
    EscortPickup,

    #[serde(alias = "otro")]
    Other,

    #[default]
    Unspecified,
}

impl Purpose {
    /// The purpose implied by arriving at a place, for the places where the
    /// destination alone is conclusive. School is not: students study there but
    /// parents drop children off.
    pub fn implied_by(destination: PlaceCategory) -> Option<Self> {
        match destination {
            PlaceCategory::Home => Some(Self::ReturnHome),
            PlaceCategory::Workplace => Some(Self::Work),
            PlaceCategory::Shop => Some(Self::Shopping),
            PlaceCategory::Health => Some(Self::Health),
            PlaceCategory::Recreation => Some(Self::Recreation),
            PlaceCategory::School
            | PlaceCategory::OtherHome
            | PlaceCategory::Other
            | PlaceCategory::CarryOver
            | PlaceCategory::Unspecified => None,
        }
    }

    pub fn is_specified(self) -> bool {
        !matches!(self, Self::Unspecified)
    }
}
