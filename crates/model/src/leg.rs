use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::person::PersonKey;
use crate::trip::TripKey;

/// Grouped travel mode of a trip or a single leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModeGroup {
    #[serde(alias = "caminando", alias = "A pie (caminando)", alias = "a pie (caminando)")]
    Walk,

    /// Ride hailing apps (Uber, Cabify, Didi or similar).
    #[serde(alias = "app")]
    App,

    #[serde(alias = "auto")]
    Car,

    #[serde(alias = "TPUB")]
    PublicTransit,

    #[serde(alias = "moto")]
    Motorcycle,

    #[serde(alias = "bici")]
    Bicycle,

    #[serde(alias = "Taxi", alias = "taxi")]
    Taxi,

    #[serde(alias = "Transporte de Personal")]
    EmployeeShuttle,

    #[serde(alias = "Transporte escolar")]
    SchoolBus,

    #[serde(alias = "otro")]
    Other,

    #[default]
    Unspecified,
}

impl ModeGroup {
    pub fn display_text(self) -> String {
        match self {
            Self::Walk => "Walking",
            Self::App => "Ride hailing app",
            Self::Car => "Car, as driver or passenger",
            Self::PublicTransit => "Public transit",
            Self::Motorcycle => "Motorcycle",
            Self::Bicycle => "Bicycle",
            Self::Taxi => "Taxi",
            Self::EmployeeShuttle => "Employee shuttle",
            Self::SchoolBus => "School bus",
            Self::Other => "Other mode",
            Self::Unspecified => "Unspecified mode",
        }
        .to_owned()
    }
}

/// Kind of transport used on a leg, as declared next to the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    #[serde(alias = "público", alias = "transporte público")]
    Public,

    #[serde(alias = "particular", alias = "vehículo particular")]
    Private,

    #[serde(alias = "caminó", alias = "a pie (caminando)")]
    Walked,

    #[serde(alias = "transporte por aplicación")]
    RideHailing,

    #[serde(alias = "otro modo")]
    OtherMode,

    #[default]
    Unspecified,
}

/// A leg before its trip has been assigned a sequence number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SurveyedLeg {
    pub person: PersonKey,
    pub raw_label: u8,
    pub leg: u8,
    pub mode: ModeGroup,
    pub kind: ModeKind,
    pub wait_minutes: Option<u32>,
    pub on_board_minutes: Option<u32>,
    pub walk_minutes: Option<u32>,
    pub route: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct LegKey {
    pub trip: TripKey,

    /// Leg number within the trip, 1 to 6.
    pub leg: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Leg {
    pub key: LegKey,
    pub mode: ModeGroup,
    pub kind: ModeKind,
    pub wait_minutes: Option<u32>,
    pub on_board_minutes: Option<u32>,
    pub walk_minutes: Option<u32>,
    pub route: Option<String>,
}

impl Leg {
    pub fn sequenced(leg: SurveyedLeg, sequence: u32) -> Self {
        Self {
            key: LegKey {
                trip: TripKey::new(leg.person, sequence),
                leg: leg.leg,
            },
            mode: leg.mode,
            kind: leg.kind,
            wait_minutes: leg.wait_minutes,
            on_board_minutes: leg.on_board_minutes,
            walk_minutes: leg.walk_minutes,
            route: leg.route,
        }
    }
}
