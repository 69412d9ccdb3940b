use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The semantic type of a trip's origin or destination.
///
/// The survey labels (Spanish, as released) are accepted as aliases so the
/// output of the category normalization can be read without another mapping
/// step.
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
pub enum PlaceCategory {
    #[serde(alias = "Hogar")]
    Home,

    #[serde(alias = "Lugar de Trabajo")]
    Workplace,

    #[serde(alias = "Escuela")]
    School,

    #[serde(alias = "Tienda/(Super)mercado")]
    Shop,

    #[serde(alias = "Farmacia/Clínica/Hospital")]
    Health,

    #[serde(alias = "Otro hogar")]
    OtherHome,

    #[serde(alias = "Recreativo")]
    Recreation,

    #[serde(alias = "Otro")]
    Other,

    /// "Same place as the destination of my previous trip". Only meaningful as an
    /// origin and replaced by the actual category during repair.
    #[serde(alias = "el destino de viaje inmediato anterior")]
    CarryOver,

    #[default]
    Unspecified,
}

impl PlaceCategory {
    pub fn is_home(self) -> bool {
        matches!(self, Self::Home)
    }

    /// Whether the value names an actual place instead of a reference or a gap.
    pub fn is_specific(self) -> bool {
        !matches!(self, Self::CarryOver | Self::Unspecified)
    }
}
