use model::leg::{ModeGroup, ModeKind};
use serde::de::{Error as _, IntoDeserializer};
use serde::{Deserialize, Deserializer};

use super::{optional_whole_number, IdLabel};

/// Answers that fill an unused leg slot instead of leaving it blank.
const UNUSED_SLOT: [&str; 4] = [
    "0",
    "no utilizó otro modo de transporte",
    "no utilizo otro medio de transporte",
    "no utilizó otro medio de transporte",
];

/// One leg slot of one trip. The questionnaire has room for six legs per trip,
/// most of them empty.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct RawLegRow {
    pub id_label: IdLabel,

    /// Slot number, 1 to 6.
    pub leg: u8,

    /// `None` when the slot was not used.
    #[serde(default, deserialize_with = "leg_mode")]
    pub mode: Option<ModeGroup>,

    #[serde(default, deserialize_with = "leg_kind")]
    pub kind: Option<ModeKind>,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub walk_minutes: Option<u32>,

    #[serde(default)]
    pub route: Option<String>,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub wait_hours: Option<u32>,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub wait_minutes: Option<u32>,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub on_board_hours: Option<u32>,

    /// Hours on board as typed into the "other" box of the form.
    #[serde(default, deserialize_with = "optional_whole_number")]
    pub on_board_hours_alt: Option<u32>,

    #[serde(default, deserialize_with = "optional_whole_number")]
    pub on_board_minutes: Option<u32>,
}

fn is_unused(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    value.is_empty() || UNUSED_SLOT.contains(&value.as_str())
}

fn leg_mode<'de, D>(de: D) -> Result<Option<ModeGroup>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(de)? {
        Some(value) if !is_unused(&value) => {
            let value: &str = value.trim();
            ModeGroup::deserialize(value.into_deserializer())
                .map(Some)
                .map_err(|e: serde::de::value::Error| D::Error::custom(e))
        }
        _ => Ok(None),
    }
}

fn leg_kind<'de, D>(de: D) -> Result<Option<ModeKind>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(de)? {
        Some(value) if !is_unused(&value) => {
            let value = value.trim().to_lowercase();
            ModeKind::deserialize(value.as_str().into_deserializer())
                .map(Some)
                .map_err(|e: serde::de::value::Error| D::Error::custom(e))
        }
        _ => Ok(None),
    }
}
