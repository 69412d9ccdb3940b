use schemars::gen::SchemaGenerator;
use schemars::schema::{Schema, SchemaObject};
use schemars::JsonSchema;
use serde::{Serialize, Serializer};

/// A derived value that can be missing for two different reasons: the survey
/// asked but the answer can't be recovered, or the question did not apply to
/// the person at all (school zone of someone not attending school).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Imputed<T> {
    Value(T),
    #[default]
    Unknown,
    NotApplicable,
}

pub const NOT_APPLICABLE: &str = "not_applicable";

impl<T> From<Option<T>> for Imputed<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unknown, Self::Value)
    }
}

/// Values serialize as themselves, unknown values as an empty cell and values
/// that do not apply as the `not_applicable` marker.
impl<T: Serialize> Serialize for Imputed<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Value(value) => value.serialize(serializer),
            Self::Unknown => serializer.serialize_none(),
            Self::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

impl<T: JsonSchema> JsonSchema for Imputed<T> {
    fn schema_name() -> String {
        format!("Imputed_{}", T::schema_name())
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        let not_applicable: Schema = SchemaObject {
            const_value: Some(NOT_APPLICABLE.into()),
            ..Default::default()
        }
        .into();

        let mut schema = SchemaObject::default();
        schema.subschemas().any_of = Some(vec![
            gen.subschema_for::<T>(),
            gen.subschema_for::<()>(),
            not_applicable,
        ]);
        schema.into()
    }
}

/// Door-to-door travel time class, right-closed on every upper bound.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema,
)]
pub enum DurationBucket {
    #[serde(rename = "0-15")]
    UpTo15,
    #[serde(rename = "16-30")]
    UpTo30,
    #[serde(rename = "31-60")]
    UpTo60,
    #[serde(rename = "61-120")]
    UpTo120,
    #[serde(rename = ">120")]
    Over120,
}

impl DurationBucket {
    /// Classifies a duration in minutes into the bins
    /// (-1, 15], (15, 30], (30, 60], (60, 120], (120, 1e6].
    /// Values outside the outer bounds fall into no bucket.
    pub fn from_minutes(minutes: f64) -> Option<Self> {
        match minutes {
            m if m <= -1.0 || m.is_nan() => None,
            m if m <= 15.0 => Some(Self::UpTo15),
            m if m <= 30.0 => Some(Self::UpTo30),
            m if m <= 60.0 => Some(Self::UpTo60),
            m if m <= 120.0 => Some(Self::UpTo120),
            m if m <= 1e6 => Some(Self::Over120),
            _ => None,
        }
    }
}

/// Age groups used by the population census, so expanded survey results can
/// be compared against census counts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema,
)]
pub enum AgeGroup {
    #[serde(rename = "0-2")]
    From0To2,
    #[serde(rename = "3-4")]
    From3To4,
    #[serde(rename = "5")]
    Age5,
    #[serde(rename = "6-7")]
    From6To7,
    #[serde(rename = "8-11")]
    From8To11,
    #[serde(rename = "12-14")]
    From12To14,
    #[serde(rename = "15-17")]
    From15To17,
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-49")]
    From25To49,
    #[serde(rename = "50-59")]
    From50To59,
    #[serde(rename = "60-64")]
    From60To64,
    #[serde(rename = "65+")]
    From65,
}

impl AgeGroup {
    pub fn from_age(age: u8) -> Option<Self> {
        let group = match age {
            0..=2 => Self::From0To2,
            3..=4 => Self::From3To4,
            5 => Self::Age5,
            6..=7 => Self::From6To7,
            8..=11 => Self::From8To11,
            12..=14 => Self::From12To14,
            15..=17 => Self::From15To17,
            18..=24 => Self::From18To24,
            25..=49 => Self::From25To49,
            50..=59 => Self::From50To59,
            60..=64 => Self::From60To64,
            65..=130 => Self::From65,
            _ => return None,
        };
        Some(group)
    }
}

/// The education level a person currently attends.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SchoolLevel {
    Basic,
    UpperSecondary,
    Higher,
}
