use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::household::HouseholdId;

/// Identifies a household member: the household and the 1-based member number.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct PersonKey {
    pub household: HouseholdId,
    pub person: u8,
}

impl PersonKey {
    pub fn new(household: HouseholdId, person: u8) -> Self {
        Self { household, person }
    }
}

impl fmt::Display for PersonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.household, self.person)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    #[serde(alias = "Mujer", alias = "F")]
    Female,

    #[serde(alias = "Hombre", alias = "M")]
    Male,

    #[default]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    #[serde(alias = "empleada(o) u obrera(o)", alias = "empleado (a)")]
    Employee,

    #[serde(alias = "trabajador(a) por cuenta propia")]
    SelfEmployed,

    #[serde(alias = "patrón(a) o empleador(a)")]
    Employer,

    #[serde(alias = "estudiante")]
    Student,

    #[serde(alias = "Se dedica a los quehaceres del hogar", alias = "ama de casa")]
    Homemaker,

    #[serde(alias = "Es pensionada(o) o jubilada(o)", alias = "jubilado")]
    Retired,

    #[serde(alias = "No trabaja", alias = "sin empleo")]
    Unemployed,

    #[serde(alias = "otro")]
    Other,

    #[default]
    Unspecified,
}

impl Occupation {
    /// Whether the occupation counts as having worked in the reference week.
    /// "Other" occupations were overwhelmingly informal jobs, so they count.
    pub fn worked(self) -> bool {
        matches!(
            self,
            Self::Employee | Self::SelfEmployed | Self::Employer | Self::Other
        )
    }

    pub fn is_student(self) -> bool {
        matches!(self, Self::Student)
    }
}

/// Highest completed education level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Education {
    #[serde(alias = "Sin Educación")]
    None,

    #[serde(alias = "Básica")]
    Basic,

    #[serde(alias = "MediaSup")]
    UpperSecondary,

    #[serde(alias = "Superior")]
    Higher,

    #[default]
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Person {
    pub key: PersonKey,
    pub age: Option<u8>,
    pub sex: Sex,
    pub occupation: Occupation,
    pub education: Education,
}
