use std::env;
use std::path::PathBuf;

use survey::UnitPolicy;
use thiserror::Error;

pub const DEFAULT_OUTPUT_DIR: &str = "data/outputs/od_clean";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("expected {0} in env")]
    Missing(&'static str),

    #[error("{name} must be true or false, found {value:?}")]
    InvalidFlag { name: &'static str, value: String },
}

/// Where to read the survey from and where to write the tables to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub survey_path: PathBuf,
    pub legs_path: Option<PathBuf>,

    /// Id fixes, duplicate rows and household zone overrides.
    pub fixes_path: Option<PathBuf>,

    /// Hand-made trip corrections and zone substitutions.
    pub corrections_path: Option<PathBuf>,

    pub output_dir: PathBuf,
    pub policy: UnitPolicy,
}

impl RunConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let survey_path = var("OD_SURVEY_PATH")
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("OD_SURVEY_PATH"))?;
        let output_dir = var("OD_OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_owned());

        let policy = match var("OD_SKIP_INVALID_UNITS").as_deref().map(str::trim) {
            None | Some("false") => UnitPolicy::Abort,
            Some("true") => UnitPolicy::Skip,
            Some(value) => {
                return Err(ConfigError::InvalidFlag {
                    name: "OD_SKIP_INVALID_UNITS",
                    value: value.to_owned(),
                })
            }
        };

        Ok(Self {
            survey_path,
            legs_path: var("OD_LEGS_PATH").map(PathBuf::from),
            fixes_path: var("OD_FIXES_PATH").map(PathBuf::from),
            corrections_path: var("OD_CORRECTIONS_PATH").map(PathBuf::from),
            output_dir: PathBuf::from(output_dir),
            policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn only_the_survey_is_required() {
        let config = RunConfig::from_lookup(lookup(&[("OD_SURVEY_PATH", "od.csv")])).unwrap();
        assert_eq!(config.survey_path, PathBuf::from("od.csv"));
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.policy, UnitPolicy::Abort);
        assert_eq!(config.legs_path, None);

        assert_eq!(
            RunConfig::from_lookup(lookup(&[("OD_LEGS_PATH", "legs.csv")])),
            Err(ConfigError::Missing("OD_SURVEY_PATH"))
        );
    }

    #[test]
    fn skip_flag_is_strict() {
        let config = RunConfig::from_lookup(lookup(&[
            ("OD_SURVEY_PATH", "od.csv"),
            ("OD_SKIP_INVALID_UNITS", "true"),
        ]))
        .unwrap();
        assert_eq!(config.policy, UnitPolicy::Skip);

        assert!(matches!(
            RunConfig::from_lookup(lookup(&[
                ("OD_SURVEY_PATH", "od.csv"),
                ("OD_SKIP_INVALID_UNITS", "yes"),
            ])),
            Err(ConfigError::InvalidFlag { .. })
        ));
    }
}
