use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFormatError {
    #[error("unexpected clock time format: {0:?}")]
    Clock(String),

    #[error("unexpected survey date format: {0:?}")]
    Date(String),
}

pub fn default_if_empty<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de> + Default,
{
    use serde::Deserialize;
    Option::<T>::deserialize(de).map(|x| x.unwrap_or_else(|| T::default()))
}

/// Clock times and dates as they were captured by the survey tablets. The
/// capture software changed formats during the field work, so several shapes
/// have to be accepted.
pub mod survey_time {
    use chrono::{Duration, NaiveDate};

    use super::TimeFormatError;

    /// Parses a time of day into a duration since midnight.
    ///
    /// Accepted shapes:
    /// - `HH:MM` (seconds are assumed to be zero),
    /// - `HH:MM:SS`,
    /// - `YYYY-MM-DD HH:MM:SS`, written by the tablets for times past midnight.
    ///   Only the clock part is kept and one day is added.
    pub fn parse_clock(value: &str) -> Result<Duration, TimeFormatError> {
        let value = value.trim();
        match value.len() {
            5 => hh_mm_ss(&format!("{value}:00"), value),
            8 => hh_mm_ss(value, value),
            19 => {
                let clock = value
                    .get(11..)
                    .ok_or_else(|| TimeFormatError::Clock(value.to_owned()))?;
                Ok(hh_mm_ss(clock, value)? + Duration::days(1))
            }
            _ => Err(TimeFormatError::Clock(value.to_owned())),
        }
    }

    fn hh_mm_ss(clock: &str, original: &str) -> Result<Duration, TimeFormatError> {
        let invalid = || TimeFormatError::Clock(original.to_owned());
        let parts: Vec<&str> = clock.split(':').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let hours: i64 = parts[0].parse().map_err(|_| invalid())?;
        let minutes: i64 = parts[1].parse().map_err(|_| invalid())?;
        let seconds: i64 = parts[2].parse().map_err(|_| invalid())?;
        if minutes >= 60 || seconds >= 60 || hours < 0 || minutes < 0 || seconds < 0 {
            return Err(invalid());
        }
        Ok(Duration::hours(hours) + Duration::minutes(minutes) + Duration::seconds(seconds))
    }

    /// Parses the interview date, either `dd/mm/yyyy` or an ISO date optionally
    /// followed by a clock time which is ignored.
    pub fn parse_survey_date(value: &str) -> Result<NaiveDate, TimeFormatError> {
        let value = value.trim();
        let invalid = || TimeFormatError::Date(value.to_owned());
        if value.contains('/') {
            NaiveDate::parse_from_str(value, "%d/%m/%Y").map_err(|_| invalid())
        } else {
            let date = value.get(..10).ok_or_else(invalid)?;
            NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())
        }
    }
}

pub mod date_time {
    use chrono::NaiveDateTime;
    use schemars::gen::SchemaGenerator;
    use schemars::schema::{InstanceType, Schema, SchemaObject};
    use serde::{de::Error, Deserialize as _, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize_option<S>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&value.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        match s {
            Some(s) if !s.trim().is_empty() => NaiveDateTime::parse_from_str(s.trim(), FORMAT)
                .map(Some)
                .map_err(Error::custom),
            _ => Ok(None),
        }
    }

    pub fn schema_option(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(vec![InstanceType::String, InstanceType::Null].into()),
            format: Some("yyyy-mm-dd hh:mm:ss".to_owned()),
            ..Default::default()
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::survey_time::{parse_clock, parse_survey_date};
    use super::TimeFormatError;

    #[test]
    fn short_clock_times_get_seconds() {
        assert_eq!(
            parse_clock("07:45"),
            Ok(Duration::hours(7) + Duration::minutes(45))
        );
        assert_eq!(
            parse_clock("07:45:30"),
            Ok(Duration::hours(7) + Duration::minutes(45) + Duration::seconds(30))
        );
    }

    #[test]
    fn timestamps_roll_over_to_the_next_day() {
        assert_eq!(
            parse_clock("1899-12-31 00:30:00"),
            Ok(Duration::days(1) + Duration::minutes(30))
        );
    }

    #[test]
    fn unknown_clock_shapes_are_rejected() {
        assert_eq!(
            parse_clock("7.45 am"),
            Err(TimeFormatError::Clock("7.45 am".to_owned()))
        );
        assert!(parse_clock("07:75").is_err());
    }

    #[test]
    fn both_survey_date_formats_are_accepted() {
        let expected = NaiveDate::from_ymd_opt(2019, 9, 18);
        assert_eq!(parse_survey_date("18/09/2019").ok(), expected);
        assert_eq!(parse_survey_date("2019-09-18 00:00:00").ok(), expected);
        assert!(parse_survey_date("Sept 18").is_err());
    }
}
