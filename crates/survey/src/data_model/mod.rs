use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

pub mod leg_rows;
pub mod survey_rows;

/// Trip label as printed on the questionnaire, `HOUSEHOLD/PERSON-TRIP`.
pub type IdLabel = String;

/// Numeric cells were exported by a spreadsheet, so whole numbers sometimes
/// carry a `.0` suffix (`431.0` for zone 431).
pub(crate) fn optional_whole_number<'de, D>(de: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(de)?;
    let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Ok(number) = value.parse::<u32>() {
        return Ok(Some(number));
    }
    let number: f64 = value
        .parse()
        .map_err(|_| D::Error::custom(format!("not a number: {value:?}")))?;
    if number < 0.0 || number.fract() != 0.0 || number > u32::MAX as f64 {
        return Err(D::Error::custom(format!("not a whole number: {value:?}")));
    }
    Ok(Some(number as u32))
}

pub(crate) fn optional_age<'de, D>(de: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    match optional_whole_number(de)? {
        Some(age) => u8::try_from(age)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("age out of range: {age}"))),
        None => Ok(None),
    }
}

/// Yes/no answers. Empty answers count as "no".
pub(crate) fn flag<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(de)?.unwrap_or_default();
    match value.trim().to_lowercase().as_str() {
        "" | "no" | "false" | "0" => Ok(false),
        "sí" | "si" | "yes" | "true" | "1" => Ok(true),
        other => Err(D::Error::custom(format!("not a yes/no answer: {other:?}"))),
    }
}

/// Free text cells where any non-empty value is what matters.
pub(crate) fn non_empty<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(de)?.is_some_and(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(deserialize_with = "optional_whole_number")]
        zone: Option<u32>,
        #[serde(deserialize_with = "flag")]
        internet: bool,
    }

    fn read(data: &str) -> Result<Vec<Row>, csv::Error> {
        csv::Reader::from_reader(data.as_bytes())
            .deserialize()
            .collect()
    }

    #[test]
    fn spreadsheet_numbers_are_accepted() {
        let rows = read("zone,internet\n431.0,Sí\n,No\n12,\n").unwrap();
        assert_eq!(rows[0].zone, Some(431));
        assert!(rows[0].internet);
        assert_eq!(rows[1].zone, None);
        assert!(!rows[1].internet);
        assert_eq!(rows[2].zone, Some(12));
        assert!(!rows[2].internet);
    }

    #[test]
    fn fractional_zones_are_rejected() {
        assert!(read("zone,internet\n431.5,No\n").is_err());
        assert!(read("zone,internet\n1,quizás\n").is_err());
    }
}
