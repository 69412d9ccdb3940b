use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use model::household::HouseholdId;
use model::ZoneId;
use serde::Deserialize;

use crate::data_model::IdLabel;
use crate::NormalizeError;

/// A `(household, person, trip)` triple as parsed from an id label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct RawTripKey(pub HouseholdId, pub u8, pub u8);

/// Hand-curated fixes for known defects of a survey release, applied while
/// reading the raw rows.
///
/// ```json
/// {
///   "id_fixes": { "25161-4/2-3": "25161A-4/2-3", "35090-30/2-2": null },
///   "duplicates": [["17841-14", 2, 4]],
///   "household_zones": { "1020-26": 431 }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NormalizationFixes {
    /// Typos in id labels. `null` drops the row.
    pub id_fixes: IndexMap<IdLabel, Option<IdLabel>>,

    /// Rows entered twice. Matching rows are dropped after the id fixes.
    pub duplicates: IndexSet<RawTripKey>,

    /// Households whose captured zone is known to be wrong or missing.
    pub household_zones: IndexMap<HouseholdId, ZoneId>,
}

/// What to do with an id label once the fixes were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdFix<'a> {
    Keep(&'a str),
    Drop,
}

impl NormalizationFixes {
    pub fn from_json_file(path: &Path) -> Result<Self, NormalizeError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn fix_label<'a>(&'a self, label: &'a str) -> IdFix<'a> {
        match self.id_fixes.get(label.trim()) {
            Some(Some(fixed)) => IdFix::Keep(fixed),
            Some(None) => IdFix::Drop,
            None => IdFix::Keep(label),
        }
    }

    pub fn is_duplicate(&self, key: &RawTripKey) -> bool {
        self.duplicates.contains(key)
    }

    pub fn household_zone(&self, household: &HouseholdId) -> Option<ZoneId> {
        self.household_zones.get(household).copied()
    }
}

#[cfg(test)]
mod tests {
    use utility::id::Id;

    use super::*;

    const FIXES: &str = r#"{
        "id_fixes": { "25161-4/2-3": "25161A-4/2-3", "35090-30/2-2": null },
        "duplicates": [["17841-14", 2, 4]],
        "household_zones": { "1020-26": 431 }
    }"#;

    #[test]
    fn fixes_are_read_from_json() {
        let fixes: NormalizationFixes = serde_json::from_str(FIXES).unwrap();

        assert_eq!(fixes.fix_label("25161-4/2-3"), IdFix::Keep("25161A-4/2-3"));
        assert_eq!(fixes.fix_label(" 35090-30/2-2 "), IdFix::Drop);
        assert_eq!(fixes.fix_label("1/1-1"), IdFix::Keep("1/1-1"));
        assert!(fixes.is_duplicate(&RawTripKey(Id::new("17841-14".to_owned()), 2, 4)));
        assert_eq!(
            fixes.household_zone(&Id::new("1020-26".to_owned())),
            Some(431)
        );
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let fixes: NormalizationFixes = serde_json::from_str("{}").unwrap();
        assert!(fixes.id_fixes.is_empty());
        assert!(fixes.duplicates.is_empty());
    }
}
