use model::place::PlaceCategory;
use survey::database::TripTable;

use super::{PassOutcome, RepairContext, RepairPass};
use crate::ReconcileError;

/// The day starts at home or somewhere else. A first trip that starts at a
/// specific place (work, school...) was in practice always misrecorded from
/// home, an unknown start becomes "other".
pub struct FirstTripOrigin;

impl FirstTripOrigin {
    pub fn normalized(origin: PlaceCategory) -> PlaceCategory {
        match origin {
            PlaceCategory::Home | PlaceCategory::Other => origin,
            _ if !origin.is_specific() => PlaceCategory::Other,
            _ => PlaceCategory::Home,
        }
    }
}

impl RepairPass for FirstTripOrigin {
    fn name(&self) -> &'static str {
        "first trip origin"
    }

    fn apply(
        &self,
        mut table: TripTable,
        _context: &RepairContext<'_>,
    ) -> Result<(TripTable, PassOutcome), ReconcileError> {
        let mut modified = 0;
        for (_, chain) in table.chains_mut() {
            let Some(first) = chain.first_mut() else {
                continue;
            };
            let origin = Self::normalized(first.origin);
            if origin != first.origin {
                first.origin = origin;
                modified += 1;
            }
        }
        Ok((table, PassOutcome::modified(modified)))
    }
}
