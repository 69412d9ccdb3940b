use model::place::PlaceCategory;
use survey::database::TripTable;

use super::{PassOutcome, RepairContext, RepairPass};
use crate::ReconcileError;

/// Resolves "same place as my last destination" origins, and fills in missing
/// origin zones, from the previous trip. Runs front to back so a run of
/// carry-overs resolves in one go.
pub struct CarryOverOrigins;

impl RepairPass for CarryOverOrigins {
    fn name(&self) -> &'static str {
        "carry-over origins"
    }

    fn apply(
        &self,
        mut table: TripTable,
        _context: &RepairContext<'_>,
    ) -> Result<(TripTable, PassOutcome), ReconcileError> {
        let mut modified = 0;
        for key in table.keys() {
            let Some((destination, destination_zone)) = table
                .previous(&key)
                .map(|previous| (previous.destination, previous.destination_zone))
            else {
                continue;
            };
            let Some(trip) = table.get_mut(&key) else {
                continue;
            };

            let mut changed = false;
            if trip.origin == PlaceCategory::CarryOver && destination != PlaceCategory::CarryOver {
                trip.origin = destination;
                changed = true;
            }
            if trip.origin_zone.is_none() && destination_zone.is_some() {
                trip.origin_zone = destination_zone;
                changed = true;
            }
            if changed {
                modified += 1;
            }
        }
        Ok((table, PassOutcome::modified(modified)))
    }
}
