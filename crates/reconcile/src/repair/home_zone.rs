//! One home per person.
//!
//! A person's chain often names more than one zone for "home": a typo in one
//! trip, or the block of a neighbour. The household zone is the reference. The
//! zone the first trip leaves from (or arrives at) home is taken as the wrong
//! code used throughout the chain and replaced everywhere. A chain whose first
//! trip touches no home has no such code and skips the replacement. The home
//! stops are then pinned to the household zone and the zone breaks this
//! leaves behind are closed.

use indexmap::IndexSet;
use model::trip::Trip;
use model::ZoneId;
use survey::database::{HouseholdTable, PrimaryKeyTable, TripTable};
use survey::DataError;

use super::{PassOutcome, RepairContext, RepairPass};
use crate::{InvariantViolation, ReconcileError};

pub struct HomeZoneUnification;

/// Zones recorded at the home stops of a chain.
fn home_codes(chain: &[Trip]) -> IndexSet<Option<ZoneId>> {
    let mut codes = IndexSet::new();
    for trip in chain {
        if trip.origin.is_home() {
            codes.insert(trip.origin_zone);
        }
        if trip.destination.is_home() {
            codes.insert(trip.destination_zone);
        }
    }
    codes
}

fn has_conflict(chain: &[Trip], home: ZoneId) -> bool {
    let codes = home_codes(chain);
    !codes.is_empty() && (codes.len() > 1 || !codes.contains(&Some(home)))
}

/// Trips with a home stop that is not in the household zone.
pub fn conflicting_trips(table: &TripTable, households: &HouseholdTable) -> usize {
    table
        .chains()
        .filter_map(|(person, chain)| {
            let home = households.get(&person.household)?.zone;
            Some(
                chain
                    .iter()
                    .filter(|trip| {
                        (trip.origin.is_home() && trip.origin_zone != Some(home))
                            || (trip.destination.is_home() && trip.destination_zone != Some(home))
                    })
                    .count(),
            )
        })
        .sum()
}

fn unify(chain: &mut [Trip], home: ZoneId) -> Result<(), InvariantViolation> {
    let Some(first) = chain.first() else {
        return Ok(());
    };
    let wrong = if first.origin.is_home() {
        first.origin_zone
    } else if first.destination.is_home() {
        first.destination_zone
    } else {
        None
    };

    if let Some(wrong) = wrong.filter(|wrong| *wrong != home) {
        for trip in chain.iter_mut() {
            trip.replace_zone(wrong, home);
        }
    }

    for trip in chain.iter_mut() {
        if trip.origin.is_home() {
            trip.origin_zone = Some(home);
        }
        if trip.destination.is_home() {
            trip.destination_zone = Some(home);
        }
    }

    for index in 1..chain.len() {
        let (before, after) = chain.split_at_mut(index);
        let previous = &mut before[index - 1];
        let current = &mut after[0];
        if current.origin_zone == previous.destination_zone {
            continue;
        }
        if current.origin.is_home() || previous.destination.is_home() {
            return Err(InvariantViolation::HomeZoneMismatch {
                trip: current.key.clone(),
                origin_zone: current.origin_zone,
                previous_destination_zone: previous.destination_zone,
            });
        }

        let sides = [current.origin_zone, previous.destination_zone];
        let resolved = sides
            .iter()
            .flatten()
            .find(|zone| **zone != home)
            .or_else(|| sides.iter().flatten().next())
            .copied();
        match resolved {
            Some(zone) => {
                current.origin_zone = Some(zone);
                previous.destination_zone = Some(zone);
            }
            None => {
                return Err(InvariantViolation::UnresolvableZoneConflict {
                    trip: current.key.clone(),
                    zone: home,
                })
            }
        }
    }
    Ok(())
}

impl RepairPass for HomeZoneUnification {
    fn name(&self) -> &'static str {
        "home zone unification"
    }

    fn apply(
        &self,
        mut table: TripTable,
        context: &RepairContext<'_>,
    ) -> Result<(TripTable, PassOutcome), ReconcileError> {
        let mut modified = 0;
        for (person, chain) in table.chains_mut() {
            // Zones cannot be matched up along a chain whose places do not.
            if context.audit.category_breaks.contains(person) {
                continue;
            }
            let home = context
                .households
                .get(&person.household)
                .ok_or_else(|| DataError::UnknownHousehold(person.clone()))?
                .zone;
            if !has_conflict(chain, home) {
                continue;
            }

            let before = chain.to_vec();
            unify(chain, home)?;
            modified += chain
                .iter()
                .zip(&before)
                .filter(|(after, before)| after != before)
                .count();
            log::debug!("unified home zone of {person} to {home}");
        }
        Ok((table, PassOutcome::modified(modified)))
    }
}
