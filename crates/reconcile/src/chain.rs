use std::collections::BTreeMap;

use indexmap::IndexSet;
use itertools::Itertools;
use model::person::PersonKey;
use model::purpose::Purpose;
use model::trip::TripKey;
use serde::Serialize;
use survey::database::TripTable;

/// Persons whose trips do not link up: some trip starts somewhere other than
/// where the previous one ended. Such a chain almost always means an
/// unreported trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChainAudit {
    /// Origin category differs from the previous destination category.
    pub category_breaks: IndexSet<PersonKey>,

    /// Origin zone differs from the previous destination zone.
    pub zone_breaks: IndexSet<PersonKey>,
}

impl ChainAudit {
    pub fn of(table: &TripTable) -> Self {
        let mut audit = Self::default();
        for (person, chain) in table.chains() {
            for (previous, current) in chain.iter().tuple_windows() {
                if current.origin != previous.destination {
                    audit.category_breaks.insert(person.clone());
                }
                if current.origin_zone != previous.destination_zone {
                    audit.zone_breaks.insert(person.clone());
                }
            }
        }
        audit
    }

    pub fn missing_trips(&self) -> IndexSet<PersonKey> {
        self.category_breaks
            .union(&self.zone_breaks)
            .cloned()
            .collect()
    }

    pub fn is_consistent(&self, person: &PersonKey) -> bool {
        !self.category_breaks.contains(person) && !self.zone_breaks.contains(person)
    }

    /// Persons failing here that did not fail in `baseline`.
    pub fn regressions_from(&self, baseline: &ChainAudit) -> Vec<PersonKey> {
        let before = baseline.missing_trips();
        self.missing_trips()
            .into_iter()
            .filter(|person| !before.contains(person))
            .collect()
    }
}

/// Trips that start before the previous trip of the same person ended.
/// Reported only. The survey times are too coarse to repair them.
pub fn overlaps(table: &TripTable) -> Vec<TripKey> {
    table
        .chains()
        .flat_map(|(_, chain)| chain.iter().tuple_windows::<(_, _)>())
        .filter(|(previous, current)| match (current.start_time, previous.end_time) {
            (Some(start), Some(end)) => start < end,
            _ => false,
        })
        .map(|(_, current)| current.key.clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurposeTransition {
    pub from: Purpose,
    pub to: Purpose,
    pub count: usize,
}

/// How often a trip with one purpose is followed by a trip with another.
/// Persons in `ignore`, usually the broken chains, are left out.
pub fn purpose_transitions(
    table: &TripTable,
    ignore: &IndexSet<PersonKey>,
) -> Vec<PurposeTransition> {
    let mut counts: BTreeMap<(Purpose, Purpose), usize> = BTreeMap::new();
    for (person, chain) in table.chains() {
        if ignore.contains(person) {
            continue;
        }
        for (previous, current) in chain.iter().tuple_windows() {
            *counts.entry((previous.purpose, current.purpose)).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|((from, to), count)| PurposeTransition { from, to, count })
        .collect()
}
