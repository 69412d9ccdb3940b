use model::place::PlaceCategory;
use model::purpose::Purpose;
use model::trip::Trip;
use survey::database::TripTable;

use super::{PassOutcome, RepairContext, RepairPass};
use crate::ReconcileError;

/// A home to home trip declared as a work trip is a trip to work whose
/// destination was recorded as the starting point. The destination becomes
/// the workplace, and so does the origin of the trip that follows.
pub struct HomeToHomeWork;

impl RepairPass for HomeToHomeWork {
    fn name(&self) -> &'static str {
        "home to home work trips"
    }

    fn apply(
        &self,
        mut table: TripTable,
        _context: &RepairContext<'_>,
    ) -> Result<(TripTable, PassOutcome), ReconcileError> {
        let mut modified = 0;
        for key in table.keys() {
            // Checked against the current state, as an earlier rewrite may have moved the origin.
            let Some(trip) = table.get_mut(&key).filter(|trip| is_home_to_home_work(trip)) else {
                continue;
            };
            trip.destination = PlaceCategory::Workplace;
            modified += 1;

            let next = table.next(&key).map(|next| next.key.clone());
            if let Some(next) = next.and_then(|next| table.get_mut(&next)) {
                if next.origin != PlaceCategory::Workplace {
                    next.origin = PlaceCategory::Workplace;
                    modified += 1;
                }
            }
        }
        Ok((table, PassOutcome::modified(modified)))
    }
}

fn is_home_to_home_work(trip: &Trip) -> bool {
    trip.origin.is_home() && trip.destination.is_home() && trip.purpose == Purpose::Work
}

#[cfg(test)]
mod tests {
    use model::place::PlaceCategory::*;

    use super::*;
    use crate::chain::ChainAudit;
    use crate::fixtures::{households, people, person_key, table, trip};

    fn run(trips: TripTable) -> (TripTable, PassOutcome) {
        let households = households(&[("H1", 100)]);
        let people = people(vec![]);
        let audit = ChainAudit::of(&trips);
        let context = RepairContext {
            households: &households,
            people: &people,
            audit: &audit,
        };
        HomeToHomeWork.apply(trips, &context).unwrap()
    }

    #[test]
    fn work_trips_between_homes_lead_to_work() {
        let ana = person_key("H1", 1);
        let trips = table(vec![
            trip(&ana, 1, (Home, Some(100)), (Home, Some(12)), Purpose::Work),
            trip(&ana, 2, (Home, Some(12)), (Home, Some(100)), Purpose::ReturnHome),
        ]);

        let (trips, outcome) = run(trips);
        let chain = trips.chain(&ana).unwrap();
        assert_eq!(chain[0].destination, Workplace);
        assert_eq!(chain[1].origin, Workplace);
        assert_eq!(outcome.modified, 2);
        assert!(ChainAudit::of(&trips).is_consistent(&ana));

        let (_, again) = run(trips);
        assert_eq!(again.modified, 0);
    }

    #[test]
    fn a_rewritten_successor_is_not_rewritten_again() {
        let ana = person_key("H1", 1);
        let trips = table(vec![
            trip(&ana, 1, (Home, Some(100)), (Home, Some(100)), Purpose::Work),
            trip(&ana, 2, (Home, Some(100)), (Home, Some(100)), Purpose::Work),
        ]);

        let (trips, outcome) = run(trips);
        let chain = trips.chain(&ana).unwrap();
        assert_eq!((chain[0].origin, chain[0].destination), (Home, Workplace));
        assert_eq!((chain[1].origin, chain[1].destination), (Workplace, Home));
        assert_eq!(outcome.modified, 2);
    }

    #[test]
    fn last_trips_have_no_successor_to_update() {
        let ana = person_key("H1", 1);
        let trips = table(vec![
            trip(&ana, 1, (Other, Some(5)), (Home, Some(100)), Purpose::ReturnHome),
            trip(&ana, 2, (Home, Some(100)), (Home, Some(100)), Purpose::Work),
        ]);

        let (trips, outcome) = run(trips);
        let chain = trips.chain(&ana).unwrap();
        assert_eq!(chain[1].destination, Workplace);
        assert_eq!(chain[1].origin, Home);
        assert_eq!(outcome.modified, 1);
    }
}
