use model::person::Occupation;
use model::place::PlaceCategory;
use model::purpose::Purpose;
use survey::database::{PrimaryKeyTable, TripTable};

use super::{PassOutcome, RepairContext, RepairPass};
use crate::ReconcileError;

/// Fills unknown purposes from the destination where the destination settles
/// it. The rest stay unknown and are flagged.
pub struct PurposeFromDestination;

impl RepairPass for PurposeFromDestination {
    fn name(&self) -> &'static str {
        "purpose from destination"
    }

    fn apply(
        &self,
        mut table: TripTable,
        _context: &RepairContext<'_>,
    ) -> Result<(TripTable, PassOutcome), ReconcileError> {
        let mut outcome = PassOutcome::default();
        for (_, chain) in table.chains_mut() {
            for trip in chain.iter_mut().filter(|trip| !trip.purpose.is_specified()) {
                match Purpose::implied_by(trip.destination) {
                    Some(purpose) => {
                        trip.purpose = purpose;
                        outcome.modified += 1;
                    }
                    None => outcome.flagged.push(trip.key.clone()),
                }
            }
        }
        Ok((table, outcome))
    }
}

/// Makes purpose and destination tell the same story. Arriving home is always
/// a return home. A "return home" that ends elsewhere gets the purpose of the
/// place it ends at.
pub struct PurposeDestinationAgreement;

impl PurposeDestinationAgreement {
    /// The purpose of a trip declared as a return home that ended at
    /// `destination`, when there is a rule for it.
    pub fn purpose_at(destination: PlaceCategory, occupation: Occupation) -> Option<Purpose> {
        match destination {
            PlaceCategory::Other | PlaceCategory::OtherHome => Some(Purpose::Other),
            PlaceCategory::Health => Some(Purpose::Health),
            PlaceCategory::School => Some(match occupation {
                Occupation::Student => Purpose::Study,
                Occupation::Homemaker => Purpose::EscortPickup,
                _ => Purpose::Other,
            }),
            PlaceCategory::Workplace => Some(Purpose::Work),
            PlaceCategory::Shop => Some(Purpose::Shopping),
            PlaceCategory::Home
            | PlaceCategory::Recreation
            | PlaceCategory::CarryOver
            | PlaceCategory::Unspecified => None,
        }
    }
}

impl RepairPass for PurposeDestinationAgreement {
    fn name(&self) -> &'static str {
        "purpose and destination agreement"
    }

    fn apply(
        &self,
        mut table: TripTable,
        context: &RepairContext<'_>,
    ) -> Result<(TripTable, PassOutcome), ReconcileError> {
        let mut outcome = PassOutcome::default();
        for (person, chain) in table.chains_mut() {
            let occupation = context
                .people
                .get(person)
                .map(|person| person.occupation)
                .unwrap_or_default();

            for trip in chain.iter_mut() {
                if trip.destination.is_home() {
                    if trip.purpose != Purpose::ReturnHome {
                        trip.purpose = Purpose::ReturnHome;
                        outcome.modified += 1;
                    }
                    continue;
                }
                if trip.purpose != Purpose::ReturnHome {
                    continue;
                }
                match Self::purpose_at(trip.destination, occupation) {
                    Some(purpose) => {
                        trip.purpose = purpose;
                        outcome.modified += 1;
                    }
                    None => outcome.flagged.push(trip.key.clone()),
                }
            }
        }
        Ok((table, outcome))
    }
}

#[cfg(test)]
mod tests {
    use model::place::PlaceCategory::*;
    use model::trip::TripKey;

    use super::*;
    use crate::chain::ChainAudit;
    use crate::fixtures::{households, people, person, person_key, table, trip};

    fn run(pass: &dyn RepairPass, trips: TripTable, occupation: Occupation) -> (TripTable, PassOutcome) {
        let households = households(&[("H1", 100)]);
        let mut ana = person("H1", 1);
        ana.occupation = occupation;
        let people = people(vec![ana]);
        let audit = ChainAudit::of(&trips);
        let context = RepairContext {
            households: &households,
            people: &people,
            audit: &audit,
        };
        pass.apply(trips, &context).unwrap()
    }

    #[test]
    fn destinations_settle_unknown_purposes() {
        let ana = person_key("H1", 1);
        let trips = table(vec![
            trip(&ana, 1, (Home, None), (Shop, None), Purpose::Unspecified),
            trip(&ana, 2, (Shop, None), (Other, None), Purpose::Unspecified),
            trip(&ana, 3, (Other, None), (Home, None), Purpose::Unspecified),
        ]);

        let (trips, outcome) = run(&PurposeFromDestination, trips, Occupation::Employee);
        let purposes: Vec<_> = trips.trips().map(|t| t.purpose).collect();
        assert_eq!(
            purposes,
            vec![Purpose::Shopping, Purpose::Unspecified, Purpose::ReturnHome]
        );
        assert_eq!(outcome.modified, 2);
        assert_eq!(outcome.flagged, vec![TripKey::new(ana, 2)]);
    }

    #[test]
    fn returns_home_end_at_home() {
        let ana = person_key("H1", 1);
        let trips = table(vec![
            trip(&ana, 1, (Home, None), (School, None), Purpose::ReturnHome),
            trip(&ana, 2, (School, None), (Recreation, None), Purpose::ReturnHome),
            trip(&ana, 3, (Recreation, None), (Home, None), Purpose::Shopping),
        ]);

        let (trips, outcome) = run(&PurposeDestinationAgreement, trips.clone(), Occupation::Homemaker);
        let purposes: Vec<_> = trips.trips().map(|t| t.purpose).collect();
        assert_eq!(
            purposes,
            vec![Purpose::EscortPickup, Purpose::ReturnHome, Purpose::ReturnHome]
        );
        assert_eq!(outcome.modified, 2);
        assert_eq!(outcome.flagged, vec![TripKey::new(ana.clone(), 2)]);

        let (again, outcome) = run(&PurposeDestinationAgreement, trips, Occupation::Homemaker);
        assert_eq!(outcome.modified, 0);
        assert_eq!(again.trips().count(), 3);
    }

    #[test]
    fn school_purpose_depends_on_occupation() {
        assert_eq!(
            PurposeDestinationAgreement::purpose_at(School, Occupation::Student),
            Some(Purpose::Study)
        );
        assert_eq!(
            PurposeDestinationAgreement::purpose_at(School, Occupation::Retired),
            Some(Purpose::Other)
        );
        assert_eq!(
            PurposeDestinationAgreement::purpose_at(OtherHome, Occupation::Student),
            Some(Purpose::Other)
        );
        assert_eq!(PurposeDestinationAgreement::purpose_at(Recreation, Occupation::Student), None);
    }
}
