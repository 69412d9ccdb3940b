use indexmap::{IndexMap, IndexSet};
use model::leg::Leg;
use model::person::PersonKey;
use model::trip::{SurveyedTrip, Trip, TripKey};
use survey::database::{HouseholdTable, PersonTable, PrimaryKeyTable, SurveyDatabase, TripTable};
use survey::{DataError, RejectedUnit, UnitPolicy};

/// The survey with every trip placed in its person's chain.
#[derive(Debug, Clone, Default)]
pub struct Sequenced {
    pub households: HouseholdTable,
    pub people: PersonTable,
    pub trips: TripTable,
    pub legs: Vec<Leg>,

    /// Questionnaire trip number to sequence number, per person.
    pub sequence_of: IndexMap<(PersonKey, u8), u32>,

    pub rejected: Vec<RejectedUnit>,
}

/// Numbers each person's trips 1, 2, 3... in the order of their questionnaire
/// trip numbers. Gaps left by dropped rows disappear and equal trip numbers
/// keep their input order.
pub fn sequence_trips(database: SurveyDatabase, policy: UnitPolicy) -> Result<Sequenced, DataError> {
    let SurveyDatabase {
        households,
        mut people,
        non_travelers,
        trips,
        legs,
    } = database;

    let mut by_person: IndexMap<PersonKey, Vec<SurveyedTrip>> = IndexMap::new();
    for trip in trips {
        by_person.entry(trip.person.clone()).or_default().push(trip);
    }

    let mut sequenced = Sequenced::default();
    let mut rejected_persons: IndexSet<PersonKey> = IndexSet::new();

    for (person, mut trips) in by_person {
        if !households.contains(&person.household) {
            reject(
                DataError::UnknownHousehold(person.clone()),
                policy,
                &mut sequenced.rejected,
            )?;
            rejected_persons.insert(person);
            continue;
        }

        trips.sort_by_key(|trip| trip.raw_label);
        for (index, trip) in trips.into_iter().enumerate() {
            let sequence = index as u32 + 1;
            let label = (person.clone(), trip.raw_label);
            if sequenced.sequence_of.contains_key(&label) {
                log::warn!("person {person} reports trip {} twice", trip.raw_label);
            } else {
                sequenced.sequence_of.insert(label, sequence);
            }
            sequenced
                .trips
                .insert(Trip::sequenced(TripKey::new(person.clone(), sequence), trip));
        }
    }

    for person in people.values() {
        let key = &person.key;
        if non_travelers.contains(key) || rejected_persons.contains(key) {
            continue;
        }
        if sequenced.trips.chain(key).is_none() {
            reject(
                DataError::PersonWithoutTrips(key.clone()),
                policy,
                &mut sequenced.rejected,
            )?;
            rejected_persons.insert(key.clone());
        }
    }
    people.retain(|person| !rejected_persons.contains(&person.key));

    let mut orphans = 0;
    for leg in legs {
        match sequenced
            .sequence_of
            .get(&(leg.person.clone(), leg.raw_label))
        {
            Some(&sequence) => sequenced.legs.push(Leg::sequenced(leg, sequence)),
            None => orphans += 1,
        }
    }
    if orphans > 0 {
        log::warn!("{orphans} legs belong to trips that were not sequenced");
    }

    log::info!(
        "sequenced {} trips of {} persons",
        sequenced.trips.len(),
        sequenced.trips.person_count()
    );
    sequenced.households = households;
    sequenced.people = people;
    Ok(sequenced)
}

fn reject(
    error: DataError,
    policy: UnitPolicy,
    rejected: &mut Vec<RejectedUnit>,
) -> Result<(), DataError> {
    match (policy, RejectedUnit::from_error(&error)) {
        (UnitPolicy::Skip, Some(unit)) => {
            log::warn!("skipping {}: {}", unit.unit, unit.reason);
            rejected.push(unit);
            Ok(())
        }
        _ => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use model::leg::SurveyedLeg;
    use model::person::Person;

    use super::*;
    use crate::fixtures::{household, person};

    fn trip(person: &Person, raw_label: u8) -> SurveyedTrip {
        SurveyedTrip {
            person: person.key.clone(),
            raw_label,
            ..Default::default()
        }
    }

    #[test]
    fn sequences_are_dense_and_ordered() {
        let ana = person("H1", 1);
        let mut database = SurveyDatabase::default();
        database.households.insert(household("H1", 100));
        database.people.insert(ana.clone());
        database.trips = vec![trip(&ana, 7), trip(&ana, 2), trip(&ana, 4)];
        database.legs = vec![SurveyedLeg {
            person: ana.key.clone(),
            raw_label: 4,
            leg: 1,
            mode: Default::default(),
            kind: Default::default(),
            wait_minutes: None,
            on_board_minutes: None,
            walk_minutes: None,
            route: None,
        }];

        let sequenced = sequence_trips(database, UnitPolicy::Abort).unwrap();
        let chain = sequenced.trips.chain(&ana.key).unwrap();
        let pairs: Vec<_> = chain.iter().map(|t| (t.key.sequence, t.raw_label)).collect();
        assert_eq!(pairs, vec![(1, 2), (2, 4), (3, 7)]);
        assert_eq!(sequenced.legs[0].key.trip.sequence, 2);
        assert_eq!(sequenced.sequence_of.get(&(ana.key.clone(), 7)), Some(&3));
    }

    #[test]
    fn trips_of_unknown_households_are_rejected() {
        let ghost = person("H9", 1);
        let mut database = SurveyDatabase::default();
        database.trips = vec![trip(&ghost, 1)];

        let error = sequence_trips(database.clone(), UnitPolicy::Abort).unwrap_err();
        assert_eq!(error, DataError::UnknownHousehold(ghost.key.clone()));

        let sequenced = sequence_trips(database, UnitPolicy::Skip).unwrap();
        assert!(sequenced.trips.is_empty());
        assert_eq!(sequenced.rejected[0].unit, "H9/1");
    }

    #[test]
    fn travelers_without_trips_are_rejected() {
        let ana = person("H1", 1);
        let ben = person("H1", 2);
        let carl = person("H1", 3);
        let mut database = SurveyDatabase::default();
        database.households.insert(household("H1", 100));
        database.people.insert(ana.clone());
        database.people.insert(ben.clone());
        database.people.insert(carl.clone());
        database.non_travelers.insert(carl.key.clone());
        database.trips = vec![trip(&ana, 1)];

        let error = sequence_trips(database.clone(), UnitPolicy::Abort).unwrap_err();
        assert_eq!(error, DataError::PersonWithoutTrips(ben.key.clone()));

        let sequenced = sequence_trips(database, UnitPolicy::Skip).unwrap();
        assert!(sequenced.people.get(&ben.key).is_none());
        assert!(sequenced.people.get(&carl.key).is_some());
    }
}
