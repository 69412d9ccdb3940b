//! Small hand-built surveys for unit tests.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use model::household::{Household, HouseholdId};
use model::person::{Person, PersonKey};
use model::place::PlaceCategory;
use model::purpose::Purpose;
use model::trip::{SurveyedTrip, Trip, TripKey};
use model::ZoneId;
use survey::database::{HouseholdTable, PersonTable, PrimaryKeyTable, TripTable};

pub fn household(id: &str, zone: ZoneId) -> Household {
    Household {
        id: HouseholdId::new(id.to_owned()),
        zone,
        municipality: None,
        expansion_factor: Some(1.0),
        survey_date: NaiveDate::from_ymd_opt(2019, 9, 18).unwrap(),
        members: Default::default(),
        vehicles: Default::default(),
        bedrooms: None,
        telephone: false,
        internet: false,
        interior_number: false,
    }
}

pub fn households(list: &[(&str, ZoneId)]) -> HouseholdTable {
    HouseholdTable::from_rows(list.iter().map(|(id, zone)| household(id, *zone)).collect())
}

pub fn person_key(household: &str, number: u8) -> PersonKey {
    PersonKey::new(HouseholdId::new(household.to_owned()), number)
}

pub fn person(household: &str, number: u8) -> Person {
    Person {
        key: person_key(household, number),
        age: None,
        sex: Default::default(),
        occupation: Default::default(),
        education: Default::default(),
    }
}

pub fn people(list: Vec<Person>) -> PersonTable {
    PersonTable::from_rows(list)
}

pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 9, 18)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .unwrap()
}

/// A trip from `origin` to `destination`, each a category and zone.
pub fn trip(
    person: &PersonKey,
    sequence: u32,
    origin: (PlaceCategory, Option<ZoneId>),
    destination: (PlaceCategory, Option<ZoneId>),
    purpose: Purpose,
) -> Trip {
    Trip::sequenced(
        TripKey::new(person.clone(), sequence),
        SurveyedTrip {
            person: person.clone(),
            raw_label: sequence as u8,
            origin: origin.0,
            origin_zone: origin.1,
            destination: destination.0,
            destination_zone: destination.1,
            purpose,
            ..Default::default()
        },
    )
}

pub fn timed(mut trip: Trip, start: NaiveDateTime, minutes: i64) -> Trip {
    trip.start_time = Some(start);
    trip.end_time = Some(start + Duration::minutes(minutes));
    trip
}

pub fn table(trips: Vec<Trip>) -> TripTable {
    let mut table = TripTable::new();
    for trip in trips {
        table.insert(trip);
    }
    table
}
