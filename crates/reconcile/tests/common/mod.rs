#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use model::household::{Household, HouseholdId};
use model::person::{Occupation, Person, PersonKey};
use model::place::PlaceCategory;
use model::purpose::Purpose;
use model::trip::SurveyedTrip;
use model::ZoneId;
use survey::database::{PrimaryKeyTable, SurveyDatabase};

pub type Stop = (PlaceCategory, Option<ZoneId>);

pub fn survey_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 9, 18).unwrap()
}

pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    survey_date().and_hms_opt(hour, minute, 0).unwrap()
}

/// A survey under construction, household by household.
#[derive(Default)]
pub struct Survey {
    pub database: SurveyDatabase,
}

impl Survey {
    pub fn household(mut self, id: &str, zone: ZoneId) -> Self {
        self.database.households.insert(Household {
            id: HouseholdId::from_label(id),
            zone,
            municipality: Some(39),
            expansion_factor: Some(25.0),
            survey_date: survey_date(),
            members: Default::default(),
            vehicles: Default::default(),
            bedrooms: Some(2),
            telephone: true,
            internet: false,
            interior_number: false,
        });
        self
    }

    pub fn person(mut self, household: &str, number: u8, age: u8, occupation: Occupation) -> Self {
        self.database.people.insert(Person {
            key: key(household, number),
            age: Some(age),
            sex: Default::default(),
            occupation,
            education: Default::default(),
        });
        self
    }

    pub fn trip(mut self, trip: SurveyedTrip) -> Self {
        self.database.trips.push(trip);
        self
    }
}

pub fn key(household: &str, number: u8) -> PersonKey {
    PersonKey::new(HouseholdId::from_label(household), number)
}

pub fn trip(
    person: &PersonKey,
    raw_label: u8,
    origin: Stop,
    destination: Stop,
    purpose: Purpose,
) -> SurveyedTrip {
    SurveyedTrip {
        person: person.clone(),
        raw_label,
        origin: origin.0,
        origin_zone: origin.1,
        destination: destination.0,
        destination_zone: destination.1,
        purpose,
        ..Default::default()
    }
}

pub fn timed(mut trip: SurveyedTrip, start: NaiveDateTime, minutes: i64) -> SurveyedTrip {
    trip.start_time = Some(start);
    trip.end_time = Some(start + Duration::minutes(minutes));
    trip
}
