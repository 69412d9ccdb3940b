//! Person attributes read off the repaired trip chain.

use indexmap::IndexMap;
use itertools::Itertools;
use model::imputed::{AgeGroup, DurationBucket, Imputed, SchoolLevel};
use model::person::{Education, Person, PersonKey};
use model::purpose::Purpose;
use model::trip::Trip;
use model::ZoneId;
use survey::database::{PersonTable, TripTable};

#[derive(Debug, Clone, PartialEq)]
pub struct PersonAttributes {
    pub attends_school: bool,
    pub school_zone: Imputed<ZoneId>,
    pub school_travel_time: Imputed<DurationBucket>,
    pub school_level: Imputed<SchoolLevel>,
    pub works: bool,
    pub work_zone: Imputed<ZoneId>,
    pub work_travel_time: Imputed<DurationBucket>,
    pub age_group: Option<AgeGroup>,
}

/// Zone of the first trip with `purpose` that has a destination zone.
fn destination_zone(person: &PersonKey, chain: &[Trip], purpose: Purpose) -> Option<ZoneId> {
    let zones: Vec<ZoneId> = chain
        .iter()
        .filter(|trip| trip.purpose == purpose)
        .filter_map(|trip| trip.destination_zone)
        .unique()
        .collect();
    if zones.len() > 1 {
        log::debug!("{person} has {} distinct {purpose:?} zones, using the first", zones.len());
    }
    zones.first().copied()
}

/// Bucket of the longest timed trip with `purpose`.
fn travel_time(chain: &[Trip], purpose: Purpose) -> Option<DurationBucket> {
    chain
        .iter()
        .filter(|trip| trip.purpose == purpose)
        .filter_map(Trip::duration_minutes)
        .max_by(f64::total_cmp)
        .and_then(DurationBucket::from_minutes)
}

fn applicable<T>(applies: bool, value: impl FnOnce() -> Option<T>) -> Imputed<T> {
    if applies {
        value().into()
    } else {
        Imputed::NotApplicable
    }
}

pub fn school_level(education: Education, age: Option<u8>) -> Option<SchoolLevel> {
    match education {
        Education::None => Some(SchoolLevel::Basic),
        Education::Basic => Some(match age {
            Some(age) if age <= 14 => SchoolLevel::Basic,
            _ => SchoolLevel::UpperSecondary,
        }),
        Education::UpperSecondary => Some(match age {
            Some(age) if age < 18 => SchoolLevel::UpperSecondary,
            _ => SchoolLevel::Higher,
        }),
        Education::Higher => Some(SchoolLevel::Higher),
        Education::Unspecified => None,
    }
}

pub fn impute(person: &Person, chain: &[Trip]) -> PersonAttributes {
    let has_trip = |purpose| chain.iter().any(|trip| trip.purpose == purpose);
    let attends_school = has_trip(Purpose::Study) || person.occupation.is_student();
    let works = has_trip(Purpose::Work) || person.occupation.worked();

    PersonAttributes {
        attends_school,
        school_zone: applicable(attends_school, || {
            destination_zone(&person.key, chain, Purpose::Study)
        }),
        school_travel_time: applicable(attends_school, || travel_time(chain, Purpose::Study)),
        school_level: applicable(attends_school, || {
            school_level(person.education, person.age)
        }),
        works,
        work_zone: applicable(works, || destination_zone(&person.key, chain, Purpose::Work)),
        work_travel_time: applicable(works, || travel_time(chain, Purpose::Work)),
        age_group: person.age.and_then(AgeGroup::from_age),
    }
}

/// Attributes of every person, travellers or not, in person table order.
pub fn impute_all(people: &PersonTable, trips: &TripTable) -> IndexMap<PersonKey, PersonAttributes> {
    people
        .values()
        .map(|person| {
            let chain = trips.chain(&person.key).unwrap_or_default();
            (person.key.clone(), impute(person, chain))
        })
        .collect()
}
