use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use model::household::{DeclaredMembers, Household, HouseholdId, Vehicles};
use model::leg::{ModeGroup, ModeKind, SurveyedLeg};
use model::person::{Person, PersonKey};
use model::trip::SurveyedTrip;
use serde::Serialize;
use utility::id::Id;
use utility::serde::survey_time::{parse_clock, parse_survey_date};

use crate::data_model::leg_rows::RawLegRow;
use crate::data_model::survey_rows::RawSurveyRow;
use crate::database::{PrimaryKeyTable, SurveyDatabase};
use crate::error::{DataError, NormalizeError, RejectedUnit};
use crate::fixes::{IdFix, NormalizationFixes, RawTripKey};
use crate::UnitPolicy;

/// Counts of everything the normalizer dropped or changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizationReport {
    pub rows_read: usize,
    pub rows_dropped_by_id_fixes: usize,
    pub duplicate_rows_dropped: usize,
    pub persons_without_travel: usize,
    pub households_with_zone_override: usize,
    pub rejected: Vec<RejectedUnit>,
    pub leg_rows_read: usize,
    pub empty_leg_slots: usize,
    pub walking_legs_relabeled: usize,
    pub orphan_legs: usize,
}

/// Splits a `HOUSEHOLD/PERSON-TRIP` label. The household part may itself
/// contain slashes and dashes, the person and trip numbers have one or two
/// digits.
pub fn parse_id_label(label: &str) -> Result<RawTripKey, NormalizeError> {
    let invalid = || NormalizeError::InvalidIdLabel(label.to_owned());
    let (household, rest) = label.trim().rsplit_once('/').ok_or_else(invalid)?;
    let (person, trip) = rest.split_once('-').ok_or_else(invalid)?;

    let household = household.trim();
    if household.is_empty() {
        return Err(invalid());
    }
    let person = short_number(person).ok_or_else(invalid)?;
    let trip = short_number(trip).ok_or_else(invalid)?;
    Ok(RawTripKey(Id::from_label(household), person, trip))
}

fn short_number(value: &str) -> Option<u8> {
    let valid = (1..=2).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit());
    valid.then(|| value.parse().ok()).flatten()
}

/// A survey row that survived the id fixes, with its parsed key.
struct KeyedRow {
    key: RawTripKey,
    label: String,
    row: RawSurveyRow,
}

/// Turns raw survey rows into household, person and trip records.
pub fn normalize_survey(
    rows: Vec<RawSurveyRow>,
    fixes: &NormalizationFixes,
    policy: UnitPolicy,
) -> Result<(SurveyDatabase, NormalizationReport), NormalizeError> {
    let mut report = NormalizationReport {
        rows_read: rows.len(),
        ..Default::default()
    };

    let mut keyed = Vec::with_capacity(rows.len());
    for row in rows {
        let label = match fixes.fix_label(&row.id_label) {
            IdFix::Keep(label) => label.trim().to_owned(),
            IdFix::Drop => {
                report.rows_dropped_by_id_fixes += 1;
                continue;
            }
        };
        let key = parse_id_label(&label)?;
        if fixes.is_duplicate(&key) {
            log::debug!("dropping duplicate row {label}");
            report.duplicate_rows_dropped += 1;
            continue;
        }
        keyed.push(KeyedRow { key, label, row });
    }

    // Households are sometimes recorded with a different date per member. The
    // first date seen applies to the whole household.
    let mut survey_dates: HashMap<HouseholdId, NaiveDate> = HashMap::new();
    for KeyedRow { key, label, row } in &keyed {
        if survey_dates.contains_key(&key.0) {
            continue;
        }
        if let Some(date) = row.survey_date.as_deref().filter(|d| !d.trim().is_empty()) {
            let date = parse_survey_date(date).map_err(|source| NormalizeError::InvalidTime {
                label: label.clone(),
                source,
            })?;
            survey_dates.insert(key.0.clone(), date);
        }
    }

    let mut database = SurveyDatabase::default();
    let mut rejected_households: HashSet<HouseholdId> = HashSet::new();
    for KeyedRow { key, label, row } in keyed {
        let RawTripKey(household_id, person_number, raw_trip) = key;
        if rejected_households.contains(&household_id) {
            continue;
        }

        if !database.households.contains(&household_id) {
            let survey_date = *survey_dates
                .get(&household_id)
                .ok_or_else(|| NormalizeError::MissingSurveyDate(label.clone()))?;
            match household_record(&household_id, &row, survey_date, fixes, &mut report) {
                Ok(household) => database.households.insert(household),
                Err(error) => {
                    reject(error, policy, &mut report)?;
                    rejected_households.insert(household_id);
                    continue;
                }
            }
        }

        let person_key = PersonKey::new(household_id.clone(), person_number);
        if !database.people.contains(&person_key) {
            database.people.insert(Person {
                key: person_key.clone(),
                age: row.age,
                sex: row.sex,
                occupation: row.occupation,
                education: row.education,
            });
        }

        if raw_trip == 0 {
            report.persons_without_travel += 1;
            database.non_travelers.insert(person_key);
            continue;
        }

        let survey_date = survey_dates
            .get(&household_id)
            .copied()
            .ok_or_else(|| NormalizeError::MissingSurveyDate(label.clone()))?;
        let (start_time, end_time) = trip_times(&label, &row, survey_date)?;
        database.trips.push(SurveyedTrip {
            person: person_key,
            raw_label: raw_trip,
            origin: row.origin,
            destination: row.destination,
            origin_zone: row.origin_zone,
            destination_zone: row.destination_zone,
            purpose: row.purpose,
            mode: row.mode,
            start_time,
            end_time,
            expansion_factor: row.expansion_factor,
        });
    }

    log::info!(
        "normalized {} households, {} people and {} trips",
        database.households.len(),
        database.people.len(),
        database.trips.len()
    );
    Ok((database, report))
}

fn reject(
    error: DataError,
    policy: UnitPolicy,
    report: &mut NormalizationReport,
) -> Result<(), NormalizeError> {
    match (policy, RejectedUnit::from_error(&error)) {
        (UnitPolicy::Skip, Some(rejected)) => {
            log::warn!("skipping {}: {}", rejected.unit, rejected.reason);
            report.rejected.push(rejected);
            Ok(())
        }
        _ => Err(error.into()),
    }
}

fn household_record(
    id: &HouseholdId,
    row: &RawSurveyRow,
    survey_date: NaiveDate,
    fixes: &NormalizationFixes,
    report: &mut NormalizationReport,
) -> Result<Household, DataError> {
    let zone = match fixes.household_zone(id) {
        Some(zone) => {
            report.households_with_zone_override += 1;
            Some(zone)
        }
        None => row.household_zone,
    };
    let zone = zone.ok_or_else(|| DataError::MissingHouseholdZone(id.clone()))?;

    Ok(Household {
        id: id.clone(),
        zone,
        municipality: row.municipality,
        expansion_factor: row.expansion_factor,
        survey_date,
        members: DeclaredMembers {
            total: row.total_members.unwrap_or_default(),
            over_6: row.members_over_6.unwrap_or_default(),
            under_5: row.members_under_5.unwrap_or_default(),
            workers_14_plus: row.workers_14_plus.unwrap_or_default(),
        },
        vehicles: Vehicles {
            cars: row.cars.unwrap_or_default(),
            pickups: row.pickups.unwrap_or_default(),
            motorcycles: row.motorcycles.unwrap_or_default(),
            bicycles: row.bicycles.unwrap_or_default(),
        },
        bedrooms: row.bedrooms,
        telephone: row.telephone,
        internet: row.internet,
        interior_number: row.interior_number,
    })
}

/// Start and end timestamps of a trip. The end is always derived from the
/// start and the reported travel time, the reported arrival clock is not
/// trusted.
fn trip_times(
    label: &str,
    row: &RawSurveyRow,
    survey_date: NaiveDate,
) -> Result<(Option<NaiveDateTime>, Option<NaiveDateTime>), NormalizeError> {
    let clock = |value: &Option<String>| {
        value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(parse_clock)
            .transpose()
            .map_err(|source| NormalizeError::InvalidTime {
                label: label.to_owned(),
                source,
            })
    };

    let Some(start) = clock(&row.start_time)? else {
        return Ok((None, None));
    };
    let start = survey_date.and_time(NaiveTime::default()) + start;
    let end = clock(&row.travel_time)?.map(|travel| start + travel);
    Ok((Some(start), end))
}

/// Turns the leg slot rows into legs of the already normalized trips. Legs of
/// dropped rows and rejected households are left out.
pub fn normalize_legs(
    rows: Vec<RawLegRow>,
    fixes: &NormalizationFixes,
    database: &mut SurveyDatabase,
    report: &mut NormalizationReport,
) -> Result<(), NormalizeError> {
    report.leg_rows_read += rows.len();

    let trips: HashSet<(PersonKey, u8)> = database
        .trips
        .iter()
        .map(|trip| (trip.person.clone(), trip.raw_label))
        .collect();

    for row in rows {
        let label = match fixes.fix_label(&row.id_label) {
            IdFix::Keep(label) => label.trim().to_owned(),
            IdFix::Drop => continue,
        };
        let key = parse_id_label(&label)?;
        if fixes.is_duplicate(&key) {
            continue;
        }
        let Some(mode) = row.mode else {
            report.empty_leg_slots += 1;
            continue;
        };

        let RawTripKey(household, person, raw_trip) = key;
        let person = PersonKey::new(household, person);
        if !trips.contains(&(person.clone(), raw_trip)) {
            log::debug!("leg {} of {label} has no trip", row.leg);
            report.orphan_legs += 1;
            continue;
        }

        let mut kind = row.kind.unwrap_or_default();
        if mode == ModeGroup::Walk && kind == ModeKind::Unspecified {
            kind = ModeKind::Walked;
            report.walking_legs_relabeled += 1;
        }

        database.legs.push(SurveyedLeg {
            person,
            raw_label: raw_trip,
            leg: row.leg,
            mode,
            kind,
            wait_minutes: hours_and_minutes(row.wait_hours, row.wait_minutes),
            on_board_minutes: hours_and_minutes(
                row.on_board_hours.max(row.on_board_hours_alt),
                row.on_board_minutes,
            ),
            walk_minutes: row.walk_minutes,
            route: row.route.filter(|route| !route.trim().is_empty()),
        });
    }
    Ok(())
}

fn hours_and_minutes(hours: Option<u32>, minutes: Option<u32>) -> Option<u32> {
    if hours.is_none() && minutes.is_none() {
        return None;
    }
    Some(
        hours
            .unwrap_or_default()
            .saturating_mul(60)
            .saturating_add(minutes.unwrap_or_default()),
    )
}
