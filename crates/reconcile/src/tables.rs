//! Flat output records, one struct per written table.
//!
//! CSV records keep every column on every row, missing values are empty
//! cells. Column names are part of the output contract.

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use model::household::{Household, HouseholdId};
use model::imputed::{AgeGroup, DurationBucket, Imputed, SchoolLevel};
use model::leg::{Leg, ModeGroup, ModeKind};
use model::person::{Education, Occupation, Person, PersonKey, Sex};
use model::place::PlaceCategory;
use model::purpose::Purpose;
use model::{ExpansionFactor, ZoneId};
use schemars::JsonSchema;
use serde::Serialize;
use survey::database::{HouseholdTable, PersonTable, PrimaryKeyTable, TripTable};
use utility::serde::date_time;

use crate::chain::ChainAudit;
use crate::impute::PersonAttributes;
use crate::Reconciled;

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TripRecord {
    pub household: HouseholdId,
    pub person: u8,
    pub sequence: u32,
    pub raw_label: u8,
    pub origin: PlaceCategory,
    pub destination: PlaceCategory,
    pub origin_zone: Option<ZoneId>,
    pub destination_zone: Option<ZoneId>,
    pub purpose: Purpose,
    pub mode: ModeGroup,

    #[serde(serialize_with = "date_time::serialize_option")]
    #[schemars(schema_with = "date_time::schema_option")]
    pub start_time: Option<NaiveDateTime>,

    #[serde(serialize_with = "date_time::serialize_option")]
    #[schemars(schema_with = "date_time::schema_option")]
    pub end_time: Option<NaiveDateTime>,

    pub duration_minutes: Option<f64>,

    /// Hours spent at the destination before the next trip starts.
    pub stay_hours: Option<f64>,

    /// 1 for the first work (or study) trip of the day, 2 for the second...
    pub purpose_rank: Option<u32>,

    pub expansion_factor: Option<ExpansionFactor>,
}

pub fn trip_records(table: &TripTable) -> Vec<TripRecord> {
    let mut records = Vec::with_capacity(table.len());
    for (person, chain) in table.chains() {
        let mut ranks: IndexMap<Purpose, u32> = IndexMap::new();
        for (index, trip) in chain.iter().enumerate() {
            let purpose_rank = match trip.purpose {
                Purpose::Work | Purpose::Study => {
                    let rank = ranks.entry(trip.purpose).or_default();
                    *rank += 1;
                    Some(*rank)
                }
                _ => None,
            };
            let stay_hours = chain
                .get(index + 1)
                .and_then(|next| Some(next.start_time? - trip.end_time?))
                .map(|stay| stay.num_seconds() as f64 / 3600.0);

            records.push(TripRecord {
                household: person.household.clone(),
                person: person.person,
                sequence: trip.key.sequence,
                raw_label: trip.raw_label,
                origin: trip.origin,
                destination: trip.destination,
                origin_zone: trip.origin_zone,
                destination_zone: trip.destination_zone,
                purpose: trip.purpose,
                mode: trip.mode,
                start_time: trip.start_time,
                end_time: trip.end_time,
                duration_minutes: trip.duration_minutes(),
                stay_hours,
                purpose_rank,
                expansion_factor: trip.expansion_factor,
            });
        }
    }
    records
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct LegRecord {
    pub household: HouseholdId,
    pub person: u8,
    pub sequence: u32,
    pub leg: u8,
    pub mode: ModeGroup,
    pub kind: ModeKind,
    pub wait_minutes: Option<u32>,
    pub on_board_minutes: Option<u32>,
    pub walk_minutes: Option<u32>,
    pub route: Option<String>,
}

impl From<&Leg> for LegRecord {
    fn from(leg: &Leg) -> Self {
        Self {
            household: leg.key.trip.person.household.clone(),
            person: leg.key.trip.person.person,
            sequence: leg.key.trip.sequence,
            leg: leg.key.leg,
            mode: leg.mode,
            kind: leg.kind,
            wait_minutes: leg.wait_minutes,
            on_board_minutes: leg.on_board_minutes,
            walk_minutes: leg.walk_minutes,
            route: leg.route.clone(),
        }
    }
}

pub fn leg_records(legs: &[Leg]) -> Vec<LegRecord> {
    let mut records: Vec<LegRecord> = legs.iter().map(LegRecord::from).collect();
    records.sort_by(|a, b| {
        (&a.household, a.person, a.sequence, a.leg).cmp(&(&b.household, b.person, b.sequence, b.leg))
    });
    records
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct PersonRecord {
    pub household: HouseholdId,
    pub person: u8,
    pub age: Option<u8>,
    pub age_group: Option<AgeGroup>,
    pub sex: Sex,
    pub occupation: Occupation,
    pub education: Education,
    pub trips: usize,
    pub attends_school: bool,
    pub school_level: Imputed<SchoolLevel>,
    pub school_zone: Imputed<ZoneId>,
    pub school_travel_time: Imputed<DurationBucket>,
    pub works: bool,
    pub work_zone: Imputed<ZoneId>,
    pub work_travel_time: Imputed<DurationBucket>,

    /// The person's chain still does not link up after repair.
    pub missing_trips: bool,

    pub expansion_factor: Option<ExpansionFactor>,
}

pub fn person_records(
    people: &PersonTable,
    households: &HouseholdTable,
    trips: &TripTable,
    attributes: &IndexMap<PersonKey, PersonAttributes>,
    residual: &ChainAudit,
) -> Vec<PersonRecord> {
    people
        .values()
        .filter_map(|person| {
            let attributes = attributes.get(&person.key)?;
            Some(PersonRecord {
                household: person.key.household.clone(),
                person: person.key.person,
                age: person.age,
                age_group: attributes.age_group,
                sex: person.sex,
                occupation: person.occupation,
                education: person.education,
                trips: trips.chain(&person.key).map_or(0, <[_]>::len),
                attends_school: attributes.attends_school,
                school_level: attributes.school_level,
                school_zone: attributes.school_zone,
                school_travel_time: attributes.school_travel_time,
                works: attributes.works,
                work_zone: attributes.work_zone,
                work_travel_time: attributes.work_travel_time,
                missing_trips: !residual.is_consistent(&person.key),
                expansion_factor: households
                    .get(&person.key.household)
                    .and_then(|household| household.expansion_factor),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct HouseholdRecord {
    pub household: HouseholdId,
    pub zone: ZoneId,
    pub municipality: Option<u32>,
    pub expansion_factor: Option<ExpansionFactor>,
    pub survey_date: NaiveDate,
    pub members: u32,
    pub members_over_6: u32,
    pub members_under_5: u32,
    pub workers_14_plus: u32,
    pub surveyed_members: u32,
    pub cars: u32,
    pub pickups: u32,
    pub motorcycles: u32,
    pub bicycles: u32,
    pub motorized_vehicles: u32,
    pub bedrooms: Option<u32>,
    pub telephone: bool,
    pub internet: bool,
    pub interior_number: bool,
}

/// Member counts as declared and as found among the surveyed persons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ObservedMembers {
    members: u32,
    workers_14_plus: u32,
    non_workers_14_plus: u32,
}

fn observed_members<'a>(
    people: impl Iterator<Item = &'a Person>,
    attributes: &IndexMap<PersonKey, PersonAttributes>,
) -> IndexMap<HouseholdId, ObservedMembers> {
    let mut observed: IndexMap<HouseholdId, ObservedMembers> = IndexMap::new();
    for person in people {
        let counts = observed.entry(person.key.household.clone()).or_default();
        counts.members += 1;
        if person.age.is_some_and(|age| age >= 14) {
            let works = attributes
                .get(&person.key)
                .map_or(person.occupation.worked(), |attributes| attributes.works);
            if works {
                counts.workers_14_plus += 1;
            } else {
                counts.non_workers_14_plus += 1;
            }
        }
    }
    observed
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HouseholdSummary {
    pub households: usize,
    pub adjusted: usize,
    pub missing_members: usize,
    pub adjusted_percent: Option<f64>,
    pub missing_members_percent: Option<f64>,
}

fn percent(count: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| count as f64 / total as f64 * 100.0)
}

/// Household records with the declared member counts raised to what was
/// actually surveyed. The declared counts are often lower than the number of
/// persons interviewed, and the number of workers can't exceed the members
/// that are not known to be non-workers.
pub fn household_records(
    households: &HouseholdTable,
    people: &PersonTable,
    attributes: &IndexMap<PersonKey, PersonAttributes>,
) -> (Vec<HouseholdRecord>, HouseholdSummary) {
    let observed = observed_members(people.values(), attributes);
    let mut summary = HouseholdSummary {
        households: households.len(),
        ..Default::default()
    };

    let records = households
        .values()
        .map(|household| {
            let seen = observed.get(&household.id).copied().unwrap_or_default();
            let record = household_record(household, seen);
            if (record.members, record.members_over_6, record.workers_14_plus)
                != (
                    household.members.total,
                    household.members.over_6,
                    household.members.workers_14_plus,
                )
            {
                summary.adjusted += 1;
            }
            if seen.members != record.members_over_6 {
                summary.missing_members += 1;
            }
            record
        })
        .collect();

    summary.adjusted_percent = percent(summary.adjusted, summary.households);
    summary.missing_members_percent = percent(summary.missing_members, summary.households);
    log::info!(
        "{} of {} households adjusted, {} missing members above 6 years of age",
        summary.adjusted,
        summary.households,
        summary.missing_members
    );
    (records, summary)
}

fn household_record(household: &Household, seen: ObservedMembers) -> HouseholdRecord {
    let declared = &household.members;
    let over_6 = declared.over_6.max(seen.members);
    let workers_14_plus = declared
        .workers_14_plus
        .max(seen.workers_14_plus)
        .min(over_6.saturating_sub(seen.non_workers_14_plus));

    HouseholdRecord {
        household: household.id.clone(),
        zone: household.zone,
        municipality: household.municipality,
        expansion_factor: household.expansion_factor,
        survey_date: household.survey_date,
        members: declared.under_5.saturating_add(over_6),
        members_over_6: over_6,
        members_under_5: declared.under_5,
        workers_14_plus,
        surveyed_members: seen.members,
        cars: household.vehicles.cars,
        pickups: household.vehicles.pickups,
        motorcycles: household.vehicles.motorcycles,
        bicycles: household.vehicles.bicycles,
        motorized_vehicles: household.vehicles.motorized(),
        bedrooms: household.bedrooms,
        telephone: household.telephone,
        internet: household.internet,
        interior_number: household.interior_number,
    }
}

/// Every table written for a reconciled survey.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTables {
    pub trips: Vec<TripRecord>,
    pub legs: Vec<LegRecord>,
    pub people: Vec<PersonRecord>,
    pub households: Vec<HouseholdRecord>,
    pub household_summary: HouseholdSummary,
}

impl OutputTables {
    pub fn build(reconciled: &Reconciled) -> Self {
        let (households, household_summary) = household_records(
            &reconciled.households,
            &reconciled.people,
            &reconciled.attributes,
        );
        Self {
            trips: trip_records(&reconciled.trips),
            legs: leg_records(&reconciled.legs),
            people: person_records(
                &reconciled.people,
                &reconciled.households,
                &reconciled.trips,
                &reconciled.attributes,
                &reconciled.report.residual_audit,
            ),
            households,
            household_summary,
        }
    }
}
