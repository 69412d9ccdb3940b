mod common;

use common::{at, key, timed, trip, Survey};
use model::imputed::{DurationBucket, Imputed};
use model::person::Occupation;
use model::place::PlaceCategory::*;
use model::purpose::Purpose;
use model::trip::TripKey;
use reconcile::repair::{CorrectionRuleset, RepairPipeline};
use reconcile::sequencer::sequence_trips;
use reconcile::tables::OutputTables;
use reconcile::{reconcile, ReconcileError, Reconciled};
use survey::database::PrimaryKeyTable;
use survey::UnitPolicy;

fn run(survey: Survey) -> Result<Reconciled, ReconcileError> {
    let sequenced = sequence_trips(survey.database, UnitPolicy::Abort)?;
    reconcile(sequenced, CorrectionRuleset::default())
}

/// Household 100 where one member typed 105 for home, one went somewhere the
/// survey can't name and one recorded a commute as home to home.
fn household() -> Survey {
    let ana = key("H1", 1);
    let ben = key("H1", 2);
    let carl = key("H1", 3);
    Survey::default()
        .household("H1", 100)
        .person("H1", 1, 34, Occupation::Employee)
        .person("H1", 2, 61, Occupation::Retired)
        .person("H1", 3, 45, Occupation::SelfEmployed)
        .trip(trip(&ana, 4, (CarryOver, None), (Home, Some(105)), Purpose::Unspecified))
        .trip(trip(&ana, 2, (Home, Some(105)), (Workplace, Some(12)), Purpose::Work))
        .trip(trip(&ben, 1, (Home, Some(100)), (Other, Some(7)), Purpose::Unspecified))
        .trip(trip(&ben, 2, (Other, Some(7)), (Home, Some(100)), Purpose::ReturnHome))
        .trip(trip(&carl, 1, (Shop, Some(100)), (Home, Some(100)), Purpose::Work))
        .trip(trip(&carl, 2, (Home, Some(100)), (Home, Some(100)), Purpose::ReturnHome))
}

#[test]
fn sequences_are_dense_per_person() {
    let reconciled = run(household()).unwrap();
    for (_, chain) in reconciled.trips.chains() {
        let sequences: Vec<u32> = chain.iter().map(|trip| trip.key.sequence).collect();
        let expected: Vec<u32> = (1..=chain.len() as u32).collect();
        assert_eq!(sequences, expected);
    }
    let ana = reconciled.trips.chain(&key("H1", 1)).unwrap();
    assert_eq!(ana[0].raw_label, 2);
    assert_eq!(ana[1].raw_label, 4);
}

#[test]
fn first_trips_start_at_home_or_elsewhere() {
    let reconciled = run(household()).unwrap();
    for (_, chain) in reconciled.trips.chains() {
        assert!(matches!(chain[0].origin, Home | Other));
    }
}

#[test]
fn home_codes_are_unified_to_the_household_zone() {
    let reconciled = run(household()).unwrap();
    let ana = reconciled.trips.chain(&key("H1", 1)).unwrap();
    assert_eq!(ana[0].origin_zone, Some(100));
    assert_eq!((ana[1].origin, ana[1].origin_zone), (Workplace, Some(12)));
    assert_eq!(ana[1].destination_zone, Some(100));
    assert_eq!(ana[1].purpose, Purpose::ReturnHome);

    assert_eq!(reconciled.report.conflicting_home_trips_before, 2);
    assert_eq!(reconciled.report.conflicting_home_trips_after, 0);
}

#[test]
fn unnamed_destinations_keep_their_purpose_unresolved() {
    let reconciled = run(household()).unwrap();
    let ben = key("H1", 2);
    let first = reconciled.trips.get(&TripKey::new(ben.clone(), 1)).unwrap();
    assert_eq!(first.purpose, Purpose::Unspecified);
    assert!(reconciled
        .report
        .unresolved_purposes
        .contains(&TripKey::new(ben, 1)));

    let inference = reconciled
        .report
        .passes
        .iter()
        .find(|pass| pass.pass == "purpose from destination")
        .unwrap();
    assert_eq!(inference.flagged, 1);
}

#[test]
fn home_to_home_commutes_lead_to_work() {
    let reconciled = run(household()).unwrap();
    let carl = reconciled.trips.chain(&key("H1", 3)).unwrap();
    assert_eq!(carl[0].origin, Home);
    assert_eq!(carl[0].destination, Workplace);
    assert_eq!(carl[1].origin, Workplace);
    assert_eq!(carl[1].purpose, Purpose::ReturnHome);
}

#[test]
fn repair_is_idempotent_and_never_adds_broken_chains() {
    let reconciled = run(household()).unwrap();
    let report = &reconciled.report;
    assert!(report
        .missing_trips_after
        .iter()
        .all(|person| report.missing_trips_before.contains(person)));

    let (again, second) = RepairPipeline::standard(CorrectionRuleset::default())
        .run(
            reconciled.trips.clone(),
            &reconciled.households,
            &reconciled.people,
        )
        .unwrap();
    assert!(second.passes.iter().all(|pass| pass.modified == 0));
    assert_eq!(again, reconciled.trips);
}

#[test]
fn chains_starting_away_from_home_still_get_the_household_zone() {
    let ana = key("H2", 1);
    let ben = key("H2", 2);
    let survey = Survey::default()
        .household("H2", 100)
        .person("H2", 1, 30, Occupation::Employee)
        .person("H2", 2, 33, Occupation::Employee)
        .trip(trip(&ana, 1, (Other, Some(5)), (Shop, Some(30)), Purpose::Shopping))
        .trip(trip(&ana, 2, (Shop, Some(30)), (Home, Some(105)), Purpose::ReturnHome))
        .trip(trip(&ben, 1, (Unspecified, None), (Other, Some(5)), Purpose::Other))
        .trip(trip(&ben, 2, (Other, Some(5)), (Home, None), Purpose::ReturnHome));

    let reconciled = run(survey).unwrap();
    let ana = reconciled.trips.chain(&ana).unwrap();
    assert_eq!(ana[0].origin_zone, Some(5));
    assert_eq!(ana[1].destination_zone, Some(100));

    let ben = reconciled.trips.chain(&ben).unwrap();
    assert_eq!((ben[0].origin, ben[0].origin_zone), (Other, None));
    assert_eq!((ben[1].destination, ben[1].destination_zone), (Home, Some(100)));
    assert_eq!(reconciled.report.conflicting_home_trips_after, 0);
}

#[test]
fn declared_work_trips_ending_at_home_become_returns_home() {
    let ana = key("H4", 1);
    let survey = Survey::default()
        .household("H4", 100)
        .person("H4", 1, 40, Occupation::Employee)
        .trip(trip(&ana, 1, (Home, Some(100)), (Other, Some(7)), Purpose::Unspecified))
        .trip(trip(&ana, 2, (Other, Some(7)), (Home, Some(100)), Purpose::Work));

    let reconciled = run(survey).unwrap();
    let chain = reconciled.trips.chain(&ana).unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!((chain[1].origin, chain[1].destination), (Other, Home));
    assert_eq!(chain[1].purpose, Purpose::ReturnHome);
    assert_eq!(chain[0].destination, Other);
    assert_eq!(chain[0].purpose, Purpose::Unspecified);
    assert_eq!(
        reconciled.report.unresolved_purposes,
        vec![TripKey::new(ana.clone(), 1)]
    );
}

#[test]
fn a_second_home_code_is_unified_after_arriving_home() {
    let ana = key("H5", 1);
    let survey = Survey::default()
        .household("H5", 100)
        .person("H5", 1, 40, Occupation::Employee)
        .trip(trip(&ana, 1, (Other, Some(5)), (Home, Some(100)), Purpose::Other))
        .trip(trip(&ana, 2, (Home, Some(105)), (Home, Some(100)), Purpose::ReturnHome));

    let reconciled = run(survey).unwrap();
    let chain = reconciled.trips.chain(&ana).unwrap();
    assert_eq!(chain[0].destination_zone, Some(100));
    assert_eq!(chain[1].origin_zone, Some(100));

    let report = &reconciled.report;
    assert!(report.missing_trips_before.contains(&ana));
    assert!(report.missing_trips_after.is_empty());
}

#[test]
fn travel_time_buckets_are_right_closed() {
    let minutes = [15, 16, 120, 121];
    let mut survey = Survey::default().household("H3", 100);
    for (index, minutes) in minutes.iter().enumerate() {
        let number = index as u8 + 1;
        let person = key("H3", number);
        survey = survey.person("H3", number, 30, Occupation::Employee).trip(timed(
            trip(&person, 1, (Home, Some(100)), (Workplace, Some(12)), Purpose::Work),
            at(7, 0),
            *minutes,
        ));
    }

    let reconciled = run(survey).unwrap();
    let buckets: Vec<_> = (1..=4)
        .map(|number| reconciled.attributes[&key("H3", number)].work_travel_time)
        .collect();
    assert_eq!(
        buckets,
        vec![
            Imputed::Value(DurationBucket::UpTo15),
            Imputed::Value(DurationBucket::UpTo30),
            Imputed::Value(DurationBucket::UpTo120),
            Imputed::Value(DurationBucket::Over120),
        ]
    );
}

#[test]
fn output_tables_cover_every_unit() {
    let reconciled = run(household()).unwrap();
    let tables = OutputTables::build(&reconciled);
    assert_eq!(tables.trips.len(), 6);
    assert_eq!(tables.people.len(), 3);
    assert_eq!(tables.households.len(), 1);
    assert_eq!(tables.households[0].members_over_6, 3);
    assert!(tables.people.iter().all(|person| !person.missing_trips));
}
