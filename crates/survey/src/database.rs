use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};
use model::household::{Household, HouseholdId};
use model::leg::SurveyedLeg;
use model::person::{Person, PersonKey};
use model::trip::{SurveyedTrip, Trip, TripKey};

pub trait WithPrimaryKey<K> {
    fn primary_key(&self) -> K;
}

pub trait PrimaryKeyTable<K, V>
where
    V: WithPrimaryKey<K>,
{
    fn get(&self, key: &K) -> Option<&V>;

    fn insert(&mut self, value: V);
}

/// Keyed rows in insertion order, so every table written from it comes out in
/// the same order as the survey file.
#[derive(Debug, Clone)]
pub struct InMemoryPrimaryKeyTable<K, V> {
    map: IndexMap<K, V>,
}

impl<K, V> Default for InMemoryPrimaryKeyTable<K, V> {
    fn default() -> Self {
        Self {
            map: IndexMap::new(),
        }
    }
}

impl<K, V> InMemoryPrimaryKeyTable<K, V>
where
    K: Eq,
    K: Hash,
    V: WithPrimaryKey<K>,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<V>) -> Self {
        let mut map = IndexMap::<K, V>::new();
        for row in rows {
            map.insert(row.primary_key(), row);
        }
        Self { map }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Keeps the rows for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&V) -> bool) {
        self.map.retain(|_, row| keep(row));
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.map.values()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K, V> PrimaryKeyTable<K, V> for InMemoryPrimaryKeyTable<K, V>
where
    K: Eq,
    K: Hash,
    V: WithPrimaryKey<K>,
{
    fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    fn insert(&mut self, value: V) {
        self.map.insert(value.primary_key(), value);
    }
}

impl WithPrimaryKey<HouseholdId> for Household {
    fn primary_key(&self) -> HouseholdId {
        self.id.clone()
    }
}

impl WithPrimaryKey<PersonKey> for Person {
    fn primary_key(&self) -> PersonKey {
        self.key.clone()
    }
}

impl WithPrimaryKey<TripKey> for Trip {
    fn primary_key(&self) -> TripKey {
        self.key.clone()
    }
}

pub type HouseholdTable = InMemoryPrimaryKeyTable<HouseholdId, Household>;
pub type PersonTable = InMemoryPrimaryKeyTable<PersonKey, Person>;

/// Trips grouped into one chain per person, ordered by sequence number.
///
/// Sequence numbers are dense, so the trip with sequence `n` sits at index
/// `n - 1` of its chain and the neighbours of a trip are found without a search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripTable {
    chains: IndexMap<PersonKey, Vec<Trip>>,
}

impl TripTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(chain: &[Trip], sequence: u32) -> Result<usize, usize> {
        let index = (sequence as usize).wrapping_sub(1);
        match chain.get(index) {
            Some(trip) if trip.key.sequence == sequence => Ok(index),
            _ => chain.binary_search_by_key(&sequence, |trip| trip.key.sequence),
        }
    }

    pub fn chain(&self, person: &PersonKey) -> Option<&[Trip]> {
        self.chains.get(person).map(Vec::as_slice)
    }

    pub fn chains(&self) -> impl Iterator<Item = (&PersonKey, &[Trip])> {
        self.chains
            .iter()
            .map(|(person, chain)| (person, chain.as_slice()))
    }

    pub fn chains_mut(&mut self) -> impl Iterator<Item = (&PersonKey, &mut [Trip])> {
        self.chains
            .iter_mut()
            .map(|(person, chain)| (person, chain.as_mut_slice()))
    }

    pub fn trips(&self) -> impl Iterator<Item = &Trip> {
        self.chains.values().flatten()
    }

    /// Keys of every trip, chain by chain in sequence order.
    pub fn keys(&self) -> Vec<TripKey> {
        self.trips().map(|trip| trip.key.clone()).collect()
    }

    pub fn get_mut(&mut self, key: &TripKey) -> Option<&mut Trip> {
        let chain = self.chains.get_mut(&key.person)?;
        let index = Self::position(chain, key.sequence).ok()?;
        chain.get_mut(index)
    }

    pub fn next(&self, key: &TripKey) -> Option<&Trip> {
        let chain = self.chains.get(&key.person)?;
        let index = Self::position(chain, key.sequence).ok()?;
        chain.get(index + 1)
    }

    pub fn previous(&self, key: &TripKey) -> Option<&Trip> {
        let chain = self.chains.get(&key.person)?;
        let index = Self::position(chain, key.sequence).ok()?;
        chain.get(index.checked_sub(1)?)
    }

    pub fn person_count(&self) -> usize {
        self.chains.len()
    }

    pub fn len(&self) -> usize {
        self.chains.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.values().all(Vec::is_empty)
    }
}

impl PrimaryKeyTable<TripKey, Trip> for TripTable {
    fn get(&self, key: &TripKey) -> Option<&Trip> {
        let chain = self.chains.get(&key.person)?;
        let index = Self::position(chain, key.sequence).ok()?;
        chain.get(index)
    }

    fn insert(&mut self, trip: Trip) {
        let chain = self.chains.entry(trip.key.person.clone()).or_default();
        match Self::position(chain, trip.key.sequence) {
            Ok(index) => chain[index] = trip,
            Err(index) => chain.insert(index, trip),
        }
    }
}

/// The normalized survey: one record per household and person, and every
/// reported trip and leg still keyed by its questionnaire label.
#[derive(Debug, Clone, Default)]
pub struct SurveyDatabase {
    pub households: HouseholdTable,
    pub people: PersonTable,

    /// People who answered that they did not travel on the survey day.
    pub non_travelers: IndexSet<PersonKey>,

    pub trips: Vec<SurveyedTrip>,
    pub legs: Vec<SurveyedLeg>,
}
