use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, info};

use crate::{
    error::WorkoutError,
    storage::KeyValueStorage,
    workout::{Workout, WorkoutId},
};

pub const DEFAULT_STORAGE_KEY: &str = "workouts";

/// Ordered collection of workouts, oldest first, and its round-trip through
/// a key-value storage.
#[derive(Clone, Debug)]
pub struct WorkoutStore {
    key: String,
    workouts: Vec<Workout>,
}

impl Default for WorkoutStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_KEY)
    }
}

impl WorkoutStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            workouts: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn add(&mut self, workout: Workout) {
        debug!(id = %workout.id(), kind = %workout.kind(), "adding workout");
        self.workouts.push(workout);
    }

    pub fn all(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id().as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn clear(&mut self) {
        self.workouts.clear();
    }

    /// Timestamp-derived id, bumped forward until no stored workout uses it.
    pub fn next_id(&self, now: &DateTime<FixedOffset>) -> WorkoutId {
        let mut millis = now.timestamp_millis();
        loop {
            let id = WorkoutId::from_timestamp_millis(millis);
            if self.find_by_id(id.as_str()).is_none() {
                return id;
            }
            millis += 1;
        }
    }

    pub fn to_json(&self) -> Result<String, WorkoutError> {
        serde_json::to_string(&self.workouts).map_err(|e| WorkoutError::CorruptData(e.to_string()))
    }

    /// Parses a serialized list, rejecting invalid records and duplicate ids.
    pub fn from_json(key: impl Into<String>, json: &str) -> Result<Self, WorkoutError> {
        let workouts: Vec<Workout> =
            serde_json::from_str(json).map_err(|e| WorkoutError::CorruptData(e.to_string()))?;

        let mut seen = HashSet::new();
        if let Some(dup) = workouts.iter().find(|w| !seen.insert(w.id().clone())) {
            return Err(WorkoutError::CorruptData(format!("duplicate id {}", dup.id())));
        }

        Ok(Self {
            key: key.into(),
            workouts,
        })
    }

    /// Overwrites whatever is stored under this store's key.
    pub fn save_to(&self, storage: &mut impl KeyValueStorage) -> Result<(), WorkoutError> {
        let json = self.to_json()?;
        storage
            .set_item(&self.key, &json)
            .map_err(WorkoutError::Persistence)?;
        debug!(key = %self.key, count = self.workouts.len(), "saved workouts");
        Ok(())
    }

    /// Replaces the contents with what is stored under this store's key and
    /// returns how many workouts were restored. A missing value leaves the
    /// store empty; a corrupt one empties it and reports the error.
    pub fn load_from(&mut self, storage: &impl KeyValueStorage) -> Result<usize, WorkoutError> {
        self.workouts.clear();

        let Some(json) = storage.get_item(&self.key).map_err(WorkoutError::Persistence)? else {
            debug!(key = %self.key, "no saved workouts");
            return Ok(0);
        };

        let restored = Self::from_json(self.key.clone(), &json)?;
        self.workouts = restored.workouts;
        info!(key = %self.key, count = self.workouts.len(), "restored workouts");
        Ok(self.workouts.len())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;
    use crate::{
        coords::Coordinates,
        mock::MemoryStorage,
        workout::WorkoutInput,
    };

    fn at_secs(secs: i64) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0).unwrap().timestamp_opt(secs, 0).unwrap()
    }

    fn workout(store: &WorkoutStore, secs: i64, input: WorkoutInput) -> Workout {
        let now = at_secs(secs);
        Workout::new(store.next_id(&now), now, Coordinates::new(45.0, 12.0), input).unwrap()
    }

    #[test]
    fn keeps_insertion_order_and_finds_by_id() {
        let mut store = WorkoutStore::default();
        let first = workout(&store, 1_700_000_000, WorkoutInput::running(5.0, 25.0, 170.0));
        store.add(first.clone());
        let second = workout(&store, 1_700_000_100, WorkoutInput::cycling(20.0, 60.0, 100.0));
        store.add(second.clone());

        assert_eq!(store.all(), &[first.clone(), second]);
        assert_eq!(store.find_by_id(first.id().as_str()), Some(&first));
        assert_eq!(store.find_by_id("0000000000"), None);
    }

    #[test]
    fn next_id_skips_taken_ids() {
        let mut store = WorkoutStore::default();
        let first = workout(&store, 1_700_000_000, WorkoutInput::running(5.0, 25.0, 170.0));
        store.add(first.clone());
        let clash = workout(&store, 1_700_000_000, WorkoutInput::running(6.0, 30.0, 170.0));
        assert_ne!(first.id(), clash.id());
    }

    #[test]
    fn round_trips_through_storage() {
        let mut storage = MemoryStorage::new();
        let mut store = WorkoutStore::new("test-roundtrip");
        store.add(workout(&store, 1_700_000_000, WorkoutInput::running(5.2, 24.0, 178.0)));
        store.add(workout(&store, 1_700_086_400, WorkoutInput::cycling(25.0, 75.0, 520.0)));
        store.save_to(&mut storage).unwrap();

        let mut restored = WorkoutStore::new("test-roundtrip");
        assert_eq!(restored.load_from(&storage).unwrap(), 2);
        assert_eq!(restored.all(), store.all());
        assert_eq!(restored.all()[1].speed_km_per_h(), Some(20.0));
    }

    #[test]
    fn full_precision_coordinates_survive_storage() {
        let clicked = [
            Coordinates::new(-38.70014069647654, 111.52062718394717),
            Coordinates::new(55.676098442987045, 12.568337148427963),
            Coordinates::new(0.1 + 0.2, -179.99999999999997),
        ];
        let mut store = WorkoutStore::new("test-precision");
        for (i, at) in clicked.iter().enumerate() {
            let now = at_secs(1_700_000_000 + i as i64);
            let input = WorkoutInput::running(5.2, 24.0, 178.0);
            store.add(Workout::new(store.next_id(&now), now, *at, input).unwrap());
        }

        let mut storage = MemoryStorage::new();
        store.save_to(&mut storage).unwrap();
        let mut restored = WorkoutStore::new("test-precision");
        restored.load_from(&storage).unwrap();

        let coords: Vec<_> = restored.all().iter().map(Workout::coords).collect();
        assert_eq!(coords, clicked);
        assert_eq!(restored.all(), store.all());
    }

    #[test]
    fn missing_value_is_empty_store() {
        let storage = MemoryStorage::new();
        let mut store = WorkoutStore::default();
        assert_eq!(store.load_from(&storage).unwrap(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_value_empties_store() {
        let mut storage = MemoryStorage::new();
        storage.set_item(DEFAULT_STORAGE_KEY, r#"[{"id":"1","crea"#).unwrap();

        let mut store = WorkoutStore::default();
        store.add(workout(&store, 1_700_000_000, WorkoutInput::running(5.0, 25.0, 170.0)));
        assert_matches!(store.load_from(&storage), Err(WorkoutError::CorruptData(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn duplicate_ids_are_corrupt() {
        let mut store = WorkoutStore::default();
        let w = workout(&store, 1_700_000_000, WorkoutInput::running(5.0, 25.0, 170.0));
        store.add(w.clone());
        store.add(w);
        let json = store.to_json().unwrap();
        assert_matches!(
            WorkoutStore::from_json(DEFAULT_STORAGE_KEY, &json),
            Err(WorkoutError::CorruptData(msg)) if msg.starts_with("duplicate id")
        );
    }

    #[test]
    fn rejected_write_is_persistence_error() {
        let mut storage = MemoryStorage::new();
        storage.reject_writes(true);
        let mut store = WorkoutStore::default();
        store.add(workout(&store, 1_700_000_000, WorkoutInput::running(5.0, 25.0, 170.0)));
        assert_matches!(store.save_to(&mut storage), Err(WorkoutError::Persistence(_)));
        assert_eq!(store.len(), 1);
    }
}
