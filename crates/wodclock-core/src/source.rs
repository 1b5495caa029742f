//! Workout source abstraction.
//!
//! Workouts are authored and stored elsewhere. A session takes one read-only
//! snapshot through [`WorkoutSource`] when it starts; later edits are not seen
//! until the next session.

use std::collections::HashMap;

use wodclock_proto::WorkoutId;

use crate::{error::SourceError, workout::Workout};

/// Supplies workout trees by identifier.
pub trait WorkoutSource {
    /// Load the workout stored under `id`.
    fn load(&self, id: &WorkoutId) -> Result<Workout, SourceError>;
}

/// In-memory workout source.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    workouts: HashMap<WorkoutId, Workout>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `workout` under its own identifier, replacing any previous one.
    pub fn insert(&mut self, workout: Workout) {
        self.workouts.insert(workout.id.clone(), workout);
    }
}

impl WorkoutSource for MemorySource {
    fn load(&self, id: &WorkoutId) -> Result<Workout, SourceError> {
        self.workouts.get(id).cloned().ok_or_else(|| SourceError::NotFound(id.clone()))
    }
}

impl FromIterator<Workout> for MemorySource {
    fn from_iter<I: IntoIterator<Item = Workout>>(iter: I) -> Self {
        let mut source = Self::new();
        for workout in iter {
            source.insert(workout);
        }
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_snapshot() {
        let mut source = MemorySource::new();
        source.insert(Workout::new("w-1", "Monday", vec![]));

        let loaded = source.load(&WorkoutId::new("w-1")).unwrap();
        assert_eq!(loaded.name, "Monday");

        source.insert(Workout::new("w-1", "Edited", vec![]));
        assert_eq!(loaded.name, "Monday");
    }

    #[test]
    fn load_missing_is_not_found() {
        let source: MemorySource = std::iter::empty().collect();
        assert!(matches!(source.load(&WorkoutId::new("nope")), Err(SourceError::NotFound(_))));
    }
}
