//! Workout library on disk.
//!
//! One JSON file per workout, named after its identifier:
//! `<library>/<workout-id>.json`.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use wodclock_core::{SourceError, Workout, WorkoutSource};
use wodclock_proto::WorkoutId;

/// [`WorkoutSource`] reading a directory of JSON files.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    /// Read workouts from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Library directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &WorkoutId) -> Result<PathBuf, SourceError> {
        let name = id.as_str();
        let plain = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
        if !plain {
            return Err(SourceError::Invalid(format!("unsupported workout id {name:?}")));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }
}

impl WorkoutSource for JsonFileSource {
    fn load(&self, id: &WorkoutId) -> Result<Workout, SourceError> {
        let path = self.path_for(id)?;
        let bytes = std::fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound(id.clone()),
            _ => SourceError::Unavailable(format!("{}: {e}", path.display())),
        })?;

        let workout: Workout = serde_json::from_slice(&bytes)
            .map_err(|e| SourceError::Invalid(format!("{}: {e}", path.display())))?;

        if workout.id != *id {
            tracing::warn!(file = %path.display(), stored = %workout.id, "workout id differs from file name");
        }
        tracing::debug!(file = %path.display(), sections = workout.sections.len(), "workout read");
        Ok(workout)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const FRAN: &str = r##"{
        "id": "fran",
        "name": "Fran",
        "sections": [
            {
                "name": "WOD",
                "color": "#dc3545",
                "repeat_count": 3,
                "exercises": [
                    { "name": "Thrusters", "rounds": [ { "duration": "00:01:00", "mode": "countdown" } ] },
                    { "name": "Pull-ups", "rounds": [ { "duration": 45, "mode": "countup" } ] }
                ]
            }
        ]
    }"##;

    fn library() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fran.json"), FRAN).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        dir
    }

    #[test]
    fn loads_workout_file() {
        let dir = library();
        let source = JsonFileSource::new(dir.path());

        let workout = source.load(&WorkoutId::new("fran")).unwrap();
        assert_eq!(workout.name, "Fran");
        assert_eq!(workout.sections[0].repeat_count.get(), 3);
        assert_eq!(workout.sections[0].exercises[0].rounds[0].duration, Duration::from_secs(60));
        assert_eq!(workout.sections[0].exercises[1].rounds[0].duration, Duration::from_secs(45));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = library();
        let source = JsonFileSource::new(dir.path());
        assert!(matches!(source.load(&WorkoutId::new("murph")), Err(SourceError::NotFound(_))));
    }

    #[test]
    fn malformed_file_is_invalid() {
        let dir = library();
        let source = JsonFileSource::new(dir.path());
        assert!(matches!(source.load(&WorkoutId::new("broken")), Err(SourceError::Invalid(_))));
    }

    #[test]
    fn path_traversal_is_rejected() {
        let dir = library();
        let source = JsonFileSource::new(dir.path());
        assert!(matches!(
            source.load(&WorkoutId::new("../fran")),
            Err(SourceError::Invalid(_))
        ));
    }
}
