//! Fuzz target for workout flattening.
//!
//! Any workout that deserializes must flatten, and the step count must match
//! the product of repeats and rounds.

#![no_main]

use libfuzzer_sys::fuzz_target;
use wodclock_core::{Timeline, Workout};

fuzz_target!(|data: &[u8]| {
    let Ok(workout) = serde_json::from_slice::<Workout>(data) else {
        return;
    };

    let expected: usize = workout
        .sections
        .iter()
        .map(|section| {
            let rounds: usize = section.exercises.iter().map(|e| e.rounds.len()).sum();
            section.repeat_count.get() as usize * rounds
        })
        .sum();

    // Keep pathological repeat counts from exhausting memory or time.
    let max_repeat = workout.sections.iter().map(|s| s.repeat_count.get()).max().unwrap_or(1);
    if expected > 100_000 || max_repeat > 10_000 {
        return;
    }

    let timeline = Timeline::flatten(&workout);
    assert_eq!(timeline.len(), expected);
    let _ = timeline.total_duration();
});
