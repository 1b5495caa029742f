//! Timeline flattening.
//!
//! Expands a [`Workout`] into the linear sequence of steps the timer walks.
//! Each section's entire exercise/round list is replayed `repeat_count` times
//! in a row before moving to the next section. Sections without exercises and
//! exercises without rounds contribute no steps.

use std::time::Duration;

use crate::workout::{Round, Workout};

/// Colour used when a section has none.
pub const DEFAULT_SECTION_COLOR: &str = "#212529";

/// One atomic step of the expanded timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatStep {
    /// Section name
    pub section: String,
    /// Section colour, defaulted
    pub section_color: String,
    /// Whether the owning section is excluded from the total
    pub section_excluded: bool,
    /// Exercise name
    pub exercise: String,
    /// The round to run
    pub round: Round,
    /// Position of the section in the workout
    pub section_index: usize,
    /// Position of the exercise in its section
    pub exercise_index: usize,
    /// Position of the round in its exercise
    pub round_index: usize,
    /// Which replay of the section this step belongs to, from zero
    pub repetition: u32,
}

impl FlatStep {
    /// Whether this step counts toward the workout total.
    pub fn counts_toward_total(&self) -> bool {
        !self.section_excluded && !self.round.exclude_from_total
    }
}

/// Ordered, read-only sequence of steps for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    steps: Vec<FlatStep>,
}

impl Timeline {
    /// Flatten `workout`. Pure: the same workout always yields the same
    /// timeline.
    pub fn flatten(workout: &Workout) -> Self {
        let mut steps = Vec::new();

        for (section_index, section) in workout.sections.iter().enumerate() {
            let color = section.color.as_deref().unwrap_or(DEFAULT_SECTION_COLOR);

            for repetition in 0..section.repeat_count.get() {
                for (exercise_index, exercise) in section.exercises.iter().enumerate() {
                    for (round_index, round) in exercise.rounds.iter().enumerate() {
                        steps.push(FlatStep {
                            section: section.name.clone(),
                            section_color: color.to_string(),
                            section_excluded: section.exclude_from_total,
                            exercise: exercise.name.clone(),
                            round: round.clone(),
                            section_index,
                            exercise_index,
                            round_index,
                            repetition,
                        });
                    }
                }
            }
        }

        tracing::debug!(workout = %workout.id, steps = steps.len(), "flattened workout");
        Self { steps }
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if the workout has no timed steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`.
    pub fn get(&self, index: usize) -> Option<&FlatStep> {
        self.steps.get(index)
    }

    /// Step following `index`, for "up next" previews.
    pub fn next_after(&self, index: usize) -> Option<&FlatStep> {
        index.checked_add(1).and_then(|next| self.steps.get(next))
    }

    /// Steps in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, FlatStep> {
        self.steps.iter()
    }

    /// Planned length of the workout, skipping excluded sections and rounds.
    /// Saturates at [`Duration::MAX`].
    pub fn total_duration(&self) -> Duration {
        self.steps
            .iter()
            .filter(|step| step.counts_toward_total())
            .map(|step| step.round.duration)
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a FlatStep;
    type IntoIter = std::slice::Iter<'a, FlatStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::workout::{Exercise, Section};

    fn labels(timeline: &Timeline) -> Vec<String> {
        timeline.iter().map(|s| format!("{}/{}", s.exercise, s.round_index)).collect()
    }

    #[test]
    fn repeat_replays_whole_section() {
        let workout = Workout::new(
            "w",
            "Repeat",
            vec![
                Section::new(
                    "AMRAP",
                    vec![
                        Exercise::new("e1", vec![Round::countdown(30)]),
                        Exercise::new("e2", vec![Round::countdown(30)]),
                    ],
                )
                .repeat(3),
            ],
        );

        let timeline = Timeline::flatten(&workout);
        assert_eq!(timeline.len(), 6);
        assert_eq!(labels(&timeline), ["e1/0", "e2/0", "e1/0", "e2/0", "e1/0", "e2/0"]);
        let reps: Vec<u32> = timeline.iter().map(|s| s.repetition).collect();
        assert_eq!(reps, [0, 0, 1, 1, 2, 2]);
    }

    #[test]
    fn stored_order_is_preserved_across_levels() {
        let workout = Workout::new(
            "w",
            "Order",
            vec![
                Section::new(
                    "A",
                    vec![Exercise::new("a1", vec![Round::countdown(1), Round::countup(2)])],
                ),
                Section::new("B", vec![Exercise::new("b1", vec![Round::countdown(3)])]),
            ],
        );

        let timeline = Timeline::flatten(&workout);
        let sections: Vec<&str> = timeline.iter().map(|s| s.section.as_str()).collect();
        assert_eq!(sections, ["A", "A", "B"]);
        assert_eq!(labels(&timeline), ["a1/0", "a1/1", "b1/0"]);
        assert_eq!(timeline.get(2).map(|s| s.section_index), Some(1));
    }

    #[test]
    fn empty_levels_contribute_nothing() {
        let workout = Workout::new(
            "w",
            "Sparse",
            vec![
                Section::new("No exercises", vec![]).repeat(4),
                Section::new("No rounds", vec![Exercise::new("idle", vec![])]),
                Section::new("Real", vec![Exercise::new("run", vec![Round::countup(60)])]),
            ],
        );

        let timeline = Timeline::flatten(&workout);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.get(0).map(|s| s.section_index), Some(2));
    }

    #[test]
    fn empty_workout_flattens_to_nothing() {
        let timeline = Timeline::flatten(&Workout::new("w", "Nothing", vec![]));
        assert!(timeline.is_empty());
        assert_eq!(timeline.total_duration(), Duration::ZERO);
    }

    #[test]
    fn section_color_defaults() {
        let workout = Workout::new(
            "w",
            "Colors",
            vec![
                Section::new("Plain", vec![Exercise::new("x", vec![Round::countup(1)])]),
                Section::new("Red", vec![Exercise::new("y", vec![Round::countup(1)])])
                    .color("#ff0000"),
            ],
        );

        let timeline = Timeline::flatten(&workout);
        assert_eq!(timeline.get(0).map(|s| s.section_color.as_str()), Some(DEFAULT_SECTION_COLOR));
        assert_eq!(timeline.get(1).map(|s| s.section_color.as_str()), Some("#ff0000"));
    }

    #[test]
    fn total_skips_excluded_steps() {
        let workout = Workout::new(
            "w",
            "Totals",
            vec![
                Section::new("Warm-up", vec![Exercise::new("jog", vec![Round::countdown(300)])])
                    .excluded(),
                Section::new(
                    "Main",
                    vec![Exercise::new(
                        "burpees",
                        vec![Round::countdown(40), Round::countdown(20).excluded()],
                    )],
                )
                .repeat(5),
            ],
        );

        let timeline = Timeline::flatten(&workout);
        assert_eq!(timeline.len(), 11);
        assert_eq!(timeline.total_duration(), Duration::from_secs(200));
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        let workout = Workout::new(
            "w",
            "Forever",
            vec![Section::new(
                "S",
                vec![Exercise::new("x", vec![Round::countup(u64::MAX), Round::countup(u64::MAX)])],
            )],
        );

        assert_eq!(Timeline::flatten(&workout).total_duration(), Duration::MAX);
    }

    #[test]
    fn next_after_stops_at_end() {
        let workout = Workout::new(
            "w",
            "Next",
            vec![Section::new(
                "S",
                vec![Exercise::new("a", vec![Round::countup(1)]), Exercise::new("b", vec![Round::countup(1)])],
            )],
        );

        let timeline = Timeline::flatten(&workout);
        assert_eq!(timeline.next_after(0).map(|s| s.exercise.as_str()), Some("b"));
        assert!(timeline.next_after(1).is_none());
        assert!(timeline.next_after(usize::MAX).is_none());
    }

    proptest! {
        #[test]
        fn length_is_sum_of_repeated_rounds(
            shape in proptest::collection::vec(
                (1u32..4, proptest::collection::vec(0usize..4, 0..4)),
                0..5,
            )
        ) {
            let sections: Vec<Section> = shape
                .iter()
                .enumerate()
                .map(|(i, (repeat, rounds))| {
                    let exercises = rounds
                        .iter()
                        .enumerate()
                        .map(|(j, n)| Exercise::new(format!("e{j}"), vec![Round::countdown(10); *n]))
                        .collect();
                    Section::new(format!("s{i}"), exercises).repeat(*repeat)
                })
                .collect();

            let expected: usize = shape
                .iter()
                .map(|(repeat, rounds)| *repeat as usize * rounds.iter().sum::<usize>())
                .sum();

            let timeline = Timeline::flatten(&Workout::new("w", "prop", sections));
            prop_assert_eq!(timeline.len(), expected);
        }
    }
}
