//! The bundled demo workout loads and runs.

use std::time::Duration;

use wodclock_app::{Display, DisplayEvent, SessionContext};
use wodclock_cli::JsonFileSource;
use wodclock_core::WorkoutSource;
use wodclock_proto::{CommandAction, TenantId, TimerStatus, Timestamp, WorkoutId};

fn demos() -> JsonFileSource {
    JsonFileSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos"))
}

#[test]
fn demo_workout_flattens() {
    let workout = demos().load(&WorkoutId::new("fran")).unwrap();
    let context =
        SessionContext::display(TenantId::new("local").unwrap(), WorkoutId::new("fran"));
    let display = Display::new(context, &workout);

    let view = display.view();
    // 2 warm-up steps, then 3 × (thrusters, pull-ups, rest).
    assert_eq!(view.steps, 11);
    // Warm-up and rest are excluded: 3 × (90 + 90).
    assert_eq!(view.total_duration, Duration::from_secs(540));
}

#[test]
fn demo_workout_runs_to_completion() {
    let workout = demos().load(&WorkoutId::new("fran")).unwrap();
    let context =
        SessionContext::display(TenantId::new("local").unwrap(), WorkoutId::new("fran"));
    let mut display = Display::new(context, &workout);

    let now = Timestamp::from_millis(1_000);
    display.handle(DisplayEvent::Local(CommandAction::Start), now);
    for _ in 0..11 {
        display.handle(DisplayEvent::Local(CommandAction::Skip), now);
    }

    assert_eq!(display.state().status, TimerStatus::Completed);
    assert_eq!(display.snapshot().display_time, "00:00");
}
