//! Plain-text rendering.

use wodclock_app::DisplayView;
use wodclock_core::duration::format_clock;
use wodclock_proto::{CommandAction, TimerStateMessage, TimerStatus};

fn status_label(status: TimerStatus) -> &'static str {
    match status {
        TimerStatus::Idle => "ready",
        TimerStatus::Running => "running",
        TimerStatus::Paused => "paused",
        TimerStatus::Completed => "done",
    }
}

/// One status line for the Display.
pub fn display_line(view: &DisplayView) -> String {
    let mut line = format!("[{}] {}", status_label(view.status), view.display_time);

    match (&view.section, &view.exercise) {
        (Some(section), Some(exercise)) => {
            line.push_str(&format!("  {section} / {exercise}  ({}/{})", view.step, view.steps));
        },
        _ => line.push_str(&format!("  {}", view.workout_name)),
    }

    if let Some(next) = &view.up_next {
        line.push_str(&format!("  next: {} {}", next.exercise, format_clock(next.duration.as_secs())));
    }

    line
}

/// Summary of the Remote's mirror and the commands it offers.
pub fn remote_line(state: Option<&TimerStateMessage>, actions: &[CommandAction]) -> String {
    let mirror = match state {
        Some(s) => format!(
            "[{}] {} {}",
            status_label(s.state.status),
            s.display_time,
            s.current_exercise.as_deref().unwrap_or("-")
        ),
        None => "[no state yet]".to_string(),
    };

    if actions.is_empty() {
        return format!("{mirror}  (offline or finished)");
    }

    let names: Vec<&str> = actions.iter().copied().map(CommandAction::as_str).collect();
    format!("{mirror}  available: {}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wodclock_app::UpNext;
    use wodclock_proto::{TimerState, WorkoutId};

    use super::*;

    fn view() -> DisplayView {
        DisplayView {
            workout_name: "Fran".into(),
            status: TimerStatus::Running,
            display_time: "00:42".into(),
            section: Some("WOD".into()),
            section_color: "#dc3545".into(),
            exercise: Some("Thrusters".into()),
            step: 1,
            steps: 6,
            up_next: Some(UpNext {
                section: "WOD".into(),
                exercise: "Pull-ups".into(),
                duration: Duration::from_secs(45),
            }),
            progress: 0.0,
            total_duration: Duration::from_secs(315),
        }
    }

    #[test]
    fn running_display_line() {
        insta::assert_snapshot!(display_line(&view()), @"[running] 00:42  WOD / Thrusters  (1/6)  next: Pull-ups 00:45");
    }

    #[test]
    fn finished_display_line() {
        let view = DisplayView {
            status: TimerStatus::Completed,
            display_time: "00:00".into(),
            section: None,
            exercise: None,
            up_next: None,
            ..view()
        };
        insta::assert_snapshot!(display_line(&view), @"[done] 00:00  Fran");
    }

    #[test]
    fn remote_lines() {
        let state = TimerStateMessage {
            state: TimerState { status: TimerStatus::Paused, ..TimerState::default() },
            workout_id: WorkoutId::new("fran"),
            current_section: Some("WOD".into()),
            current_exercise: Some("Thrusters".into()),
            display_time: "00:42".into(),
        };

        insta::assert_snapshot!(
            remote_line(Some(&state), &[CommandAction::Resume, CommandAction::Skip]),
            @"[paused] 00:42 Thrusters  available: resume, skip"
        );
        insta::assert_snapshot!(remote_line(None, &[]), @"[no state yet]  (offline or finished)");
    }
}
