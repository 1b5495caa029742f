//! Command parsing for the text remote.
//!
//! This module parses input lines into structured [`Command`] values.

use wodclock_proto::CommandAction;

/// Parsed command from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send a timer command to the Display.
    Action(CommandAction),

    /// Show the mirrored state and the commands that apply to it.
    Status,

    /// Show the command list.
    Help,

    /// Quit the application.
    Quit,

    /// Blank line.
    Empty,

    /// Unknown or invalid command.
    Unknown {
        /// The original input.
        input: String,
    },
}

/// One-line summary of every command.
pub const HELP: &str = "commands: start, pause, resume, skip (next), previous (prev, back), \
                        status, help, quit";

/// Parse a user input line into a command.
///
/// Case-insensitive; a leading `/` is accepted.
pub fn parse(input: &str) -> Command {
    let input = input.trim();
    let word = input.strip_prefix('/').unwrap_or(input).to_ascii_lowercase();

    match word.as_str() {
        "" => Command::Empty,
        "start" => Command::Action(CommandAction::Start),
        "pause" => Command::Action(CommandAction::Pause),
        "resume" => Command::Action(CommandAction::Resume),
        "skip" | "next" => Command::Action(CommandAction::Skip),
        "previous" | "prev" | "back" => Command::Action(CommandAction::Previous),
        "status" | "s" => Command::Status,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown { input: input.to_string() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_actions() {
        assert_eq!(parse("start"), Command::Action(CommandAction::Start));
        assert_eq!(parse("pause"), Command::Action(CommandAction::Pause));
        assert_eq!(parse("resume"), Command::Action(CommandAction::Resume));
    }

    #[test]
    fn parse_skip_aliases() {
        assert_eq!(parse("skip"), Command::Action(CommandAction::Skip));
        assert_eq!(parse("next"), Command::Action(CommandAction::Skip));
    }

    #[test]
    fn parse_previous_aliases() {
        for input in ["previous", "prev", "back"] {
            assert_eq!(parse(input), Command::Action(CommandAction::Previous));
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(parse("  START \n"), Command::Action(CommandAction::Start));
        assert_eq!(parse("/Pause"), Command::Action(CommandAction::Pause));
    }

    #[test]
    fn parse_quit() {
        assert_eq!(parse("quit"), Command::Quit);
        assert_eq!(parse("q"), Command::Quit);
    }

    #[test]
    fn parse_unknown_command() {
        assert_eq!(parse("reset"), Command::Unknown { input: "reset".into() });
    }

    #[test]
    fn parse_empty() {
        assert_eq!(parse("   "), Command::Empty);
    }
}
