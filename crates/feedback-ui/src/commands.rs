//! Typed commands for the terminal view.
//!
//! Each command maps to at most one user intent. The view forwards intents
//! as-is; whether they do anything is up to the flow.

use feedback_core::{Event, FlowState};
use thiserror::Error;

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Good,
    Bad,
    Close,
    Back,
    Submit,
    Restart,
    /// Replace the feedback text.
    Type(String),
    Help,
    Quit,
}

impl Command {
    /// The flow event this command forwards, if any.
    pub fn intent(&self) -> Option<Event> {
        match self {
            Command::Good => Some(Event::GoodFeedback),
            Command::Bad => Some(Event::BadFeedback),
            Command::Close => Some(Event::Close),
            Command::Back => Some(Event::Back),
            Command::Submit => Some(Event::Submit),
            Command::Restart => Some(Event::Restart),
            Command::Type(text) => Some(Event::feedback_changed(text.clone())),
            Command::Help | Command::Quit => None,
        }
    }
}

/// Input that isn't a command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),
}

/// Parse one line of input.
///
/// Everything after `type` and the first whitespace character is taken
/// verbatim, whitespace included, so the flow's guard sees exactly what the
/// user typed.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();

    let (name, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, Some(rest)),
        None => (trimmed, None),
    };

    match name {
        "" => Err(CommandError::Empty),
        "type" => Ok(Command::Type(rest.unwrap_or_default().to_string())),
        "good" => Ok(Command::Good),
        "bad" => Ok(Command::Bad),
        "close" => Ok(Command::Close),
        "back" => Ok(Command::Back),
        "submit" => Ok(Command::Submit),
        "restart" => Ok(Command::Restart),
        "help" => Ok(Command::Help),
        "quit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Commands offered on each screen.
pub fn available_commands(state: FlowState) -> &'static [&'static str] {
    match state {
        FlowState::Prompt => &["good", "bad", "close"],
        FlowState::Form => &["type <text>", "submit", "back", "close"],
        FlowState::Thanks | FlowState::Closed => &["restart"],
        FlowState::Submitting | FlowState::Error => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("good"), Ok(Command::Good));
        assert_eq!(parse_command("  bad\n"), Ok(Command::Bad));
        assert_eq!(parse_command("submit\r\n"), Ok(Command::Submit));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_type_keeps_text_verbatim() {
        assert_eq!(
            parse_command("type great app"),
            Ok(Command::Type("great app".to_string()))
        );
        assert_eq!(
            parse_command("type    "),
            Ok(Command::Type("   ".to_string()))
        );
        assert_eq!(parse_command("type"), Ok(Command::Type(String::new())));
        assert_eq!(
            parse_command("type\tgreat  app"),
            Ok(Command::Type("great  app".to_string()))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_command(""), Err(CommandError::Empty));
        assert_eq!(parse_command("   "), Err(CommandError::Empty));
        assert_eq!(
            parse_command("launch"),
            Err(CommandError::Unknown("launch".to_string()))
        );
    }

    #[test]
    fn test_intents() {
        assert_eq!(
            Command::Type("x".to_string()).intent(),
            Some(Event::feedback_changed("x"))
        );
        assert_eq!(Command::Restart.intent(), Some(Event::Restart));
        assert_eq!(Command::Help.intent(), None);
        assert_eq!(Command::Quit.intent(), None);
    }

    #[test]
    fn test_commands_only_forward_user_intents() {
        let commands = [
            Command::Good,
            Command::Bad,
            Command::Close,
            Command::Back,
            Command::Submit,
            Command::Restart,
            Command::Type("text".to_string()),
        ];
        for command in commands {
            let event = command.intent().unwrap();
            assert!(event.is_user_intent(), "{command:?} forwards {event:?}");
        }
    }

    #[test]
    fn test_available_commands() {
        assert!(available_commands(FlowState::Prompt).contains(&"bad"));
        assert!(available_commands(FlowState::Form).contains(&"submit"));
        assert_eq!(available_commands(FlowState::Closed), &["restart"]);
        assert!(available_commands(FlowState::Error).is_empty());
        assert!(available_commands(FlowState::Submitting).is_empty());
    }
}
