//! Screen model for the terminal view.
//!
//! `render` is a pure function of a snapshot: the same (state, context)
//! always produces the same screen.

use std::fmt;

use feedback_core::{FlowSnapshot, FlowState};

/// Placeholder shown while the feedback text is empty.
pub const FEEDBACK_PLACEHOLDER: &str = "Your feedback...";

/// Generic message for a timed out submission.
pub const ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";

/// One button on a screen: the command to type and what it is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHint {
    pub command: &'static str,
    pub label: &'static str,
}

const fn hint(command: &'static str, label: &'static str) -> CommandHint {
    CommandHint { command, label }
}

/// A rendered screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub title: String,
    pub body: Vec<String>,
    pub commands: Vec<CommandHint>,
}

/// Build the screen for a snapshot.
pub fn render(snapshot: &FlowSnapshot) -> Screen {
    match snapshot.state {
        FlowState::Prompt => Screen {
            title: "How was your experience?".to_string(),
            body: Vec::new(),
            commands: vec![hint("good", "Good"), hint("bad", "Bad"), hint("close", "Close")],
        },
        FlowState::Form => {
            let feedback = &snapshot.context.feedback;
            let text = if feedback.is_empty() {
                FEEDBACK_PLACEHOLDER
            } else {
                feedback.as_str()
            };
            Screen {
                title: "Sorry to hear that! You can leave additional feedback:".to_string(),
                body: text.lines().map(|line| format!("> {line}")).collect(),
                commands: vec![
                    hint("type <text>", "Edit"),
                    hint("submit", "Submit"),
                    hint("back", "Back"),
                    hint("close", "Close"),
                ],
            }
        }
        FlowState::Submitting => Screen {
            title: "Submitting your feedback...".to_string(),
            body: Vec::new(),
            commands: Vec::new(),
        },
        // The thanks screen's only button closes the widget by starting over.
        FlowState::Thanks => Screen {
            title: "Thanks for the review!".to_string(),
            body: Vec::new(),
            commands: vec![hint("restart", "Close")],
        },
        FlowState::Error => Screen {
            title: "Error".to_string(),
            body: vec![ERROR_MESSAGE.to_string()],
            commands: Vec::new(),
        },
        FlowState::Closed => Screen {
            title: "Closed".to_string(),
            body: Vec::new(),
            commands: vec![hint("restart", "Restart")],
        },
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        write!(f, "{}", "-".repeat(self.title.chars().count()))?;

        for line in &self.body {
            write!(f, "\n{line}")?;
        }

        if !self.commands.is_empty() {
            let buttons: Vec<String> = self
                .commands
                .iter()
                .map(|h| format!("[{}] {}", h.command, h.label))
                .collect();
            write!(f, "\n{}", buttons.join("  "))?;
        }

        Ok(())
    }
}
