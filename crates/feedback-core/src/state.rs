//! Flow state and context types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The screen the feedback flow is currently on.
///
/// Exactly one state is active at a time. `Error` is terminal: no event
/// moves the flow out of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    /// Asking whether the experience was good or bad.
    #[default]
    Prompt,
    /// Collecting free-text feedback after a bad rating.
    Form,
    /// Waiting for the submission race to resolve.
    Submitting,
    /// Feedback recorded.
    Thanks,
    /// Submission timed out.
    Error,
    /// The user dismissed the widget.
    Closed,
}

impl FlowState {
    /// All states, in display order.
    pub const ALL: [FlowState; 6] = [
        FlowState::Prompt,
        FlowState::Form,
        FlowState::Submitting,
        FlowState::Thanks,
        FlowState::Error,
        FlowState::Closed,
    ];

    /// Check if no transition leaves this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, FlowState::Error)
    }

    /// Stable lowercase name, used in logs and the terminal view.
    pub fn as_str(self) -> &'static str {
        match self {
            FlowState::Prompt => "prompt",
            FlowState::Form => "form",
            FlowState::Submitting => "submitting",
            FlowState::Thanks => "thanks",
            FlowState::Error => "error",
            FlowState::Closed => "closed",
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data carried alongside the current state.
///
/// Owned by the machine. Views read it from snapshots and change it only by
/// sending `Event::FeedbackChanged`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowContext {
    /// Free-text feedback typed on the form.
    pub feedback: String,
}

impl FlowContext {
    /// Create a context with the given feedback text.
    pub fn with_feedback(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
        }
    }
}

/// Everything a view needs to render one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSnapshot {
    pub state: FlowState,
    pub context: FlowContext,
}

impl FlowSnapshot {
    pub fn new(state: FlowState, context: FlowContext) -> Self {
        Self { state, context }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_prompt() {
        assert_eq!(FlowState::default(), FlowState::Prompt);
        assert_eq!(FlowContext::default().feedback, "");
    }

    #[test]
    fn test_only_error_is_terminal() {
        let terminal: Vec<_> = FlowState::ALL
            .iter()
            .copied()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![FlowState::Error]);
    }

    #[test]
    fn test_snapshot_serializes_snake_case() {
        let snapshot = FlowSnapshot::new(
            FlowState::Submitting,
            FlowContext::with_feedback("slow page"),
        );
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"], "submitting");
        assert_eq!(json["context"]["feedback"], "slow page");
    }
}
