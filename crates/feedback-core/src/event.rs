//! Events that drive the feedback flow.

use serde::{Deserialize, Serialize};

/// Everything that can happen to the flow.
///
/// The first seven variants are user intents forwarded by the view. The last
/// two are outcomes of the submission race and are only ever produced by the
/// runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The user rated the experience as good.
    GoodFeedback,
    /// The user rated the experience as bad.
    BadFeedback,
    /// The user dismissed the widget.
    Close,
    /// The user left the form without submitting.
    Back,
    /// The user asked to submit the typed feedback.
    Submit,
    /// The feedback text area changed.
    FeedbackChanged { value: String },
    /// The user started over from a final screen.
    Restart,
    /// The submission call resolved before the timeout.
    SubmissionSucceeded,
    /// The timeout elapsed before the submission call resolved.
    SubmissionTimedOut,
}

impl Event {
    /// Shorthand for `Event::FeedbackChanged`.
    pub fn feedback_changed(value: impl Into<String>) -> Self {
        Event::FeedbackChanged {
            value: value.into(),
        }
    }

    /// Check if a view is allowed to send this event.
    pub fn is_user_intent(&self) -> bool {
        !matches!(self, Event::SubmissionSucceeded | Event::SubmissionTimedOut)
    }

    /// Short name for logging. Never includes the feedback text.
    pub fn name(&self) -> &'static str {
        match self {
            Event::GoodFeedback => "good_feedback",
            Event::BadFeedback => "bad_feedback",
            Event::Close => "close",
            Event::Back => "back",
            Event::Submit => "submit",
            Event::FeedbackChanged { .. } => "feedback_changed",
            Event::Restart => "restart",
            Event::SubmissionSucceeded => "submission_succeeded",
            Event::SubmissionTimedOut => "submission_timed_out",
        }
    }
}
