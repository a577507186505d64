//! Effects requested by transitions.
//!
//! Transitions never perform I/O. They describe what the runtime should do
//! and the runtime feeds the outcome back as an `Event`.

use serde::{Deserialize, Serialize};

/// A side effect returned by [`transition`](crate::transition).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Race a submission call against the submission timeout.
    ///
    /// Emitted exactly once per entry into `Submitting`. The runtime tags the
    /// race with [`FeedbackFlow::generation`](crate::FeedbackFlow::generation)
    /// so an outcome from an older race can be told apart.
    StartSubmission { feedback: String },
}
