//! Async runtime for the feedback flow.
//!
//! `feedback-core` decides what happens; this crate makes it happen:
//! - `Submitter` is the submission collaborator (simulated by default)
//! - `race_submission` runs a submission against its timeout
//! - `FlowSession` owns one `FeedbackFlow`, processes events one at a time
//!   and broadcasts snapshots to the view

mod race;
mod session;
mod submitter;

pub use race::race_submission;
pub use session::FlowSession;
pub use submitter::{SimulatedSubmitter, Submitter};
