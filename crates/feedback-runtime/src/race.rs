//! Submission vs. timeout race.

use std::time::Duration;

use feedback_core::Event;

use crate::submitter::Submitter;

/// Run one submission against the timeout and report which finished first.
///
/// Whichever future loses is dropped by `select!`, which cancels it: a
/// successful submission stops the timer, and a timeout abandons the
/// in-flight submission. On a tie the submission wins.
pub async fn race_submission(
    submitter: &dyn Submitter,
    feedback: String,
    timeout: Duration,
) -> Event {
    tokio::select! {
        biased;

        () = submitter.submit(feedback) => Event::SubmissionSucceeded,
        () = tokio::time::sleep(timeout) => {
            tracing::warn!("Submission timed out after {:?}", timeout);
            Event::SubmissionTimedOut
        }
    }
}
