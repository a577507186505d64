//! The submission collaborator.
//!
//! The `Submitter` trait is view-independent and returns futures, so the
//! session can race them against a timer. A submission never fails: its only
//! observable outcome is resolving (or not resolving in time).

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Sends feedback somewhere.
#[cfg_attr(test, mockall::automock)]
pub trait Submitter: Send + Sync {
    /// Submit the feedback text. Resolves once the submission is accepted.
    ///
    /// Dropping the returned future abandons the submission.
    fn submit(&self, feedback: String) -> BoxFuture<'static, ()>;
}

/// Submitter that accepts everything after a fixed delay.
///
/// Accepted feedback is kept in memory so callers can inspect what made it
/// through before the timeout.
pub struct SimulatedSubmitter {
    delay: Duration,
    accepted: Arc<Mutex<Vec<String>>>,
}

impl SimulatedSubmitter {
    /// Create a submitter that resolves after `delay`.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            accepted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Feedback that finished submitting, oldest first.
    pub fn accepted(&self) -> Vec<String> {
        self.accepted.lock().clone()
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

impl Submitter for SimulatedSubmitter {
    fn submit(&self, feedback: String) -> BoxFuture<'static, ()> {
        let accepted = self.accepted.clone();
        let delay = self.delay;

        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            tracing::debug!(len = feedback.len(), "Simulated submission accepted");
            accepted.lock().push(feedback);
        })
    }
}
