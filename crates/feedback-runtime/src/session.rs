//! Per-view session that drives one feedback flow.
//!
//! ## Event Loop
//!
//! A session owns exactly one `FeedbackFlow` inside a spawned task. User
//! intents from the view and outcomes from the submission race arrive on the
//! same channel, so transitions are applied one at a time and never
//! interleave.
//!
//! ## Reactive State
//!
//! Every applied event broadcasts a fresh `FlowSnapshot` via
//! `tokio::sync::watch`. The view subscribes and re-renders on change.
//!
//! ## Stale Outcomes
//!
//! Each race is tagged with the flow's generation at the time it started. An
//! outcome whose generation is no longer current is dropped before it reaches
//! the machine. Shutting the session down cancels any race still in flight.

use std::sync::Arc;
use std::time::Duration;

use feedback_core::{Effect, Event, FeedbackFlow, FlowError, FlowSnapshot, FlowState};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::race::race_submission;
use crate::submitter::Submitter;

/// Messages processed by the session loop.
#[derive(Debug)]
enum SessionMessage {
    /// Forwarded from the view.
    Intent(Event),
    /// Delivered by a finished submission race.
    Outcome { generation: u64, event: Event },
    /// Answered once every earlier message has been handled.
    Flush(oneshot::Sender<()>),
}

// =============================================================================
// FlowSession
// =============================================================================

/// Handle to a running feedback session.
///
/// Dropping the handle shuts the session down.
pub struct FlowSession {
    id: Uuid,
    tx: mpsc::UnboundedSender<SessionMessage>,
    state_rx: watch::Receiver<FlowSnapshot>,
    cancel: CancellationToken,
}

impl FlowSession {
    /// Start a session on the current tokio runtime.
    ///
    /// `timeout` bounds every submission started by the flow.
    pub fn spawn(submitter: Arc<dyn Submitter>, timeout: Duration) -> Self {
        let id = Uuid::new_v4();
        let flow = FeedbackFlow::new();
        let (state_tx, state_rx) = watch::channel(flow.snapshot());
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let session_loop = SessionLoop {
            flow,
            submitter,
            timeout,
            state_tx,
            tx: tx.clone(),
            cancel: cancel.clone(),
        };

        let span = tracing::info_span!("feedback_session", %id);
        tokio::spawn(session_loop.run(rx).instrument(span));
        tracing::info!(%id, "Feedback session started");

        Self {
            id,
            tx,
            state_rx,
            cancel,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Forward a user intent to the flow.
    ///
    /// Race outcomes are rejected: only the session may produce them.
    pub fn send(&self, event: Event) -> Result<(), FlowError> {
        if !event.is_user_intent() {
            return Err(FlowError::NotUserIntent(event));
        }
        self.tx
            .send(SessionMessage::Intent(event))
            .map_err(|_| FlowError::SessionClosed)
    }

    /// Wait until every intent sent so far has been applied.
    ///
    /// Does not wait for a submission race to resolve.
    pub async fn flush(&self) -> Result<(), FlowError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(SessionMessage::Flush(done_tx))
            .map_err(|_| FlowError::SessionClosed)?;
        done_rx.await.map_err(|_| FlowError::SessionClosed)
    }

    /// Subscribe to snapshot changes. Clone the receiver for each subscriber.
    pub fn subscribe(&self) -> watch::Receiver<FlowSnapshot> {
        self.state_rx.clone()
    }

    /// The most recently broadcast snapshot.
    pub fn snapshot(&self) -> FlowSnapshot {
        self.state_rx.borrow().clone()
    }

    /// Stop the event loop and cancel any in-flight submission.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Wait until the event loop has stopped.
    pub async fn closed(&self) {
        self.tx.closed().await;
    }
}

impl Drop for FlowSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================================
// Session Loop
// =============================================================================

struct SessionLoop {
    flow: FeedbackFlow,
    submitter: Arc<dyn Submitter>,
    timeout: Duration,
    state_tx: watch::Sender<FlowSnapshot>,
    /// Kept so race tasks can report back into the same queue.
    tx: mpsc::UnboundedSender<SessionMessage>,
    cancel: CancellationToken,
}

impl SessionLoop {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<SessionMessage>) {
        loop {
            let message = tokio::select! {
                _ = self.cancel.cancelled() => break,
                message = rx.recv() => match message {
                    Some(message) => message,
                    None => break,
                },
            };
            self.handle(message);
        }

        tracing::info!(state = %self.flow.state(), "Feedback session stopped");
    }

    fn handle(&mut self, message: SessionMessage) {
        let event = match message {
            SessionMessage::Intent(event) => event,
            SessionMessage::Outcome { generation, event } => {
                if generation != self.flow.generation() {
                    tracing::debug!(
                        generation,
                        current = self.flow.generation(),
                        "Dropping stale submission outcome"
                    );
                    return;
                }
                event
            }
            SessionMessage::Flush(done) => {
                let _ = done.send(());
                return;
            }
        };

        let effects = self.flow.send(event);
        self.broadcast();

        for effect in effects {
            self.execute(effect);
        }
    }

    fn broadcast(&self) {
        let snapshot = self.flow.snapshot();
        self.state_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    fn execute(&self, effect: Effect) {
        match effect {
            Effect::StartSubmission { feedback } => self.start_submission(feedback),
        }
    }

    fn start_submission(&self, feedback: String) {
        debug_assert_eq!(self.flow.state(), FlowState::Submitting);

        let generation = self.flow.generation();
        let submitter = self.submitter.clone();
        let timeout = self.timeout;
        let tx = self.tx.clone();
        let cancel = self.cancel.child_token();

        tracing::info!(generation, ?timeout, "Starting submission");

        tokio::spawn(
            async move {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!(generation, "Submission cancelled with session");
                    }
                    event = race_submission(submitter.as_ref(), feedback, timeout) => {
                        tracing::debug!(
                            generation,
                            outcome = event.name(),
                            "Submission race resolved"
                        );
                        let _ = tx.send(SessionMessage::Outcome { generation, event });
                    }
                }
            }
            .in_current_span(),
        );
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submitter::{MockSubmitter, SimulatedSubmitter};

    const TIMEOUT: Duration = Duration::from_millis(2000);

    fn session_with_delay(delay_ms: u64) -> (FlowSession, Arc<SimulatedSubmitter>) {
        let submitter = Arc::new(SimulatedSubmitter::new(Duration::from_millis(delay_ms)));
        let session = FlowSession::spawn(submitter.clone(), TIMEOUT);
        (session, submitter)
    }

    async fn wait_for_state(session: &FlowSession, state: FlowState) -> FlowSnapshot {
        let mut rx = session.subscribe();
        let snapshot = rx.wait_for(|s| s.state == state).await.unwrap();
        snapshot.clone()
    }

    fn submit_feedback(session: &FlowSession, text: &str) {
        session.send(Event::BadFeedback).unwrap();
        session.send(Event::feedback_changed(text)).unwrap();
        session.send(Event::Submit).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_snapshot() {
        let (session, _) = session_with_delay(1000);
        assert_eq!(session.snapshot(), FlowSnapshot::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_succeeds_before_timeout() {
        let (session, submitter) = session_with_delay(1000);
        let start = tokio::time::Instant::now();

        submit_feedback(&session, "great app");
        wait_for_state(&session, FlowState::Submitting).await;

        let snapshot = wait_for_state(&session, FlowState::Thanks).await;
        assert_eq!(snapshot.context.feedback, "great app");
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert!(start.elapsed() < TIMEOUT);
        assert_eq!(submitter.accepted(), vec!["great app".to_string()]);

        // The timer was cancelled: nothing moves the flow once it would have fired.
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(session.snapshot().state, FlowState::Thanks);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_times_out() {
        let (session, submitter) = session_with_delay(3000);
        let start = tokio::time::Instant::now();

        submit_feedback(&session, "bad experience");
        wait_for_state(&session, FlowState::Error).await;
        assert!(start.elapsed() >= TIMEOUT);

        // The late submission result is ignored and never even lands.
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(session.snapshot().state, FlowState::Error);
        assert!(submitter.accepted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_is_terminal_for_user_intents() {
        let (session, _) = session_with_delay(3000);
        submit_feedback(&session, "bad experience");
        wait_for_state(&session, FlowState::Error).await;

        session.send(Event::Restart).unwrap();
        session.send(Event::Close).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(session.snapshot().state, FlowState::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_submit_stays_on_form() {
        let (session, submitter) = session_with_delay(1000);

        submit_feedback(&session, "   ");
        tokio::time::sleep(Duration::from_millis(5000)).await;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, FlowState::Form);
        assert_eq!(snapshot.context.feedback, "   ");
        assert!(submitter.accepted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_good_feedback_restart() {
        let (session, _) = session_with_delay(1000);

        session.send(Event::GoodFeedback).unwrap();
        wait_for_state(&session, FlowState::Thanks).await;

        session.send(Event::Restart).unwrap();
        let snapshot = wait_for_state(&session, FlowState::Prompt).await;
        assert_eq!(snapshot.context.feedback, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_cannot_send_race_outcomes() {
        let (session, _) = session_with_delay(1000);

        let result = session.send(Event::SubmissionSucceeded);
        assert!(matches!(
            result,
            Err(FlowError::NotUserIntent(Event::SubmissionSucceeded))
        ));
        assert!(session.send(Event::SubmissionTimedOut).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_waits_for_queued_intents() {
        let (session, _) = session_with_delay(1000);

        submit_feedback(&session, "queued");
        session.flush().await.unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, FlowState::Submitting);
        assert_eq!(snapshot.context.feedback, "queued");
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_after_shutdown_fails() {
        let (session, _) = session_with_delay(1000);

        session.shutdown();
        session.closed().await;

        assert!(matches!(
            session.send(Event::GoodFeedback),
            Err(FlowError::SessionClosed)
        ));
        assert!(matches!(session.flush().await, Err(FlowError::SessionClosed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_in_flight_submission() {
        let (session, submitter) = session_with_delay(1000);

        submit_feedback(&session, "never sent");
        wait_for_state(&session, FlowState::Submitting).await;

        session.shutdown();
        session.closed().await;
        tokio::time::sleep(Duration::from_millis(5000)).await;

        assert!(submitter.accepted().is_empty());
        assert_eq!(session.snapshot().state, FlowState::Submitting);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submitter_receives_feedback_once() {
        let mut submitter = MockSubmitter::new();
        submitter
            .expect_submit()
            .withf(|feedback| feedback == "great app")
            .times(1)
            .returning(|_| Box::pin(async {}));

        let session = FlowSession::spawn(Arc::new(submitter), TIMEOUT);
        submit_feedback(&session, "great app");
        // A second submit while submitting is ignored by the table.
        session.send(Event::Submit).unwrap();

        wait_for_state(&session, FlowState::Thanks).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_outcome_is_dropped() {
        let (state_tx, state_rx) = watch::channel(FlowSnapshot::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session_loop = SessionLoop {
            flow: FeedbackFlow::new(),
            submitter: Arc::new(SimulatedSubmitter::new(Duration::from_millis(1000))),
            timeout: TIMEOUT,
            state_tx,
            tx,
            cancel: CancellationToken::new(),
        };

        session_loop.handle(SessionMessage::Intent(Event::BadFeedback));
        session_loop.handle(SessionMessage::Intent(Event::feedback_changed("text")));
        session_loop.handle(SessionMessage::Intent(Event::Submit));
        assert_eq!(session_loop.flow.generation(), 1);

        session_loop.handle(SessionMessage::Outcome {
            generation: 0,
            event: Event::SubmissionTimedOut,
        });
        assert_eq!(state_rx.borrow().state, FlowState::Submitting);

        session_loop.handle(SessionMessage::Outcome {
            generation: 1,
            event: Event::SubmissionSucceeded,
        });
        assert_eq!(state_rx.borrow().state, FlowState::Thanks);
    }
}
