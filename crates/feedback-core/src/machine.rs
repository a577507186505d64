//! The feedback flow state machine.
//!
//! [`transition`] is a pure function `(state, context, event) -> Transition`.
//! It never performs I/O; entering `Submitting` returns an
//! [`Effect::StartSubmission`] for the runtime to execute.
//!
//! [`FeedbackFlow`] is the owned per-session instance that applies
//! transitions in place.

use crate::effect::Effect;
use crate::event::Event;
use crate::state::{FlowContext, FlowSnapshot, FlowState};

// =============================================================================
// Guards and Reducers
// =============================================================================

/// Guard for `Submit`: the typed feedback has non-whitespace content.
pub fn has_feedback(context: &FlowContext) -> bool {
    !context.feedback.trim().is_empty()
}

/// Reducer for `FeedbackChanged`.
pub fn set_feedback(context: FlowContext, value: String) -> FlowContext {
    FlowContext {
        feedback: value,
        ..context
    }
}

/// Reducer for `Restart`.
pub fn reset_feedback(context: FlowContext) -> FlowContext {
    FlowContext {
        feedback: String::new(),
        ..context
    }
}

// =============================================================================
// Transition
// =============================================================================

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the event.
    pub state: FlowState,
    /// Context after the event.
    pub context: FlowContext,
    /// Effects for the runtime to execute.
    pub effects: Vec<Effect>,
    changed: bool,
}

impl Transition {
    fn to(state: FlowState, context: FlowContext) -> Self {
        Self {
            state,
            context,
            effects: Vec::new(),
            changed: true,
        }
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// The event had no matching row (or its guard failed).
    pub fn unchanged(state: FlowState, context: FlowContext) -> Self {
        Self {
            state,
            context,
            effects: Vec::new(),
            changed: false,
        }
    }

    /// Whether the event matched a row of the table.
    ///
    /// `FeedbackChanged` on the form counts as a change even when the text is
    /// identical, since the event was accepted.
    pub fn changed(&self) -> bool {
        self.changed
    }
}

/// Pure transition function.
///
/// Any (state, event) pair without a row below is a no-op: state and context
/// come back unchanged and no effects are produced.
pub fn transition(state: FlowState, context: FlowContext, event: Event) -> Transition {
    use FlowState::*;

    match (state, event) {
        // Prompt
        (Prompt, Event::GoodFeedback) => Transition::to(Thanks, context),
        (Prompt, Event::BadFeedback) => Transition::to(Form, context),
        (Prompt, Event::Close) => Transition::to(Closed, context),

        // Form
        (Form, Event::FeedbackChanged { value }) => {
            Transition::to(Form, set_feedback(context, value))
        }
        (Form, Event::Back) => Transition::to(Prompt, context),
        (Form, Event::Close) => Transition::to(Closed, context),
        (Form, Event::Submit) if has_feedback(&context) => {
            let feedback = context.feedback.clone();
            Transition::to(Submitting, context)
                .with_effect(Effect::StartSubmission { feedback })
        }

        // Submitting
        (Submitting, Event::SubmissionSucceeded) => Transition::to(Thanks, context),
        (Submitting, Event::SubmissionTimedOut) => Transition::to(Error, context),

        // Thanks / Closed
        (Thanks | Closed, Event::Restart) => Transition::to(Prompt, reset_feedback(context)),

        // Error is terminal; everything else is ignored.
        (state, _) => Transition::unchanged(state, context),
    }
}

// =============================================================================
// FeedbackFlow
// =============================================================================

/// One feedback flow, owned by a single view session.
#[derive(Debug, Default)]
pub struct FeedbackFlow {
    state: FlowState,
    context: FlowContext,
    generation: u64,
}

impl FeedbackFlow {
    /// Create a flow on the `Prompt` screen with empty feedback.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn context(&self) -> &FlowContext {
        &self.context
    }

    /// Number of times the flow has entered `Submitting`.
    ///
    /// Identifies the submission race currently in flight.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Copy of the current state and context for rendering.
    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot::new(self.state, self.context.clone())
    }

    /// Apply an event in place and return the effects to execute.
    pub fn send(&mut self, event: Event) -> Vec<Effect> {
        let from = self.state;
        let name = event.name();
        let context = std::mem::take(&mut self.context);

        let Transition {
            state,
            context,
            effects,
            changed,
        } = transition(from, context, event);

        self.state = state;
        self.context = context;

        if !changed {
            tracing::trace!(state = %from, event = name, "Event ignored");
            return effects;
        }

        if state == FlowState::Submitting && from != FlowState::Submitting {
            self.generation += 1;
        }

        tracing::debug!(from = %from, to = %state, event = name, "Flow transition");
        effects
    }
}

// =============================================================================
// Tests
// =============================================================================
