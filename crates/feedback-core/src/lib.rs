//! Core types for the feedback widget.
//!
//! This crate contains the synchronous half of the feedback flow:
//! - Flow states, context and snapshots
//! - Events (user intents and submission race outcomes)
//! - Effects requested by transitions
//! - The pure transition function and the owned `FeedbackFlow` instance
//! - Configuration types
//! - Error types

mod config;
mod effect;
mod error;
mod event;
mod machine;
mod state;

pub use config::{config_dir, config_path, FlowConfig, SubmissionConfig, CONFIG_ENV_VAR};
pub use effect::Effect;
pub use error::{ConfigError, FlowError};
pub use event::Event;
pub use machine::{has_feedback, reset_feedback, set_feedback, transition, FeedbackFlow, Transition};
pub use state::{FlowContext, FlowSnapshot, FlowState};
