//! Error types for the feedback widget.
//!
//! These cover plumbing failures only. A submission that times out is not a
//! Rust error: it is the flow's terminal `FlowState::Error`.

use std::path::PathBuf;
use thiserror::Error;

use crate::event::Event;

/// Session errors - surfaced to the view.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The session's event loop has stopped.
    #[error("Feedback session is closed")]
    SessionClosed,

    /// Views may only send user intents; race outcomes come from the runtime.
    #[error("Event '{}' cannot be sent by a view", .0.name())]
    NotUserIntent(Event),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error reading {path:?}: {message}")]
    Io { path: PathBuf, message: String },

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Values parsed but are unusable.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
