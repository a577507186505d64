//! Error type for the terminal frontend.

use feedback_core::FlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiError {
    /// Reading input or writing a screen failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session rejected an event or has stopped.
    #[error(transparent)]
    Flow(#[from] FlowError),
}
