//! Terminal frontend for the feedback widget.
//!
//! This crate is the view collaborator:
//! - `screen` renders a snapshot as one of six screens
//! - `commands` turns typed lines into user intents
//! - `app` runs the read/forward/redraw loop against a `FlowSession`

pub mod app;
pub mod commands;
pub mod error;
pub mod screen;

pub use app::run;
pub use commands::{available_commands, parse_command, Command, CommandError};
pub use error::UiError;
pub use screen::{render, CommandHint, Screen};
