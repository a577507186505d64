//! Terminal view loop.
//!
//! Reads commands line by line, forwards their intents to the session and
//! redraws whenever the session broadcasts a new snapshot.

use std::io::Write;

use feedback_core::{FlowSnapshot, FlowState};
use feedback_runtime::FlowSession;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::commands::{available_commands, parse_command, Command};
use crate::error::UiError;
use crate::screen::render;

/// Drive `session` from `input`, drawing screens to `output`.
///
/// Returns on `quit`, when the session stops, or at end of input. At end of
/// input a submission still in flight is allowed to resolve first, so piped
/// scripts see the final screen.
pub async fn run<R, W>(session: &FlowSession, input: R, mut output: W) -> Result<(), UiError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut state_rx = session.subscribe();
    let mut lines = input.lines();

    let mut drawn = state_rx.borrow_and_update().clone();
    draw(&mut output, &drawn)?;

    loop {
        tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_err() {
                    tracing::debug!("Session stopped - leaving view loop");
                    return Ok(());
                }
                drawn = state_rx.borrow_and_update().clone();
                draw(&mut output, &drawn)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(Command::Quit) => return Ok(()),
                    Ok(Command::Help) => {
                        let state = state_rx.borrow().state;
                        print_help(&mut output, state)?;
                    }
                    Ok(command) => {
                        if let Some(event) = command.intent() {
                            session.send(event)?;
                        }
                    }
                    Err(e) => writeln!(output, "{e}")?,
                }
            }
        }
    }

    settle(session, &mut output, &drawn).await
}

/// Let queued intents and any in-flight submission finish, then draw where
/// the flow ends up.
async fn settle<W: Write>(
    session: &FlowSession,
    output: &mut W,
    drawn: &FlowSnapshot,
) -> Result<(), UiError> {
    if session.flush().await.is_err() {
        return Ok(());
    }

    let mut state_rx = session.subscribe();
    let snapshot = match state_rx.wait_for(|s| s.state != FlowState::Submitting).await {
        Ok(snapshot) => snapshot.clone(),
        Err(_) => return Ok(()),
    };

    if snapshot != *drawn {
        draw(output, &snapshot)?;
    }
    Ok(())
}

fn draw<W: Write>(output: &mut W, snapshot: &FlowSnapshot) -> Result<(), UiError> {
    writeln!(output, "\n{}", render(snapshot))?;
    output.flush()?;
    Ok(())
}

fn print_help<W: Write>(output: &mut W, state: FlowState) -> Result<(), UiError> {
    let commands = available_commands(state);
    if commands.is_empty() {
        writeln!(output, "Nothing to do here. Type 'quit' to leave.")?;
    } else {
        writeln!(output, "Commands: {}, quit", commands.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_runtime::SimulatedSubmitter;
    use std::sync::Arc;
    use std::time::Duration;

    fn session(delay_ms: u64) -> FlowSession {
        FlowSession::spawn(
            Arc::new(SimulatedSubmitter::new(Duration::from_millis(delay_ms))),
            Duration::from_millis(2000),
        )
    }

    async fn run_script(session: &FlowSession, script: &str) -> String {
        let mut output = Vec::new();
        run(session, script.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_bad_feedback_script_reaches_thanks() {
        let session = session(1000);
        let output = run_script(&session, "bad\ntype great app\nsubmit\n").await;

        assert!(output.starts_with("\nHow was your experience?"));
        assert!(output.trim_end().ends_with("[restart] Close"));
        assert!(output.contains("Thanks for the review!"));
        assert_eq!(session.snapshot().state, FlowState::Thanks);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_submission_script_reaches_error() {
        let session = session(3000);
        let output = run_script(&session, "bad\ntype bad experience\nsubmit\n").await;

        assert!(output.contains(crate::screen::ERROR_MESSAGE));
        assert_eq!(session.snapshot().state, FlowState::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_stops_reading() {
        let session = session(1000);
        run_script(&session, "quit\ngood\n").await;

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(session.snapshot().state, FlowState::Prompt);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_command_is_reported() {
        let session = session(1000);
        let output = run_script(&session, "launch\n").await;
        assert!(output.contains("Unknown command 'launch'"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_help_lists_screen_commands() {
        let session = session(1000);
        let output = run_script(&session, "help\n").await;
        assert!(output.contains("Commands: good, bad, close, quit"));
    }
}
