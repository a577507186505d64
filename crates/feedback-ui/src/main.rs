//! Feedback widget - terminal entry point.
//!
//! Loads configuration, starts a feedback session with the simulated
//! submitter and hands stdin/stdout to the terminal view.

use std::sync::Arc;

use feedback_core::{FlowConfig, FlowError, CONFIG_ENV_VAR};
use feedback_runtime::{FlowSession, SimulatedSubmitter};
use feedback_ui::UiError;
use tokio::io::BufReader;

// =============================================================================
// Configuration
// =============================================================================

/// Load configuration.
///
/// An explicit `$FEEDBACK_CONFIG` must load cleanly. Otherwise a missing or
/// broken file degrades to the default timings.
fn load_config() -> Result<FlowConfig, FlowError> {
    if std::env::var_os(CONFIG_ENV_VAR).is_some() {
        return Ok(FlowConfig::load_from_default_location()?.unwrap_or_default());
    }
    Ok(FlowConfig::load_or_default())
}

// =============================================================================
// Entry Point
// =============================================================================

async fn run_session(config: FlowConfig) -> Result<(), UiError> {
    let submitter = Arc::new(SimulatedSubmitter::new(config.submission.delay()));
    let session = FlowSession::spawn(submitter, config.submission.timeout());

    let stdin = BufReader::new(tokio::io::stdin());
    let result = feedback_ui::run(&session, stdin, std::io::stdout()).await;

    session.shutdown();
    session.closed().await;
    result
}

fn main() {
    // Logs go to stderr so screens on stdout stay readable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    tracing::info!("Feedback widget starting...");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Submission delay {:?}, timeout {:?}",
        config.submission.delay(),
        config.submission.timeout()
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    let result = rt.block_on(run_session(config));
    // A pending stdin read would otherwise hold up runtime teardown.
    rt.shutdown_background();

    if let Err(e) = result {
        tracing::error!("Feedback session failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
