//! error-assistant: voice-driven personal assistant
//!
//! The assistant reads one utterance at a time and provides:
//! - A locked-by-default session unlocked by password or voice passphrase
//! - Intent resolution via a remote classifier with local rule fallback
//! - Dispatch of intents to local OS actions
//! - A bounded, persisted interaction history
//!
//! Speech-to-text happens upstream; utterances arrive as lines of text.

mod actions;
mod assistant;
mod classifier;
mod config;
mod console;
mod events;
mod intent;
mod session;
mod store;

use anyhow::{Context, Result};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::actions::SystemController;
use crate::assistant::{AssistantLoop, ExitReason};
use crate::classifier::ClassifierClient;
use crate::config::Config;
use crate::console::TerminalConsole;
use crate::events::SessionEvent;
use crate::intent::IntentResolver;
use crate::session::{Credentials, SessionGuard};
use crate::store::ContextStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so it can pick the log level
    let config = Config::load()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "error-assistant starting"
    );
    info!(?config, "configuration loaded");

    if config.password_hash.is_empty() && config.voice_passphrase.is_empty() {
        warn!("no password hash or voice passphrase configured, the session cannot be unlocked");
    }

    // Session guard -> event logger
    let (event_tx, mut event_rx) = broadcast::channel::<SessionEvent>(64);

    let guard = SessionGuard::new(
        Credentials {
            password_hash: config.password_hash.clone(),
            voice_passphrase: config.voice_passphrase.clone(),
        },
        config.session_timeout_secs,
        event_tx,
    );

    let classifier = ClassifierClient::new(&config.api_base_url, &config.api_key)
        .context("failed to build classifier client")?;
    if !classifier.is_enabled() {
        info!("no classifier configured, using local rules only");
    }

    let store = ContextStore::open(&config).context("failed to open context store")?;

    let mut assistant = AssistantLoop::new(
        &config,
        guard,
        IntentResolver::new(classifier),
        SystemController::new(config.search_root.clone()),
        store,
        TerminalConsole::new(),
    );

    tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => info!(%event, "session event"),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "session event receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    match assistant.run().await {
        ExitReason::EndOfInput => info!("input closed"),
        ExitReason::ExitCommand => info!("exit requested"),
    }

    info!("error-assistant stopped");

    Ok(())
}
