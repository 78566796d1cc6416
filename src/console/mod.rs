//! Console module: the assistant's input and output boundary
//!
//! Utterances are pulled one at a time; `None` signals end of input.
//! Speech capture lives behind this boundary and is out of scope here.

mod terminal;

use async_trait::async_trait;
use thiserror::Error;

pub use terminal::TerminalConsole;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("secret entry failed: {0}")]
    Secret(#[from] dialoguer::Error),

    #[error("secret entry task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Source of utterances and sink for replies
#[async_trait]
pub trait Console: Send {
    /// Next utterance, or `None` at end of input
    async fn next_utterance(&mut self) -> Option<String>;

    /// Read a secret without echoing it
    async fn read_secret(&mut self, prompt: &str) -> Result<String, ConsoleError>;

    /// Show a reply from `speaker`
    async fn respond(&mut self, speaker: &str, text: &str);
}
