//! Terminal-backed console using stdin/stdout

use async_trait::async_trait;
use dialoguer::Password;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};
use tracing::warn;

use super::{Console, ConsoleError};

/// Reads typed (or externally transcribed) lines from stdin
pub struct TerminalConsole {
    lines: Lines<BufReader<Stdin>>,
    stdout: Stdout,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            stdout: tokio::io::stdout(),
        }
    }

    async fn write(&mut self, text: &str) {
        if let Err(e) = self.write_flushed(text).await {
            warn!(?e, "failed to write to stdout");
        }
    }

    async fn write_flushed(&mut self, text: &str) -> std::io::Result<()> {
        self.stdout.write_all(text.as_bytes()).await?;
        self.stdout.flush().await
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Console for TerminalConsole {
    async fn next_utterance(&mut self) -> Option<String> {
        self.write("You: ").await;
        match self.lines.next_line().await {
            Ok(line) => line.map(|line| line.trim().to_string()),
            Err(e) => {
                warn!(?e, "failed to read from stdin, treating as end of input");
                None
            }
        }
    }

    async fn read_secret(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        let prompt = prompt.to_string();
        let secret =
            tokio::task::spawn_blocking(move || Password::new().with_prompt(prompt).interact())
                .await??;
        Ok(secret)
    }

    async fn respond(&mut self, speaker: &str, text: &str) {
        self.write(&format!("{speaker}: {text}\n")).await;
    }
}
