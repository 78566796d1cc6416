//! The assistant loop: one utterance at a time
//!
//! Each turn runs input → session check → resolve → dispatch → respond →
//! persist to completion before the next utterance is read.

use tracing::{debug, info, warn};

use crate::actions::ActionDispatcher;
use crate::config::Config;
use crate::console::Console;
use crate::intent::IntentResolver;
use crate::session::SessionGuard;
use crate::store::ContextStore;

const LOCKED_PROMPT: &str = "Session is locked. Say 'password' or 'voice' to authenticate.";
const LOCK_CONFIRMATION: &str = "Session locked.";
const SECRET_CANCELLED: &str = "Password entry cancelled.";

const PASSWORD_PREFIX: &str = "password ";
const VOICE_PREFIX: &str = "voice ";

/// What a single utterance amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Blank input, nothing happened
    Skipped,
    /// Exit keyword received
    Exit,
    /// Handled by the locked-session protocol
    Locked,
    /// Command resolved and answered; history updated
    Completed,
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    EndOfInput,
    ExitCommand,
}

fn has_prefix_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

pub struct AssistantLoop<C, D> {
    name: String,
    guard: SessionGuard,
    resolver: IntentResolver,
    dispatcher: D,
    store: ContextStore,
    console: C,
}

impl<C, D> AssistantLoop<C, D>
where
    C: Console,
    D: ActionDispatcher,
{
    pub fn new(
        config: &Config,
        guard: SessionGuard,
        resolver: IntentResolver,
        dispatcher: D,
        store: ContextStore,
        console: C,
    ) -> Self {
        Self {
            name: config.name.clone(),
            guard,
            resolver,
            dispatcher,
            store,
            console,
        }
    }

    /// Process utterances until end of input or an exit keyword
    pub async fn run(&mut self) -> ExitReason {
        info!(name = %self.name, state = %self.guard.state(), "assistant initialized");

        loop {
            let Some(utterance) = self.console.next_utterance().await else {
                info!("end of input, shutting down");
                return ExitReason::EndOfInput;
            };

            if self.handle_utterance(&utterance).await == Turn::Exit {
                info!("exit command received");
                return ExitReason::ExitCommand;
            }
        }
    }

    /// Run one full turn for `utterance`
    pub async fn handle_utterance(&mut self, utterance: &str) -> Turn {
        let text = utterance.trim();
        if text.is_empty() {
            return Turn::Skipped;
        }

        if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
            return Turn::Exit;
        }

        if self.guard.is_locked() {
            self.handle_locked(text).await;
            return Turn::Locked;
        }

        self.guard.refresh_session();
        let intent = self
            .resolver
            .resolve(text, &self.store.context_value())
            .await;
        debug!(intent = %intent.name, "intent resolved");

        if intent.name == "lock" {
            self.guard.lock();
            self.respond(LOCK_CONFIRMATION).await;
            self.complete_turn(text, LOCK_CONFIRMATION, true);
            return Turn::Completed;
        }

        let outcome = self
            .dispatcher
            .dispatch(&intent.name, &intent.parameters)
            .await;
        let reply = intent.suggested_reply.unwrap_or(outcome.message);

        self.respond(&reply).await;
        self.complete_turn(text, &reply, outcome.success);
        Turn::Completed
    }

    /// Only authentication commands are honoured while locked
    async fn handle_locked(&mut self, text: &str) {
        if has_prefix_ignore_case(text, PASSWORD_PREFIX) {
            let secret = if self.guard.password_configured() {
                let prompt = format!("Enter {} password", self.name);
                match self.console.read_secret(&prompt).await {
                    Ok(secret) => secret,
                    Err(e) => {
                        warn!(error = %e, "password entry failed");
                        self.respond(SECRET_CANCELLED).await;
                        return;
                    }
                }
            } else {
                String::new()
            };

            let result = self.guard.authenticate_password(&secret);
            self.respond(&result.message).await;
            return;
        }

        if has_prefix_ignore_case(text, VOICE_PREFIX) {
            let result = self.guard.authenticate_voice(&text[VOICE_PREFIX.len()..]);
            self.respond(&result.message).await;
            return;
        }

        self.respond(LOCKED_PROMPT).await;
    }

    async fn respond(&mut self, text: &str) {
        info!(reply = %text, "responding");
        self.console.respond(&self.name, text).await;
    }

    fn complete_turn(&mut self, text: &str, reply: &str, success: bool) {
        self.store.record(text, reply, success);
        if let Err(e) = self.store.persist() {
            warn!(error = %e, "failed to persist context");
        }
    }
}
