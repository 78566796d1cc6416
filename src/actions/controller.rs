//! Dispatch of intents to registered handlers

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use super::handlers::{self, Handler, HandlerContext};
use super::{ActionDispatcher, ActionOutcome};
use crate::intent::Parameters;

/// Production dispatcher backed by an explicit intent → handler table
pub struct SystemController {
    handlers: HashMap<&'static str, Handler>,
    context: Arc<HandlerContext>,
}

impl SystemController {
    /// Create a controller with every built-in handler registered
    pub fn new(search_root: PathBuf) -> Self {
        let mut controller = Self {
            handlers: HashMap::new(),
            context: Arc::new(HandlerContext {
                platform: std::env::consts::OS,
                search_root,
            }),
        };

        controller.register("open_app", handlers::open_app);
        controller.register("close_app", handlers::close_app);
        controller.register("browse", handlers::browse);
        controller.register("create_file", handlers::create_file);
        controller.register("delete_file", handlers::delete_file);
        controller.register("move_file", handlers::move_file);
        controller.register("copy_file", handlers::copy_file);
        controller.register("search_files", handlers::search_files);
        controller.register("shutdown", handlers::shutdown);
        controller.register("restart", handlers::restart);
        controller.register("lock", handlers::lock);
        controller.register("unknown", handlers::unknown);

        controller
    }

    /// Register or replace the handler for an intent name
    pub fn register(&mut self, intent: &'static str, handler: Handler) {
        self.handlers.insert(intent, handler);
    }
}

#[async_trait]
impl ActionDispatcher for SystemController {
    async fn dispatch(&self, intent: &str, parameters: &Parameters) -> ActionOutcome {
        let Some(&handler) = self.handlers.get(intent) else {
            debug!(intent, "no handler registered");
            return ActionOutcome::failed(format!("No handler for intent '{intent}'."));
        };

        // Handlers touch the filesystem and spawn processes
        let context = Arc::clone(&self.context);
        let parameters = parameters.clone();
        match tokio::task::spawn_blocking(move || handler(&context, &parameters)).await {
            Ok(outcome) => {
                debug!(intent, success = outcome.success, "action finished");
                outcome
            }
            Err(e) => {
                error!(?e, intent, "action handler panicked");
                ActionOutcome::failed(format!("Action '{intent}' failed unexpectedly."))
            }
        }
    }
}
