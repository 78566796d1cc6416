//! Persistence of interaction context and preferences

mod context;
mod document;

pub use context::ContextStore;

#[cfg(test)]
pub use context::MAX_HISTORY;
