//! Session module for access control
//!
//! Provides an explicit state machine with two states:
//! - Locked: Default state, only authentication is accepted
//! - Unlocked: Authenticated, expires after a period of inactivity

mod guard;

pub use guard::{Credentials, SessionGuard};

#[cfg(test)]
pub use guard::hash_password;
