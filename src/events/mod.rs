//! Events module for session transitions
//!
//! Provides structured event types for unlock, lock and failed
//! authentication, published by the session guard.

use serde::{Deserialize, Serialize};

/// How the user tried to authenticate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    Password,
    Voice,
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMethod::Password => write!(f, "password"),
            AuthMethod::Voice => write!(f, "voice"),
        }
    }
}

/// Why a session went back to locked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockReason {
    /// User asked for it
    Explicit,
    /// Inactivity timeout elapsed
    Expired,
}

/// Events emitted by the session guard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Authentication succeeded, session is now unlocked
    Unlocked { method: AuthMethod },

    /// Session returned to the locked state
    Locked {
        reason: LockReason,
        /// Milliseconds the session had been unlocked
        duration_ms: u64,
    },

    /// Authentication attempt was rejected or not possible
    AuthenticationFailed { method: AuthMethod },
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEvent::Unlocked { method } => write!(f, "UNLOCKED ({})", method),
            SessionEvent::Locked {
                reason: LockReason::Explicit,
                duration_ms,
            } => write!(f, "LOCKED ({}ms)", duration_ms),
            SessionEvent::Locked {
                reason: LockReason::Expired,
                duration_ms,
            } => write!(f, "EXPIRED ({}ms)", duration_ms),
            SessionEvent::AuthenticationFailed { method } => {
                write!(f, "AUTHENTICATION_FAILED ({})", method)
            }
        }
    }
}
