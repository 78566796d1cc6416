//! Core session state machine implementation
//!
//! Handles transitions between Locked and Unlocked based on
//! authentication attempts, explicit lock commands and inactivity expiry.

use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::events::{AuthMethod, LockReason, SessionEvent};

/// The two possible states of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No authenticated user; only authentication commands are accepted
    #[default]
    Locked,
    /// Authenticated; commands are resolved and dispatched
    Unlocked,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Locked => write!(f, "Locked"),
            SessionState::Unlocked => write!(f, "Unlocked"),
        }
    }
}

/// Outcome of an authentication attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub success: bool,
    pub message: String,
}

impl AuthResult {
    fn granted(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    fn denied(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

/// Secrets the guard checks against, fixed for the process lifetime
#[derive(Clone, Default)]
pub struct Credentials {
    /// Lowercase hex SHA-256 of the password (empty = disabled)
    pub password_hash: String,
    /// Spoken unlock phrase (empty = disabled)
    pub voice_passphrase: String,
}

/// Lowercase hex SHA-256 digest of a password
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// Tracks whether the user is authenticated and for how long
pub struct SessionGuard {
    credentials: Credentials,
    timeout: Duration,
    /// Set while unlocked; refreshed by every authorized interaction
    unlocked_at: Option<Instant>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionGuard {
    /// Create a new guard in the Locked state
    pub fn new(
        credentials: Credentials,
        timeout_secs: u64,
        event_tx: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            credentials,
            timeout: Duration::from_secs(timeout_secs),
            unlocked_at: None,
            event_tx,
        }
    }

    /// Current state, applying expiry first
    pub fn state(&mut self) -> SessionState {
        if self.is_locked() {
            SessionState::Locked
        } else {
            SessionState::Unlocked
        }
    }

    /// Whether a password hash is configured at all
    pub fn password_configured(&self) -> bool {
        !self.credentials.password_hash.is_empty()
    }

    pub fn is_locked(&mut self) -> bool {
        self.is_locked_at(Instant::now())
    }

    /// Expiry-aware lock check; an expired session is locked as a side effect
    pub fn is_locked_at(&mut self, now: Instant) -> bool {
        let Some(unlocked_at) = self.unlocked_at else {
            return true;
        };

        let elapsed = now.saturating_duration_since(unlocked_at);
        if elapsed > self.timeout {
            info!(
                elapsed_secs = elapsed.as_secs(),
                timeout_secs = self.timeout.as_secs(),
                "session expired"
            );
            self.transition_to_locked(LockReason::Expired, elapsed);
            return true;
        }

        false
    }

    /// Force the Locked state unconditionally
    pub fn lock(&mut self) {
        match self.unlocked_at {
            Some(unlocked_at) => {
                let elapsed = Instant::now().saturating_duration_since(unlocked_at);
                self.transition_to_locked(LockReason::Explicit, elapsed);
            }
            None => debug!("lock requested while already locked"),
        }
    }

    pub fn authenticate_password(&mut self, provided: &str) -> AuthResult {
        self.authenticate_password_at(provided, Instant::now())
    }

    pub fn authenticate_password_at(&mut self, provided: &str, now: Instant) -> AuthResult {
        if !self.password_configured() {
            self.emit(SessionEvent::AuthenticationFailed {
                method: AuthMethod::Password,
            });
            return AuthResult::denied("Password hash not configured.");
        }

        if hash_password(provided) == self.credentials.password_hash {
            self.transition_to_unlocked(AuthMethod::Password, now);
            AuthResult::granted("Authentication successful.")
        } else {
            self.emit(SessionEvent::AuthenticationFailed {
                method: AuthMethod::Password,
            });
            AuthResult::denied("Invalid password.")
        }
    }

    pub fn authenticate_voice(&mut self, phrase: &str) -> AuthResult {
        self.authenticate_voice_at(phrase, Instant::now())
    }

    pub fn authenticate_voice_at(&mut self, phrase: &str, now: Instant) -> AuthResult {
        let expected = self.credentials.voice_passphrase.trim();
        if expected.is_empty() {
            self.emit(SessionEvent::AuthenticationFailed {
                method: AuthMethod::Voice,
            });
            return AuthResult::denied("Voice passphrase not configured.");
        }

        if phrase.trim().to_lowercase() == expected.to_lowercase() {
            self.transition_to_unlocked(AuthMethod::Voice, now);
            AuthResult::granted("Voice authentication successful.")
        } else {
            self.emit(SessionEvent::AuthenticationFailed {
                method: AuthMethod::Voice,
            });
            AuthResult::denied("Voice authentication failed.")
        }
    }

    pub fn refresh_session(&mut self) {
        self.refresh_session_at(Instant::now());
    }

    /// Slide the expiry window forward; never revives an expired session
    pub fn refresh_session_at(&mut self, now: Instant) {
        if !self.is_locked_at(now) {
            self.unlocked_at = Some(now);
        }
    }

    fn transition_to_unlocked(&mut self, method: AuthMethod, now: Instant) {
        info!(from = %SessionState::Locked, to = %SessionState::Unlocked, %method, "session transition");
        self.unlocked_at = Some(now);
        self.emit(SessionEvent::Unlocked { method });
    }

    fn transition_to_locked(&mut self, reason: LockReason, elapsed: Duration) {
        info!(
            from = %SessionState::Unlocked,
            to = %SessionState::Locked,
            ?reason,
            "session transition"
        );
        self.unlocked_at = None;
        self.emit(SessionEvent::Locked {
            reason,
            duration_ms: elapsed.as_millis() as u64,
        });
    }

    fn emit(&self, event: SessionEvent) {
        debug!(?event, "emitting session event");
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "correct horse";

    fn create_guard(
        password: &str,
        passphrase: &str,
        timeout_secs: u64,
    ) -> (SessionGuard, broadcast::Receiver<SessionEvent>) {
        let (tx, rx) = broadcast::channel(16);
        let credentials = Credentials {
            password_hash: if password.is_empty() {
                String::new()
            } else {
                hash_password(password)
            },
            voice_passphrase: passphrase.to_string(),
        };
        (SessionGuard::new(credentials, timeout_secs, tx), rx)
    }

    #[test]
    fn test_initial_state_is_locked() {
        let (mut guard, _) = create_guard(PASSWORD, "", 300);
        assert!(guard.is_locked());
        assert_eq!(guard.state(), SessionState::Locked);
    }

    #[test]
    fn test_hash_password_known_value() {
        assert_eq!(
            hash_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_password_unlocks() {
        let (mut guard, mut rx) = create_guard(PASSWORD, "", 300);
        let result = guard.authenticate_password(PASSWORD);
        assert!(result.success);
        assert_eq!(result.message, "Authentication successful.");
        assert!(!guard.is_locked());
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::Unlocked {
                method: AuthMethod::Password
            }
        );
    }

    #[test]
    fn test_wrong_password_stays_locked() {
        let (mut guard, mut rx) = create_guard(PASSWORD, "", 300);
        for attempt in ["", "Correct Horse", "correct horse ", "letmein"] {
            let result = guard.authenticate_password(attempt);
            assert!(!result.success);
            assert_eq!(result.message, "Invalid password.");
            assert!(guard.is_locked());
        }
        assert!(matches!(
            rx.try_recv().unwrap(),
            SessionEvent::AuthenticationFailed { .. }
        ));
    }

    #[test]
    fn test_unconfigured_password_always_fails() {
        let (mut guard, _) = create_guard("", "", 300);
        assert!(!guard.password_configured());
        for attempt in ["", "anything", "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"] {
            let result = guard.authenticate_password(attempt);
            assert!(!result.success);
            assert_eq!(result.message, "Password hash not configured.");
            assert!(guard.is_locked());
        }
    }

    #[test]
    fn test_voice_is_trimmed_and_case_insensitive() {
        let (mut guard, _) = create_guard("", "  Open Sesame ", 300);
        let result = guard.authenticate_voice("open SESAME  ");
        assert!(result.success);
        assert_eq!(result.message, "Voice authentication successful.");
        assert!(!guard.is_locked());
    }

    #[test]
    fn test_wrong_voice_stays_locked() {
        let (mut guard, _) = create_guard("", "open sesame", 300);
        let result = guard.authenticate_voice("open barley");
        assert!(!result.success);
        assert_eq!(result.message, "Voice authentication failed.");
        assert!(guard.is_locked());
    }

    #[test]
    fn test_unconfigured_voice_is_not_auto_accept() {
        let (mut guard, _) = create_guard("", "   ", 300);
        for attempt in ["", "   ", "anything"] {
            let result = guard.authenticate_voice(attempt);
            assert!(!result.success);
            assert_eq!(result.message, "Voice passphrase not configured.");
            assert!(guard.is_locked());
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let (mut guard, mut rx) = create_guard(PASSWORD, "", 10);
        let start = Instant::now();
        assert!(guard.authenticate_password_at(PASSWORD, start).success);
        let _ = rx.try_recv();

        // Exactly at the timeout the session is still valid
        assert!(!guard.is_locked_at(start + Duration::from_secs(10)));
        assert!(guard.is_locked_at(start + Duration::from_millis(10_001)));

        match rx.try_recv().unwrap() {
            SessionEvent::Locked { reason, .. } => assert_eq!(reason, LockReason::Expired),
            other => panic!("unexpected event {other:?}"),
        }

        // Expiry cleared the unlock time for good
        assert!(guard.is_locked_at(start));
    }

    #[test]
    fn test_zero_timeout_expires_on_any_elapsed_time() {
        let (mut guard, _) = create_guard(PASSWORD, "", 0);
        let start = Instant::now();
        guard.authenticate_password_at(PASSWORD, start);
        assert!(!guard.is_locked_at(start));
        assert!(guard.is_locked_at(start + Duration::from_millis(1)));
    }

    #[test]
    fn test_refresh_slides_expiry() {
        let (mut guard, _) = create_guard(PASSWORD, "", 10);
        let start = Instant::now();
        guard.authenticate_password_at(PASSWORD, start);

        guard.refresh_session_at(start + Duration::from_secs(8));
        assert!(!guard.is_locked_at(start + Duration::from_secs(16)));
        assert!(guard.is_locked_at(start + Duration::from_secs(19)));
    }

    #[test]
    fn test_refresh_does_not_revive_expired_session() {
        let (mut guard, _) = create_guard(PASSWORD, "", 10);
        let start = Instant::now();
        guard.authenticate_password_at(PASSWORD, start);

        let late = start + Duration::from_secs(30);
        guard.refresh_session_at(late);
        assert!(guard.is_locked_at(late));
    }

    #[test]
    fn test_refresh_while_locked_is_noop() {
        let (mut guard, _) = create_guard(PASSWORD, "", 10);
        guard.refresh_session();
        assert!(guard.is_locked());
    }

    #[test]
    fn test_explicit_lock() {
        let (mut guard, mut rx) = create_guard("", "open sesame", 300);
        guard.authenticate_voice("open sesame");
        let _ = rx.try_recv();

        guard.lock();
        assert!(guard.is_locked());
        match rx.try_recv().unwrap() {
            SessionEvent::Locked { reason, .. } => assert_eq!(reason, LockReason::Explicit),
            other => panic!("unexpected event {other:?}"),
        }

        // Locking twice emits nothing
        guard.lock();
        assert!(rx.try_recv().is_err());
    }
}
