//! Authenticated identity for the running process.

use crate::error::TrackerError;

/// Who is logged in, if anyone.
///
/// Owned by the application context and handed to actions through it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    current: Option<String>,
}

impl Session {
    /// A session with nobody logged in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `username` as the authenticated identity.
    pub fn login(&mut self, username: impl Into<String>) {
        self.current = Some(username.into());
    }

    /// Forget the authenticated identity, returning who it was.
    pub fn logout(&mut self) -> Option<String> {
        self.current.take()
    }

    /// Username of the logged-in user.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Whether someone is logged in.
    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Capability check for guarded actions.
    pub fn require(&self) -> Result<&str, TrackerError> {
        self.current().ok_or(TrackerError::NotLoggedIn)
    }
}
