//! Request identity boundary.
//!
//! `SessionGate` is the sole trust gate of the application. Whatever user id
//! it yields is passed through the service and repositories without any
//! re-verification; a compromised gate means a compromised journal.

use moodjournal_core::UserId;

/// Path unauthenticated requests are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Supplies the authenticated user for the current request.
pub trait SessionGate {
    /// Returns the user id, or `None` when the request is not authenticated.
    fn require_user_id(&self) -> Option<UserId>;
}

/// Gate with a fixed answer, for tooling that authenticates out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticSession(Option<UserId>);

impl StaticSession {
    pub fn user(user_id: UserId) -> Self {
        Self(Some(user_id))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl SessionGate for StaticSession {
    fn require_user_id(&self) -> Option<UserId> {
        self.0
    }
}
