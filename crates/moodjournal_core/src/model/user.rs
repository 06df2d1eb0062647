//! User identity as seen by the journal core.
//!
//! Users are owned by the external auth subsystem; the core only carries the
//! identifier it is handed.

use uuid::Uuid;

/// Identifier of the principal that owns entries.
pub type UserId = Uuid;
