//! Journal domain model.
//!
//! # Responsibility
//! - Define the records exchanged between repositories, services and the
//!   route layer.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Timestamps are Unix epoch milliseconds (UTC).

pub mod entry;
pub mod mood;
pub mod user;

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
