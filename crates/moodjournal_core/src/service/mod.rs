//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own policy decisions the repositories leave open (update ownership).
//! - Emit one structured log event per use-case call.

pub mod entry_service;
