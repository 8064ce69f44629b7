//! Session and navigation owners.
//!
//! # Responsibility
//! - Hold the session and navigation state behind explicit commands.
//! - Keep UI/FFI layers decoupled from store details.

pub mod navigation_service;
pub mod session_service;
