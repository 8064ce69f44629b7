//! Shell domain model.
//!
//! # Responsibility
//! - Define the user identity exposed to the workspace and its login payload.
//! - Define the closed tab set and the top-level screens.
//!
//! # Invariants
//! - `User` carries no credential fields; passwords exist only on
//!   `LoginRequest`.
//! - `ActiveTab` is always one of the six known tabs.

pub mod screen;
pub mod tab;
pub mod user;
