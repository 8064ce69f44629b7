//! Flutter-facing bindings for the Libraroom shell core.

pub mod api;
