//! Core session/navigation logic for the Libraroom shell.
//! This crate is the single source of truth for which screen is shown,
//! who is signed in and which workspace tab is active.

pub mod config;
pub mod connectivity;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod shell;
pub mod store;

pub use config::{ConfigError, ShellConfig, StorageKeys};
pub use connectivity::{sync_label, ConnectivityCheck, ConnectivityProber, FlagConnectivity};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::screen::{resolve_screen, PanelMount, Screen};
pub use model::tab::{ActiveTab, TabParseError};
pub use model::user::{LoginRequest, User, UserValidationError};
pub use service::navigation_service::NavigationController;
pub use service::session_service::{SessionError, SessionManager, SessionResult};
pub use shell::{AppShell, ShellError, ShellResult, ShellSnapshot};
pub use store::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
