//! FFI shell API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the shell's commands as stable, use-case-level functions to Dart.
//! - Keep one process-wide shell instance behind a mutex.
//!
//! # Invariants
//! - Exported functions do not panic across the FFI boundary.
//! - Every command response carries the post-command snapshot when a shell
//!   is open, even if persisting the change failed.
//! - Passwords never appear in responses or log lines.

use libraroom_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ActiveTab, AppShell, FlagConnectivity, LoginRequest, ShellConfig, ShellSnapshot,
    SqliteKeyValueStore,
};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

const SHELL_DB_FILE_NAME: &str = "libraroom_shell.sqlite3";
const SHELL_DB_PATH_ENV: &str = "LIBRAROOM_DB_PATH";

type FfiStore = Arc<SqliteKeyValueStore>;

struct OpenShell {
    db_path: PathBuf,
    shell: AppShell<FfiStore>,
}

static SHELL: Mutex<Option<OpenShell>> = Mutex::new(None);
static CLOUD_FLAG: OnceLock<FlagConnectivity> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Navigation entry rendered by the sidebar/bottom bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    /// Stable tab id passed back to `shell_select_tab`.
    pub id: String,
    pub label: String,
}

/// Flattened shell state for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSnapshotResponse {
    /// `landing|authentication|workspace`.
    pub screen: String,
    pub started: bool,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub user_nickname: Option<String>,
    /// Badge initial derived from the nickname.
    pub user_initial: Option<String>,
    /// Stable tab id; always set, even outside the workspace.
    pub active_tab: String,
    pub connected: bool,
    /// `Cloud Synced` or `Local Workspace`.
    pub sync_label: String,
}

impl From<ShellSnapshot> for ShellSnapshotResponse {
    fn from(value: ShellSnapshot) -> Self {
        let user = value.user;
        Self {
            screen: value.screen.as_str().to_string(),
            started: value.started,
            user_initial: user.as_ref().map(|user| user.initial().to_string()),
            user_email: user.as_ref().map(|user| user.email.clone()),
            user_name: user.as_ref().map(|user| user.name.clone()),
            user_nickname: user.map(|user| user.nickname),
            active_tab: value.active_tab.as_str().to_string(),
            connected: value.connected,
            sync_label: value.sync_label.to_string(),
        }
    }
}

/// Command response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellActionResponse {
    /// Whether the command fully succeeded.
    pub ok: bool,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
    /// Post-command state; `None` only when no shell is open.
    pub snapshot: Option<ShellSnapshotResponse>,
}

impl ShellActionResponse {
    fn success(message: impl Into<String>, snapshot: ShellSnapshotResponse) -> Self {
        Self {
            ok: true,
            message: message.into(),
            snapshot: Some(snapshot),
        }
    }

    fn failure(message: impl Into<String>, snapshot: Option<ShellSnapshotResponse>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            snapshot,
        }
    }
}

/// Returns the navigation entries in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn nav_items() -> Vec<NavItem> {
    ActiveTab::nav_tabs()
        .iter()
        .map(|tab| NavItem {
            id: tab.as_str().to_string(),
            label: tab.label().to_string(),
        })
        .collect()
}

/// Opens (or reuses) the process-wide shell.
///
/// `db_path` falls back to `LIBRAROOM_DB_PATH`, then a temp-dir file.
/// Opening a different path replaces the current shell and stops its probe.
/// When the new store fails to open, the current shell stays in place.
///
/// # FFI contract
/// - Sync call; opens SQLite and hydrates state.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_open(db_path: Option<String>) -> ShellActionResponse {
    let db_path = resolve_shell_db_path(db_path);
    let mut guard = lock_shell();

    if let Some(open) = guard.as_ref() {
        if open.db_path == db_path {
            return ShellActionResponse::success("Shell already open.", open.shell.snapshot().into());
        }
    }

    let store = match SqliteKeyValueStore::open(&db_path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            warn!("event=ffi_shell_open module=ffi status=error error={err}");
            let current = guard.as_ref().map(|open| open.shell.snapshot().into());
            return ShellActionResponse::failure(format!("shell_open failed: {err}"), current);
        }
    };
    // Stop the previous probe before the new shell starts its own.
    guard.take();
    let shell = match AppShell::open(store, cloud_flag().clone(), &ShellConfig::default()) {
        Ok(shell) => shell,
        Err(err) => {
            warn!("event=ffi_shell_open module=ffi status=error error={err}");
            return ShellActionResponse::failure(format!("shell_open failed: {err}"), None);
        }
    };
    let snapshot: ShellSnapshotResponse = shell.snapshot().into();
    info!("event=ffi_shell_open module=ffi status=ok");
    *guard = Some(OpenShell { db_path, shell });
    ShellActionResponse::success("Shell opened.", snapshot)
}

/// Closes the shell and stops background polling.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_close() -> bool {
    lock_shell().take().is_some()
}

/// Returns current shell state.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_snapshot() -> ShellActionResponse {
    with_shell("shell_snapshot", |_| Ok("Snapshot.".to_string()))
}

/// Landing screen "start" action.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_start() -> ShellActionResponse {
    with_shell("shell_start", |shell| {
        shell.start().map_err(|err| err.to_string())?;
        Ok("Started.".to_string())
    })
}

/// Authentication screen "back" action.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_back() -> ShellActionResponse {
    with_shell("shell_back", |shell| {
        shell.back_to_landing().map_err(|err| err.to_string())?;
        Ok("Back to landing.".to_string())
    })
}

/// Signs in with what the authentication form collected.
///
/// The password is dropped by the core before anything is stored.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_login(
    email: String,
    name: String,
    nickname: String,
    password: Option<String>,
) -> ShellActionResponse {
    let mut request = LoginRequest::new(email, name, nickname);
    request.password = password;
    with_shell("shell_login", move |shell| {
        shell.login(request).map_err(|err| err.to_string())?;
        Ok("Signed in.".to_string())
    })
}

/// Signs out; the next screen is authentication.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_logout() -> ShellActionResponse {
    with_shell("shell_logout", |shell| {
        shell.logout().map_err(|err| err.to_string())?;
        Ok("Signed out.".to_string())
    })
}

/// Selects a workspace tab by stable id; unknown ids select the timer.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_select_tab(tab_id: String) -> ShellActionResponse {
    with_shell("shell_select_tab", |shell| {
        let tab = shell
            .select_tab_id(tab_id.as_str())
            .map_err(|err| err.to_string())?;
        Ok(format!("Tab {tab} selected."))
    })
}

/// Logo click / profile back: returns to the focus timer.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_go_home() -> ShellActionResponse {
    with_shell("shell_go_home", |shell| {
        shell.go_home().map_err(|err| err.to_string())?;
        Ok("Home.".to_string())
    })
}

/// Service-layer hook: records whether the remote store is reachable.
///
/// The shell picks the value up on its next probe tick.
#[flutter_rust_bridge::frb(sync)]
pub fn report_cloud_connected(connected: bool) {
    cloud_flag().set(connected);
}

fn with_shell(
    op: &str,
    f: impl FnOnce(&mut AppShell<FfiStore>) -> Result<String, String>,
) -> ShellActionResponse {
    let mut guard = lock_shell();
    let Some(open) = guard.as_mut() else {
        return ShellActionResponse::failure(format!("{op} failed: shell is not open"), None);
    };

    let outcome = f(&mut open.shell);
    let snapshot: ShellSnapshotResponse = open.shell.snapshot().into();
    match outcome {
        Ok(message) => ShellActionResponse::success(message, snapshot),
        Err(err) => {
            warn!("event=ffi_command module=ffi status=error op={op} error={err}");
            ShellActionResponse::failure(format!("{op} failed: {err}"), Some(snapshot))
        }
    }
}

fn lock_shell() -> MutexGuard<'static, Option<OpenShell>> {
    SHELL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn cloud_flag() -> &'static FlagConnectivity {
    CLOUD_FLAG.get_or_init(FlagConnectivity::default)
}

fn resolve_shell_db_path(explicit: Option<String>) -> PathBuf {
    let from_env = || std::env::var(SHELL_DB_PATH_ENV).ok();
    explicit
        .into_iter()
        .chain(from_env())
        .map(|raw| raw.trim().to_string())
        .find(|raw| !raw.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(SHELL_DB_FILE_NAME))
}
