//! Application shell facade.
//!
//! # Responsibility
//! - Compose session, navigation and connectivity into one owner.
//! - Run the probe only while the workspace screen is shown.
//!
//! # Invariants
//! - The screen is derived, never stored.
//! - Connectivity results never change started/session/tab state.
//! - Every command leaves the probe schedule consistent with the screen.

use crate::config::{ConfigError, ShellConfig};
use crate::connectivity::{sync_label, ConnectivityCheck, ConnectivityProber};
use crate::model::screen::{PanelMount, Screen};
use crate::model::tab::ActiveTab;
use crate::model::user::{LoginRequest, User};
use crate::service::navigation_service::NavigationController;
use crate::service::session_service::{SessionError, SessionManager};
use crate::store::{KeyValueStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ShellResult<T> = Result<T, ShellError>;

/// Shell command errors.
#[derive(Debug)]
pub enum ShellError {
    Config(ConfigError),
    Session(SessionError),
    Store(StoreError),
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Session(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ShellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Session(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ShellError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<SessionError> for ShellError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<StoreError> for ShellError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Read-only view of shell state for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSnapshot {
    pub screen: Screen,
    pub started: bool,
    pub user: Option<User>,
    pub active_tab: ActiveTab,
    /// Present only on the workspace screen.
    pub panel: Option<PanelMount>,
    pub connected: bool,
    pub sync_label: &'static str,
}

/// Single owner of session, navigation and connectivity state.
pub struct AppShell<S: KeyValueStore + Clone> {
    session: SessionManager<S>,
    navigation: NavigationController<S>,
    prober: ConnectivityProber,
}

impl<S: KeyValueStore + Clone> AppShell<S> {
    /// Hydrates from `store` and computes the initial screen once.
    ///
    /// Starts the probe right away when a restored session lands on the
    /// workspace.
    ///
    /// # Errors
    /// - `Config` when `config` fails validation; nothing is read or started.
    pub fn open(
        store: S,
        check: impl ConnectivityCheck + 'static,
        config: &ShellConfig,
    ) -> ShellResult<Self> {
        config.validate()?;
        let keys = config.storage_keys();
        let mut session = SessionManager::new(store.clone(), &keys);
        session.restore();
        let navigation = NavigationController::hydrate(store, &keys);
        let prober = ConnectivityProber::new(check, config.probe_interval());

        let mut shell = Self {
            session,
            navigation,
            prober,
        };
        shell.reconcile_probe();
        info!(
            "event=shell_open module=shell status=ok screen={} tab={}",
            shell.screen().as_str(),
            shell.active_tab()
        );
        Ok(shell)
    }

    pub fn screen(&self) -> Screen {
        self.navigation.screen(self.session.has_session())
    }

    pub fn user(&self) -> Option<&User> {
        self.session.current()
    }

    pub fn started(&self) -> bool {
        self.navigation.started()
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.navigation.active_tab()
    }

    /// Panel to mount, only while the workspace is shown.
    pub fn active_panel(&self) -> Option<PanelMount> {
        if self.screen() != Screen::Workspace {
            return None;
        }
        self.session
            .current()
            .map(|user| PanelMount::for_tab(self.active_tab(), user))
    }

    pub fn is_connected(&self) -> bool {
        self.prober.is_connected()
    }

    pub fn sync_label(&self) -> &'static str {
        sync_label(self.is_connected())
    }

    pub fn is_probing(&self) -> bool {
        self.prober.is_running()
    }

    pub fn snapshot(&self) -> ShellSnapshot {
        let connected = self.is_connected();
        ShellSnapshot {
            screen: self.screen(),
            started: self.started(),
            user: self.user().cloned(),
            active_tab: self.active_tab(),
            panel: self.active_panel(),
            connected,
            sync_label: sync_label(connected),
        }
    }

    /// Dismisses the landing screen.
    pub fn start(&mut self) -> ShellResult<()> {
        let outcome = self.navigation.start();
        self.reconcile_probe();
        Ok(outcome?)
    }

    /// Leaves authentication for the landing screen.
    pub fn back_to_landing(&mut self) -> ShellResult<()> {
        let outcome = self.navigation.back_to_landing();
        self.reconcile_probe();
        Ok(outcome?)
    }

    /// Signs in; returns the sanitized user.
    pub fn login(&mut self, candidate: LoginRequest) -> ShellResult<User> {
        let outcome = self.session.login(candidate);
        self.reconcile_probe();
        Ok(outcome?)
    }

    /// Signs out. The started flag is kept, so authentication shows next.
    pub fn logout(&mut self) -> ShellResult<()> {
        let outcome = self.session.logout();
        self.reconcile_probe();
        Ok(outcome?)
    }

    pub fn select_tab(&mut self, tab: ActiveTab) -> ShellResult<()> {
        Ok(self.navigation.select_tab(tab)?)
    }

    pub fn select_tab_id(&mut self, tab_id: &str) -> ShellResult<ActiveTab> {
        Ok(self.navigation.select_tab_id(tab_id)?)
    }

    pub fn go_home(&mut self) -> ShellResult<()> {
        Ok(self.navigation.go_home()?)
    }

    /// Runs one connectivity check now instead of waiting for the next tick.
    pub fn refresh_connectivity(&self) {
        self.prober.check_now();
    }

    /// Stops background work. The shell stays usable; the probe restarts on
    /// the next command that lands on the workspace.
    pub fn shutdown(&mut self) {
        self.prober.stop();
    }

    fn reconcile_probe(&mut self) {
        let in_workspace = self.screen() == Screen::Workspace;
        match (in_workspace, self.prober.is_running()) {
            (true, false) => self.prober.start(),
            (false, true) => self.prober.stop(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppShell, ShellError};
    use crate::config::{ConfigError, ShellConfig};
    use crate::connectivity::FlagConnectivity;
    use crate::model::screen::{PanelMount, Screen};
    use crate::model::tab::ActiveTab;
    use crate::model::user::LoginRequest;
    use crate::store::MemoryKeyValueStore;

    fn open(store: &MemoryKeyValueStore, flag: &FlagConnectivity) -> AppShell<MemoryKeyValueStore> {
        AppShell::open(store.clone(), flag.clone(), &ShellConfig::default()).unwrap()
    }

    #[test]
    fn open_rejects_zero_probe_interval() {
        let store = MemoryKeyValueStore::new();
        let config = ShellConfig {
            probe_interval_ms: 0,
            ..ShellConfig::default()
        };

        let result = AppShell::open(store.clone(), FlagConnectivity::new(true), &config);
        assert!(matches!(
            result,
            Err(ShellError::Config(ConfigError::ZeroProbeInterval))
        ));
        assert!(store.keys().is_empty());
    }

    #[test]
    fn probe_runs_only_in_workspace() {
        let store = MemoryKeyValueStore::new();
        let flag = FlagConnectivity::new(true);
        let mut shell = open(&store, &flag);
        assert!(!shell.is_probing());
        assert!(!shell.is_connected());

        shell.start().unwrap();
        assert!(!shell.is_probing());

        shell
            .login(LoginRequest::new("a@b.com", "A", "A"))
            .unwrap();
        assert!(shell.is_probing());
        assert!(shell.is_connected());
        assert_eq!(shell.sync_label(), "Cloud Synced");

        shell.logout().unwrap();
        assert!(!shell.is_probing());
    }

    #[test]
    fn restored_session_starts_probe_on_open() {
        let store = MemoryKeyValueStore::new();
        let flag = FlagConnectivity::new(false);
        open(&store, &flag)
            .login(LoginRequest::new("a@b.com", "A", "A"))
            .unwrap();

        let mut reloaded = open(&store, &flag);
        assert_eq!(reloaded.screen(), Screen::Workspace);
        assert!(reloaded.is_probing());

        reloaded.shutdown();
        assert!(!reloaded.is_probing());
    }

    #[test]
    fn active_panel_is_scoped_to_workspace() {
        let store = MemoryKeyValueStore::new();
        let flag = FlagConnectivity::default();
        let mut shell = open(&store, &flag);
        shell.select_tab(ActiveTab::Tasks).unwrap();
        assert_eq!(shell.active_panel(), None);

        shell
            .login(LoginRequest::new("a@b.com", "A", "A"))
            .unwrap();
        assert_eq!(
            shell.active_panel(),
            Some(PanelMount::Tasks {
                user_email: "a@b.com".to_string()
            })
        );
    }

    #[test]
    fn connectivity_never_changes_navigation_state() {
        let store = MemoryKeyValueStore::new();
        let flag = FlagConnectivity::new(false);
        let mut shell = open(&store, &flag);
        shell.start().unwrap();
        shell
            .login(LoginRequest::new("a@b.com", "A", "A"))
            .unwrap();
        shell.select_tab(ActiveTab::Music).unwrap();
        let before = shell.snapshot();

        flag.set(true);
        shell.refresh_connectivity();
        let after = shell.snapshot();

        assert!(after.connected);
        assert_eq!(after.screen, before.screen);
        assert_eq!(after.started, before.started);
        assert_eq!(after.user, before.user);
        assert_eq!(after.active_tab, before.active_tab);
        assert_eq!(after.panel, before.panel);
    }
}
