use libraroom_core::{
    ActiveTab, AppShell, FlagConnectivity, KeyValueStore, LoginRequest, PanelMount, Screen,
    ShellConfig, SqliteKeyValueStore, User,
};
use std::path::Path;
use std::sync::Arc;

type Store = Arc<SqliteKeyValueStore>;

fn open_shell(path: &Path, flag: &FlagConnectivity) -> (Store, AppShell<Store>) {
    let store = Arc::new(SqliteKeyValueStore::open(path).unwrap());
    let shell = AppShell::open(Arc::clone(&store), flag.clone(), &ShellConfig::default()).unwrap();
    (store, shell)
}

#[test]
fn full_session_scenario_survives_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("libraroom.db");
    let flag = FlagConnectivity::new(false);

    let (store, mut shell) = open_shell(&path, &flag);
    assert_eq!(shell.screen(), Screen::Landing);

    shell.start().unwrap();
    assert_eq!(shell.screen(), Screen::Authentication);
    assert_eq!(store.get("libraroom_started").unwrap().as_deref(), Some("true"));

    let user = shell
        .login(LoginRequest::new("a@b.com", "A", "A").with_password("x"))
        .unwrap();
    assert_eq!(shell.screen(), Screen::Workspace);
    assert_eq!(shell.active_tab(), ActiveTab::Timer);
    assert_eq!(shell.active_panel(), Some(PanelMount::Timer));
    let persisted = store.get("libraroom_user").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&persisted).unwrap();
    assert!(json.get("password").is_none());

    shell.select_tab(ActiveTab::Ai).unwrap();
    drop(shell);
    drop(store);

    let (store, mut shell) = open_shell(&path, &flag);
    assert_eq!(shell.screen(), Screen::Workspace);
    assert_eq!(shell.active_tab(), ActiveTab::Ai);
    assert_eq!(shell.user(), Some(&user));
    assert_eq!(
        shell.active_panel(),
        Some(PanelMount::AiStudio {
            user_email: "a@b.com".to_string()
        })
    );

    shell.logout().unwrap();
    assert_eq!(shell.screen(), Screen::Authentication);
    assert!(shell.user().is_none());
    assert!(shell.started());
    assert_eq!(store.get("libraroom_user").unwrap(), None);
    assert_eq!(store.get("libraroom_started").unwrap().as_deref(), Some("true"));
}

#[test]
fn back_from_authentication_returns_to_landing_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("libraroom.db");
    let flag = FlagConnectivity::default();

    let (_, mut shell) = open_shell(&path, &flag);
    shell.start().unwrap();
    drop(shell);

    let (_, mut shell) = open_shell(&path, &flag);
    assert_eq!(shell.screen(), Screen::Authentication);
    shell.back_to_landing().unwrap();
    assert_eq!(shell.screen(), Screen::Landing);
    drop(shell);

    let (store, shell) = open_shell(&path, &flag);
    assert_eq!(shell.screen(), Screen::Landing);
    assert_eq!(store.get("libraroom_started").unwrap(), None);
}

#[test]
fn corrupted_persisted_state_degrades_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("libraroom.db");
    {
        let store = SqliteKeyValueStore::open(&path).unwrap();
        store.set("libraroom_started", "true").unwrap();
        store.set("libraroom_user", "{\"email\":").unwrap();
        store.set("libraroom_last_tab", "unknown").unwrap();
    }

    let (_, shell) = open_shell(&path, &FlagConnectivity::default());
    assert_eq!(shell.screen(), Screen::Authentication);
    assert_eq!(shell.active_tab(), ActiveTab::Timer);
    assert!(shell.user().is_none());
}

#[test]
fn login_without_started_flag_still_enters_workspace() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("libraroom.db");

    let (_, mut shell) = open_shell(&path, &FlagConnectivity::default());
    shell
        .login(LoginRequest::new("a@b.com", "A", "A"))
        .unwrap();
    assert!(!shell.started());
    assert_eq!(shell.screen(), Screen::Workspace);
}

#[test]
fn profile_panel_receives_sanitized_user() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("libraroom.db");

    let (_, mut shell) = open_shell(&path, &FlagConnectivity::default());
    shell.start().unwrap();
    shell
        .login(LoginRequest::new("a@b.com", "Ada", "ace").with_password("secret"))
        .unwrap();
    shell.select_tab_id("profile").unwrap();

    let expected = User::new("a@b.com", "Ada", "ace").unwrap();
    assert_eq!(
        shell.active_panel(),
        Some(PanelMount::Profile { user: expected })
    );
    assert_eq!(shell.user().map(User::initial), Some('A'));

    shell.go_home().unwrap();
    assert_eq!(shell.active_panel(), Some(PanelMount::Timer));
}
