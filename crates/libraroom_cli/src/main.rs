//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `libraroom_core` linkage without the Flutter/FFI runtime.
//! - Optionally print the screen a store file would hydrate to.
//!
//! Usage: `libraroom_cli [STORE_DB_PATH]`

use libraroom_core::{AppShell, ShellConfig, SqliteKeyValueStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("libraroom_core ping={}", libraroom_core::ping());
    println!("libraroom_core version={}", libraroom_core::core_version());

    let Some(path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let store = match SqliteKeyValueStore::open(&path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open store `{path}`: {err}");
            return ExitCode::FAILURE;
        }
    };

    // The probe is not exercised here; report the shell as offline.
    let mut shell = match AppShell::open(&store, || false, &ShellConfig::default()) {
        Ok(shell) => shell,
        Err(err) => {
            eprintln!("failed to open shell: {err}");
            return ExitCode::FAILURE;
        }
    };
    let snapshot = shell.snapshot();
    println!("screen={}", snapshot.screen.as_str());
    println!("started={}", snapshot.started);
    println!("signed_in={}", snapshot.user.is_some());
    println!("active_tab={}", snapshot.active_tab);
    println!(
        "panel={}",
        snapshot.panel.as_ref().map_or("none", |panel| panel.tab().as_str())
    );
    shell.shutdown();
    ExitCode::SUCCESS
}
