//! Layout revisions of the `kv_entries` file.
//!
//! Each revision is one SQL script; revision 1 creates the table. Scripts run
//! in one transaction and bump `PRAGMA user_version` as they go.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(revision, script)`, ascending.
const LAYOUTS: &[(u32, &str)] = &[(1, include_str!("0001_kv_entries.sql"))];

/// Newest `kv_entries` layout this build can read and write.
pub fn latest_version() -> u32 {
    LAYOUTS.last().map_or(0, |(revision, _)| *revision)
}

/// Brings the key-value file up to `latest_version`.
///
/// # Errors
/// - `StoreFromNewerBuild` when the file is ahead of this build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::StoreFromNewerBuild { found, supported });
    }
    if found == supported {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (revision, script) in LAYOUTS.iter().skip_while(|(revision, _)| *revision <= found) {
        tx.execute_batch(script)?;
        tx.pragma_update(None, "user_version", revision)?;
    }
    tx.commit()?;
    info!("event=kv_layout_upgrade module=db status=ok from={found} to={supported}");
    Ok(())
}
