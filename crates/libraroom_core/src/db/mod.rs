//! SQLite file behind `SqliteKeyValueStore`.
//!
//! The shell keeps three string entries (started flag, session user, last
//! tab) in one `kv_entries` table. This module opens that file and brings
//! its layout up to date; the key-value semantics live in `store`.
//!
//! # Invariants
//! - The layout revision is `PRAGMA user_version`.
//! - `kv_entries` exists on every connection handed to the store.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open or lay out the key-value file.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a build with a newer `kv_entries` layout.
    /// It is left untouched so that build can still read it.
    StoreFromNewerBuild { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "key-value store sqlite error: {err}"),
            Self::StoreFromNewerBuild { found, supported } => write!(
                f,
                "key-value store layout v{found} was written by a newer build (this build reads up to v{supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::StoreFromNewerBuild { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
