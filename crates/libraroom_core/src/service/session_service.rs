//! Session manager.
//!
//! # Responsibility
//! - Own the single authenticated user for the process.
//! - Mirror the session into the store under the user key.
//!
//! # Invariants
//! - Held and persisted users never carry a password (`User` has no such field).
//! - Corrupt persisted sessions read as "no session"; nothing propagates from
//!   `restore`.
//! - `logout` is idempotent.

use crate::config::StorageKeys;
use crate::model::user::{LoginRequest, User, UserValidationError};
use crate::store::{KeyValueStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

/// Session operation errors.
#[derive(Debug)]
pub enum SessionError {
    InvalidUser(UserValidationError),
    Encode(String),
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUser(err) => write!(f, "{err}"),
            Self::Encode(message) => write!(f, "failed to encode session user: {message}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidUser(err) => Some(err),
            Self::Encode(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<UserValidationError> for SessionError {
    fn from(value: UserValidationError) -> Self {
        Self::InvalidUser(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Owner of the current session.
pub struct SessionManager<S: KeyValueStore> {
    store: S,
    user_key: String,
    current: Option<User>,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Creates a manager with no session; call `restore` to hydrate.
    pub fn new(store: S, keys: &StorageKeys) -> Self {
        Self {
            store,
            user_key: keys.user.clone(),
            current: None,
        }
    }

    /// Loads the persisted session, if any, and makes it current.
    ///
    /// Absent, unparseable or invalid content yields `None`. A record that
    /// still carries a legacy `password` field is accepted without it and
    /// rewritten sanitized.
    pub fn restore(&mut self) -> Option<User> {
        self.current = self.read_persisted();
        self.current.clone()
    }

    /// Starts a session from a login payload.
    ///
    /// # Contract
    /// - The password is dropped before the user is held or persisted.
    /// - The in-memory session is set before the store write; a failed write
    ///   is reported but the session stays active for this run.
    ///
    /// # Errors
    /// - `InvalidUser` when the email is blank (no state changes).
    /// - `Encode`/`Store` when mirroring to the store fails.
    pub fn login(&mut self, candidate: LoginRequest) -> SessionResult<User> {
        let user = candidate.into_user()?;
        self.current = Some(user.clone());

        let encoded =
            serde_json::to_string(&user).map_err(|err| SessionError::Encode(err.to_string()))?;
        if let Err(err) = self.store.set(&self.user_key, &encoded) {
            warn!(
                "event=session_login module=session status=error error_code=persist_failed error={err}"
            );
            return Err(err.into());
        }

        info!("event=session_login module=session status=ok");
        Ok(user)
    }

    /// Ends the session and removes the persisted record.
    ///
    /// The in-memory session is cleared even if the store removal fails.
    pub fn logout(&mut self) -> SessionResult<()> {
        let had_session = self.current.take().is_some();
        self.store.remove(&self.user_key)?;
        info!("event=session_logout module=session status=ok had_session={had_session}");
        Ok(())
    }

    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn has_session(&self) -> bool {
        self.current.is_some()
    }

    fn read_persisted(&self) -> Option<User> {
        let raw = match self.store.get(&self.user_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(
                    "event=session_restore module=session status=error error_code=store_read_failed error={err}"
                );
                return None;
            }
        };

        let value = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "event=session_restore module=session status=degraded error_code=malformed_json"
                );
                return None;
            }
        };
        let carried_password = value.get("password").is_some();

        let user = match serde_json::from_value::<User>(value) {
            Ok(user) => user,
            Err(_) => {
                warn!(
                    "event=session_restore module=session status=degraded error_code=invalid_shape"
                );
                return None;
            }
        };
        if user.validate().is_err() {
            warn!("event=session_restore module=session status=degraded error_code=blank_email");
            return None;
        }

        if carried_password {
            self.rewrite_sanitized(&user);
        }

        info!("event=session_restore module=session status=ok");
        Some(user)
    }

    fn rewrite_sanitized(&self, user: &User) {
        let outcome = serde_json::to_string(user)
            .map_err(|err| err.to_string())
            .and_then(|encoded| {
                self.store
                    .set(&self.user_key, &encoded)
                    .map_err(|err| err.to_string())
            });
        match outcome {
            Ok(()) => info!("event=session_sanitize module=session status=ok"),
            Err(err) => warn!(
                "event=session_sanitize module=session status=error error_code=persist_failed error={err}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionError, SessionManager};
    use crate::config::StorageKeys;
    use crate::model::user::{LoginRequest, User, UserValidationError};
    use crate::store::failing::FailingKeyValueStore;
    use crate::store::{KeyValueStore, MemoryKeyValueStore, StoreError};

    fn manager(store: &MemoryKeyValueStore) -> SessionManager<MemoryKeyValueStore> {
        SessionManager::new(store.clone(), &StorageKeys::default())
    }

    #[test]
    fn login_persists_user_without_password() {
        let store = MemoryKeyValueStore::new();
        let mut session = manager(&store);

        let user = session
            .login(LoginRequest::new("a@b.com", "A", "A").with_password("x"))
            .unwrap();
        assert_eq!(session.current(), Some(&user));

        let raw = store.get("libraroom_user").unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["nickname"], "A");
    }

    #[test]
    fn restore_is_repeatable_after_login() {
        let store = MemoryKeyValueStore::new();
        manager(&store)
            .login(LoginRequest::new("a@b.com", "A", "Ace").with_password("x"))
            .unwrap();

        let expected = User::new("a@b.com", "A", "Ace").unwrap();
        let mut reloaded = manager(&store);
        assert_eq!(reloaded.restore(), Some(expected.clone()));
        assert_eq!(reloaded.restore(), Some(expected));
        assert!(reloaded.has_session());
    }

    #[test]
    fn logout_clears_session_and_is_idempotent() {
        let store = MemoryKeyValueStore::new();
        let mut session = manager(&store);
        session.logout().unwrap();

        session
            .login(LoginRequest::new("a@b.com", "A", "A"))
            .unwrap();
        session.logout().unwrap();
        session.logout().unwrap();

        assert!(!session.has_session());
        assert_eq!(store.get("libraroom_user").unwrap(), None);
        assert_eq!(manager(&store).restore(), None);
    }

    #[test]
    fn restore_treats_malformed_json_as_absent() {
        let store = MemoryKeyValueStore::new();
        store.set("libraroom_user", "{not json").unwrap();
        assert_eq!(manager(&store).restore(), None);

        store.set("libraroom_user", r#"{"email": 7}"#).unwrap();
        assert_eq!(manager(&store).restore(), None);

        store
            .set("libraroom_user", r#"{"email":" ","name":"A","nickname":"A"}"#)
            .unwrap();
        assert_eq!(manager(&store).restore(), None);
    }

    #[test]
    fn restore_strips_legacy_password_and_rewrites_record() {
        let store = MemoryKeyValueStore::new();
        store
            .set(
                "libraroom_user",
                r#"{"email":"a@b.com","name":"A","nickname":"A","password":"x"}"#,
            )
            .unwrap();

        let user = manager(&store).restore().unwrap();
        assert_eq!(user.email, "a@b.com");

        let raw = store.get("libraroom_user").unwrap().unwrap();
        assert!(!raw.contains("password"));
    }

    #[test]
    fn failed_login_write_keeps_session_for_this_run() {
        let store = FailingKeyValueStore::new();
        store.fail_writes(true);
        let mut session = SessionManager::new(store.clone(), &StorageKeys::default());

        let err = session
            .login(LoginRequest::new("a@b.com", "A", "A"))
            .unwrap_err();
        assert!(matches!(err, SessionError::Store(StoreError::Poisoned)));
        assert_eq!(
            session.current().map(|user| user.email.as_str()),
            Some("a@b.com")
        );
        assert!(store.entries().keys().is_empty());
    }

    #[test]
    fn logout_clears_memory_even_when_remove_fails() {
        let store = FailingKeyValueStore::new();
        let mut session = SessionManager::new(store.clone(), &StorageKeys::default());
        session
            .login(LoginRequest::new("a@b.com", "A", "A"))
            .unwrap();

        store.fail_writes(true);
        let err = session.logout().unwrap_err();
        assert!(matches!(err, SessionError::Store(StoreError::Poisoned)));
        assert!(!session.has_session());
        assert!(store.entries().get("libraroom_user").unwrap().is_some());
    }

    #[test]
    fn restore_read_failure_yields_no_session() {
        let store = FailingKeyValueStore::new();
        store
            .entries()
            .set(
                "libraroom_user",
                r#"{"email":"a@b.com","name":"A","nickname":"A"}"#,
            )
            .unwrap();
        store.fail_reads(true);

        let mut session = SessionManager::new(store.clone(), &StorageKeys::default());
        assert_eq!(session.restore(), None);
        assert!(!session.has_session());
    }

    #[test]
    fn login_rejects_blank_email_without_touching_state() {
        let store = MemoryKeyValueStore::new();
        let mut session = manager(&store);

        let err = session
            .login(LoginRequest::new("", "A", "A").with_password("x"))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidUser(UserValidationError::BlankEmail)
        ));
        assert!(!session.has_session());
        assert!(store.keys().is_empty());
    }
}
