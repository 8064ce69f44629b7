//! Authenticated user identity and transient login payload.
//!
//! # Invariants
//! - `email` is the identity key and is never blank on a valid `User`.
//! - `User` has no password field, so a password cannot reach persistence
//!   or feature panels through it.
//! - `LoginRequest` debug output never prints the password.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Sanitized user identity held by the session and handed to panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
    pub nickname: String,
}

impl User {
    /// Creates a user after identity validation.
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        nickname: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let user = Self {
            email: email.into().trim().to_string(),
            name: name.into(),
            nickname: nickname.into(),
        };
        user.validate()?;
        Ok(user)
    }

    /// Validates identity invariants.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.email.trim().is_empty() {
            return Err(UserValidationError::BlankEmail);
        }
        Ok(())
    }

    /// Uppercase badge initial: nickname first, then name, then email.
    pub fn initial(&self) -> char {
        [&self.nickname, &self.name, &self.email]
            .into_iter()
            .find_map(|value| value.trim().chars().next())
            .and_then(|first| first.to_uppercase().next())
            .unwrap_or('?')
    }

    /// Seed the UI uses for the generated avatar.
    pub fn avatar_seed(&self) -> &str {
        self.email.as_str()
    }
}

/// Login payload supplied by the authentication form.
///
/// The password is accepted only so the form can hand over what it
/// collected; `into_user` drops it.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub name: String,
    pub nickname: String,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        nickname: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            nickname: nickname.into(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Converts into a sanitized `User`, discarding the password.
    pub fn into_user(self) -> Result<User, UserValidationError> {
        let Self {
            email,
            name,
            nickname,
            password: _,
        } = self;
        User::new(email, name, nickname)
    }
}

impl Debug for LoginRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("nickname", &self.nickname)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// User identity validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    BlankEmail,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankEmail => write!(f, "user email cannot be blank"),
        }
    }
}

impl Error for UserValidationError {}
