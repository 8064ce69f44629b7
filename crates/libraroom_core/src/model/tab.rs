//! Workspace tab set.
//!
//! # Invariants
//! - Persisted tab values are the stable ids returned by `as_str`.
//! - Unknown or missing values resolve to `ActiveTab::Timer`.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Feature panel selected inside the main workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ActiveTab {
    /// Focus timer.
    #[default]
    Timer,
    Tasks,
    Notes,
    /// AI studio chat.
    Ai,
    /// Ambient music player.
    Music,
    Profile,
}

/// Stable id for the focus timer tab.
pub const TAB_TIMER: &str = "timer";
/// Stable id for the task list tab.
pub const TAB_TASKS: &str = "tasks";
/// Stable id for the notes tab.
pub const TAB_NOTES: &str = "notes";
/// Stable id for the AI studio tab.
pub const TAB_AI: &str = "ai";
/// Stable id for the ambient music tab.
pub const TAB_MUSIC: &str = "music";
/// Stable id for the profile tab.
pub const TAB_PROFILE: &str = "profile";

const ALL_TABS: &[ActiveTab] = &[
    ActiveTab::Timer,
    ActiveTab::Tasks,
    ActiveTab::Notes,
    ActiveTab::Ai,
    ActiveTab::Music,
    ActiveTab::Profile,
];

// Profile is reached through the user badge, not the navigation bar.
const NAV_TABS: &[ActiveTab] = &[
    ActiveTab::Timer,
    ActiveTab::Tasks,
    ActiveTab::Notes,
    ActiveTab::Ai,
    ActiveTab::Music,
];

impl ActiveTab {
    /// Stable string id used for persistence and FFI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timer => TAB_TIMER,
            Self::Tasks => TAB_TASKS,
            Self::Notes => TAB_NOTES,
            Self::Ai => TAB_AI,
            Self::Music => TAB_MUSIC,
            Self::Profile => TAB_PROFILE,
        }
    }

    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Timer => "Focus",
            Self::Tasks => "Tasks",
            Self::Notes => "Study",
            Self::Ai => "Neural",
            Self::Music => "Ambient",
            Self::Profile => "Profile",
        }
    }

    pub fn all() -> &'static [ActiveTab] {
        ALL_TABS
    }

    /// Tabs rendered in the navigation bar, in display order.
    pub fn nav_tabs() -> &'static [ActiveTab] {
        NAV_TABS
    }

    /// Parses one stable tab id.
    pub fn parse(value: &str) -> Result<Self, TabParseError> {
        let normalized = value.trim();
        if normalized.is_empty() {
            return Err(TabParseError::EmptyTab);
        }
        ALL_TABS
            .iter()
            .copied()
            .find(|tab| tab.as_str() == normalized)
            .ok_or_else(|| TabParseError::UnknownTab(normalized.to_string()))
    }

    /// Resolves a persisted value, falling back to the default tab.
    pub fn from_persisted(value: Option<&str>) -> Self {
        value
            .and_then(|raw| Self::parse(raw).ok())
            .unwrap_or_default()
    }
}

impl Display for ActiveTab {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tab id parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabParseError {
    EmptyTab,
    UnknownTab(String),
}

impl Display for TabParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTab => write!(f, "tab id cannot be empty"),
            Self::UnknownTab(value) => write!(f, "unknown tab id: {value}"),
        }
    }
}

impl Error for TabParseError {}
