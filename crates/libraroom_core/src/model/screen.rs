//! Top-level screens and workspace panel mounts.

use crate::model::tab::ActiveTab;
use crate::model::user::User;

/// Screen the shell renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Landing,
    Authentication,
    Workspace,
}

impl Screen {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Authentication => "authentication",
            Self::Workspace => "workspace",
        }
    }
}

/// Picks the screen from the two observed flags.
///
/// A present session always wins; otherwise the started flag decides
/// between landing and authentication.
pub fn resolve_screen(started: bool, has_session: bool) -> Screen {
    match (started, has_session) {
        (_, true) => Screen::Workspace,
        (true, false) => Screen::Authentication,
        (false, false) => Screen::Landing,
    }
}

/// Feature panel mounted in the workspace, with only the data it consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelMount {
    Timer,
    Tasks { user_email: String },
    Notes { user_email: String },
    AiStudio { user_email: String },
    Music,
    Profile { user: User },
}

impl PanelMount {
    /// Builds the mount for `tab` on behalf of `user`.
    pub fn for_tab(tab: ActiveTab, user: &User) -> Self {
        match tab {
            ActiveTab::Timer => Self::Timer,
            ActiveTab::Tasks => Self::Tasks {
                user_email: user.email.clone(),
            },
            ActiveTab::Notes => Self::Notes {
                user_email: user.email.clone(),
            },
            ActiveTab::Ai => Self::AiStudio {
                user_email: user.email.clone(),
            },
            ActiveTab::Music => Self::Music,
            ActiveTab::Profile => Self::Profile { user: user.clone() },
        }
    }

    pub fn tab(&self) -> ActiveTab {
        match self {
            Self::Timer => ActiveTab::Timer,
            Self::Tasks { .. } => ActiveTab::Tasks,
            Self::Notes { .. } => ActiveTab::Notes,
            Self::AiStudio { .. } => ActiveTab::Ai,
            Self::Music => ActiveTab::Music,
            Self::Profile { .. } => ActiveTab::Profile,
        }
    }
}
