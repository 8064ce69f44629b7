//! Navigation controller.
//!
//! # Responsibility
//! - Own the started flag and the active workspace tab.
//! - Mirror both into the store so a reload lands on the same screen and tab.
//!
//! # Invariants
//! - The screen is always `resolve_screen(started, has_session)`.
//! - Only the literal `"true"` counts as a persisted started flag.
//! - An unknown persisted tab hydrates to `ActiveTab::Timer`.

use crate::config::StorageKeys;
use crate::model::screen::{resolve_screen, Screen};
use crate::model::tab::ActiveTab;
use crate::store::{KeyValueStore, StoreResult};
use log::{info, warn};

const STARTED_VALUE: &str = "true";

/// Owner of top-level navigation state.
pub struct NavigationController<S: KeyValueStore> {
    store: S,
    started_key: String,
    last_tab_key: String,
    started: bool,
    active_tab: ActiveTab,
}

impl<S: KeyValueStore> NavigationController<S> {
    /// Builds the controller from persisted state.
    ///
    /// Read failures degrade to defaults (not started, timer tab).
    pub fn hydrate(store: S, keys: &StorageKeys) -> Self {
        let started = match store.get(&keys.started) {
            Ok(value) => value.as_deref() == Some(STARTED_VALUE),
            Err(err) => {
                warn!(
                    "event=navigation_hydrate module=navigation status=degraded field=started error={err}"
                );
                false
            }
        };

        let active_tab = match store.get(&keys.last_tab) {
            Ok(value) => {
                let tab = ActiveTab::from_persisted(value.as_deref());
                if value.is_some_and(|raw| raw.trim() != tab.as_str()) {
                    warn!(
                        "event=navigation_hydrate module=navigation status=degraded field=last_tab error_code=unknown_tab fallback={tab}"
                    );
                }
                tab
            }
            Err(err) => {
                warn!(
                    "event=navigation_hydrate module=navigation status=degraded field=last_tab error={err}"
                );
                ActiveTab::default()
            }
        };

        info!(
            "event=navigation_hydrate module=navigation status=ok started={started} tab={active_tab}"
        );
        Self {
            store,
            started_key: keys.started.clone(),
            last_tab_key: keys.last_tab.clone(),
            started,
            active_tab,
        }
    }

    /// Landing -> Authentication.
    pub fn start(&mut self) -> StoreResult<()> {
        self.started = true;
        self.store.set(&self.started_key, STARTED_VALUE)?;
        info!("event=navigation_start module=navigation status=ok");
        Ok(())
    }

    /// Authentication -> Landing; forgets the started flag.
    pub fn back_to_landing(&mut self) -> StoreResult<()> {
        self.started = false;
        self.store.remove(&self.started_key)?;
        info!("event=navigation_back module=navigation status=ok");
        Ok(())
    }

    /// Switches the workspace tab and persists it.
    pub fn select_tab(&mut self, tab: ActiveTab) -> StoreResult<()> {
        self.active_tab = tab;
        self.store.set(&self.last_tab_key, tab.as_str())?;
        info!("event=navigation_select_tab module=navigation status=ok tab={tab}");
        Ok(())
    }

    /// Switches by stable id; unknown ids select the default tab.
    pub fn select_tab_id(&mut self, tab_id: &str) -> StoreResult<ActiveTab> {
        let tab = match ActiveTab::parse(tab_id) {
            Ok(tab) => tab,
            Err(err) => {
                warn!(
                    "event=navigation_select_tab module=navigation status=degraded error={err} fallback={}",
                    ActiveTab::default()
                );
                ActiveTab::default()
            }
        };
        self.select_tab(tab)?;
        Ok(tab)
    }

    /// Returns to the focus timer.
    pub fn go_home(&mut self) -> StoreResult<()> {
        self.select_tab(ActiveTab::Timer)
    }

    pub fn screen(&self, has_session: bool) -> Screen {
        resolve_screen(self.started, has_session)
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }
}
