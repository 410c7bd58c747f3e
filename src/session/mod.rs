//! Persisted client state: the signed-in user, theme and tutorial flag in a
//! JSON file, plus a process-lifetime store for one-shot values.

pub mod store;

pub use store::KeyValueStore;

use crate::models::SessionUser;
use crate::search::Notice;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error};

pub const CURRENT_USER_KEY: &str = "currentUser";
pub const THEME_KEY: &str = "theme";
pub const TUTORIAL_KEY: &str = "tutorial_completed";
pub const SEARCH_QUERY_KEY: &str = "searchQuery";
pub const FLASH_KEY: &str = "flash";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
struct Stores {
    persistent: KeyValueStore,
    session: KeyValueStore,
}

/// Cheaply cloneable handle to the session stores
#[derive(Debug, Clone)]
pub struct SessionContext {
    stores: Arc<Mutex<Stores>>,
}

impl SessionContext {
    /// Persistent values in the JSON file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_stores(KeyValueStore::open(path), KeyValueStore::in_memory())
    }

    /// Everything in memory; nothing survives the process
    pub fn in_memory() -> Self {
        Self::with_stores(KeyValueStore::in_memory(), KeyValueStore::in_memory())
    }

    fn with_stores(persistent: KeyValueStore, session: KeyValueStore) -> Self {
        Self {
            stores: Arc::new(Mutex::new(Stores {
                persistent,
                session,
            })),
        }
    }

    fn stores(&self) -> MutexGuard<'_, Stores> {
        self.stores
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.stores().persistent.get(CURRENT_USER_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().map(|u| u.is_admin()).unwrap_or(false)
    }

    pub fn set_current_user(&self, user: &SessionUser) -> Result<()> {
        self.stores().persistent.set(CURRENT_USER_KEY, user)?;
        debug!("Session user saved: {}", user.email);
        Ok(())
    }

    pub fn clear_current_user(&self) -> Result<()> {
        self.stores().persistent.remove(CURRENT_USER_KEY)?;
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        self.stores().persistent.get(THEME_KEY).unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.stores().persistent.set(THEME_KEY, &theme)
    }

    /// Switch between light and dark, returning the new theme
    pub fn toggle_theme(&self) -> Result<Theme> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    pub fn tutorial_completed(&self) -> bool {
        self.stores().persistent.get(TUTORIAL_KEY).unwrap_or(false)
    }

    pub fn set_tutorial_completed(&self, completed: bool) -> Result<()> {
        self.stores().persistent.set(TUTORIAL_KEY, &completed)
    }

    /// Hand a query to the next recipes view
    pub fn stash_search_query(&self, query: &str) {
        if let Err(e) = self.stores().session.set(SEARCH_QUERY_KEY, query) {
            error!("Failed to stash search query: {}", e.log_safe());
        }
    }

    /// Consume the stashed query; a second call returns `None`
    pub fn take_search_query(&self) -> Option<String> {
        let mut stores = self.stores();
        let query = stores.session.get::<String>(SEARCH_QUERY_KEY);
        if let Err(e) = stores.session.remove(SEARCH_QUERY_KEY) {
            error!("Failed to clear search query: {}", e.log_safe());
        }
        query.filter(|q| !q.trim().is_empty())
    }

    /// Queue a notification for the next rendered page
    pub fn flash(&self, notice: Notice) {
        if let Err(e) = self.stores().session.set(FLASH_KEY, &notice) {
            error!("Failed to store notification: {}", e.log_safe());
        }
    }

    pub fn take_flash(&self) -> Option<Notice> {
        let mut stores = self.stores();
        let notice = stores.session.get::<Notice>(FLASH_KEY);
        if let Err(e) = stores.session.remove(FLASH_KEY) {
            error!("Failed to clear notification: {}", e.log_safe());
        }
        notice
    }
}
