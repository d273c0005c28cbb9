//! String-keyed preferences that survive across page loads.
//!
//! The dashboard only depends on the [`PreferenceStore`] contract. Session
//! credentials are read by the HTTP client when a request comes back
//! unauthenticated; the view keys are read at boot and written back when
//! the user changes the sort mode, the selected collection or the sidebar.

mod file;

pub use file::FileStore;

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::api::types::EntityId;
use crate::config::ViewConfig;
use crate::error::{DashboardError, Result};
use crate::sort::SortMode;

pub const BASE_URL_KEY: &str = "lw_base_url";
pub const TOKEN_KEY: &str = "lw_token";
pub const USERNAME_KEY: &str = "lw_username";
pub const SORT_MODE_KEY: &str = "lw_sort_mode";
pub const SHOW_SIDEBAR_KEY: &str = "lw_show_sidebar";
pub const SIDEBAR_OPEN_KEY: &str = "lw_sidebar_open";
pub const COLLECTION_ID_KEY: &str = "lw_collection_id";
pub const OPEN_NEW_TAB_KEY: &str = "lw_open_new_tab";
pub const THEME_KEY: &str = "lw_theme";
pub const GRID_COLUMNS_KEY: &str = "lw_grid_columns";
pub const GRID_SPACING_KEY: &str = "lw_grid_spacing";

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Page-lifetime store. Nothing is written anywhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        {
            let mut map = store.entries.lock();
            for (k, v) in entries {
                map.insert(k.to_string(), v.to_string());
            }
        }
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub base_url: String,
    pub token: String,
}

impl SessionCredentials {
    /// `None` unless both fields are present and non-blank.
    pub fn load(store: &dyn PreferenceStore) -> Option<Self> {
        let base_url = store.get(BASE_URL_KEY)?.trim().to_string();
        let token = store.get(TOKEN_KEY)?.trim().to_string();
        if base_url.is_empty() || token.is_empty() {
            return None;
        }
        Some(Self { base_url, token })
    }
}

pub fn clear_local_auth(store: &dyn PreferenceStore) -> Result<()> {
    store.remove(BASE_URL_KEY)?;
    store.remove(TOKEN_KEY)?;
    store.remove(USERNAME_KEY)?;
    Ok(())
}

pub(crate) fn clamp_range(n: i64, min: u8, max: u8) -> u8 {
    n.clamp(i64::from(min), i64::from(max)) as u8
}

pub(crate) fn clamp_int(raw: &str, min: u8, max: u8, fallback: u8) -> u8 {
    match raw.trim().parse::<i64>() {
        Ok(n) => clamp_range(n, min, max),
        Err(_) => fallback,
    }
}

pub(crate) fn normalize_theme(raw: &str) -> String {
    let theme = raw.trim().to_lowercase();
    match theme.as_str() {
        "auto" | "dark" | "light" => theme,
        _ => "auto".into(),
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Keys owned by [`ViewPreferences`].
pub const VIEW_KEYS: [&str; 8] = [
    SORT_MODE_KEY,
    SHOW_SIDEBAR_KEY,
    SIDEBAR_OPEN_KEY,
    COLLECTION_ID_KEY,
    OPEN_NEW_TAB_KEY,
    THEME_KEY,
    GRID_COLUMNS_KEY,
    GRID_SPACING_KEY,
];

#[derive(Debug, Clone, PartialEq)]
pub struct ViewPreferences {
    pub sort_mode: SortMode,
    pub show_sidebar: bool,
    pub sidebar_open: bool,
    pub selected_collection_id: Option<EntityId>,
    pub open_new_tab: bool,
    pub theme: String,
    pub grid_columns: u8,
    pub grid_spacing: u8,
}

impl ViewPreferences {
    pub fn load(store: &dyn PreferenceStore, defaults: &ViewConfig) -> Self {
        let get_flag = |key: &str, default: bool| {
            store.get(key).map(|v| v == "1").unwrap_or(default)
        };
        let collection = store
            .get(COLLECTION_ID_KEY)
            .unwrap_or_else(|| defaults.collection_id.clone());
        let collection = collection.trim();
        let grid_columns = clamp_range(defaults.grid_columns, 4, 12);
        let grid_spacing = clamp_range(defaults.grid_spacing, 0, 32);

        Self {
            sort_mode: store
                .get(SORT_MODE_KEY)
                .map(|v| SortMode::parse(&v))
                .unwrap_or_else(|| SortMode::parse(&defaults.sort_mode)),
            show_sidebar: get_flag(SHOW_SIDEBAR_KEY, defaults.show_sidebar),
            sidebar_open: get_flag(SIDEBAR_OPEN_KEY, false),
            selected_collection_id: (!collection.is_empty()).then(|| EntityId::from(collection)),
            open_new_tab: get_flag(OPEN_NEW_TAB_KEY, defaults.open_new_tab),
            theme: normalize_theme(
                &store.get(THEME_KEY).unwrap_or_else(|| defaults.theme.clone()),
            ),
            grid_columns: store
                .get(GRID_COLUMNS_KEY)
                .map(|v| clamp_int(&v, 4, 12, grid_columns))
                .unwrap_or(grid_columns),
            grid_spacing: store
                .get(GRID_SPACING_KEY)
                .map(|v| clamp_int(&v, 0, 32, grid_spacing))
                .unwrap_or(grid_spacing),
        }
    }

    /// Writes every view key.
    pub fn save(&self, store: &dyn PreferenceStore) -> Result<()> {
        for key in VIEW_KEYS {
            self.save_key(store, key)?;
        }
        Ok(())
    }

    /// Writes the single view key `key`. Keys never written keep following
    /// the config defaults on the next load.
    pub fn save_key(&self, store: &dyn PreferenceStore, key: &str) -> Result<()> {
        match key {
            SORT_MODE_KEY => store.set(key, self.sort_mode.as_str()),
            SHOW_SIDEBAR_KEY => store.set(key, flag(self.show_sidebar)),
            SIDEBAR_OPEN_KEY => store.set(key, flag(self.sidebar_open)),
            COLLECTION_ID_KEY => store.set(
                key,
                self.selected_collection_id
                    .as_ref()
                    .map(EntityId::as_str)
                    .unwrap_or(""),
            ),
            OPEN_NEW_TAB_KEY => store.set(key, flag(self.open_new_tab)),
            THEME_KEY => store.set(key, &self.theme),
            GRID_COLUMNS_KEY => store.set(key, &self.grid_columns.to_string()),
            GRID_SPACING_KEY => store.set(key, &self.grid_spacing.to_string()),
            other => Err(DashboardError::Config(format!(
                "{} is not a view preference",
                other
            ))),
        }
    }
}
