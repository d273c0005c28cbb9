use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::prefs::{clamp_range, normalize_theme};
use crate::sort::SortMode;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DashboardConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub linkwarden: LinkwardenConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ServerConfig {
    /// Origin of the dashboard backend serving `/api/*` and `/auth/restore`.
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LinkwardenConfig {
    /// Only used to build favicon URLs.
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ViewConfig {
    #[serde(default = "default_sort_mode")]
    pub sort_mode: String,
    #[serde(default = "default_open_new_tab")]
    pub open_new_tab: bool,
    #[serde(default)]
    pub show_sidebar: bool,
    #[serde(default)]
    pub collection_id: String,
    /// Clamped to 4..=12 on load.
    #[serde(default = "default_grid_columns")]
    pub grid_columns: i64,
    /// Clamped to 0..=32 on load.
    #[serde(default = "default_grid_spacing")]
    pub grid_spacing: i64,
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            sort_mode: default_sort_mode(),
            open_new_tab: default_open_new_tab(),
            show_sidebar: false,
            collection_id: String::new(),
            grid_columns: default_grid_columns(),
            grid_spacing: default_grid_spacing(),
            theme: default_theme(),
        }
    }
}

fn default_sort_mode() -> String {
    SortMode::default().as_str().into()
}

fn default_open_new_tab() -> bool {
    true
}

fn default_grid_columns() -> i64 {
    6
}

fn default_grid_spacing() -> i64 {
    14
}

fn default_theme() -> String {
    "auto".into()
}

impl DashboardConfig {
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        let mut config: DashboardConfig = Figment::new()
            .merge(Serialized::defaults(DashboardConfig::defaults()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("SPEEDDIAL_").split("__"))
            .extract()
            .map_err(|e| DashboardError::Config(e.to_string()))?;

        config.normalize();
        config.validate()?;
        Ok(config)
    }

    fn normalize(&mut self) {
        let view = &mut self.view;
        view.sort_mode = SortMode::parse(&view.sort_mode).as_str().into();
        view.theme = normalize_theme(&view.theme);
        view.grid_columns = clamp_range(view.grid_columns, 4, 12).into();
        view.grid_spacing = clamp_range(view.grid_spacing, 0, 32).into();
        self.server.url = self.server.url.trim().trim_end_matches('/').to_string();
        self.linkwarden.url = self.linkwarden.url.trim().trim_end_matches('/').to_string();
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.url.is_empty() {
            return Err(DashboardError::Config(
                "server.url is required (set in config or SPEEDDIAL_SERVER__URL env var)".into(),
            ));
        }
        match reqwest::Url::parse(&self.server.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
            _ => Err(DashboardError::Config(format!(
                "server.url must be an absolute http(s) URL, got {:?}",
                self.server.url
            ))),
        }
    }

    pub fn config_dir() -> Option<PathBuf> {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(|xdg| PathBuf::from(xdg).join("speeddial"))
            .or_else(|| {
                directories::BaseDirs::new()
                    .map(|dirs| dirs.home_dir().join(".config").join("speeddial"))
            })
    }

    /// Where the file-backed preference store lives next to the config.
    pub fn preferences_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("preferences.json"))
    }

    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let body = toml::to_string_pretty(&Self::defaults())
            .map_err(|e| DashboardError::Config(e.to_string()))?;
        let content = format!(
            "# Speed dial dashboard\n\
             # server.url is the dashboard backend (or set SPEEDDIAL_SERVER__URL).\n\
             # view.sort_mode: date_desc | date_asc | name_asc | name_desc\n\n{}",
            body
        );

        std::fs::write(path, content)?;
        Ok(())
    }

    fn defaults() -> Self {
        Self {
            server: ServerConfig::default(),
            linkwarden: LinkwardenConfig::default(),
            view: ViewConfig::default(),
        }
    }
}
