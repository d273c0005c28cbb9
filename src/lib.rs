pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod prefs;
pub mod sort;

// Convenience re-exports
pub use api::client::SessionClient;
pub use api::types;
pub use app::{Dashboard, Presenter};
pub use cache::EntityCache;
pub use config::DashboardConfig;
pub use error::{DashboardError, Result};
pub use prefs::{FileStore, MemoryStore, PreferenceStore};
pub use sort::{sort_links, SortMode};
