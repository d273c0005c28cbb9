use std::sync::Arc;

use crate::api::types::{Collection, EntityId, Link};
use crate::error::{ErrorInfo, ErrorNotice};
use crate::prefs::ViewPreferences;
use crate::sort::SortMode;

use super::nav::Navigator;

#[derive(Debug, Clone, PartialEq)]
pub enum GridState {
    /// No collection selected in preferences.
    NoCollection,
    Loading,
    Loaded(Arc<Vec<Link>>),
    Failed(ErrorNotice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarStatus {
    Disabled,
    Loading,
    /// Collections could not be fetched; the rest of the page still works.
    Unavailable,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LinksAtCurrent {
    /// At the tree root, where no links are shown.
    Root,
    Pending,
    Loaded(Arc<Vec<Link>>),
}

#[derive(Debug, Clone)]
pub struct SidebarState {
    pub status: SidebarStatus,
    pub open: bool,
    pub collections: Arc<Vec<Collection>>,
    pub navigator: Navigator,
    pub links: LinksAtCurrent,
    pub query: String,
}

impl SidebarState {
    pub(super) fn new(enabled: bool, open: bool) -> Self {
        Self {
            status: if enabled {
                SidebarStatus::Loading
            } else {
                SidebarStatus::Disabled
            },
            open: enabled && open,
            collections: Arc::new(Vec::new()),
            navigator: Navigator::new(),
            links: LinksAtCurrent::Root,
            query: String::new(),
        }
    }

    /// Back to the root with no search. Pending link loads become stale.
    pub(super) fn reset_navigation(&mut self) {
        self.navigator.reset();
        self.links = LinksAtCurrent::Root;
        self.query.clear();
    }
}

pub struct DashboardState {
    pub prefs: ViewPreferences,
    pub favicon_base: String,
    pub grid: GridState,
    pub grid_generation: u64,
    pub sidebar: SidebarState,
}

impl DashboardState {
    pub fn new(prefs: ViewPreferences, favicon_base: &str) -> Self {
        let sidebar = SidebarState::new(prefs.show_sidebar, prefs.sidebar_open);
        Self {
            prefs,
            favicon_base: favicon_base.to_string(),
            grid: GridState::NoCollection,
            grid_generation: 0,
            sidebar,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Descend(EntityId),
    Ascend,
    Search(String),
    /// Activates a row of the sidebar view as currently rendered.
    ActivateRow(usize),
    ToggleSidebar,
    CloseSidebar,
    SetSortMode(SortMode),
    SelectCollection(Option<EntityId>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadRequest {
    GridLinks {
        collection_id: EntityId,
        generation: u64,
    },
    Collections,
    SidebarLinks {
        collection_id: EntityId,
        generation: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardMessage {
    GridLinksLoaded {
        generation: u64,
        result: Result<Arc<Vec<Link>>, ErrorInfo>,
    },
    CollectionsLoaded(Result<Arc<Vec<Collection>>, ErrorInfo>),
    SidebarLinksLoaded {
        generation: u64,
        links: Arc<Vec<Link>>,
    },
}

/// A link the host should open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTarget {
    pub url: String,
    pub new_tab: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionOutcome {
    pub load: Option<LoadRequest>,
    pub open: Option<OpenTarget>,
    /// Preference keys to write back, and only those.
    pub changed_prefs: Vec<&'static str>,
}

// --- Presentation records ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub title: String,
    /// `"#"` when the link has no URL.
    pub url: String,
    /// Empty when no favicon can be derived.
    pub icon_url: String,
    pub open_in_new_tab: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridView {
    NoCollection,
    Loading,
    Tiles(Vec<Tile>),
    Error(ErrorNotice),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Descend(EntityId),
    /// Empty URL means the row does nothing when activated.
    Open(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarRow {
    pub label: String,
    pub right_badge: String,
    pub action: RowAction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarView {
    pub status: SidebarStatus,
    pub open: bool,
    pub back_row_visible: bool,
    /// Draw the "Links" separator before the first link row.
    pub show_links_separator: bool,
    pub rows: Vec<SidebarRow>,
}
