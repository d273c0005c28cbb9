use std::sync::Arc;

use crate::api::client::SessionClient;
use crate::api::types::{Collection, EntityId, Link};
use crate::cache::EntityCache;
use crate::config::ViewConfig;
use crate::prefs::{MemoryStore, ViewPreferences};

use super::state::{DashboardState, GridView, SidebarStatus, SidebarView};
use super::Presenter;

pub fn make_collection(id: i64, name: &str, parent: Option<i64>) -> Collection {
    Collection {
        id: EntityId::from(id),
        name: name.into(),
        parent_id: parent.map(EntityId::from),
        link_count: None,
    }
}

pub fn make_link(title: &str, url: &str, created_at: &str) -> Link {
    Link {
        id: None,
        title: Some(title.into()),
        name: None,
        url: url.into(),
        created_at: (!created_at.is_empty()).then(|| created_at.to_string()),
    }
}

/// Work(1) > {Personal(2), Projects(3)}, Reading(4)
pub fn sample_tree() -> Vec<Collection> {
    let mut work = make_collection(1, "Work", None);
    work.link_count = Some(3);
    vec![
        work,
        make_collection(2, "Personal", Some(1)),
        make_collection(3, "Projects", Some(1)),
        make_collection(4, "Reading", None),
    ]
}

/// Sidebar enabled, closed, collections loaded; no grid collection.
pub fn test_state() -> DashboardState {
    let mut prefs = ViewPreferences::load(&MemoryStore::new(), &ViewConfig::default());
    prefs.show_sidebar = true;
    let mut state = DashboardState::new(prefs, "https://lw.example");
    state.sidebar.status = SidebarStatus::Ready;
    state.sidebar.collections = Arc::new(sample_tree());
    state
}

/// A cache whose client points at a closed port; only for code paths that
/// must not hit the network.
pub fn offline_cache() -> EntityCache {
    let client = SessionClient::new("http://127.0.0.1:9", Arc::new(MemoryStore::new())).unwrap();
    EntityCache::new(client)
}

#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub grids: Vec<GridView>,
    pub sidebars: Vec<SidebarView>,
}

impl RecordingPresenter {
    pub fn last_grid(&self) -> &GridView {
        self.grids.last().unwrap()
    }

    pub fn last_sidebar(&self) -> &SidebarView {
        self.sidebars.last().unwrap()
    }

    pub fn last_sidebar_labels(&self) -> Vec<String> {
        self.last_sidebar()
            .rows
            .iter()
            .map(|r| r.label.clone())
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn grid_changed(&mut self, view: &GridView) {
        self.grids.push(view.clone());
    }

    fn sidebar_changed(&mut self, view: &SidebarView) {
        self.sidebars.push(view.clone());
    }
}
