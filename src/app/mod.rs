mod actions;
mod nav;
mod search;
mod state;
mod tasks;
mod view;
pub use nav::{children_of, Navigator};
pub use search::{filter_rows, matches_query};
pub use state::*;
pub use view::{grid_view, sidebar_view, tiles};

use actions::{handle_action, start_grid_load};
use tasks::{spawn_fetch_collections, spawn_fetch_grid_links, spawn_fetch_sidebar_links};

#[cfg(test)]
pub(crate) mod test_helpers;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::client::SessionClient;
use crate::api::types::{Collection, Link};
use crate::cache::EntityCache;
use crate::config::{DashboardConfig, ViewConfig};
use crate::error::{ErrorInfo, ErrorNotice, Result};
use crate::prefs::{self, PreferenceStore, ViewPreferences};

/// Receives a complete view after every state change. Each call replaces
/// whatever was drawn before.
pub trait Presenter {
    fn grid_changed(&mut self, view: &GridView);
    fn sidebar_changed(&mut self, view: &SidebarView);
}

fn dispatch_load_request(
    request: LoadRequest,
    cache: &Arc<EntityCache>,
    tx: &mpsc::UnboundedSender<DashboardMessage>,
) {
    match request {
        LoadRequest::GridLinks {
            collection_id,
            generation,
        } => spawn_fetch_grid_links(cache, collection_id, generation, tx),
        LoadRequest::Collections => spawn_fetch_collections(cache, tx),
        LoadRequest::SidebarLinks {
            collection_id,
            generation,
        } => spawn_fetch_sidebar_links(cache, collection_id, generation, tx),
    }
}

/// Returns false when the result was stale and nothing changed.
pub fn handle_grid_links_loaded(
    state: &mut DashboardState,
    generation: u64,
    result: std::result::Result<Arc<Vec<Link>>, ErrorInfo>,
) -> bool {
    if generation != state.grid_generation {
        debug!(generation, current = state.grid_generation, "discarding stale grid links");
        return false;
    }
    state.grid = match result {
        Ok(links) => GridState::Loaded(links),
        Err(info) => GridState::Failed(ErrorNotice::from_error_info(&info)),
    };
    true
}

pub fn handle_collections_loaded(
    state: &mut DashboardState,
    result: std::result::Result<Arc<Vec<Collection>>, ErrorInfo>,
) -> bool {
    match result {
        Ok(collections) => {
            state.sidebar.collections = collections;
            state.sidebar.status = SidebarStatus::Ready;
        }
        Err(info) => {
            warn!(?info, "collections unavailable, sidebar disabled for this page");
            state.sidebar.status = SidebarStatus::Unavailable;
        }
    }
    true
}

/// Returns false when the navigator moved on since the load started.
pub fn handle_sidebar_links_loaded(
    state: &mut DashboardState,
    generation: u64,
    links: Arc<Vec<Link>>,
) -> bool {
    let current = state.sidebar.navigator.generation();
    if generation != current {
        debug!(generation, current, "discarding stale sidebar links");
        return false;
    }
    state.sidebar.links = LinksAtCurrent::Loaded(links);
    true
}

pub fn apply_message(state: &mut DashboardState, message: DashboardMessage) -> bool {
    match message {
        DashboardMessage::GridLinksLoaded { generation, result } => {
            handle_grid_links_loaded(state, generation, result)
        }
        DashboardMessage::CollectionsLoaded(result) => handle_collections_loaded(state, result),
        DashboardMessage::SidebarLinksLoaded { generation, links } => {
            handle_sidebar_links_loaded(state, generation, links)
        }
    }
}

/// Page controller: the single writer of the cache-backed dashboard state.
pub struct Dashboard<P: Presenter> {
    cache: Arc<EntityCache>,
    store: Arc<dyn PreferenceStore>,
    state: DashboardState,
    presenter: P,
    tx: mpsc::UnboundedSender<DashboardMessage>,
    rx: mpsc::UnboundedReceiver<DashboardMessage>,
}

impl<P: Presenter> Dashboard<P> {
    pub fn new(
        config: &DashboardConfig,
        store: Arc<dyn PreferenceStore>,
        presenter: P,
    ) -> Result<Self> {
        let client = SessionClient::new(&config.server.url, store.clone())?;
        let cache = Arc::new(EntityCache::new(client));
        Ok(Self::with_cache(
            cache,
            store,
            &config.view,
            &config.linkwarden.url,
            presenter,
        ))
    }

    pub fn with_cache(
        cache: Arc<EntityCache>,
        store: Arc<dyn PreferenceStore>,
        view_defaults: &ViewConfig,
        favicon_base: &str,
        presenter: P,
    ) -> Self {
        let prefs = ViewPreferences::load(store.as_ref(), view_defaults);
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            cache,
            store,
            state: DashboardState::new(prefs, favicon_base),
            presenter,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn cache(&self) -> &Arc<EntityCache> {
        &self.cache
    }

    /// Starts the main grid load and, when enabled, the collection list.
    /// Must run inside a tokio runtime.
    pub fn boot(&mut self) {
        if let Some(request) = start_grid_load(&mut self.state) {
            dispatch_load_request(request, &self.cache, &self.tx);
        }
        if self.state.prefs.show_sidebar {
            dispatch_load_request(LoadRequest::Collections, &self.cache, &self.tx);
        }
        self.render();
    }

    /// Applies a user action. Returns the link to open, if any.
    pub fn dispatch(&mut self, action: Action) -> Option<OpenTarget> {
        let outcome = handle_action(&mut self.state, action);
        self.persist_prefs(&outcome.changed_prefs);
        if let Some(request) = outcome.load {
            dispatch_load_request(request, &self.cache, &self.tx);
        }
        self.render();
        outcome.open
    }

    /// Waits for the next completed load and applies it.
    pub async fn process_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(message) => {
                self.apply(message);
                true
            }
            None => false,
        }
    }

    /// Applies every completed load without waiting. Returns how many were
    /// taken off the channel.
    pub fn process_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message);
            count += 1;
        }
        count
    }

    pub async fn restore_session(&self) -> Result<()> {
        self.cache.client().restore_session().await
    }

    pub fn clear_local_auth(&self) -> Result<()> {
        prefs::clear_local_auth(self.store.as_ref())
    }

    fn apply(&mut self, message: DashboardMessage) {
        if apply_message(&mut self.state, message) {
            self.render();
        }
    }

    fn persist_prefs(&self, keys: &[&'static str]) {
        for &key in keys {
            if let Err(e) = self.state.prefs.save_key(self.store.as_ref(), key) {
                warn!(key, error = %e, "failed to save view preference");
            }
        }
    }

    fn render(&mut self) {
        self.presenter.grid_changed(&grid_view(&self.state));
        self.presenter.sidebar_changed(&sidebar_view(&self.state));
    }
}
