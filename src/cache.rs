//! Fetch-once cache for collections and per-collection links.
//!
//! Entries are filled on first request and kept for the lifetime of the
//! cache; there is no refresh or eviction. Concurrent callers for the same
//! entry wait on a single fetch. A failed fetch leaves the entry empty, so a
//! later call fetches again.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::api::client::SessionClient;
use crate::api::endpoints;
use crate::api::types::{parse_response_list, ApiResponse, Collection, EntityId, Link};
use crate::error::{DashboardError, Result};

type LinkCell = Arc<OnceCell<Arc<Vec<Link>>>>;

pub struct EntityCache {
    client: SessionClient,
    collections: OnceCell<Arc<Vec<Collection>>>,
    links: Mutex<HashMap<EntityId, LinkCell>>,
}

fn check_status(entity: &'static str, resp: &ApiResponse) -> Result<()> {
    if resp.is_success() {
        Ok(())
    } else if resp.is_unauthorized() {
        Err(DashboardError::AuthExpired {
            status: resp.status,
        })
    } else {
        Err(DashboardError::Load {
            entity,
            status: resp.status,
        })
    }
}

impl EntityCache {
    pub fn new(client: SessionClient) -> Self {
        Self {
            client,
            collections: OnceCell::new(),
            links: Mutex::new(HashMap::new()),
        }
    }

    pub fn client(&self) -> &SessionClient {
        &self.client
    }

    pub async fn get_collections(&self) -> Result<Arc<Vec<Collection>>> {
        self.collections
            .get_or_try_init(|| async {
                debug!("fetching collections");
                let resp = self.client.get(endpoints::COLLECTIONS).await?;
                check_status("collections", &resp)?;
                Ok::<_, DashboardError>(Arc::new(parse_response_list::<Collection>(
                    resp.body.as_ref(),
                )))
            })
            .await
            .cloned()
    }

    pub async fn get_links(&self, collection_id: &EntityId) -> Result<Arc<Vec<Link>>> {
        let cell = self
            .links
            .lock()
            .entry(collection_id.clone())
            .or_default()
            .clone();

        cell.get_or_try_init(|| async {
            debug!(collection = %collection_id, "fetching links");
            let resp = self
                .client
                .get(&endpoints::links_for_collection(collection_id))
                .await?;
            check_status("links", &resp)?;
            Ok::<_, DashboardError>(Arc::new(parse_response_list::<Link>(resp.body.as_ref())))
        })
        .await
        .cloned()
    }

    /// Links already fetched for `collection_id`, without touching the network.
    pub fn cached_links(&self, collection_id: &EntityId) -> Option<Arc<Vec<Link>>> {
        self.links
            .lock()
            .get(collection_id)
            .and_then(|cell| cell.get().cloned())
    }
}
