use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use crate::api::types::EntityId;
use crate::cache::EntityCache;
use crate::error::ErrorInfo;

use super::state::DashboardMessage;

pub(super) fn spawn_fetch_grid_links(
    cache: &Arc<EntityCache>,
    collection_id: EntityId,
    generation: u64,
    tx: &mpsc::UnboundedSender<DashboardMessage>,
) {
    let cache = cache.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = cache
            .get_links(&collection_id)
            .await
            .map_err(|e| ErrorInfo::from_dashboard_error(&e));
        let _ = tx.send(DashboardMessage::GridLinksLoaded { generation, result });
    });
}

pub(super) fn spawn_fetch_collections(
    cache: &Arc<EntityCache>,
    tx: &mpsc::UnboundedSender<DashboardMessage>,
) {
    let cache = cache.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = cache
            .get_collections()
            .await
            .map_err(|e| ErrorInfo::from_dashboard_error(&e));
        let _ = tx.send(DashboardMessage::CollectionsLoaded(result));
    });
}

pub(super) fn spawn_fetch_sidebar_links(
    cache: &Arc<EntityCache>,
    collection_id: EntityId,
    generation: u64,
    tx: &mpsc::UnboundedSender<DashboardMessage>,
) {
    let cache = cache.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let links = match cache.get_links(&collection_id).await {
            Ok(links) => links,
            Err(e) => {
                // The sidebar is optional: show no links rather than an error.
                warn!(collection = %collection_id, error = %e, "sidebar links unavailable");
                Arc::new(Vec::new())
            }
        };
        let _ = tx.send(DashboardMessage::SidebarLinksLoaded { generation, links });
    });
}
