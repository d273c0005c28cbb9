use std::sync::Arc;

use crate::api::types::{Collection, EntityId, Link};
use crate::cache::EntityCache;
use crate::error::Result;

/// Position in the collection forest plus the path taken to get there.
///
/// `None` is the root. Every transition bumps `generation`, which async
/// completions compare against before touching shared view state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Navigator {
    current: Option<EntityId>,
    ancestors: Vec<Option<EntityId>>,
    generation: u64,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&EntityId> {
        self.current.as_ref()
    }

    /// Outermost first.
    pub fn ancestors(&self) -> &[Option<EntityId>] {
        &self.ancestors
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_at_root(&self) -> bool {
        self.current.is_none()
    }

    /// `child` must be a direct child of the current position.
    pub fn descend(&mut self, child: EntityId, collections: &[Collection]) -> u64 {
        debug_assert!(
            children_of(collections, self.current.as_ref())
                .iter()
                .any(|c| c.id == child),
            "{} is not a child of {:?}",
            child,
            self.current
        );
        self.ancestors.push(self.current.take());
        self.current = Some(child);
        self.bump()
    }

    /// At the root this stays at the root.
    pub fn ascend(&mut self) -> u64 {
        self.current = self.ancestors.pop().flatten();
        self.bump()
    }

    pub fn reset(&mut self) -> u64 {
        self.current = None;
        self.ancestors.clear();
        self.bump()
    }

    fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub async fn links_at_current(&self, cache: &EntityCache) -> Result<Arc<Vec<Link>>> {
        match &self.current {
            Some(id) => cache.get_links(id).await,
            None => Ok(Arc::new(Vec::new())),
        }
    }
}

/// Children in source order.
pub fn children_of<'a>(
    collections: &'a [Collection],
    parent: Option<&EntityId>,
) -> Vec<&'a Collection> {
    collections
        .iter()
        .filter(|c| c.parent_id.as_ref() == parent)
        .collect()
}
