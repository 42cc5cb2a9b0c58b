use super::optimistic::{optimistic, LocalState};
use crate::api::{ApiError, ProjectStore};
use crate::models::{OrderEntry, Project};

/// Standard array move: take the item at `from` out, then insert it at `to`.
pub(crate) fn array_move<T>(list: &mut Vec<T>, from: usize, to: usize) {
    if from >= list.len() || to >= list.len() || from == to {
        return;
    }
    let item = list.remove(from);
    list.insert(to, item);
}

/// Positional, 0-based, contiguous order indexes for the whole list.
pub(crate) fn order_assignments(list: &[Project]) -> Vec<OrderEntry> {
    list.iter()
        .enumerate()
        .map(|(i, p)| OrderEntry {
            id: p.id.clone(),
            order_index: i as i64,
        })
        .collect()
}

#[derive(Clone, Debug)]
pub(crate) enum ReorderOutcome {
    /// Same id, unknown id, or a reorder already in flight.
    Ignored,
    Committed,
    RolledBack(ApiError),
}

/// Owns the local, optimistically ordered project list for one category.
pub(crate) struct ReorderCoordinator<S, L, F> {
    store: S,
    items: L,
    reordering: F,
}

impl<S, L, F> ReorderCoordinator<S, L, F>
where
    S: ProjectStore,
    L: LocalState<Vec<Project>>,
    F: LocalState<bool>,
{
    pub fn new(store: S, items: L, reordering: F) -> Self {
        Self {
            store,
            items,
            reordering,
        }
    }

    /// Adopt a freshly fetched list unless a reorder is still settling.
    pub fn sync_from(&self, authoritative: Vec<Project>) {
        if self.reordering.snapshot() {
            tracing::debug!("skipping list sync during reorder");
            return;
        }
        self.items.replace(authoritative);
    }

    pub async fn handle_reorder(&self, moved_id: &str, target_id: &str) -> ReorderOutcome {
        if moved_id == target_id || self.reordering.snapshot() {
            return ReorderOutcome::Ignored;
        }

        let mut next = self.items.snapshot();
        let from = next.iter().position(|p| p.id == moved_id);
        let to = next.iter().position(|p| p.id == target_id);
        let (Some(from), Some(to)) = (from, to) else {
            return ReorderOutcome::Ignored;
        };

        array_move(&mut next, from, to);
        let entries = order_assignments(&next);

        self.reordering.replace(true);
        let result = optimistic(&self.items, next, self.store.update_order(&entries)).await;
        self.reordering.replace(false);

        match result {
            Ok(()) => {
                tracing::debug!("moved project {moved_id} to position {to}");
                ReorderOutcome::Committed
            }
            Err(e) => {
                tracing::error!("reorder of {moved_id} failed, restoring previous order: {e}");
                ReorderOutcome::RolledBack(e)
            }
        }
    }
}
