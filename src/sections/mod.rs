pub mod blog;
pub mod projects;

use serde::Serialize;

use crate::models::Identified;
use crate::reorder::{reorder, Direction};
use crate::store::Store;

pub use blog::{BlogSection, BlogView, ExternalLink};
pub use projects::{FetchOutcome, ProjectsOptions, ProjectsSection, ProjectsView};

/// Per-item move and delete affordances handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemControls<Id> {
    pub index: usize,
    pub id: Id,
    pub show_move_actions: bool,
    pub can_move_left: bool,
    pub can_move_right: bool,
}

/// Ordered list shared by every section: the local, optimistic copy.
#[derive(Debug, Clone)]
pub struct ListSection<T> {
    items: Store<Vec<T>>,
}

impl<T> ListSection<T>
where
    T: Identified + Clone,
{
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Store::new(items),
        }
    }

    pub fn store(&self) -> &Store<Vec<T>> {
        &self.items
    }

    pub fn items(&self) -> Vec<T> {
        self.items.get()
    }

    pub fn len(&self) -> usize {
        self.items.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move `from` to `to`, returning the new list, or `None` when either index is out of range.
    pub fn move_to(&self, from: usize, to: usize) -> Option<Vec<T>> {
        let moved = self.items.with(|items| reorder(items, from, to));
        match moved {
            Ok(items) => {
                self.items.set(items.clone());
                Some(items)
            }
            Err(e) => {
                tracing::debug!(error = %e, "ignoring move");
                None
            }
        }
    }

    /// One-step move within the first `limit` items.
    pub fn step(&self, index: usize, direction: Direction, limit: usize) -> Option<Vec<T>> {
        let movable = self.len().min(limit);
        let Some(target) = direction.target(index, movable) else {
            tracing::debug!(index, ?direction, movable, "ignoring move past the edge");
            return None;
        };
        self.move_to(index, target)
    }

    /// Remove the item with `id`, returning the new list, or `None` if no item has it.
    pub fn remove(&self, id: &T::Id) -> Option<Vec<T>> {
        let remaining: Vec<T> = self.items.with(|items| {
            items.iter().filter(|item| item.id() != id).cloned().collect()
        });
        if remaining.len() == self.len() {
            tracing::debug!(?id, "ignoring delete of unknown item");
            return None;
        }
        self.items.set(remaining.clone());
        Some(remaining)
    }

    pub fn replace(&self, items: Vec<T>) {
        self.items.set(items);
    }

    /// Controls for the first `limit` items; the last movable index is `min(len, limit) - 1`.
    pub fn controls(&self, limit: usize) -> Vec<ItemControls<T::Id>> {
        self.items.with(|items| {
            let visible = items.len().min(limit);
            items
                .iter()
                .take(visible)
                .enumerate()
                .map(|(index, item)| ItemControls {
                    index,
                    id: item.id().clone(),
                    show_move_actions: items.len() > 1,
                    can_move_left: index > 0,
                    can_move_right: index + 1 < visible,
                })
                .collect()
        })
    }
}
