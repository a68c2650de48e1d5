//! Generic list-with-selection state shared by every CRUD-backed page.
//!
//! DESIGN
//! ======
//! Projects, prompts, datasets, and jobs all need the same shape: a fetched
//! list, an optional selection, a loading flag, and a last error. One generic
//! slice replaces four near-identical ones; pages only differ in which API
//! calls feed it.

#[cfg(test)]
#[path = "crud_test.rs"]
mod tests;

use uuid::Uuid;

use shared::Paginated;

/// Implemented by every entity the slice can hold.
pub trait HasId {
    fn id(&self) -> Uuid;
}

impl HasId for shared::Project {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl HasId for shared::Prompt {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl HasId for shared::Dataset {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl HasId for shared::EvaluationJob {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// List + selection state for one entity type.
#[derive(Clone, Debug, PartialEq)]
pub struct CrudState<T> {
    pub items: Vec<T>,
    pub selected_id: Option<Uuid>,
    pub loading: bool,
    pub error: Option<String>,
    /// Total matching items server-side, for pagination displays.
    pub total: i64,
    /// 1-based page currently shown.
    pub page: u32,
}

impl<T> Default for CrudState<T> {
    fn default() -> Self {
        Self { items: Vec::new(), selected_id: None, loading: false, error: None, total: 0, page: 1 }
    }
}

impl<T: HasId + Clone> CrudState<T> {
    /// Mark a fetch in flight; keeps the current items visible.
    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Replace the list with a fetched page. Selection survives if the
    /// selected item is still present.
    pub fn loaded_page(&mut self, page: Paginated<T>) {
        self.items = page.items;
        self.total = page.total;
        self.page = page.page;
        self.loading = false;
        self.error = None;
        if let Some(id) = self.selected_id {
            if !self.items.iter().any(|item| item.id() == id) {
                self.selected_id = None;
            }
        }
    }

    /// Replace the list with an unpaginated fetch.
    pub fn loaded(&mut self, items: Vec<T>) {
        let total = i64::try_from(items.len()).unwrap_or(i64::MAX);
        self.loaded_page(Paginated { items, total, page: 1, limit: shared::MAX_PAGE_LIMIT });
    }

    /// Record a fetch or mutation failure.
    pub fn failed(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    /// Insert a created item, or replace it in place after an update.
    pub fn upsert(&mut self, item: T) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id() == item.id()) {
            *existing = item;
        } else {
            self.items.insert(0, item);
            self.total += 1;
        }
    }

    /// Remove a deleted item. Clears the selection if it pointed at it.
    pub fn remove(&mut self, id: Uuid) {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() < before {
            self.total -= 1;
        }
        if self.selected_id == Some(id) {
            self.selected_id = None;
        }
    }

    /// Select an item by id, or clear with `None`.
    pub fn select(&mut self, id: Option<Uuid>) {
        self.selected_id = id;
    }

    /// The currently selected item, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&T> {
        let id = self.selected_id?;
        self.items.iter().find(|item| item.id() == id)
    }
}
