pub mod export;
pub mod table;

pub use export::{render_html, PdfExporter};
pub use table::ComparisonTable;

use crate::models::{Property, PropertyId};
use tracing::debug;

/// Maximum number of listings shown side by side
pub const MAX_COMPARE: usize = 3;

/// Result of a [`ComparisonSet::toggle`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Set already full, nothing changed
    Capped,
}

type EmptyListener = Box<dyn FnMut() + Send>;

/// Listings picked for side-by-side comparison during one browsing session.
///
/// Holds ids only; the page that fetched the listings owns them. Order of
/// insertion is kept and the set never grows past [`MAX_COMPARE`].
#[derive(Default)]
pub struct ComparisonSet {
    ids: Vec<PropertyId>,
    open: bool,
    empty_listeners: Vec<EmptyListener>,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, item: &Property) -> ToggleOutcome {
        self.toggle_id(item.id)
    }

    pub fn toggle_id(&mut self, id: PropertyId) -> ToggleOutcome {
        if self.remove(id) {
            return ToggleOutcome::Removed;
        }

        if self.is_full() {
            debug!("Comparison full, ignoring property {}", id);
            return ToggleOutcome::Capped;
        }

        self.ids.push(id);
        ToggleOutcome::Added
    }

    /// Add each id in order, leaving ids that are already selected alone.
    /// Returns the ids turned away because the set was full.
    pub fn select_all<I>(&mut self, ids: I) -> Vec<PropertyId>
    where
        I: IntoIterator<Item = PropertyId>,
    {
        let mut capped = Vec::new();
        for id in ids {
            if self.is_selected(id) {
                continue;
            }
            if self.toggle_id(id) == ToggleOutcome::Capped {
                capped.push(id);
            }
        }
        capped
    }

    /// Remove a listing. Returns whether it was selected.
    pub fn remove(&mut self, id: PropertyId) -> bool {
        let Some(pos) = self.ids.iter().position(|selected| *selected == id) else {
            return false;
        };

        self.ids.remove(pos);
        if self.ids.is_empty() {
            self.close_on_empty();
        }
        true
    }

    pub fn is_selected(&self, id: PropertyId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[PropertyId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= MAX_COMPARE
    }

    /// Show the comparison view. Refused while nothing is selected.
    pub fn open(&mut self) -> bool {
        self.open = !self.ids.is_empty();
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Drop the selection when the user leaves the page. Not an auto-close:
    /// empty listeners are not called.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.open = false;
    }

    /// Register a callback for every non-empty to empty transition
    pub fn on_empty<F>(&mut self, listener: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.empty_listeners.push(Box::new(listener));
    }

    fn close_on_empty(&mut self) {
        debug!("Comparison emptied, closing view");
        self.open = false;
        for listener in &mut self.empty_listeners {
            listener();
        }
    }
}

impl std::fmt::Debug for ComparisonSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparisonSet")
            .field("ids", &self.ids)
            .field("open", &self.open)
            .field("empty_listeners", &self.empty_listeners.len())
            .finish()
    }
}
