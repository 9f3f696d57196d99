use std::path::{Path, PathBuf};

use crate::error::NavigationError;
use crate::fs::listing::{self, DirectoryEntry, SortKey};

/// Outcome of activating the selected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Nothing selected.
    Nothing,
    /// The selected directory is now the current path.
    Entered,
    /// The selected file should be opened externally.
    OpenFile(PathBuf),
}

/// The browser's current view: where we are, what is listed, and how it
/// is filtered.
///
/// Every transition either updates all derived fields or none of them.
#[derive(Debug)]
pub struct NavigationState {
    current_path: PathBuf,
    entries: Vec<DirectoryEntry>,
    parent_entries: Vec<DirectoryEntry>,
    show_hidden: bool,
    search_query: Option<String>,
    /// Index into `visible_entries()`, not `entries`.
    selected_index: usize,
    sort_key: SortKey,
}

impl NavigationState {
    /// Open a browser at `start`.
    pub fn open(start: &Path) -> Result<Self, NavigationError> {
        Self::with_options(start, false, SortKey::ByName)
    }

    /// Open a browser at `start` with initial filter and sort settings.
    pub fn with_options(
        start: &Path,
        show_hidden: bool,
        sort_key: SortKey,
    ) -> Result<Self, NavigationError> {
        let mut state = Self {
            current_path: PathBuf::new(),
            entries: Vec::new(),
            parent_entries: Vec::new(),
            show_hidden,
            search_query: None,
            selected_index: 0,
            sort_key,
        };
        state.enter(start)?;
        Ok(state)
    }

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    /// All entries of the current directory, sorted, unfiltered.
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn parent_entries(&self) -> &[DirectoryEntry] {
        &self.parent_entries
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    fn passes_hidden(&self, entry: &DirectoryEntry) -> bool {
        self.show_hidden || !entry.is_hidden()
    }

    /// Current entries after the hidden rule and, if active, the
    /// case-insensitive substring search.
    pub fn visible_entries(&self) -> Vec<&DirectoryEntry> {
        let needle = self.search_query.as_ref().map(|q| q.to_lowercase());
        self.entries
            .iter()
            .filter(|e| self.passes_hidden(e))
            .filter(|e| match &needle {
                Some(q) => e.name.to_lowercase().contains(q.as_str()),
                None => true,
            })
            .collect()
    }

    /// Parent entries after the hidden rule only.
    pub fn visible_parent_entries(&self) -> Vec<&DirectoryEntry> {
        self.parent_entries
            .iter()
            .filter(|e| self.passes_hidden(e))
            .collect()
    }

    pub fn selected_entry(&self) -> Option<&DirectoryEntry> {
        self.visible_entries().get(self.selected_index).copied()
    }

    /// Navigate to `path`. On failure nothing changes.
    pub fn enter(&mut self, path: impl AsRef<Path>) -> Result<(), NavigationError> {
        let path = path.as_ref();
        let absolute =
            listing::resolve_absolute(path).map_err(|source| NavigationError::Resolve {
                path: path.to_path_buf(),
                source,
            })?;

        let entries = listing::list_sorted(&absolute, self.sort_key)?;
        let parent_entries = self.load_parent(&absolute);

        tracing::debug!(path = %absolute.display(), count = entries.len(), "entered directory");
        self.current_path = absolute;
        self.entries = entries;
        self.parent_entries = parent_entries;
        self.selected_index = 0;
        self.search_query = None;
        Ok(())
    }

    /// Listing for the parent pane. Degrades to empty at the root or when
    /// the parent is unreadable.
    fn load_parent(&self, path: &Path) -> Vec<DirectoryEntry> {
        let parent = listing::parent_of(path);
        if parent == path {
            return Vec::new();
        }
        listing::list_sorted(&parent, self.sort_key).unwrap_or_else(|e| {
            tracing::debug!(parent = %parent.display(), error = %e, "parent listing unavailable");
            Vec::new()
        })
    }

    /// Enter the selected directory, or report the selected file for opening.
    pub fn enter_selected(&mut self) -> Result<Activation, NavigationError> {
        let Some(entry) = self.selected_entry() else {
            return Ok(Activation::Nothing);
        };
        if entry.is_dir {
            let path = entry.path.clone();
            self.enter(path)?;
            Ok(Activation::Entered)
        } else {
            Ok(Activation::OpenFile(entry.path.clone()))
        }
    }

    /// Go up one level. A no-op at the filesystem root.
    pub fn go_to_parent(&mut self) -> Result<(), NavigationError> {
        let parent = listing::parent_of(&self.current_path);
        if parent == self.current_path {
            return Ok(());
        }
        self.enter(parent)
    }

    /// Re-list the current directory, keeping filters. The selected entry
    /// stays selected; if it is gone the old index is clamped.
    pub fn reload(&mut self) -> Result<(), NavigationError> {
        let entries = listing::list_sorted(&self.current_path, self.sort_key)?;
        let parent_entries = self.load_parent(&self.current_path);
        let selected = self.selected_entry().map(|e| e.path.clone());
        let old_index = self.selected_index;

        self.entries = entries;
        self.parent_entries = parent_entries;
        let last = self.visible_entries().len().saturating_sub(1);
        self.reselect(selected.as_deref(), old_index.min(last));
        Ok(())
    }

    pub fn toggle_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
        self.selected_index = 0;
    }

    /// Move by `delta` rows, clamped to the visible range.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.visible_entries().len();
        if len == 0 {
            self.selected_index = 0;
            return;
        }
        let target = (self.selected_index as isize).saturating_add(delta);
        self.selected_index = target.clamp(0, len as isize - 1) as usize;
    }

    pub fn jump_to_top(&mut self) {
        self.selected_index = 0;
    }

    pub fn jump_to_bottom(&mut self) {
        self.selected_index = self.visible_entries().len().saturating_sub(1);
    }

    /// Filter the current listing by `query`. An empty query clears the filter.
    pub fn apply_search(&mut self, query: &str) {
        self.search_query = if query.is_empty() {
            None
        } else {
            Some(query.to_string())
        };
        self.selected_index = 0;
    }

    pub fn clear_search(&mut self) {
        self.search_query = None;
        self.selected_index = 0;
    }

    /// Re-sort both listings by `key`, following the selected entry.
    pub fn set_sort_key(&mut self, key: SortKey) {
        let selected = self.selected_entry().map(|e| e.path.clone());
        self.sort_key = key;
        listing::sort(&mut self.entries, key);
        listing::sort(&mut self.parent_entries, key);
        self.reselect(selected.as_deref(), 0);
    }

    pub fn cycle_sort(&mut self) {
        self.set_sort_key(self.sort_key.next());
    }

    /// Point the selection at `path` if it is still visible, else at
    /// `fallback`.
    fn reselect(&mut self, path: Option<&Path>, fallback: usize) {
        self.selected_index = path
            .and_then(|p| self.visible_entries().iter().position(|e| e.path == p))
            .unwrap_or(fallback);
    }
}
