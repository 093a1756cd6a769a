//! The data-grid controller.
//!
//! [`GridController`] owns the authoritative row collection (`source`), the
//! derived filtered/sorted `view`, the selection set, and the modified-row
//! set. The UI widget layer holds only view indices and formatted strings;
//! raw data never leaves the controller.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::trace;
use trellis_core::{LruCache, Signal};

use crate::error::{GridError, GridResult};

use super::cell::CellValue;
use super::column::Column;
use super::row::Row;

/// Type alias for a row filter predicate.
pub type FilterFn = Arc<dyn Fn(&Row) -> bool + Send + Sync>;

/// Type alias for a row sort comparator.
pub type CompareFn = Arc<dyn Fn(&Row, &Row) -> Ordering + Send + Sync>;

/// Cache key for one formatted cell: source row, column, and the raw value's
/// hash, so a changed value can never be served from a stale entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CellKey {
    row: usize,
    column: String,
    value_hash: u64,
}

/// Notifications the controller fires synchronously on the UI thread after
/// the corresponding state mutation completes.
pub struct GridSignals {
    /// The dataset or the derived view was rebuilt; repaint everything.
    pub data_changed: Signal<()>,
    /// A row was appended. Argument: its `source` index.
    pub row_added: Signal<usize>,
    /// A row was replaced in place. Argument: its `source` index.
    pub row_updated: Signal<usize>,
    /// A row was removed. Argument: its former `source` index.
    pub row_removed: Signal<usize>,
    /// The selection changed. Argument: the new view indices, sorted.
    ///
    /// Fires whenever the selected *indices* differ from before, including
    /// pure renumbering: removing or filtering out an unselected row above a
    /// selected one shifts the selected positions, and a panel caching the
    /// last notified indices must hear about that.
    pub selection_changed: Signal<Vec<usize>>,
}

impl GridSignals {
    fn new() -> Self {
        Self {
            data_changed: Signal::new(),
            row_added: Signal::new(),
            row_updated: Signal::new(),
            row_removed: Signal::new(),
            selection_changed: Signal::new(),
        }
    }
}

/// Mutable grid state, guarded as one unit so the `source`/`view`/selection
/// invariants can never be observed half-updated.
struct GridState {
    /// Authoritative rows, normalized to column order.
    source: Vec<Row>,
    /// Internal identity per source row, parallel to `source`. Used for the
    /// identity-based selection remap; never exposed as business identity.
    ids: Vec<u64>,
    next_id: u64,
    /// Ordered subsequence of `source` indices after filter and sort.
    view: Vec<usize>,
    /// Selected positions in `view`. Invariant: every element < view.len().
    selection: HashSet<usize>,
    /// Source indices changed since the last `set_data`.
    /// Invariant: every element < source.len().
    modified: HashSet<usize>,
    filter: Option<FilterFn>,
    compare: Option<CompareFn>,
}

impl GridState {
    fn new() -> Self {
        Self {
            source: Vec::new(),
            ids: Vec::new(),
            next_id: 0,
            view: Vec::new(),
            selection: HashSet::new(),
            modified: HashSet::new(),
            filter: None,
            compare: None,
        }
    }

    fn assign_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Rebuilds `view` from `source` under the active filter and sort.
    ///
    /// Filtering preserves source order; sorting is stable, so equal rows
    /// keep their source order too.
    fn rebuild_view(&mut self) {
        let mut view: Vec<usize> = match &self.filter {
            Some(filter) => (0..self.source.len())
                .filter(|&i| filter(&self.source[i]))
                .collect(),
            None => (0..self.source.len()).collect(),
        };
        if let Some(compare) = &self.compare {
            view.sort_by(|&a, &b| compare(&self.source[a], &self.source[b]));
        }
        self.view = view;
    }

    /// The identity set of currently selected rows.
    fn selected_ids(&self) -> HashSet<u64> {
        self.selection
            .iter()
            .map(|&pos| self.ids[self.view[pos]])
            .collect()
    }

    /// Re-derives the selection from row identities after a view rebuild.
    ///
    /// Rows still present keep their selected state at their new position;
    /// rows no longer in the view are dropped silently. Index arithmetic is
    /// never used here, so an insert or delete can't shift the selection
    /// onto the wrong row.
    fn remap_selection(&mut self, previously_selected: &HashSet<u64>) {
        self.selection = self
            .view
            .iter()
            .enumerate()
            .filter(|(_, &src)| previously_selected.contains(&self.ids[src]))
            .map(|(pos, _)| pos)
            .collect();
    }

    fn sorted_selection(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.selection.iter().copied().collect();
        indices.sort_unstable();
        indices
    }
}

/// Owns a grid's dataset, derived view, selection, and dirty tracking.
///
/// All mutation happens on the UI thread through this controller; filter and
/// sort rebuilds are O(n)/O(n log n) per explicit call, and scrolling (the
/// viewport engine) only ever reads the already-built view.
///
/// # Example
///
/// ```
/// use trellis::grid::{CellValue, Column, GridController, Row};
///
/// let grid = GridController::new(vec![
///     Column::new("name", "Name"),
///     Column::new("balance", "Balance"),
/// ])
/// .unwrap();
///
/// grid.set_data(vec![
///     Row::new().with("name", "ACME").with("balance", 100i64),
///     Row::new().with("name", "Globex").with("balance", -20i64),
/// ])
/// .unwrap();
///
/// grid.apply_filter(|row| row.get("balance").and_then(|v| v.as_int()).unwrap_or(0) >= 0);
/// assert_eq!(grid.view_len(), 1);
/// ```
pub struct GridController {
    columns: Vec<Column>,
    state: RwLock<GridState>,
    cache: Mutex<LruCache<CellKey, String>>,
    /// Outbound notifications; see [`GridSignals`].
    pub signals: GridSignals,
}

impl GridController {
    /// Creates a controller for the given column set.
    ///
    /// Fails with [`GridError::DuplicateColumn`] if two columns share a key.
    pub fn new(columns: Vec<Column>) -> GridResult<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.key().to_string()) {
                return Err(GridError::DuplicateColumn {
                    key: column.key().to_string(),
                });
            }
        }
        Ok(Self {
            columns,
            state: RwLock::new(GridState::new()),
            cache: Mutex::new(LruCache::default_capacity()),
            signals: GridSignals::new(),
        })
    }

    /// Replaces the formatted-cell cache with one of the given capacity.
    pub fn with_cache_capacity(self, capacity: usize) -> Self {
        *self.cache.lock() = LruCache::new(capacity);
        self
    }

    /// The column descriptors, in display order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by key.
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key() == key)
    }

    /// Validates a row against the column set and normalizes its cells to
    /// column order.
    ///
    /// Every key must name a declared column and every column must have a
    /// value; this keeps position-based access and cache-key hashing total.
    fn validate_row(&self, row: Row) -> GridResult<Row> {
        for (key, _) in row.iter() {
            if self.column(key).is_none() {
                return Err(GridError::ColumnMismatch {
                    key: key.to_string(),
                });
            }
        }

        let mut normalized = Row::new();
        for column in &self.columns {
            let value = row
                .get(column.key())
                .cloned()
                .ok_or_else(|| GridError::MissingColumn {
                    key: column.key().to_string(),
                })?;
            normalized.set(column.key(), value);
        }
        Ok(normalized)
    }

    // =========================================================================
    // Dataset mutation
    // =========================================================================

    /// Replaces the entire dataset.
    ///
    /// Resets the modified-row set, rebuilds the view under the active
    /// filter, and clears the selection. Emits `data_changed` (the viewport
    /// treats this as a full repaint).
    pub fn set_data(&self, rows: Vec<Row>) -> GridResult<()> {
        let rows = rows
            .into_iter()
            .map(|r| self.validate_row(r))
            .collect::<GridResult<Vec<_>>>()?;

        {
            let mut state = self.state.write();
            let ids: Vec<u64> = rows.iter().map(|_| state.assign_id()).collect();
            state.ids = ids;
            state.source = rows;
            state.modified.clear();
            state.selection.clear();
            state.rebuild_view();
        }
        self.cache.lock().clear();

        trace!(target: "trellis::grid", "dataset replaced");
        self.signals.data_changed.emit(());
        Ok(())
    }

    /// Appends a row to `source`, returning its `source` index.
    ///
    /// The row joins the view only if it satisfies the active filter; with a
    /// sort active the view is re-sorted and the selection remapped by
    /// identity. Emits `row_added` with the `source` index.
    pub fn add_row(&self, row: Row) -> GridResult<usize> {
        let row = self.validate_row(row)?;

        let (source_index, selection_changed, new_selection) = {
            let mut state = self.state.write();
            let previously_selected = state.selected_ids();
            let previous_indices = state.sorted_selection();
            let id = state.assign_id();
            let source_index = state.source.len();

            let passes = state.filter.as_ref().map_or(true, |f| f(&row));
            state.source.push(row);
            state.ids.push(id);

            if passes {
                if state.compare.is_some() {
                    state.rebuild_view();
                    state.remap_selection(&previously_selected);
                } else {
                    // Appending at the end cannot shift existing view rows.
                    state.view.push(source_index);
                }
            }

            let changed = state.sorted_selection() != previous_indices;
            (source_index, changed, state.sorted_selection())
        };

        self.signals.row_added.emit(source_index);
        if selection_changed {
            self.signals.selection_changed.emit(new_selection);
        }
        Ok(source_index)
    }

    /// Replaces the row at `index` in `source`.
    ///
    /// The row keeps its identity (it stays selected if it remains in the
    /// view), is marked modified, and the view is rebuilt since the filter
    /// may change its membership. Emits `row_updated`.
    pub fn update_row(&self, index: usize, row: Row) -> GridResult<()> {
        let row = self.validate_row(row)?;

        let (selection_changed, new_selection) = {
            let mut state = self.state.write();
            if index >= state.source.len() {
                return Err(GridError::IndexOutOfRange {
                    index,
                    len: state.source.len(),
                });
            }

            let previously_selected = state.selected_ids();
            let previous_indices = state.sorted_selection();
            state.source[index] = row;
            state.modified.insert(index);
            state.rebuild_view();
            state.remap_selection(&previously_selected);

            let changed = state.sorted_selection() != previous_indices;
            (changed, state.sorted_selection())
        };

        self.cache.lock().invalidate(|k| k.row == index);

        self.signals.row_updated.emit(index);
        if selection_changed {
            self.signals.selection_changed.emit(new_selection);
        }
        Ok(())
    }

    /// Removes the row at `index` from `source` (and the view, if present).
    ///
    /// Modified-row indices above `index` are decremented; the selection is
    /// re-derived by identity, which drops the removed row and renumbers the
    /// rest. Emits `row_removed` with the former `source` index.
    pub fn remove_row(&self, index: usize) -> GridResult<()> {
        let (selection_changed, new_selection) = {
            let mut state = self.state.write();
            if index >= state.source.len() {
                return Err(GridError::IndexOutOfRange {
                    index,
                    len: state.source.len(),
                });
            }

            let removed_id = state.ids[index];
            let previous_indices = state.sorted_selection();
            let mut previously_selected = state.selected_ids();
            previously_selected.remove(&removed_id);

            state.source.remove(index);
            state.ids.remove(index);
            state.modified = state
                .modified
                .iter()
                .filter(|&&m| m != index)
                .map(|&m| if m > index { m - 1 } else { m })
                .collect();

            state.rebuild_view();
            state.remap_selection(&previously_selected);

            // Index comparison, not identity: dropping an unselected row
            // above a selected one renumbers the selected positions, and
            // that renumbering must be notified too.
            let changed = state.sorted_selection() != previous_indices;
            (changed, state.sorted_selection())
        };

        // Source indices at and above the removal point have shifted.
        self.cache.lock().invalidate(|k| k.row >= index);

        self.signals.row_removed.emit(index);
        if selection_changed {
            self.signals.selection_changed.emit(new_selection);
        }
        Ok(())
    }

    // =========================================================================
    // Filter and sort
    // =========================================================================

    /// Rebuilds the view as the ordered subsequence of `source` satisfying
    /// `predicate`. Matching rows keep their relative source order.
    ///
    /// Rows filtered out of the view are dropped from the selection without
    /// a distinct notification; a panel cannot tell this apart from a user
    /// deselection.
    pub fn apply_filter<F>(&self, predicate: F)
    where
        F: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.set_filter_inner(Some(Arc::new(predicate)));
    }

    /// Resets the view to all of `source`, in source order (modulo an active
    /// sort). Selection is remapped by identity.
    pub fn clear_filter(&self) {
        self.set_filter_inner(None);
    }

    fn set_filter_inner(&self, filter: Option<FilterFn>) {
        let (selection_changed, new_selection) = {
            let mut state = self.state.write();
            let previously_selected = state.selected_ids();
            let previous_indices = state.sorted_selection();
            state.filter = filter;
            state.rebuild_view();
            state.remap_selection(&previously_selected);
            let changed = state.sorted_selection() != previous_indices;
            (changed, state.sorted_selection())
        };

        self.signals.data_changed.emit(());
        if selection_changed {
            self.signals.selection_changed.emit(new_selection);
        }
    }

    /// Sorts the view with the given comparator (stable; ties keep source
    /// order). The filter, if any, still decides membership.
    pub fn sort_by<F>(&self, compare: F)
    where
        F: Fn(&Row, &Row) -> Ordering + Send + Sync + 'static,
    {
        self.set_sort_inner(Some(Arc::new(compare)));
    }

    /// Clears the sort, restoring source order within the view.
    pub fn clear_sort(&self) {
        self.set_sort_inner(None);
    }

    fn set_sort_inner(&self, compare: Option<CompareFn>) {
        let (selection_changed, new_selection) = {
            let mut state = self.state.write();
            let previously_selected = state.selected_ids();
            let previous_indices = state.sorted_selection();
            state.compare = compare;
            state.rebuild_view();
            state.remap_selection(&previously_selected);
            let changed = state.sorted_selection() != previous_indices;
            (changed, state.sorted_selection())
        };

        self.signals.data_changed.emit(());
        if selection_changed {
            self.signals.selection_changed.emit(new_selection);
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Replaces the selection with the given view indices.
    ///
    /// Atomic: if any index is out of view bounds the whole call fails with
    /// [`GridError::InvalidSelection`] and the selection is unchanged.
    pub fn set_selected(&self, indices: &[usize]) -> GridResult<()> {
        let new_selection = {
            let mut state = self.state.write();
            let len = state.view.len();
            if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
                return Err(GridError::InvalidSelection { index: bad, len });
            }
            state.selection = indices.iter().copied().collect();
            state.sorted_selection()
        };

        self.signals.selection_changed.emit(new_selection.clone());
        Ok(())
    }

    /// The selected view indices, sorted ascending.
    pub fn selection(&self) -> Vec<usize> {
        self.state.read().sorted_selection()
    }

    /// Clones of the selected rows, in view order.
    pub fn selected_rows(&self) -> Vec<Row> {
        let state = self.state.read();
        state
            .sorted_selection()
            .into_iter()
            .map(|pos| state.source[state.view[pos]].clone())
            .collect()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of rows in the authoritative dataset.
    pub fn source_len(&self) -> usize {
        self.state.read().source.len()
    }

    /// Number of rows in the current view.
    pub fn view_len(&self) -> usize {
        self.state.read().view.len()
    }

    /// Clones the row at the given view position.
    pub fn row(&self, view_index: usize) -> Option<Row> {
        let state = self.state.read();
        state
            .view
            .get(view_index)
            .map(|&src| state.source[src].clone())
    }

    /// Clones the row at the given source index.
    pub fn source_row(&self, index: usize) -> Option<Row> {
        self.state.read().source.get(index).cloned()
    }

    /// Whether the row at the given source index changed since `set_data`.
    pub fn is_modified(&self, source_index: usize) -> bool {
        self.state.read().modified.contains(&source_index)
    }

    /// Source indices of all modified rows, sorted ascending.
    pub fn modified_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self.state.read().modified.iter().copied().collect();
        rows.sort_unstable();
        rows
    }

    // =========================================================================
    // Cell formatting
    // =========================================================================

    /// Formats the cell at (`view_row`, `key`) through the column's
    /// formatter, memoized so repeated renders of an unchanged cell skip the
    /// formatter entirely.
    pub fn format_cell(&self, view_row: usize, key: &str) -> GridResult<String> {
        let state = self.state.read();
        let &source_index = state.view.get(view_row).ok_or(GridError::IndexOutOfRange {
            index: view_row,
            len: state.view.len(),
        })?;
        let column = self.column(key).ok_or_else(|| GridError::UnknownColumn {
            key: key.to_string(),
        })?;
        let value = state.source[source_index]
            .get(key)
            .cloned()
            .unwrap_or(CellValue::Null);
        drop(state);

        let cache_key = CellKey {
            row: source_index,
            column: key.to_string(),
            value_hash: value.value_hash(),
        };

        let mut cache = self.cache.lock();
        if let Some(formatted) = cache.get(&cache_key) {
            return Ok(formatted.clone());
        }
        let formatted = column.format(&value);
        cache.put(cache_key, formatted.clone());
        Ok(formatted)
    }

    /// Formats every cell of a view row, in column order.
    pub fn format_row(&self, view_row: usize) -> GridResult<Vec<String>> {
        self.columns
            .iter()
            .map(|c| self.format_cell(view_row, c.key()))
            .collect()
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        let state = self.state.read();
        assert_eq!(state.source.len(), state.ids.len());
        for &src in &state.view {
            assert!(src < state.source.len());
        }
        for &pos in &state.selection {
            assert!(pos < state.view.len());
        }
        for &m in &state.modified {
            assert!(m < state.source.len());
        }
    }
}
