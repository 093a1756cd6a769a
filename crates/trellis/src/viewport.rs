//! Virtualized viewport rendering.
//!
//! [`VirtualScrollEngine`] keeps a grid widget showing only the slice of the
//! view that is actually on screen (plus a fixed overscan), so scrolling a
//! dataset of tens of thousands of rows never re-renders the whole thing.
//!
//! The engine *composes* with the grid it serves — it holds a reference to
//! the [`GridController`] rather than being mixed into a widget base class —
//! and pushes widget mutations through a [`RowPresenter`], which the widget
//! adapter implements for the active toolkit.
//!
//! Scroll and resize events only *schedule* a repaint; [`flush`]
//! materializes the newest scheduled window once per frame. A schedule that
//! arrives while another is pending replaces it, so rapid scroll events
//! collapse into a single repaint of the final window. A superseded repaint
//! is not an error and produces no notification. Grid mutations schedule a
//! full repaint through the engine's signal subscriptions, so a `set_data`
//! or filter change reaches the screen with no extra panel wiring.
//!
//! [`flush`]: VirtualScrollEngine::flush

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::trace;
use trellis_core::ConnectionId;

use crate::adapter::{events, EventAdapter, UiEvent, WidgetId};
use crate::error::AdapterResult;
use crate::grid::GridController;

/// Geometry the window computation needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    /// Fixed row height in pixels.
    pub row_height_px: f32,
    /// Visible height of the viewport in pixels.
    pub viewport_height_px: f32,
    /// Extra rows rendered beyond the visible area to mask scroll latency.
    pub overscan: usize,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            row_height_px: 20.0,
            viewport_height_px: 400.0,
            overscan: 5,
        }
    }
}

/// The contiguous slice of the view currently materialized as widgets.
///
/// Invariant: `first_visible + count <= view_len` at computation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportWindow {
    /// View index of the first materialized row.
    pub first_visible: usize,
    /// Number of materialized rows.
    pub count: usize,
}

impl ViewportWindow {
    /// The materialized view-index range.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.first_visible..self.first_visible + self.count
    }

    fn contains(&self, view_row: usize) -> bool {
        self.range().contains(&view_row)
    }
}

/// Receives the widget mutations a repaint decides on.
///
/// The widget adapter provides the toolkit-backed implementation; tests use
/// a recording one.
pub trait RowPresenter {
    /// Materializes a view row with its formatted cell texts, in column order.
    fn mount_row(&self, view_row: usize, cells: &[String]);
    /// Releases the widgets for a view row.
    fn unmount_row(&self, view_row: usize);
}

struct PendingRepaint {
    window: ViewportWindow,
    /// Forces a full rebuild even where the windows overlap (dataset or
    /// formatting changed under the same geometry).
    full: bool,
}

/// Connections into the grid's signals, released when the engine drops.
struct GridSubscriptions {
    data_changed: ConnectionId,
    row_added: ConnectionId,
    row_updated: ConnectionId,
    row_removed: ConnectionId,
}

/// Computes the visible row window and repaints only that window.
pub struct VirtualScrollEngine {
    grid: Arc<GridController>,
    config: RwLock<ViewportConfig>,
    scroll_offset_px: RwLock<f32>,
    /// The currently materialized window.
    window: RwLock<ViewportWindow>,
    /// The newest scheduled repaint; scheduling replaces it wholesale.
    pending: Mutex<Option<PendingRepaint>>,
    subscriptions: Mutex<Option<GridSubscriptions>>,
}

impl VirtualScrollEngine {
    /// Creates an engine over the given grid and schedules the initial
    /// window.
    ///
    /// The engine subscribes to the grid's mutation signals, so a
    /// `set_data`, row mutation, filter, or sort schedules a full repaint
    /// on its own; the panel only has to keep calling [`flush`] each frame.
    ///
    /// [`flush`]: VirtualScrollEngine::flush
    pub fn new(grid: Arc<GridController>, config: ViewportConfig) -> Arc<Self> {
        let engine = Arc::new(Self {
            grid,
            config: RwLock::new(config),
            scroll_offset_px: RwLock::new(0.0),
            window: RwLock::new(ViewportWindow::default()),
            pending: Mutex::new(None),
            subscriptions: Mutex::new(None),
        });
        engine.schedule(false);

        let signals = &engine.grid.signals;
        let subscriptions = GridSubscriptions {
            data_changed: signals.data_changed.connect(Self::full_repaint(&engine)),
            row_added: signals.row_added.connect(Self::full_repaint(&engine)),
            row_updated: signals.row_updated.connect(Self::full_repaint(&engine)),
            row_removed: signals.row_removed.connect(Self::full_repaint(&engine)),
        };
        *engine.subscriptions.lock() = Some(subscriptions);
        engine
    }

    /// A slot scheduling a full repaint, holding the engine weakly so the
    /// grid's signals cannot keep it alive past its panel.
    fn full_repaint<T>(engine: &Arc<Self>) -> impl Fn(&T) + Send + Sync + 'static {
        let weak = Arc::downgrade(engine);
        move |_| {
            if let Some(engine) = weak.upgrade() {
                engine.schedule(true);
            }
        }
    }

    /// The currently materialized window.
    pub fn window(&self) -> ViewportWindow {
        *self.window.read()
    }

    /// Handles a scroll event: records the new offset and schedules a
    /// repaint, superseding any still-pending one.
    pub fn on_scroll(&self, offset_px: f32) {
        *self.scroll_offset_px.write() = offset_px.max(0.0);
        self.schedule(false);
    }

    /// Handles a resize event.
    pub fn on_resize(&self, viewport_height_px: f32) {
        self.config.write().viewport_height_px = viewport_height_px.max(0.0);
        self.schedule(false);
    }

    /// Schedules a full repaint of the current window.
    ///
    /// Grid mutations do this automatically through the signal
    /// subscriptions; call it when row content changed without one, for
    /// example after a theme refresh restyled the formatters' output.
    pub fn invalidate(&self) {
        self.schedule(true);
    }

    fn schedule(&self, full: bool) {
        let window = self.compute_window();
        let mut pending = self.pending.lock();
        // Superseding an unfinished repaint keeps `full` sticky; geometry
        // from the newest event always wins.
        let full = full || pending.as_ref().map_or(false, |p| p.full);
        *pending = Some(PendingRepaint { window, full });
    }

    /// Computes the window implied by the current scroll offset, geometry,
    /// and view length.
    fn compute_window(&self) -> ViewportWindow {
        let config = *self.config.read();
        let offset = *self.scroll_offset_px.read();
        let view_len = self.grid.view_len();

        if view_len == 0 || config.row_height_px <= 0.0 {
            return ViewportWindow::default();
        }

        let first_visible = ((offset / config.row_height_px).floor() as usize).min(view_len);
        let visible = (config.viewport_height_px / config.row_height_px).ceil() as usize;
        let count = (visible + config.overscan).min(view_len - first_visible);

        ViewportWindow {
            first_visible,
            count,
        }
    }

    /// Executes the newest scheduled repaint, if any, against `presenter`.
    ///
    /// Rows in the intersection of the old and new windows are left alone
    /// (unless the repaint was a full invalidation); only entering rows are
    /// mounted and leaving rows unmounted. Disjoint windows — a fast scroll
    /// or jump — rebuild entirely by the same rule.
    ///
    /// Returns the materialized window, or `None` when nothing was pending.
    pub fn flush(&self, presenter: &dyn RowPresenter) -> Option<ViewportWindow> {
        let PendingRepaint { window: new, full } = self.pending.lock().take()?;
        let old = *self.window.read();

        let keep = |row: usize| !full && new.contains(row);
        for row in old.range().filter(|&r| !keep(r)) {
            presenter.unmount_row(row);
        }
        for row in new.range() {
            if !full && old.contains(row) {
                continue;
            }
            match self.grid.format_row(row) {
                Ok(cells) => presenter.mount_row(row, &cells),
                // The view shrank between scheduling and flushing; the row
                // is simply no longer there to show.
                Err(_) => continue,
            }
        }

        *self.window.write() = new;
        trace!(
            target: "trellis::viewport",
            first_visible = new.first_visible,
            count = new.count,
            full,
            "viewport repainted"
        );
        Some(new)
    }

    /// Subscribes the engine to the scroll and resize events of a widget,
    /// typically the grid's scroll container.
    ///
    /// Fails when the active mapping lacks either event; no binding is left
    /// behind on failure.
    pub fn attach(self: Arc<Self>, adapter: &EventAdapter, widget: WidgetId) -> AdapterResult<()> {
        let engine = Arc::clone(&self);
        adapter.bind(widget, events::SCROLLED, move |event| {
            if let UiEvent::Scrolled { offset_px } = event {
                engine.on_scroll(*offset_px);
            }
        })?;
        let engine = self;
        if let Err(err) = adapter.bind(widget, events::RESIZED, move |event| {
            if let UiEvent::Resized { height_px, .. } = event {
                engine.on_resize(*height_px);
            }
        }) {
            adapter.unbind(widget, events::SCROLLED);
            return Err(err);
        }
        Ok(())
    }
}

impl Drop for VirtualScrollEngine {
    fn drop(&mut self) {
        if let Some(subscriptions) = self.subscriptions.lock().take() {
            let signals = &self.grid.signals;
            signals.data_changed.disconnect(subscriptions.data_changed);
            signals.row_added.disconnect(subscriptions.row_added);
            signals.row_updated.disconnect(subscriptions.row_updated);
            signals.row_removed.disconnect(subscriptions.row_removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Column, Row};
    use parking_lot::Mutex as PlMutex;

    fn grid_with(rows: usize) -> Arc<GridController> {
        let grid = GridController::new(vec![Column::new("n", "N")]).unwrap();
        grid.set_data(
            (0..rows)
                .map(|i| Row::new().with("n", i as i64))
                .collect(),
        )
        .unwrap();
        Arc::new(grid)
    }

    fn config() -> ViewportConfig {
        ViewportConfig {
            row_height_px: 20.0,
            viewport_height_px: 200.0,
            overscan: 5,
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        ops: PlMutex<Vec<(&'static str, usize)>>,
    }

    impl RecordingPresenter {
        fn take(&self) -> Vec<(&'static str, usize)> {
            std::mem::take(&mut self.ops.lock())
        }
    }

    impl RowPresenter for RecordingPresenter {
        fn mount_row(&self, view_row: usize, _cells: &[String]) {
            self.ops.lock().push(("mount", view_row));
        }
        fn unmount_row(&self, view_row: usize) {
            self.ops.lock().push(("unmount", view_row));
        }
    }

    #[test]
    fn test_initial_window() {
        let engine = VirtualScrollEngine::new(grid_with(1000), config());
        let presenter = RecordingPresenter::default();
        let window = engine.flush(&presenter).unwrap();

        // 10 visible rows + 5 overscan.
        assert_eq!(window.first_visible, 0);
        assert_eq!(window.count, 15);
        assert_eq!(presenter.take().len(), 15);
    }

    #[test]
    fn test_scroll_offset_moves_window() {
        let engine = VirtualScrollEngine::new(grid_with(1000), config());
        let presenter = RecordingPresenter::default();
        engine.flush(&presenter).unwrap();

        engine.on_scroll(400.0);
        let window = engine.flush(&presenter).unwrap();
        assert_eq!(window.first_visible, 20);
        assert_eq!(window.count, 15);
    }

    #[test]
    fn test_overlapping_windows_diff() {
        let engine = VirtualScrollEngine::new(grid_with(1000), config());
        let presenter = RecordingPresenter::default();
        engine.flush(&presenter).unwrap();
        presenter.take();

        // Old window [0, 15); new window [5, 20): only the edges change.
        engine.on_scroll(100.0);
        engine.flush(&presenter).unwrap();

        let ops = presenter.take();
        let unmounts: Vec<_> = ops.iter().filter(|(op, _)| *op == "unmount").collect();
        let mounts: Vec<_> = ops.iter().filter(|(op, _)| *op == "mount").collect();
        assert_eq!(unmounts.len(), 5); // rows 0..5
        assert_eq!(mounts.len(), 5); // rows 15..20
        assert!(unmounts.iter().all(|(_, r)| *r < 5));
        assert!(mounts.iter().all(|(_, r)| (15..20).contains(r)));
    }

    #[test]
    fn test_disjoint_windows_rebuild() {
        let engine = VirtualScrollEngine::new(grid_with(1000), config());
        let presenter = RecordingPresenter::default();
        engine.flush(&presenter).unwrap();
        presenter.take();

        engine.on_scroll(10_000.0);
        engine.flush(&presenter).unwrap();

        let ops = presenter.take();
        let unmounts = ops.iter().filter(|(op, _)| *op == "unmount").count();
        let mounts = ops.iter().filter(|(op, _)| *op == "mount").count();
        assert_eq!(unmounts, 15);
        assert_eq!(mounts, 15);
    }

    #[test]
    fn test_rapid_scrolls_collapse_to_one_repaint() {
        let engine = VirtualScrollEngine::new(grid_with(1000), config());
        let presenter = RecordingPresenter::default();
        engine.flush(&presenter).unwrap();
        presenter.take();

        engine.on_scroll(200.0);
        engine.on_scroll(400.0);

        // One flush, for the window implied by the second event only.
        let window = engine.flush(&presenter).unwrap();
        assert_eq!(window.first_visible, 20);
        assert!(engine.flush(&presenter).is_none());
    }

    #[test]
    fn test_window_clamped_to_view_len() {
        let engine = VirtualScrollEngine::new(grid_with(12), config());
        let presenter = RecordingPresenter::default();
        let window = engine.flush(&presenter).unwrap();
        assert_eq!(window.count, 12);

        engine.on_scroll(100.0); // first_visible 5, only 7 rows remain
        let window = engine.flush(&presenter).unwrap();
        assert_eq!(window.first_visible, 5);
        assert_eq!(window.count, 7);
    }

    #[test]
    fn test_empty_view_renders_zero_rows() {
        let engine = VirtualScrollEngine::new(grid_with(0), config());
        let presenter = RecordingPresenter::default();
        let window = engine.flush(&presenter).unwrap();
        assert_eq!(window, ViewportWindow::default());
        assert!(presenter.take().is_empty());
    }

    #[test]
    fn test_resize_recomputes_count() {
        let engine = VirtualScrollEngine::new(grid_with(1000), config());
        let presenter = RecordingPresenter::default();
        engine.flush(&presenter).unwrap();

        engine.on_resize(400.0);
        let window = engine.flush(&presenter).unwrap();
        assert_eq!(window.count, 25); // 20 visible + 5 overscan
    }

    #[test]
    fn test_set_data_schedules_repaint_unprompted() {
        let grid = grid_with(100);
        let engine = VirtualScrollEngine::new(grid.clone(), config());
        let presenter = RecordingPresenter::default();
        engine.flush(&presenter).unwrap();
        presenter.take();

        grid.set_data((0..8).map(|i| Row::new().with("n", i as i64)).collect())
            .unwrap();

        // No invalidate() call: the engine heard data_changed itself.
        let window = engine.flush(&presenter).unwrap();
        assert_eq!(window.count, 8);
        let ops = presenter.take();
        assert_eq!(ops.iter().filter(|(op, _)| *op == "unmount").count(), 15);
        assert_eq!(ops.iter().filter(|(op, _)| *op == "mount").count(), 8);
    }

    #[test]
    fn test_row_mutations_schedule_repaint_unprompted() {
        let grid = grid_with(10);
        let engine = VirtualScrollEngine::new(grid.clone(), config());
        let presenter = RecordingPresenter::default();
        engine.flush(&presenter).unwrap();
        presenter.take();

        grid.update_row(0, Row::new().with("n", 99i64)).unwrap();
        assert!(engine.flush(&presenter).is_some());

        grid.remove_row(0).unwrap();
        assert!(engine.flush(&presenter).is_some());

        grid.add_row(Row::new().with("n", 7i64)).unwrap();
        assert!(engine.flush(&presenter).is_some());
    }

    #[test]
    fn test_dropped_engine_disconnects_from_grid() {
        let grid = grid_with(10);
        let engine = VirtualScrollEngine::new(grid.clone(), config());
        assert_eq!(grid.signals.data_changed.connection_count(), 1);

        drop(engine);
        assert_eq!(grid.signals.data_changed.connection_count(), 0);
        assert_eq!(grid.signals.row_updated.connection_count(), 0);
    }

    #[test]
    fn test_invalidate_remounts_everything() {
        let engine = VirtualScrollEngine::new(grid_with(100), config());
        let presenter = RecordingPresenter::default();
        engine.flush(&presenter).unwrap();
        presenter.take();

        engine.invalidate();
        engine.flush(&presenter).unwrap();
        let mounts = presenter
            .take()
            .iter()
            .filter(|(op, _)| *op == "mount")
            .count();
        assert_eq!(mounts, 15);
    }
}
