//! End-to-end tests for a virtualized grid panel on the headless backend.
//!
//! These drive the whole stack the way a business panel would: descriptors
//! through the widget adapter, native events through the event adapter, row
//! data through the grid controller, and repaints through the viewport
//! engine.

use std::sync::Arc;
use std::time::Duration;

use trellis::adapter::{
    events, widgets, AdapterMapping, EventAdapter, GridPresenter, HeadlessBackend, NativePayload,
    WidgetAdapter, WidgetDescriptor, WidgetId,
};
use trellis::core::WorkerBuilder;
use trellis::grid::{CellValue, Column, GridController, Row};
use trellis::style::{ColorScheme, Platform, StyleTokens, ThemeAdapter};
use trellis::viewport::{ViewportConfig, VirtualScrollEngine};

struct Panel {
    backend: Arc<HeadlessBackend>,
    widget_adapter: Arc<WidgetAdapter>,
    event_adapter: EventAdapter,
    grid: Arc<GridController>,
    grid_widget: WidgetId,
}

fn build_panel(rows: usize) -> Panel {
    let backend = Arc::new(HeadlessBackend::new());
    let mapping = Arc::new(
        AdapterMapping::builder()
            .widget(widgets::PANEL, "HeadlessPanel")
            .widget(widgets::DATA_GRID, "HeadlessGrid")
            .widget(widgets::GRID_ROW, "HeadlessGridRow")
            .event(events::SCROLLED, "scroll-value-changed")
            .event(events::RESIZED, "size-allocated")
            .build(),
    );
    let theme = ThemeAdapter::new(Platform::Linux, 1.0).with_scheme(ColorScheme::Light);
    let widget_adapter = Arc::new(WidgetAdapter::new(
        backend.clone(),
        mapping.clone(),
        theme,
        StyleTokens::default(),
    ));
    let event_adapter = EventAdapter::new(backend.clone(), mapping);

    let grid = GridController::new(vec![
        Column::new("id", "Id"),
        Column::new("name", "Name"),
        Column::new("balance", "Balance").with_formatter(|v| match v {
            CellValue::Float(b) => format!("{b:.2} €"),
            other => other.to_string(),
        }),
    ])
    .unwrap();
    grid.set_data(
        (0..rows)
            .map(|i| {
                Row::new()
                    .with("id", i as i64)
                    .with("name", format!("Customer {i}"))
                    .with("balance", i as f64 * 10.0)
            })
            .collect(),
    )
    .unwrap();

    let grid_widget = widget_adapter
        .create(
            &WidgetDescriptor::new(widgets::PANEL)
                .with_child(WidgetDescriptor::new(widgets::DATA_GRID)),
        )
        .map(|panel| backend.children(panel)[0])
        .unwrap();

    Panel {
        backend,
        widget_adapter,
        event_adapter,
        grid: Arc::new(grid),
        grid_widget,
    }
}

fn viewport_config() -> ViewportConfig {
    ViewportConfig {
        row_height_px: 20.0,
        viewport_height_px: 200.0,
        overscan: 5,
    }
}

#[test]
fn test_initial_paint_mounts_only_the_window() {
    let panel = build_panel(1000);
    let presenter = GridPresenter::new(panel.widget_adapter.clone(), panel.grid_widget);
    let engine = VirtualScrollEngine::new(panel.grid.clone(), viewport_config());

    let window = engine.flush(&presenter).unwrap();
    assert_eq!(window.first_visible, 0);
    assert_eq!(window.count, 15);
    assert_eq!(panel.backend.children(panel.grid_widget).len(), 15);
}

#[test]
fn test_native_scroll_moves_the_window() {
    let panel = build_panel(1000);
    let presenter = GridPresenter::new(panel.widget_adapter.clone(), panel.grid_widget);
    let engine = VirtualScrollEngine::new(panel.grid.clone(), viewport_config());
    engine.clone().attach(&panel.event_adapter, panel.grid_widget).unwrap();
    engine.flush(&presenter).unwrap();

    panel.backend.fire(
        panel.grid_widget,
        "scroll-value-changed",
        NativePayload::Scalar(400.0),
    );
    let window = engine.flush(&presenter).unwrap();
    assert_eq!(window.first_visible, 20);
    assert_eq!(window.count, 15);
    // Still only one window's worth of row widgets.
    assert_eq!(panel.backend.children(panel.grid_widget).len(), 15);
}

#[test]
fn test_rapid_native_scrolls_collapse_to_one_repaint() {
    let panel = build_panel(1000);
    let presenter = GridPresenter::new(panel.widget_adapter.clone(), panel.grid_widget);
    let engine = VirtualScrollEngine::new(panel.grid.clone(), viewport_config());
    engine.clone().attach(&panel.event_adapter, panel.grid_widget).unwrap();
    engine.flush(&presenter).unwrap();

    for offset in [100.0, 400.0] {
        panel.backend.fire(
            panel.grid_widget,
            "scroll-value-changed",
            NativePayload::Scalar(offset),
        );
    }
    let window = engine.flush(&presenter).unwrap();
    assert_eq!(window.first_visible, 20);
    assert!(engine.flush(&presenter).is_none());
}

#[test]
fn test_native_resize_grows_the_window() {
    let panel = build_panel(1000);
    let presenter = GridPresenter::new(panel.widget_adapter.clone(), panel.grid_widget);
    let engine = VirtualScrollEngine::new(panel.grid.clone(), viewport_config());
    engine.clone().attach(&panel.event_adapter, panel.grid_widget).unwrap();
    engine.flush(&presenter).unwrap();

    panel.backend.fire(
        panel.grid_widget,
        "size-allocated",
        NativePayload::Pair(640.0, 400.0),
    );
    let window = engine.flush(&presenter).unwrap();
    assert_eq!(window.count, 25);
    assert_eq!(panel.backend.children(panel.grid_widget).len(), 25);
}

#[test]
fn test_filter_shrinks_view_and_repaint_follows() {
    let panel = build_panel(30);
    let presenter = GridPresenter::new(panel.widget_adapter.clone(), panel.grid_widget);
    let engine = VirtualScrollEngine::new(panel.grid.clone(), viewport_config());
    engine.flush(&presenter).unwrap();

    panel
        .grid
        .apply_filter(|row| matches!(row.get("id"), Some(CellValue::Int(id)) if id % 10 == 0));
    assert_eq!(panel.grid.view_len(), 3);

    // The engine heard data_changed; no manual invalidation needed.
    let window = engine.flush(&presenter).unwrap();
    assert_eq!(window.count, 3);
    assert_eq!(panel.backend.children(panel.grid_widget).len(), 3);
}

#[test]
fn test_update_row_refreshes_formatted_text() {
    let panel = build_panel(10);
    let presenter = GridPresenter::new(panel.widget_adapter.clone(), panel.grid_widget);
    let engine = VirtualScrollEngine::new(panel.grid.clone(), viewport_config());
    engine.flush(&presenter).unwrap();

    panel
        .grid
        .update_row(
            0,
            Row::new()
                .with("id", 0i64)
                .with("name", "Renamed AG")
                .with("balance", 999.0),
        )
        .unwrap();
    engine.flush(&presenter).unwrap();

    let texts: Vec<String> = panel
        .backend
        .children(panel.grid_widget)
        .into_iter()
        .filter_map(|child| panel.backend.config(child).and_then(|c| c.text))
        .collect();
    assert!(texts.iter().any(|t| t.contains("Renamed AG")));
    assert!(texts.iter().any(|t| t.contains("999.00 €")));
}

#[test]
fn test_set_data_repaints_mounted_rows() {
    let panel = build_panel(100);
    let presenter = GridPresenter::new(panel.widget_adapter.clone(), panel.grid_widget);
    let engine = VirtualScrollEngine::new(panel.grid.clone(), viewport_config());
    engine.flush(&presenter).unwrap();
    assert_eq!(panel.backend.children(panel.grid_widget).len(), 15);

    panel
        .grid
        .set_data(vec![Row::new()
            .with("id", 0i64)
            .with("name", "Fresh GmbH")
            .with("balance", 1.5)])
        .unwrap();

    // The replacement reaches the screen with no panel-side wiring.
    let window = engine.flush(&presenter).unwrap();
    assert_eq!(window.count, 1);
    let children = panel.backend.children(panel.grid_widget);
    assert_eq!(children.len(), 1);
    let text = panel.backend.config(children[0]).and_then(|c| c.text).unwrap();
    assert!(text.contains("Fresh GmbH"));
}

#[test]
fn test_teardown_releases_widgets_and_hooks() {
    let panel = build_panel(100);
    let presenter = GridPresenter::new(panel.widget_adapter.clone(), panel.grid_widget);
    let engine = VirtualScrollEngine::new(panel.grid.clone(), viewport_config());
    engine.clone().attach(&panel.event_adapter, panel.grid_widget).unwrap();
    engine.flush(&presenter).unwrap();
    assert!(panel.backend.hook_count(panel.grid_widget) > 0);

    panel.event_adapter.teardown(panel.grid_widget);
    panel.widget_adapter.destroy(panel.grid_widget).unwrap();
    assert_eq!(panel.backend.hook_count(panel.grid_widget), 0);
    // The grid and all mounted row widgets are gone; the panel remains.
    assert_eq!(panel.backend.widget_count(), 1);
}

#[test]
fn test_superseded_background_stats_never_reach_the_panel() {
    let panel = build_panel(1000);
    let worker = WorkerBuilder::new().name("stats-worker").build::<f64>();

    // Two stats requests for the same target; the first is slow and must be
    // discarded once the second supersedes it.
    worker.submit("balance-total", || {
        std::thread::sleep(Duration::from_millis(50));
        1.0
    });
    worker.submit("balance-total", || 2.0);
    worker.join();

    let mut delivered = Vec::new();
    worker.drain_results(|target, total| {
        assert_eq!(target, "balance-total");
        delivered.push(total);
    });
    assert_eq!(delivered, vec![2.0]);
    drop(panel);
}
