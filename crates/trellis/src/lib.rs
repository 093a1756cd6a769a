//! Trellis - a cross-toolkit UI adapter and virtualized data-grid engine.
//!
//! Trellis lets desktop business panels describe widgets, events, and
//! styles in a toolkit-neutral way and render large, filterable, sortable
//! row collections without re-rendering the whole dataset on every
//! interaction. It grew out of migrating a line-of-business application
//! between two GUI toolkits: panels written against trellis run unchanged
//! on either side of the migration.
//!
//! The crate splits into three layers:
//!
//! - [`grid`] — the [`GridController`](grid::GridController): authoritative
//!   dataset, filtered/sorted view, selection, dirty-row tracking, and
//!   memoized cell formatting.
//! - [`viewport`] — the [`VirtualScrollEngine`](viewport::VirtualScrollEngine):
//!   computes the visible row window and repaints only that window.
//! - [`adapter`] — widget/event/theme adaptation over the
//!   [`ToolkitBackend`](adapter::ToolkitBackend) seam.
//!
//! Style tokens and theming come from [`trellis_style`], re-exported as
//! [`style`]; signals, the LRU cache, and the background worker come from
//! [`trellis_core`], re-exported as [`core`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use trellis::adapter::{widgets, AdapterMapping, HeadlessBackend, WidgetAdapter,
//!     WidgetDescriptor};
//! use trellis::grid::{CellValue, Column, GridController, Row};
//! use trellis::style::{ColorScheme, Platform, StyleTokens, ThemeAdapter};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let grid = GridController::new(vec![
//!         Column::new("name", "Name"),
//!         Column::new("balance", "Balance")
//!             .with_formatter(|v| match v {
//!                 CellValue::Float(b) => format!("{b:.2} €"),
//!                 other => other.to_string(),
//!             }),
//!     ])?;
//!     grid.set_data(vec![
//!         Row::new().with("name", "ACME GmbH").with("balance", 1042.5),
//!     ])?;
//!
//!     let backend = Arc::new(HeadlessBackend::new());
//!     let mapping = Arc::new(
//!         AdapterMapping::builder()
//!             .widget(widgets::DATA_GRID, "HeadlessGrid")
//!             .build(),
//!     );
//!     let theme = ThemeAdapter::new(Platform::Linux, 1.0).with_scheme(ColorScheme::Light);
//!     let adapter = WidgetAdapter::new(backend, mapping, theme, StyleTokens::default());
//!     let _grid_widget = adapter.create(&WidgetDescriptor::new(widgets::DATA_GRID))?;
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod error;
pub mod grid;
pub mod prelude;
pub mod viewport;

pub use error::{AdapterError, AdapterResult, GridError, GridResult};

/// Signals, LRU cache, and background worker primitives.
pub mod core {
    pub use trellis_core::*;
}

/// Style tokens, palettes, and the theme adapter.
pub mod style {
    pub use trellis_style::*;
}
