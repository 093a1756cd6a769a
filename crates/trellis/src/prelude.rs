//! Convenience re-exports for panel code.
//!
//! ```
//! use trellis::prelude::*;
//! ```

pub use crate::adapter::{
    events, widgets, AdapterMapping, EventAdapter, GridPresenter, HeadlessBackend, ToolkitBackend,
    UiEvent, WidgetAdapter, WidgetDescriptor, WidgetId,
};
pub use crate::error::{AdapterError, AdapterResult, GridError, GridResult};
pub use crate::grid::{CellValue, Column, GridController, Row};
pub use crate::viewport::{RowPresenter, ViewportConfig, ViewportWindow, VirtualScrollEngine};

pub use trellis_style::{ColorScheme, Platform, StyleTokens, ThemeAdapter};
