//! The cross-toolkit adapter layer.
//!
//! Business panels describe widgets, events, and styles abstractly; the
//! adapter layer translates those descriptions for whichever toolkit is
//! active behind the [`ToolkitBackend`] seam:
//!
//! - [`AdapterMapping`] — the immutable abstract-to-native lookup table,
//!   built once at startup per toolkit.
//! - [`WidgetAdapter`] — materializes [`WidgetDescriptor`] trees as native
//!   widgets, styled through the injected
//!   [`ThemeAdapter`](trellis_style::ThemeAdapter).
//! - [`EventAdapter`] — binds abstract event names to native signals and
//!   normalizes payloads into [`UiEvent`]s, with idempotent unbinding.
//! - [`HeadlessBackend`] — a recording backend for tests.
//!
//! Native handles and native signal types never escape this module's
//! boundary; panels and the grid stack see only [`WidgetId`]s and
//! [`UiEvent`]s.

mod backend;
mod event;
mod headless;
mod mapping;
mod widget;

pub use backend::{HookId, NativeHandler, NativePayload, ToolkitBackend, WidgetId};
pub use event::{EventAdapter, EventHandler, UiEvent};
pub use headless::HeadlessBackend;
pub use mapping::{events, widgets, AdapterMapping, AdapterMappingBuilder};
pub use widget::{GridPresenter, WidgetAdapter, WidgetConfig, WidgetDescriptor};
