//! The static abstract-to-native mapping table.

use std::collections::HashMap;

use crate::error::{AdapterError, AdapterResult};

/// Abstract widget kinds panels commonly describe.
///
/// The set is open: any string a mapping registers is a valid kind. These
/// constants just keep panels and mappings spelling the common ones the
/// same way.
pub mod widgets {
    pub const WINDOW: &str = "window";
    pub const PANEL: &str = "panel";
    pub const LABEL: &str = "label";
    pub const BUTTON: &str = "button";
    pub const TEXT_INPUT: &str = "text-input";
    pub const DATA_GRID: &str = "data-grid";
    pub const GRID_ROW: &str = "grid-row";
}

/// Abstract event names the [`EventAdapter`](super::EventAdapter) knows how
/// to normalize.
pub mod events {
    pub const ACTIVATED: &str = "activated";
    pub const SELECTION_CHANGED: &str = "selection-changed";
    pub const SCROLLED: &str = "scrolled";
    pub const RESIZED: &str = "resized";
}

/// Immutable table from abstract widget kinds and event names to the
/// toolkit-native identifiers a backend understands.
///
/// Built once at startup per active toolkit and never mutated afterwards.
/// Lookups are by exact key; a widget lookup may fall back to an *explicitly
/// registered* generic kind for toolkits that lack a specialized widget.
/// There is no implicit fallback — an unmapped kind without a generic entry
/// is an [`AdapterError::UnmappedWidget`], because guessing a widget would
/// mask integration bugs.
///
/// # Example
///
/// ```
/// use trellis::adapter::{widgets, AdapterMapping};
///
/// let mapping = AdapterMapping::builder()
///     .widget(widgets::LABEL, "GtkLabel")
///     .widget(widgets::BUTTON, "GtkButton")
///     .generic_widget("GtkBox")
///     .event("activated", "clicked")
///     .build();
/// assert_eq!(mapping.native_widget(widgets::LABEL).unwrap(), "GtkLabel");
/// // No specialized data grid: the explicit generic applies.
/// assert_eq!(mapping.native_widget(widgets::DATA_GRID).unwrap(), "GtkBox");
/// ```
#[derive(Debug, Clone, Default)]
pub struct AdapterMapping {
    widgets: HashMap<String, String>,
    events: HashMap<String, String>,
    generic_widget: Option<String>,
}

impl AdapterMapping {
    /// Starts building a mapping table.
    pub fn builder() -> AdapterMappingBuilder {
        AdapterMappingBuilder::default()
    }

    /// Resolves an abstract widget kind to its native constructor name.
    pub fn native_widget(&self, kind: &str) -> AdapterResult<&str> {
        self.widgets
            .get(kind)
            .or(self.generic_widget.as_ref())
            .map(String::as_str)
            .ok_or_else(|| AdapterError::UnmappedWidget { kind: kind.into() })
    }

    /// Resolves an abstract event name to its native signal name.
    ///
    /// Events never fall back: binding the wrong native signal would
    /// deliver payloads the normalizer cannot interpret.
    pub fn native_event(&self, name: &str) -> AdapterResult<&str> {
        self.events
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AdapterError::UnmappedEvent { name: name.into() })
    }
}

/// Builder for [`AdapterMapping`].
#[derive(Debug, Default)]
pub struct AdapterMappingBuilder {
    mapping: AdapterMapping,
}

impl AdapterMappingBuilder {
    /// Maps an abstract widget kind to a native constructor name. Later
    /// registrations for the same kind replace earlier ones.
    pub fn widget(mut self, kind: impl Into<String>, native: impl Into<String>) -> Self {
        self.mapping.widgets.insert(kind.into(), native.into());
        self
    }

    /// Registers the fallback native widget used for kinds without a
    /// specialized entry.
    pub fn generic_widget(mut self, native: impl Into<String>) -> Self {
        self.mapping.generic_widget = Some(native.into());
        self
    }

    /// Maps an abstract event name to a native signal name.
    pub fn event(mut self, name: impl Into<String>, native: impl Into<String>) -> Self {
        self.mapping.events.insert(name.into(), native.into());
        self
    }

    /// Finalizes the table.
    pub fn build(self) -> AdapterMapping {
        self.mapping
    }
}
