//! Toolkit-neutral event subscription.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::AdapterResult;

use super::backend::{HookId, NativePayload, ToolkitBackend, WidgetId};
use super::mapping::{events, AdapterMapping};

/// A normalized event, independent of which toolkit produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// The widget's primary action fired (click, Enter, double-click —
    /// whatever the toolkit considers activation).
    Activated,
    /// The selected view rows changed.
    SelectionChanged(Vec<usize>),
    /// The widget scrolled to a new vertical offset.
    Scrolled { offset_px: f32 },
    /// The widget was resized.
    Resized { width_px: f32, height_px: f32 },
    /// An event bound under a name this adapter has no normalization rule
    /// for; the raw payload is passed through.
    Custom {
        name: String,
        payload: NativePayload,
    },
}

/// Handler invoked with normalized events.
pub type EventHandler = Arc<dyn Fn(&UiEvent) + Send + Sync>;

/// Maps abstract event names onto native subscriptions and normalizes the
/// payloads coming back.
///
/// Each `(widget, abstract name)` pair holds at most one binding; binding
/// again replaces the previous handler. [`unbind`] is idempotent, and
/// [`teardown`] releases every hook a widget holds, so panel destruction is
/// deterministic regardless of how bindings accumulated.
///
/// [`unbind`]: EventAdapter::unbind
/// [`teardown`]: EventAdapter::teardown
pub struct EventAdapter {
    backend: Arc<dyn ToolkitBackend>,
    mapping: Arc<AdapterMapping>,
    bindings: Mutex<HashMap<(WidgetId, String), HookId>>,
}

impl EventAdapter {
    /// Creates an adapter over a backend and its mapping table.
    pub fn new(backend: Arc<dyn ToolkitBackend>, mapping: Arc<AdapterMapping>) -> Self {
        Self {
            backend,
            mapping,
            bindings: Mutex::new(HashMap::new()),
        }
    }

    /// Binds `handler` to an abstract event on a widget.
    ///
    /// Fails with [`AdapterError::UnmappedEvent`] when the active mapping
    /// has no native signal for `name`. A payload the normalizer cannot
    /// interpret for `name` is logged and dropped rather than delivered
    /// malformed.
    ///
    /// [`AdapterError::UnmappedEvent`]: crate::AdapterError::UnmappedEvent
    pub fn bind<F>(&self, widget: WidgetId, name: &str, handler: F) -> AdapterResult<()>
    where
        F: Fn(&UiEvent) + Send + Sync + 'static,
    {
        let native = self.mapping.native_event(name)?;
        let abstract_name = name.to_owned();
        let hook = self.backend.bind(
            widget,
            native,
            Arc::new(move |payload: &NativePayload| {
                match normalize(&abstract_name, payload) {
                    Some(event) => handler(&event),
                    None => warn!(
                        target: "trellis::adapter",
                        event = %abstract_name,
                        ?payload,
                        "native payload does not match event shape, dropped"
                    ),
                }
            }),
        )?;

        if let Some(old) = self.bindings.lock().insert((widget, name.to_owned()), hook) {
            self.backend.unbind(old);
        }
        Ok(())
    }

    /// Releases the binding for an abstract event on a widget.
    ///
    /// A name that is not currently bound is a no-op, not an error.
    pub fn unbind(&self, widget: WidgetId, name: &str) {
        if let Some(hook) = self.bindings.lock().remove(&(widget, name.to_owned())) {
            self.backend.unbind(hook);
        }
    }

    /// Releases every binding held for a widget.
    pub fn teardown(&self, widget: WidgetId) {
        let mut bindings = self.bindings.lock();
        let names: Vec<_> = bindings
            .keys()
            .filter(|(w, _)| *w == widget)
            .cloned()
            .collect();
        for key in names {
            if let Some(hook) = bindings.remove(&key) {
                self.backend.unbind(hook);
            }
        }
        debug!(target: "trellis::adapter", ?widget, "event bindings released");
    }

    /// The number of live bindings, across all widgets.
    pub fn binding_count(&self) -> usize {
        self.bindings.lock().len()
    }
}

/// Turns a native payload into the typed event the abstract name promises.
fn normalize(name: &str, payload: &NativePayload) -> Option<UiEvent> {
    match name {
        events::ACTIVATED => Some(UiEvent::Activated),
        events::SELECTION_CHANGED => match payload {
            NativePayload::Indices(indices) => Some(UiEvent::SelectionChanged(indices.clone())),
            NativePayload::None => Some(UiEvent::SelectionChanged(Vec::new())),
            _ => None,
        },
        events::SCROLLED => match payload {
            NativePayload::Scalar(offset) => Some(UiEvent::Scrolled {
                offset_px: *offset as f32,
            }),
            _ => None,
        },
        events::RESIZED => match payload {
            NativePayload::Pair(width, height) => Some(UiEvent::Resized {
                width_px: *width as f32,
                height_px: *height as f32,
            }),
            _ => None,
        },
        other => Some(UiEvent::Custom {
            name: other.to_owned(),
            payload: payload.clone(),
        }),
    }
}
