//! The toolkit backend seam.
//!
//! [`ToolkitBackend`] is the only trait a concrete GUI toolkit has to
//! implement to host trellis panels. Everything above it — widget and event
//! adapters, the viewport engine — speaks in [`WidgetId`]s, abstract
//! descriptors, and resolved styles; native widget handles and native signal
//! types never cross this boundary.

use std::sync::Arc;

use slotmap::new_key_type;
use trellis_style::ResolvedStyle;

use crate::error::AdapterResult;

use super::widget::WidgetConfig;

new_key_type! {
    /// Opaque handle to a backend-owned widget.
    pub struct WidgetId;

    /// Opaque handle to one native event subscription.
    pub struct HookId;
}

/// The loosely typed payload a native event hook delivers.
///
/// Toolkits disagree on callback signatures; backends squeeze whatever the
/// native signal carries into one of these shapes, and the
/// [`EventAdapter`](super::EventAdapter) turns the shape into a typed
/// [`UiEvent`](super::UiEvent) based on the abstract event it was bound for.
#[derive(Debug, Clone, PartialEq)]
pub enum NativePayload {
    /// The event carries no data (a plain trigger).
    None,
    /// A list of indices, e.g. the selected rows.
    Indices(Vec<usize>),
    /// A single scalar, e.g. a scroll offset in pixels.
    Scalar(f64),
    /// Two scalars, e.g. a width/height pair.
    Pair(f64, f64),
}

/// Callback a backend invokes when a bound native event fires.
pub type NativeHandler = Arc<dyn Fn(&NativePayload) + Send + Sync>;

/// Operations a concrete toolkit exposes to the adapter layer.
///
/// All methods take `&self`; backends wrap their toolkit state in interior
/// mutability the same way the rest of the crate does. Backends are not
/// required to be thread-safe beyond `Send + Sync` bounds — the adapter
/// layer only ever calls them from the UI thread.
pub trait ToolkitBackend: Send + Sync {
    /// Creates a native widget of the given *native* kind (already mapped
    /// from the abstract kind), optionally parented.
    fn create_widget(
        &self,
        native_kind: &str,
        config: &WidgetConfig,
        parent: Option<WidgetId>,
    ) -> AdapterResult<WidgetId>;

    /// Destroys a widget and all its native resources. Children are the
    /// backend's responsibility.
    fn destroy_widget(&self, widget: WidgetId) -> AdapterResult<()>;

    /// Applies a resolved style to a widget.
    fn apply_style(&self, widget: WidgetId, style: &ResolvedStyle) -> AdapterResult<()>;

    /// Subscribes `handler` to a *native* event on a widget.
    fn bind(
        &self,
        widget: WidgetId,
        native_event: &str,
        handler: NativeHandler,
    ) -> AdapterResult<HookId>;

    /// Releases a subscription. Unknown or already-released hooks are
    /// ignored.
    fn unbind(&self, hook: HookId);
}
