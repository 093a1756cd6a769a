//! A backend with no toolkit behind it.
//!
//! [`HeadlessBackend`] records every widget, style, and event subscription
//! it is handed, and lets callers fire native events by hand. Integration
//! tests drive the whole adapter + grid + viewport stack against it; it is
//! also the reference for what a real toolkit backend has to do.

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::SlotMap;
use trellis_style::ResolvedStyle;

use crate::error::{AdapterError, AdapterResult};

use super::backend::{HookId, NativeHandler, NativePayload, ToolkitBackend, WidgetId};
use super::widget::WidgetConfig;

#[derive(Clone)]
struct WidgetRecord {
    native_kind: String,
    config: WidgetConfig,
    parent: Option<WidgetId>,
    style: Option<ResolvedStyle>,
}

struct HookRecord {
    widget: WidgetId,
    native_event: String,
    handler: NativeHandler,
}

/// In-memory [`ToolkitBackend`] for tests and tooling.
#[derive(Default)]
pub struct HeadlessBackend {
    widgets: Mutex<SlotMap<WidgetId, WidgetRecord>>,
    hooks: Mutex<SlotMap<HookId, HookRecord>>,
}

impl HeadlessBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of live widgets.
    pub fn widget_count(&self) -> usize {
        self.widgets.lock().len()
    }

    /// The native kind a widget was created as.
    pub fn native_kind(&self, widget: WidgetId) -> Option<String> {
        self.widgets
            .lock()
            .get(widget)
            .map(|r| r.native_kind.clone())
    }

    /// The config a widget was created with.
    pub fn config(&self, widget: WidgetId) -> Option<WidgetConfig> {
        self.widgets.lock().get(widget).map(|r| r.config.clone())
    }

    /// The last style applied to a widget.
    pub fn style(&self, widget: WidgetId) -> Option<ResolvedStyle> {
        self.widgets.lock().get(widget).and_then(|r| r.style.clone())
    }

    /// Live children of a widget, in creation order.
    pub fn children(&self, widget: WidgetId) -> Vec<WidgetId> {
        self.widgets
            .lock()
            .iter()
            .filter(|(_, r)| r.parent == Some(widget))
            .map(|(id, _)| id)
            .collect()
    }

    /// The number of live subscriptions on a widget.
    pub fn hook_count(&self, widget: WidgetId) -> usize {
        self.hooks
            .lock()
            .iter()
            .filter(|(_, h)| h.widget == widget)
            .count()
    }

    /// Fires a native event on a widget, invoking every matching handler.
    pub fn fire(&self, widget: WidgetId, native_event: &str, payload: NativePayload) {
        // Handlers may call back into the backend; invoke outside the lock.
        let handlers: Vec<NativeHandler> = self
            .hooks
            .lock()
            .iter()
            .filter(|(_, h)| h.widget == widget && h.native_event == native_event)
            .map(|(_, h)| Arc::clone(&h.handler))
            .collect();
        for handler in handlers {
            handler(&payload);
        }
    }
}

impl ToolkitBackend for HeadlessBackend {
    fn create_widget(
        &self,
        native_kind: &str,
        config: &WidgetConfig,
        parent: Option<WidgetId>,
    ) -> AdapterResult<WidgetId> {
        let mut widgets = self.widgets.lock();
        if let Some(parent) = parent {
            if !widgets.contains_key(parent) {
                return Err(AdapterError::UnknownWidget);
            }
        }
        Ok(widgets.insert(WidgetRecord {
            native_kind: native_kind.to_owned(),
            config: config.clone(),
            parent,
            style: None,
        }))
    }

    fn destroy_widget(&self, widget: WidgetId) -> AdapterResult<()> {
        let removed = {
            let mut widgets = self.widgets.lock();
            if widgets.remove(widget).is_none() {
                return Err(AdapterError::UnknownWidget);
            }
            // Cascade to descendants.
            let mut removed = vec![widget];
            let mut frontier = vec![widget];
            while let Some(current) = frontier.pop() {
                let children: Vec<WidgetId> = widgets
                    .iter()
                    .filter(|(_, r)| r.parent == Some(current))
                    .map(|(id, _)| id)
                    .collect();
                for child in children {
                    widgets.remove(child);
                    removed.push(child);
                    frontier.push(child);
                }
            }
            removed
        };
        self.hooks
            .lock()
            .retain(|_, hook| !removed.contains(&hook.widget));
        Ok(())
    }

    fn apply_style(&self, widget: WidgetId, style: &ResolvedStyle) -> AdapterResult<()> {
        let mut widgets = self.widgets.lock();
        let record = widgets.get_mut(widget).ok_or(AdapterError::UnknownWidget)?;
        record.style = Some(style.clone());
        Ok(())
    }

    fn bind(
        &self,
        widget: WidgetId,
        native_event: &str,
        handler: NativeHandler,
    ) -> AdapterResult<HookId> {
        if !self.widgets.lock().contains_key(widget) {
            return Err(AdapterError::UnknownWidget);
        }
        Ok(self.hooks.lock().insert(HookRecord {
            widget,
            native_event: native_event.to_owned(),
            handler,
        }))
    }

    fn unbind(&self, hook: HookId) {
        self.hooks.lock().remove(hook);
    }
}
