//! Abstract widget construction.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error};
use trellis_style::{StyleTokens, ThemeAdapter};

use crate::error::AdapterResult;
use crate::viewport::RowPresenter;

use super::backend::{ToolkitBackend, WidgetId};
use super::mapping::{widgets, AdapterMapping};

/// Toolkit-neutral widget properties.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    /// Initial text content, where the widget kind has any.
    pub text: Option<String>,
    /// Requested width in pixels, toolkit default when absent.
    pub width: Option<u32>,
    /// Requested height in pixels, toolkit default when absent.
    pub height: Option<u32>,
    /// Whether the widget accepts interaction.
    pub enabled: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            text: None,
            width: None,
            height: None,
            enabled: true,
        }
    }
}

/// A declarative description of a widget subtree.
///
/// Panels build these and hand them to [`WidgetAdapter::create`]; nothing
/// about a descriptor is toolkit-specific.
///
/// # Example
///
/// ```
/// use trellis::adapter::{widgets, WidgetDescriptor};
///
/// let panel = WidgetDescriptor::new(widgets::PANEL)
///     .with_child(WidgetDescriptor::new(widgets::LABEL).with_text("Customers"))
///     .with_child(WidgetDescriptor::new(widgets::DATA_GRID));
/// assert_eq!(panel.children.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetDescriptor {
    /// Abstract widget kind, resolved through the mapping table.
    pub kind: String,
    /// Initial properties.
    pub config: WidgetConfig,
    /// Child descriptors, created parented to this widget.
    pub children: Vec<WidgetDescriptor>,
}

impl WidgetDescriptor {
    /// Creates a descriptor for the given abstract kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Sets the initial text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.config.text = Some(text.into());
        self
    }

    /// Sets the requested size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = Some(width);
        self.config.height = Some(height);
        self
    }

    /// Creates the widget disabled.
    pub fn disabled(mut self) -> Self {
        self.config.enabled = false;
        self
    }

    /// Appends a child descriptor.
    pub fn with_child(mut self, child: WidgetDescriptor) -> Self {
        self.children.push(child);
        self
    }
}

/// Translates abstract widget descriptors into native widgets, styled by
/// the injected theme.
///
/// The adapter owns no global state: backend, mapping, and theme are all
/// passed in at construction, so two toolkits (or two themes) can coexist
/// in one process during a migration.
pub struct WidgetAdapter {
    backend: Arc<dyn ToolkitBackend>,
    mapping: Arc<AdapterMapping>,
    theme: RwLock<ThemeAdapter>,
    tokens: StyleTokens,
}

impl WidgetAdapter {
    /// Creates an adapter from its collaborators.
    pub fn new(
        backend: Arc<dyn ToolkitBackend>,
        mapping: Arc<AdapterMapping>,
        theme: ThemeAdapter,
        tokens: StyleTokens,
    ) -> Self {
        Self {
            backend,
            mapping,
            theme: RwLock::new(theme),
            tokens,
        }
    }

    /// The backend this adapter drives.
    pub fn backend(&self) -> &Arc<dyn ToolkitBackend> {
        &self.backend
    }

    /// Materializes a descriptor subtree as native widgets and returns the
    /// root's handle.
    ///
    /// Fails with [`AdapterError::UnmappedWidget`] when a kind has no
    /// mapping (and no explicit generic is registered). On any failure the
    /// partially built subtree is destroyed before the error is returned,
    /// so a failed creation leaks nothing.
    ///
    /// [`AdapterError::UnmappedWidget`]: crate::AdapterError::UnmappedWidget
    pub fn create(&self, descriptor: &WidgetDescriptor) -> AdapterResult<WidgetId> {
        let root = self.create_subtree(descriptor, None);
        if let Err(err) = &root {
            debug!(
                target: "trellis::adapter",
                kind = %descriptor.kind,
                %err,
                "widget creation failed"
            );
        }
        root
    }

    fn create_subtree(
        &self,
        descriptor: &WidgetDescriptor,
        parent: Option<WidgetId>,
    ) -> AdapterResult<WidgetId> {
        let native = self.mapping.native_widget(&descriptor.kind)?;
        let widget = self
            .backend
            .create_widget(native, &descriptor.config, parent)?;
        let style = self.theme.read().resolve(&self.tokens);
        if let Err(err) = self
            .backend
            .apply_style(widget, &style)
            .and_then(|()| {
                descriptor
                    .children
                    .iter()
                    .try_for_each(|child| self.create_subtree(child, Some(widget)).map(|_| ()))
            })
        {
            let _ = self.backend.destroy_widget(widget);
            return Err(err);
        }
        Ok(widget)
    }

    /// Destroys a widget subtree.
    ///
    /// Event bindings are the [`EventAdapter`](super::EventAdapter)'s to
    /// release; call its `teardown` first.
    pub fn destroy(&self, widget: WidgetId) -> AdapterResult<()> {
        self.backend.destroy_widget(widget)
    }

    /// Re-detects the system color scheme and, when it changed, restyles
    /// the given widgets. Returns `true` if the scheme changed.
    pub fn refresh_theme(&self, widgets: &[WidgetId]) -> bool {
        let changed = self.theme.write().refresh();
        if changed {
            let style = self.theme.read().resolve(&self.tokens);
            for &widget in widgets {
                if let Err(err) = self.backend.apply_style(widget, &style) {
                    error!(target: "trellis::adapter", ?widget, %err, "restyle failed");
                }
            }
        }
        changed
    }
}

/// Presents grid rows as native row widgets under a grid widget.
///
/// This is the bridge the viewport engine pushes its mount/unmount
/// decisions through: each mounted view row becomes one
/// [`widgets::GRID_ROW`] child of the grid, its cells pre-formatted and
/// tab-joined.
pub struct GridPresenter {
    adapter: Arc<WidgetAdapter>,
    grid_widget: WidgetId,
    rows: Mutex<HashMap<usize, WidgetId>>,
}

impl GridPresenter {
    /// Creates a presenter mounting rows under `grid_widget`.
    pub fn new(adapter: Arc<WidgetAdapter>, grid_widget: WidgetId) -> Self {
        Self {
            adapter,
            grid_widget,
            rows: Mutex::new(HashMap::new()),
        }
    }

    /// The number of currently mounted row widgets.
    pub fn mounted_count(&self) -> usize {
        self.rows.lock().len()
    }
}

impl RowPresenter for GridPresenter {
    fn mount_row(&self, view_row: usize, cells: &[String]) {
        let descriptor = WidgetDescriptor::new(widgets::GRID_ROW).with_text(cells.join("\t"));
        match self.adapter.create_subtree(&descriptor, Some(self.grid_widget)) {
            Ok(widget) => {
                if let Some(old) = self.rows.lock().insert(view_row, widget) {
                    // Remounting over a live row replaces its widget.
                    let _ = self.adapter.destroy(old);
                }
            }
            Err(err) => {
                error!(target: "trellis::adapter", view_row, %err, "row mount failed");
            }
        }
    }

    fn unmount_row(&self, view_row: usize) {
        if let Some(widget) = self.rows.lock().remove(&view_row) {
            let _ = self.adapter.destroy(widget);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::headless::HeadlessBackend;
    use super::*;
    use crate::error::AdapterError;
    use trellis_style::{ColorScheme, Platform};

    fn theme() -> ThemeAdapter {
        ThemeAdapter::new(Platform::Linux, 1.0).with_scheme(ColorScheme::Light)
    }

    fn adapter_with(mapping: AdapterMapping) -> (Arc<HeadlessBackend>, WidgetAdapter) {
        let backend = Arc::new(HeadlessBackend::new());
        let adapter = WidgetAdapter::new(
            backend.clone(),
            Arc::new(mapping),
            theme(),
            StyleTokens::default(),
        );
        (backend, adapter)
    }

    #[test]
    fn test_create_maps_kind_and_styles() {
        let mapping = AdapterMapping::builder()
            .widget(widgets::LABEL, "HLabel")
            .build();
        let (backend, adapter) = adapter_with(mapping);

        let label = adapter
            .create(&WidgetDescriptor::new(widgets::LABEL).with_text("Customers"))
            .unwrap();
        assert_eq!(backend.native_kind(label).as_deref(), Some("HLabel"));
        assert_eq!(
            backend.config(label).and_then(|c| c.text),
            Some("Customers".to_owned())
        );
        assert!(backend.style(label).is_some());
    }

    #[test]
    fn test_create_builds_subtree_parented() {
        let mapping = AdapterMapping::builder()
            .widget(widgets::PANEL, "HPanel")
            .widget(widgets::LABEL, "HLabel")
            .build();
        let (backend, adapter) = adapter_with(mapping);

        let panel = adapter
            .create(
                &WidgetDescriptor::new(widgets::PANEL)
                    .with_child(WidgetDescriptor::new(widgets::LABEL))
                    .with_child(WidgetDescriptor::new(widgets::LABEL)),
            )
            .unwrap();
        assert_eq!(backend.children(panel).len(), 2);
        assert_eq!(backend.widget_count(), 3);
    }

    #[test]
    fn test_unmapped_kind_fails_without_leaking() {
        let mapping = AdapterMapping::builder()
            .widget(widgets::PANEL, "HPanel")
            .build();
        let (backend, adapter) = adapter_with(mapping);

        let result = adapter.create(
            &WidgetDescriptor::new(widgets::PANEL)
                .with_child(WidgetDescriptor::new(widgets::DATA_GRID)),
        );
        assert_eq!(
            result,
            Err(AdapterError::UnmappedWidget {
                kind: widgets::DATA_GRID.into()
            })
        );
        // The partially built panel was torn down again.
        assert_eq!(backend.widget_count(), 0);
    }

    #[test]
    fn test_grid_presenter_mounts_and_unmounts_rows() {
        let mapping = AdapterMapping::builder()
            .widget(widgets::DATA_GRID, "HGrid")
            .widget(widgets::GRID_ROW, "HGridRow")
            .build();
        let (backend, adapter) = adapter_with(mapping);
        let adapter = Arc::new(adapter);

        let grid = adapter
            .create(&WidgetDescriptor::new(widgets::DATA_GRID))
            .unwrap();
        let presenter = GridPresenter::new(adapter, grid);

        presenter.mount_row(0, &["a".into(), "b".into()]);
        presenter.mount_row(1, &["c".into(), "d".into()]);
        assert_eq!(presenter.mounted_count(), 2);
        assert_eq!(backend.children(grid).len(), 2);

        presenter.unmount_row(0);
        presenter.unmount_row(0); // idempotent
        assert_eq!(presenter.mounted_count(), 1);
        assert_eq!(backend.children(grid).len(), 1);
    }
}
