//! Column descriptors.

use std::fmt;
use std::sync::Arc;

use super::cell::CellValue;

/// Type alias for a cell formatter function.
pub type Formatter = Arc<dyn Fn(&CellValue) -> String + Send + Sync>;

/// Describes one grid column: key, title, display width, editability, and
/// how raw values become display text.
///
/// Keys are unique within a grid; declaration order is display order.
///
/// # Example
///
/// ```
/// use trellis::grid::{CellValue, Column};
///
/// let amount = Column::new("amount", "Amount")
///     .with_width(90)
///     .readonly()
///     .with_formatter(|value| match value {
///         CellValue::Float(v) => format!("{v:.2} €"),
///         other => other.to_string(),
///     });
/// assert_eq!(amount.format(&CellValue::Float(12.5)), "12.50 €");
/// ```
#[derive(Clone)]
pub struct Column {
    key: String,
    title: String,
    width: u32,
    readonly: bool,
    formatter: Option<Formatter>,
}

impl Column {
    /// Creates a column with the given key and display title.
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            width: 100,
            readonly: false,
            formatter: None,
        }
    }

    /// Sets the display width in pixels.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Marks the column read-only.
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Sets a custom formatter for raw values.
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&CellValue) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// The unique column key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The display width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Whether the column rejects edits.
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Formats a raw value with the column's formatter, falling back to the
    /// value's default rendering.
    pub fn format(&self, value: &CellValue) -> String {
        match &self.formatter {
            Some(f) => f(value),
            None => value.to_string(),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("width", &self.width)
            .field("readonly", &self.readonly)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_uses_display() {
        let col = Column::new("name", "Name");
        assert_eq!(col.format(&CellValue::from("Ada")), "Ada");
        assert_eq!(col.format(&CellValue::Null), "");
    }

    #[test]
    fn test_custom_formatter() {
        let col = Column::new("active", "Active").with_formatter(|v| {
            if v.as_bool().unwrap_or(false) {
                "yes".into()
            } else {
                "no".into()
            }
        });
        assert_eq!(col.format(&CellValue::Bool(true)), "yes");
        assert_eq!(col.format(&CellValue::Bool(false)), "no");
    }
}
