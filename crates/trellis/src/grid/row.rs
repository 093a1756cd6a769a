//! Row value objects.

use super::cell::CellValue;

/// An ordered mapping from column key to raw value.
///
/// Rows are value objects: the controller clones them in and out of its
/// collections and they are never aliased outside it. A row carries no
/// identity of its own beyond its position unless the caller includes an id
/// column.
///
/// # Example
///
/// ```
/// use trellis::grid::{CellValue, Row};
///
/// let row = Row::new()
///     .with("name", "ACME GmbH")
///     .with("balance", CellValue::Float(1042.5));
/// assert_eq!(row.get("name").and_then(|v| v.as_text()), Some("ACME GmbH"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a cell, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Adds or replaces a cell.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(cell) = self.cells.iter_mut().find(|(k, _)| *k == key) {
            cell.1 = value;
        } else {
            self.cells.push((key, value));
        }
    }

    /// Looks up a cell value by column key.
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Iterates cells in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(k, v);
        }
        row
    }
}
