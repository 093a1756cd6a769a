//! The data-grid model layer.
//!
//! A business panel hands the [`GridController`] a column set and rows; the
//! controller owns the authoritative dataset, the filtered/sorted view, the
//! selection, and dirty-row tracking, and memoizes formatted cell text. The
//! viewport engine (see [`crate::viewport`]) reads the view; widgets only
//! ever see view indices and formatted strings.

mod cell;
mod column;
mod controller;
mod row;

pub use cell::CellValue;
pub use column::{Column, Formatter};
pub use controller::{CompareFn, FilterFn, GridController, GridSignals};
pub use row::Row;
