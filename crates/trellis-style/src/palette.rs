//! Color palette definitions.

use crate::color::Color;

/// A color palette for theming.
///
/// Palettes carry the abstract color roles panels refer to; which palette is
/// active is decided by the [`ColorScheme`](crate::ColorScheme).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    /// Main brand color.
    pub primary: Color,
    /// Text/icon color for content on primary color.
    pub on_primary: Color,

    /// Main background color.
    pub background: Color,
    /// Surface/card background color.
    pub surface: Color,
    /// Alternating-row background for grids.
    pub surface_alternate: Color,
    /// Background of selected rows.
    pub selection: Color,

    /// Primary text color.
    pub text_primary: Color,
    /// Secondary/muted text color.
    pub text_secondary: Color,
    /// Disabled text color.
    pub text_disabled: Color,

    /// Error/danger color.
    pub error: Color,
    /// Warning color.
    pub warning: Color,
    /// Success color.
    pub success: Color,

    /// Standard border color.
    pub border: Color,
    /// Divider/separator color.
    pub divider: Color,
}

impl ColorPalette {
    /// Create a light theme palette.
    pub fn light() -> Self {
        Self {
            primary: Color::from_hex("#007AFF").unwrap(),
            on_primary: Color::WHITE,

            background: Color::from_hex("#FFFFFF").unwrap(),
            surface: Color::from_hex("#F8F9FA").unwrap(),
            surface_alternate: Color::from_hex("#F1F3F5").unwrap(),
            selection: Color::from_hex("#CCE5FF").unwrap(),

            text_primary: Color::from_hex("#212529").unwrap(),
            text_secondary: Color::from_hex("#6C757D").unwrap(),
            text_disabled: Color::from_hex("#ADB5BD").unwrap(),

            error: Color::from_hex("#DC3545").unwrap(),
            warning: Color::from_hex("#FFC107").unwrap(),
            success: Color::from_hex("#28A745").unwrap(),

            border: Color::from_hex("#DEE2E6").unwrap(),
            divider: Color::from_hex("#CED4DA").unwrap(),
        }
    }

    /// Create a dark theme palette.
    pub fn dark() -> Self {
        Self {
            primary: Color::from_hex("#0A84FF").unwrap(),
            on_primary: Color::WHITE,

            background: Color::from_hex("#1C1C1E").unwrap(),
            surface: Color::from_hex("#2C2C2E").unwrap(),
            surface_alternate: Color::from_hex("#242426").unwrap(),
            selection: Color::from_hex("#0A4A8F").unwrap(),

            text_primary: Color::WHITE,
            text_secondary: Color::from_hex("#8E8E93").unwrap(),
            text_disabled: Color::from_hex("#636366").unwrap(),

            error: Color::from_hex("#FF453A").unwrap(),
            warning: Color::from_hex("#FFD60A").unwrap(),
            success: Color::from_hex("#32D74B").unwrap(),

            border: Color::from_hex("#38383A").unwrap(),
            divider: Color::from_hex("#545456").unwrap(),
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes_differ_by_scheme() {
        let light = ColorPalette::light();
        let dark = ColorPalette::dark();
        assert_ne!(light.background, dark.background);
        assert_ne!(light.text_primary, dark.text_primary);
    }
}
