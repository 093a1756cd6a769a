//! Abstract style tokens.

/// The abstract style token set a panel hands to the theme adapter.
///
/// Tokens are toolkit- and platform-neutral; [`crate::ThemeAdapter::resolve`]
/// turns them into concrete values for the active environment.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTokens {
    /// Base spacing unit in logical pixels; paddings and margins are
    /// multiples of this.
    pub spacing_unit: f32,
    /// Abstract corner radius in logical pixels, before platform deltas.
    pub corner_radius: f32,
    /// Font family, or `None` to take the platform default.
    pub font_family: Option<String>,
    /// Base font size in logical pixels.
    pub font_size: f32,
}

impl Default for StyleTokens {
    fn default() -> Self {
        Self {
            spacing_unit: 4.0,
            corner_radius: 4.0,
            font_family: None,
            font_size: 13.0,
        }
    }
}

impl StyleTokens {
    /// Sets an explicit font family, overriding the platform default.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    /// Sets the base font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Sets the abstract corner radius.
    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }
}
