//! Theme adapter: abstract tokens to concrete, platform-adjusted styles.

use tracing::debug;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::palette::ColorPalette;
use crate::platform::{ColorScheme, Platform};
use crate::tokens::StyleTokens;

/// Fixed scale factor applied to spacing and font size on high-DPI displays
/// (device pixel ratio above 1.0).
pub const HIGH_DPI_SCALE: f32 = 1.25;

/// A fully resolved style, ready to hand to a toolkit backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    /// The active palette for the current color scheme.
    pub palette: ColorPalette,
    /// Spacing unit after DPI scaling.
    pub spacing_unit: f32,
    /// Corner radius after the platform delta, clamped at zero.
    pub corner_radius: f32,
    /// Concrete font family.
    pub font_family: String,
    /// Font size after DPI scaling.
    pub font_size: f32,
}

/// Resolves abstract style tokens for a concrete platform, scheme, and
/// display density.
///
/// A `ThemeAdapter` is an explicitly constructed value, injected into the
/// widget adapter (and anything else that styles widgets). The system color
/// scheme is read once at construction; call [`refresh`](Self::refresh) to
/// re-read it after an OS-level appearance change.
pub struct ThemeAdapter {
    platform: Platform,
    scheme: ColorScheme,
    device_pixel_ratio: f32,
}

impl ThemeAdapter {
    /// Creates a theme adapter for the given platform and device pixel
    /// ratio, detecting the system color scheme once.
    pub fn new(platform: Platform, device_pixel_ratio: f32) -> Self {
        Self {
            platform,
            scheme: ColorScheme::detect(),
            device_pixel_ratio,
        }
    }

    /// Creates a theme adapter for the current platform.
    pub fn for_current_platform(device_pixel_ratio: f32) -> Self {
        Self::new(Platform::current(), device_pixel_ratio)
    }

    /// Overrides the detected color scheme.
    pub fn with_scheme(mut self, scheme: ColorScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// The platform this adapter resolves for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The active color scheme.
    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    /// Re-detects the system color scheme.
    ///
    /// This is the only way the scheme changes after construction; nothing
    /// polls the OS. Returns `true` if the scheme changed.
    pub fn refresh(&mut self) -> bool {
        let detected = ColorScheme::detect();
        let changed = detected != self.scheme;
        if changed {
            debug!(target: "trellis_style::theme", ?detected, "color scheme changed");
            self.scheme = detected;
        }
        changed
    }

    /// The palette for the active scheme.
    pub fn palette(&self) -> ColorPalette {
        match self.scheme {
            ColorScheme::Light => ColorPalette::light(),
            ColorScheme::Dark => ColorPalette::dark(),
        }
    }

    /// Looks up a palette color by token name.
    ///
    /// Fails with [`Error::UnmappedToken`] for unknown names; there is no
    /// silent fallback color.
    pub fn color(&self, token: &str) -> Result<Color> {
        let palette = self.palette();
        let color = match token {
            "primary" => palette.primary,
            "on-primary" => palette.on_primary,
            "background" => palette.background,
            "surface" => palette.surface,
            "surface-alternate" => palette.surface_alternate,
            "selection" => palette.selection,
            "text-primary" => palette.text_primary,
            "text-secondary" => palette.text_secondary,
            "text-disabled" => palette.text_disabled,
            "error" => palette.error,
            "warning" => palette.warning,
            "success" => palette.success,
            "border" => palette.border,
            "divider" => palette.divider,
            _ => return Err(Error::unmapped_token(token)),
        };
        Ok(color)
    }

    /// Resolves a token set into a concrete style.
    ///
    /// Corner radius and font family follow platform conventions; spacing
    /// and font size are scaled by [`HIGH_DPI_SCALE`] when the device pixel
    /// ratio exceeds 1.0.
    pub fn resolve(&self, tokens: &StyleTokens) -> ResolvedStyle {
        let dpi_scale = if self.device_pixel_ratio > 1.0 {
            HIGH_DPI_SCALE
        } else {
            1.0
        };

        ResolvedStyle {
            palette: self.palette(),
            spacing_unit: tokens.spacing_unit * dpi_scale,
            corner_radius: (tokens.corner_radius + self.platform.corner_radius_delta())
                .max(0.0),
            font_family: tokens
                .font_family
                .clone()
                .unwrap_or_else(|| self.platform.default_font_family().to_string()),
            font_size: tokens.font_size * dpi_scale,
        }
    }
}
