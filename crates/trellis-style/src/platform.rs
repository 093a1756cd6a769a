//! Host platform conventions and system color-scheme detection.

/// The host operating system family, as far as styling is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Detects the platform the process is running on.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    /// The default UI font family for this platform.
    pub fn default_font_family(self) -> &'static str {
        match self {
            Self::Windows => "Segoe UI",
            Self::MacOs => "SF Pro Text",
            Self::Linux => "Cantarell",
        }
    }

    /// Platform delta applied to the abstract corner radius, in pixels.
    ///
    /// macOS convention rounds corners slightly more than the abstract
    /// token; Windows slightly less.
    pub fn corner_radius_delta(self) -> f32 {
        match self {
            Self::Windows => -1.0,
            Self::MacOs => 2.0,
            Self::Linux => 0.0,
        }
    }
}

/// Light or dark UI color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    /// Detects the system color scheme.
    ///
    /// With the `system-theme` feature enabled this asks the OS once;
    /// detection failures and builds without the feature fall back to
    /// [`ColorScheme::Light`]. Callers wanting live updates re-invoke this
    /// through an explicit theme refresh; the scheme is never polled.
    pub fn detect() -> Self {
        #[cfg(feature = "system-theme")]
        {
            match dark_light::detect() {
                dark_light::Mode::Dark => Self::Dark,
                dark_light::Mode::Light | dark_light::Mode::Default => Self::Light,
            }
        }
        #[cfg(not(feature = "system-theme"))]
        {
            Self::Light
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_family_per_platform() {
        assert_eq!(Platform::Windows.default_font_family(), "Segoe UI");
        assert_ne!(
            Platform::MacOs.default_font_family(),
            Platform::Linux.default_font_family()
        );
    }

    #[test]
    fn test_corner_radius_deltas_differ() {
        assert_ne!(
            Platform::Windows.corner_radius_delta(),
            Platform::MacOs.corner_radius_delta()
        );
    }
}
