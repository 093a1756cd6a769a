//! Theme and style-token resolution for Trellis.
//!
//! Business panels describe appearance with abstract tokens (palette roles,
//! a spacing scale, corner radius, font family); the [`ThemeAdapter`]
//! resolves them into concrete values for whichever toolkit is active,
//! applying platform conventions and high-DPI scaling along the way.
//!
//! A `ThemeAdapter` is constructed explicitly and passed to whatever needs
//! it — there is no global style manager. System dark/light mode is detected
//! once at construction and re-read only on an explicit
//! [`refresh`](ThemeAdapter::refresh); it is never polled.
//!
//! # Example
//!
//! ```
//! use trellis_style::{ColorScheme, Platform, StyleTokens, ThemeAdapter};
//!
//! let theme = ThemeAdapter::new(Platform::Windows, 1.0)
//!     .with_scheme(ColorScheme::Dark);
//!
//! let style = theme.resolve(&StyleTokens::default());
//! assert_eq!(style.font_family, "Segoe UI");
//! ```

pub mod color;
pub mod error;
pub mod palette;
pub mod platform;
pub mod theme;
pub mod tokens;

pub use color::Color;
pub use error::{Error, Result};
pub use palette::ColorPalette;
pub use platform::{ColorScheme, Platform};
pub use theme::{ResolvedStyle, ThemeAdapter, HIGH_DPI_SCALE};
pub use tokens::StyleTokens;
