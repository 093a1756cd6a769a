//! Logging facilities for Trellis.
//!
//! Trellis uses the `tracing` crate for instrumentation. Install a subscriber
//! in the host application to see output:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! The constants below name the targets each subsystem logs under, for use
//! with `tracing` filter directives such as
//! `RUST_LOG=trellis::viewport=debug`.

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "trellis_core";
    /// Cache subsystem target.
    pub const CACHE: &str = "trellis_core::cache";
    /// Background worker target.
    pub const WORKER: &str = "trellis_core::worker";
    /// Grid controller target.
    pub const GRID: &str = "trellis::grid";
    /// Virtual scroll engine target.
    pub const VIEWPORT: &str = "trellis::viewport";
    /// Widget/event adapter target.
    pub const ADAPTER: &str = "trellis::adapter";
    /// Theme resolution target.
    pub const THEME: &str = "trellis_style::theme";
}
