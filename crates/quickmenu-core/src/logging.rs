//! Tracing integration.
//!
//! QuickMenu uses the `tracing` crate for instrumentation. Install a
//! subscriber in the embedding process to see the output:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("quickmenu=debug")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Element tree construction and materialization.
    pub const TREE: &str = "quickmenu::tree";
    /// Dispatch queue activity.
    pub const DISPATCH: &str = "quickmenu::dispatch";
    /// Traffic to and from the rendering host.
    pub const HOST: &str = "quickmenu::host";
    /// Preference bridge.
    pub const PREFS: &str = "quickmenu::prefs";
}
