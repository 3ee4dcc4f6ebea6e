//! Top-level error alias for the demo binary and any glue code that isn't
//! part of the selection pipeline itself (which has its own taxonomy in
//! [`crate::core::router::RouterError`]).

/// Convenience alias for fallible glue code outside the routing core.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
