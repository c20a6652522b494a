//! codesplice version information.
//!
//! ## Notes
//!
//! - The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.

/// The codesplice version string.
pub const CODESPLICE_VERSION: &str = env!("CARGO_PKG_VERSION");
