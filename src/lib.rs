#![forbid(unsafe_code)]
//! codesplice: source-to-source code generation driven by attributes.
//!
//! Declarations in a Rust source file carry attributes whose *types* are bound to generator plugins through the
//! `Generator` meta-attribute. For every such declaration the engine runs the bound generator and splices its output
//! into a new file, inside copies of the declaration's enclosing `mod` and `impl` blocks.
//!
//! This crate provides the engine ([`transform`]), output rendering ([`format`]), the batch driver ([`project`]), the
//! diagnostics logger ([`logging`]) and the `codesplice` CLI. The plugin contract lives in `codesplice_core`.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `transform` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
pub mod project;
pub mod source;
pub mod transform;
pub mod version;

pub use config::{GenerateConfig, LineEnding, MessageFormat};
pub use logging::Logger;
pub use project::{GenerationSummary, ProjectError, ProjectGenerator};
pub use source::{SourceError, SourceFile, read_source};
pub use transform::{DocumentTransform, OutputUnit, ResolutionFailure, TransformError};
