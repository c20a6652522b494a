//! Shared contract between the codesplice engine and generator plugins.
//!
//! Generator crates depend on this crate only. It defines:
//! - the program model ([`Compilation`], symbols, resolved [`AttributeData`]),
//! - the per-file [`SemanticModel`] and the [`Declaration`] nodes generators are attached to,
//! - the [`Generator`] trait, [`PluginModule`]s and the [`ModuleLoader`] the engine resolves them through,
//! - diagnostics and cooperative cancellation,
//! - well-known names and fixed text in [`lang`].
//!
//! ## Notes
//! - No IO and no global state: everything a transform needs is passed in.

pub mod attributes;
pub mod cancel;
pub mod compilation;
pub mod diagnostics;
pub mod lang;
pub mod plugin;
pub mod semantic;
pub mod symbols;

pub use attributes::{AttributeData, NamedArgument, TypedConstant};
pub use cancel::CancellationToken;
pub use compilation::{Compilation, CompilationBuilder};
pub use diagnostics::{Diagnostic, DiagnosticBag, DiagnosticSink, Severity};
pub use plugin::{
    Generator, GeneratorError, GeneratorFactory, ModuleLoader, PluginModule, PluginRegistry, TransformationContext,
};
pub use semantic::{Declaration, SemanticModel};
pub use symbols::{Symbol, SymbolId, SymbolTable, TypeKind, TypeSymbol};
