//! The per-file transform: scan, resolve, invoke, reconstruct, assemble.
//!
//! A [`DocumentTransform`] is built from the whole program ([`Compilation`]), the parsed input file and a
//! [`ModuleLoader`], then run once with [`DocumentTransform::transform`]. Generators run one at a time in document
//! order; each result is re-wrapped in its trigger's enclosing scopes and appended to the output.
//!
//! ## Notes
//! - Resolution failures and malformed bindings are fatal for the file: no partial [`OutputUnit`] is returned.
//! - Generator failures only produce error diagnostics; the caller decides build policy from them.
//! - The engine holds no state across files; distinct files may be transformed concurrently by the caller.
//!
//! ## Examples
//! ```rust
//! use std::sync::Arc;
//! use codesplice::transform::DocumentTransform;
//! use codesplice_core::{Compilation, PluginRegistry};
//!
//! let file: syn::File = syn::parse_quote! {
//!     use std::fmt;
//!     fn plain() {}
//! };
//! let mut builder = Compilation::builder("App");
//! builder.add_source(&file);
//! let compilation = Arc::new(builder.build());
//! let registry = PluginRegistry::new();
//!
//! let transform = DocumentTransform::builder()
//!     .compilation(compilation)
//!     .source(&file)
//!     .loader(&registry)
//!     .build()
//!     .unwrap();
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let output = runtime.block_on(transform.transform()).unwrap();
//! assert_eq!(output.imports.len(), 1);
//! assert!(output.members.is_empty());
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod assembly;
pub mod errors;
mod invoke;
pub mod resolver;
pub mod scanner;
pub mod scope;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use codesplice_core::{CancellationToken, Compilation, Diagnostic, DiagnosticSink, ModuleLoader, SemanticModel, Severity};

pub use assembly::OutputUnit;
pub use errors::{ResolutionFailure, TransformError};
pub use resolver::{GeneratorLocator, parse_locator};

use invoke::InvocationEnv;

/// One configured transform of one input file.
pub struct DocumentTransform<'a> {
    compilation: Arc<Compilation>,
    source: &'a syn::File,
    loader: &'a dyn ModuleLoader,
    diagnostics: &'a dyn DiagnosticSink,
    project_directory: PathBuf,
    cancel: CancellationToken,
}

impl<'a> DocumentTransform<'a> {
    pub fn builder() -> DocumentTransformBuilder<'a> {
        DocumentTransformBuilder::default()
    }

    /// Run the transform and assemble the output unit.
    #[tracing::instrument(skip_all, fields(directory = %self.project_directory.display(), items = self.source.items.len()))]
    pub async fn transform(&self) -> Result<OutputUnit, TransformError> {
        let model = SemanticModel::new(&self.compilation, self.source);
        let env = InvocationEnv {
            model: &model,
            compilation: &self.compilation,
            project_directory: &self.project_directory,
            diagnostics: self.diagnostics,
            cancel: &self.cancel,
        };

        let mut members = Vec::new();
        for target in scanner::scan(&model) {
            for attribute in &target.attributes {
                let Some(generator) = resolver::resolve(&self.compilation, self.loader, attribute)? else {
                    continue;
                };
                if self.cancel.is_cancelled() {
                    return Err(TransformError::Cancelled);
                }
                let items = invoke::invoke(&env, &target, attribute, &generator).await?;
                if items.is_empty() {
                    tracing::debug!(
                        generator = %generator.locator.type_name,
                        declaration = %target.declaration.describe(),
                        "generator produced no items"
                    );
                    continue;
                }
                scope::append(&mut members, scope::wrap(items, &target.scopes, &generator.locator.type_name)?);
            }
        }

        tracing::debug!(members = members.len(), "assembled output");
        Ok(assembly::assemble(self.source, members))
    }
}

/// Builder for [`DocumentTransform`]. The compilation, source and loader are required.
#[derive(Default)]
pub struct DocumentTransformBuilder<'a> {
    compilation: Option<Arc<Compilation>>,
    source: Option<&'a syn::File>,
    loader: Option<&'a dyn ModuleLoader>,
    diagnostics: Option<&'a dyn DiagnosticSink>,
    project_directory: Option<PathBuf>,
    cancel: Option<CancellationToken>,
}

impl<'a> DocumentTransformBuilder<'a> {
    pub fn compilation(mut self, compilation: Arc<Compilation>) -> Self {
        self.compilation = Some(compilation);
        self
    }

    pub fn source(mut self, source: &'a syn::File) -> Self {
        self.source = Some(source);
        self
    }

    pub fn loader(mut self, loader: &'a dyn ModuleLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Sink for engine and generator diagnostics. Defaults to forwarding them as `tracing` events.
    pub fn diagnostics(mut self, diagnostics: &'a dyn DiagnosticSink) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Directory of the input file, handed to generators. Defaults to `.`.
    pub fn project_directory(mut self, directory: impl AsRef<Path>) -> Self {
        self.project_directory = Some(directory.as_ref().to_path_buf());
        self
    }

    pub fn cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn build(self) -> Result<DocumentTransform<'a>, TransformError> {
        Ok(DocumentTransform {
            compilation: self.compilation.ok_or(TransformError::Precondition("compilation"))?,
            source: self.source.ok_or(TransformError::Precondition("source file"))?,
            loader: self.loader.ok_or(TransformError::Precondition("module loader"))?,
            diagnostics: self.diagnostics.unwrap_or(&TracingSink),
            project_directory: self.project_directory.unwrap_or_else(|| PathBuf::from(".")),
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

/// Default sink: diagnostics become `tracing` events.
struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        let code = diagnostic.code.as_deref().unwrap_or("");
        match diagnostic.severity {
            Severity::Info => tracing::info!(code, "{}", diagnostic.message),
            Severity::Warning => tracing::warn!(code, "{}", diagnostic.message),
            Severity::Error => tracing::error!(code, "{}", diagnostic.message),
        }
    }
}
