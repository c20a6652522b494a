//! The generator plugin contract and the registry that replaces dynamic module loading.
//!
//! A generator is constructed from the [`AttributeData`] of the attribute that triggered it (its configuration), then
//! asked to produce items for the declaration that attribute sits on. Generators are grouped into [`PluginModule`]s
//! keyed by fully-qualified type name; a [`ModuleLoader`] hands modules to the engine by name.
//!
//! ## Notes
//! - `syn` trees are `!Send`, so generator futures are local (`#[async_trait(?Send)]`).
//! - Plugins report progress and problems through the [`DiagnosticSink`] they are given; returning `Err` is reserved for
//!   failures that mean "this generator produced nothing".
//!
//! ## Examples
//! ```rust
//! use std::sync::Arc;
//! use codesplice_core::plugin::{Generator, GeneratorError, ModuleLoader, PluginModule, PluginRegistry, TransformationContext};
//! use codesplice_core::{CancellationToken, DiagnosticSink};
//!
//! struct Nothing;
//!
//! #[async_trait::async_trait(?Send)]
//! impl Generator for Nothing {
//!     async fn generate(
//!         &self,
//!         _context: &TransformationContext<'_>,
//!         _diagnostics: &dyn DiagnosticSink,
//!         _cancel: &CancellationToken,
//!     ) -> Result<Vec<syn::Item>, GeneratorError> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! let module = PluginModule::new("Acme.Widgets").with_generator("Acme.Widgets.Nothing", |_attr| Ok(Box::new(Nothing)));
//! let mut registry = PluginRegistry::new();
//! registry.register(module);
//! assert!(registry.load("Acme.Widgets").is_some());
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::attributes::AttributeData;
use crate::cancel::CancellationToken;
use crate::compilation::Compilation;
use crate::diagnostics::DiagnosticSink;
use crate::semantic::{Declaration, SemanticModel};
use crate::symbols::SymbolId;

/// Failure reported by a generator (or its factory).
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The triggering attribute's arguments do not configure this generator correctly.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// The generator cannot handle the declaration it was attached to.
    #[error("unsupported declaration: {0}")]
    UnsupportedDeclaration(String),
    #[error("generation cancelled")]
    Cancelled,
    #[error("{0}")]
    Failed(String),
}

/// Everything a generator may inspect. Immutable for the duration of one invocation.
#[derive(Clone, Copy)]
pub struct TransformationContext<'a> {
    processing_node: Declaration<'a>,
    scope: Option<SymbolId>,
    semantic_model: &'a SemanticModel<'a>,
    compilation: &'a Arc<Compilation>,
    project_directory: &'a Path,
}

impl<'a> TransformationContext<'a> {
    pub fn new(
        processing_node: Declaration<'a>,
        scope: Option<SymbolId>,
        semantic_model: &'a SemanticModel<'a>,
        compilation: &'a Arc<Compilation>,
        project_directory: &'a Path,
    ) -> Self {
        Self {
            processing_node,
            scope,
            semantic_model,
            compilation,
            project_directory,
        }
    }

    /// The declaration carrying the triggering attribute.
    pub fn processing_node(&self) -> Declaration<'a> {
        self.processing_node
    }

    /// Namespace the declaration sits in, when the compilation knows it.
    pub fn scope(&self) -> Option<SymbolId> {
        self.scope
    }

    pub fn semantic_model(&self) -> &'a SemanticModel<'a> {
        self.semantic_model
    }

    pub fn compilation(&self) -> &'a Arc<Compilation> {
        self.compilation
    }

    /// Directory of the input file.
    pub fn project_directory(&self) -> &'a Path {
        self.project_directory
    }
}

impl fmt::Debug for TransformationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformationContext")
            .field("processing_node", &self.processing_node.describe())
            .field("scope", &self.scope)
            .field("project_directory", &self.project_directory)
            .finish()
    }
}

/// A code generator plugin.
#[async_trait(?Send)]
pub trait Generator {
    /// Produce the items to splice next to the processing node, in order.
    async fn generate(
        &self,
        context: &TransformationContext<'_>,
        diagnostics: &dyn DiagnosticSink,
        cancel: &CancellationToken,
    ) -> Result<Vec<syn::Item>, GeneratorError>;
}

/// Build a generator from the attribute that triggered it.
pub type GeneratorFactory = Arc<dyn Fn(&AttributeData) -> Result<Box<dyn Generator>, GeneratorError> + Send + Sync>;

/// A named group of generator factories (the unit a loader hands out).
#[derive(Clone)]
pub struct PluginModule {
    name: String,
    factories: BTreeMap<String, GeneratorFactory>,
}

impl PluginModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            factories: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `factory` under the generator's fully-qualified type name.
    pub fn with_generator<F>(mut self, type_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&AttributeData) -> Result<Box<dyn Generator>, GeneratorError> + Send + Sync + 'static,
    {
        self.factories.insert(type_name.into(), Arc::new(factory));
        self
    }

    /// Look up a generator factory by fully-qualified type name.
    pub fn generator(&self, type_name: &str) -> Option<&GeneratorFactory> {
        self.factories.get(type_name)
    }

    /// Fully-qualified names of every generator in this module, sorted.
    pub fn generator_names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for PluginModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginModule")
            .field("name", &self.name)
            .field("generators", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Provide plugin modules by name. A miss is `None`.
pub trait ModuleLoader {
    fn load(&self, module: &str) -> Option<Arc<PluginModule>>;
}

impl<F> ModuleLoader for F
where
    F: Fn(&str) -> Option<Arc<PluginModule>>,
{
    fn load(&self, module: &str) -> Option<Arc<PluginModule>> {
        self(module)
    }
}

/// Modules registered up front, keyed by module name.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    modules: HashMap<String, Arc<PluginModule>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a module under its own name.
    pub fn register(&mut self, module: PluginModule) -> &mut Self {
        tracing::debug!(module = %module.name(), "registered plugin module");
        self.modules.insert(module.name().to_string(), Arc::new(module));
        self
    }

    pub fn with_module(mut self, module: PluginModule) -> Self {
        self.register(module);
        self
    }

    /// Registered module names, sorted.
    pub fn module_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ModuleLoader for PluginRegistry {
    fn load(&self, module: &str) -> Option<Arc<PluginModule>> {
        self.modules.get(module).cloned()
    }
}
