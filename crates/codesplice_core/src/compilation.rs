//! The whole program a transformed file belongs to.
//!
//! A [`Compilation`] owns the symbol arena for every namespace and type declared in the program's own module and in
//! referenced modules, the resolved attributes on those types, and the program's crate-level (`#![...]`) attributes.
//! It is built once with [`CompilationBuilder`] and then shared read-only (`Arc<Compilation>`) by every transform.
//!
//! ## Notes
//! - Attribute resolution is by name only: there is no `use` tracking. Multi-segment paths match fully-qualified
//!   names; single-segment paths match simple names, preferring the innermost enclosing namespace of the use site.
//! - The implied `Attribute` suffix applies to attribute paths, not to type paths used as arguments.
//!
//! ## See also
//! - [`crate::semantic::SemanticModel`]: per-file view used by the scanner and handed to generators.

use std::collections::HashMap;

use crate::attributes::{AttributeData, decode_arguments};
use crate::lang::{self, ATTRIBUTE_SUFFIX, NAME_SEPARATOR};
use crate::symbols::{NamespaceSymbol, Symbol, SymbolId, SymbolTable, TypeKind, TypeSymbol};

/// The whole program: symbols, their attributes, and crate-level attributes.
#[derive(Debug, Clone)]
pub struct Compilation {
    module_name: String,
    symbols: SymbolTable,
    crate_attributes: Vec<AttributeData>,
    /// Simple name -> types with that name, in declaration order.
    by_simple_name: HashMap<String, Vec<SymbolId>>,
}

impl Compilation {
    pub fn builder(module_name: impl Into<String>) -> CompilationBuilder {
        CompilationBuilder::new(module_name)
    }

    /// Name of the program's own module (crate).
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn get_type(&self, id: SymbolId) -> Option<&TypeSymbol> {
        self.symbols.get_type(id)
    }

    pub fn full_name(&self, id: SymbolId) -> String {
        self.symbols.full_name(id)
    }

    /// Module hosting the type `id`, if `id` is a type.
    pub fn module_of(&self, id: SymbolId) -> Option<&str> {
        self.get_type(id).map(|ty| ty.module.as_str())
    }

    /// Attributes declared at crate level (`#![...]`) in the program's own sources.
    pub fn crate_attributes(&self) -> &[AttributeData] {
        &self.crate_attributes
    }

    /// Find a type by its fully-qualified, dot-joined name.
    pub fn find_type(&self, full_name: &str) -> Option<SymbolId> {
        let simple = full_name.rsplit(NAME_SEPARATOR).next().unwrap_or(full_name);
        self.by_simple_name
            .get(simple)?
            .iter()
            .copied()
            .find(|id| self.symbols.full_name(*id) == full_name)
    }

    /// The generator binding meta-attribute declared on `attribute_type`, if any.
    ///
    /// When a type carries several binding meta-attributes, the first one declared wins.
    pub fn generator_binding(&self, attribute_type: SymbolId) -> Option<&AttributeData> {
        self.get_type(attribute_type)?
            .attributes
            .iter()
            .find(|a| a.class_name == lang::GENERATOR_ATTRIBUTE)
    }

    /// Every attribute type that carries a generator binding, in declaration order.
    pub fn generator_bindings(&self) -> impl Iterator<Item = (SymbolId, &AttributeData)> {
        self.symbols
            .types()
            .filter_map(|(id, _)| self.generator_binding(id).map(|binding| (id, binding)))
    }

    /// Resolve an attribute path written at a use site inside `scope` to its attribute type.
    pub fn resolve_attribute_type(&self, path: &syn::Path, scope: Option<SymbolId>) -> Option<SymbolId> {
        self.resolve_path(path, scope, true)
    }

    /// Resolve a type path written at a use site inside `scope`.
    pub fn resolve_type_path(&self, path: &syn::Path, scope: Option<SymbolId>) -> Option<SymbolId> {
        self.resolve_path(path, scope, false)
    }

    /// Resolve `attr` to attribute metadata, or `None` when its path names no known type.
    pub fn resolve_attribute(&self, attr: &syn::Attribute, scope: Option<SymbolId>) -> Option<AttributeData> {
        let class = self.resolve_attribute_type(attr.path(), scope)?;
        let decoded = decode_arguments(attr, &|path| self.resolve_type_path(path, scope));
        Some(AttributeData {
            class,
            class_name: self.full_name(class),
            args: decoded.args,
            named_args: decoded.named_args,
        })
    }

    fn resolve_path(&self, path: &syn::Path, scope: Option<SymbolId>, attribute: bool) -> Option<SymbolId> {
        let mut segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        if segments.first().is_some_and(|s| s == "crate") {
            segments.remove(0);
        }
        let last = segments.last()?.clone();

        if segments.len() > 1 {
            let joined = segments.join(NAME_SEPARATOR);
            return self.find_type(&joined).or_else(|| {
                attribute
                    .then(|| self.find_type(&format!("{joined}{ATTRIBUTE_SUFFIX}")))
                    .flatten()
            });
        }

        let names: Vec<String> = if attribute {
            lang::attribute_name_candidates(&last).to_vec()
        } else {
            vec![last]
        };
        let candidates: Vec<SymbolId> = names
            .iter()
            .filter_map(|name| self.by_simple_name.get(name))
            .flatten()
            .copied()
            .collect();

        match candidates.as_slice() {
            [] => None,
            [only] => Some(*only),
            _ => self.closest_candidate(&candidates, scope, path),
        }
    }

    /// Pick the candidate declared in the innermost namespace enclosing `scope`.
    fn closest_candidate(&self, candidates: &[SymbolId], scope: Option<SymbolId>, path: &syn::Path) -> Option<SymbolId> {
        let mut level = scope;
        loop {
            let here: Vec<SymbolId> = candidates
                .iter()
                .copied()
                .filter(|id| self.symbols.get(*id).and_then(Symbol::containing) == level)
                .collect();
            match here.as_slice() {
                [only] => return Some(*only),
                [] => {}
                _ => break,
            }
            match level {
                Some(id) => level = self.symbols.get(id).and_then(Symbol::containing),
                None => break,
            }
        }
        tracing::debug!(
            path = %crate::attributes::path_text(path),
            candidates = candidates.len(),
            "ambiguous type path left unresolved"
        );
        None
    }
}

/// Raw attributes waiting for the symbol table to be complete.
struct PendingAttributes {
    owner: Option<SymbolId>,
    scope: Option<SymbolId>,
    attrs: Vec<syn::Attribute>,
}

/// Incrementally declare the program's symbols, then resolve every attribute at once.
pub struct CompilationBuilder {
    module_name: String,
    symbols: SymbolTable,
    pending: Vec<PendingAttributes>,
    crate_attributes: Vec<AttributeData>,
    type_attributes: Vec<(SymbolId, AttributeData)>,
}

impl CompilationBuilder {
    /// Start a program whose own module is `module_name`.
    ///
    /// The built-in generator binding meta-attribute (`codesplice.GeneratorAttribute`) is always declared.
    pub fn new(module_name: impl Into<String>) -> Self {
        let mut builder = Self {
            module_name: module_name.into(),
            symbols: SymbolTable::new(),
            pending: Vec::new(),
            crate_attributes: Vec::new(),
            type_attributes: Vec::new(),
        };
        let ns = builder.add_namespace(None, lang::CORE_NAMESPACE);
        builder.declare_type(lang::CORE_MODULE, Some(ns), lang::GENERATOR_ATTRIBUTE_NAME, TypeKind::Struct);
        builder
    }

    /// Find or create the namespace `name` inside `containing`.
    pub fn add_namespace(&mut self, containing: Option<SymbolId>, name: &str) -> SymbolId {
        if let Some(id) = self.symbols.find_namespace(containing, name) {
            return id;
        }
        self.symbols.push(Symbol::Namespace(NamespaceSymbol {
            name: name.to_string(),
            containing,
        }))
    }

    /// Find or create the nested namespace `path` (outermost first) under the global namespace.
    pub fn add_namespace_path(&mut self, path: &[&str]) -> Option<SymbolId> {
        path.iter()
            .fold(None, |containing, name| Some(self.add_namespace(containing, name)))
    }

    /// Declare a type hosted by `module` inside `containing`.
    pub fn declare_type(
        &mut self,
        module: &str,
        containing: Option<SymbolId>,
        name: &str,
        kind: TypeKind,
    ) -> SymbolId {
        self.symbols.push(Symbol::Type(TypeSymbol {
            name: name.to_string(),
            kind,
            containing,
            module: module.to_string(),
            attributes: Vec::new(),
        }))
    }

    /// Attach already-resolved metadata to a declared type.
    pub fn add_type_attribute(&mut self, ty: SymbolId, data: AttributeData) -> &mut Self {
        self.type_attributes.push((ty, data));
        self
    }

    /// Attach already-resolved crate-level metadata.
    pub fn add_crate_attribute(&mut self, data: AttributeData) -> &mut Self {
        self.crate_attributes.push(data);
        self
    }

    /// Declare every type in one of the program's own source files.
    ///
    /// Inner attributes (`#![...]`) of the file become crate-level attributes of the program.
    pub fn add_source(&mut self, file: &syn::File) -> &mut Self {
        let module = self.module_name.clone();
        self.pending.push(PendingAttributes {
            owner: None,
            scope: None,
            attrs: file.attrs.clone(),
        });
        self.declare_items(&module, None, &file.items);
        self
    }

    /// Declare every type in a source file of the referenced module `module`.
    pub fn add_module_source(&mut self, module: &str, file: &syn::File) -> &mut Self {
        self.declare_items(module, None, &file.items);
        self
    }

    /// Declare every type of a source file mounted at namespace `namespace` in `module`.
    pub fn add_source_in(&mut self, module: &str, namespace: &[&str], file: &syn::File) -> &mut Self {
        let scope = self.add_namespace_path(namespace);
        self.declare_items(module, scope, &file.items);
        self
    }

    fn declare_items(&mut self, module: &str, scope: Option<SymbolId>, items: &[syn::Item]) {
        for item in items {
            let (ident, kind, attrs) = match item {
                syn::Item::Struct(s) => (&s.ident, TypeKind::Struct, &s.attrs),
                syn::Item::Enum(e) => (&e.ident, TypeKind::Enum, &e.attrs),
                syn::Item::Union(u) => (&u.ident, TypeKind::Union, &u.attrs),
                syn::Item::Trait(t) => (&t.ident, TypeKind::Trait, &t.attrs),
                syn::Item::Type(t) => (&t.ident, TypeKind::Alias, &t.attrs),
                syn::Item::Mod(m) => {
                    if let Some((_, content)) = &m.content {
                        let ns = self.add_namespace(scope, &m.ident.to_string());
                        self.declare_items(module, Some(ns), content);
                    }
                    continue;
                }
                _ => continue,
            };
            let id = self.declare_type(module, scope, &ident.to_string(), kind);
            if !attrs.is_empty() {
                self.pending.push(PendingAttributes {
                    owner: Some(id),
                    scope,
                    attrs: attrs.clone(),
                });
            }
        }
    }

    /// Resolve every pending attribute against the complete symbol table.
    #[tracing::instrument(skip_all, fields(module = %self.module_name, symbols = self.symbols.len()))]
    pub fn build(self) -> Compilation {
        let mut by_simple_name: HashMap<String, Vec<SymbolId>> = HashMap::new();
        for (id, ty) in self.symbols.types() {
            by_simple_name.entry(ty.name.clone()).or_default().push(id);
        }

        let mut compilation = Compilation {
            module_name: self.module_name,
            symbols: self.symbols,
            crate_attributes: Vec::new(),
            by_simple_name,
        };

        let mut resolved: Vec<(Option<SymbolId>, AttributeData)> = Vec::new();
        for pending in &self.pending {
            for attr in &pending.attrs {
                if let Some(data) = compilation.resolve_attribute(attr, pending.scope) {
                    resolved.push((pending.owner, data));
                }
            }
        }
        resolved.extend(self.type_attributes.into_iter().map(|(id, data)| (Some(id), data)));

        for (owner, data) in resolved {
            match owner {
                None => compilation.crate_attributes.push(data),
                Some(id) => {
                    if let Some(Symbol::Type(ty)) = compilation.symbols.get_mut(id) {
                        ty.attributes.push(data);
                    }
                }
            }
        }
        compilation.crate_attributes.extend(self.crate_attributes);
        compilation
    }
}
