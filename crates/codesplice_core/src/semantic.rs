//! Per-file semantic lookups: which resolved attributes a declaration carries.
//!
//! A [`SemanticModel`] binds one parsed source file to the [`Compilation`] it belongs to. The scanner uses it to read
//! attribute metadata off each [`Declaration`]; generators receive it through their transformation context so they can
//! resolve types mentioned in the code they inspect.

use quote::ToTokens;

use crate::attributes::AttributeData;
use crate::compilation::Compilation;
use crate::lang;
use crate::symbols::SymbolId;

/// A syntax node that can carry attributes.
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'a> {
    File(&'a syn::File),
    Item(&'a syn::Item),
    ImplItem(&'a syn::ImplItem),
    TraitItem(&'a syn::TraitItem),
}

impl<'a> Declaration<'a> {
    /// Outer attributes of the node (inner attributes for the file).
    pub fn attrs(&self) -> &'a [syn::Attribute] {
        match *self {
            Declaration::File(file) => &file.attrs,
            Declaration::Item(item) => item_attrs(item),
            Declaration::ImplItem(item) => match item {
                syn::ImplItem::Const(c) => &c.attrs,
                syn::ImplItem::Fn(f) => &f.attrs,
                syn::ImplItem::Type(t) => &t.attrs,
                syn::ImplItem::Macro(m) => &m.attrs,
                _ => &[],
            },
            Declaration::TraitItem(item) => match item {
                syn::TraitItem::Const(c) => &c.attrs,
                syn::TraitItem::Fn(f) => &f.attrs,
                syn::TraitItem::Type(t) => &t.attrs,
                syn::TraitItem::Macro(m) => &m.attrs,
                _ => &[],
            },
        }
    }

    /// Declared name, when the node has one.
    pub fn ident(&self) -> Option<&'a syn::Ident> {
        match *self {
            Declaration::File(_) => None,
            Declaration::Item(item) => match item {
                syn::Item::Const(i) => Some(&i.ident),
                syn::Item::Enum(i) => Some(&i.ident),
                syn::Item::ExternCrate(i) => Some(&i.ident),
                syn::Item::Fn(i) => Some(&i.sig.ident),
                syn::Item::Macro(i) => i.ident.as_ref(),
                syn::Item::Mod(i) => Some(&i.ident),
                syn::Item::Static(i) => Some(&i.ident),
                syn::Item::Struct(i) => Some(&i.ident),
                syn::Item::Trait(i) => Some(&i.ident),
                syn::Item::TraitAlias(i) => Some(&i.ident),
                syn::Item::Type(i) => Some(&i.ident),
                syn::Item::Union(i) => Some(&i.ident),
                _ => None,
            },
            Declaration::ImplItem(item) => match item {
                syn::ImplItem::Const(i) => Some(&i.ident),
                syn::ImplItem::Fn(i) => Some(&i.sig.ident),
                syn::ImplItem::Type(i) => Some(&i.ident),
                _ => None,
            },
            Declaration::TraitItem(item) => match item {
                syn::TraitItem::Const(i) => Some(&i.ident),
                syn::TraitItem::Fn(i) => Some(&i.sig.ident),
                syn::TraitItem::Type(i) => Some(&i.ident),
                _ => None,
            },
        }
    }

    /// Keyword-ish kind of the node (`fn`, `struct`, `impl`, ...).
    pub fn kind(&self) -> &'static str {
        match *self {
            Declaration::File(_) => "file",
            Declaration::Item(item) => match item {
                syn::Item::Const(_) => "const",
                syn::Item::Enum(_) => "enum",
                syn::Item::ExternCrate(_) => "extern crate",
                syn::Item::Fn(_) => "fn",
                syn::Item::ForeignMod(_) => "extern block",
                syn::Item::Impl(_) => "impl",
                syn::Item::Macro(_) => "macro",
                syn::Item::Mod(_) => "mod",
                syn::Item::Static(_) => "static",
                syn::Item::Struct(_) => "struct",
                syn::Item::Trait(_) => "trait",
                syn::Item::TraitAlias(_) => "trait alias",
                syn::Item::Type(_) => "type",
                syn::Item::Union(_) => "union",
                syn::Item::Use(_) => "use",
                _ => "item",
            },
            Declaration::ImplItem(item) => match item {
                syn::ImplItem::Const(_) => "const",
                syn::ImplItem::Fn(_) => "fn",
                syn::ImplItem::Type(_) => "type",
                syn::ImplItem::Macro(_) => "macro",
                _ => "item",
            },
            Declaration::TraitItem(item) => match item {
                syn::TraitItem::Const(_) => "const",
                syn::TraitItem::Fn(_) => "fn",
                syn::TraitItem::Type(_) => "type",
                syn::TraitItem::Macro(_) => "macro",
                _ => "item",
            },
        }
    }

    /// Human-readable label for diagnostics, e.g. `fn area` or `impl Shape`.
    pub fn describe(&self) -> String {
        if let Some(ident) = self.ident() {
            return format!("{} {}", self.kind(), ident);
        }
        match *self {
            Declaration::Item(syn::Item::Impl(imp)) => {
                format!("impl {}", imp.self_ty.to_token_stream())
            }
            _ => self.kind().to_string(),
        }
    }
}

fn item_attrs(item: &syn::Item) -> &[syn::Attribute] {
    match item {
        syn::Item::Const(i) => &i.attrs,
        syn::Item::Enum(i) => &i.attrs,
        syn::Item::ExternCrate(i) => &i.attrs,
        syn::Item::Fn(i) => &i.attrs,
        syn::Item::ForeignMod(i) => &i.attrs,
        syn::Item::Impl(i) => &i.attrs,
        syn::Item::Macro(i) => &i.attrs,
        syn::Item::Mod(i) => &i.attrs,
        syn::Item::Static(i) => &i.attrs,
        syn::Item::Struct(i) => &i.attrs,
        syn::Item::Trait(i) => &i.attrs,
        syn::Item::TraitAlias(i) => &i.attrs,
        syn::Item::Type(i) => &i.attrs,
        syn::Item::Union(i) => &i.attrs,
        syn::Item::Use(i) => &i.attrs,
        _ => &[],
    }
}

/// Semantic lookups for one source file of a compilation.
#[derive(Debug, Clone, Copy)]
pub struct SemanticModel<'a> {
    compilation: &'a Compilation,
    file: &'a syn::File,
}

impl<'a> SemanticModel<'a> {
    pub fn new(compilation: &'a Compilation, file: &'a syn::File) -> Self {
        Self { compilation, file }
    }

    pub fn compilation(&self) -> &'a Compilation {
        self.compilation
    }

    pub fn file(&self) -> &'a syn::File {
        self.file
    }

    /// Namespace symbol for `mod name` directly inside `containing`, if the compilation knows it.
    pub fn namespace(&self, containing: Option<SymbolId>, name: &syn::Ident) -> Option<SymbolId> {
        self.compilation
            .symbols()
            .find_namespace(containing, &name.to_string())
    }

    /// Resolve a type path written inside `scope`.
    pub fn resolve_type(&self, path: &syn::Path, scope: Option<SymbolId>) -> Option<SymbolId> {
        self.compilation.resolve_type_path(path, scope)
    }

    /// Resolved attributes declared on `declaration`, in source order.
    ///
    /// For the file unit this is the program's crate-level metadata restricted to attributes whose name is written in
    /// this file's `#![...]` list (with the implied `Attribute` suffix). Attributes that resolve to no known type are
    /// omitted.
    pub fn declared_attributes(&self, declaration: &Declaration<'_>, scope: Option<SymbolId>) -> Vec<AttributeData> {
        match declaration {
            Declaration::File(file) => self.file_attributes(file),
            other => other
                .attrs()
                .iter()
                .filter_map(|attr| self.compilation.resolve_attribute(attr, scope))
                .collect(),
        }
    }

    fn file_attributes(&self, file: &syn::File) -> Vec<AttributeData> {
        let used: Vec<String> = file
            .attrs
            .iter()
            .filter_map(|attr| attr.path().segments.last())
            .map(|segment| segment.ident.to_string())
            .collect();
        if used.is_empty() {
            return Vec::new();
        }
        self.compilation
            .crate_attributes()
            .iter()
            .filter(|data| {
                used.iter()
                    .any(|written| lang::attribute_name_matches(written, data.simple_name()))
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn program() -> (Compilation, syn::File) {
        let file: syn::File = parse_quote! {
            #![Stamp("v1")]
            #![allow(dead_code)]

            pub struct StampAttribute;
            pub struct OtherAttribute;

            #[Stamp("on-fn")]
            #[inline]
            fn tagged() {}
        };
        let other: syn::File = parse_quote! {
            #![Other]
        };
        let mut builder = Compilation::builder("App");
        builder.add_source(&file).add_source(&other);
        (builder.build(), file)
    }

    #[test]
    fn file_attributes_are_filtered_by_written_name() {
        let (compilation, file) = program();
        let model = SemanticModel::new(&compilation, &file);
        let attrs = model.declared_attributes(&Declaration::File(&file), None);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].class_name, "StampAttribute");
    }

    #[test]
    fn item_attributes_skip_unknown_paths() {
        let (compilation, file) = program();
        let model = SemanticModel::new(&compilation, &file);
        let item = &file.items[2];
        let attrs = model.declared_attributes(&Declaration::Item(item), None);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].args[0].as_str(), Some("on-fn"));
    }

    #[test]
    fn describe_names_the_declaration() {
        let item: syn::Item = parse_quote!(fn area() {});
        assert_eq!(Declaration::Item(&item).describe(), "fn area");
        let imp: syn::Item = parse_quote!(impl Shape {});
        assert_eq!(Declaration::Item(&imp).describe(), "impl Shape");
    }
}
