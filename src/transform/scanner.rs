//! Annotation scanner: find every declaration that carries resolvable attribute metadata.
//!
//! This is a pure analyzer over the parsed file: it walks declarations depth-first in document order and records, for
//! each one with at least one resolved attribute, the chain of lexical scopes (`mod` / `impl`) it sits in.
//!
//! ## Notes
//! - Function bodies are not traversed; statements are not declarations.
//! - Traits are traversed, but they are not scopes generated output can be placed into, so they push nothing.
//! - Attributes that resolve to no known type (`derive`, `doc`, unknown paths) are absent rather than errors.

use codesplice_core::{AttributeData, Declaration, SemanticModel, SymbolId};

/// A lexical container the output of a generator must be re-wrapped in.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Module(&'a syn::ItemMod),
    Impl(&'a syn::ItemImpl),
}

/// A declaration together with its resolved attributes and enclosing scopes.
#[derive(Debug, Clone)]
pub struct AnnotatedDeclaration<'a> {
    pub declaration: Declaration<'a>,
    /// Enclosing scopes, outermost first.
    pub scopes: Vec<Scope<'a>>,
    /// Namespace symbol of the innermost enclosing `mod`, when the compilation knows it.
    pub namespace: Option<SymbolId>,
    /// Resolved attributes in source order.
    pub attributes: Vec<AttributeData>,
}

/// Collect annotated declarations of `model`'s file in document order.
pub fn scan<'a>(model: &SemanticModel<'a>) -> Vec<AnnotatedDeclaration<'a>> {
    let mut found = Vec::new();
    let file = model.file();
    visit(model, Declaration::File(file), &[], None, &mut found);
    scan_items(model, &file.items, &mut Vec::new(), None, &mut found);
    found
}

fn visit<'a>(
    model: &SemanticModel<'a>,
    declaration: Declaration<'a>,
    scopes: &[Scope<'a>],
    namespace: Option<SymbolId>,
    found: &mut Vec<AnnotatedDeclaration<'a>>,
) {
    let attributes = model.declared_attributes(&declaration, namespace);
    if attributes.is_empty() {
        return;
    }
    found.push(AnnotatedDeclaration {
        declaration,
        scopes: scopes.to_vec(),
        namespace,
        attributes,
    });
}

fn scan_items<'a>(
    model: &SemanticModel<'a>,
    items: &'a [syn::Item],
    scopes: &mut Vec<Scope<'a>>,
    namespace: Option<SymbolId>,
    found: &mut Vec<AnnotatedDeclaration<'a>>,
) {
    for item in items {
        visit(model, Declaration::Item(item), scopes, namespace, found);
        match item {
            syn::Item::Mod(module) => {
                let Some((_, content)) = &module.content else {
                    continue;
                };
                let inner = model.namespace(namespace, &module.ident);
                scopes.push(Scope::Module(module));
                scan_items(model, content, scopes, inner, found);
                scopes.pop();
            }
            syn::Item::Impl(imp) => {
                scopes.push(Scope::Impl(imp));
                for member in &imp.items {
                    visit(model, Declaration::ImplItem(member), scopes, namespace, found);
                }
                scopes.pop();
            }
            syn::Item::Trait(tr) => {
                for member in &tr.items {
                    visit(model, Declaration::TraitItem(member), scopes, namespace, found);
                }
            }
            _ => {}
        }
    }
}
