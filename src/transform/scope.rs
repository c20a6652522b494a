//! Scope reconstruction: re-wrap generated items in copies of their trigger's enclosing `mod` / `impl` headers.
//!
//! The input tree is only borrowed. Each ancestor is cloned with its attributes dropped and its body replaced by the
//! generated items, innermost first, so the output declares the new members in the same lexical place.

use quote::ToTokens;

use super::errors::TransformError;
use super::scanner::Scope;

/// Wrap `items` in `scopes` (outermost first) and return the top-level items to emit.
pub fn wrap(items: Vec<syn::Item>, scopes: &[Scope<'_>], generator: &str) -> Result<Vec<syn::Item>, TransformError> {
    let mut current = items;
    for scope in scopes.iter().rev() {
        let wrapped = match scope {
            Scope::Module(module) => syn::Item::Mod(module_shell(module, current)),
            Scope::Impl(imp) => syn::Item::Impl(impl_shell(imp, current, generator)?),
        };
        current = vec![wrapped];
    }
    Ok(current)
}

/// Append wrapped output to `members`, folding a module shell into an identical shell that directly precedes it.
///
/// Only adjacent shells are folded, so member order is unchanged and the output never declares the same module twice
/// in a row.
pub fn append(members: &mut Vec<syn::Item>, wrapped: Vec<syn::Item>) {
    for item in wrapped {
        let syn::Item::Mod(next) = item else {
            members.push(item);
            continue;
        };
        let fold = matches!(members.last(), Some(syn::Item::Mod(last)) if same_shell(last, &next));
        if !fold {
            members.push(syn::Item::Mod(next));
            continue;
        }
        if let (Some(syn::Item::Mod(last)), Some((_, items))) = (members.last_mut(), next.content) {
            if let Some((_, existing)) = last.content.as_mut() {
                append(existing, items);
            }
        }
    }
}

fn same_shell(a: &syn::ItemMod, b: &syn::ItemMod) -> bool {
    a.ident == b.ident
        && a.unsafety.is_some() == b.unsafety.is_some()
        && a.content.is_some()
        && b.content.is_some()
        && a.vis.to_token_stream().to_string() == b.vis.to_token_stream().to_string()
}

fn module_shell(module: &syn::ItemMod, items: Vec<syn::Item>) -> syn::ItemMod {
    let brace = module
        .content
        .as_ref()
        .map(|(brace, _)| *brace)
        .unwrap_or_default();
    syn::ItemMod {
        attrs: Vec::new(),
        vis: module.vis.clone(),
        unsafety: module.unsafety,
        mod_token: module.mod_token,
        ident: module.ident.clone(),
        content: Some((brace, items)),
        semi: None,
    }
}

fn impl_shell(imp: &syn::ItemImpl, items: Vec<syn::Item>, generator: &str) -> Result<syn::ItemImpl, TransformError> {
    let members = items
        .into_iter()
        .map(|item| impl_member(item, imp, generator))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(syn::ItemImpl {
        attrs: Vec::new(),
        items: members,
        ..imp.clone()
    })
}

fn impl_member(item: syn::Item, imp: &syn::ItemImpl, generator: &str) -> Result<syn::ImplItem, TransformError> {
    let member = match item {
        syn::Item::Fn(f) => syn::ImplItem::Fn(syn::ImplItemFn {
            attrs: f.attrs,
            vis: f.vis,
            defaultness: None,
            sig: f.sig,
            block: *f.block,
        }),
        syn::Item::Const(c) => syn::ImplItem::Const(syn::ImplItemConst {
            attrs: c.attrs,
            vis: c.vis,
            defaultness: None,
            const_token: c.const_token,
            ident: c.ident,
            generics: c.generics,
            colon_token: c.colon_token,
            ty: *c.ty,
            eq_token: c.eq_token,
            expr: *c.expr,
            semi_token: c.semi_token,
        }),
        syn::Item::Type(t) => syn::ImplItem::Type(syn::ImplItemType {
            attrs: t.attrs,
            vis: t.vis,
            defaultness: None,
            type_token: t.type_token,
            ident: t.ident,
            generics: t.generics,
            eq_token: t.eq_token,
            ty: *t.ty,
            semi_token: t.semi_token,
        }),
        syn::Item::Macro(m) if m.ident.is_none() => syn::ImplItem::Macro(syn::ImplItemMacro {
            attrs: m.attrs,
            mac: m.mac,
            semi_token: m.semi_token,
        }),
        syn::Item::Verbatim(tokens) => syn::ImplItem::Verbatim(tokens),
        other => {
            return Err(TransformError::ScopeMismatch {
                generator: generator.to_string(),
                item: describe_item(&other),
                scope: format!("impl {}", imp.self_ty.to_token_stream()),
            });
        }
    };
    Ok(member)
}

fn describe_item(item: &syn::Item) -> String {
    let tokens = item.to_token_stream().to_string();
    let head: String = tokens.chars().take(40).collect();
    if head.len() < tokens.len() {
        format!("`{head}...`")
    } else {
        format!("`{head}`")
    }
}
