//! Resolved attribute metadata: the attribute's type symbol plus its literal arguments.
//!
//! [`AttributeData`] is what a generator receives as its configuration. It carries no syntax (so it can live inside a
//! shared [`Compilation`](crate::compilation::Compilation)); arguments are decoded into [`TypedConstant`]s when the
//! attribute is resolved.
//!
//! ## Notes
//! - `#[Name]` has no arguments, `#[Name = value]` has one positional argument, `#[Name(a, b, key = c)]` has positional
//!   arguments followed by named ones.
//! - Argument expressions that are not literals, arrays or type paths decode to [`TypedConstant::Unsupported`]; the
//!   consumer decides whether that matters.

use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::{Expr, ExprLit, Lit, Meta, Token, UnOp};

use crate::symbols::SymbolId;

/// A decoded attribute argument.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedConstant {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    /// A path that resolved to a type symbol.
    Type(SymbolId),
    Array(Vec<TypedConstant>),
    /// A path that did not resolve to any known type.
    Unresolved(String),
    /// An expression shape that is not a constant (kept as its token text).
    Unsupported(String),
}

impl TypedConstant {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedConstant::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedConstant::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedConstant::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<SymbolId> {
        match self {
            TypedConstant::Type(id) => Some(*id),
            _ => None,
        }
    }

    /// Short description of the shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypedConstant::Str(_) => "string",
            TypedConstant::Int(_) => "integer",
            TypedConstant::Float(_) => "float",
            TypedConstant::Bool(_) => "bool",
            TypedConstant::Char(_) => "char",
            TypedConstant::Type(_) => "type",
            TypedConstant::Array(_) => "array",
            TypedConstant::Unresolved(_) => "unresolved path",
            TypedConstant::Unsupported(_) => "unsupported expression",
        }
    }
}

/// A `key = value` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArgument {
    pub name: String,
    pub value: TypedConstant,
}

/// A resolved attribute on a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeData {
    /// The attribute's type.
    pub class: SymbolId,
    /// Fully-qualified name of [`Self::class`].
    pub class_name: String,
    pub args: Vec<TypedConstant>,
    pub named_args: Vec<NamedArgument>,
}

impl AttributeData {
    pub fn new(class: SymbolId, class_name: impl Into<String>) -> Self {
        Self {
            class,
            class_name: class_name.into(),
            args: Vec::new(),
            named_args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, value: TypedConstant) -> Self {
        self.args.push(value);
        self
    }

    pub fn with_named_arg(mut self, name: impl Into<String>, value: TypedConstant) -> Self {
        self.named_args.push(NamedArgument {
            name: name.into(),
            value,
        });
        self
    }

    pub fn arg(&self, index: usize) -> Option<&TypedConstant> {
        self.args.get(index)
    }

    pub fn named(&self, name: &str) -> Option<&TypedConstant> {
        self.named_args.iter().find(|a| a.name == name).map(|a| &a.value)
    }

    /// Simple (last segment) name of the attribute's type.
    pub fn simple_name(&self) -> &str {
        self.class_name.rsplit('.').next().unwrap_or(&self.class_name)
    }
}

/// Positional and named arguments decoded from one attribute.
#[derive(Debug, Default)]
pub(crate) struct DecodedArguments {
    pub args: Vec<TypedConstant>,
    pub named_args: Vec<NamedArgument>,
}

/// Decode the arguments of `attr`, resolving type paths with `resolve_type`.
pub(crate) fn decode_arguments(
    attr: &syn::Attribute,
    resolve_type: &dyn Fn(&syn::Path) -> Option<SymbolId>,
) -> DecodedArguments {
    let mut decoded = DecodedArguments::default();
    match &attr.meta {
        Meta::Path(_) => {}
        Meta::NameValue(nv) => decoded.args.push(decode_expr(&nv.value, resolve_type)),
        Meta::List(list) => match list.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated) {
            Ok(exprs) => {
                for expr in exprs {
                    match expr {
                        Expr::Assign(assign) => match path_ident(&assign.left) {
                            Some(name) => decoded.named_args.push(NamedArgument {
                                name,
                                value: decode_expr(&assign.right, resolve_type),
                            }),
                            None => decoded
                                .args
                                .push(TypedConstant::Unsupported(assign.to_token_stream().to_string())),
                        },
                        other => decoded.args.push(decode_expr(&other, resolve_type)),
                    }
                }
            }
            Err(_) => decoded
                .args
                .push(TypedConstant::Unsupported(list.tokens.to_string())),
        },
    }
    decoded
}

fn path_ident(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Path(p) if p.qself.is_none() => p.path.get_ident().map(|i| i.to_string()),
        _ => None,
    }
}

fn decode_expr(expr: &Expr, resolve_type: &dyn Fn(&syn::Path) -> Option<SymbolId>) -> TypedConstant {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => decode_lit(lit, false),
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => match &*unary.expr {
            Expr::Lit(ExprLit { lit, .. }) => decode_lit(lit, true),
            _ => TypedConstant::Unsupported(expr.to_token_stream().to_string()),
        },
        Expr::Paren(paren) => decode_expr(&paren.expr, resolve_type),
        Expr::Group(group) => decode_expr(&group.expr, resolve_type),
        Expr::Array(array) => TypedConstant::Array(
            array
                .elems
                .iter()
                .map(|e| decode_expr(e, resolve_type))
                .collect(),
        ),
        Expr::Path(p) if p.qself.is_none() => match resolve_type(&p.path) {
            Some(id) => TypedConstant::Type(id),
            None => TypedConstant::Unresolved(path_text(&p.path)),
        },
        _ => TypedConstant::Unsupported(expr.to_token_stream().to_string()),
    }
}

fn decode_lit(lit: &Lit, negate: bool) -> TypedConstant {
    let unsupported = || TypedConstant::Unsupported(lit.to_token_stream().to_string());
    match lit {
        Lit::Str(s) if !negate => TypedConstant::Str(s.value()),
        Lit::Bool(b) if !negate => TypedConstant::Bool(b.value),
        Lit::Char(c) if !negate => TypedConstant::Char(c.value()),
        Lit::Int(i) => match i.base10_parse::<i64>() {
            Ok(v) if negate => TypedConstant::Int(-v),
            Ok(v) => TypedConstant::Int(v),
            Err(_) => unsupported(),
        },
        Lit::Float(f) => match f.base10_parse::<f64>() {
            Ok(v) if negate => TypedConstant::Float(-v),
            Ok(v) => TypedConstant::Float(v),
            Err(_) => unsupported(),
        },
        _ => unsupported(),
    }
}

/// Render a path as `a::b::C` without token spacing.
pub fn path_text(path: &syn::Path) -> String {
    let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
    let joined = segments.join("::");
    if path.leading_colon.is_some() {
        format!("::{joined}")
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn no_types(_: &syn::Path) -> Option<SymbolId> {
        None
    }

    fn decode(attr: syn::Attribute) -> DecodedArguments {
        decode_arguments(&attr, &no_types)
    }

    #[test]
    fn path_only_attribute_has_no_args() {
        let decoded = decode(parse_quote!(#[Marker]));
        assert!(decoded.args.is_empty());
        assert!(decoded.named_args.is_empty());
    }

    #[test]
    fn name_value_attribute_has_one_arg() {
        let decoded = decode(parse_quote!(#[Suffix = "Copy"]));
        assert_eq!(decoded.args, vec![TypedConstant::Str("Copy".into())]);
    }

    #[test]
    fn list_attribute_decodes_literals_in_order() {
        let decoded = decode(parse_quote!(#[Gen("a", 3, -2, 1.5, true, 'x')]));
        assert_eq!(
            decoded.args,
            vec![
                TypedConstant::Str("a".into()),
                TypedConstant::Int(3),
                TypedConstant::Int(-2),
                TypedConstant::Float(1.5),
                TypedConstant::Bool(true),
                TypedConstant::Char('x'),
            ]
        );
    }

    #[test]
    fn named_arguments_follow_positional() {
        let decoded = decode(parse_quote!(#[Gen("a", count = 2)]));
        assert_eq!(decoded.args, vec![TypedConstant::Str("a".into())]);
        assert_eq!(
            decoded.named_args,
            vec![NamedArgument {
                name: "count".into(),
                value: TypedConstant::Int(2)
            }]
        );
    }

    #[test]
    fn arrays_decode_recursively() {
        let decoded = decode(parse_quote!(#[Gen(["a", "b"])]));
        assert_eq!(
            decoded.args,
            vec![TypedConstant::Array(vec![
                TypedConstant::Str("a".into()),
                TypedConstant::Str("b".into())
            ])]
        );
    }

    #[test]
    fn paths_resolve_through_callback() {
        let attr: syn::Attribute = parse_quote!(#[Gen(widgets::MyGen, missing::Thing)]);
        let decoded = decode_arguments(&attr, &|path| {
            (path_text(path) == "widgets::MyGen").then_some(SymbolId(7))
        });
        assert_eq!(
            decoded.args,
            vec![
                TypedConstant::Type(SymbolId(7)),
                TypedConstant::Unresolved("missing::Thing".into())
            ]
        );
    }

    #[test]
    fn calls_are_unsupported() {
        let decoded = decode(parse_quote!(#[Gen(make())]));
        assert!(matches!(decoded.args.as_slice(), [TypedConstant::Unsupported(_)]));
    }

    #[test]
    fn simple_name_is_last_segment() {
        let data = AttributeData::new(SymbolId(0), "acme.widgets.DuplicateAttribute");
        assert_eq!(data.simple_name(), "DuplicateAttribute");
    }
}
