//! `Accessors`: a getter method for every named field of the annotated struct.
//!
//! The generated `impl` block carries the struct's generics. Getters return a shared reference to the field and are
//! named after it, with an optional `prefix = "..."` named argument (`#[Accessors(prefix = "get_")]`). Fields marked
//! `#[skip_accessor]` are left out.

use async_trait::async_trait;
use codesplice_core::{
    AttributeData, CancellationToken, Declaration, Diagnostic, DiagnosticSink, Generator, GeneratorError,
    TransformationContext, TypedConstant,
};
use syn::ext::IdentExt;
use syn::parse_quote;

use crate::{check_cancelled, compose_ident, is_identifier_piece};

const SKIP_MARKER: &str = "skip_accessor";

#[derive(Debug, Clone, Default)]
pub struct Accessors {
    prefix: String,
}

impl Accessors {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn from_attribute(attribute: &AttributeData) -> Result<Self, GeneratorError> {
        if !attribute.args.is_empty() {
            return Err(GeneratorError::Configuration(
                "accessors take no positional arguments".to_string(),
            ));
        }
        match attribute.named("prefix") {
            None => Ok(Self::default()),
            Some(TypedConstant::Str(prefix)) if prefix.is_empty() || is_identifier_piece("", prefix, "a") => {
                Ok(Self::with_prefix(prefix.as_str()))
            }
            Some(TypedConstant::Str(prefix)) => Err(GeneratorError::Configuration(format!(
                "prefix `{prefix}` cannot start an identifier"
            ))),
            Some(other) => Err(GeneratorError::Configuration(format!(
                "`prefix` must be a string, found {}",
                other.kind_name()
            ))),
        }
    }
}

#[async_trait(?Send)]
impl Generator for Accessors {
    async fn generate(
        &self,
        context: &TransformationContext<'_>,
        diagnostics: &dyn DiagnosticSink,
        cancel: &CancellationToken,
    ) -> Result<Vec<syn::Item>, GeneratorError> {
        check_cancelled(cancel)?;
        let node = context.processing_node();
        let Declaration::Item(syn::Item::Struct(item)) = node else {
            return Err(GeneratorError::UnsupportedDeclaration(format!(
                "accessors need a struct, found {}",
                node.describe()
            )));
        };
        let syn::Fields::Named(fields) = &item.fields else {
            return Err(GeneratorError::UnsupportedDeclaration(format!(
                "struct `{}` has no named fields",
                item.ident
            )));
        };

        let mut getters: Vec<syn::ImplItem> = Vec::new();
        for field in &fields.named {
            if field.attrs.iter().any(|attr| attr.path().is_ident(SKIP_MARKER)) {
                continue;
            }
            let Some(name) = field.ident.as_ref() else {
                continue;
            };
            let getter = if self.prefix.is_empty() {
                name.clone()
            } else {
                compose_ident(&format!("{}{}", self.prefix, name.unraw()), name.span())?
            };
            let ty = &field.ty;
            getters.push(parse_quote! {
                pub fn #getter(&self) -> &#ty {
                    &self.#name
                }
            });
        }

        if getters.is_empty() {
            diagnostics.report(Diagnostic::warning(format!(
                "struct `{}` has no fields to generate accessors for",
                item.ident
            )));
            return Ok(Vec::new());
        }

        let ident = &item.ident;
        let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
        diagnostics.report(Diagnostic::info(format!(
            "generated {} accessor(s) for `{ident}`",
            getters.len()
        )));
        Ok(vec![parse_quote! {
            impl #impl_generics #ident #ty_generics #where_clause {
                #(#getters)*
            }
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{attribute, program, render, run};
    use codesplice_core::Severity;

    fn source() -> syn::File {
        parse_quote! {
            pub struct AccessorsAttribute;

            #[Accessors(prefix = "get_")]
            pub struct Pair<T: Clone> {
                left: T,
                #[skip_accessor]
                cache: Option<T>,
                right: T,
            }

            #[Accessors]
            pub struct Empty {}

            #[Accessors]
            pub struct Tuple(u8);
        }
    }

    #[tokio::test]
    async fn generic_struct_gets_prefixed_getters() {
        let file = source();
        let compilation = program(&file);
        let attr = attribute(&compilation, &file, Declaration::Item(&file.items[1]));
        let generator = Accessors::from_attribute(&attr).expect("configured");

        let run = run(&compilation, &file, &generator, Declaration::Item(&file.items[1]), &CancellationToken::new()).await;
        let text = render(&run.result.expect("generated"));
        assert_eq!(
            text,
            "impl < T : Clone > Pair < T > { \
             pub fn get_left (& self) -> & T { & self . left } \
             pub fn get_right (& self) -> & T { & self . right } }"
        );
        let entries = run.diagnostics.entries();
        assert_eq!(entries[0].severity, Severity::Info);
    }

    #[tokio::test]
    async fn struct_without_fields_warns_and_generates_nothing() {
        let file = source();
        let compilation = program(&file);
        let run = run(
            &compilation,
            &file,
            &Accessors::default(),
            Declaration::Item(&file.items[2]),
            &CancellationToken::new(),
        )
        .await;
        assert!(run.result.expect("no failure").is_empty());
        assert_eq!(run.diagnostics.entries()[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn tuple_structs_are_unsupported() {
        let file = source();
        let compilation = program(&file);
        let run = run(
            &compilation,
            &file,
            &Accessors::default(),
            Declaration::Item(&file.items[3]),
            &CancellationToken::new(),
        )
        .await;
        assert!(matches!(run.result, Err(GeneratorError::UnsupportedDeclaration(_))));
    }

    #[test]
    fn prefix_must_start_an_identifier() {
        let file: syn::File = parse_quote! {
            pub struct AccessorsAttribute;
            #[Accessors(prefix = "get-")]
            pub struct S { a: u8 }
        };
        let compilation = program(&file);
        let attr = attribute(&compilation, &file, Declaration::Item(&file.items[1]));
        assert!(matches!(
            Accessors::from_attribute(&attr),
            Err(GeneratorError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn unusable_prefix_fails_instead_of_panicking() {
        let file: syn::File = parse_quote! {
            pub struct S { a: u8 }
        };
        let compilation = program(&file);
        let run = run(
            &compilation,
            &file,
            &Accessors::with_prefix("get-"),
            Declaration::Item(&file.items[0]),
            &CancellationToken::new(),
        )
        .await;
        assert!(matches!(run.result, Err(GeneratorError::Failed(_))));
    }

    #[tokio::test]
    async fn raw_field_names_keep_their_getter_usable() {
        let file: syn::File = parse_quote! {
            pub struct S { r#type: u8 }
        };
        let compilation = program(&file);
        let run = run(
            &compilation,
            &file,
            &Accessors::with_prefix("get_"),
            Declaration::Item(&file.items[0]),
            &CancellationToken::new(),
        )
        .await;
        assert_eq!(
            render(&run.result.expect("generated")),
            "impl S { pub fn get_type (& self) -> & u8 { & self . r#type } }"
        );
    }

    #[test]
    fn positional_arguments_are_rejected() {
        let file: syn::File = parse_quote! {
            pub struct AccessorsAttribute;
            #[Accessors("x")]
            pub struct S { a: u8 }
        };
        let compilation = program(&file);
        let attr = attribute(&compilation, &file, Declaration::Item(&file.items[1]));
        assert!(matches!(
            Accessors::from_attribute(&attr),
            Err(GeneratorError::Configuration(_))
        ));
    }
}
