//! Golden snapshot tests for rendered output
//!
//! These tests run the reference generators over small programs and compare the rendered files against stored
//! snapshots, so changes to reconstruction or formatting are reviewed and intentional.
//!
//! Run with: `cargo test --test snapshot_tests`
//! Review changes: `cargo insta review`

use std::sync::Arc;

use codesplice::LineEnding;
use codesplice::cli::commands::builtin_registry;
use codesplice::format::render;
use codesplice::transform::DocumentTransform;
use codesplice_core::{Compilation, DiagnosticBag};
use syn::parse_quote;

/// Attribute types bound to the reference generators, as a referenced library would declare them.
fn library() -> syn::File {
    parse_quote! {
        #[Generator("codesplice.generators.Accessors, codesplice.generators")]
        pub struct AccessorsAttribute;

        #[Generator("codesplice.generators.DuplicateWithSuffix, codesplice.generators")]
        pub struct DuplicateAttribute;
    }
}

async fn generate(program: &syn::File) -> String {
    let mut builder = Compilation::builder("App");
    builder.add_module_source("Acme", &library()).add_source(program);
    let registry = builtin_registry();
    let diagnostics = DiagnosticBag::new();
    let unit = DocumentTransform::builder()
        .compilation(Arc::new(builder.build()))
        .source(program)
        .loader(&registry)
        .diagnostics(&diagnostics)
        .build()
        .expect("inputs")
        .transform()
        .await
        .expect("transformed");
    assert!(!diagnostics.has_errors(), "{:?}", diagnostics.entries());
    render(&unit, LineEnding::Lf)
}

#[tokio::test]
async fn test_shapes_module() {
    let program: syn::File = parse_quote! {
        use std::fmt;

        pub mod shapes {
            #[Accessors(prefix = "get_")]
            pub struct Rect {
                width: u32,
                height: u32,
            }

            impl Rect {
                #[Duplicate("Twice")]
                pub fn area(&self) -> u32 {
                    self.width * self.height
                }
            }
        }
    };
    insta::assert_snapshot!("shapes_module", generate(&program).await);
}

#[tokio::test]
async fn test_no_annotations() {
    let program: syn::File = parse_quote! {
        use std::io;
        use std::fmt::Write as _;

        fn untouched() {}
    };
    insta::assert_snapshot!("no_annotations", generate(&program).await);
}

#[tokio::test]
async fn bad_generator_arguments_become_diagnostics() {
    let program: syn::File = parse_quote! {
        #[Accessors(prefix = "get-")]
        pub struct Rect { width: u32 }

        #[Duplicate("\u{b2}")]
        fn squared() {}

        #[Duplicate]
        fn r#match() {}
    };
    let mut builder = Compilation::builder("App");
    builder.add_module_source("Acme", &library()).add_source(&program);
    let registry = builtin_registry();
    let diagnostics = DiagnosticBag::new();
    let unit = DocumentTransform::builder()
        .compilation(Arc::new(builder.build()))
        .source(&program)
        .loader(&registry)
        .diagnostics(&diagnostics)
        .build()
        .expect("inputs")
        .transform()
        .await
        .expect("transformed");

    let failures: Vec<_> = diagnostics
        .entries()
        .into_iter()
        .filter(|d| d.code.as_deref() == Some(codesplice_core::lang::codes::GENERATOR_FAILED))
        .collect();
    assert_eq!(failures.len(), 2, "{failures:?}");
    let text = render(&unit, LineEnding::Lf);
    assert!(text.contains("fn matchCopy()"), "{text}");
}
