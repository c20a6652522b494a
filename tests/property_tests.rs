//! Property-based tests for the document transform
//!
//! These tests use proptest to check invariants over generated inputs: import pass-through and the canonical line
//! endings of rendered output.

use std::sync::Arc;

use codesplice::LineEnding;
use codesplice::format::{normalize_line_endings, render};
use codesplice::transform::DocumentTransform;
use codesplice_core::{Compilation, PluginRegistry};
use proptest::prelude::*;
use quote::ToTokens;

/// Transform `source` with no generators registered.
fn transform(source: &syn::File) -> codesplice::OutputUnit {
    let mut builder = Compilation::builder("App");
    builder.add_source(source);
    let registry = PluginRegistry::new();
    let transform = DocumentTransform::builder()
        .compilation(Arc::new(builder.build()))
        .source(source)
        .loader(&registry)
        .build()
        .expect("inputs");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    runtime.block_on(transform.transform()).expect("transformed")
}

fn ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}".prop_filter("not a keyword", |s| {
        syn::parse_str::<syn::Ident>(s).is_ok()
    })
}

/// A top-level item: either a `use` or a plain function.
fn item() -> impl Strategy<Value = (bool, String)> {
    prop_oneof![
        (ident(), ident()).prop_map(|(a, b)| (true, format!("use {a}::{b};"))),
        ident().prop_map(|name| (false, format!("fn {name}() {{}}"))),
    ]
}

// =============================================================================
// Import properties
// =============================================================================

proptest! {
    /// Property: output imports equal the input's top-level imports, in order.
    #[test]
    fn imports_pass_through(items in prop::collection::vec(item(), 0..12)) {
        let text: String = items.iter().map(|(_, item)| format!("{item}\n")).collect();
        let source: syn::File = syn::parse_str(&text).expect("generated source parses");
        let expected: Vec<String> = source
            .items
            .iter()
            .filter_map(|item| match item {
                syn::Item::Use(import) => Some(import.to_token_stream().to_string()),
                _ => None,
            })
            .collect();

        let unit = transform(&source);
        let actual: Vec<String> = unit.imports.iter().map(|u| u.to_token_stream().to_string()).collect();
        prop_assert_eq!(actual, expected);
        prop_assert!(unit.members.is_empty());
    }
}

// =============================================================================
// Line ending properties
// =============================================================================

proptest! {
    /// Property: the rendered header uses one convention whatever the input file used.
    #[test]
    fn header_line_endings_are_canonical(crlf_input in any::<bool>(), crlf_output in any::<bool>()) {
        let eol = if crlf_input { "\r\n" } else { "\n" };
        let text = format!("use std::fmt;{eol}fn f() {{}}{eol}");
        let source: syn::File = syn::parse_str(&text).expect("parses");
        let line_ending = if crlf_output { LineEnding::CrLf } else { LineEnding::Lf };

        let rendered = render(&transform(&source), line_ending);
        let header_end = codesplice_core::lang::HEADER_LINES.len();
        let terminators: Vec<&str> = rendered.split_inclusive('\n').take(header_end).map(|line| {
            if line.ends_with("\r\n") { "\r\n" } else { "\n" }
        }).collect();
        prop_assert!(terminators.iter().all(|t| *t == line_ending.as_str()));
        prop_assert_eq!(normalize_line_endings(&rendered, line_ending), rendered.clone());
    }

    /// Property: normalization is idempotent and leaves no foreign terminators.
    #[test]
    fn normalization_is_idempotent(text in "[a-z\r\n]{0,40}") {
        let once = normalize_line_endings(&text, LineEnding::Lf);
        prop_assert!(!once.contains('\r'));
        prop_assert_eq!(normalize_line_endings(&once, LineEnding::Lf), once);
    }
}
