//! Run a generator against one declaration of an in-memory program.

use std::path::Path;
use std::sync::Arc;

use codesplice_core::{
    AttributeData, CancellationToken, Compilation, Declaration, DiagnosticBag, Generator, GeneratorError,
    SemanticModel, TransformationContext,
};

pub(crate) struct Run {
    pub result: Result<Vec<syn::Item>, GeneratorError>,
    pub diagnostics: DiagnosticBag,
}

pub(crate) fn program(file: &syn::File) -> Arc<Compilation> {
    let mut builder = Compilation::builder("App");
    builder.add_source(file);
    Arc::new(builder.build())
}

/// First resolved attribute on `declaration`.
pub(crate) fn attribute(compilation: &Compilation, file: &syn::File, declaration: Declaration<'_>) -> AttributeData {
    SemanticModel::new(compilation, file)
        .declared_attributes(&declaration, None)
        .into_iter()
        .next()
        .expect("declaration carries a known attribute")
}

/// Run `generator` on `declaration`.
pub(crate) async fn run(
    compilation: &Arc<Compilation>,
    file: &syn::File,
    generator: &dyn Generator,
    declaration: Declaration<'_>,
    cancel: &CancellationToken,
) -> Run {
    let model = SemanticModel::new(compilation, file);
    let context = TransformationContext::new(declaration, None, &model, compilation, Path::new("."));
    let diagnostics = DiagnosticBag::new();
    let result = generator.generate(&context, &diagnostics, cancel).await;
    Run { result, diagnostics }
}

pub(crate) fn render(items: &[syn::Item]) -> String {
    quote::quote!(#(#items)*).to_string()
}
