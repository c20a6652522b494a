//! Generator invocation: build the plugin, hand it the context, collect its items.

use std::path::Path;
use std::sync::Arc;

use codesplice_core::lang::codes;
use codesplice_core::{
    AttributeData, CancellationToken, Compilation, Diagnostic, DiagnosticSink, GeneratorError, SemanticModel,
    TransformationContext,
};

use super::errors::TransformError;
use super::resolver::ResolvedGenerator;
use super::scanner::AnnotatedDeclaration;

/// Everything shared by the invocations of one transform.
pub(crate) struct InvocationEnv<'a> {
    pub model: &'a SemanticModel<'a>,
    pub compilation: &'a Arc<Compilation>,
    pub project_directory: &'a Path,
    pub diagnostics: &'a dyn DiagnosticSink,
    pub cancel: &'a CancellationToken,
}

/// Run one generator against one declaration.
///
/// Generator failures are reported as error diagnostics and yield no items; only cancellation aborts the transform.
pub(crate) async fn invoke(
    env: &InvocationEnv<'_>,
    target: &AnnotatedDeclaration<'_>,
    attribute: &AttributeData,
    generator: &ResolvedGenerator,
) -> Result<Vec<syn::Item>, TransformError> {
    let name = generator.locator.type_name.as_str();
    let result = match (generator.factory())(attribute) {
        Ok(plugin) => {
            let context = TransformationContext::new(
                target.declaration,
                target.namespace,
                env.model,
                env.compilation,
                env.project_directory,
            );
            plugin.generate(&context, env.diagnostics, env.cancel).await
        }
        Err(err) => Err(err),
    };

    if env.cancel.is_cancelled() {
        return Err(TransformError::Cancelled);
    }
    match result {
        Ok(items) => {
            tracing::debug!(generator = name, items = items.len(), "generator finished");
            Ok(items)
        }
        Err(GeneratorError::Cancelled) => Err(TransformError::Cancelled),
        Err(err) => {
            env.diagnostics.report(
                Diagnostic::error(format!(
                    "generator `{name}` failed on {}: {err}",
                    target.declaration.describe()
                ))
                .with_code(codes::GENERATOR_FAILED),
            );
            Ok(Vec::new())
        }
    }
}
