//! Reference generator plugins for codesplice.
//!
//! All generators live in one plugin module, [`MODULE_NAME`]. Bind an attribute type to one of them with the
//! `Generator` meta-attribute, using either locator string form:
//!
//! ```text
//! #[Generator("codesplice.generators.Accessors, codesplice.generators")]
//! pub struct AccessorsAttribute;
//! ```
//!
//! ## See also
//! - [`duplicate`]: copy a declaration under a suffixed name.
//! - [`accessors`]: getter methods for the fields of a struct.

pub mod accessors;
pub mod duplicate;
#[cfg(test)]
mod testing;

use codesplice_core::{Generator, GeneratorError, PluginModule};

pub use accessors::Accessors;
pub use duplicate::DuplicateWithSuffix;

/// Name of the plugin module hosting these generators.
pub const MODULE_NAME: &str = "codesplice.generators";

/// Fully-qualified generator names.
pub mod names {
    pub const DUPLICATE_WITH_SUFFIX: &str = "codesplice.generators.DuplicateWithSuffix";
    pub const ACCESSORS: &str = "codesplice.generators.Accessors";
}

/// The plugin module, ready to register with a loader.
pub fn module() -> PluginModule {
    PluginModule::new(MODULE_NAME)
        .with_generator(names::DUPLICATE_WITH_SUFFIX, |attribute| {
            DuplicateWithSuffix::from_attribute(attribute).map(|g| Box::new(g) as Box<dyn Generator>)
        })
        .with_generator(names::ACCESSORS, |attribute| {
            Accessors::from_attribute(attribute).map(|g| Box::new(g) as Box<dyn Generator>)
        })
}

/// Copy `attrs`, leaving out every attribute the compilation resolves to a known attribute type.
///
/// Generated copies must not carry the attributes that triggered generation, or the output would trigger it again.
pub(crate) fn plain_attributes(
    attrs: &[syn::Attribute],
    context: &codesplice_core::TransformationContext<'_>,
) -> Vec<syn::Attribute> {
    attrs
        .iter()
        .filter(|attr| {
            context
                .compilation()
                .resolve_attribute_type(attr.path(), context.scope())
                .is_none()
        })
        .cloned()
        .collect()
}

/// Build an identifier from generated text, failing instead of panicking when the text is not one.
pub(crate) fn compose_ident(text: &str, span: proc_macro2::Span) -> Result<syn::Ident, GeneratorError> {
    let mut ident = syn::parse_str::<syn::Ident>(text)
        .map_err(|_| GeneratorError::Failed(format!("`{text}` is not a valid identifier")))?;
    ident.set_span(span);
    Ok(ident)
}

/// Whether `piece` can be glued to an identifier (`before` and `after` stand in for the rest of it).
pub(crate) fn is_identifier_piece(before: &str, piece: &str, after: &str) -> bool {
    syn::parse_str::<syn::Ident>(&format!("{before}{piece}{after}"))
        .is_ok_and(|ident| !ident.to_string().starts_with("r#"))
}

pub(crate) fn check_cancelled(cancel: &codesplice_core::CancellationToken) -> Result<(), GeneratorError> {
    if cancel.is_cancelled() {
        Err(GeneratorError::Cancelled)
    } else {
        Ok(())
    }
}
