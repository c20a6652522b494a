//! Generator resolver: map an attribute to the plugin that implements it.
//!
//! Resolution is two-level. The attribute used on a declaration is a plain type; that type's own declaration carries
//! the `Generator` meta-attribute naming the generator, either as a `"Type.Name, Module"` locator string or as a type
//! path. The resolver reads that binding, asks the [`ModuleLoader`] for the module and looks the factory up in it.
//!
//! ## Notes
//! - An attribute type without a binding is not a generator attribute: [`resolve`] returns `Ok(None)`.
//! - A malformed binding is rejected rather than guessed at.

use codesplice_core::lang::LOCATOR_SEPARATOR;
use codesplice_core::{AttributeData, Compilation, GeneratorFactory, ModuleLoader, TypedConstant};

use super::errors::{ResolutionFailure, TransformError};

/// Where a generator lives: its fully-qualified type name and the module hosting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorLocator {
    pub type_name: String,
    pub module: String,
}

/// Parse a `"Type.Name, Module"` locator string.
///
/// Everything before the first `,` is the type name and everything after it is the module, both trimmed. Without a
/// separator the module is `default_module`.
pub fn parse_locator(value: &str, default_module: &str) -> Result<GeneratorLocator, String> {
    let (type_name, module) = match value.split_once(LOCATOR_SEPARATOR) {
        Some((type_name, module)) => (type_name.trim(), module.trim()),
        None => (value.trim(), default_module.trim()),
    };
    if type_name.is_empty() {
        return Err(format!("locator `{value}` has an empty type name"));
    }
    if module.is_empty() {
        return Err(format!("locator `{value}` has an empty module name"));
    }
    Ok(GeneratorLocator {
        type_name: type_name.to_string(),
        module: module.to_string(),
    })
}

/// Read the generator binding declared on the type of `attribute`.
pub fn locate(compilation: &Compilation, attribute: &AttributeData) -> Result<Option<GeneratorLocator>, TransformError> {
    let Some(binding) = compilation.generator_binding(attribute.class) else {
        return Ok(None);
    };
    let owner = attribute.class_name.as_str();
    if !binding.named_args.is_empty() {
        return Err(TransformError::invalid_binding(owner, "named arguments are not supported"));
    }
    let [value] = binding.args.as_slice() else {
        return Err(TransformError::invalid_binding(
            owner,
            format!("expected exactly one argument, found {}", binding.args.len()),
        ));
    };

    let locator = match value {
        TypedConstant::Str(text) => {
            let default_module = compilation.module_of(attribute.class).unwrap_or_default();
            parse_locator(text, default_module).map_err(|reason| TransformError::invalid_binding(owner, reason))?
        }
        TypedConstant::Type(id) => {
            let module = compilation.module_of(*id).ok_or_else(|| {
                TransformError::invalid_binding(owner, "generator type argument does not name a type")
            })?;
            GeneratorLocator {
                type_name: compilation.full_name(*id),
                module: module.to_string(),
            }
        }
        other => {
            return Err(TransformError::invalid_binding(
                owner,
                format!("expected a string or a type, found {}", other.kind_name()),
            ));
        }
    };
    tracing::debug!(attribute = owner, generator = %locator.type_name, module = %locator.module, "resolved generator binding");
    Ok(Some(locator))
}

/// A generator factory ready to be invoked, with the locator it was found through.
#[derive(Clone)]
pub struct ResolvedGenerator {
    pub locator: GeneratorLocator,
    factory: GeneratorFactory,
}

impl ResolvedGenerator {
    pub fn factory(&self) -> &GeneratorFactory {
        &self.factory
    }
}

/// Resolve the generator for `attribute`, loading its module through `loader`.
pub fn resolve(
    compilation: &Compilation,
    loader: &dyn ModuleLoader,
    attribute: &AttributeData,
) -> Result<Option<ResolvedGenerator>, TransformError> {
    let Some(locator) = locate(compilation, attribute)? else {
        return Ok(None);
    };
    let module = loader.load(&locator.module).ok_or_else(|| ResolutionFailure::ModuleNotFound {
        module: locator.module.clone(),
        attribute: attribute.class_name.clone(),
    })?;
    let Some(factory) = module.generator(&locator.type_name).cloned() else {
        return Err(ResolutionFailure::GeneratorNotFound {
            type_name: locator.type_name,
            module: locator.module,
            attribute: attribute.class_name.clone(),
        }
        .into());
    };
    Ok(Some(ResolvedGenerator { locator, factory }))
}
