//! `DuplicateWithSuffix`: emit a copy of the annotated declaration under a new name.
//!
//! The new name is the original one followed by the suffix given as the attribute's first argument (`"Copy"` when
//! absent). Structs, enums, unions, type aliases, free functions and methods are supported. Attributes that resolve to
//! known attribute types are left off the copy.

use async_trait::async_trait;
use codesplice_core::{
    AttributeData, CancellationToken, Declaration, Diagnostic, DiagnosticSink, Generator, GeneratorError,
    TransformationContext, TypedConstant,
};

use syn::ext::IdentExt;

use crate::{check_cancelled, compose_ident, is_identifier_piece, plain_attributes};

const DEFAULT_SUFFIX: &str = "Copy";

#[derive(Debug, Clone)]
pub struct DuplicateWithSuffix {
    suffix: String,
}

impl DuplicateWithSuffix {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self { suffix: suffix.into() }
    }

    /// Configure from the triggering attribute: `#[Duplicate]` or `#[Duplicate("Suffix")]`.
    pub fn from_attribute(attribute: &AttributeData) -> Result<Self, GeneratorError> {
        match attribute.arg(0) {
            None => Ok(Self::new(DEFAULT_SUFFIX)),
            Some(TypedConstant::Str(suffix)) if is_identifier_tail(suffix) => Ok(Self::new(suffix.as_str())),
            Some(TypedConstant::Str(suffix)) => Err(GeneratorError::Configuration(format!(
                "suffix `{suffix}` cannot be appended to an identifier"
            ))),
            Some(other) => Err(GeneratorError::Configuration(format!(
                "expected a string suffix, found {}",
                other.kind_name()
            ))),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    fn rename(&self, ident: &syn::Ident) -> Result<syn::Ident, GeneratorError> {
        compose_ident(&format!("{}{}", ident.unraw(), self.suffix), ident.span())
    }
}

fn is_identifier_tail(suffix: &str) -> bool {
    is_identifier_piece("a", suffix, "")
}

#[async_trait(?Send)]
impl Generator for DuplicateWithSuffix {
    async fn generate(
        &self,
        context: &TransformationContext<'_>,
        diagnostics: &dyn DiagnosticSink,
        cancel: &CancellationToken,
    ) -> Result<Vec<syn::Item>, GeneratorError> {
        check_cancelled(cancel)?;
        let node = context.processing_node();
        let copy: syn::Item = match node {
            Declaration::Item(syn::Item::Struct(item)) => {
                let mut item = item.clone();
                item.attrs = plain_attributes(&item.attrs, context);
                item.ident = self.rename(&item.ident)?;
                syn::Item::Struct(item)
            }
            Declaration::Item(syn::Item::Enum(item)) => {
                let mut item = item.clone();
                item.attrs = plain_attributes(&item.attrs, context);
                item.ident = self.rename(&item.ident)?;
                syn::Item::Enum(item)
            }
            Declaration::Item(syn::Item::Union(item)) => {
                let mut item = item.clone();
                item.attrs = plain_attributes(&item.attrs, context);
                item.ident = self.rename(&item.ident)?;
                syn::Item::Union(item)
            }
            Declaration::Item(syn::Item::Type(item)) => {
                let mut item = item.clone();
                item.attrs = plain_attributes(&item.attrs, context);
                item.ident = self.rename(&item.ident)?;
                syn::Item::Type(item)
            }
            Declaration::Item(syn::Item::Fn(item)) => {
                let mut item = item.clone();
                item.attrs = plain_attributes(&item.attrs, context);
                item.sig.ident = self.rename(&item.sig.ident)?;
                syn::Item::Fn(item)
            }
            Declaration::ImplItem(syn::ImplItem::Fn(method)) => {
                // Emitted as a free `fn`; the engine turns it back into a method of the enclosing impl.
                syn::Item::Fn(syn::ItemFn {
                    attrs: plain_attributes(&method.attrs, context),
                    vis: method.vis.clone(),
                    sig: syn::Signature {
                        ident: self.rename(&method.sig.ident)?,
                        ..method.sig.clone()
                    },
                    block: Box::new(method.block.clone()),
                })
            }
            other => {
                return Err(GeneratorError::UnsupportedDeclaration(format!(
                    "cannot duplicate {}",
                    other.describe()
                )));
            }
        };

        diagnostics.report(Diagnostic::info(format!(
            "duplicated {} with suffix `{}`",
            node.describe(),
            self.suffix
        )));
        Ok(vec![copy])
    }
}
