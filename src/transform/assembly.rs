//! Output assembly: the synthetic file for one input.

use codesplice_core::lang::HEADER_LINES;

/// The generated file for one input, before rendering to text.
#[derive(Debug, Clone)]
pub struct OutputUnit {
    /// Top-level `use` items of the input, verbatim and in order.
    pub imports: Vec<syn::ItemUse>,
    /// Reconstructed generator output, in scan order.
    pub members: Vec<syn::Item>,
    /// Banner lines, without line terminators.
    pub header: &'static [&'static str],
}

impl OutputUnit {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The unit as a `syn::File`: imports first, then members.
    pub fn to_file(&self) -> syn::File {
        let mut items: Vec<syn::Item> = self.imports.iter().cloned().map(syn::Item::Use).collect();
        items.extend(self.members.iter().cloned());
        syn::File {
            shebang: None,
            attrs: Vec::new(),
            items,
        }
    }
}

/// Combine `source`'s imports with the generated `members`.
pub fn assemble(source: &syn::File, members: Vec<syn::Item>) -> OutputUnit {
    let imports = source
        .items
        .iter()
        .filter_map(|item| match item {
            syn::Item::Use(import) => Some(import.clone()),
            _ => None,
        })
        .collect();
    OutputUnit {
        imports,
        members,
        header: HEADER_LINES,
    }
}
