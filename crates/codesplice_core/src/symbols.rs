//! Symbols of the whole program: namespaces and types, stored in an arena owned by
//! [`Compilation`](crate::compilation::Compilation).
//!
//! Every symbol knows its containing symbol (or none for the global namespace), so the fully-qualified name of a type
//! is obtained by walking the containing chain from the innermost symbol outwards.

use crate::attributes::AttributeData;
use crate::lang::NAME_SEPARATOR;

/// Index of a symbol in its compilation's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) usize);

impl SymbolId {
    /// Raw arena index (stable for the lifetime of the compilation).
    pub fn index(self) -> usize {
        self.0
    }
}

/// What kind of type a [`TypeSymbol`] was declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Struct,
    Enum,
    Union,
    Trait,
    Alias,
}

impl TypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
            TypeKind::Union => "union",
            TypeKind::Trait => "trait",
            TypeKind::Alias => "type",
        }
    }
}

/// A named namespace (an inline or file `mod`).
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceSymbol {
    pub name: String,
    pub containing: Option<SymbolId>,
}

/// A named type and the attributes declared on it.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSymbol {
    pub name: String,
    pub kind: TypeKind,
    /// Namespace (or, in principle, type) this type is declared in.
    pub containing: Option<SymbolId>,
    /// Module (crate) that hosts the type.
    pub module: String,
    /// Resolved attributes on the declaration of this type.
    pub attributes: Vec<AttributeData>,
}

/// An entry in the symbol arena.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Namespace(NamespaceSymbol),
    Type(TypeSymbol),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Namespace(ns) => &ns.name,
            Symbol::Type(ty) => &ty.name,
        }
    }

    pub fn containing(&self) -> Option<SymbolId> {
        match self {
            Symbol::Namespace(ns) => ns.containing,
            Symbol::Type(ty) => ty.containing,
        }
    }

    pub fn as_type(&self) -> Option<&TypeSymbol> {
        match self {
            Symbol::Type(ty) => Some(ty),
            Symbol::Namespace(_) => None,
        }
    }
}

/// Arena of symbols with containment-aware name helpers.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, symbol: Symbol) -> SymbolId {
        self.symbols.push(symbol);
        SymbolId(self.symbols.len() - 1)
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0)
    }

    pub fn get_type(&self, id: SymbolId) -> Option<&TypeSymbol> {
        self.get(id).and_then(Symbol::as_type)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter().enumerate().map(|(i, s)| (SymbolId(i), s))
    }

    pub fn types(&self) -> impl Iterator<Item = (SymbolId, &TypeSymbol)> {
        self.iter().filter_map(|(id, s)| s.as_type().map(|ty| (id, ty)))
    }

    /// Names of `id` and its containing symbols, innermost first.
    pub fn containing_chain(&self, id: SymbolId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let Some(symbol) = self.get(cur) else {
                break;
            };
            names.push(symbol.name());
            current = symbol.containing();
        }
        names
    }

    /// Fully-qualified, dot-joined name of `id` (including every containing namespace and type).
    pub fn full_name(&self, id: SymbolId) -> String {
        let mut names = self.containing_chain(id);
        names.reverse();
        names.join(NAME_SEPARATOR)
    }

    /// Names of the symbols containing `id`, outermost first (excluding `id` itself).
    pub fn namespace_path(&self, id: SymbolId) -> Vec<String> {
        let mut names: Vec<String> = self.containing_chain(id).into_iter().skip(1).map(str::to_string).collect();
        names.reverse();
        names
    }

    /// Find the namespace named `name` directly inside `containing`.
    pub fn find_namespace(&self, containing: Option<SymbolId>, name: &str) -> Option<SymbolId> {
        self.iter().find_map(|(id, s)| match s {
            Symbol::Namespace(ns) if ns.containing == containing && ns.name == name => Some(id),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(table: &mut SymbolTable, name: &str, containing: Option<SymbolId>) -> SymbolId {
        table.push(Symbol::Namespace(NamespaceSymbol {
            name: name.to_string(),
            containing,
        }))
    }

    fn ty(table: &mut SymbolTable, name: &str, containing: Option<SymbolId>) -> SymbolId {
        table.push(Symbol::Type(TypeSymbol {
            name: name.to_string(),
            kind: TypeKind::Struct,
            containing,
            module: "Acme".to_string(),
            attributes: Vec::new(),
        }))
    }

    #[test]
    fn full_name_walks_containing_chain() {
        let mut table = SymbolTable::new();
        let acme = ns(&mut table, "Acme", None);
        let widgets = ns(&mut table, "Widgets", Some(acme));
        let outer = ty(&mut table, "Outer", Some(widgets));
        let inner = ty(&mut table, "MyGen", Some(outer));

        assert_eq!(table.full_name(inner), "Acme.Widgets.Outer.MyGen");
        assert_eq!(table.containing_chain(inner), vec!["MyGen", "Outer", "Widgets", "Acme"]);
        assert_eq!(table.namespace_path(inner), vec!["Acme", "Widgets", "Outer"]);
    }

    #[test]
    fn global_type_has_simple_full_name() {
        let mut table = SymbolTable::new();
        let id = ty(&mut table, "MyGen", None);
        assert_eq!(table.full_name(id), "MyGen");
        assert!(table.namespace_path(id).is_empty());
    }

    #[test]
    fn find_namespace_respects_parent() {
        let mut table = SymbolTable::new();
        let a = ns(&mut table, "a", None);
        let nested = ns(&mut table, "b", Some(a));
        let top = ns(&mut table, "b", None);

        assert_eq!(table.find_namespace(Some(a), "b"), Some(nested));
        assert_eq!(table.find_namespace(None, "b"), Some(top));
        assert_eq!(table.find_namespace(None, "c"), None);
    }
}
