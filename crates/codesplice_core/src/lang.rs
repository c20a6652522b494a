//! Well-known names and fixed text shared by the engine, the CLI and generators.
//!
//! ## Notes
//! - Names are dot-joined fully-qualified symbol names (`codesplice.GeneratorAttribute`), not Rust paths.
//! - Diagnostic codes are stable; tooling may match on them.

/// Module that hosts the built-in symbols (the generator binding meta-attribute).
pub const CORE_MODULE: &str = "codesplice";

/// Namespace of the built-in symbols inside [`CORE_MODULE`].
pub const CORE_NAMESPACE: &str = "codesplice";

/// Simple name of the meta-attribute that binds an attribute type to its generator.
pub const GENERATOR_ATTRIBUTE_NAME: &str = "GeneratorAttribute";

/// Fully-qualified name of the generator binding meta-attribute.
pub const GENERATOR_ATTRIBUTE: &str = "codesplice.GeneratorAttribute";

/// Suffix implied when an attribute is written without it (`#[Foo]` may name `FooAttribute`).
pub const ATTRIBUTE_SUFFIX: &str = "Attribute";

/// Separator between the type name and the module name in a string generator locator.
pub const LOCATOR_SEPARATOR: char = ',';

/// Separator used when joining symbol names into a fully-qualified name.
pub const NAME_SEPARATOR: &str = ".";

/// Default tool id used as the prefix of warning and error lines.
pub const TOOL_ID: &str = "codesplice";

/// Banner placed at the top of every generated file, one entry per line.
pub const HEADER_LINES: &[&str] = &[
    "// ------------------------------------------------------------------------------",
    "// <auto-generated>",
    "//     This code was generated by a tool.",
    "//",
    "//     Changes to this file may cause incorrect behavior and will be lost if",
    "//     the code is regenerated.",
    "// </auto-generated>",
    "// ------------------------------------------------------------------------------",
];

/// Stable diagnostic codes.
pub mod codes {
    /// A whole input file failed to generate (resolution failure, parse error, I/O).
    pub const FILE_FAILED: &str = "CSG0001";
    /// A generator failed to construct or to generate.
    pub const GENERATOR_FAILED: &str = "CSG1001";
}

/// Return the candidate names an attribute written as `name` may refer to.
///
/// ## Examples
/// ```rust
/// use codesplice_core::lang::attribute_name_candidates;
///
/// assert_eq!(attribute_name_candidates("Foo"), ["Foo".to_string(), "FooAttribute".to_string()]);
/// ```
pub fn attribute_name_candidates(name: &str) -> [String; 2] {
    [name.to_string(), format!("{name}{ATTRIBUTE_SUFFIX}")]
}

/// Check whether `class_name` (a simple type name) is what an attribute written as `written` refers to.
pub fn attribute_name_matches(written: &str, class_name: &str) -> bool {
    class_name == written || class_name.strip_suffix(ATTRIBUTE_SUFFIX) == Some(written)
}
