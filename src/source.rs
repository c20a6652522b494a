//! Reading and parsing input files.

use std::fs;
use std::path::{Path, PathBuf};

use miette::{NamedSource, SourceSpan};
use thiserror::Error;

/// Inputs larger than this are rejected before parsing.
pub const MAX_SOURCE_BYTES: u64 = 16 * 1024 * 1024;

/// An input file: its path, its text and its syntax tree.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    pub syntax: syn::File,
}

impl SourceFile {
    /// Parse `text` as the contents of `path`.
    pub fn parse(path: impl Into<PathBuf>, text: String) -> Result<Self, SourceError> {
        let path = path.into();
        match syn::parse_file(&text) {
            Ok(syntax) => Ok(Self { path, text, syntax }),
            Err(err) => Err(SourceError::Parse(ParseError::new(&path, &text, &err))),
        }
    }

    /// Directory containing the file (`.` for bare file names).
    pub fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// File name without its extension.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string())
    }
}

/// Read and parse the file at `path`.
pub fn read_source(path: &Path) -> Result<SourceFile, SourceError> {
    let io_error = |source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let size = fs::metadata(path).map_err(io_error)?.len();
    if size > MAX_SOURCE_BYTES {
        return Err(SourceError::TooLarge {
            path: path.to_path_buf(),
            size,
        });
    }
    let text = fs::read_to_string(path).map_err(io_error)?;
    SourceFile::parse(path, text)
}

#[derive(Debug, Error, miette::Diagnostic)]
pub enum SourceError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is {size} bytes, larger than the {limit} byte limit", .path.display(), limit = MAX_SOURCE_BYTES)]
    TooLarge { path: PathBuf, size: u64 },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(ParseError),
}

/// A syntax error with the offending source attached for rendering.
#[derive(Debug, Error, miette::Diagnostic)]
#[error("failed to parse {path}")]
#[diagnostic(code(codesplice::parse))]
pub struct ParseError {
    path: String,
    message: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{message}")]
    span: SourceSpan,
}

impl ParseError {
    fn new(path: &Path, text: &str, err: &syn::Error) -> Self {
        let path = path.display().to_string();
        let start = err.span().start();
        let end = err.span().end();
        let offset = byte_offset(text, start.line, start.column);
        let end_offset = byte_offset(text, end.line, end.column).max(offset);
        Self {
            message: err.to_string(),
            source_code: NamedSource::new(path.clone(), text.to_string()),
            span: (offset, end_offset - offset).into(),
            path,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Byte offset of a 1-based line and 0-based character column, clamped to the text.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (index, content) in text.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let within = content
                .char_indices()
                .nth(column)
                .map(|(byte, _)| byte)
                .unwrap_or(content.len());
            return offset + within;
        }
        offset += content.len();
    }
    text.len()
}
