//! Batch driver: transform a set of input files and write their generated outputs.
//!
//! Every input is transformed with the same compilation and loader. A file whose transform fails is reported through
//! the diagnostics sink (code `CSG0001`) and skipped; the remaining files still generate. Outputs are named
//! `<stem><suffix>` under the output directory, and optionally listed one per line in a generated-files list.
//!
//! ## Notes
//! - Files are processed one after another; `syn` trees are not `Send`.
//! - Files whose transform produced no members are not written.
//! - An output whose content is unchanged on disk is left untouched.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use codesplice_core::lang::codes;
use codesplice_core::{CancellationToken, Compilation, Diagnostic, DiagnosticSink, ModuleLoader};
use thiserror::Error;

use crate::config::GenerateConfig;
use crate::format;
use crate::source::SourceFile;
use crate::transform::{DocumentTransform, TransformError};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{failed} of {total} file(s) failed to generate")]
    FilesFailed { failed: usize, total: usize },
    #[error("generation cancelled")]
    Cancelled,
}

/// What a batch run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Output files, in input order (written or already up to date).
    pub outputs: Vec<PathBuf>,
    /// Inputs whose transform failed.
    pub failed: Vec<PathBuf>,
}

/// Transforms input files into generated files under one output directory.
pub struct ProjectGenerator<'a> {
    output_dir: PathBuf,
    config: GenerateConfig,
    compilation: Arc<Compilation>,
    loader: &'a dyn ModuleLoader,
    diagnostics: &'a dyn DiagnosticSink,
    generated_files_list: Option<PathBuf>,
    cancel: CancellationToken,
}

impl<'a> ProjectGenerator<'a> {
    pub fn new(
        output_dir: impl AsRef<Path>,
        compilation: Arc<Compilation>,
        loader: &'a dyn ModuleLoader,
        diagnostics: &'a dyn DiagnosticSink,
    ) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            config: GenerateConfig::default(),
            compilation,
            loader,
            diagnostics,
            generated_files_list: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_config(mut self, config: GenerateConfig) -> Self {
        self.config = config;
        self
    }

    /// Also write the output paths, one per line, to `path`.
    pub fn with_generated_files_list(mut self, path: impl AsRef<Path>) -> Self {
        self.generated_files_list = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Path of the output generated for `source`.
    pub fn output_path(&self, source: &SourceFile) -> PathBuf {
        self.output_dir
            .join(format!("{}{}", source.stem(), self.config.output_suffix))
    }

    /// Render one file's output without writing it. `Ok(None)` when nothing was generated.
    pub async fn render(&self, source: &SourceFile) -> Result<Option<String>, TransformError> {
        let transform = DocumentTransform::builder()
            .compilation(self.compilation.clone())
            .source(&source.syntax)
            .loader(self.loader)
            .diagnostics(self.diagnostics)
            .project_directory(source.directory())
            .cancellation(self.cancel.clone())
            .build()?;
        let unit = transform.transform().await?;
        if unit.is_empty() {
            return Ok(None);
        }
        Ok(Some(format::render(&unit, self.config.line_ending)))
    }

    /// Transform and write every file in `sources`.
    #[tracing::instrument(skip_all, fields(files = sources.len(), out = %self.output_dir.display()))]
    pub async fn generate(&self, sources: &[SourceFile]) -> Result<GenerationSummary, ProjectError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| ProjectError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let mut summary = GenerationSummary::default();
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        for source in sources {
            let output = self.output_path(source);
            if !claimed.insert(output.clone()) {
                self.fail(source, &format!("output {} is already produced by another input", output.display()));
                summary.failed.push(source.path.clone());
                continue;
            }

            match self.render(source).await {
                Ok(Some(text)) => {
                    write_if_changed(&output, &text)?;
                    summary.outputs.push(output);
                }
                Ok(None) => {
                    tracing::debug!(file = %source.path.display(), "nothing generated");
                }
                Err(TransformError::Cancelled) => return Err(ProjectError::Cancelled),
                Err(err) => {
                    self.fail(source, &err.to_string());
                    summary.failed.push(source.path.clone());
                }
            }
        }

        if let Some(list) = &self.generated_files_list {
            let mut text = String::new();
            for output in &summary.outputs {
                text.push_str(&output.display().to_string());
                text.push('\n');
            }
            write_if_changed(list, &text)?;
        }

        tracing::info!(
            written = summary.outputs.len(),
            failed = summary.failed.len(),
            "generation finished"
        );
        if summary.failed.is_empty() {
            Ok(summary)
        } else {
            Err(ProjectError::FilesFailed {
                failed: summary.failed.len(),
                total: sources.len(),
            })
        }
    }

    fn fail(&self, source: &SourceFile, message: &str) {
        self.diagnostics.report(
            Diagnostic::error(format!("{}: {message}", source.path.display())).with_code(codes::FILE_FAILED),
        );
    }
}

fn write_if_changed(path: &Path, text: &str) -> Result<(), ProjectError> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == text) {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ProjectError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    })
}
