//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use codesplice_core::{CancellationToken, Compilation, DiagnosticSink, PluginRegistry};

use crate::format;
use crate::logging::Logger;
use crate::project::{ProjectError, ProjectGenerator};
use crate::source::{SourceError, SourceFile, read_source};
use crate::transform::{DocumentTransform, resolver};

use super::{CliError, CliResult, ExitCode, ProgramArgs};

// ============================================================================
// Program loading (shared between commands)
// ============================================================================

/// The parsed inputs and the compilation built from them and their references.
struct LoadedProgram {
    sources: Vec<SourceFile>,
    compilation: Arc<Compilation>,
}

/// Parse `files` as the program's own sources and every `--reference` as a referenced module.
fn load_program(files: &[PathBuf], args: &ProgramArgs) -> CliResult<LoadedProgram> {
    let sources = files
        .iter()
        .map(|file| read_source(file).map_err(source_failure))
        .collect::<CliResult<Vec<_>>>()?;
    let references = args
        .references
        .iter()
        .map(|(module, file)| read_source(file).map(|source| (module.as_str(), source)).map_err(source_failure))
        .collect::<CliResult<Vec<_>>>()?;

    let mut builder = Compilation::builder(args.crate_name.as_str());
    for (module, reference) in &references {
        builder.add_module_source(module, &reference.syntax);
    }
    for source in &sources {
        builder.add_source(&source.syntax);
    }
    Ok(LoadedProgram {
        sources,
        compilation: Arc::new(builder.build()),
    })
}

fn source_failure(err: SourceError) -> CliError {
    CliError::failure(format!("{:?}", miette::Report::new(err)))
}

/// Generators available to the CLI.
pub fn builtin_registry() -> PluginRegistry {
    PluginRegistry::new().with_module(codesplice_generators::module())
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::failure(format!("failed to start async runtime: {e}")))
}

/// Cancel `token` when the process receives Ctrl-C.
fn cancel_on_interrupt(token: &CancellationToken) {
    let token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling generation");
            token.cancel();
        }
    });
}

// ============================================================================
// Commands
// ============================================================================

/// `codesplice generate`
pub fn generate_files(
    files: &[PathBuf],
    out: &Path,
    generated_files_list: Option<&Path>,
    args: &ProgramArgs,
) -> CliResult<ExitCode> {
    let program = load_program(files, args)?;
    let config = args.config();
    let logger = Logger::stderr(&config);
    let registry = builtin_registry();
    let cancel = CancellationToken::new();

    let mut generator = ProjectGenerator::new(out, program.compilation.clone(), &registry, &logger)
        .with_config(config)
        .with_cancellation(cancel.clone());
    if let Some(list) = generated_files_list {
        generator = generator.with_generated_files_list(list);
    }

    let result = runtime()?.block_on(async {
        cancel_on_interrupt(&cancel);
        generator.generate(&program.sources).await
    });
    match result {
        Ok(summary) => {
            logger.report(codesplice_core::Diagnostic::info(format!(
                "generated {} file(s) from {} input(s)",
                summary.outputs.len(),
                program.sources.len()
            )));
            if logger.error_count() > 0 {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Err(ProjectError::FilesFailed { .. }) => Ok(ExitCode::FAILURE),
        Err(e) => Err(CliError::failure(e.to_string())),
    }
}

/// `codesplice --emit <FILE>`
pub fn emit_file(file: &Path, args: &ProgramArgs) -> CliResult<ExitCode> {
    let program = load_program(&[file.to_path_buf()], args)?;
    let Some(source) = program.sources.first() else {
        return Err(CliError::failure("no input file"));
    };
    let config = args.config();
    let logger = Logger::stderr(&config);
    let registry = builtin_registry();

    let transform = DocumentTransform::builder()
        .compilation(program.compilation.clone())
        .source(&source.syntax)
        .loader(&registry)
        .diagnostics(&logger)
        .project_directory(source.directory())
        .build()
        .map_err(|e| CliError::failure(e.to_string()))?;
    let unit = runtime()?
        .block_on(transform.transform())
        .map_err(|e| CliError::failure(format!("{}: {e}", source.path.display())))?;

    let text = format::render(&unit, config.line_ending);
    io::stdout()
        .write_all(text.as_bytes())
        .map_err(|e| CliError::failure(format!("failed to write output: {e}")))?;
    Ok(if logger.error_count() > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// `codesplice bindings`
pub fn list_bindings(files: &[PathBuf], args: &ProgramArgs) -> CliResult<ExitCode> {
    let program = load_program(files, args)?;
    let compilation = &program.compilation;
    let mut exit = ExitCode::SUCCESS;
    let mut out = io::stdout().lock();
    for (id, _) in compilation.generator_bindings() {
        let attribute = codesplice_core::AttributeData::new(id, compilation.full_name(id));
        let line = match resolver::locate(compilation, &attribute) {
            Ok(Some(locator)) => format!(
                "{} -> {} ({})",
                attribute.class_name, locator.type_name, locator.module
            ),
            Ok(None) => continue,
            Err(e) => {
                exit = ExitCode::FAILURE;
                format!("{} -> error: {e}", attribute.class_name)
            }
        };
        writeln!(out, "{line}").map_err(|e| CliError::failure(format!("failed to write output: {e}")))?;
    }
    Ok(exit)
}
