//! CLI module for codesplice
//!
//! ## Commands
//!
//! - `generate <FILES>... --out <DIR>` - Transform input files and write their generated outputs
//! - `bindings <FILES>...` - List attribute types and the generators they are bound to
//! - `--emit <FILE>` - Print one file's generated output (debug)
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use crate::config::{GenerateConfig, LineEnding, MessageFormat};
use crate::version::CODESPLICE_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Source-to-source code generation driven by attributes
#[derive(Parser, Debug)]
#[command(name = "codesplice")]
#[command(version = CODESPLICE_VERSION)]
#[command(about = "Generate Rust code next to declarations carrying generator attributes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Print the generated output for one file (debug)
    #[arg(long = "emit", value_name = "FILE")]
    pub emit_file: Option<PathBuf>,

    #[command(flatten)]
    pub program: ProgramArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Transform input files and write the generated outputs
    Generate {
        /// Input source files (all belong to the same program)
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
        /// Directory generated files are written to
        #[arg(long = "out", value_name = "DIR")]
        out: PathBuf,
        /// Write the list of generated files, one per line, to this file
        #[arg(long = "generated-files-list", value_name = "FILE")]
        generated_files_list: Option<PathBuf>,
        #[command(flatten)]
        program: ProgramArgs,
    },

    /// List attribute types and the generators they are bound to
    Bindings {
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        program: ProgramArgs,
    },
}

/// Options describing the program the inputs belong to, and how output is written.
#[derive(Args, Debug, Clone, Default)]
pub struct ProgramArgs {
    /// Source file of a referenced module, as MODULE=FILE (repeatable)
    #[arg(long = "reference", value_name = "MODULE=FILE", value_parser = parse_reference)]
    pub references: Vec<(String, PathBuf)>,

    /// Module name of the program's own types
    #[arg(long = "crate-name", value_name = "NAME", default_value = "crate")]
    pub crate_name: String,

    /// Line ending of generated files: native, lf or crlf
    #[arg(long = "line-ending", value_name = "STYLE", default_value = "native")]
    pub line_ending: LineEnding,

    /// Diagnostic output: human or json
    #[arg(long = "message-format", value_name = "FORMAT", default_value = "human")]
    pub message_format: MessageFormat,
}

impl ProgramArgs {
    pub fn config(&self) -> GenerateConfig {
        GenerateConfig::new()
            .with_line_ending(self.line_ending)
            .with_message_format(self.message_format)
    }
}

fn parse_reference(value: &str) -> Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((module, file)) if !module.trim().is_empty() && !file.trim().is_empty() => {
            Ok((module.trim().to_string(), PathBuf::from(file.trim())))
        }
        _ => Err(format!("expected MODULE=FILE, got `{value}`")),
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    if let Some(file) = cli.emit_file {
        return commands::emit_file(&file, &cli.program);
    }

    match cli.command {
        Some(Command::Generate {
            files,
            out,
            generated_files_list,
            program,
        }) => commands::generate_files(&files, &out, generated_files_list.as_deref(), &program),
        Some(Command::Bindings { files, program }) => commands::list_bindings(&files, &program),
        None => Err(CliError::failure("no command given; see `codesplice --help`")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn generate_arguments() {
        let cli = Cli::try_parse_from([
            "codesplice",
            "generate",
            "--out",
            "gen",
            "--reference",
            "Acme=lib/acme.rs",
            "--line-ending",
            "lf",
            "a.rs",
            "b.rs",
        ])
        .expect("valid arguments");
        let Some(Command::Generate { files, out, program, .. }) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(files, vec![PathBuf::from("a.rs"), PathBuf::from("b.rs")]);
        assert_eq!(out, PathBuf::from("gen"));
        assert_eq!(program.references, vec![("Acme".to_string(), PathBuf::from("lib/acme.rs"))]);
        assert_eq!(program.crate_name, "crate");
        assert_eq!(program.config().line_ending, LineEnding::Lf);
    }

    #[test]
    fn emit_flag() {
        let cli = Cli::try_parse_from(["codesplice", "--emit", "a.rs", "--message-format", "json"]).expect("valid");
        assert_eq!(cli.emit_file, Some(PathBuf::from("a.rs")));
        assert_eq!(cli.program.config().message_format, MessageFormat::Json);
    }

    #[test]
    fn malformed_reference_is_rejected() {
        assert!(parse_reference("no-separator").is_err());
        assert!(parse_reference("=file.rs").is_err());
        assert!(Cli::try_parse_from(["codesplice", "bindings", "--reference", "Acme", "a.rs"]).is_err());
    }
}
