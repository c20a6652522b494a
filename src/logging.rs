//! The host-side diagnostics sink.
//!
//! [`Logger`] re-emits every physical line of a diagnostic message on its own line. Info lines are written bare;
//! warnings and errors are prefixed `<tool>: <severity> <code>: ` (or `<tool>: <severity>: ` without a code) so build
//! tools can pick them up. In [`MessageFormat::Json`] mode each line becomes one JSON object instead.

use std::io::{self, Write};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use codesplice_core::{Diagnostic, DiagnosticSink, Severity};

use crate::config::{GenerateConfig, MessageFormat};

/// Diagnostics sink writing formatted lines to a writer (stderr by default).
pub struct Logger {
    tool_id: String,
    format: MessageFormat,
    out: Mutex<Box<dyn Write + Send>>,
    errors: AtomicUsize,
}

impl Logger {
    pub fn new(config: &GenerateConfig, out: Box<dyn Write + Send>) -> Self {
        Self {
            tool_id: config.tool_id.clone(),
            format: config.message_format,
            out: Mutex::new(out),
            errors: AtomicUsize::new(0),
        }
    }

    pub fn stderr(config: &GenerateConfig) -> Self {
        Self::new(config, Box::new(io::stderr()))
    }

    /// Number of error diagnostics reported so far.
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    /// Format one diagnostic into output lines (without terminators).
    pub fn format_lines(&self, diagnostic: &Diagnostic) -> Vec<String> {
        diagnostic
            .message
            .lines()
            .map(|line| match self.format {
                MessageFormat::Human => self.human_line(diagnostic, line),
                MessageFormat::Json => serde_json::json!({
                    "tool": self.tool_id,
                    "severity": diagnostic.severity.as_str(),
                    "code": diagnostic.code,
                    "message": line,
                })
                .to_string(),
            })
            .collect()
    }

    fn human_line(&self, diagnostic: &Diagnostic, line: &str) -> String {
        match (diagnostic.severity, diagnostic.code.as_deref()) {
            (Severity::Info, _) => line.to_string(),
            (severity, Some(code)) => format!("{}: {severity} {code}: {line}", self.tool_id),
            (severity, None) => format!("{}: {severity}: {line}", self.tool_id),
        }
    }
}

impl DiagnosticSink for Logger {
    fn report(&self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        let lines = self.format_lines(&diagnostic);
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        for line in lines {
            if let Err(err) = writeln!(out, "{line}") {
                tracing::warn!(error = %err, "failed to write diagnostic");
                return;
            }
        }
        let _ = out.flush();
    }
}
