//! Configuration for generating output files.

use std::str::FromStr;

use codesplice_core::lang::TOOL_ID;

/// Line terminator used for rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// CRLF on Windows, LF elsewhere
    #[default]
    Native,
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Native => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(LineEnding::Native),
            "lf" => Ok(LineEnding::Lf),
            "crlf" => Ok(LineEnding::CrLf),
            other => Err(format!("unknown line ending `{other}` (expected native, lf or crlf)")),
        }
    }
}

/// How diagnostics are written by the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageFormat {
    /// `<tool>: <severity> <code>: <line>` per physical line
    #[default]
    Human,
    /// One JSON object per physical line
    Json,
}

impl FromStr for MessageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(MessageFormat::Human),
            "json" => Ok(MessageFormat::Json),
            other => Err(format!("unknown message format `{other}` (expected human or json)")),
        }
    }
}

/// Settings shared by the batch driver, the logger and the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    pub line_ending: LineEnding,
    /// Prefix of warning and error lines
    pub tool_id: String,
    pub message_format: MessageFormat,
    /// Appended to an input's file stem to name its output
    pub output_suffix: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Native,
            tool_id: TOOL_ID.to_string(),
            message_format: MessageFormat::Human,
            output_suffix: ".generated.rs".to_string(),
        }
    }
}

impl GenerateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn with_tool_id(mut self, tool_id: impl Into<String>) -> Self {
        self.tool_id = tool_id.into();
        self
    }

    pub fn with_message_format(mut self, format: MessageFormat) -> Self {
        self.message_format = format;
        self
    }

    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GenerateConfig::default();
        assert_eq!(config.tool_id, "codesplice");
        assert_eq!(config.output_suffix, ".generated.rs");
        assert_eq!(config.line_ending, LineEnding::Native);
        assert_eq!(config.message_format, MessageFormat::Human);
    }

    #[test]
    fn builder_overrides() {
        let config = GenerateConfig::new()
            .with_line_ending(LineEnding::CrLf)
            .with_tool_id("gen")
            .with_message_format(MessageFormat::Json)
            .with_output_suffix(".g.rs");
        assert_eq!(config.line_ending.as_str(), "\r\n");
        assert_eq!(config.tool_id, "gen");
        assert_eq!(config.output_suffix, ".g.rs");
    }

    #[test]
    fn parse_flags() {
        assert_eq!("LF".parse::<LineEnding>(), Ok(LineEnding::Lf));
        assert_eq!("json".parse::<MessageFormat>(), Ok(MessageFormat::Json));
        assert!("cr".parse::<LineEnding>().is_err());
    }
}
