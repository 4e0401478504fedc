//! Result printing and `--verbose` logging shared by every command
//!
//! Results go to stdout, either as text the command prints itself or as a
//! single JSON document. Diagnostics go to stderr and only appear with
//! `--verbose`, tagged `[verbose]` or `[verbose:<context>]`.

use serde::Serialize;

use crate::storage;

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<storage::OutputFormat> for OutputFormat {
    fn from(format: storage::OutputFormat) -> Self {
        match format {
            storage::OutputFormat::Text => OutputFormat::Text,
            storage::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Where a command sends its results and diagnostics
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Writes a serializable result: compact in JSON mode, indented otherwise
    pub fn data<T: Serialize>(&self, data: &T) {
        if let Some(text) = self.encode(data) {
            println!("{}", text);
        }
    }

    fn encode<T: Serialize>(&self, data: &T) -> Option<String> {
        let encoded = if self.is_json() {
            serde_json::to_string(data)
        } else {
            serde_json::to_string_pretty(data)
        };
        encoded.ok()
    }

    pub fn verbose(&self, message: &str) {
        self.log(None, message);
    }

    /// Logs a diagnostic tagged with the part of the run it came from
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        self.log(Some(context), message);
    }

    fn log(&self, context: Option<&str>, message: &str) {
        if !self.verbose {
            return;
        }
        match context {
            Some(context) => eprintln!("[verbose:{}] {}", context, message),
            None => eprintln!("[verbose] {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_mode_encodes_compactly() {
        let output = Output::new(OutputFormat::Json, false);
        assert!(output.is_json());
        assert_eq!(
            output.encode(&serde_json::json!({"size": 2})).as_deref(),
            Some("{\"size\":2}")
        );
    }

    #[test]
    fn text_mode_encodes_indented() {
        let output = Output::new(OutputFormat::Text, true);
        assert!(!output.is_json());
        assert_eq!(
            output.encode(&serde_json::json!({"size": 2})).as_deref(),
            Some("{\n  \"size\": 2\n}")
        );
    }

    #[test]
    fn config_format_maps_across() {
        assert_eq!(OutputFormat::from(storage::OutputFormat::Json), OutputFormat::Json);
        assert_eq!(OutputFormat::from(storage::OutputFormat::Text), OutputFormat::Text);
    }
}
