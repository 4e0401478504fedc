//! # Storage Layer
//!
//! File access for doclinks: configuration and document sources.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Documents | Line text ending in `eod` | any file, or stdin |
//! | Scripts | One command per line | any file, or stdin |
//! | Config | TOML | `doclinks.toml` (local) or `config.toml` (global) |
//!
//! ## Key Types
//!
//! - [`Config`] - Effective configuration
//! - [`load_document`] - Reads a [`Document`](crate::domain::Document) from a file

mod config;
mod source;

pub use config::{Config, ConfigError, OutputFormat, LOCAL_CONFIG_FILE};
pub use source::{document_name, load_document, read_lines, STDIN_PATH};
