//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `show` | Load one document and print its links (`--reverse` for last to first) |
//! | `merge` | Merge the links of several documents into the first |
//! | `graph` | Links, backlinks and dangling references across documents |
//! | `run` | Execute a workspace script |
//! | `config` | Print the effective configuration |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default can be changed with `default_format` in the config file.
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr, including every
//! skipped link token:
//! ```bash
//! doclinks --verbose show notes.txt
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod document_cmd;
mod graph_cmd;
mod script;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
pub use script::{execute, ScriptCommand, ScriptError, Step};
