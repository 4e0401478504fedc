//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{document_cmd, graph_cmd, script};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "doclinks")]
#[command(author, version, about = "Named documents connected by weighted links")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file to use instead of the discovered one
    #[arg(long, global = true, env = "DOCLINKS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a document and print its links
    Show {
        /// Document file (stdin when omitted or '-')
        path: Option<PathBuf>,

        /// Document name (defaults to the file stem)
        #[arg(long, short)]
        name: Option<String>,

        /// Print links last to first
        #[arg(long, short)]
        reverse: bool,
    },

    /// Merge the links of several documents into the first one
    Merge {
        /// Document files; the first one receives all links
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print links last to first
        #[arg(long, short)]
        reverse: bool,
    },

    /// Report links, backlinks and dangling references across documents
    Graph {
        /// Document files, named by file stem
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Run a workspace script
    Run {
        /// Script file (stdin when omitted or '-')
        script: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let format = cli
        .format
        .unwrap_or_else(|| OutputFormat::from(config.default_format));
    let output = Output::new(format, cli.verbose);

    output.verbose("doclinks starting");
    match &config.source {
        Some(path) => output.verbose_ctx("config", &format!("Loaded {}", path.display())),
        None => output.verbose_ctx("config", "Using built-in defaults"),
    }

    match cli.command {
        Commands::Show {
            path,
            name,
            reverse,
        } => document_cmd::show(&output, &config, path.as_deref(), name.as_deref(), reverse)?,

        Commands::Merge { paths, reverse } => {
            output.verbose_ctx("merge", &format!("Merging {} documents", paths.len()));
            document_cmd::merge(&output, &config, &paths, reverse)?
        }

        Commands::Graph { paths } => graph_cmd::run(&output, &config, &paths)?,

        Commands::Run { script } => script::run(&output, &config, script.as_deref())?,

        Commands::Config => show_config(&output, &config)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Prints the effective configuration
fn show_config(output: &Output, config: &Config) -> Result<()> {
    if output.is_json() {
        output.data(&serde_json::json!({
            "source": config.source.as_ref().map(|p| p.display().to_string()),
            "config": config,
        }));
    } else {
        match &config.source {
            Some(path) => println!("# {}", path.display()),
            None => println!("# built-in defaults"),
        }
        print!("{}", config.to_toml()?);
    }
    Ok(())
}
