//! Document commands (show, merge)

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::output::Output;
use crate::domain::{Document, LoadReport};
use crate::storage::{self, Config};

/// Load a document and print it
pub fn show(
    output: &Output,
    config: &Config,
    path: Option<&Path>,
    name: Option<&str>,
    reverse: bool,
) -> Result<()> {
    let (document, report) = storage::load_document(path, name, &config.terminator)?;
    log_report(output, &document, &report);
    print_document(output, config, &document, reverse);
    Ok(())
}

/// Load several documents, merge them into the first and print it
pub fn merge(output: &Output, config: &Config, paths: &[PathBuf], reverse: bool) -> Result<()> {
    let mut documents = load_all(output, config, paths)?;
    if documents.is_empty() {
        anyhow::bail!("No documents to merge");
    }

    let mut target = documents.remove(0);
    for mut source in documents {
        output.verbose_ctx(
            "merge",
            &format!(
                "Merging {} links from {} into {}",
                source.links().len(),
                source.name(),
                target.name()
            ),
        );
        target.merge(&mut source);
    }

    print_document(output, config, &target, reverse);
    Ok(())
}

/// Loads one document per path, logging what each load skipped
pub(super) fn load_all(output: &Output, config: &Config, paths: &[PathBuf]) -> Result<Vec<Document>> {
    paths
        .iter()
        .map(|path| -> Result<Document> {
            let (document, report) =
                storage::load_document(Some(path.as_path()), None, &config.terminator)?;
            log_report(output, &document, &report);
            Ok(document)
        })
        .collect()
}

fn log_report(output: &Output, document: &Document, report: &LoadReport) {
    output.verbose_ctx(
        "load",
        &format!(
            "{}: {} links accepted, {} skipped",
            document.name(),
            report.accepted,
            report.skipped.len()
        ),
    );
    for skipped in &report.skipped {
        output.verbose_ctx(
            "load",
            &format!("Skipped '{}': {}", skipped.text, skipped.reason),
        );
    }
    if !report.terminated {
        output.verbose_ctx("load", "No terminator line, read to end of input");
    }
}

fn print_document(output: &Output, config: &Config, document: &Document, reverse: bool) {
    if output.is_json() {
        let links: Vec<_> = if reverse {
            document.links().iter().rev().collect()
        } else {
            document.links().iter().collect()
        };
        output.data(&serde_json::json!({
            "name": document.name(),
            "size": links.len(),
            "links": links,
        }));
    } else if reverse {
        println!("{}", document.render_reverse(config.links_per_line));
    } else {
        println!("{}", document.render(config.links_per_line));
    }
}
