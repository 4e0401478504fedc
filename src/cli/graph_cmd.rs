//! Graph command: links, backlinks and dangling references

use std::path::PathBuf;

use anyhow::Result;

use super::document_cmd::load_all;
use super::output::Output;
use crate::domain::LinkGraph;
use crate::storage::Config;

fn format_edges(edges: &[(String, u32)]) -> String {
    edges
        .iter()
        .map(|(name, weight)| format!("{}({})", name, weight))
        .collect::<Vec<_>>()
        .join(" ")
}

fn edges_json(edges: &[(String, u32)]) -> Vec<serde_json::Value> {
    edges
        .iter()
        .map(|(name, weight)| serde_json::json!({"ref": name, "weight": weight}))
        .collect()
}

/// Build the link graph for a set of document files and report on it
pub fn run(output: &Output, config: &Config, paths: &[PathBuf]) -> Result<()> {
    let documents = load_all(output, config, paths)?;
    let graph = LinkGraph::from_documents(&documents)?;
    output.verbose_ctx(
        "graph",
        &format!(
            "{} documents, {} links",
            graph.document_count(),
            graph.link_count()
        ),
    );

    let names = graph.documents();
    let dangling = graph.dangling();

    if output.is_json() {
        let items: Vec<_> = names
            .iter()
            .map(|name| {
                serde_json::json!({
                    "name": name,
                    "outgoing": edges_json(&graph.outgoing(name)),
                    "backlinks": edges_json(&graph.backlinks(name)),
                })
            })
            .collect();
        output.data(&serde_json::json!({
            "documents": items,
            "dangling": dangling,
            "has_cycle": graph.has_cycle(),
        }));
        return Ok(());
    }

    println!(
        "Documents ({}), links ({}):",
        graph.document_count(),
        graph.link_count()
    );
    for name in &names {
        println!("{}", name);
        println!("  -> {}", format_edges(&graph.outgoing(name)));
        println!("  <- {}", format_edges(&graph.backlinks(name)));
    }

    println!();
    if dangling.is_empty() {
        println!("No dangling references.");
    } else {
        println!("Dangling references: {}", dangling.join(", "));
    }
    println!("Cycle: {}", if graph.has_cycle() { "yes" } else { "no" });

    Ok(())
}
