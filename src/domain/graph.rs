//! Link graph across documents
//!
//! Nodes are document names, edges are weighted links from a document to
//! the name it references. References to names with no loaded document
//! still get a node, and are reported as dangling.
//! Uses petgraph for graph operations.

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;
use thiserror::Error;

use super::document::Document;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Document loaded twice: {0}")]
    DuplicateDocument(String),
}

#[derive(Debug, Clone)]
struct GraphNode {
    name: String,
    /// False for names that are only ever referenced
    loaded: bool,
}

/// A directed, weighted graph of documents and their links
#[derive(Debug, Default)]
pub struct LinkGraph {
    /// The underlying directed graph
    graph: DiGraph<GraphNode, u32>,

    /// Map from document name to node index
    node_map: HashMap<String, NodeIndex>,
}

impl LinkGraph {
    /// Creates an empty link graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a collection of documents
    pub fn from_documents<'a>(
        documents: impl IntoIterator<Item = &'a Document>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new();

        // First pass: every loaded document gets a node
        let documents: Vec<_> = documents.into_iter().collect();
        for document in &documents {
            graph.add_document(document.name())?;
        }

        // Second pass: one edge per link
        for document in &documents {
            for link in document.links() {
                graph.add_link(document.name(), link.reference(), link.weight());
            }
        }

        Ok(graph)
    }

    /// Registers a loaded document
    pub fn add_document(&mut self, name: &str) -> Result<(), GraphError> {
        let idx = self.node(name);
        let node = &mut self.graph[idx];
        if node.loaded {
            return Err(GraphError::DuplicateDocument(name.to_string()));
        }
        node.loaded = true;
        Ok(())
    }

    /// Adds a weighted edge `from -> to`, creating nodes as needed
    pub fn add_link(&mut self, from: &str, to: &str, weight: u32) {
        let from_idx = self.node(from);
        let to_idx = self.node(to);
        self.graph.add_edge(from_idx, to_idx, weight);
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(idx) = self.node_map.get(name) {
            return *idx;
        }
        let idx = self.graph.add_node(GraphNode {
            name: name.to_string(),
            loaded: false,
        });
        self.node_map.insert(name.to_string(), idx);
        idx
    }

    /// Returns `(target, weight)` for each link out of `name`, sorted by target
    pub fn outgoing(&self, name: &str) -> Vec<(String, u32)> {
        self.edges(name, Direction::Outgoing)
    }

    /// Returns `(source, weight)` for each link into `name`, sorted by source
    pub fn backlinks(&self, name: &str) -> Vec<(String, u32)> {
        self.edges(name, Direction::Incoming)
    }

    fn edges(&self, name: &str, direction: Direction) -> Vec<(String, u32)> {
        let idx = match self.node_map.get(name) {
            Some(idx) => *idx,
            None => return vec![],
        };

        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (self.graph[other].name.clone(), *edge.weight())
            })
            .collect();
        edges.sort();
        edges
    }

    /// Returns referenced names that have no loaded document, sorted
    pub fn dangling(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .graph
            .node_weights()
            .filter(|node| !node.loaded)
            .map(|node| node.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Returns loaded document names, sorted
    pub fn documents(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .graph
            .node_weights()
            .filter(|node| node.loaded)
            .map(|node| node.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Returns true if following links can lead back to the start
    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Returns true if the graph has a node for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Returns the number of loaded documents
    pub fn document_count(&self) -> usize {
        self.graph.node_weights().filter(|node| node.loaded).count()
    }

    /// Returns the number of links
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, body: &str) -> Document {
        let mut document = Document::new(name);
        document.load([body]);
        document
    }

    #[test]
    fn empty_graph() {
        let graph = LinkGraph::new();
        assert_eq!(graph.document_count(), 0);
        assert_eq!(graph.link_count(), 0);
        assert!(!graph.has_cycle());
        assert!(graph.outgoing("x").is_empty());
    }

    #[test]
    fn from_documents() {
        let home = doc("home", "link=about(2) link=faq");
        let about = doc("about", "link=home");

        let graph = LinkGraph::from_documents([&home, &about]).unwrap();

        assert_eq!(graph.document_count(), 2);
        assert_eq!(graph.link_count(), 3);
        assert_eq!(
            graph.outgoing("home"),
            vec![("about".to_string(), 2), ("faq".to_string(), 1)]
        );
        assert_eq!(graph.backlinks("home"), vec![("about".to_string(), 1)]);
        assert_eq!(graph.documents(), vec!["about", "home"]);
    }

    #[test]
    fn dangling_references() {
        let home = doc("home", "link=faq link=about link=missing");
        let faq = doc("faq", "");

        let graph = LinkGraph::from_documents([&home, &faq]).unwrap();

        assert_eq!(graph.dangling(), vec!["about", "missing"]);
        assert!(graph.contains("missing"));
        assert_eq!(graph.backlinks("missing"), vec![("home".to_string(), 1)]);
    }

    #[test]
    fn cycle_detection() {
        let a = doc("a", "link=b");
        let b = doc("b", "link=c");
        let c = doc("c", "");
        assert!(!LinkGraph::from_documents([&a, &b, &c]).unwrap().has_cycle());

        let c = doc("c", "link=a");
        assert!(LinkGraph::from_documents([&a, &b, &c]).unwrap().has_cycle());
    }

    #[test]
    fn self_link_is_a_cycle() {
        let a = doc("a", "link=a");
        assert!(LinkGraph::from_documents([&a]).unwrap().has_cycle());
    }

    #[test]
    fn duplicate_document_rejected() {
        let first = doc("Home", "");
        let second = doc("home", "");

        let result = LinkGraph::from_documents([&first, &second]);
        assert_eq!(
            result.unwrap_err(),
            GraphError::DuplicateDocument("home".to_string())
        );
    }

    #[test]
    fn referenced_then_loaded_is_not_dangling() {
        let mut graph = LinkGraph::new();
        graph.add_link("a", "b", 1);
        assert_eq!(graph.dangling(), vec!["a", "b"]);

        graph.add_document("b").unwrap();
        graph.add_document("a").unwrap();
        assert!(graph.dangling().is_empty());
    }
}
