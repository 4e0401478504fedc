//! doclinks - Named documents connected by weighted links
//!
//! Each document keeps its outgoing links in an [`OrderedCyclicList`], a
//! sorted, doubly-linked, sentinel-terminated circular list that supports
//! ordered insertion, bidirectional traversal and a destructive sorted merge.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Document, Link, LinkGraph, OrderedCyclicList, Workspace};
