//! Domain models for doclinks
//!
//! Contains the core data structures and logic without any I/O concerns.

mod list;
mod link;
mod document;
mod workspace;
mod graph;

pub use list::{Cursor, IntoIter, Iter, ListError, OrderedCyclicList};
pub use link::{is_valid_identifier, Link, LinkError};
pub use document::{Document, LoadReport, SkippedToken, END_OF_DOCUMENT, LINKS_PER_LINE};
pub use workspace::{Workspace, WorkspaceError};
pub use graph::{GraphError, LinkGraph};
