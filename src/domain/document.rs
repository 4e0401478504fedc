//! Document domain model
//!
//! A document is a lowercased name plus its outgoing links, kept sorted by
//! reference in an [`OrderedCyclicList`].
//!
//! ## Text format
//!
//! ```text
//! some words link=intro more words link=Setup(3)
//! link=faq(2)
//! eod
//! ```
//!
//! Lines are split on ASCII whitespace. Tokens starting with `link=` (any case)
//! carry link text; everything else is ignored. Malformed link text is
//! skipped. Reading stops at a line that is exactly the terminator, or at
//! the end of input.

use serde::Serialize;
use std::fmt;

use super::link::{Link, LinkError};
use super::list::OrderedCyclicList;

/// Line that ends a document body
pub const END_OF_DOCUMENT: &str = "eod";

/// Links rendered per output line by [`fmt::Display`]
pub const LINKS_PER_LINE: usize = 10;

const LINK_PREFIX: &str = "link=";

/// A token that looked like a link but was dropped
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedToken {
    pub text: String,
    pub reason: LinkError,
}

/// Summary of one [`Document::load`] pass
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadReport {
    /// Number of links inserted
    pub accepted: usize,

    /// Link tokens that failed to parse
    pub skipped: Vec<SkippedToken>,

    /// Whether the terminator line was reached (false means end of input)
    pub terminated: bool,
}

/// A named document and its sorted outgoing links
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    name: String,
    links: OrderedCyclicList<Link>,
}

impl Document {
    /// Creates an empty document, lowercasing the name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_lowercase(),
            links: OrderedCyclicList::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn links(&self) -> &OrderedCyclicList<Link> {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut OrderedCyclicList<Link> {
        &mut self.links
    }

    /// Inserts a link at its sorted position
    pub fn add_link(&mut self, link: Link) {
        self.links.insert(link);
    }

    /// Reads lines up to [`END_OF_DOCUMENT`]
    ///
    /// Pass `lines.by_ref()` to keep reading the same stream afterwards.
    pub fn load<I, S>(&mut self, lines: I) -> LoadReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.load_until(lines, END_OF_DOCUMENT)
    }

    /// Reads lines up to a custom terminator line
    pub fn load_until<I, S>(&mut self, lines: I, terminator: &str) -> LoadReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = LoadReport::default();

        for line in lines {
            let line = line.as_ref();
            if line == terminator {
                report.terminated = true;
                break;
            }

            for text in tokens(line).filter_map(link_text) {
                match text.parse::<Link>() {
                    Ok(link) => {
                        self.links.insert(link);
                        report.accepted += 1;
                    }
                    Err(reason) => report.skipped.push(SkippedToken {
                        text: text.to_string(),
                        reason,
                    }),
                }
            }
        }

        report
    }

    /// Moves every link of `other` into this document
    pub fn merge(&mut self, other: &mut Document) {
        self.links.merge(&mut other.links);
    }

    /// Renders the name and links front to back, `per_line` links per line
    pub fn render(&self, per_line: usize) -> String {
        self.render_links(self.links.iter(), per_line)
    }

    /// Renders the name and links back to front
    pub fn render_reverse(&self, per_line: usize) -> String {
        let mut cursor = self.links.cursor();
        cursor.seek_end();
        let backwards = std::iter::from_fn(move || cursor.retreat().ok());
        self.render_links(backwards, per_line)
    }

    fn render_links<'a>(&self, links: impl Iterator<Item = &'a Link>, per_line: usize) -> String {
        let per_line = per_line.max(1);
        let mut out = format!("Document: {}", self.name);
        for (count, link) in links.enumerate() {
            out.push(if count % per_line == 0 { '\n' } else { ' ' });
            out.push_str(&link.to_string());
        }
        out
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(LINKS_PER_LINE))
    }
}

/// Splits a line on ASCII whitespace only; other Unicode spaces stay
/// inside a token
fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r'))
        .filter(|token| !token.is_empty())
}

/// Strips a case-insensitive `link=` prefix from a token
fn link_text(token: &str) -> Option<&str> {
    let prefix = token.get(..LINK_PREFIX.len())?;
    prefix
        .eq_ignore_ascii_case(LINK_PREFIX)
        .then(|| &token[LINK_PREFIX.len()..])
}
