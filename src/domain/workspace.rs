//! Numbered document slots with a current selection
//!
//! Every list operation is addressed through the current slot. Positions
//! arrive as signed integers from text commands, so negative values are
//! reported as out of range rather than rejected by the parser.

use thiserror::Error;

use super::document::{Document, LoadReport};
use super::link::{Link, LinkError};
use super::list::ListError;

#[derive(Debug, Error, PartialEq)]
pub enum WorkspaceError {
    #[error("Slot {slot} out of range (0..{slots})")]
    SlotOutOfRange { slot: usize, slots: usize },

    #[error("Slot {0} holds no document")]
    EmptySlot(usize),

    #[error(transparent)]
    List(#[from] ListError),

    #[error(transparent)]
    Link(#[from] LinkError),
}

/// A fixed set of document slots
#[derive(Debug)]
pub struct Workspace {
    slots: Vec<Option<Document>>,
    current: usize,
}

impl Workspace {
    /// Creates a workspace with `slots` empty slots, slot 0 selected
    pub fn new(slots: usize) -> Self {
        Self {
            slots: (0..slots.max(1)).map(|_| None).collect(),
            current: 0,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn current_slot(&self) -> usize {
        self.current
    }

    /// Selects the slot later commands operate on
    pub fn select(&mut self, slot: usize) -> Result<(), WorkspaceError> {
        self.check_slot(slot)?;
        self.current = slot;
        Ok(())
    }

    /// Replaces the current slot with a new document read from `lines`
    pub fn load<I, S>(&mut self, name: &str, lines: I, terminator: &str) -> LoadReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut document = Document::new(name);
        let report = document.load_until(lines, terminator);
        self.slots[self.current] = Some(document);
        report
    }

    /// Returns the document in the current slot
    pub fn document(&self) -> Result<&Document, WorkspaceError> {
        self.slots[self.current]
            .as_ref()
            .ok_or(WorkspaceError::EmptySlot(self.current))
    }

    fn document_mut(&mut self) -> Result<&mut Document, WorkspaceError> {
        self.slots[self.current]
            .as_mut()
            .ok_or(WorkspaceError::EmptySlot(self.current))
    }

    /// Parses link text and inserts it into the current document
    pub fn add_link(&mut self, text: &str) -> Result<Link, WorkspaceError> {
        let link: Link = text.parse()?;
        self.document_mut()?.add_link(link.clone());
        Ok(link)
    }

    pub fn get(&self, index: i64) -> Result<&Link, WorkspaceError> {
        let document = self.document()?;
        let index = position(index, document.links().len())?;
        Ok(document.links().get(index)?)
    }

    pub fn remove_at(&mut self, index: i64) -> Result<Link, WorkspaceError> {
        let links = self.document_mut()?.links_mut();
        let index = position(index, links.len())?;
        Ok(links.remove_at(index)?)
    }

    /// Removes every link to `reference`, returning how many were removed
    pub fn remove_all(&mut self, reference: &str) -> Result<usize, WorkspaceError> {
        let probe = Link::new(reference.to_lowercase())?;
        Ok(self.document_mut()?.links_mut().remove_all(&probe))
    }

    /// Position of the first link to `reference`
    pub fn index_of(&self, reference: &str) -> Result<Option<usize>, WorkspaceError> {
        let probe = Link::new(reference.to_lowercase())?;
        Ok(self.document()?.links().index_of(&probe))
    }

    pub fn contains(&self, reference: &str) -> Result<bool, WorkspaceError> {
        let probe = Link::new(reference.to_lowercase())?;
        Ok(self.document()?.links().contains(&probe))
    }

    pub fn size(&self) -> Result<usize, WorkspaceError> {
        Ok(self.document()?.links().len())
    }

    pub fn clear(&mut self) -> Result<(), WorkspaceError> {
        self.document_mut()?.links_mut().clear();
        Ok(())
    }

    /// Moves the links of the document in `slot` into the current document
    ///
    /// Merging the current slot into itself leaves it untouched.
    pub fn merge_from(&mut self, slot: usize) -> Result<(), WorkspaceError> {
        self.check_slot(slot)?;
        self.document()?;
        if slot == self.current {
            return Ok(());
        }

        let mut source = self.slots[slot]
            .take()
            .ok_or(WorkspaceError::EmptySlot(slot))?;
        let result = self.document_mut().map(|target| target.merge(&mut source));
        self.slots[slot] = Some(source);
        result
    }

    fn check_slot(&self, slot: usize) -> Result<(), WorkspaceError> {
        if slot >= self.slots.len() {
            return Err(WorkspaceError::SlotOutOfRange {
                slot,
                slots: self.slots.len(),
            });
        }
        Ok(())
    }
}

/// Converts a signed position, mapping negatives to out-of-range
fn position(index: i64, len: usize) -> Result<usize, ListError> {
    usize::try_from(index).map_err(|_| ListError::IndexOutOfRange { index, len })
}
