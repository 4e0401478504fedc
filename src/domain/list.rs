//! Ordered cyclic list with a sentinel
//!
//! A sorted, doubly-linked, circular sequence. Nodes live in an arena and
//! refer to their neighbours by slot index. Slot 0 is the sentinel: it holds
//! no value, its `next` is the first element and its `prev` is the last. An
//! empty list is the sentinel linked to itself, so linking and unlinking never
//! special-case the ends.
//!
//! Elements only enter through ordered insertion or [`OrderedCyclicList::merge`],
//! which keeps forward traversal non-decreasing at all times. There is no
//! positional insert and no in-place overwrite.

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

use serde::ser::{Serialize, Serializer};
use thiserror::Error;

/// Arena slot of the sentinel node
const SENTINEL: usize = 0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListError {
    #[error("Index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("No element left in that direction")]
    Exhausted,
}

impl ListError {
    pub(crate) fn out_of_range(index: usize, len: usize) -> Self {
        ListError::IndexOutOfRange {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            len,
        }
    }
}

#[derive(Debug, Clone)]
struct Node<T> {
    /// `None` only for the sentinel and for recycled slots
    value: Option<T>,
    prev: usize,
    next: usize,
}

impl<T> Node<T> {
    fn sentinel() -> Self {
        Self {
            value: None,
            prev: SENTINEL,
            next: SENTINEL,
        }
    }
}

/// A sorted, circular, doubly-linked list terminated by a sentinel node
///
/// Ordering comes from `T: Ord`, lookups use `T: PartialEq`. Elements that
/// compare equal keep their insertion order.
#[derive(Clone)]
pub struct OrderedCyclicList<T> {
    /// Node arena; slot 0 is always the sentinel
    nodes: Vec<Node<T>>,

    /// Slots released by removals, reused before the arena grows
    free: Vec<usize>,

    /// Number of real (non-sentinel) nodes in the cycle
    len: usize,
}

impl<T> OrderedCyclicList<T> {
    /// Creates an empty list
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::sentinel()],
            free: Vec::new(),
            len: 0,
        }
    }

    /// Returns the number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the smallest element
    pub fn first(&self) -> Option<&T> {
        let first = self.nodes[SENTINEL].next;
        (first != SENTINEL).then(|| self.value(first))
    }

    /// Returns the largest element
    pub fn last(&self) -> Option<&T> {
        let last = self.nodes[SENTINEL].prev;
        (last != SENTINEL).then(|| self.value(last))
    }

    /// Returns the element at a 0-based position
    pub fn get(&self, index: usize) -> Result<&T, ListError> {
        let slot = self.slot_at(index)?;
        Ok(self.value(slot))
    }

    /// Removes and returns the element at a 0-based position
    pub fn remove_at(&mut self, index: usize) -> Result<T, ListError> {
        let slot = self.slot_at(index)?;
        Ok(self.release(slot))
    }

    /// Drops every element and returns to the empty state
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[SENTINEL] = Node::sentinel();
        self.free.clear();
        self.len = 0;
    }

    /// Iterates from the first element to the last
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.nodes[SENTINEL].next,
            back: self.nodes[SENTINEL].prev,
            remaining: self.len,
        }
    }

    /// Returns a bidirectional cursor positioned before the first element
    pub fn cursor(&self) -> Cursor<'_, T> {
        Cursor {
            list: self,
            current: self.nodes[SENTINEL].next,
            index: 0,
        }
    }

    /// Finds the slot holding the element at `index`
    fn slot_at(&self, index: usize) -> Result<usize, ListError> {
        if index >= self.len {
            return Err(ListError::out_of_range(index, self.len));
        }

        let mut current = self.nodes[SENTINEL].next;
        for _ in 0..index {
            current = self.nodes[current].next;
        }
        Ok(current)
    }

    /// Finds the first slot whose value satisfies `pred`
    fn find_slot(&self, mut pred: impl FnMut(&T) -> bool) -> Option<(usize, usize)> {
        let mut current = self.nodes[SENTINEL].next;
        let mut position = 0;
        while current != SENTINEL {
            if pred(self.value(current)) {
                return Some((current, position));
            }
            current = self.nodes[current].next;
            position += 1;
        }
        None
    }

    fn value(&self, slot: usize) -> &T {
        match &self.nodes[slot].value {
            Some(value) => value,
            None => unreachable!("slot {slot} is not linked into the list"),
        }
    }

    /// Stores a value in a free slot without linking it
    fn alloc(&mut self, value: T) -> usize {
        let node = Node {
            value: Some(value),
            prev: SENTINEL,
            next: SENTINEL,
        };

        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Links an allocated slot immediately before `at`
    fn link_before(&mut self, at: usize, slot: usize) {
        let prev = self.nodes[at].prev;
        self.nodes[slot].prev = prev;
        self.nodes[slot].next = at;
        self.nodes[prev].next = slot;
        self.nodes[at].prev = slot;
        self.len += 1;
    }

    /// Unlinks a slot, recycles it and hands back its value
    fn release(&mut self, slot: usize) -> T {
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.len -= 1;
        self.free.push(slot);
        self.take_value(slot)
    }

    fn take_value(&mut self, slot: usize) -> T {
        match self.nodes[slot].value.take() {
            Some(value) => value,
            None => unreachable!("slot {slot} is not linked into the list"),
        }
    }
}

impl<T: Ord> OrderedCyclicList<T> {
    /// Inserts a value at its sorted position
    ///
    /// The new element lands after every element that compares less than or
    /// equal to it, so equal elements keep insertion order.
    pub fn insert(&mut self, value: T) {
        let mut current = self.nodes[SENTINEL].next;
        while current != SENTINEL && self.value(current).cmp(&value) != Ordering::Greater {
            current = self.nodes[current].next;
        }

        let slot = self.alloc(value);
        self.link_before(current, slot);
    }

    /// Moves every element of `other` into this list in sorted order
    ///
    /// A two-pointer merge over both sorted sequences, O(|self| + |other|).
    /// When the fronts compare equal the element already in `self` goes
    /// first. `other` is left empty and usable.
    ///
    /// Merging a list into itself does not compile:
    ///
    /// ```compile_fail
    /// use doclinks::OrderedCyclicList;
    ///
    /// let mut list: OrderedCyclicList<i32> = [1, 2].into_iter().collect();
    /// list.merge(&mut list);
    /// ```
    pub fn merge(&mut self, other: &mut Self) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            std::mem::swap(self, other);
            other.clear();
            return;
        }

        let mut p = self.nodes[SENTINEL].next;
        let mut q = other.nodes[SENTINEL].next;

        while q != SENTINEL {
            if p != SENTINEL && self.value(p).cmp(other.value(q)) != Ordering::Greater {
                p = self.nodes[p].next;
                continue;
            }

            let next_q = other.nodes[q].next;
            let value = other.take_value(q);
            let slot = self.alloc(value);
            self.link_before(p, slot);
            q = next_q;
        }

        other.clear();
    }
}

impl<T: PartialEq> OrderedCyclicList<T> {
    /// Returns the first element equal to `value`
    pub fn lookup(&self, value: &T) -> Option<&T> {
        self.find_slot(|item| item == value)
            .map(|(slot, _)| self.value(slot))
    }

    /// Returns true if some element equals `value`
    pub fn contains(&self, value: &T) -> bool {
        self.find_slot(|item| item == value).is_some()
    }

    /// Returns the position of the first element equal to `value`
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.find_slot(|item| item == value)
            .map(|(_, position)| position)
    }

    /// Removes the first element equal to `value`
    pub fn remove(&mut self, value: &T) -> bool {
        match self.find_slot(|item| item == value) {
            Some((slot, _)) => {
                self.release(slot);
                true
            }
            None => false,
        }
    }

    /// Removes every element equal to `value`, returning how many went
    pub fn remove_all(&mut self, value: &T) -> usize {
        let mut removed = 0;
        let mut current = self.nodes[SENTINEL].next;

        while current != SENTINEL {
            // Step past the node before unlinking it.
            let next = self.nodes[current].next;
            if self.value(current) == value {
                self.release(current);
                removed += 1;
            }
            current = next;
        }

        removed
    }
}

impl<T> Default for OrderedCyclicList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedCyclicList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Ord> FromIterator<T> for OrderedCyclicList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T: Ord> Extend<T> for OrderedCyclicList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Serialize> Serialize for OrderedCyclicList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'a, T> IntoIterator for &'a OrderedCyclicList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for OrderedCyclicList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

/// Borrowing iterator over a list, front to back (or back to front)
pub struct Iter<'a, T> {
    list: &'a OrderedCyclicList<T>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let list = self.list;
        let slot = self.front;
        self.front = list.nodes[slot].next;
        self.remaining -= 1;
        Some(list.value(slot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let list = self.list;
        let slot = self.back;
        self.back = list.nodes[slot].prev;
        self.remaining -= 1;
        Some(list.value(slot))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Owning iterator, moves values out of the list
pub struct IntoIter<T> {
    list: OrderedCyclicList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let first = self.list.nodes[SENTINEL].next;
        (first != SENTINEL).then(|| self.list.release(first))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        let last = self.list.nodes[SENTINEL].prev;
        (last != SENTINEL).then(|| self.list.release(last))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

/// Read-only cursor that walks a list in both directions
///
/// The cursor sits between elements: [`advance`](Cursor::advance) returns
/// the element after it and steps over it, [`retreat`](Cursor::retreat)
/// steps back over the element before it and returns that. Stepping past
/// either end yields [`ListError::Exhausted`].
pub struct Cursor<'a, T> {
    list: &'a OrderedCyclicList<T>,
    /// Slot `advance` would return; the sentinel when at the end
    current: usize,
    index: usize,
}

impl<'a, T> Cursor<'a, T> {
    pub fn has_next(&self) -> bool {
        self.current != SENTINEL
    }

    pub fn has_previous(&self) -> bool {
        self.list.nodes[self.current].prev != SENTINEL
    }

    /// Number of elements before the cursor
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn advance(&mut self) -> Result<&'a T, ListError> {
        if !self.has_next() {
            return Err(ListError::Exhausted);
        }
        let list = self.list;
        let slot = self.current;
        self.current = list.nodes[slot].next;
        self.index += 1;
        Ok(list.value(slot))
    }

    pub fn retreat(&mut self) -> Result<&'a T, ListError> {
        if !self.has_previous() {
            return Err(ListError::Exhausted);
        }
        let list = self.list;
        self.current = list.nodes[self.current].prev;
        self.index -= 1;
        Ok(list.value(self.current))
    }

    /// Moves the cursor before the first element
    pub fn seek_start(&mut self) {
        self.current = self.list.nodes[SENTINEL].next;
        self.index = 0;
    }

    /// Moves the cursor after the last element
    pub fn seek_end(&mut self) {
        self.current = SENTINEL;
        self.index = self.list.len;
    }
}
