//! Key iteration.

use bytes::Bytes;
use sstable_codec::IndexEntry;
use std::iter::FusedIterator;
use std::slice;

/// Iterator over a table's keys in ascending order.
///
/// Created by [`Table::key_iter`](crate::Table::key_iter). Keys borrow the
/// table's index, so no allocation happens per step.
#[derive(Debug, Clone)]
pub struct KeyIter<'a> {
    entries: slice::Iter<'a, IndexEntry>,
}

impl<'a> KeyIter<'a> {
    pub(crate) fn new(entries: &'a [IndexEntry]) -> Self {
        Self {
            entries: entries.iter(),
        }
    }
}

impl<'a> Iterator for KeyIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|e| e.key.as_ref())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl DoubleEndedIterator for KeyIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back().map(|e| e.key.as_ref())
    }
}

impl ExactSizeIterator for KeyIter<'_> {}

impl FusedIterator for KeyIter<'_> {}

/// Key, metadata and value length of one entry.
///
/// Returned by the floor and ceiling lookups. `key` and `extra` share the
/// table's index buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// The entry's key.
    pub key: Bytes,
    /// The entry's caller metadata; empty when none was stored.
    pub extra: Bytes,
    /// Length of the entry's value.
    pub length: u32,
}

impl From<&IndexEntry> for KeyInfo {
    fn from(entry: &IndexEntry) -> Self {
        Self {
            key: entry.key.clone(),
            extra: entry.extra.clone(),
            length: entry.length,
        }
    }
}
