//! Property-based test generators using proptest.
//!
//! Provides strategies for generating entry sets that satisfy the
//! builder's ordering and size rules.

use crate::fixtures::TestEntry;
use proptest::prelude::*;
use sstable_core::MAX_KEY_LEN;

/// Strategy for generating keys, including the empty key.
pub fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        3 => prop::collection::vec(any::<u8>(), 0..16),
        1 => prop::collection::vec(any::<u8>(), 0..=MAX_KEY_LEN),
    ]
}

/// Strategy for generating value bytes, including empty values.
pub fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

/// Strategy for generating extra bytes, mostly empty.
pub fn extra_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        2 => Just(Vec::new()),
        1 => prop::collection::vec(any::<u8>(), 1..32),
    ]
}

/// Strategy for generating up to `max_entries` entries with unique keys in
/// ascending bytewise order.
pub fn entries_strategy(max_entries: usize) -> impl Strategy<Value = Vec<TestEntry>> {
    prop::collection::btree_map(
        key_strategy(),
        (value_strategy(), extra_strategy()),
        0..=max_entries,
    )
    .prop_map(|map| {
        map.into_iter()
            .map(|(key, (value, extra))| TestEntry { key, value, extra })
            .collect()
    })
}

/// Strategy for generating an entry set plus probe keys, some present and
/// some absent.
pub fn entries_with_probes_strategy(
    max_entries: usize,
) -> impl Strategy<Value = (Vec<TestEntry>, Vec<Vec<u8>>)> {
    (
        entries_strategy(max_entries),
        prop::collection::vec(key_strategy(), 0..16),
    )
        .prop_map(|(entries, mut probes)| {
            probes.extend(entries.iter().step_by(3).map(|e| e.key.clone()));
            (entries, probes)
        })
}
