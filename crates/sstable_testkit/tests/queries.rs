//! Lookups against the standard entry set.

use sstable_core::{CoreError, Table};
use sstable_storage::InMemorySource;
use sstable_testkit::prelude::*;
use std::io::Read;

fn table() -> Table<InMemorySource> {
    memory_table(&standard_entries())
}

fn floor(table: &Table<InMemorySource>, key: &str) -> Option<String> {
    table
        .lower_key(key.as_bytes())
        .map(|info| String::from_utf8(info.key.to_vec()).unwrap())
}

fn ceiling(table: &Table<InMemorySource>, key: &str) -> Option<String> {
    table
        .upper_key(key.as_bytes())
        .map(|info| String::from_utf8(info.key.to_vec()).unwrap())
}

#[test]
fn counts_and_sizes() {
    let table = table();
    assert_eq!(table.num_keys(), 9);
    assert_eq!(table.data_size(), STANDARD_DATA_SIZE);
    assert_eq!(table.stats().values_size, STANDARD_DATA_SIZE);
    assert_eq!(table.stats().num_keys, 9);
}

#[test]
fn every_entry_reads_back() {
    let table = table();
    for entry in standard_entries() {
        assert!(table.has(&entry.key));

        let (value, extra) = table.get(&entry.key).unwrap();
        assert_eq!(value, entry.value);
        assert_eq!(extra.as_ref(), entry.extra.as_slice());

        let (length, extra) = table.get_info(&entry.key).unwrap();
        assert_eq!(length, entry.length());
        assert_eq!(extra.as_ref(), entry.extra.as_slice());

        let mut streamed = Vec::new();
        table.get_reader(&entry.key).unwrap().read_to_end(&mut streamed).unwrap();
        assert_eq!(streamed, entry.value);
    }
}

#[test]
fn absent_keys() {
    let table = table();
    for key in ["", "fo", "foo4", "g", "hoo1", "zzzz"] {
        assert!(!table.has(key.as_bytes()), "{key}");
        assert!(table.get(key.as_bytes()).unwrap_err().is_not_found(), "{key}");
    }
}

#[test]
fn keys_are_sorted() {
    let table = table();
    let keys = table.keys();
    let expected: Vec<Vec<u8>> = standard_entries().into_iter().map(|e| e.key).collect();
    assert_eq!(keys.iter().map(|k| k.to_vec()).collect::<Vec<_>>(), expected);

    let iterated: Vec<&[u8]> = table.key_iter().collect();
    assert_eq!(iterated.len(), 9);
    assert_eq!(table.key_iter().rev().next(), Some(&b"zzz"[..]));
}

#[test]
fn lower_key() {
    let table = table();
    assert_eq!(floor(&table, ""), None);
    assert_eq!(floor(&table, "fo"), None);
    assert_eq!(floor(&table, "foo").as_deref(), Some("foo"));
    assert_eq!(floor(&table, "foo4").as_deref(), Some("foo3"));
    assert_eq!(floor(&table, "go").as_deref(), Some("foo3"));
    assert_eq!(floor(&table, "goo1").as_deref(), Some("goo1"));
    assert_eq!(floor(&table, "zzzzz").as_deref(), Some("zzz"));
}

#[test]
fn upper_key() {
    let table = table();
    assert_eq!(ceiling(&table, "").as_deref(), Some("foo"));
    assert_eq!(ceiling(&table, "fo").as_deref(), Some("foo"));
    assert_eq!(ceiling(&table, "foo4").as_deref(), Some("goo"));
    assert_eq!(ceiling(&table, "g").as_deref(), Some("goo"));
    assert_eq!(ceiling(&table, "hoo").as_deref(), Some("hoo"));
    assert_eq!(ceiling(&table, "iii").as_deref(), Some("zzz"));
    assert_eq!(ceiling(&table, "zzzz"), None);
}

#[test]
fn bound_lookups_carry_entry_metadata() {
    let table = table();
    let info = table.upper_key(b"ho").unwrap();
    assert_eq!(info.key.as_ref(), b"hoo");
    assert_eq!(info.extra.as_ref(), &[1, 2, 3, 4, 5]);
    assert_eq!(info.length, 11);

    let info = table.lower_key(b"foo3a").unwrap();
    assert_eq!(info.key.as_ref(), b"foo3");
    assert_eq!(info.length, 0);
}

#[test]
fn partial_reads() {
    let table = table();
    let mut buf = [0u8; 6];
    table.get_partial(b"hoo", 3, &mut buf).unwrap();
    assert_eq!(&buf, b"domstu");

    table.get_partial(b"foo3", 0, &mut []).unwrap();
    assert!(table.get_partial(b"hoo", 6, &mut buf).is_err());

    let mut whole = [0u8; 11];
    table.get_partial(b"hoo", 0, &mut whole).unwrap();
    assert_eq!(&whole, b"randomstuff");
    let err = table.get_partial(b"hoo", 1, &mut whole).unwrap_err();
    assert!(matches!(err, CoreError::OutOfRange { offset: 1, len: 11, length: 11 }));
}
