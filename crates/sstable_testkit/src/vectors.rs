//! Golden byte vectors for the table format.
//!
//! Each vector pins the exact bytes a builder must produce for a small
//! entry set, so that tables stay readable by other implementations of
//! the format.

use serde::{Deserialize, Serialize};
use sstable_core::Config;

use crate::fixtures::{build_table_with_config, TestEntry};

/// An entry in a table vector (hex-encoded fields).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorEntry {
    /// Key bytes.
    pub key_hex: String,
    /// Value bytes.
    pub value_hex: String,
    /// Extra bytes.
    pub extra_hex: String,
}

/// A complete table and the bytes it must encode to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Whether the header records the entry count.
    pub record_entry_count: bool,
    /// Entries in key order.
    pub entries: Vec<VectorEntry>,
    /// Expected file bytes (hex-encoded).
    pub expected_hex: String,
}

impl TableVector {
    /// Decodes the vector's entries.
    pub fn test_entries(&self) -> Vec<TestEntry> {
        self.entries
            .iter()
            .map(|e| TestEntry::new(hex_decode(&e.key_hex), hex_decode(&e.value_hex), hex_decode(&e.extra_hex)))
            .collect()
    }

    /// Returns the builder configuration the vector was produced with.
    pub fn config(&self) -> Config {
        Config::default().record_entry_count(self.record_entry_count)
    }

    /// Decodes the expected bytes.
    pub fn expected_bytes(&self) -> Vec<u8> {
        hex_decode(&self.expected_hex)
    }

    /// Builds the vector's entries and returns the produced bytes.
    pub fn build(&self) -> Vec<u8> {
        build_table_with_config(&self.test_entries(), self.config())
    }
}

fn entry(key: &str, value: &str, extra: &[u8]) -> VectorEntry {
    VectorEntry {
        key_hex: hex_encode(key.as_bytes()),
        value_hex: hex_encode(value.as_bytes()),
        extra_hex: hex_encode(extra),
    }
}

/// Table encoding vectors.
pub fn table_vectors() -> Vec<TableVector> {
    vec![
        TableVector {
            id: "table_empty".into(),
            description: "No entries: header with only the version".into(),
            record_entry_count: true,
            entries: vec![],
            expected_hex: "02000000 0801".into(),
        },
        TableVector {
            id: "table_single".into(),
            description: "One entry; offset 0 is omitted from the index".into(),
            record_entry_count: true,
            entries: vec![entry("a", "xy", b"")],
            expected_hex: "06000000 080110061801 050a01611802 7879".into(),
        },
        TableVector {
            id: "table_two_with_extra".into(),
            description: "Two entries, the second carrying extra bytes".into(),
            record_entry_count: true,
            entries: vec![entry("a", "xy", b""), entry("b", "z", &[7])],
            expected_hex: "06000000 080110111802 050a01611802 0a0a016210021801220107 78797a"
                .into(),
        },
        TableVector {
            id: "table_no_entry_count".into(),
            description: "Header without the entry count".into(),
            record_entry_count: false,
            entries: vec![entry("a", "xy", b"")],
            expected_hex: "04000000 08011006 050a01611802 7879".into(),
        },
        TableVector {
            id: "table_extra_only".into(),
            description: "Zero-length value: no length field, no value bytes".into(),
            record_entry_count: true,
            entries: vec![entry("m", "", b"e")],
            expected_hex: "06000000 080110071801 060a016d220165".into(),
        },
    ]
}

/// Varint encoding vectors as `(value, expected hex)`.
pub fn varint_vectors() -> Vec<(u64, &'static str)> {
    vec![
        (0, "00"),
        (1, "01"),
        (127, "7f"),
        (128, "8001"),
        (300, "ac02"),
        (16_383, "ff7f"),
        (16_384, "808001"),
        (u64::from(u32::MAX), "ffffffff0f"),
        (u64::MAX, "ffffffffffffffffff01"),
    ]
}

/// Generate all table vectors as JSON for use by other implementations.
pub fn all_vectors_json() -> String {
    serde_json::to_string_pretty(&table_vectors()).expect("Failed to serialize vectors")
}

/// Encodes bytes as hexadecimal string.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decodes hexadecimal string to bytes, ignoring whitespace.
pub fn hex_decode(hex: &str) -> Vec<u8> {
    let hex = hex.replace([' ', '\n', '\r'], "");
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("Invalid hex"))
        .collect()
}
