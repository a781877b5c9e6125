//! CLI command implementations.

pub mod get;
pub mod inspect;
pub mod verify;

use sstable_core::Table;
use sstable_storage::FileSource;
use std::path::Path;

/// Opens and loads the table at `path`.
pub fn open_table(path: &Path) -> Result<Table<FileSource>, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No table found at {}", path.display()).into());
    }
    let source = FileSource::open(path)?;
    Ok(Table::load(source)?)
}

/// Renders bytes as printable text, escaping anything non-ASCII.
pub fn display_bytes(bytes: &[u8]) -> String {
    bytes.escape_ascii().to_string()
}

/// Renders bytes as lowercase hex.
pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
pub(crate) mod testutil {
    use sstable_core::Builder;
    use std::io::{self, Write};
    use std::path::Path;

    /// Writes a table of `(key, value, extra)` entries to `path`.
    pub fn write_table(path: &Path, entries: &[(&[u8], &[u8], &[u8])]) {
        let mut out = Vec::new();
        let mut builder = Builder::new(&mut out, |key: &[u8], dest: &mut dyn Write| -> io::Result<u64> {
            let (_, value, _) = entries.iter().find(|(k, _, _)| *k == key).unwrap();
            dest.write_all(value)?;
            Ok(value.len() as u64)
        });
        for (key, value, extra) in entries {
            builder.add(key, value.len() as u32, extra);
        }
        builder.build().unwrap();
        std::fs::write(path, out).unwrap();
    }
}
