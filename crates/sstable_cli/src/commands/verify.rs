//! Verify command implementation.

use super::{display_bytes, open_table};
use sstable_core::Table;
use sstable_storage::RandomAccessSource;
use std::io;
use std::path::Path;

/// Verification result.
#[derive(Debug, Default)]
pub struct VerifyResult {
    /// Number of values read.
    pub values_checked: u64,
    /// Total value bytes read.
    pub bytes_read: u64,
    /// Bytes past the end of the value region.
    pub trailing_bytes: u64,
    /// List of errors found.
    pub errors: Vec<String>,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs the verify command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying table at {}", path.display());
    println!();

    let table = match open_table(path) {
        Ok(table) => table,
        Err(e) => {
            println!("✗ Table failed to load: {e}");
            return Err("Verification failed".into());
        }
    };
    let result = verify(&table)?;
    table.close()?;

    println!("  Values checked: {}", result.values_checked);
    println!("  Bytes read:     {}", result.bytes_read);
    if result.trailing_bytes > 0 {
        println!("  Trailing bytes: {}", result.trailing_bytes);
    }
    for error in &result.errors {
        println!("  Error: {error}");
    }

    println!();
    if result.is_ok() {
        println!("✓ Table verification passed");
        Ok(())
    } else {
        println!("✗ Table verification failed ({} errors)", result.errors.len());
        Err("Verification failed".into())
    }
}

/// Streams every value of `table`, collecting read failures.
fn verify<S: RandomAccessSource>(table: &Table<S>) -> Result<VerifyResult, Box<dyn std::error::Error>> {
    let mut result = VerifyResult::default();

    for key in table.key_iter() {
        let mut reader = table.get_reader(key)?;
        result.values_checked += 1;
        match io::copy(&mut reader, &mut io::sink()) {
            Ok(n) => result.bytes_read += n,
            Err(e) => result
                .errors
                .push(format!("value of \"{}\": {e}", display_bytes(key))),
        }
    }

    let expected = table.stats().file_length();
    let actual = table.source().size()?;
    result.trailing_bytes = actual.saturating_sub(expected);

    Ok(result)
}
