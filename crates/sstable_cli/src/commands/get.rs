//! Get command implementation.

use super::{display_bytes, hex, open_table};
use std::io::{self, Write};
use std::path::Path;

/// Runs the get command, writing the value bytes verbatim to stdout.
pub fn run(path: &Path, key: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    let table = open_table(path)?;

    let (value, extra) = match table.get(key) {
        Ok(found) => found,
        Err(e) if e.is_not_found() => {
            return Err(format!("Key \"{}\" not found", display_bytes(key)).into());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Length: {}", value.len());
    println!("Extra:  {}", hex(&extra));
    println!("Value:");
    let mut stdout = io::stdout().lock();
    stdout.write_all(&value)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    drop(stdout);

    table.close()?;
    Ok(())
}
