//! Benchmark utilities.

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use sstable_core::Builder;
use std::io::{self, Write};

/// Generates `count` sorted, unique keys of the form `user:NNNNNNNN:xxxx`.
pub fn generate_keys(count: usize) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    (0..count)
        .map(|i| {
            let suffix: u16 = rng.gen();
            format!("user:{i:08}:{suffix:04x}").into_bytes()
        })
        .collect()
}

/// Generates `count` key/value pairs with values of `value_size` bytes.
pub fn generate_entries(count: usize, value_size: usize) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut rng = StdRng::seed_from_u64(0xda7a);
    generate_keys(count)
        .into_iter()
        .map(|key| {
            let value = (0..value_size).map(|_| rng.gen()).collect();
            (key, value)
        })
        .collect()
}

/// Builds sorted `entries` into table bytes.
pub fn build_table(entries: &[(Vec<u8>, Vec<u8>)]) -> Vec<u8> {
    let mut out = Vec::new();
    write_table(&mut out, entries).unwrap_or_else(|e| panic!("build failed: {e}"));
    out
}

/// Builds sorted `entries` into `sink`.
pub fn write_table<W: Write>(sink: W, entries: &[(Vec<u8>, Vec<u8>)]) -> sstable_core::CoreResult<()> {
    let mut next = 0;
    let mut builder = Builder::new(sink, |_key: &[u8], dest: &mut dyn Write| -> io::Result<u64> {
        // Values are requested in key order, skipping empty ones.
        while entries[next].1.is_empty() {
            next += 1;
        }
        let value = &entries[next].1;
        next += 1;
        dest.write_all(value)?;
        Ok(value.len() as u64)
    });
    for (key, value) in entries {
        builder.add(key, value.len() as u32, b"");
    }
    builder.build()?;
    Ok(())
}
