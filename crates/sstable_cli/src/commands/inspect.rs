//! Inspect command implementation.

use super::{display_bytes, open_table};
use serde::Serialize;
use sstable_core::Table;
use sstable_storage::RandomAccessSource;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Table inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Table path.
    pub path: String,
    /// File size in bytes.
    pub file_size: u64,
    /// Time taken to load the header and index, in milliseconds.
    pub load_time_ms: f64,
    /// Encoded header size.
    pub header_size: u32,
    /// Encoded index size.
    pub index_size: u32,
    /// Number of keys.
    pub num_keys: u64,
    /// Sum of key lengths.
    pub keys_size: u64,
    /// Sum of value lengths.
    pub values_size: u64,
    /// Bytes a shared-prefix key encoding would save.
    pub prefix_savings: u64,
    /// Per-key details (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<KeyDetail>>,
}

/// One key and its value length.
#[derive(Debug, Serialize)]
pub struct KeyDetail {
    /// Key, with non-printable bytes escaped.
    pub key: String,
    /// Value length in bytes.
    pub length: u32,
}

/// Runs the inspect command.
pub fn run(path: &Path, show_keys: bool, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let table = open_table(path)?;
    let load_time = start.elapsed();
    info!("Loaded {} in {:?}", path.display(), load_time);

    let result = inspect(&table, path, load_time.as_secs_f64() * 1000.0, show_keys)?;
    table.close()?;
    info!(
        num_keys = result.num_keys,
        keys_size = result.keys_size,
        values_size = result.values_size,
        index_size = result.index_size,
        "table stats"
    );

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn inspect<S: RandomAccessSource>(
    table: &Table<S>,
    path: &Path,
    load_time_ms: f64,
    show_keys: bool,
) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let stats = table.stats();

    let keys = if show_keys {
        let mut details = Vec::with_capacity(table.num_keys());
        for key in table.key_iter() {
            let (length, _) = table.get_info(key)?;
            details.push(KeyDetail {
                key: display_bytes(key),
                length,
            });
        }
        Some(details)
    } else {
        None
    };

    Ok(InspectResult {
        path: path.display().to_string(),
        file_size: table.source().size()?,
        load_time_ms,
        header_size: stats.header_size,
        index_size: stats.index_size,
        num_keys: stats.num_keys,
        keys_size: stats.keys_size,
        values_size: stats.values_size,
        prefix_savings: prefix_savings(table.key_iter()),
        keys,
    })
}

/// Sums, over adjacent key pairs sharing more than one leading byte, the
/// shared length minus one.
fn prefix_savings<'a>(keys: impl IntoIterator<Item = &'a [u8]>) -> u64 {
    let mut prev: &[u8] = &[];
    let mut saved = 0u64;
    for key in keys {
        let common = common_prefix(prev, key);
        if common > 1 {
            saved += (common - 1) as u64;
        }
        prev = key;
    }
    saved
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn print_text_output(result: &InspectResult) {
    println!("SSTable Inspection");
    println!("==================");
    println!();
    println!("Path: {}", result.path);
    println!("Load time: {:.3} ms", result.load_time_ms);
    println!();
    println!("Layout:");
    println!("  File size:    {}", format_size(result.file_size));
    println!("  Header size:  {}", format_size(u64::from(result.header_size)));
    println!("  Index size:   {}", format_size(u64::from(result.index_size)));
    println!();
    println!("Contents:");
    println!("  Keys:         {}", result.num_keys);
    println!("  Keys size:    {}", format_size(result.keys_size));
    println!("  Values size:  {}", format_size(result.values_size));

    if let Some(keys) = &result.keys {
        println!();
        println!("Keys:");
        for detail in keys {
            println!("  {}\t{}", detail.key, detail.length);
        }
    }

    println!();
    println!(
        "Bytes saved if prefix encoded keys: {}",
        result.prefix_savings
    );
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} bytes")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
