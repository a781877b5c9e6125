//! Builder and reader configuration.

/// Configuration for building and loading tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Capacity of the buffered writer wrapped around the builder's sink.
    pub write_buffer_size: usize,

    /// Whether the builder records the entry count in the header.
    ///
    /// Turning this off produces headers identical to writers that leave
    /// the count unset.
    pub record_entry_count: bool,

    /// Whether loading fails when a nonzero header entry count differs from
    /// the number of decoded entries.
    pub verify_entry_count: bool,

    /// Whether loading fails when an entry's offset is not the sum of the
    /// lengths before it.
    pub verify_offsets: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            write_buffer_size: 1024 * 1024, // 1 MiB
            record_entry_count: true,
            verify_entry_count: true,
            verify_offsets: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the builder's write buffer capacity.
    #[must_use]
    pub const fn write_buffer_size(mut self, size: usize) -> Self {
        self.write_buffer_size = size;
        self
    }

    /// Sets whether the builder records the entry count.
    #[must_use]
    pub const fn record_entry_count(mut self, value: bool) -> Self {
        self.record_entry_count = value;
        self
    }

    /// Sets whether loading checks the header entry count.
    #[must_use]
    pub const fn verify_entry_count(mut self, value: bool) -> Self {
        self.verify_entry_count = value;
        self
    }

    /// Sets whether loading checks entry offsets.
    #[must_use]
    pub const fn verify_offsets(mut self, value: bool) -> Self {
        self.verify_offsets = value;
        self
    }
}
