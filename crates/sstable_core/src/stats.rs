//! Table statistics.

/// Size breakdown of a loaded table, gathered while decoding the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Encoded header size, excluding the 4-byte length field.
    pub header_size: u32,
    /// Encoded index size.
    pub index_size: u32,
    /// Number of entries.
    pub num_keys: u64,
    /// Sum of all key lengths.
    pub keys_size: u64,
    /// Sum of all value lengths; the size of the value region.
    pub values_size: u64,
}

impl TableStats {
    /// Total file length implied by the header, index and value lengths.
    #[must_use]
    pub fn file_length(&self) -> u64 {
        crate::format::HEADER_LEN_FIELD_SIZE
            + u64::from(self.header_size)
            + u64::from(self.index_size)
            + self.values_size
    }
}

/// Summary returned by [`Builder::build`](crate::Builder::build).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildInfo {
    /// Number of entries written.
    pub entry_count: u64,
    /// Encoded header size, excluding the 4-byte length field.
    pub header_size: u32,
    /// Encoded index size.
    pub index_size: u32,
    /// Total value bytes written.
    pub data_size: u64,
    /// Total bytes written to the sink.
    pub file_length: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_length_sums_sections() {
        let stats = TableStats {
            header_size: 6,
            index_size: 17,
            num_keys: 2,
            keys_size: 2,
            values_size: 3,
        };
        assert_eq!(stats.file_length(), 30);
    }
}
