//! Statistics and IndexStats.

use crate::index::types::{CatalogIndex, Slot};

/// A snapshot of index statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of trainings in the index.
    pub num_entries: usize,
    /// Number of unique committed trigrams.
    pub num_trigrams: usize,
    /// Total number of committed postings.
    pub total_postings: usize,
    /// Trigram occurrences waiting for the next rebuild.
    pub pending_trigrams: usize,
    /// Lookups executed since creation or the last clear.
    pub queries_executed: u64,
}

impl CatalogIndex {
    /// Returns index statistics.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            num_entries: self.entries.len(),
            num_trigrams: self.blocks.len(),
            total_postings: self.postings.len(),
            pending_trigrams: self.temp_trigrams.len(),
            queries_executed: self.query_count,
        }
    }
}

impl IndexStats {
    /// Returns approximate memory used by the posting structures, in bytes.
    pub fn memory_usage_bytes(&self) -> usize {
        let blocks_size = self.num_trigrams * std::mem::size_of::<u32>() * 3;
        let postings_size = self.total_postings * std::mem::size_of::<Slot>();
        blocks_size + postings_size
    }
}

impl core::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} trainings, {} trigrams, {} postings",
            self.num_entries, self.num_trigrams, self.total_postings
        )?;

        if self.pending_trigrams > 0 {
            write!(f, ", {} pending", self.pending_trigrams)?;
        }

        Ok(())
    }
}
