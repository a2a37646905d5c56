//! Index types and constants.

use catalog_types::{SearchConfig, TrainingId};
use rustc_hash::FxHashMap;

use crate::analyzer::normalizer::{NormalizerConfig, TextNormalizer};
use crate::analyzer::Trigram;

/// Position of an entry in the index, stable for the index's lifetime.
pub type Slot = u32;

/// Inline capacity for query terms before spilling to the heap.
pub const INLINE_TERMS: usize = 8;

#[derive(Clone, Copy, Debug)]
pub struct PostingBlock {
    pub trigram: Trigram,
    pub offset: u32,
    pub len: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct TempTrigramEntry {
    pub trigram: Trigram,
    pub slot: Slot,
}

#[derive(Debug)]
pub(crate) struct Entry {
    pub id: TrainingId,
    pub text: Box<str>,
}

/// A training matched by a lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    /// Matched training
    pub id: TrainingId,
    /// Relevance score (higher is better)
    pub score: f32,
}

/// Lookup structure over a catalog dictionary.
///
/// Terms are matched as substrings of search strings; trigram posting lists
/// narrow the entries that need checking.
///
/// Lookups take `&mut self`: they reuse an internal query buffer and fold
/// pending insertions into the posting lists.
#[derive(Debug)]
pub struct CatalogIndex {
    pub(crate) blocks: Vec<PostingBlock>,
    pub(crate) postings: Vec<Slot>,
    pub(crate) entries: Vec<Entry>,
    pub(crate) slots: FxHashMap<TrainingId, Slot>,
    pub(crate) normalizer: TextNormalizer,
    pub(crate) config: SearchConfig,
    pub(crate) temp_trigrams: Vec<TempTrigramEntry>,
    pub(crate) needs_rebuild: bool,
    pub(crate) query_buf: String,
    pub(crate) query_count: u64,
}

impl Default for CatalogIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogIndex {
    /// Creates a new, empty index.
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            postings: Vec::new(),
            entries: Vec::new(),
            slots: FxHashMap::default(),
            normalizer: TextNormalizer::new(NormalizerConfig::query()),
            config: SearchConfig::default(),
            temp_trigrams: Vec::new(),
            needs_rebuild: false,
            query_buf: String::with_capacity(256),
            query_count: 0,
        }
    }

    /// Creates a new index with custom configuration.
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// Returns the number of trainings in the index.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the index holds no trainings.
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the search string stored for `id`, lower-cased.
    #[must_use]
    pub fn get(&self, id: TrainingId) -> Option<&str> {
        let slot = *self.slots.get(&id)?;
        Some(&self.entries[slot as usize].text)
    }

    /// Removes every entry and resets counters.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.postings.clear();
        self.entries.clear();
        self.slots.clear();
        self.temp_trigrams.clear();
        self.needs_rebuild = false;
        self.query_count = 0;
    }
}
