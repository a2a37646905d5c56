//! Index building logic.

use catalog_types::{CatalogDictionary, SearchConfig, TrainingId};
use tracing::debug;

use crate::analyzer::trigram::{count_trigrams, extract_trigrams};
use crate::index::dictionary::lowercase_in_place;
use crate::index::types::{CatalogIndex, Entry, PostingBlock, Slot, TempTrigramEntry};

impl CatalogIndex {
    /// Builds an index over every entry of `dictionary`.
    ///
    /// Entries are slotted in ascending id order so identical dictionaries
    /// produce identical indexes.
    pub fn from_dictionary(dictionary: &CatalogDictionary, config: SearchConfig) -> Self {
        let mut index = Self::with_config(config);
        let mut ids: Vec<TrainingId> = dictionary.keys().copied().collect();
        ids.sort_unstable();

        index.entries.reserve(ids.len());
        for id in ids {
            index.insert(id, &dictionary[&id]);
        }
        index.rebuild_index();

        debug!(entries = index.len(), trigrams = index.blocks.len(), "catalog index built");
        index
    }

    /// Adds or replaces the search string of `id`.
    ///
    /// The text is stored lower-cased to match the query normalizer.
    /// Replacing keeps the slot; stale trigrams of the old text stay in the
    /// posting lists and are weeded out when candidates are verified.
    pub fn insert(&mut self, id: TrainingId, search_string: &str) {
        let mut text = search_string.to_owned();
        lowercase_in_place(&mut text);

        let slot = match self.slots.get(&id) {
            Some(&slot) => {
                self.entries[slot as usize].text = text.as_str().into();
                slot
            }
            None => {
                let slot = self.entries.len() as Slot;
                self.entries.push(Entry {
                    id,
                    text: text.as_str().into(),
                });
                self.slots.insert(id, slot);
                slot
            }
        };

        let count = count_trigrams(&text);
        if count > 0 {
            self.temp_trigrams.reserve(count);
            extract_trigrams(&text, |trigram| {
                self.temp_trigrams.push(TempTrigramEntry { trigram, slot });
            });
            self.needs_rebuild = true;
        }
    }

    /// Commits `temp_trigrams` into the posting lists.
    ///
    /// On the first build the sorted entries become the index directly. Later
    /// builds turn the delta into blocks and merge them with the committed
    /// index in O(N + Δ).
    pub(crate) fn rebuild_index(&mut self) {
        if self.temp_trigrams.is_empty() {
            self.needs_rebuild = false;
            return;
        }

        Self::sort_trigrams(&mut self.temp_trigrams);

        let (delta_blocks, delta_postings) = Self::build_blocks_from_sorted(&self.temp_trigrams);
        if self.blocks.is_empty() {
            self.blocks = delta_blocks;
            self.postings = delta_postings;
        } else {
            let (merged_blocks, merged_postings) =
                Self::merge_indexes(&self.blocks, &self.postings, &delta_blocks, &delta_postings);
            self.blocks = merged_blocks;
            self.postings = merged_postings;
        }

        self.temp_trigrams.clear();
        self.needs_rebuild = false;
    }

    pub(crate) fn sort_trigrams(entries: &mut [TempTrigramEntry]) {
        entries.sort_unstable_by_key(|e| (e.trigram, e.slot));
    }

    pub(crate) fn build_blocks_from_sorted(
        entries: &[TempTrigramEntry],
    ) -> (Vec<PostingBlock>, Vec<Slot>) {
        let Some(first) = entries.first() else {
            return (Vec::new(), Vec::new());
        };

        let mut blocks: Vec<PostingBlock> = Vec::new();
        let mut postings: Vec<Slot> = Vec::with_capacity(entries.len());

        let mut current_trigram = first.trigram;
        let mut current_offset = 0u32;
        let mut current_len = 0u32;
        let mut last_slot: Option<Slot> = None;

        for entry in entries {
            if entry.trigram != current_trigram {
                blocks.push(PostingBlock {
                    trigram: current_trigram,
                    offset: current_offset,
                    len: current_len,
                });
                current_offset += current_len;
                current_trigram = entry.trigram;
                current_len = 0;
                last_slot = None;
            }

            if last_slot != Some(entry.slot) {
                postings.push(entry.slot);
                current_len += 1;
                last_slot = Some(entry.slot);
            }
        }

        blocks.push(PostingBlock {
            trigram: current_trigram,
            offset: current_offset,
            len: current_len,
        });

        (blocks, postings)
    }

    pub(crate) fn merge_indexes(
        a_blocks: &[PostingBlock],
        a_postings: &[Slot],
        b_blocks: &[PostingBlock],
        b_postings: &[Slot],
    ) -> (Vec<PostingBlock>, Vec<Slot>) {
        let mut out_blocks: Vec<PostingBlock> = Vec::with_capacity(a_blocks.len() + b_blocks.len());
        let mut out_postings: Vec<Slot> = Vec::with_capacity(a_postings.len() + b_postings.len());

        let mut ai = 0usize;
        let mut bi = 0usize;

        while ai < a_blocks.len() && bi < b_blocks.len() {
            match a_blocks[ai].trigram.cmp(&b_blocks[bi].trigram) {
                std::cmp::Ordering::Less => {
                    Self::copy_block(&a_blocks[ai], a_postings, &mut out_blocks, &mut out_postings);
                    ai += 1;
                }
                std::cmp::Ordering::Greater => {
                    Self::copy_block(&b_blocks[bi], b_postings, &mut out_blocks, &mut out_postings);
                    bi += 1;
                }
                std::cmp::Ordering::Equal => {
                    let a_list = Self::block_postings(&a_blocks[ai], a_postings);
                    let b_list = Self::block_postings(&b_blocks[bi], b_postings);
                    let merged_offset = out_postings.len() as u32;
                    Self::merge_sorted_dedup(a_list, b_list, &mut out_postings);
                    out_blocks.push(PostingBlock {
                        trigram: a_blocks[ai].trigram,
                        offset: merged_offset,
                        len: out_postings.len() as u32 - merged_offset,
                    });
                    ai += 1;
                    bi += 1;
                }
            }
        }

        for block in &a_blocks[ai..] {
            Self::copy_block(block, a_postings, &mut out_blocks, &mut out_postings);
        }
        for block in &b_blocks[bi..] {
            Self::copy_block(block, b_postings, &mut out_blocks, &mut out_postings);
        }

        (out_blocks, out_postings)
    }

    #[inline(always)]
    fn copy_block(
        block: &PostingBlock,
        source_postings: &[Slot],
        out_blocks: &mut Vec<PostingBlock>,
        out_postings: &mut Vec<Slot>,
    ) {
        let new_offset = out_postings.len() as u32;
        out_postings.extend_from_slice(Self::block_postings(block, source_postings));
        out_blocks.push(PostingBlock {
            trigram: block.trigram,
            offset: new_offset,
            len: block.len,
        });
    }

    #[inline(always)]
    pub(crate) fn block_postings<'a>(block: &PostingBlock, postings: &'a [Slot]) -> &'a [Slot] {
        let start = block.offset as usize;
        &postings[start..start + block.len as usize]
    }

    pub(crate) fn merge_sorted_dedup(a: &[Slot], b: &[Slot], out: &mut Vec<Slot>) {
        let mut ai = 0usize;
        let mut bi = 0usize;

        while ai < a.len() && bi < b.len() {
            match a[ai].cmp(&b[bi]) {
                std::cmp::Ordering::Less => {
                    out.push(a[ai]);
                    ai += 1;
                }
                std::cmp::Ordering::Greater => {
                    out.push(b[bi]);
                    bi += 1;
                }
                std::cmp::Ordering::Equal => {
                    out.push(a[ai]);
                    ai += 1;
                    bi += 1;
                }
            }
        }

        out.extend_from_slice(&a[ai..]);
        out.extend_from_slice(&b[bi..]);
    }
}
