//! Lookup logic.

use memchr::memmem::Finder;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::analyzer::{extract_trigrams, Tokenizer, Trigram};
use crate::index::types::{CatalogIndex, PostingBlock, SearchHit, Slot, INLINE_TERMS};

impl CatalogIndex {
    /// Finds trainings whose search string contains the query terms.
    ///
    /// The query is folded, lower-cased and split on whitespace. Returns at
    /// most `limit` hits (further capped by the configured maximum), best
    /// first; equal scores are ordered by ascending id.
    #[inline(never)]
    pub fn search(&mut self, query: &str, limit: usize) -> Vec<SearchHit> {
        self.query_count += 1;

        let limit = limit.min(self.config.max_results);
        if self.is_empty() || limit == 0 || query.len() > self.config.max_query_length {
            return Vec::new();
        }

        if self.needs_rebuild {
            self.rebuild_index();
        }

        let mut query_buf = std::mem::take(&mut self.query_buf);
        self.normalizer.normalize_into(query, &mut query_buf);

        let hits = {
            let terms: SmallVec<[&str; INLINE_TERMS]> = Tokenizer.unique_terms(&query_buf);
            if terms.is_empty() {
                Vec::new()
            } else {
                self.rank(&terms, limit)
            }
        };

        trace!(query = %query_buf, hits = hits.len(), "catalog lookup");
        self.query_buf = query_buf;
        hits
    }

    fn rank(&self, terms: &[&str], limit: usize) -> Vec<SearchHit> {
        let required = if self.config.match_all_terms {
            terms.len()
        } else {
            1
        };

        let mut matched: FxHashMap<Slot, u16> = FxHashMap::default();
        for term in terms {
            for slot in self.term_matches(term) {
                *matched.entry(slot).or_default() += 1;
            }
        }

        let mut hits: Vec<SearchHit> = matched
            .into_iter()
            .filter(|&(_, count)| count as usize >= required)
            .map(|(slot, count)| SearchHit {
                id: self.entries[slot as usize].id,
                score: self.compute_score(slot, count as usize, terms.len()),
            })
            .collect();

        hits.sort_unstable_by(|a, b| b.score.total_cmp(&a.score).then(a.id.cmp(&b.id)));
        hits.truncate(limit);
        hits
    }

    /// Slots whose search string contains `term`, ascending.
    fn term_matches(&self, term: &str) -> Vec<Slot> {
        let finder = Finder::new(term.as_bytes());
        let contains =
            |slot: &Slot| finder.find(self.entries[*slot as usize].text.as_bytes()).is_some();

        match self.trigram_candidates(term) {
            Some(candidates) => candidates.into_iter().filter(contains).collect(),
            None => (0..self.entries.len() as Slot).filter(contains).collect(),
        }
    }

    /// Intersects the posting lists of every trigram of `term`.
    ///
    /// `None` means the term is too short to prefilter.
    fn trigram_candidates(&self, term: &str) -> Option<Vec<Slot>> {
        let mut lists: SmallVec<[PostingBlock; 16]> = SmallVec::new();
        let mut missing = false;

        extract_trigrams(term, |trigram| match self.find_block(trigram) {
            Some(idx) => lists.push(self.blocks[idx]),
            None => missing = true,
        });

        if missing {
            return Some(Vec::new());
        }
        if lists.is_empty() {
            return None;
        }

        lists.sort_unstable_by_key(|b| b.len);
        let mut candidates = Self::block_postings(&lists[0], &self.postings).to_vec();
        for block in &lists[1..] {
            Self::hard_intersect(&mut candidates, Self::block_postings(block, &self.postings));
            if candidates.is_empty() {
                break;
            }
        }

        Some(candidates)
    }

    #[inline(always)]
    fn hard_intersect(candidates: &mut Vec<Slot>, postings: &[Slot]) {
        let mut write_idx = 0usize;
        let mut posting_idx = 0usize;

        for read_idx in 0..candidates.len() {
            let slot = candidates[read_idx];

            while posting_idx < postings.len() && postings[posting_idx] < slot {
                posting_idx += 1;
            }

            if posting_idx < postings.len() && postings[posting_idx] == slot {
                candidates[write_idx] = slot;
                write_idx += 1;
                posting_idx += 1;
            }
        }

        candidates.truncate(write_idx);
    }

    #[inline(always)]
    pub(crate) fn find_block(&self, trigram: Trigram) -> Option<usize> {
        self.blocks
            .binary_search_by_key(&trigram, |b| b.trigram)
            .ok()
    }
}
