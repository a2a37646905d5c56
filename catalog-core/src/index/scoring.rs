//! Scoring functions.

use crate::index::types::{CatalogIndex, Slot};

impl CatalogIndex {
    /// Squared matched-term ratio, damped by search string length so that
    /// a term hit in a short entry outranks the same hit in a long one.
    #[inline(always)]
    pub(crate) fn compute_score(&self, slot: Slot, matched: usize, query_terms: usize) -> f32 {
        let len = self
            .entries
            .get(slot as usize)
            .map_or(0, |entry| entry.text.len());

        let len_factor = if len > 0 {
            100.0 / (1.0 + (len as f32).sqrt())
        } else {
            100.0
        };

        let match_ratio = matched as f32 / query_terms.max(1) as f32;
        match_ratio * match_ratio * len_factor
    }
}
