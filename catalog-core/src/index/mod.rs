//! Catalog indexing.
//!
//! Two halves:
//! - [`CatalogIndexer`] turns training records into a [`CatalogDictionary`]
//!   (training id to normalized search string).
//! - [`CatalogIndex`] answers free-text lookups over such a dictionary.
//!
//! Memory layout of the lookup side:
//! - Posting lists are stored in a single contiguous array
//! - Trigram metadata is stored in sorted blocks for binary search lookup
//!
//! [`CatalogDictionary`]: catalog_types::CatalogDictionary

mod builder;
mod dictionary;
mod scoring;
mod search;
mod stats;
mod types;

pub use dictionary::{build_dictionary, CatalogIndexer};
pub use stats::IndexStats;
pub use types::{CatalogIndex, SearchHit};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Trigram;
    use catalog_types::{CatalogDictionary, SearchConfig, TrainingId};

    fn dictionary(entries: &[(TrainingId, &str)]) -> CatalogDictionary {
        entries
            .iter()
            .map(|&(id, text)| (id, text.to_string()))
            .collect()
    }

    fn ids(hits: &[SearchHit]) -> Vec<TrainingId> {
        hits.iter().map(|h| h.id).collect()
    }

    fn sorted_ids(hits: &[SearchHit]) -> Vec<TrainingId> {
        let mut out = ids(hits);
        out.sort_unstable();
        out
    }

    fn sample() -> CatalogIndex {
        CatalogIndex::from_dictionary(
            &dictionary(&[
                (1, "gestion de crise agent d'accueil"),
                (2, "gestion budgetaire comptable"),
                (3, "prevention des risques agent technique"),
                (4, "creche et petite enfance"),
            ]),
            SearchConfig::default(),
        )
    }

    #[test]
    fn basic_lookup() {
        let mut index = sample();
        assert_eq!(sorted_ids(&index.search("gestion", 10)), [1, 2]);
        assert_eq!(sorted_ids(&index.search("agent", 10)), [1, 3]);
        assert_eq!(ids(&index.search("gestion agent", 10)), [1]);
    }

    #[test]
    fn query_is_folded_and_lowercased() {
        let mut index = sample();
        assert_eq!(ids(&index.search("CRÈCHE", 10)), [4]);
        assert_eq!(ids(&index.search("  Prévention   RISQUES ", 10)), [3]);
    }

    #[test]
    fn substring_terms_match() {
        let mut index = sample();
        assert_eq!(sorted_ids(&index.search("budget", 10)), [2]);
        assert_eq!(sorted_ids(&index.search("ges", 10)), [1, 2]);
    }

    #[test]
    fn short_terms_scan_every_entry() {
        let mut index = sample();
        assert_eq!(sorted_ids(&index.search("de", 10)), [1, 3]);
        assert_eq!(ids(&index.search("de crise", 10)), [1]);
    }

    #[test]
    fn unknown_trigram_matches_nothing() {
        let mut index = sample();
        assert!(index.search("zzz", 10).is_empty());
        assert!(index.search("gestion zzz", 10).is_empty());
    }

    #[test]
    fn any_term_mode_ranks_partial_matches() {
        let mut index = CatalogIndex::from_dictionary(
            &dictionary(&[(1, "gestion de crise"), (2, "gestion budgetaire"), (3, "autre")]),
            SearchConfig::any_term(),
        );
        let hits = index.search("gestion crise", 10);
        assert_eq!(ids(&hits), [1, 2]);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn shorter_entries_rank_first_and_ties_break_by_id() {
        let mut index = CatalogIndex::from_dictionary(
            &dictionary(&[
                (9, "rust programming language"),
                (4, "rust"),
                (7, "abc rust"),
                (5, "xyz rust"),
            ]),
            SearchConfig::default(),
        );
        assert_eq!(ids(&index.search("rust", 10)), [4, 5, 7, 9]);
    }

    #[test]
    fn limit_is_respected() {
        let mut index = sample();
        assert_eq!(index.search("e", 2).len(), 2);
        assert!(index.search("gestion", 0).is_empty());

        let mut capped = CatalogIndex::from_dictionary(
            &dictionary(&[(1, "aaa"), (2, "aaa"), (3, "aaa")]),
            SearchConfig {
                max_results: 1,
                ..SearchConfig::default()
            },
        );
        assert_eq!(capped.search("aaa", 10).len(), 1);
    }

    #[test]
    fn empty_and_oversized_queries() {
        let mut index = sample();
        assert!(index.search("", 10).is_empty());
        assert!(index.search(" \t\n", 10).is_empty());

        let long = "a".repeat(SearchConfig::default().max_query_length + 1);
        assert!(index.search(&long, 10).is_empty());
    }

    #[test]
    fn empty_index_returns_nothing() {
        let mut index = CatalogIndex::new();
        assert!(index.is_empty());
        assert!(index.search("anything", 10).is_empty());
    }

    #[test]
    fn non_ascii_entries_are_searchable() {
        let mut index = CatalogIndex::from_dictionary(
            &dictionary(&[(1, "sécurité incendie"), (2, "securite routiere")]),
            SearchConfig::default(),
        );
        // Skills are stored unfolded, so the folded query only reaches entry 2.
        assert_eq!(ids(&index.search("sécurité", 10)), [2]);
        assert_eq!(sorted_ids(&index.search("incendie", 10)), [1]);
    }

    #[test]
    fn incremental_inserts_match_fresh_build() {
        let mut incremental = CatalogIndex::new();
        for i in 0..5u64 {
            incremental.insert(i, &format!("word{i} doc"));
        }
        let _ = incremental.search("word", 10);
        for i in 5..10u64 {
            incremental.insert(i, &format!("word{i} doc"));
        }

        let fresh_dict: CatalogDictionary = (0..10u64).map(|i| (i, format!("word{i} doc"))).collect();
        let mut fresh = CatalogIndex::from_dictionary(&fresh_dict, SearchConfig::default());

        assert_eq!(
            sorted_ids(&incremental.search("doc", 20)),
            sorted_ids(&fresh.search("doc", 20))
        );
        assert_eq!(incremental.stats().num_trigrams, fresh.stats().num_trigrams);
        assert_eq!(incremental.stats().total_postings, fresh.stats().total_postings);
    }

    #[test]
    fn replacing_an_entry_forgets_old_text() {
        let mut index = sample();
        index.insert(4, "maternelle");

        assert_eq!(index.len(), 4);
        assert_eq!(index.get(4), Some("maternelle"));
        assert!(index.search("creche", 10).is_empty());
        assert_eq!(ids(&index.search("maternelle", 10)), [4]);
    }

    #[test]
    fn posting_lists_sorted_and_blocks_ordered() {
        let mut index = CatalogIndex::new();
        for i in 0..100u64 {
            index.insert(i, &format!("document {i}"));
        }
        let _ = index.search("doc", 1);

        for block in &index.blocks {
            let postings = CatalogIndex::block_postings(block, &index.postings);
            for w in postings.windows(2) {
                assert!(w[0] < w[1], "Posting list must be strictly sorted");
            }
        }
        for w in index.blocks.windows(2) {
            assert!(w[0].trigram < w[1].trigram, "Blocks must be sorted by trigram");
        }

        assert!(index.find_block(Trigram::from_bytes(b'd', b'o', b'c')).is_some());
        assert!(index.find_block(Trigram::from_bytes(b'z', b'z', b'z')).is_none());
    }

    #[test]
    fn stats_track_pending_and_queries() {
        let mut index = CatalogIndex::new();
        index.insert(1, "abcd");
        let stats = index.stats();
        assert_eq!(stats.num_entries, 1);
        assert_eq!(stats.pending_trigrams, 2);
        assert_eq!(stats.num_trigrams, 0);
        assert!(stats.to_string().contains("2 pending"));

        index.search("abc", 5);
        index.search("bcd", 5);
        let stats = index.stats();
        assert_eq!(stats.pending_trigrams, 0);
        assert_eq!(stats.num_trigrams, 2);
        assert_eq!(stats.total_postings, 2);
        assert_eq!(stats.queries_executed, 2);
        assert_eq!(stats.memory_usage_bytes(), 2 * 12 + 2 * 4);
        assert_eq!(stats.to_string(), "1 trainings, 2 trigrams, 2 postings");
    }

    #[test]
    fn clear_resets() {
        let mut index = sample();
        index.search("gestion", 10);
        index.clear();

        assert!(index.is_empty());
        assert_eq!(index.get(1), None);
        assert!(index.search("gestion", 10).is_empty());
        assert_eq!(index.stats().queries_executed, 1);
    }

    #[test]
    fn mixed_case_entries_are_found() {
        use catalog_types::{Field, IndexerConfig, TrainingRecord};

        let indexer = CatalogIndexer::with_config(IndexerConfig {
            lowercase: false,
            ..IndexerConfig::default()
        });
        let records = [TrainingRecord::new(3)
            .with(Field::Skills, "Excel")
            .with(Field::EntityName, "Ministry")];
        let dict = indexer.build_dictionary(&records).unwrap();
        assert!(dict[&3].contains("Excel"));

        let mut index = CatalogIndex::from_dictionary(&dict, SearchConfig::default());
        assert_eq!(ids(&index.search("Excel", 10)), [3]);
        assert_eq!(ids(&index.search("excel ministry", 10)), [3]);

        index.insert(4, "Word Processing");
        assert_eq!(index.get(4), Some("word processing"));
        assert_eq!(ids(&index.search("WORD", 10)), [4]);
    }

    #[test]
    fn merge_sorted_dedup_unions() {
        let mut out = Vec::new();
        CatalogIndex::merge_sorted_dedup(&[1, 3, 5], &[2, 3, 6], &mut out);
        assert_eq!(out, [1, 2, 3, 5, 6]);
    }

    #[test]
    fn dictionary_feeds_index() {
        use catalog_types::{Field, TrainingRecord};

        let records = [
            TrainingRecord::new(10)
                .with(Field::Name, "Management d'équipe")
                .with(Field::Content, "<p>Piloter une <b>équipe</b></p>"),
            TrainingRecord::new(11).with(Field::Name, "Bureautique"),
        ];
        let dict = build_dictionary(&records).unwrap();
        let mut index = CatalogIndex::from_dictionary(&dict, SearchConfig::default());

        assert_eq!(ids(&index.search("Équipe", 10)), [10]);
        assert_eq!(ids(&index.search("piloter equipe", 10)), [10]);
        assert_eq!(ids(&index.search("bureau", 10)), [11]);
    }
}
