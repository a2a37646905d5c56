//! Query term splitter.
//!
//! Lookup queries go through the query normalizer first (folded, lower-cased,
//! single spaces, trimmed), then this tokenizer splits them into terms:
//!
//! ```ignore
//! ("gestion", 0)
//! ("de", 1)
//! ("crise", 2)
//! ```
//!
//! Terms are slices of the input, nothing is allocated. Feeding text that does
//! not honour the normalizer contract panics in debug builds.

use memchr::memchr_iter;
use smallvec::{Array, SmallVec};

/// Splits normalized text into terms on ASCII space.
///
/// ## Example
///
/// ```
/// use catalog_core::analyzer::tokenizer::Tokenizer;
///
/// let mut terms = Vec::new();
/// Tokenizer.tokenize("gestion de crise", |term, pos| terms.push((term, pos)));
///
/// assert_eq!(terms, [("gestion", 0), ("de", 1), ("crise", 2)]);
/// ```
#[derive(Debug, Default, Copy, Clone)]
pub struct Tokenizer;

impl Tokenizer {
    /// Tokenizes normalized input and emits `(term, position)`.
    ///
    /// After emitting a term at position `u32::MAX`, further emissions stop.
    #[inline(always)]
    pub fn tokenize<'n, F>(&self, normalized: &'n str, mut emit: F)
    where
        F: FnMut(&'n str, u32),
    {
        let bytes = normalized.as_bytes();

        debug_assert!(
            bytes.first().is_none_or(|&b| b != b' '),
            "tokenizer: leading whitespace: normalizer contract violated"
        );

        debug_assert!(
            bytes.last().is_none_or(|&b| b != b' '),
            "tokenizer: trailing whitespace: normalizer contract violated"
        );

        debug_assert!(
            !normalized.contains("  "),
            "tokenizer: consecutive spaces: normalizer contract violated"
        );

        if bytes.is_empty() {
            return;
        }

        let mut start = 0usize;
        let mut pos = 0u32;

        for i in memchr_iter(b' ', bytes) {
            if start < i {
                emit(&normalized[start..i], pos);
                if pos == u32::MAX {
                    return;
                }
                pos += 1;
            }
            start = i + 1;
        }

        if start < bytes.len() {
            emit(&normalized[start..], pos);
        }
    }

    /// Collects terms, dropping duplicates while keeping first-seen order.
    pub fn unique_terms<'n, A>(&self, normalized: &'n str) -> SmallVec<A>
    where
        A: Array<Item = &'n str>,
    {
        let mut terms = SmallVec::new();
        self.tokenize(normalized, |term, _| {
            if !terms.contains(&term) {
                terms.push(term);
            }
        });
        terms
    }
}
