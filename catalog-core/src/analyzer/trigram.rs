//! Byte trigrams for the lookup prefilter.
//!
//! A term can only be a substring of an entry if every 3-byte window of the
//! term also occurs in the entry. Windows are taken over UTF-8 bytes, so
//! accented or non-Latin text works without special casing.

/// Three consecutive bytes packed into the low 24 bits of a `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Trigram(pub u32);

impl Trigram {
    /// Packs three bytes.
    #[inline(always)]
    pub const fn from_bytes(b0: u8, b1: u8, b2: u8) -> Self {
        Self(((b0 as u32) << 16) | ((b1 as u32) << 8) | b2 as u32)
    }

    /// Unpacks the three bytes.
    #[inline(always)]
    pub const fn to_bytes(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }
}

/// Extracts trigrams from text using a sliding window.
///
/// For text shorter than 3 bytes, no trigrams are emitted.
/// For text of N bytes, exactly N-2 trigrams are emitted.
///
/// # Example
///
/// ```
/// use catalog_core::analyzer::trigram::extract_trigrams;
///
/// let mut trigrams = Vec::new();
/// extract_trigrams("hello", |t| trigrams.push(t));
///
/// assert_eq!(trigrams.len(), 3); // "hel", "ell", "llo"
/// ```
#[inline(always)]
pub fn extract_trigrams<F>(text: &str, mut callback: F)
where
    F: FnMut(Trigram),
{
    for window in text.as_bytes().windows(3) {
        callback(Trigram::from_bytes(window[0], window[1], window[2]));
    }
}

/// Counts trigrams without allocating.
#[inline(always)]
pub fn count_trigrams(text: &str) -> usize {
    text.len().saturating_sub(2)
}
