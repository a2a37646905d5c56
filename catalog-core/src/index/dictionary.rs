//! Catalog dictionary construction.
//!
//! Every training becomes one search string: its ten attributes joined by
//! single spaces in [`Field::ORDER`]. Name, typical job and content are accent
//! folded (content after its markup is stripped); the other attributes are
//! copied as is. Name and typical job are always lower-cased; with
//! [`IndexerConfig::lowercase`] set, so is the whole assembled string.

use catalog_types::{
    CatalogDictionary, CatalogSource, Field, IndexerConfig, RecordError, Treatment,
};
use tracing::{debug, trace};

use crate::analyzer::{strip_html_into, TextNormalizer};

/// Reusable buffers for a single indexing call.
#[derive(Default)]
struct Scratch {
    html: String,
    folded: String,
}

/// Builds search strings and catalog dictionaries.
///
/// Holds no state between calls; one indexer can serve any number of
/// concurrent callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogIndexer {
    normalizer: TextNormalizer,
    config: IndexerConfig,
}

impl CatalogIndexer {
    /// Creates an indexer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an indexer with custom configuration.
    pub fn with_config(config: IndexerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> IndexerConfig {
        self.config
    }

    /// Builds the search string of a single record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingAttribute`] if the record lacks one of the
    /// catalog attributes.
    pub fn search_string<S>(&self, record: &S) -> Result<String, RecordError>
    where
        S: CatalogSource + ?Sized,
    {
        let mut out = String::new();
        self.write_search_string(record, &mut out, &mut Scratch::default())?;
        Ok(out)
    }

    /// Builds a dictionary with one entry per record.
    ///
    /// Records are processed in iteration order; a later record with an
    /// already seen identifier replaces the earlier entry.
    ///
    /// # Errors
    ///
    /// Stops at the first record missing an attribute and returns
    /// [`RecordError::MissingAttribute`]; no partial dictionary is returned.
    pub fn build_dictionary<I>(&self, records: I) -> Result<CatalogDictionary, RecordError>
    where
        I: IntoIterator,
        I::Item: CatalogSource,
    {
        let records = records.into_iter();
        let mut dictionary =
            CatalogDictionary::with_capacity_and_hasher(records.size_hint().0, Default::default());
        let mut scratch = Scratch::default();

        for record in records {
            let id = record.id();
            let mut line = String::new();
            self.write_search_string(&record, &mut line, &mut scratch)?;
            trace!(id, len = line.len(), "indexed training");

            if dictionary.insert(id, line).is_some() {
                debug!(id, "duplicate training id, later record wins");
            }
        }

        debug!(entries = dictionary.len(), "catalog dictionary built");
        Ok(dictionary)
    }

    fn write_search_string<S>(
        &self,
        record: &S,
        out: &mut String,
        scratch: &mut Scratch,
    ) -> Result<(), RecordError>
    where
        S: CatalogSource + ?Sized,
    {
        out.clear();

        for (i, field) in Field::ORDER.into_iter().enumerate() {
            let raw = record.require(field)?;
            if i > 0 {
                out.push(' ');
            }

            match field.treatment() {
                Treatment::Verbatim => out.push_str(raw),
                Treatment::Folded => {
                    self.normalizer.normalize_into(raw, &mut scratch.folded);
                    if self.config.lowercase {
                        out.push_str(&scratch.folded);
                    } else {
                        out.extend(scratch.folded.chars().flat_map(char::to_lowercase));
                    }
                }
                Treatment::FoldedHtml => {
                    let text = if self.config.strip_html {
                        strip_html_into(raw, &mut scratch.html);
                        scratch.html.as_str()
                    } else {
                        raw
                    };
                    self.normalizer.normalize_into(text, &mut scratch.folded);
                    out.push_str(&scratch.folded);
                }
            }
        }

        if self.config.lowercase {
            lowercase_in_place(out);
        }

        Ok(())
    }
}

/// Builds a dictionary with the default indexer.
///
/// # Errors
///
/// See [`CatalogIndexer::build_dictionary`].
pub fn build_dictionary<I>(records: I) -> Result<CatalogDictionary, RecordError>
where
    I: IntoIterator,
    I::Item: CatalogSource,
{
    CatalogIndexer::default().build_dictionary(records)
}

pub(crate) fn lowercase_in_place(s: &mut String) {
    if s.is_ascii() {
        s.make_ascii_lowercase();
    } else {
        *s = s.to_lowercase();
    }
}
