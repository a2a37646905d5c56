//! Core types shared by the catalog crates.
//!
//! This crate holds the vocabulary of the catalog indexer:
//!
//! - **Records**: the training metadata fed into the indexer, either strongly
//!   typed ([`TrainingRecord`]) or loosely typed as it arrives from JSON
//!   ([`RawRecord`]). Both are read through the [`CatalogSource`] trait.
//! - **Fields**: the ten catalog attributes in their fixed concatenation order.
//! - **Errors**: caller contract violations surfaced by the indexer.
//! - **Configuration**: serde-backed settings for indexing, lookup and the
//!   session lifecycle tasks.

#![warn(missing_docs)]

use core::fmt;
use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Training identifier as assigned by the host platform.
pub type TrainingId = u64;

/// Mapping from training identifier to its normalized search string.
///
/// Built fresh on every indexing call. Equality ignores insertion order.
pub type CatalogDictionary = FxHashMap<TrainingId, String>;

/// How a field's text is prepared before it joins the search string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Treatment {
    /// Accent folded.
    Folded,
    /// HTML markup stripped, then accent folded.
    FoldedHtml,
    /// Copied as is.
    Verbatim,
}

/// One of the ten textual attributes of a training.
///
/// Variants are declared in concatenation order; [`Field::ORDER`] lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Field {
    /// Training name.
    Name = 0,
    /// Typical job the training targets.
    TypicalJob = 1,
    /// Skills, comma-joined.
    Skills = 2,
    /// Description, as HTML markup.
    Content = 3,
    /// Internal HR system identifier.
    InternalId = 4,
    /// Organization producing the training.
    ProducingOrganization = 5,
    /// Short name of the producing organization.
    ProducerShortName = 6,
    /// Marketing catchphrase.
    Catchphrase = 7,
    /// Owning entity name.
    EntityName = 8,
    /// Owning entity full name.
    EntityFullName = 9,
}

impl Field {
    /// Every field, in the order segments appear in a search string.
    pub const ORDER: [Field; 10] = [
        Field::Name,
        Field::TypicalJob,
        Field::Skills,
        Field::Content,
        Field::InternalId,
        Field::ProducingOrganization,
        Field::ProducerShortName,
        Field::Catchphrase,
        Field::EntityName,
        Field::EntityFullName,
    ];

    /// Attribute key used by the host platform and in JSON input.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::TypicalJob => "typicaljob",
            Field::Skills => "skills",
            Field::Content => "content",
            Field::InternalId => "idsirh",
            Field::ProducingOrganization => "producingorganization",
            Field::ProducerShortName => "producerorganizationshortname",
            Field::Catchphrase => "catchphrase",
            Field::EntityName => "entityname",
            Field::EntityFullName => "entityfullname",
        }
    }

    /// Preparation applied to this field's text.
    #[must_use]
    pub const fn treatment(self) -> Treatment {
        match self {
            Field::Name | Field::TypicalJob => Treatment::Folded,
            Field::Content => Treatment::FoldedHtml,
            _ => Treatment::Verbatim,
        }
    }

    /// Looks a field up by its attribute key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Field> {
        Self::ORDER.into_iter().find(|f| f.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Errors raised when a record does not honour the input contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The record does not expose one of the ten catalog attributes.
    #[error("training {id} is missing attribute `{field}`")]
    MissingAttribute {
        /// Identifier of the offending record
        id: TrainingId,
        /// First attribute found missing
        field: Field,
    },
}

/// Anything that can be indexed into the catalog.
///
/// Implementors expose an identifier and the ten named attributes. An
/// attribute may be empty but should be present; `None` is a contract
/// violation reported by the indexer.
pub trait CatalogSource {
    /// Identifier used as the dictionary key.
    fn id(&self) -> TrainingId;

    /// Raw text of `field`, or `None` when the attribute is absent.
    fn attribute(&self, field: Field) -> Option<&str>;

    /// Like [`attribute`](Self::attribute) but reports absence as an error.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingAttribute`] when the attribute is absent.
    fn require(&self, field: Field) -> Result<&str, RecordError> {
        self.attribute(field)
            .ok_or(RecordError::MissingAttribute { id: self.id(), field })
    }
}

impl<T: CatalogSource + ?Sized> CatalogSource for &T {
    #[inline]
    fn id(&self) -> TrainingId {
        (**self).id()
    }

    #[inline]
    fn attribute(&self, field: Field) -> Option<&str> {
        (**self).attribute(field)
    }
}

/// Training record with every catalog attribute present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
    /// Training identifier
    pub id: TrainingId,
    /// Training name
    pub name: String,
    /// Typical job
    #[serde(rename = "typicaljob")]
    pub typical_job: String,
    /// Comma-joined skills
    pub skills: String,
    /// HTML description
    pub content: String,
    /// Internal HR identifier
    #[serde(rename = "idsirh")]
    pub internal_id: String,
    /// Producing organization
    #[serde(rename = "producingorganization")]
    pub producing_organization: String,
    /// Producing organization short name
    #[serde(rename = "producerorganizationshortname")]
    pub producer_short_name: String,
    /// Catchphrase
    pub catchphrase: String,
    /// Entity name
    #[serde(rename = "entityname")]
    pub entity_name: String,
    /// Entity full name
    #[serde(rename = "entityfullname")]
    pub entity_full_name: String,
}

impl TrainingRecord {
    /// Creates a record with every attribute empty.
    #[must_use]
    pub fn new(id: TrainingId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Sets one attribute, builder style.
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        *self.slot_mut(field) = value.into();
        self
    }

    fn slot(&self, field: Field) -> &String {
        match field {
            Field::Name => &self.name,
            Field::TypicalJob => &self.typical_job,
            Field::Skills => &self.skills,
            Field::Content => &self.content,
            Field::InternalId => &self.internal_id,
            Field::ProducingOrganization => &self.producing_organization,
            Field::ProducerShortName => &self.producer_short_name,
            Field::Catchphrase => &self.catchphrase,
            Field::EntityName => &self.entity_name,
            Field::EntityFullName => &self.entity_full_name,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::TypicalJob => &mut self.typical_job,
            Field::Skills => &mut self.skills,
            Field::Content => &mut self.content,
            Field::InternalId => &mut self.internal_id,
            Field::ProducingOrganization => &mut self.producing_organization,
            Field::ProducerShortName => &mut self.producer_short_name,
            Field::Catchphrase => &mut self.catchphrase,
            Field::EntityName => &mut self.entity_name,
            Field::EntityFullName => &mut self.entity_full_name,
        }
    }
}

impl CatalogSource for TrainingRecord {
    #[inline]
    fn id(&self) -> TrainingId {
        self.id
    }

    #[inline]
    fn attribute(&self, field: Field) -> Option<&str> {
        Some(self.slot(field))
    }
}

/// Loosely typed record: an identifier plus whatever attributes were sent.
///
/// Unknown keys are kept but ignored by the indexer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Training identifier
    pub id: TrainingId,
    /// Attribute key to text
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

impl CatalogSource for RawRecord {
    #[inline]
    fn id(&self) -> TrainingId {
        self.id
    }

    #[inline]
    fn attribute(&self, field: Field) -> Option<&str> {
        self.attributes.get(field.key()).map(String::as_str)
    }
}

impl TryFrom<RawRecord> for TrainingRecord {
    type Error = RecordError;

    fn try_from(mut raw: RawRecord) -> Result<Self, Self::Error> {
        let mut record = TrainingRecord::new(raw.id);
        for field in Field::ORDER {
            let value = raw
                .attributes
                .remove(field.key())
                .ok_or(RecordError::MissingAttribute { id: raw.id, field })?;
            *record.slot_mut(field) = value;
        }
        Ok(record)
    }
}

/// Settings for building search strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexerConfig {
    /// Lower-case the whole assembled search string, not only name and
    /// typical job.
    pub lowercase: bool,
    /// Remove HTML markup from the content field before folding.
    pub strip_html: bool,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            strip_html: true,
        }
    }
}

/// Settings for catalog lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Require every query term to match (otherwise any term is enough).
    pub match_all_terms: bool,
    /// Upper bound on hits returned by a single lookup.
    pub max_results: usize,
    /// Queries longer than this many bytes return nothing.
    pub max_query_length: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            match_all_terms: true,
            max_results: 50,
            max_query_length: 1_000,
        }
    }
}

impl SearchConfig {
    /// Configuration that ranks entries matching any term.
    #[must_use]
    pub const fn any_term() -> Self {
        Self {
            match_all_terms: false,
            max_results: 50,
            max_query_length: 1_000,
        }
    }
}

/// Settings for the session lifecycle tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Days a completed session stays visible before being archived.
    pub archive_delay_days: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            archive_delay_days: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_order_matches_discriminants() {
        for (i, field) in Field::ORDER.iter().enumerate() {
            assert_eq!(*field as usize, i);
        }
    }

    #[test]
    fn field_size_is_1_byte() {
        assert_eq!(size_of::<Field>(), 1);
    }

    #[test]
    fn field_keys_resolve_back() {
        for field in Field::ORDER {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("unknown"), None);
    }

    #[test]
    fn only_name_job_and_content_are_folded() {
        let folded: Vec<Field> = Field::ORDER
            .into_iter()
            .filter(|f| f.treatment() != Treatment::Verbatim)
            .collect();
        assert_eq!(folded, [Field::Name, Field::TypicalJob, Field::Content]);
        assert_eq!(Field::Content.treatment(), Treatment::FoldedHtml);
    }

    #[test]
    fn training_record_exposes_every_field() {
        let record = TrainingRecord::new(7)
            .with(Field::Name, "Rust")
            .with(Field::EntityFullName, "Ministry");
        assert_eq!(record.id(), 7);
        assert_eq!(record.attribute(Field::Name), Some("Rust"));
        assert_eq!(record.attribute(Field::Skills), Some(""));
        assert_eq!(record.require(Field::EntityFullName), Ok("Ministry"));
    }

    #[test]
    fn raw_record_reports_missing_attribute() {
        let raw = RawRecord {
            id: 3,
            attributes: BTreeMap::from([("name".to_string(), "x".to_string())]),
        };
        assert_eq!(raw.attribute(Field::Name), Some("x"));
        assert_eq!(
            raw.require(Field::Skills),
            Err(RecordError::MissingAttribute {
                id: 3,
                field: Field::Skills
            })
        );
    }

    #[test]
    fn raw_record_deserializes_flattened_attributes() {
        let raw: RawRecord =
            serde_json::from_str(r#"{"id": 12, "name": "Excel", "typicaljob": "Agent"}"#)
                .expect("valid json");
        assert_eq!(raw.id, 12);
        assert_eq!(raw.attribute(Field::TypicalJob), Some("Agent"));
        assert_eq!(raw.attribute(Field::Content), None);
    }

    #[test]
    fn try_from_raw_fails_on_first_missing_field() {
        let mut attributes = BTreeMap::new();
        attributes.insert("name".to_string(), "a".to_string());
        attributes.insert("typicaljob".to_string(), "b".to_string());
        let err = TrainingRecord::try_from(RawRecord { id: 1, attributes }).unwrap_err();
        assert_eq!(
            err,
            RecordError::MissingAttribute {
                id: 1,
                field: Field::Skills
            }
        );
    }

    #[test]
    fn try_from_raw_succeeds_when_complete() {
        let attributes = Field::ORDER
            .into_iter()
            .map(|f| (f.key().to_string(), f.key().to_uppercase()))
            .collect();
        let record = TrainingRecord::try_from(RawRecord { id: 9, attributes }).unwrap();
        assert_eq!(record.internal_id, "IDSIRH");
        assert_eq!(record.entity_name, "ENTITYNAME");
    }

    #[test]
    fn training_record_uses_attribute_keys_in_json() {
        let record = TrainingRecord::new(1).with(Field::TypicalJob, "Clerk");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["typicaljob"], "Clerk");
        assert_eq!(json["idsirh"], "");
    }

    #[test]
    fn error_message_names_record_and_field() {
        let err = RecordError::MissingAttribute {
            id: 42,
            field: Field::Catchphrase,
        };
        assert_eq!(err.to_string(), "training 42 is missing attribute `catchphrase`");
    }

    #[test]
    fn configs_fall_back_to_defaults() {
        let indexer: IndexerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(indexer, IndexerConfig::default());
        assert!(indexer.lowercase && indexer.strip_html);

        let search: SearchConfig = serde_json::from_str(r#"{"max_results": 5}"#).unwrap();
        assert!(search.match_all_terms);
        assert_eq!(search.max_results, 5);

        let sessions: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(sessions.archive_delay_days, 30);
    }

    #[test]
    fn any_term_relaxes_matching() {
        assert!(!SearchConfig::any_term().match_all_terms);
    }
}
