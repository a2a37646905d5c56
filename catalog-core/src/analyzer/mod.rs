//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Normalizer**: Folds accents, optionally lower-cases and collapses whitespace
//! - **Html**: Strips markup from training descriptions
//! - **Tokenizer**: Splits normalized queries into terms
//! - **Trigram**: Extracts 3-byte windows for the lookup prefilter

pub mod html;
pub mod normalizer;
pub mod tokenizer;
pub mod trigram;

pub use html::{strip_html, strip_html_into};
pub use normalizer::{normalize, NormalizerConfig, TextNormalizer};
pub use tokenizer::Tokenizer;
pub use trigram::{extract_trigrams, Trigram};
