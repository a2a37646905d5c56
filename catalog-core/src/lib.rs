//! Catalog search strings, lookups and session lifecycle for a training platform.
//!
//! - [`analyzer`]: accent folding, markup stripping, query tokenizing
//! - [`index`]: dictionary construction and free-text lookup
//! - [`session`]: status machine and the date-driven status tasks
//! - [`config`]: TOML settings for all of the above

pub mod analyzer;
pub mod config;
pub mod index;
pub mod session;

pub use analyzer::normalize;
pub use config::{CatalogConfig, ConfigError};
pub use index::{build_dictionary, CatalogIndex, CatalogIndexer, IndexStats, SearchHit};
pub use session::{Session, SessionStatus, SessionTasks, TaskReport};
