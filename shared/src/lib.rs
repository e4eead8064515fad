//! Shared types for the Rayan admin client
//!
//! Wire-level types returned by the Rayan REST API: response envelopes,
//! pagination metadata, bilingual text, entity models and report models.

pub mod localized;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use localized::Localized;
pub use response::{Envelope, ListData, PageMetadata, SortOrder};
