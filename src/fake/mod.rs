//! Random payload generator.
//!
//! [`generate_record`] fills a [`SyntheticRecord`] using the rules in a schema
//! table such as [`SYNTHETIC_RECORD_SCHEMA`]. Values are not reproducible
//! unless the caller passes a seeded RNG.

mod lexicon;
mod record;
mod schema;

use thiserror::Error;

pub use record::{generate_record, Created, SyntheticRecord};
pub use schema::{FieldRule, FieldSpec, FieldValue, SizeRule, SYNTHETIC_RECORD_SCHEMA};

/// Failure to satisfy a record schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("field {field:?}: invalid directive: {reason}")]
    InvalidDirective { field: String, reason: String },
    #[error("field {0:?}: no rule in schema")]
    MissingField(String),
    #[error("field {field:?}: rule produced {found}, record expects {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}
