use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::schema::{FieldSpec, FieldValue};
use super::GeneratorError;

/// Payload of `GET /`.
///
/// Serialized with PascalCase keys, the shape existing clients of this
/// endpoint already parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SyntheticRecord {
    pub name: String,
    pub sentence: String,
    pub city: String,
    pub number: String,
    pub map: BTreeMap<String, i32>,
    pub array: Vec<String>,
    pub array_range: Vec<String>,
    pub skip: Option<String>,
    pub created: Created,
}

/// `Created` is an RFC 3339 instant unless the schema asks for a custom format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Created {
    Instant(DateTime<Utc>),
    Formatted(String),
}

struct FieldSource<'a, R: ?Sized> {
    schema: &'a [FieldSpec],
    rng: &'a mut R,
}

impl<R: Rng + ?Sized> FieldSource<'_, R> {
    fn value(&mut self, field: &str) -> Result<FieldValue, GeneratorError> {
        let spec = self
            .schema
            .iter()
            .find(|s| s.name == field)
            .ok_or_else(|| GeneratorError::MissingField(field.to_string()))?;
        spec.rule.generate(field, &mut *self.rng)
    }

    fn text(&mut self, field: &str) -> Result<String, GeneratorError> {
        match self.value(field)? {
            FieldValue::Text(s) => Ok(s),
            other => Err(mismatch(field, "text", &other)),
        }
    }

    fn list(&mut self, field: &str) -> Result<Vec<String>, GeneratorError> {
        match self.value(field)? {
            FieldValue::List(v) => Ok(v),
            other => Err(mismatch(field, "list", &other)),
        }
    }

    fn int_map(&mut self, field: &str) -> Result<BTreeMap<String, i32>, GeneratorError> {
        match self.value(field)? {
            FieldValue::IntMap(m) => Ok(m),
            other => Err(mismatch(field, "map", &other)),
        }
    }

    fn optional_text(&mut self, field: &str) -> Result<Option<String>, GeneratorError> {
        match self.value(field)? {
            FieldValue::Null => Ok(None),
            FieldValue::Text(s) => Ok(Some(s)),
            other => Err(mismatch(field, "optional text", &other)),
        }
    }

    fn created(&mut self, field: &str) -> Result<Created, GeneratorError> {
        match self.value(field)? {
            FieldValue::Timestamp(ts) => Ok(Created::Instant(ts)),
            FieldValue::Text(s) => Ok(Created::Formatted(s)),
            other => Err(mismatch(field, "timestamp", &other)),
        }
    }
}

fn mismatch(field: &str, expected: &'static str, found: &FieldValue) -> GeneratorError {
    GeneratorError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: found.kind(),
    }
}

/// Generate one record from `schema`.
///
/// # Errors
///
/// Fails when a record field has no rule, a rule is malformed, or a rule
/// produces a value of the wrong shape for its field.
pub fn generate_record<R: Rng + ?Sized>(
    schema: &[FieldSpec],
    rng: &mut R,
) -> Result<SyntheticRecord, GeneratorError> {
    let mut src = FieldSource { schema, rng };
    Ok(SyntheticRecord {
        name: src.text("name")?,
        sentence: src.text("sentence")?,
        city: src.text("city")?,
        number: src.text("number")?,
        map: src.int_map("map")?,
        array: src.list("array")?,
        array_range: src.list("array_range")?,
        skip: src.optional_text("skip")?,
        created: src.created("created")?,
    })
}
