use serde_json::{Map, Value};
use thiserror::Error;

use ksm_framework::{FieldData, Request, Schema};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("unknown fields: {}", .0.join(", "))]
    UnknownFields(Vec<String>),
}

impl FieldError {
    /// The offending field names, sorted.
    pub fn fields(&self) -> &[String] {
        match self {
            Self::UnknownField(name) => std::slice::from_ref(name),
            Self::UnknownFields(names) => names,
        }
    }
}

/// Supplied field names the schema does not recognize, in lexicographic
/// order.
pub fn unknown_fields(
    data: &Map<String, Value>,
    schema: &Schema,
) -> Vec<String> {
    let mut unknown = data
        .keys()
        .filter(|name| !schema.contains_key(name.as_str()))
        .cloned()
        .collect::<Vec<_>>();
    unknown.sort_unstable();
    unknown
}

/// validate_fields verifies that every field supplied with the request is
/// declared in the schema of the path serving it. Values are not inspected.
pub fn validate_fields(
    req: &Request,
    data: &FieldData,
) -> Result<(), FieldError> {
    let mut unknown = unknown_fields(&req.data, &data.schema);
    match unknown.len() {
        0 => Ok(()),
        1 => Err(FieldError::UnknownField(unknown.remove(0))),
        _ => Err(FieldError::UnknownFields(unknown)),
    }
}
