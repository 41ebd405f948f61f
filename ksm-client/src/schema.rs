use std::{borrow::Cow, collections::HashMap, fs};

use anyhow::Context;
use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use ksm::{
    errors::{self, Code},
    framework::{FieldSchema, Map, Operation, Request, Value},
    Result,
};

lazy_static::lazy_static! {
    static ref FIELD_NAME_REGEX: Regex = Regex::new(r"^[a-z][a-z0-9_]*$").unwrap();
}

// Field names are lower snake case, the same names clients send as keys.
fn check_field_names(
    fields: &HashMap<String, FieldSchema>,
) -> Result<(), ValidationError> {
    let mut invalid = fields
        .keys()
        .filter(|name| !FIELD_NAME_REGEX.is_match(name))
        .map(String::as_str)
        .collect::<Vec<_>>();
    if invalid.is_empty() {
        return Ok(());
    }
    invalid.sort_unstable();
    let mut err = ValidationError::new("invalid field name");
    err.message = Some(Cow::Owned(format!(
        "invalid field names: {}",
        invalid.join(", ")
    )));
    Err(err)
}

/// A path declaration read from disk.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    #[validate(length(min = 1))]
    pub pattern: String,
    #[serde(default)]
    #[validate(custom(function = "check_field_names"))]
    pub fields: HashMap<String, FieldSchema>,
}

impl SchemaFile {
    pub fn parse(content: &str) -> Result<Self> {
        let schema: Self =
            toml::from_str(content).map_err(|err| errors::bad_request(&err))?;
        schema.validate().map_err(Code::Validates)?;
        Ok(schema)
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).context("could not read schema file")?;
        Self::parse(&content).context("could not parse schema file")
    }
}

/// A request as written by hand: only `data` is mandatory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestDocument {
    #[serde(default)]
    pub operation: Option<Operation>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl RequestDocument {
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|err| errors::bad_request(&err))
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).context("could not read request file")?;
        Self::parse(&content).context("could not parse request file")
    }

    /// Writes are the common case when checking payloads, so the operation
    /// defaults to update and the path to the schema's pattern.
    pub fn into_request(self, pattern: &str) -> Request {
        Request::new(
            self.operation.unwrap_or(Operation::Update),
            self.path.unwrap_or_else(|| pattern.to_owned()),
        )
        .with_data(self.data)
    }
}

#[cfg(test)]
mod tests {
    use ksm::{errors::StatusCode, framework::FieldType};

    use super::*;

    const CONFIG: &str = r#"
        pattern = "config"

        [fields.path]
        type = "string"
        description = "Secret path"
        required = true

        [fields.ttl]
        type = "duration"
        default = 3600
    "#;

    #[test]
    fn parse_schema() {
        let schema = SchemaFile::parse(CONFIG).unwrap();
        assert_eq!(schema.pattern, "config");
        assert_eq!(schema.fields.len(), 2);
        assert!(schema.fields["path"].required);
        assert_eq!(schema.fields["ttl"].field_type, FieldType::Duration);
        assert_eq!(schema.fields["ttl"].default, Some(Value::from(3600)));
    }

    #[test]
    fn invalid_field_names_are_rejected() {
        let err = SchemaFile::parse(
            r#"
            pattern = "config"
            [fields.Path]
            [fields."max-ttl"]
            [fields.ttl]
            "#,
        )
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn empty_pattern_is_rejected() {
        let err = SchemaFile::parse(r#"pattern = """#).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn malformed_schema_is_bad_request() {
        let err = SchemaFile::parse("pattern = ").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn request_defaults() {
        let req = RequestDocument::parse(r#"{"data": {"path": "/x"}}"#)
            .unwrap()
            .into_request("config");
        assert_eq!(req.operation, Operation::Update);
        assert_eq!(req.path, "config");
        assert_eq!(req.data.get("path"), Some(&Value::from("/x")));
    }

    #[test]
    fn request_with_operation() {
        let req = RequestDocument::parse(
            r#"{"operation": "read", "path": "config/main"}"#,
        )
        .unwrap()
        .into_request("config");
        assert_eq!(req.operation, Operation::Read);
        assert_eq!(req.path, "config/main");
        assert!(req.data.is_empty());
    }

    #[test]
    fn request_document_keys_are_strict() {
        let err =
            RequestDocument::parse(r#"{"payload": {}}"#).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
