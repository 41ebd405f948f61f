use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use ksm_slo::{errors, Result};

/// Recognized fields of a path, keyed by field name.
pub type Schema = HashMap<String, FieldSchema>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    String,
    Int,
    Bool,
    Duration,
    Map,
    Slice,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<Value>,
}

impl FieldSchema {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            ..Default::default()
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default<V: Into<Value>>(mut self, value: V) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn mark_required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A request's raw fields viewed through the schema of the path that
/// received it.
#[derive(Debug, Clone, Default)]
pub struct FieldData {
    pub raw: Map<String, Value>,
    pub schema: Arc<Schema>,
}

impl FieldData {
    pub fn new(raw: Map<String, Value>, schema: Arc<Schema>) -> Self {
        Self { raw, schema }
    }

    /// The supplied value of a recognized field.
    pub fn get_ok(&self, key: &str) -> Option<&Value> {
        if !self.schema.contains_key(key) {
            return None;
        }
        self.raw.get(key)
    }

    /// The supplied value, falling back to the schema default.
    pub fn get(&self, key: &str) -> Option<Value> {
        let field = self.schema.get(key)?;
        self.raw.get(key).or(field.default.as_ref()).cloned()
    }

    /// Like [`FieldData::get_ok`], but asking for a field the path never
    /// declared is a plugin bug and reported as such.
    pub fn get_or_err(&self, key: &str) -> Result<Option<&Value>> {
        if !self.schema.contains_key(key) {
            return Err(errors::anyhow(anyhow::anyhow!(
                "field {} not in the path schema",
                key
            )));
        }
        Ok(self.raw.get(key))
    }
}
