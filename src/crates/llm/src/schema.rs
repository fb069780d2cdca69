//! Output schemas for structured generation.
//!
//! An [`OutputSchema`] is an ordered list of named, typed fields. It renders to
//! the JSON Schema document sent with a structured request and validates the
//! object that comes back before the caller deserializes it.

use crate::error::{LlmError, Result};
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Type of a single schema field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free-form string.
    String,
    /// String restricted to a fixed set of values.
    Enum { values: Vec<String> },
    /// Array of objects, each matching the nested schema.
    Array { items: OutputSchema },
}

/// A named, described field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub description: String,
    pub kind: FieldKind,
}

/// Ordered set of fields the generated object must carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSchema {
    /// Schema name, sent to providers that require one.
    pub name: String,
    pub fields: Vec<Field>,
}

impl OutputSchema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a string field.
    pub fn string(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.field(name, description, FieldKind::String)
    }

    /// Append an enum field.
    pub fn enumeration(
        self,
        name: impl Into<String>,
        values: &[&str],
        description: impl Into<String>,
    ) -> Self {
        let values = values.iter().map(|v| v.to_string()).collect();
        self.field(name, description, FieldKind::Enum { values })
    }

    /// Append an array-of-objects field.
    pub fn array(
        self,
        name: impl Into<String>,
        items: OutputSchema,
        description: impl Into<String>,
    ) -> Self {
        self.field(name, description, FieldKind::Array { items })
    }

    fn field(mut self, name: impl Into<String>, description: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(Field {
            name: name.into(),
            description: description.into(),
            kind,
        });
        self
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Render as a strict JSON Schema object.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let mut property = match &field.kind {
                FieldKind::String => json!({ "type": "string" }),
                FieldKind::Enum { values } => json!({ "type": "string", "enum": values }),
                FieldKind::Array { items } => json!({
                    "type": "array",
                    "items": items.to_json_schema(),
                }),
            };
            if let Value::Object(ref mut map) = property {
                map.insert("description".to_string(), Value::String(field.description.clone()));
            }
            properties.insert(field.name.clone(), property);
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": self.field_names(),
            "additionalProperties": false,
        })
    }

    /// Check `value` against the compiled [`to_json_schema`](Self::to_json_schema)
    /// document. Every violation is reported, joined by `; `.
    pub fn validate(&self, value: &Value) -> Result<()> {
        let schema = self.to_json_schema();
        let compiled = JSONSchema::compile(&schema).map_err(|e| {
            LlmError::ConfigError(format!("Invalid output schema '{}': {}", self.name, e))
        })?;

        let messages = match compiled.validate(value) {
            Ok(()) => None,
            Err(errors) => Some(
                errors
                    .map(|e| {
                        let location = e.instance_path.to_string();
                        if location.is_empty() {
                            e.to_string()
                        } else {
                            format!("{}: {}", location, e)
                        }
                    })
                    .collect::<Vec<String>>(),
            ),
        };

        match messages {
            Some(messages) => Err(LlmError::SchemaViolation(messages.join("; "))),
            None => Ok(()),
        }
    }
}
