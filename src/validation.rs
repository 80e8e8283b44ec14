//! Schema validation helpers.
//!
//! This module validates a `serde_json::Value` against a [`Schema`] so that
//! resource configuration is rejected with precise diagnostics before any
//! request reaches the server.
//!
//! # Example
//!
//! ```
//! use pingdirectory_provider::schema::{Schema, Attribute};
//! use pingdirectory_provider::validation::validate;
//! use serde_json::json;
//!
//! let schema = Schema::v0()
//!     .with_attribute("id", Attribute::required_string())
//!     .with_attribute(
//!         "output_location",
//!         Attribute::optional_string().with_allowed_values(["standard-output", "standard-error"]),
//!     );
//!
//! // Valid input
//! let diagnostics = validate(&schema, &json!({"id": "Console", "output_location": "standard-error"}));
//! assert!(diagnostics.is_empty());
//!
//! // Invalid input - value outside the accepted set
//! let diagnostics = validate(&schema, &json!({"id": "Console", "output_location": "stderr"}));
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].attribute, Some("output_location".to_string()));
//! ```

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::schema::{Attribute, AttributeType, Block, Diagnostic, Schema};

/// Validate a JSON value against a schema.
///
/// Returns a list of diagnostics for any validation errors found.
/// An empty list means the value is valid.
///
/// # Validation Rules
///
/// - The value must be an object; a null value is treated as empty
/// - Attributes not declared in the schema are rejected
/// - Required attributes must be present and non-null
/// - Computed-only attributes are skipped (the provider sets these)
/// - Attribute types must match the schema
/// - Enumerated strings, and the elements of enumerated sets, must be accepted values
/// - Set elements must be unique
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_block(&schema.block, value, &mut diagnostics);
    diagnostics
}

/// Validate a JSON value against a schema, returning Ok if valid or Err with diagnostics.
///
/// This is a convenience wrapper around [`validate`] that returns a Result.
pub fn validate_result(schema: &Schema, value: &Value) -> Result<(), Vec<Diagnostic>> {
    let diagnostics = validate(schema, value);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}

/// Check if a JSON value is valid against a schema.
///
/// Use [`validate`] to get detailed error information.
pub fn is_valid(schema: &Schema, value: &Value) -> bool {
    validate(schema, value).is_empty()
}

fn validate_block(block: &Block, value: &Value, diagnostics: &mut Vec<Diagnostic>) {
    let empty = serde_json::Map::new();
    let obj = match value {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => {
            diagnostics.push(
                Diagnostic::error("Expected object")
                    .with_detail(format!("Got {}", value_type_name(value))),
            );
            return;
        },
    };

    let mut unsupported: Vec<&String> = obj
        .keys()
        .filter(|name| !block.attributes.contains_key(name.as_str()))
        .collect();
    unsupported.sort();
    for name in unsupported {
        diagnostics.push(
            Diagnostic::error(format!("Unsupported attribute '{}'", name))
                .with_detail("This attribute is not part of the schema")
                .with_attribute(name.as_str()),
        );
    }

    let mut names: Vec<&String> = block.attributes.keys().collect();
    names.sort();
    for name in names {
        let attr = &block.attributes[name];
        validate_attribute(attr, obj.get(name), name, diagnostics);
    }
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    // Computed-only attributes are set by the provider
    if attr.flags.computed && !attr.flags.optional && !attr.flags.required {
        return;
    }

    // Null means unset, and so does the empty string for string attributes
    let blank = |v: &&Value| attr.attr_type == AttributeType::String && v.as_str() == Some("");
    let value = value.filter(|v| !v.is_null() && !blank(v));
    match value {
        None => {
            if attr.flags.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required attribute '{}'", path))
                        .with_detail("This attribute is required and must be provided")
                        .with_attribute(path),
                );
            }
        },
        Some(v) => {
            let before = diagnostics.len();
            validate_attribute_type(&attr.attr_type, v, path, diagnostics);
            if diagnostics.len() == before && !attr.allowed_values.is_empty() {
                validate_allowed_values(&attr.allowed_values, v, path, diagnostics);
            }
        },
    }
}

fn validate_attribute_type(
    attr_type: &AttributeType,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match attr_type {
        AttributeType::String => {
            if !value.is_string() {
                diagnostics.push(type_error(path, "string", value));
            }
        },
        AttributeType::Int64 => {
            if !is_int64(value) {
                diagnostics.push(type_error(path, "int64", value));
            }
        },
        AttributeType::Bool => {
            if !value.is_boolean() {
                diagnostics.push(type_error(path, "bool", value));
            }
        },
        AttributeType::List(element_type) => {
            if let Some(arr) = value.as_array() {
                for (i, elem) in arr.iter().enumerate() {
                    let elem_path = format!("{}.{}", path, i);
                    validate_attribute_type(element_type, elem, &elem_path, diagnostics);
                }
            } else {
                diagnostics.push(type_error(path, "list", value));
            }
        },
        AttributeType::Set(element_type) => {
            // Sets are represented as arrays in JSON
            if let Some(arr) = value.as_array() {
                for (i, elem) in arr.iter().enumerate() {
                    let elem_path = format!("{}.{}", path, i);
                    validate_attribute_type(element_type, elem, &elem_path, diagnostics);
                }
                let mut seen = HashSet::new();
                if let Some(dup) = arr.iter().find(|elem| !seen.insert(elem.to_string())) {
                    diagnostics.push(
                        Diagnostic::error(format!("Duplicate set element in attribute '{}'", path))
                            .with_detail(format!("{} appears more than once", dup))
                            .with_attribute(path),
                    );
                }
            } else {
                diagnostics.push(type_error(path, "set", value));
            }
        },
        AttributeType::Object(attrs) => {
            if let Some(obj) = value.as_object() {
                validate_object_type(attrs, obj, path, diagnostics);
            } else {
                diagnostics.push(type_error(path, "object", value));
            }
        },
    }
}

fn validate_object_type(
    attrs: &HashMap<String, AttributeType>,
    obj: &serde_json::Map<String, Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for (name, attr_type) in attrs {
        let attr_path = format!("{}.{}", path, name);
        // Object members carry no presence flags, so only types are checked
        if let Some(value) = obj.get(name).filter(|v| !v.is_null()) {
            validate_attribute_type(attr_type, value, &attr_path, diagnostics);
        }
    }
}

fn validate_allowed_values(
    allowed: &[String],
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let values: Vec<&str> = match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => return,
    };
    for v in values {
        if !allowed.iter().any(|a| a == v) {
            diagnostics.push(
                Diagnostic::error(format!("Invalid value for attribute '{}'", path))
                    .with_detail(format!(
                        "'{}' is not one of: {}",
                        v,
                        allowed.join(", ")
                    ))
                    .with_attribute(path),
            );
        }
    }
}

// Helper functions

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_int64(value: &Value) -> bool {
    value.as_i64().is_some()
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    Diagnostic::error(format!("Invalid type for attribute '{}'", path))
        .with_detail(format!("Expected {}, got {}", expected, value_type_name(got)))
        .with_attribute(path)
}
