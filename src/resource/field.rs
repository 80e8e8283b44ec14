//! Declarative field descriptors.
//!
//! A [`Field`] ties a schema attribute name to its wire name in the
//! configuration API, its value kind and whether configuration must supply
//! it. Every conversion between plan, state and wire form is driven by these
//! descriptors.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::schema::{Attribute, AttributeFlags, AttributeType};

/// The value kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `true`/`false`.
    Bool,
    /// A signed integer.
    Int64,
    /// Free-form text.
    String,
    /// Text restricted to the listed values.
    Enum(&'static [&'static str]),
    /// An unordered set of strings.
    StringSet,
    /// An unordered set of strings restricted to the listed values.
    EnumSet(&'static [&'static str]),
}

impl FieldKind {
    /// Whether values of this kind are sets.
    pub fn is_set(self) -> bool {
        matches!(self, Self::StringSet | Self::EnumSet(_))
    }

    /// The accepted values, empty when unrestricted.
    pub fn allowed_values(self) -> &'static [&'static str] {
        match self {
            Self::Enum(values) | Self::EnumSet(values) => values,
            _ => &[],
        }
    }

    fn attribute_type(self) -> AttributeType {
        match self {
            Self::Bool => AttributeType::Bool,
            Self::Int64 => AttributeType::Int64,
            Self::String | Self::Enum(_) => AttributeType::String,
            Self::StringSet | Self::EnumSet(_) => AttributeType::set(AttributeType::String),
        }
    }
}

/// Whether configuration has to supply a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be configured.
    Required,
    /// May be configured; leaving it out clears the value on the server.
    Optional,
    /// May be configured; leaving it out keeps whatever the server has.
    OptionalComputed,
}

impl Presence {
    fn flags(self) -> AttributeFlags {
        match self {
            Self::Required => AttributeFlags::required(),
            Self::Optional => AttributeFlags::optional(),
            Self::OptionalComputed => AttributeFlags::optional_computed(),
        }
    }
}

/// A defined field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int64(i64),
    /// String or enum value, never empty.
    String(String),
    /// Set value, possibly empty.
    Set(BTreeSet<String>),
}

impl FieldValue {
    /// Build a set value.
    pub fn set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Set(values.into_iter().map(Into::into).collect())
    }

    /// Render the value as JSON; sets become sorted arrays.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Int64(i) => Value::from(*i),
            Self::String(s) => Value::from(s.as_str()),
            Self::Set(values) => Value::from(values.iter().cloned().collect::<Vec<_>>()),
        }
    }

    /// The value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as an integer, if it is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// The value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a set, if it is one.
    pub fn as_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Set(values) => Some(values),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Describes one configuration attribute of a log publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Attribute name in the resource schema.
    pub name: &'static str,
    /// Property name in the configuration API.
    pub wire: &'static str,
    /// Value kind.
    pub kind: FieldKind,
    /// Whether configuration must supply the field.
    pub presence: Presence,
    /// Attribute description.
    pub description: &'static str,
}

impl Field {
    const fn new(
        name: &'static str,
        wire: &'static str,
        kind: FieldKind,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            wire,
            kind,
            presence: Presence::OptionalComputed,
            description,
        }
    }

    /// A boolean field.
    pub const fn bool(name: &'static str, wire: &'static str, description: &'static str) -> Self {
        Self::new(name, wire, FieldKind::Bool, description)
    }

    /// An integer field.
    pub const fn int64(name: &'static str, wire: &'static str, description: &'static str) -> Self {
        Self::new(name, wire, FieldKind::Int64, description)
    }

    /// A string field.
    pub const fn string(name: &'static str, wire: &'static str, description: &'static str) -> Self {
        Self::new(name, wire, FieldKind::String, description)
    }

    /// A string field restricted to `values`.
    pub const fn enumeration(
        name: &'static str,
        wire: &'static str,
        values: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self::new(name, wire, FieldKind::Enum(values), description)
    }

    /// A set-of-strings field.
    pub const fn string_set(
        name: &'static str,
        wire: &'static str,
        description: &'static str,
    ) -> Self {
        Self::new(name, wire, FieldKind::StringSet, description)
    }

    /// A set field whose elements are restricted to `values`.
    pub const fn enum_set(
        name: &'static str,
        wire: &'static str,
        values: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self::new(name, wire, FieldKind::EnumSet(values), description)
    }

    /// Make the field required.
    pub const fn required(self) -> Self {
        Self {
            presence: Presence::Required,
            ..self
        }
    }

    /// Make the field optional without a server-supplied value.
    pub const fn optional(self) -> Self {
        Self {
            presence: Presence::Optional,
            ..self
        }
    }

    /// The schema attribute for this field with the given presence.
    pub fn attribute(&self, presence: Presence) -> Attribute {
        let mut attribute =
            Attribute::new(self.kind.attribute_type(), presence.flags()).with_description(self.description);
        let allowed = self.kind.allowed_values();
        if !allowed.is_empty() {
            attribute = attribute.with_allowed_values(allowed.iter().copied());
        }
        attribute
    }

    /// Decode a plan, state or response value.
    ///
    /// `None`, JSON null and empty strings decode to `None`. Errors describe
    /// the type mismatch.
    pub fn decode(&self, value: Option<&Value>) -> Result<Option<FieldValue>, String> {
        let value = match value {
            None | Some(Value::Null) => return Ok(None),
            Some(v) => v,
        };
        let decoded = match self.kind {
            FieldKind::Bool => value.as_bool().map(FieldValue::Bool),
            FieldKind::Int64 => value.as_i64().map(FieldValue::Int64),
            FieldKind::String | FieldKind::Enum(_) => match value.as_str() {
                Some("") => return Ok(None),
                Some(s) => Some(FieldValue::String(s.to_string())),
                None => None,
            },
            FieldKind::StringSet | FieldKind::EnumSet(_) => value.as_array().and_then(|items| {
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<BTreeSet<_>>>()
                    .map(FieldValue::Set)
            }),
        };
        decoded.map(Some).ok_or_else(|| {
            format!(
                "attribute '{}' expected {}, got {}",
                self.name,
                self.expected(),
                value
            )
        })
    }

    /// Check a defined value against the field's accepted values.
    pub fn check_allowed(&self, value: &FieldValue) -> Result<(), String> {
        let allowed = self.kind.allowed_values();
        if allowed.is_empty() {
            return Ok(());
        }
        let offending = match value {
            FieldValue::String(s) => (!allowed.contains(&s.as_str())).then(|| s.clone()),
            FieldValue::Set(values) => values
                .iter()
                .find(|v| !allowed.contains(&v.as_str()))
                .cloned(),
            _ => None,
        };
        match offending {
            None => Ok(()),
            Some(bad) => Err(format!(
                "invalid value '{}' for attribute '{}', expected one of: {}",
                bad,
                self.name,
                allowed.join(", ")
            )),
        }
    }

    fn expected(&self) -> &'static str {
        match self.kind {
            FieldKind::Bool => "bool",
            FieldKind::Int64 => "int64",
            FieldKind::String | FieldKind::Enum(_) => "string",
            FieldKind::StringSet | FieldKind::EnumSet(_) => "set of strings",
        }
    }
}
