//! Resource model shared by every log publisher type.
//!
//! A [`Model`] is the provider-side view of one log publisher: its id, the
//! value of each configured field and the bookkeeping attributes the provider
//! computes itself. It converts to and from the JSON state document the host
//! stores.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::field::{Field, FieldValue};
use crate::error::ProviderError;

/// State attribute holding the object id.
pub const ID: &str = "id";
/// State attribute holding the time of the last create or update.
pub const LAST_UPDATED: &str = "last_updated";
/// State attribute holding server notifications.
pub const NOTIFICATIONS: &str = "notifications";
/// State attribute holding actions the server says are required.
pub const REQUIRED_ACTIONS: &str = "required_actions";

/// An action the server requires before a change takes effect.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequiredAction {
    /// The property that triggered the action, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    /// The kind of action, e.g. `component-restart`.
    #[serde(rename = "type")]
    pub action_type: String,
    /// Short explanation from the server.
    #[serde(default)]
    pub synopsis: String,
}

/// One log publisher as the provider sees it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Model {
    /// Name of the object on the server.
    pub id: String,
    /// Defined field values keyed by attribute name; absent means not set.
    pub values: BTreeMap<&'static str, FieldValue>,
    /// When the provider last created or updated the object.
    pub last_updated: Option<String>,
    /// Notifications from the last response.
    pub notifications: BTreeSet<String>,
    /// Required actions from the last response.
    pub required_actions: Vec<RequiredAction>,
}

impl Model {
    /// An empty model for the object `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder form of [`Model::set`].
    pub fn with(mut self, name: &'static str, value: impl Into<FieldValue>) -> Self {
        self.set(name, Some(value.into()));
        self
    }

    /// The value of a field, if defined.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Define or clear a field.
    pub fn set(&mut self, name: &'static str, value: Option<FieldValue>) {
        match value {
            Some(value) => {
                self.values.insert(name, value);
            },
            None => {
                self.values.remove(name);
            },
        }
    }

    /// Decode a plan or state document.
    ///
    /// Fields not listed in `fields` are ignored. A value of the wrong type
    /// is an [`ProviderError::InvalidRequest`].
    pub fn from_state<'a, I>(fields: I, state: &Value) -> Result<Self, ProviderError>
    where
        I: IntoIterator<Item = &'a Field>,
    {
        let object = state
            .as_object()
            .ok_or_else(|| ProviderError::InvalidRequest(format!("expected an object, got {}", state)))?;

        let id = match object.get(ID) {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            _ => return Err(ProviderError::InvalidRequest("'id' must be a non-empty string".to_string())),
        };
        let mut model = Self::new(id);

        for field in fields {
            let value = field
                .decode(object.get(field.name))
                .map_err(ProviderError::InvalidRequest)?;
            model.set(field.name, value);
        }

        model.last_updated = match object.get(LAST_UPDATED) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(ProviderError::InvalidRequest(format!(
                    "'{}' must be a string, got {}",
                    LAST_UPDATED, other
                )))
            },
        };
        model.notifications = decode_optional(object, NOTIFICATIONS)?.unwrap_or_default();
        model.required_actions = decode_optional(object, REQUIRED_ACTIONS)?.unwrap_or_default();

        Ok(model)
    }

    /// Encode as a state document. Undefined fields are written as null.
    pub fn to_state<'a, I>(&self, fields: I) -> Value
    where
        I: IntoIterator<Item = &'a Field>,
    {
        let mut object = Map::new();
        object.insert(ID.to_string(), Value::from(self.id.as_str()));
        for field in fields {
            let value = self.get(field.name).map_or(Value::Null, FieldValue::to_json);
            object.insert(field.name.to_string(), value);
        }
        object.insert(
            LAST_UPDATED.to_string(),
            self.last_updated.as_deref().map_or(Value::Null, Value::from),
        );
        object.insert(
            NOTIFICATIONS.to_string(),
            Value::from(self.notifications.iter().cloned().collect::<Vec<_>>()),
        );
        object.insert(
            REQUIRED_ACTIONS.to_string(),
            serde_json::to_value(&self.required_actions).unwrap_or(Value::Array(Vec::new())),
        );
        Value::Object(object)
    }

    /// Copy every field named in `names` that is undefined here from `other`.
    pub fn fill_unknown_from<I>(&mut self, other: &Model, names: I)
    where
        I: IntoIterator<Item = &'static str>,
    {
        for name in names {
            if self.values.contains_key(name) {
                continue;
            }
            if let Some(value) = other.get(name) {
                self.values.insert(name, value.clone());
            }
        }
    }

    /// Carry the provider-computed attributes over from `other`.
    pub fn copy_computed_from(&mut self, other: &Model) {
        self.last_updated = other.last_updated.clone();
        self.notifications = other.notifications.clone();
        self.required_actions = other.required_actions.clone();
    }
}

fn decode_optional<T>(object: &Map<String, Value>, key: &str) -> Result<Option<T>, ProviderError>
where
    T: serde::de::DeserializeOwned,
{
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| ProviderError::InvalidRequest(format!("'{}': {}", key, e))),
    }
}
