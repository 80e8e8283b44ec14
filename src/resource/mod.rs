//! Generic log publisher resource.
//!
//! Every log publisher type is served by a [`ResourceAdapter`]: a kind from
//! the [`catalog`] plus a [`Lifecycle`]. The adapter derives the schema, the
//! add request, the response decoding and the update operations from the
//! kind's field table, and runs the create/read/update/delete/import
//! sequences against a [`LogPublisherApi`].

pub mod catalog;
pub mod field;
pub mod model;

use std::collections::{BTreeSet, HashMap};

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::client::LogPublisherApi;
use crate::error::{ApiAction, ProviderError};
use crate::operations::{
    add_bool_operation_if_necessary, add_int64_operation_if_necessary,
    add_string_operation_if_necessary, add_string_set_operations_if_necessary, Operation,
    UpdateRequest,
};
use crate::schema::{Attribute, AttributeFlags, AttributeType, Schema};
use crate::types::{AttributeChange, PlanResult};

use catalog::{LogPublisherKind, DEFAULT_INFIX, TYPE_PREFIX};
use field::{Field, FieldKind, FieldValue, Presence};
use model::{Model, RequiredAction, LAST_UPDATED, NOTIFICATIONS, REQUIRED_ACTIONS};

/// Schema URN of the messages extension carried by API responses.
pub const MESSAGES_URN: &str = "urn:pingidentity:schemas:configuration:messages:2.0";

/// How the provider owns the server object behind a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created on apply and deleted on destroy.
    Managed,
    /// Ships with the server. Create adopts and edits it; delete only forgets it.
    EditOnly,
}

/// Serves one resource type.
#[derive(Debug, Clone, Copy)]
pub struct ResourceAdapter {
    kind: &'static LogPublisherKind,
    lifecycle: Lifecycle,
}

impl ResourceAdapter {
    /// Adapter for `kind` with the given lifecycle.
    pub fn new(kind: &'static LogPublisherKind, lifecycle: Lifecycle) -> Self {
        Self { kind, lifecycle }
    }

    /// The log publisher kind.
    pub fn kind(&self) -> &'static LogPublisherKind {
        self.kind
    }

    /// The lifecycle.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The resource type name, e.g. `pingdirectory_default_file_based_access_log_publisher`.
    pub fn type_name(&self) -> String {
        match self.lifecycle {
            Lifecycle::Managed => format!("{}{}", TYPE_PREFIX, self.kind.name),
            Lifecycle::EditOnly => format!("{}{}{}", TYPE_PREFIX, DEFAULT_INFIX, self.kind.name),
        }
    }

    fn display_name(&self) -> &'static str {
        self.kind.display_name
    }

    fn fields(&self) -> impl Iterator<Item = &'static Field> + Clone {
        self.kind.fields()
    }

    /// Presence of `field` for this lifecycle. Edit-only types never require
    /// a value, since the object already exists.
    pub fn presence(&self, field: &Field) -> Presence {
        match self.lifecycle {
            Lifecycle::Managed => field.presence,
            Lifecycle::EditOnly => Presence::OptionalComputed,
        }
    }

    // =========================================================================
    // Schema
    // =========================================================================

    /// The resource schema.
    pub fn schema(&self) -> Schema {
        let description = match self.lifecycle {
            Lifecycle::Managed => format!("Manages a {}.", self.display_name()),
            Lifecycle::EditOnly => format!(
                "Manages a {} that already exists on the server. Destroying the resource only removes it from state.",
                self.display_name()
            ),
        };

        let mut schema = Schema::v0().with_description(description).with_attribute(
            model::ID,
            Attribute::required_string()
                .with_description("Name of this config object.")
                .with_force_new(),
        );
        for field in self.fields() {
            schema = schema.with_attribute(field.name, field.attribute(self.presence(field)));
        }

        let required_action = AttributeType::object(HashMap::from([
            ("property".to_string(), AttributeType::String),
            ("type".to_string(), AttributeType::String),
            ("synopsis".to_string(), AttributeType::String),
        ]));
        schema
            .with_attribute(
                LAST_UPDATED,
                Attribute::computed_string()
                    .with_description("Timestamp of the last create or update by this provider."),
            )
            .with_attribute(
                NOTIFICATIONS,
                Attribute::new(AttributeType::set(AttributeType::String), AttributeFlags::computed())
                    .with_description("Notifications returned by the configuration API."),
            )
            .with_attribute(
                REQUIRED_ACTIONS,
                Attribute::new(AttributeType::list(required_action), AttributeFlags::computed())
                    .with_description("Required actions returned by the configuration API."),
            )
    }

    // =========================================================================
    // State codec
    // =========================================================================

    /// Decode a plan or state document.
    pub fn decode_state(&self, value: &Value) -> Result<Model, ProviderError> {
        Model::from_state(self.fields(), value)
    }

    /// Encode a model as a state document.
    pub fn encode_state(&self, model: &Model) -> Value {
        model.to_state(self.fields())
    }

    /// Reject enum values outside the accepted set.
    pub fn validate_model(&self, model: &Model) -> Result<(), ProviderError> {
        for field in self.fields() {
            if let Some(value) = model.get(field.name) {
                field.check_allowed(value).map_err(ProviderError::Validation)?;
            }
        }
        Ok(())
    }

    /// Copy every server-computed field the plan leaves undefined from `source`.
    pub fn resolve_unknowns(&self, plan: &mut Model, source: &Model) {
        let names = self
            .fields()
            .filter(|f| self.presence(f) == Presence::OptionalComputed)
            .map(|f| f.name);
        plan.fill_unknown_from(source, names);
    }

    // =========================================================================
    // Wire encoding
    // =========================================================================

    /// Build the body of the add request for `plan`.
    pub fn build_add_request(&self, plan: &Model) -> Result<Value, ProviderError> {
        self.validate_model(plan)?;

        let mut body = Map::new();
        body.insert("schemas".to_string(), Value::from(vec![self.kind.urn()]));
        body.insert(model::ID.to_string(), Value::from(plan.id.as_str()));
        for field in self.fields().filter(|f| self.presence(f) == Presence::Required) {
            let value = plan.get(field.name).ok_or_else(|| {
                ProviderError::Validation(format!(
                    "missing required attribute '{}'",
                    field.name
                ))
            })?;
            body.insert(field.wire.to_string(), value.to_json());
        }
        self.add_optional_fields(plan, &mut body);

        Ok(Value::Object(body))
    }

    /// Add every defined non-required field of `plan` to an add request.
    fn add_optional_fields(&self, plan: &Model, body: &mut Map<String, Value>) {
        for field in self.fields().filter(|f| self.presence(f) != Presence::Required) {
            if let Some(value) = plan.get(field.name) {
                body.insert(field.wire.to_string(), value.to_json());
            }
        }
    }

    /// Copy an API response into `state`.
    ///
    /// Every field is overwritten: properties missing from the response become
    /// undefined, or the empty set for multi-valued properties.
    pub fn read_response(&self, response: &Value, state: &mut Model) -> Result<(), ProviderError> {
        let object = response.as_object().ok_or_else(|| {
            ProviderError::InvalidResponse(format!(
                "expected a {} object, got {}",
                self.display_name(),
                response
            ))
        })?;

        if let Some(schemas) = object.get("schemas") {
            let urn = self.kind.urn();
            let matches = schemas
                .as_array()
                .is_some_and(|s| s.iter().any(|v| v.as_str() == Some(urn.as_str())));
            if !matches {
                return Err(ProviderError::InvalidResponse(format!(
                    "expected an object with schema {}, got {}",
                    urn, schemas
                )));
            }
        }

        if let Some(Value::String(id)) = object.get(model::ID) {
            state.id = id.clone();
        }
        for field in self.fields() {
            let value = field
                .decode(object.get(field.wire))
                .map_err(ProviderError::InvalidResponse)?;
            let value = match value {
                None if field.kind.is_set() => Some(FieldValue::Set(BTreeSet::new())),
                value => value,
            };
            state.set(field.name, value);
        }

        let messages = object.get(MESSAGES_URN);
        state.notifications = messages
            .and_then(|m| m.get("notifications"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        state.required_actions = match messages.and_then(|m| m.get("requiredActions")) {
            None | Some(Value::Null) => Vec::new(),
            Some(actions) => serde_json::from_value::<Vec<RequiredAction>>(actions.clone())
                .map_err(|e| ProviderError::InvalidResponse(format!("requiredActions: {}", e)))?,
        };

        Ok(())
    }

    /// Operations turning `state` into `plan`, in field table order.
    pub fn create_operations(
        &self,
        plan: &Model,
        state: &Model,
    ) -> Result<Vec<Operation>, ProviderError> {
        self.validate_model(plan)?;

        let mut ops = Vec::new();
        for field in self.fields() {
            let planned = plan.get(field.name);
            let current = state.get(field.name);
            match field.kind {
                FieldKind::Bool => add_bool_operation_if_necessary(
                    &mut ops,
                    planned.and_then(FieldValue::as_bool),
                    current.and_then(FieldValue::as_bool),
                    field.wire,
                ),
                FieldKind::Int64 => add_int64_operation_if_necessary(
                    &mut ops,
                    planned.and_then(FieldValue::as_i64),
                    current.and_then(FieldValue::as_i64),
                    field.wire,
                ),
                FieldKind::String | FieldKind::Enum(_) => add_string_operation_if_necessary(
                    &mut ops,
                    planned.and_then(FieldValue::as_str),
                    current.and_then(FieldValue::as_str),
                    field.wire,
                ),
                FieldKind::StringSet | FieldKind::EnumSet(_) => {
                    add_string_set_operations_if_necessary(
                        &mut ops,
                        planned.and_then(FieldValue::as_set),
                        current.and_then(FieldValue::as_set),
                        field.wire,
                    )
                },
            }
        }
        Ok(ops)
    }

    // =========================================================================
    // Plan
    // =========================================================================

    /// Compute the planned state and attribute changes.
    ///
    /// Computed attributes and server-computed fields left out of the
    /// configuration keep their prior values. A changed `id` requires
    /// replacement. A null proposal plans destruction.
    pub fn plan(
        &self,
        prior_state: Option<&Value>,
        proposed_state: &Value,
    ) -> Result<PlanResult, ProviderError> {
        let prior = prior_state
            .filter(|v| !v.is_null())
            .map(|v| self.decode_state(v))
            .transpose()?;
        let prior_json = prior
            .as_ref()
            .map_or(Value::Null, |p| self.encode_state(p));

        if proposed_state.is_null() {
            let changes = attribute_changes(&prior_json, &Value::Null);
            return Ok(PlanResult::with_changes(Value::Null, changes, false));
        }

        let mut planned = self.decode_state(proposed_state)?;
        self.validate_model(&planned)?;

        let mut requires_replace = false;
        if let Some(prior) = &prior {
            if prior.id == planned.id {
                self.resolve_unknowns(&mut planned, prior);
                planned.copy_computed_from(prior);
            } else {
                requires_replace = true;
            }
        }

        let planned_json = self.encode_state(&planned);
        let changes = attribute_changes(&prior_json, &planned_json);
        Ok(PlanResult::with_changes(planned_json, changes, requires_replace))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create the object, or adopt and edit it for edit-only types.
    #[instrument(skip_all, fields(resource_type = %self.type_name(), id = %plan.id))]
    pub async fn create(
        &self,
        api: &dyn LogPublisherApi,
        plan: Model,
    ) -> Result<Model, ProviderError> {
        self.validate_model(&plan)?;
        let mut state = match self.lifecycle {
            Lifecycle::Managed => self.create_managed(api, plan).await?,
            Lifecycle::EditOnly => self.adopt_existing(api, plan).await?,
        };
        state.last_updated = Some(last_updated_now());
        info!("Created {}", self.display_name());
        Ok(state)
    }

    async fn create_managed(
        &self,
        api: &dyn LogPublisherApi,
        plan: Model,
    ) -> Result<Model, ProviderError> {
        let request = self.build_add_request(&plan)?;
        let response = api
            .add_log_publisher(&request)
            .await
            .map_err(|e| ProviderError::api(ApiAction::Create, self.display_name(), e))?;

        let mut state = Model::new(plan.id);
        self.read_response(&response, &mut state)?;
        Ok(state)
    }

    async fn adopt_existing(
        &self,
        api: &dyn LogPublisherApi,
        mut plan: Model,
    ) -> Result<Model, ProviderError> {
        let response = api
            .get_log_publisher(&plan.id)
            .await
            .map_err(|e| ProviderError::api(ApiAction::Get, self.display_name(), e))?;
        let mut state = Model::new(plan.id.clone());
        self.read_response(&response, &mut state)?;

        self.resolve_unknowns(&mut plan, &state);
        let ops = self.create_operations(&plan, &state)?;
        if ops.is_empty() {
            debug!("Existing object already matches the plan");
            return Ok(state);
        }

        let response = api
            .update_log_publisher(&state.id, &UpdateRequest::new(ops))
            .await
            .map_err(|e| ProviderError::api(ApiAction::Update, self.display_name(), e))?;
        self.read_response(&response, &mut state)?;
        Ok(state)
    }

    /// Refresh `state` from the server. Returns `None` when the object is gone.
    #[instrument(skip_all, fields(resource_type = %self.type_name(), id = %state.id))]
    pub async fn read(
        &self,
        api: &dyn LogPublisherApi,
        state: Model,
    ) -> Result<Option<Model>, ProviderError> {
        let response = match api.get_log_publisher(&state.id).await {
            Ok(response) => response,
            Err(e) if e.status() == Some(404) => {
                warn!(
                    "{} not found, removing from state",
                    self.display_name()
                );
                return Ok(None);
            },
            Err(e) => return Err(ProviderError::api(ApiAction::Get, self.display_name(), e)),
        };

        let mut state = state;
        self.read_response(&response, &mut state)?;
        debug!("Read {}", self.display_name());
        Ok(Some(state))
    }

    /// Apply the differences between `prior` and `plan`.
    #[instrument(skip_all, fields(resource_type = %self.type_name(), id = %prior.id))]
    pub async fn update(
        &self,
        api: &dyn LogPublisherApi,
        prior: Model,
        mut plan: Model,
    ) -> Result<Model, ProviderError> {
        self.validate_model(&plan)?;
        self.resolve_unknowns(&mut plan, &prior);

        let ops = self.create_operations(&plan, &prior)?;
        if ops.is_empty() {
            warn!("No configuration API operations created for update");
            plan.copy_computed_from(&prior);
            return Ok(plan);
        }

        let response = api
            .update_log_publisher(&prior.id, &UpdateRequest::new(ops))
            .await
            .map_err(|e| ProviderError::api(ApiAction::Update, self.display_name(), e))?;
        let mut state = plan;
        self.read_response(&response, &mut state)?;
        state.last_updated = Some(last_updated_now());
        info!("Updated {}", self.display_name());
        Ok(state)
    }

    /// Delete the object. Edit-only types leave the server untouched.
    #[instrument(skip_all, fields(resource_type = %self.type_name(), id = %state.id))]
    pub async fn delete(
        &self,
        api: &dyn LogPublisherApi,
        state: &Model,
    ) -> Result<(), ProviderError> {
        match self.lifecycle {
            Lifecycle::EditOnly => {
                debug!("{} cannot be deleted, removing from state only", self.display_name());
            },
            Lifecycle::Managed => {
                api.delete_log_publisher(&state.id)
                    .await
                    .map_err(|e| ProviderError::api(ApiAction::Delete, self.display_name(), e))?;
                info!("Deleted {}", self.display_name());
            },
        }
        Ok(())
    }

    /// Import the object named `id`.
    pub async fn import(
        &self,
        api: &dyn LogPublisherApi,
        id: &str,
    ) -> Result<Model, ProviderError> {
        self.read(api, Model::new(id))
            .await?
            .ok_or_else(|| ProviderError::NotFound(format!("{} '{}'", self.display_name(), id)))
    }
}

/// Timestamp for `last_updated`, in RFC 850 form.
fn last_updated_now() -> String {
    chrono::Utc::now()
        .format("%A, %d-%b-%y %H:%M:%S UTC")
        .to_string()
}

fn attribute_changes(before: &Value, after: &Value) -> Vec<AttributeChange> {
    let empty = Map::new();
    let before = before.as_object().unwrap_or(&empty);
    let after = after.as_object().unwrap_or(&empty);

    let mut keys: BTreeSet<&String> = before.keys().collect();
    keys.extend(after.keys());

    keys.into_iter()
        .filter_map(|key| {
            let old = before.get(key).filter(|v| !v.is_null());
            let new = after.get(key).filter(|v| !v.is_null());
            match (old, new) {
                (None, Some(new)) => Some(AttributeChange::added(key.as_str(), new.clone())),
                (Some(old), None) => Some(AttributeChange::removed(key.as_str(), old.clone())),
                (Some(old), Some(new)) if old != new => Some(AttributeChange::modified(
                    key.as_str(),
                    old.clone(),
                    new.clone(),
                )),
                _ => None,
            }
        })
        .collect()
}
