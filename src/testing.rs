//! Testing utilities for the provider.
//!
//! [`ProviderTester`] drives a [`ProviderService`] the way a host would,
//! without a transport. [`InMemoryConfigApi`] stands in for the server: it
//! stores objects by id, applies update operations and records every call.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pingdirectory_provider::provider::LogPublisherProvider;
//! use pingdirectory_provider::testing::{InMemoryConfigApi, ProviderTester};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let api = Arc::new(InMemoryConfigApi::new());
//! let tester = ProviderTester::new(LogPublisherProvider::with_api(api.clone()));
//!
//! let state = tester
//!     .lifecycle_create(
//!         "pingdirectory_console_json_access_log_publisher",
//!         json!({"id": "Console Access", "enabled": true}),
//!     )
//!     .await
//!     .unwrap();
//!
//! assert_eq!(state["enabled"], true);
//! assert!(api.object("Console Access").is_some());
//! # });
//! ```

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{ApiError, LogPublisherApi};
use crate::error::ProviderError;
use crate::operations::{OperationKind, UpdateRequest};
use crate::schema::{Diagnostic, DiagnosticSeverity, ProviderSchema};
use crate::service::ProviderService;
use crate::types::{ImportedResource, PlanResult};

/// A test harness for provider implementations.
///
/// This wraps a `ProviderService` implementation and provides
/// simplified methods for testing without a host.
pub struct ProviderTester<P: ProviderService> {
    provider: P,
}

impl<P: ProviderService> ProviderTester<P> {
    /// Create a new tester for the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Get a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    /// Get the provider's schema.
    pub fn schema(&self) -> ProviderSchema {
        self.provider.schema()
    }

    /// Get the list of resource type names.
    pub fn resource_types(&self) -> Vec<String> {
        self.provider.metadata().resources
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Validate provider configuration.
    ///
    /// Returns `Err` with the error diagnostics if there are any.
    pub async fn validate_provider_config(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.validate_provider_config(config).await?;
        check_diagnostics(diagnostics)
    }

    /// Configure the provider.
    ///
    /// Returns `Err` with the error diagnostics if there are any.
    pub async fn configure(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.configure(config).await?;
        check_diagnostics(diagnostics)
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Validate a resource configuration.
    pub async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<(), TestError> {
        let diagnostics = self
            .provider
            .validate_resource_config(resource_type, config)
            .await?;
        check_diagnostics(diagnostics)
    }

    /// Plan a resource creation (no prior state).
    pub async fn plan_create(
        &self,
        resource_type: &str,
        proposed_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, None, proposed_state.clone(), proposed_state)
            .await
    }

    /// Plan a resource update.
    pub async fn plan_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        proposed_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(
                resource_type,
                Some(prior_state),
                proposed_state.clone(),
                proposed_state,
            )
            .await
    }

    /// Plan a resource deletion.
    pub async fn plan_delete(
        &self,
        resource_type: &str,
        prior_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, Some(prior_state), Value::Null, Value::Null)
            .await
    }

    /// Create a new resource.
    pub async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.create(resource_type, planned_state).await
    }

    /// Read the current state of a resource.
    pub async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.read(resource_type, current_state).await
    }

    /// Update an existing resource.
    pub async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider
            .update(resource_type, prior_state, planned_state)
            .await
    }

    /// Delete a resource.
    pub async fn delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        self.provider.delete(resource_type, current_state).await
    }

    /// Import an existing resource.
    pub async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        self.provider.import_resource(resource_type, id).await
    }

    // =========================================================================
    // Lifecycle Helpers
    // =========================================================================

    /// Run a full create lifecycle: plan → create → read.
    ///
    /// Returns the final state after read.
    pub async fn lifecycle_create(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let plan_result = self.plan_create(resource_type, config).await?;
        let created_state = self
            .create(resource_type, plan_result.planned_state)
            .await?;
        self.read(resource_type, created_state).await
    }

    /// Run a full update lifecycle: plan → update → read.
    ///
    /// Returns the final state after read.
    pub async fn lifecycle_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        proposed_state: Value,
    ) -> Result<Value, ProviderError> {
        let plan_result = self
            .plan_update(resource_type, prior_state.clone(), proposed_state)
            .await?;
        let updated_state = self
            .update(resource_type, prior_state, plan_result.planned_state)
            .await?;
        self.read(resource_type, updated_state).await
    }

    /// Run a full delete lifecycle: plan → delete.
    pub async fn lifecycle_delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        self.plan_delete(resource_type, current_state.clone())
            .await?;
        self.delete(resource_type, current_state).await
    }

    /// Run a full CRUD lifecycle: create → read → update → read → delete.
    ///
    /// Returns the state after the update (before delete).
    pub async fn lifecycle_crud(
        &self,
        resource_type: &str,
        initial_config: Value,
        updated_config: Value,
    ) -> Result<Value, ProviderError> {
        let created_state = self.lifecycle_create(resource_type, initial_config).await?;
        let updated_state = self
            .lifecycle_update(resource_type, created_state, updated_config)
            .await?;
        self.lifecycle_delete(resource_type, updated_state.clone())
            .await?;
        Ok(updated_state)
    }
}

/// Error type for test operations that may fail with diagnostics.
#[derive(Debug)]
pub enum TestError {
    /// The operation failed with diagnostics.
    Diagnostics(Vec<Diagnostic>),
    /// The operation failed with a provider error.
    Provider(ProviderError),
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::Diagnostics(diags) => {
                writeln!(f, "Operation failed with {} diagnostic(s):", diags.len())?;
                for diag in diags {
                    write!(f, "  [{:?}] {}", diag.severity, diag.summary)?;
                    if let Some(detail) = &diag.detail {
                        write!(f, ": {}", detail)?;
                    }
                    if let Some(attr) = &diag.attribute {
                        write!(f, " (at {})", attr)?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            },
            TestError::Provider(e) => write!(f, "Provider error: {}", e),
        }
    }
}

impl std::error::Error for TestError {}

impl From<ProviderError> for TestError {
    fn from(e: ProviderError) -> Self {
        TestError::Provider(e)
    }
}

fn check_diagnostics(diagnostics: Vec<Diagnostic>) -> Result<(), TestError> {
    let errors: Vec<_> = diagnostics.into_iter().filter(Diagnostic::is_error).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(TestError::Diagnostics(errors))
    }
}

// =========================================================================
// In-memory configuration API
// =========================================================================

/// A call received by [`InMemoryConfigApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    /// `GET` of one object.
    Get {
        /// Object id.
        id: String,
    },
    /// `POST` of an add request.
    Add {
        /// Request body.
        request: Value,
    },
    /// `PATCH` of one object.
    Update {
        /// Object id.
        id: String,
        /// Request body.
        request: UpdateRequest,
    },
    /// `DELETE` of one object.
    Delete {
        /// Object id.
        id: String,
    },
}

/// An in-memory stand-in for the configuration API.
///
/// Objects are stored as the JSON the server would return. Unknown ids
/// answer 404, adding an existing id answers 409.
#[derive(Debug, Default)]
pub struct InMemoryConfigApi {
    objects: Mutex<BTreeMap<String, Value>>,
    calls: Mutex<Vec<ApiCall>>,
    next_failure: Mutex<Option<(u16, String)>>,
}

impl InMemoryConfigApi {
    /// An empty server.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object. Its `id` property names it.
    pub fn with_object(self, object: Value) -> Self {
        if let Some(id) = object.get("id").and_then(Value::as_str) {
            lock(&self.objects).insert(id.to_string(), object.clone());
        }
        self
    }

    /// The stored object `id`.
    pub fn object(&self, id: &str) -> Option<Value> {
        lock(&self.objects).get(id).cloned()
    }

    /// Drop the object `id` without recording a call.
    pub fn remove_object(&self, id: &str) -> Option<Value> {
        lock(&self.objects).remove(id)
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<ApiCall> {
        lock(&self.calls).clone()
    }

    /// Answer the next call with `status` and `body`.
    pub fn fail_next(&self, status: u16, body: impl Into<String>) {
        *lock(&self.next_failure) = Some((status, body.into()));
    }

    fn record(&self, call: ApiCall) -> Result<(), ApiError> {
        lock(&self.calls).push(call);
        match lock(&self.next_failure).take() {
            Some((status, body)) => Err(ApiError::Status { status, body }),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn not_found(id: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        body: format!(r#"{{"status":"404","detail":"{} not found"}}"#, id),
    }
}

fn bad_request(detail: impl std::fmt::Display) -> ApiError {
    ApiError::Status {
        status: 400,
        body: format!(r#"{{"status":"400","detail":"{}"}}"#, detail),
    }
}

fn apply_operations(object: &mut Value, request: &UpdateRequest) -> Result<(), ApiError> {
    let fields = object
        .as_object_mut()
        .ok_or_else(|| bad_request("stored object is not a JSON object"))?;

    for op in &request.operations {
        match (op.op, &op.value) {
            (OperationKind::Replace, Some(value)) => {
                fields.insert(op.path.clone(), value.clone());
            },
            (OperationKind::Remove, None) => {
                fields.remove(&op.path);
            },
            (OperationKind::Add, Some(Value::Array(added))) => {
                let entry = fields
                    .entry(op.path.clone())
                    .or_insert_with(|| Value::Array(Vec::new()));
                let values = entry
                    .as_array_mut()
                    .ok_or_else(|| bad_request(format!("{} is not multi-valued", op.path)))?;
                for value in added {
                    if !values.contains(value) {
                        values.push(value.clone());
                    }
                }
            },
            (OperationKind::Remove, Some(Value::Array(removed))) => {
                if let Some(values) = fields.get_mut(&op.path).and_then(Value::as_array_mut) {
                    values.retain(|v| !removed.contains(v));
                }
            },
            _ => return Err(bad_request(format!("malformed {:?} operation on {}", op.op, op.path))),
        }
    }
    Ok(())
}

#[async_trait]
impl LogPublisherApi for InMemoryConfigApi {
    async fn get_log_publisher(&self, id: &str) -> Result<Value, ApiError> {
        self.record(ApiCall::Get { id: id.to_string() })?;
        self.object(id).ok_or_else(|| not_found(id))
    }

    async fn add_log_publisher(&self, request: &Value) -> Result<Value, ApiError> {
        self.record(ApiCall::Add {
            request: request.clone(),
        })?;
        let id = request
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| bad_request("missing id"))?;

        let mut objects = lock(&self.objects);
        if objects.contains_key(id) {
            return Err(ApiError::Status {
                status: 409,
                body: format!(r#"{{"status":"409","detail":"{} already exists"}}"#, id),
            });
        }
        objects.insert(id.to_string(), request.clone());
        Ok(request.clone())
    }

    async fn update_log_publisher(
        &self,
        id: &str,
        request: &UpdateRequest,
    ) -> Result<Value, ApiError> {
        self.record(ApiCall::Update {
            id: id.to_string(),
            request: request.clone(),
        })?;
        let mut objects = lock(&self.objects);
        let object = objects.get_mut(id).ok_or_else(|| not_found(id))?;
        let mut updated = object.clone();
        apply_operations(&mut updated, request)?;
        *object = updated.clone();
        Ok(updated)
    }

    async fn delete_log_publisher(&self, id: &str) -> Result<(), ApiError> {
        self.record(ApiCall::Delete { id: id.to_string() })?;
        lock(&self.objects)
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}

// =========================================================================
// Assertion Helpers
// =========================================================================

/// Assert that a plan result indicates the resource will be created.
///
/// # Panics
///
/// Panics if the plan has no changes or requires replacement.
pub fn assert_plan_creates(plan: &PlanResult) {
    assert!(
        !plan.changes.is_empty(),
        "Expected plan to have changes for create, but got no changes"
    );
    assert!(
        !plan.requires_replace,
        "Expected plan to create, not replace"
    );
}

/// Assert that a plan result indicates no changes.
///
/// # Panics
///
/// Panics if the plan has any changes.
pub fn assert_plan_no_changes(plan: &PlanResult) {
    assert!(
        plan.changes.is_empty(),
        "Expected no changes, but got {} change(s): {:?}",
        plan.changes.len(),
        plan.changes.iter().map(|c| &c.path).collect::<Vec<_>>()
    );
}

/// Assert that a plan requires resource replacement.
///
/// # Panics
///
/// Panics if the plan does not require replacement.
pub fn assert_plan_replaces(plan: &PlanResult) {
    assert!(
        plan.requires_replace,
        "Expected plan to require replacement, but it does not"
    );
}

/// Assert that a plan does not require resource replacement.
///
/// # Panics
///
/// Panics if the plan requires replacement.
pub fn assert_plan_updates_in_place(plan: &PlanResult) {
    assert!(
        !plan.requires_replace,
        "Expected plan to update in place, but it requires replacement"
    );
}

/// Assert that a plan has a change for a specific attribute path.
///
/// # Panics
///
/// Panics if the plan does not have a change for the given path.
pub fn assert_plan_changes_attribute(plan: &PlanResult, path: &str) {
    let has_change = plan.changes.iter().any(|c| c.path == path);
    assert!(
        has_change,
        "Expected plan to change attribute '{}', but it was not changed. Changed attributes: {:?}",
        path,
        plan.changes.iter().map(|c| &c.path).collect::<Vec<_>>()
    );
}

/// Assert that a plan does not have a change for a specific attribute path.
///
/// # Panics
///
/// Panics if the plan has a change for the given path.
pub fn assert_plan_does_not_change_attribute(plan: &PlanResult, path: &str) {
    let has_change = plan.changes.iter().any(|c| c.path == path);
    assert!(
        !has_change,
        "Expected plan to not change attribute '{}', but it was changed",
        path
    );
}

/// Assert that diagnostics contain no errors.
///
/// # Panics
///
/// Panics if there are any error diagnostics.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();
    assert!(
        errors.is_empty(),
        "Expected no errors, but got {} error(s): {:?}",
        errors.len(),
        errors.iter().map(|d| &d.summary).collect::<Vec<_>>()
    );
}

/// Assert that diagnostics contain an error with the given summary substring.
///
/// # Panics
///
/// Panics if no error diagnostic contains the given substring.
pub fn assert_error_contains(diagnostics: &[Diagnostic], substring: &str) {
    let has_matching_error = diagnostics
        .iter()
        .any(|d| matches!(d.severity, DiagnosticSeverity::Error) && d.summary.contains(substring));

    assert!(
        has_matching_error,
        "Expected an error containing '{}', but no matching error found. Errors: {:?}",
        substring,
        diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(|d| &d.summary)
            .collect::<Vec<_>>()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::Operation;
    use serde_json::json;

    fn seeded() -> InMemoryConfigApi {
        InMemoryConfigApi::new().with_object(json!({
            "id": "Audit",
            "enabled": true,
            "description": "audit log",
            "obscureAttribute": ["userPassword"],
        }))
    }

    #[tokio::test]
    async fn test_in_memory_get_and_missing() {
        let api = seeded();
        assert_eq!(api.get_log_publisher("Audit").await.unwrap()["enabled"], true);

        let err = api.get_log_publisher("Nope").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            api.calls(),
            vec![
                ApiCall::Get { id: "Audit".into() },
                ApiCall::Get { id: "Nope".into() },
            ]
        );
    }

    #[tokio::test]
    async fn test_in_memory_add_conflict() {
        let api = seeded();
        let err = api
            .add_log_publisher(&json!({"id": "Audit", "enabled": false}))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));

        api.add_log_publisher(&json!({"id": "Other", "enabled": false}))
            .await
            .unwrap();
        assert!(api.object("Other").is_some());
    }

    #[tokio::test]
    async fn test_in_memory_applies_operations() {
        let api = seeded();
        let request = UpdateRequest::new(vec![
            Operation::replace("enabled", json!(false)),
            Operation::remove("description"),
            Operation::add_values("obscureAttribute", vec!["authPassword".into()]),
            Operation::remove_values("obscureAttribute", vec!["userPassword".into()]),
            Operation::add_values("excludeAttribute", vec!["ds-sync-hist".into()]),
        ]);

        let updated = api.update_log_publisher("Audit", &request).await.unwrap();

        assert_eq!(
            updated,
            json!({
                "id": "Audit",
                "enabled": false,
                "obscureAttribute": ["authPassword"],
                "excludeAttribute": ["ds-sync-hist"],
            })
        );
        assert_eq!(api.object("Audit"), Some(updated));
    }

    #[tokio::test]
    async fn test_in_memory_malformed_operation_leaves_object() {
        let api = seeded();
        let request = UpdateRequest::new(vec![
            Operation::replace("enabled", json!(false)),
            Operation::add_values("enabled", vec!["x".into()]),
        ]);

        let err = api.update_log_publisher("Audit", &request).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(api.object("Audit").unwrap()["enabled"], true);
    }

    #[tokio::test]
    async fn test_in_memory_fail_next() {
        let api = seeded();
        api.fail_next(503, "unavailable");

        let err = api.delete_log_publisher("Audit").await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(api.object("Audit").is_some());

        api.delete_log_publisher("Audit").await.unwrap();
        assert!(api.object("Audit").is_none());
    }

    #[test]
    fn test_assert_no_errors() {
        let diagnostics = vec![Diagnostic::warning("Just a warning")];
        assert_no_errors(&diagnostics);
    }

    #[test]
    #[should_panic(expected = "Expected no errors")]
    fn test_assert_no_errors_fails() {
        let diagnostics = vec![Diagnostic::error("An error")];
        assert_no_errors(&diagnostics);
    }

    #[test]
    fn test_assert_error_contains() {
        let diagnostics = vec![Diagnostic::error("Invalid value for attribute 'output_location'")];
        assert_error_contains(&diagnostics, "Invalid value");
        assert_error_contains(&diagnostics, "output_location");
    }

    #[test]
    fn test_plan_assertions() {
        let plan = PlanResult::no_change(json!({"id": "x"}));
        assert_plan_no_changes(&plan);
        assert_plan_updates_in_place(&plan);
    }

    #[test]
    fn test_test_error_display() {
        let err = TestError::Diagnostics(vec![
            Diagnostic::error("Missing required attribute 'enabled'").with_attribute("enabled"),
            Diagnostic::error("Invalid type for attribute 'queue_size'")
                .with_detail("Expected int64, got string"),
        ]);

        let display = format!("{}", err);
        assert!(display.contains("Missing required attribute 'enabled'"));
        assert!(display.contains("(at enabled)"));
        assert!(display.contains("Expected int64, got string"));
    }
}
