//! The log publisher provider.
//!
//! [`LogPublisherProvider`] implements [`ProviderService`] for every type in
//! the catalog. It owns the configured API client; the resource adapters are
//! stateless and receive the client on each call.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::client::{ApiClient, LogPublisherApi};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::resource::{catalog, ResourceAdapter};
use crate::schema::{Diagnostic, ProviderSchema};
use crate::service::ProviderService;
use crate::types::{ImportedResource, PlanResult};
use crate::validation::validate;

/// Serves every log publisher resource type.
pub struct LogPublisherProvider {
    api: RwLock<Option<Arc<dyn LogPublisherApi>>>,
}

impl LogPublisherProvider {
    /// An unconfigured provider. Resource operations fail until
    /// [`ProviderService::configure`] succeeds.
    pub fn new() -> Self {
        Self {
            api: RwLock::new(None),
        }
    }

    /// A provider that talks to `api` instead of building a client from
    /// configuration.
    pub fn with_api(api: Arc<dyn LogPublisherApi>) -> Self {
        Self {
            api: RwLock::new(Some(api)),
        }
    }

    fn adapter(resource_type: &str) -> Result<ResourceAdapter, ProviderError> {
        catalog::lookup(resource_type)
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))
    }

    async fn api(&self) -> Result<Arc<dyn LogPublisherApi>, ProviderError> {
        self.api.read().await.clone().ok_or_else(|| {
            ProviderError::Configuration("the provider has not been configured".to_string())
        })
    }

    /// Parse the provider block and collect its diagnostics.
    fn check_config(config: &Value) -> Result<(ProviderConfig, Vec<Diagnostic>), ProviderError> {
        let diagnostics = validate(&ProviderConfig::schema(), config);
        if diagnostics.iter().any(Diagnostic::is_error) {
            return Ok((ProviderConfig::default(), diagnostics));
        }
        let parsed = ProviderConfig::from_value(config.clone())?.with_env_fallbacks();
        let mut all = diagnostics;
        all.extend(parsed.validate());
        Ok((parsed, all))
    }
}

impl Default for LogPublisherProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderService for LogPublisherProvider {
    fn schema(&self) -> ProviderSchema {
        catalog::adapters().fold(
            ProviderSchema::new().with_provider_config(ProviderConfig::schema()),
            |schema, adapter| schema.with_resource(adapter.type_name(), adapter.schema()),
        )
    }

    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let (_, diagnostics) = Self::check_config(&config)?;
        Ok(diagnostics)
    }

    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let (config, diagnostics) = Self::check_config(&config)?;
        if diagnostics.iter().any(Diagnostic::is_error) {
            warn!(diagnostics = diagnostics.len(), "Provider configuration rejected");
            return Ok(diagnostics);
        }

        let client = ApiClient::new(&config)?;
        *self.api.write().await = Some(Arc::new(client));
        info!(
            https_host = config.https_host.as_deref().unwrap_or_default(),
            "Provider configured"
        );
        Ok(diagnostics)
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let adapter = Self::adapter(resource_type)?;
        Ok(validate(&adapter.schema(), &config))
    }

    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        _config: Value,
    ) -> Result<PlanResult, ProviderError> {
        let adapter = Self::adapter(resource_type)?;
        let result = adapter.plan(prior_state.as_ref(), &proposed_state)?;
        debug!(
            resource_type,
            changes = result.changes.len(),
            requires_replace = result.requires_replace,
            "Plan completed"
        );
        Ok(result)
    }

    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
        let adapter = Self::adapter(resource_type)?;
        let plan = adapter.decode_state(&planned_state)?;
        let api = self.api().await?;
        let state = adapter.create(api.as_ref(), plan).await?;
        Ok(adapter.encode_state(&state))
    }

    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value, ProviderError> {
        let adapter = Self::adapter(resource_type)?;
        let state = adapter.decode_state(&current_state)?;
        let api = self.api().await?;
        Ok(adapter
            .read(api.as_ref(), state)
            .await?
            .map_or(Value::Null, |state| adapter.encode_state(&state)))
    }

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let adapter = Self::adapter(resource_type)?;
        let prior = adapter.decode_state(&prior_state)?;
        let plan = adapter.decode_state(&planned_state)?;
        let api = self.api().await?;
        let state = adapter.update(api.as_ref(), prior, plan).await?;
        Ok(adapter.encode_state(&state))
    }

    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        let adapter = Self::adapter(resource_type)?;
        let state = adapter.decode_state(&current_state)?;
        let api = self.api().await?;
        adapter.delete(api.as_ref(), &state).await
    }

    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        let adapter = Self::adapter(resource_type)?;
        let api = self.api().await?;
        let state = adapter.import(api.as_ref(), id).await?;
        Ok(vec![ImportedResource::new(
            resource_type,
            adapter.encode_state(&state),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        assert_error_contains, assert_plan_changes_attribute, assert_plan_creates,
        assert_plan_does_not_change_attribute, assert_plan_no_changes, assert_plan_replaces,
        ApiCall, InMemoryConfigApi, ProviderTester,
    };
    use serde_json::json;

    const CONSOLE_ACCESS: &str = "pingdirectory_console_json_access_log_publisher";
    const DEFAULT_FILE_ACCESS: &str = "pingdirectory_default_file_based_access_log_publisher";

    fn tester() -> (ProviderTester<LogPublisherProvider>, Arc<InMemoryConfigApi>) {
        let api = Arc::new(InMemoryConfigApi::new());
        let provider = LogPublisherProvider::with_api(api.clone());
        (ProviderTester::new(provider), api)
    }

    #[test]
    fn test_schema_registers_every_type() {
        let provider = LogPublisherProvider::new();
        let schema = provider.schema();
        assert_eq!(schema.resources.len(), 46);
        assert!(schema.resources.contains_key(CONSOLE_ACCESS));
        assert!(schema.resources.contains_key(DEFAULT_FILE_ACCESS));
        assert!(schema.provider.attribute("password").unwrap().flags.sensitive);
    }

    #[test]
    fn test_metadata_is_sorted() {
        let (tester, _) = tester();
        let types = tester.resource_types();
        assert_eq!(types.len(), 46);
        assert!(types.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_unconfigured_provider() {
        let tester = ProviderTester::new(LogPublisherProvider::new());
        let err = tester
            .create(CONSOLE_ACCESS, json!({"id": "x", "enabled": true}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_unknown_resource_type() {
        let (tester, _) = tester();
        let err = tester
            .create("pingdirectory_widget", json!({"id": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));
    }

    #[tokio::test]
    async fn test_configure() {
        let provider = LogPublisherProvider::new();
        let diagnostics = provider
            .configure(json!({
                "https_host": "https://localhost:1443",
                "username": "cn=administrator",
                "password": "2FederateM0re",
            }))
            .await
            .unwrap();
        assert!(diagnostics.is_empty());
        assert!(provider.api().await.is_ok());
    }

    #[tokio::test]
    async fn test_configure_rejects_bad_block() {
        let provider = LogPublisherProvider::new();
        let diagnostics = provider
            .configure(json!({"https_host": 443, "username": "admin", "password": "x"}))
            .await
            .unwrap();
        assert_error_contains(&diagnostics, "Invalid type");
        assert!(provider.api().await.is_err());

        let diagnostics = provider
            .validate_provider_config(json!({"https_host": "ftp://localhost", "username": "a", "password": "b"}))
            .await
            .unwrap();
        assert_error_contains(&diagnostics, "Unsupported URL scheme");
    }

    #[tokio::test]
    async fn test_validate_resource_config() {
        let (tester, _) = tester();
        tester
            .validate_resource_config(CONSOLE_ACCESS, json!({"id": "x", "enabled": true}))
            .await
            .unwrap();

        let err = tester
            .validate_resource_config(
                CONSOLE_ACCESS,
                json!({"id": "x", "enabled": true, "output_location": "stdout", "log_file": "f"}),
            )
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("Invalid value for attribute 'output_location'"));
        assert!(err.contains("Unsupported attribute 'log_file'"));

        tester
            .validate_resource_config(DEFAULT_FILE_ACCESS, json!({"id": "File-Based Access Logger"}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_plan_through_service() {
        let (tester, _) = tester();
        let plan = tester
            .plan_create(CONSOLE_ACCESS, json!({"id": "x", "enabled": true}))
            .await
            .unwrap();
        assert_plan_creates(&plan);
        assert_plan_changes_attribute(&plan, "enabled");

        let prior = tester.create(CONSOLE_ACCESS, plan.planned_state).await.unwrap();
        let plan = tester
            .plan_update(CONSOLE_ACCESS, prior.clone(), json!({"id": "x", "enabled": true}))
            .await
            .unwrap();
        assert_plan_no_changes(&plan);

        let plan = tester
            .plan_update(CONSOLE_ACCESS, prior, json!({"id": "y", "enabled": true}))
            .await
            .unwrap();
        assert_plan_replaces(&plan);
        assert_plan_does_not_change_attribute(&plan, "enabled");
    }

    #[tokio::test]
    async fn test_crud_lifecycle() {
        let (tester, api) = tester();
        let final_state = tester
            .lifecycle_crud(
                CONSOLE_ACCESS,
                json!({"id": "Console Access", "enabled": false, "description": "first"}),
                json!({"id": "Console Access", "enabled": true}),
            )
            .await
            .unwrap();

        assert_eq!(final_state["enabled"], true);
        assert_eq!(final_state["description"], Value::Null);
        assert!(final_state["last_updated"].is_string());
        assert!(api.object("Console Access").is_none());
        assert!(matches!(api.calls().last(), Some(ApiCall::Delete { .. })));
    }

    #[tokio::test]
    async fn test_read_vanished_object_returns_null() {
        let (tester, api) = tester();
        let state = tester
            .create(CONSOLE_ACCESS, json!({"id": "x", "enabled": true}))
            .await
            .unwrap();
        api.remove_object("x");

        assert_eq!(tester.read(CONSOLE_ACCESS, state).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_edit_only_lifecycle_leaves_object() {
        let api = Arc::new(InMemoryConfigApi::new().with_object(json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:log-publisher:file-based-access"],
            "id": "File-Based Access Logger",
            "enabled": true,
            "logFile": "logs/access",
        })));
        let tester = ProviderTester::new(LogPublisherProvider::with_api(api.clone()));

        let state = tester
            .lifecycle_create(
                DEFAULT_FILE_ACCESS,
                json!({"id": "File-Based Access Logger", "enabled": false}),
            )
            .await
            .unwrap();
        assert_eq!(state["log_file"], "logs/access");

        tester.lifecycle_delete(DEFAULT_FILE_ACCESS, state).await.unwrap();
        assert_eq!(api.object("File-Based Access Logger").unwrap()["enabled"], false);
    }

    #[tokio::test]
    async fn test_import() {
        let api = Arc::new(InMemoryConfigApi::new().with_object(json!({
            "id": "Syslog JSON Audit",
            "enabled": true,
            "syslogExternalServer": ["syslog-1"],
        })));
        let tester = ProviderTester::new(LogPublisherProvider::with_api(api));

        let imported = tester
            .import_resource("pingdirectory_syslog_json_audit_log_publisher", "Syslog JSON Audit")
            .await
            .unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].state["syslog_external_server"], json!(["syslog-1"]));
        assert_eq!(imported[0].state["exclude_attribute"], json!([]));
    }

    #[tokio::test]
    async fn test_api_failure_becomes_diagnostic() {
        let (tester, api) = tester();
        api.fail_next(500, "internal error");

        let err = tester
            .create(CONSOLE_ACCESS, json!({"id": "x", "enabled": true}))
            .await
            .unwrap_err();
        let diagnostic = err.to_diagnostic();
        assert_eq!(
            diagnostic.summary,
            "An error occurred while creating the Console JSON Access Log Publisher"
        );
        assert!(diagnostic.detail.unwrap().contains("internal error"));
    }
}
