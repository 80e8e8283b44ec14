//! Error types for the provider.

use thiserror::Error;

use crate::client::ApiError;
use crate::schema::Diagnostic;

/// Errors that can occur while serving a log publisher resource.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested resource was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A value in the plan was rejected before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The provider is missing or has invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// A plan or state value could not be decoded into a resource model.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The configuration API answered with something the provider cannot use.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A call to the configuration API failed.
    #[error("{summary}: {source}")]
    Api {
        /// Fixed, human-readable description of the failed step.
        summary: String,
        /// The underlying transport or HTTP failure.
        #[source]
        source: ApiError,
    },
}

impl ProviderError {
    /// Wrap an API failure for the given action on a resource.
    ///
    /// ```
    /// use pingdirectory_provider::client::ApiError;
    /// use pingdirectory_provider::error::{ApiAction, ProviderError};
    ///
    /// let err = ProviderError::api(
    ///     ApiAction::Create,
    ///     "Console JSON Access Log Publisher",
    ///     ApiError::Status { status: 409, body: "exists".into() },
    /// );
    /// assert!(err
    ///     .to_string()
    ///     .starts_with("An error occurred while creating the Console JSON Access Log Publisher"));
    /// ```
    pub fn api(action: ApiAction, display_name: &str, source: ApiError) -> Self {
        Self::Api {
            summary: format!(
                "An error occurred while {} the {}",
                action.verb(),
                display_name
            ),
            source,
        }
    }

    /// Whether the error is an API response with HTTP status 404.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Api { source, .. } => source.status() == Some(404),
            _ => false,
        }
    }

    /// Convert the error into an error diagnostic for the host.
    ///
    /// API failures keep the fixed summary and carry the HTTP status and
    /// response body (or transport error) as detail.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Api { summary, source } => {
                Diagnostic::error(summary.clone()).with_detail(source.to_string())
            },
            other => Diagnostic::error(other.to_string()),
        }
    }
}

/// The step of a lifecycle operation that talked to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiAction {
    /// `POST` of an add request.
    Create,
    /// `GET` of an existing object.
    Get,
    /// `PATCH` with an operation list.
    Update,
    /// `DELETE` of an object.
    Delete,
}

impl ApiAction {
    fn verb(self) -> &'static str {
        match self {
            Self::Create => "creating",
            Self::Get => "getting",
            Self::Update => "updating",
            Self::Delete => "deleting",
        }
    }
}

impl From<ProviderError> for Diagnostic {
    fn from(err: ProviderError) -> Self {
        err.to_diagnostic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DiagnosticSeverity;

    #[test]
    fn test_error_display() {
        let err = ProviderError::NotFound("access-log".to_string());
        assert_eq!(format!("{}", err), "Resource not found: access-log");

        let err = ProviderError::Validation("invalid input".to_string());
        assert_eq!(format!("{}", err), "Validation error: invalid input");

        let err = ProviderError::UnknownResource("pingdirectory_widget".to_string());
        assert_eq!(
            format!("{}", err),
            "Unknown resource type: pingdirectory_widget"
        );
    }

    #[test]
    fn test_api_error_summary_per_action() {
        let cases = [
            (ApiAction::Create, "creating"),
            (ApiAction::Get, "getting"),
            (ApiAction::Update, "updating"),
            (ApiAction::Delete, "deleting"),
        ];
        for (action, verb) in cases {
            let err = ProviderError::api(
                action,
                "Syslog JSON Audit Log Publisher",
                ApiError::Status {
                    status: 500,
                    body: "boom".to_string(),
                },
            );
            let ProviderError::Api { summary, .. } = &err else {
                panic!("expected API error");
            };
            assert_eq!(
                summary,
                &format!("An error occurred while {verb} the Syslog JSON Audit Log Publisher")
            );
        }
    }

    #[test]
    fn test_api_error_to_diagnostic() {
        let err = ProviderError::api(
            ApiAction::Update,
            "File Based Error Log Publisher",
            ApiError::Status {
                status: 400,
                body: r#"{"detail":"bad value"}"#.to_string(),
            },
        );

        let diag = err.to_diagnostic();
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert_eq!(
            diag.summary,
            "An error occurred while updating the File Based Error Log Publisher"
        );
        let detail = diag.detail.unwrap();
        assert!(detail.contains("400"));
        assert!(detail.contains("bad value"));
    }

    #[test]
    fn test_plain_error_to_diagnostic() {
        let diag: Diagnostic = ProviderError::Configuration("https_host is required".into()).into();
        assert_eq!(diag.summary, "Configuration error: https_host is required");
        assert!(diag.detail.is_none());
    }

    #[test]
    fn test_is_not_found() {
        let err = ProviderError::api(
            ApiAction::Get,
            "Third Party Access Log Publisher",
            ApiError::Status {
                status: 404,
                body: String::new(),
            },
        );
        assert!(err.is_not_found());
        assert!(ProviderError::NotFound("x".into()).is_not_found());
        assert!(!ProviderError::Validation("x".into()).is_not_found());
    }
}
