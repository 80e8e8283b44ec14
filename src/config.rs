//! Provider configuration.
//!
//! The provider block names the server and the credentials used for every
//! configuration API call. Any attribute left out of the block falls back to
//! an environment variable so credentials can stay out of configuration files.

use std::fmt;

use serde::Deserialize;

use crate::error::ProviderError;
use crate::schema::{Attribute, Diagnostic, Schema};

/// Environment variable consulted when `https_host` is not configured.
pub const HTTPS_HOST_ENV: &str = "PINGDIRECTORY_PROVIDER_HTTPS_HOST";
/// Environment variable consulted when `username` is not configured.
pub const USERNAME_ENV: &str = "PINGDIRECTORY_PROVIDER_USERNAME";
/// Environment variable consulted when `password` is not configured.
pub const PASSWORD_ENV: &str = "PINGDIRECTORY_PROVIDER_PASSWORD";
/// Environment variable consulted when `insecure_trust_all_tls` is not configured.
pub const INSECURE_TRUST_ALL_TLS_ENV: &str = "PINGDIRECTORY_PROVIDER_INSECURE_TRUST_ALL_TLS";

/// The provider block.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Base URL of the server, e.g. `https://localhost:1443`.
    #[serde(default)]
    pub https_host: Option<String>,
    /// User for basic authentication.
    #[serde(default)]
    pub username: Option<String>,
    /// Password for basic authentication.
    #[serde(default)]
    pub password: Option<String>,
    /// Skip TLS certificate verification.
    #[serde(default)]
    pub insecure_trust_all_tls: Option<bool>,
    /// PEM files with additional trusted CA certificates.
    #[serde(default)]
    pub ca_certificate_pem_files: Vec<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("https_host", &self.https_host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("insecure_trust_all_tls", &self.insecure_trust_all_tls)
            .field("ca_certificate_pem_files", &self.ca_certificate_pem_files)
            .finish()
    }
}

impl ProviderConfig {
    /// Decode the provider block. A null block is an empty configuration.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ProviderError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Fill unset attributes from the process environment.
    pub fn with_env_fallbacks(self) -> Self {
        self.with_fallbacks(|name| std::env::var(name).ok())
    }

    /// Fill unset attributes from `lookup`, keyed by environment variable name.
    pub fn with_fallbacks<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if is_blank(&self.https_host) {
            self.https_host = lookup(HTTPS_HOST_ENV);
        }
        if is_blank(&self.username) {
            self.username = lookup(USERNAME_ENV);
        }
        if is_blank(&self.password) {
            self.password = lookup(PASSWORD_ENV);
        }
        if self.insecure_trust_all_tls.is_none() {
            self.insecure_trust_all_tls = lookup(INSECURE_TRUST_ALL_TLS_ENV)
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1");
        }
        self
    }

    /// Check the configuration, returning errors for missing values and
    /// warnings for insecure settings.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        match self.https_host.as_deref().filter(|h| !h.is_empty()) {
            None => diagnostics.push(missing("https_host", HTTPS_HOST_ENV)),
            Some(host) => match reqwest::Url::parse(host) {
                Ok(url) if url.scheme() == "https" => {},
                Ok(url) if url.scheme() == "http" => diagnostics.push(
                    Diagnostic::warning("Configuration API traffic is not encrypted")
                        .with_detail(format!("'{}' uses plain http", host))
                        .with_attribute("https_host"),
                ),
                Ok(url) => diagnostics.push(
                    Diagnostic::error("Unsupported URL scheme")
                        .with_detail(format!("'{}' must use https", url))
                        .with_attribute("https_host"),
                ),
                Err(e) => diagnostics.push(
                    Diagnostic::error("Invalid https_host")
                        .with_detail(format!("'{}': {}", host, e))
                        .with_attribute("https_host"),
                ),
            },
        }
        if is_blank(&self.username) {
            diagnostics.push(missing("username", USERNAME_ENV));
        }
        if is_blank(&self.password) {
            diagnostics.push(missing("password", PASSWORD_ENV));
        }
        if self.insecure_trust_all_tls() {
            diagnostics.push(
                Diagnostic::warning("TLS certificate verification is disabled")
                    .with_attribute("insecure_trust_all_tls"),
            );
        }

        diagnostics
    }

    /// Whether certificate verification is disabled.
    pub fn insecure_trust_all_tls(&self) -> bool {
        self.insecure_trust_all_tls.unwrap_or(false)
    }

    /// Schema of the provider block.
    pub fn schema() -> Schema {
        Schema::v0()
            .with_description("Manages log publishers of a PingDirectory server")
            .with_attribute(
                "https_host",
                Attribute::optional_string().with_description(format!(
                    "URI for the server's HTTPS interface. Defaults to ${}.",
                    HTTPS_HOST_ENV
                )),
            )
            .with_attribute(
                "username",
                Attribute::optional_string().with_description(format!(
                    "Username for basic authentication. Defaults to ${}.",
                    USERNAME_ENV
                )),
            )
            .with_attribute(
                "password",
                Attribute::optional_string()
                    .sensitive()
                    .with_description(format!(
                        "Password for basic authentication. Defaults to ${}.",
                        PASSWORD_ENV
                    )),
            )
            .with_attribute(
                "insecure_trust_all_tls",
                Attribute::optional_bool().with_description(
                    "Trust any certificate presented by the server. For testing only.",
                ),
            )
            .with_attribute(
                "ca_certificate_pem_files",
                Attribute::optional_string_set()
                    .with_description("Paths to PEM files of additional trusted CA certificates."),
            )
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn missing(attribute: &str, env: &str) -> Diagnostic {
    Diagnostic::error(format!("Missing required provider attribute '{}'", attribute))
        .with_detail(format!("Set '{}' in the provider block or ${}", attribute, env))
        .with_attribute(attribute)
}
