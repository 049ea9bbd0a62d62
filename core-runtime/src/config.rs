//! # Client Configuration Module
//!
//! Provides configuration management for the Google bindings.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `ClientConfig` holding the transport, the OAuth access token and the
//! endpoint settings shared by the Drive and GData operations. It enforces
//! fail-fast validation so a misconfigured client is rejected before the
//! first remote call.
//!
//! ## Required Dependencies
//!
//! - Access token - obtained by the host's OAuth flow (not handled here)
//! - `HttpClient` - required unless the `desktop-shims` feature injects the
//!   reqwest-based default
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::ClientConfig;
//!
//! let config = ClientConfig::builder()
//!     .access_token("ya29.a0...")
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ### Configuration with a Custom Transport
//!
//! ```ignore
//! use core_runtime::config::ClientConfig;
//! use std::sync::Arc;
//!
//! let config = ClientConfig::builder()
//!     .access_token(token)
//!     .http_client(Arc::new(MyHttpClient))
//!     .drive_base_url("http://localhost:8080/drive/v2")
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::logging::redact_if_sensitive;
use bridge_traits::HttpClient;
use std::sync::Arc;
use std::time::Duration;

/// Default Drive v2 REST endpoint
pub const DEFAULT_DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v2";

/// Default Drive v2 media upload endpoint
pub const DEFAULT_DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v2";

/// GData protocol version sent with Atom requests
pub const DEFAULT_GDATA_VERSION: &str = "3.0";

pub const DEFAULT_USER_AGENT: &str = concat!("social-google/", env!("CARGO_PKG_VERSION"));

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration shared by every Google binding.
///
/// Use [`ClientConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct ClientConfig {
    /// OAuth 2.0 access token sent as a bearer credential
    pub access_token: String,

    /// Transport used for every remote call
    pub http_client: Arc<dyn HttpClient>,

    /// Drive REST endpoint, without trailing slash
    pub drive_base_url: String,

    /// Drive media upload endpoint, without trailing slash
    pub drive_upload_url: String,

    /// Per-request timeout passed to the transport
    pub request_timeout: Duration,

    /// User agent used when the desktop transport is injected
    pub user_agent: String,

    /// Value of the `GData-Version` header
    pub gdata_version: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field(
                "access_token",
                &redact_if_sensitive("access_token", &self.access_token),
            )
            .field("http_client", &"HttpClient { ... }")
            .field("drive_base_url", &self.drive_base_url)
            .field("drive_upload_url", &self.drive_upload_url)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .field("gdata_version", &self.gdata_version)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Access token is not blank
    /// - Endpoint URLs use http or https
    /// - Timeout is non-zero
    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(Error::Config("Access token cannot be empty".to_string()));
        }

        validate_url("drive_base_url", &self.drive_base_url)?;
        validate_url("drive_upload_url", &self.drive_upload_url)?;

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.gdata_version.trim().is_empty() {
            return Err(Error::Config("GData version cannot be empty".to_string()));
        }

        Ok(())
    }
}

fn validate_url(field: &str, url: &str) -> Result<()> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{} must be an http(s) URL, got '{}'",
            field, url
        )))
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default ReqwestHttpClient. \
                 Other hosts: inject an HttpClient with .http_client()."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(
    timeout: Duration,
    user_agent: &str,
) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_options(timeout, user_agent)
        .map_err(|e| Error::Internal(format!("Failed to create default HttpClient: {}", e)))?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(
    _timeout: Duration,
    _user_agent: &str,
) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

/// Builder for constructing [`ClientConfig`] instances.
#[derive(Default)]
pub struct ClientConfigBuilder {
    access_token: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    drive_base_url: Option<String>,
    drive_upload_url: Option<String>,
    request_timeout: Option<Duration>,
    user_agent: Option<String>,
    gdata_version: Option<String>,
}

impl ClientConfigBuilder {
    /// Sets the OAuth 2.0 access token (required).
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) will be used when
    /// the `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Overrides the Drive REST endpoint.
    ///
    /// Default: [`DEFAULT_DRIVE_BASE_URL`]
    pub fn drive_base_url(mut self, url: impl Into<String>) -> Self {
        self.drive_base_url = Some(url.into());
        self
    }

    /// Overrides the Drive upload endpoint.
    ///
    /// Default: [`DEFAULT_DRIVE_UPLOAD_URL`]
    pub fn drive_upload_url(mut self, url: impl Into<String>) -> Self {
        self.drive_upload_url = Some(url.into());
        self
    }

    /// Sets the per-request timeout.
    ///
    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the `GData-Version` header value.
    ///
    /// Default: [`DEFAULT_GDATA_VERSION`]
    pub fn gdata_version(mut self, version: impl Into<String>) -> Self {
        self.gdata_version = Some(version.into());
        self
    }

    /// Builds the final `ClientConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(ClientConfig)` on success, or an error if:
    /// - The access token is missing or blank
    /// - No `HttpClient` is available
    /// - Configuration values are invalid
    pub fn build(self) -> Result<ClientConfig> {
        let access_token = self.access_token.ok_or_else(|| {
            Error::Config("Access token is required. Use .access_token() to set it.".to_string())
        })?;

        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout, &user_agent)?,
        };

        let config = ClientConfig {
            access_token,
            http_client,
            drive_base_url: trim_trailing_slash(
                self.drive_base_url
                    .unwrap_or_else(|| DEFAULT_DRIVE_BASE_URL.to_string()),
            ),
            drive_upload_url: trim_trailing_slash(
                self.drive_upload_url
                    .unwrap_or_else(|| DEFAULT_DRIVE_UPLOAD_URL.to_string()),
            ),
            request_timeout,
            user_agent,
            gdata_version: self
                .gdata_version
                .unwrap_or_else(|| DEFAULT_GDATA_VERSION.to_string()),
        };

        config.validate()?;

        Ok(config)
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
