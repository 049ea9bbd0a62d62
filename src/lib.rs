//! # Social Google
//!
//! Entry point for the Google Drive and GData bindings.
//!
//! [`GoogleClient`] holds one [`ClientConfig`] (access token, transport,
//! endpoints) and hands out the operation sets built on it:
//!
//! ```ignore
//! use social_google::{ClientConfig, DriveOperations, GoogleClient};
//!
//! let google = GoogleClient::new(ClientConfig::builder().access_token(token).build()?);
//!
//! let drive = google.drive();
//! let folder = drive.create_folder("root", "Reports").await?;
//! drive.star(folder.id()).await?;
//! ```
//!
//! With the default `desktop-shims` feature the reqwest transport is
//! injected automatically; other hosts pass their own `HttpClient`.

use std::sync::Arc;

use tracing::debug;

pub use bridge_traits::{BridgeError, HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use core_runtime::{ClientConfig, ClientConfigBuilder};
pub use provider_gdata::{Element, ElementBuilder, GDataClient, GDataError};
pub use provider_google_drive::{
    DriveFile, DriveFileQueryBuilder, DriveFilesPage, DriveOperations, GoogleDriveConnector,
    GoogleDriveError, UploadContent, UploadParameters, UserPermission, UserPermissionsList,
};

pub use core_runtime as runtime;
pub use provider_gdata as gdata;
pub use provider_google_drive as drive;

/// Configured access to Google APIs for one authorized user
#[derive(Debug, Clone)]
pub struct GoogleClient {
    config: ClientConfig,
}

impl GoogleClient {
    pub fn new(config: ClientConfig) -> Self {
        debug!(drive_base_url = %config.drive_base_url, "Creating Google client");
        Self { config }
    }

    /// Client with default settings around `access_token`
    ///
    /// Needs the `desktop-shims` feature unless a transport is injected
    /// through [`ClientConfig::builder`] instead.
    pub fn with_access_token(access_token: impl Into<String>) -> core_runtime::Result<Self> {
        let config = ClientConfig::builder().access_token(access_token).build()?;
        Ok(Self::new(config))
    }

    /// Client whose calls go through `http_client`
    pub fn with_http_client(
        access_token: impl Into<String>,
        http_client: Arc<dyn HttpClient>,
    ) -> core_runtime::Result<Self> {
        let config = ClientConfig::builder()
            .access_token(access_token)
            .http_client(http_client)
            .build()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Drive operations on this client's configuration
    pub fn drive(&self) -> GoogleDriveConnector {
        GoogleDriveConnector::from_config(&self.config)
    }

    /// GData entry operations on this client's configuration
    pub fn gdata(&self) -> GDataClient {
        GDataClient::from_config(&self.config)
    }
}
