//! Google Drive API connector implementation
//!
//! Implements [`DriveOperations`] against the Drive API v2 REST surface.

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_runtime::config::{ClientConfig, DEFAULT_DRIVE_BASE_URL, DEFAULT_DRIVE_UPLOAD_URL};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{GoogleDriveError, Result};
use crate::operations::DriveOperations;
use crate::query::{DriveFileQuery, DriveFileQueryBuilder};
use crate::types::{
    DriveFile, DriveFilesPage, PermissionUpdate, UploadParameters, UserPermission,
    UserPermissionsList, ROOT_FOLDER_ID,
};
use crate::upload::{MultipartBody, UploadContent};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Google Drive API connector
///
/// Translates each [`DriveOperations`] call into exactly one request on the
/// injected [`HttpClient`] and maps the JSON response back into typed
/// resources. It keeps no state besides its configuration, so one instance
/// can be shared across tasks.
///
/// # Example
///
/// ```ignore
/// use provider_google_drive::{DriveOperations, GoogleDriveConnector};
///
/// let drive = GoogleDriveConnector::new(http_client, access_token);
/// let page = drive.get_root_files(None).await?;
/// ```
pub struct GoogleDriveConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// OAuth 2.0 access token
    access_token: String,

    base_url: String,

    upload_url: String,

    request_timeout: Option<Duration>,
}

impl GoogleDriveConnector {
    /// Create a new Google Drive connector against the public endpoints
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `access_token` - OAuth 2.0 access token with a Drive scope
    pub fn new(http_client: Arc<dyn HttpClient>, access_token: String) -> Self {
        Self {
            http_client,
            access_token,
            base_url: DEFAULT_DRIVE_BASE_URL.to_string(),
            upload_url: DEFAULT_DRIVE_UPLOAD_URL.to_string(),
            request_timeout: None,
        }
    }

    /// Create a connector from shared client configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            http_client: Arc::clone(&config.http_client),
            access_token: config.access_token.clone(),
            base_url: config.drive_base_url.clone(),
            upload_url: config.drive_upload_url.clone(),
            request_timeout: Some(config.request_timeout),
        }
    }

    /// Point the connector at different REST and upload endpoints
    pub fn with_endpoints(mut self, base_url: impl Into<String>, upload_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.upload_url = upload_url.into();
        self
    }

    fn authorize(&self, request: HttpRequest) -> HttpRequest {
        let request = request
            .bearer_token(&self.access_token)
            .header("Accept", JSON_CONTENT_TYPE);

        match self.request_timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        self.authorize(HttpRequest::new(method, format!("{}/{}", self.base_url, path)))
    }

    /// Send once and classify any non-success status
    async fn send(&self, request: HttpRequest, resource: &str) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "Sending Drive API request");

        let response = self.http_client.execute(request).await?;

        if response.is_success() {
            debug!(status = response.status, "Drive API request succeeded");
            Ok(response)
        } else {
            warn!(status = response.status, resource, "Drive API request failed");
            Err(GoogleDriveError::from_status(
                response.status,
                &response.body,
                resource,
            ))
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: HttpRequest, resource: &str) -> Result<T> {
        let response = self.send(request, resource).await?;

        serde_json::from_slice(&response.body).map_err(|e| {
            GoogleDriveError::Parse(format!("Failed to parse response for {}: {}", resource, e))
        })
    }

    async fn post_file_action(&self, id: &str, action: &str) -> Result<DriveFile> {
        let path = format!("{}/{}", file_path(id)?, action);
        let request = self.request(HttpMethod::Post, &path);

        self.send_json(request, id).await
    }

    async fn patch_labels(&self, id: &str, labels: serde_json::Value) -> Result<DriveFile> {
        let request = self
            .request(HttpMethod::Patch, &file_path(id)?)
            .json(&json!({ "labels": labels }))?;

        self.send_json(request, id).await
    }
}

fn require_id(kind: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        Err(GoogleDriveError::InvalidArgument(format!(
            "{} ID must not be empty",
            kind
        )))
    } else {
        Ok(())
    }
}

fn file_path(id: &str) -> Result<String> {
    require_id("File", id)?;
    Ok(format!("files/{}", urlencoding::encode(id)))
}

fn permission_path(file_id: &str, permission_id: &str) -> Result<String> {
    require_id("Permission", permission_id)?;
    Ok(format!(
        "{}/permissions/{}",
        file_path(file_id)?,
        urlencoding::encode(permission_id)
    ))
}

#[async_trait]
impl DriveOperations for GoogleDriveConnector {
    #[instrument(skip(self))]
    async fn get_file(&self, id: &str) -> Result<DriveFile> {
        let request = self.request(HttpMethod::Get, &file_path(id)?);
        self.send_json(request, id).await
    }

    fn drive_file_query(&self) -> DriveFileQueryBuilder<'_> {
        DriveFileQueryBuilder::new(self)
    }

    #[instrument(skip(self), fields(q = ?query.expression()))]
    async fn list_files(&self, query: &DriveFileQuery) -> Result<DriveFilesPage> {
        let request = query.apply(self.request(HttpMethod::Get, "files"));
        let page: DriveFilesPage = self.send_json(request, "files").await?;
        let page = page.normalized();

        info!(
            count = page.items.len(),
            has_next_page = page.has_next_page(),
            "Listed files from Google Drive"
        );
        Ok(page)
    }

    async fn get_root_files(&self, page_token: Option<&str>) -> Result<DriveFilesPage> {
        self.get_files(ROOT_FOLDER_ID, page_token).await
    }

    async fn get_files(&self, parent: &str, page_token: Option<&str>) -> Result<DriveFilesPage> {
        require_id("Parent", parent)?;
        self.list_files(&DriveFileQuery::children_of(parent, page_token))
            .await
    }

    async fn get_trashed_files(&self, page_token: Option<&str>) -> Result<DriveFilesPage> {
        self.list_files(&DriveFileQuery::trash(page_token)).await
    }

    #[instrument(skip(self))]
    async fn trash(&self, id: &str) -> Result<DriveFile> {
        self.post_file_action(id, "trash").await
    }

    #[instrument(skip(self))]
    async fn untrash(&self, id: &str) -> Result<DriveFile> {
        self.post_file_action(id, "untrash").await
    }

    #[instrument(skip(self))]
    async fn star(&self, id: &str) -> Result<DriveFile> {
        self.patch_labels(id, json!({ "starred": true })).await
    }

    #[instrument(skip(self))]
    async fn unstar(&self, id: &str) -> Result<DriveFile> {
        self.patch_labels(id, json!({ "starred": false })).await
    }

    #[instrument(skip(self))]
    async fn hide(&self, id: &str) -> Result<DriveFile> {
        self.patch_labels(id, json!({ "hidden": true })).await
    }

    #[instrument(skip(self))]
    async fn unhide(&self, id: &str) -> Result<DriveFile> {
        self.patch_labels(id, json!({ "hidden": false })).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<()> {
        let request = self.request(HttpMethod::Delete, &file_path(id)?);
        self.send(request, id).await?;

        info!("Deleted file permanently");
        Ok(())
    }

    #[instrument(
        skip(self, content, metadata),
        fields(content_type = %content.content_type(), bytes = content.len())
    )]
    async fn upload(
        &self,
        content: UploadContent,
        metadata: &DriveFile,
        parameters: &UploadParameters,
    ) -> Result<DriveFile> {
        let multipart = MultipartBody::new(metadata, content)?;

        let request = HttpRequest::new(
            HttpMethod::Post,
            format!("{}/files?uploadType=multipart", self.upload_url),
        );
        let request = self
            .authorize(parameters.apply(request))
            .header("Content-Type", multipart.content_type)
            .body(multipart.body);

        let file: DriveFile = self.send_json(request, "files").await?;
        info!(file_id = file.id(), "Uploaded file to Google Drive");
        Ok(file)
    }

    #[instrument(skip(self, metadata), fields(title = ?metadata.title))]
    async fn create_file_metadata(&self, metadata: &DriveFile) -> Result<DriveFile> {
        let request = self.request(HttpMethod::Post, "files").json(metadata)?;

        let file: DriveFile = self.send_json(request, "files").await?;
        info!(file_id = file.id(), "Created file metadata");
        Ok(file)
    }

    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<DriveFile> {
        require_id("Parent", parent_id)?;

        let metadata = DriveFile::builder()
            .title(name)
            .folder()
            .parent(parent_id)
            .build();

        self.create_file_metadata(&metadata).await
    }

    #[instrument(skip(self))]
    async fn get_permissions(&self, file_id: &str) -> Result<UserPermissionsList> {
        let path = format!("{}/permissions", file_path(file_id)?);
        let request = self.request(HttpMethod::Get, &path);

        self.send_json(request, file_id).await
    }

    #[instrument(skip(self, permission), fields(role = ?permission.role))]
    async fn add_permission(
        &self,
        file_id: &str,
        permission: &UserPermission,
        send_notification_emails: bool,
    ) -> Result<UserPermission> {
        let path = format!("{}/permissions", file_path(file_id)?);
        let request = self
            .request(HttpMethod::Post, &path)
            .query("sendNotificationEmails", send_notification_emails.to_string())
            .json(permission)?;

        self.send_json(request, file_id).await
    }

    #[instrument(skip(self, permission), fields(role = ?permission.role))]
    async fn update_permission(
        &self,
        file_id: &str,
        permission_id: &str,
        permission: &UserPermission,
    ) -> Result<UserPermission> {
        let path = permission_path(file_id, permission_id)?;
        let request = self
            .request(HttpMethod::Put, &path)
            .json(&PermissionUpdate::from(permission))?;

        self.send_json(request, &path).await
    }

    #[instrument(skip(self))]
    async fn remove_permission(&self, file_id: &str, permission_id: &str) -> Result<()> {
        let path = permission_path(file_id, permission_id)?;
        let request = self.request(HttpMethod::Delete, &path);
        self.send(request, &path).await?;

        Ok(())
    }
}
