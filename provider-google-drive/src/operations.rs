//! Google Drive operations contract
//!
//! Requires OAuth scope(s) from the following:
//! - `https://www.googleapis.com/auth/drive.file`
//! - `https://www.googleapis.com/auth/drive`
//! - `https://www.googleapis.com/auth/drive.apps.readonly`
//! - `https://www.googleapis.com/auth/drive.readonly`
//! - `https://www.googleapis.com/auth/drive.readonly.metadata`

use async_trait::async_trait;

use crate::error::Result;
use crate::query::{DriveFileQuery, DriveFileQueryBuilder};
use crate::types::{DriveFile, DriveFilesPage, UploadParameters, UserPermission, UserPermissionsList};
use crate::upload::UploadContent;

/// One method per Drive endpoint
///
/// Every call is a single remote round trip. Failures come back exactly as
/// the service reported them; callers decide whether to retry.
#[async_trait]
pub trait DriveOperations: Send + Sync {
    /// Retrieves a file by its ID
    async fn get_file(&self, id: &str) -> Result<DriveFile>;

    /// Creates a query builder bound to these operations
    fn drive_file_query(&self) -> DriveFileQueryBuilder<'_>;

    /// Runs a listing built with [`DriveFileQueryBuilder`]
    async fn list_files(&self, query: &DriveFileQuery) -> Result<DriveFilesPage>;

    /// Files and folders under the root folder
    async fn get_root_files(&self, page_token: Option<&str>) -> Result<DriveFilesPage>;

    /// Files and folders under `parent` (a folder ID or "root")
    async fn get_files(&self, parent: &str, page_token: Option<&str>) -> Result<DriveFilesPage>;

    /// Trashed files and folders
    async fn get_trashed_files(&self, page_token: Option<&str>) -> Result<DriveFilesPage>;

    /// Moves a file to trash
    async fn trash(&self, id: &str) -> Result<DriveFile>;

    /// Restores a file from trash
    async fn untrash(&self, id: &str) -> Result<DriveFile>;

    async fn star(&self, id: &str) -> Result<DriveFile>;

    async fn unstar(&self, id: &str) -> Result<DriveFile>;

    async fn hide(&self, id: &str) -> Result<DriveFile>;

    async fn unhide(&self, id: &str) -> Result<DriveFile>;

    /// Permanently deletes a file, skipping the trash
    async fn delete(&self, id: &str) -> Result<()>;

    /// Uploads content and metadata in one multipart request
    async fn upload(
        &self,
        content: UploadContent,
        metadata: &DriveFile,
        parameters: &UploadParameters,
    ) -> Result<DriveFile>;

    /// Creates a file record without content
    async fn create_file_metadata(&self, metadata: &DriveFile) -> Result<DriveFile>;

    /// Creates a folder under `parent_id` (a folder ID or "root")
    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<DriveFile>;

    async fn get_permissions(&self, file_id: &str) -> Result<UserPermissionsList>;

    /// Grants a permission; `send_notification_emails` asks Drive to e-mail the grantee
    async fn add_permission(
        &self,
        file_id: &str,
        permission: &UserPermission,
        send_notification_emails: bool,
    ) -> Result<UserPermission>;

    /// Replaces the role and additional roles of an existing permission
    async fn update_permission(
        &self,
        file_id: &str,
        permission_id: &str,
        permission: &UserPermission,
    ) -> Result<UserPermission>;

    async fn remove_permission(&self, file_id: &str, permission_id: &str) -> Result<()>;
}
