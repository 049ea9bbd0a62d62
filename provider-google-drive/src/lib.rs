//! # Google Drive Provider
//!
//! Typed bindings for the Google Drive API v2.
//!
//! ## Overview
//!
//! This module provides:
//! - The [`DriveOperations`] contract, one method per Drive endpoint
//! - [`GoogleDriveConnector`], its implementation over an injected `HttpClient`
//! - A fluent [`DriveFileQueryBuilder`] for file listings
//! - Multipart uploads with forwarded [`UploadParameters`]
//! - Permission management on files
//!
//! Each operation performs exactly one request. Pagination is driven by the
//! caller through the page token returned with every listing.

pub mod connector;
pub mod error;
pub mod operations;
pub mod query;
pub mod types;
pub mod upload;

pub use connector::GoogleDriveConnector;
pub use error::{GoogleDriveError, Result};
pub use operations::DriveOperations;
pub use query::{DriveFileQuery, DriveFileQueryBuilder};
pub use types::{
    AdditionalRole, DriveFile, DriveFileBuilder, DriveFileLabels, DriveFilesPage,
    ParentReference, PermissionRole, PermissionType, UploadParameters, UserPermission,
    UserPermissionsList, Visibility, FOLDER_MIME_TYPE, ROOT_FOLDER_ID,
};
pub use upload::UploadContent;
