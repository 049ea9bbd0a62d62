//! Google Drive API resource types
//!
//! Data structures for the Drive API v2 file, file list and permission
//! resources. Every value is a snapshot of remote state; nothing here is
//! authoritative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use bridge_traits::HttpRequest;

/// MIME type Drive uses to mark folders
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Alias Drive accepts for the user's root folder
pub const ROOT_FOLDER_ID: &str = "root";

/// Google Drive API file resource
///
/// See: https://developers.google.com/drive/api/v2/reference/files#resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// File ID, assigned by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// File name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parent folder references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ParentReference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<DriveFileLabels>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_by_me_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_viewed_by_me_date: Option<DateTime<Utc>>,

    /// Size in bytes, as the decimal string Drive returns (absent for folders
    /// and native Google documents)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5_checksum: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_link: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_link: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_link: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_names: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,

    /// Export formats for native Google documents, keyed by MIME type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_links: Option<HashMap<String, String>>,
}

impl DriveFile {
    /// Start building file metadata for create or upload requests
    pub fn builder() -> DriveFileBuilder {
        DriveFileBuilder::default()
    }

    /// Server-assigned ID, or an empty string for unsaved metadata
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME_TYPE)
    }

    pub fn is_trashed(&self) -> bool {
        self.labels.as_ref().is_some_and(|labels| labels.trashed)
    }

    pub fn is_starred(&self) -> bool {
        self.labels.as_ref().is_some_and(|labels| labels.starred)
    }

    pub fn is_hidden(&self) -> bool {
        self.labels.as_ref().is_some_and(|labels| labels.hidden)
    }

    /// File size in bytes, when Drive reports one
    pub fn size(&self) -> Option<u64> {
        self.file_size.as_deref().and_then(|s| s.parse().ok())
    }

    /// IDs of the parent folders
    pub fn parent_ids(&self) -> impl Iterator<Item = &str> {
        self.parents.iter().map(|parent| parent.id.as_str())
    }
}

/// Boolean flags attached to a file
///
/// `false` flags are omitted when serializing so that metadata sent on
/// create only carries what the caller set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveFileLabels {
    #[serde(default, skip_serializing_if = "is_false")]
    pub starred: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub trashed: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub restricted: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub viewed: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Reference to a parent folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentReference {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_root: Option<bool>,
}

impl ParentReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_root: None,
        }
    }
}

/// Builder for [`DriveFile`] metadata
#[derive(Debug, Default)]
pub struct DriveFileBuilder {
    file: DriveFile,
}

impl DriveFileBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.file.title = Some(title.into());
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.file.mime_type = Some(mime_type.into());
        self
    }

    pub fn folder(self) -> Self {
        self.mime_type(FOLDER_MIME_TYPE)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.file.description = Some(description.into());
        self
    }

    /// Add a parent folder; may be called more than once
    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.file.parents.push(ParentReference::new(parent_id));
        self
    }

    pub fn starred(mut self, starred: bool) -> Self {
        self.file.labels.get_or_insert_with(Default::default).starred = starred;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.file.labels.get_or_insert_with(Default::default).hidden = hidden;
        self
    }

    pub fn build(self) -> DriveFile {
        self.file
    }
}

/// One page of a file listing
///
/// Pagination is driven by the caller: keep requesting with
/// `next_page_token` until it comes back `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFilesPage {
    #[serde(default)]
    pub items: Vec<DriveFile>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl DriveFilesPage {
    /// Drive occasionally returns an empty token on the last page
    pub(crate) fn normalized(mut self) -> Self {
        if self.next_page_token.as_deref().is_some_and(str::is_empty) {
            self.next_page_token = None;
        }
        self
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page_token.is_some()
    }
}

/// Visibility of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Default,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Default => "DEFAULT",
            Visibility::Private => "PRIVATE",
        }
    }
}

/// Options controlling how Drive processes an upload
///
/// Values are forwarded verbatim as query parameters; unset options are
/// left to the server defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadParameters {
    /// Convert to the corresponding Google Docs format
    pub convert: Option<bool>,
    /// Attempt OCR on .jpg, .png, .gif, or .pdf uploads
    pub ocr: Option<bool>,
    /// ISO 639-1 language hint for OCR
    pub ocr_language: Option<String>,
    /// Pin the head revision
    pub pinned: Option<bool>,
    pub timed_text_language: Option<String>,
    pub timed_text_track_name: Option<String>,
    pub use_content_as_indexable_text: Option<bool>,
    pub visibility: Option<Visibility>,
}

impl UploadParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn convert(mut self, convert: bool) -> Self {
        self.convert = Some(convert);
        self
    }

    pub fn ocr(mut self, ocr: bool) -> Self {
        self.ocr = Some(ocr);
        self
    }

    pub fn ocr_language(mut self, language: impl Into<String>) -> Self {
        self.ocr_language = Some(language.into());
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = Some(pinned);
        self
    }

    pub fn timed_text_language(mut self, language: impl Into<String>) -> Self {
        self.timed_text_language = Some(language.into());
        self
    }

    pub fn timed_text_track_name(mut self, name: impl Into<String>) -> Self {
        self.timed_text_track_name = Some(name.into());
        self
    }

    pub fn use_content_as_indexable_text(mut self, value: bool) -> Self {
        self.use_content_as_indexable_text = Some(value);
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub(crate) fn apply(&self, request: HttpRequest) -> HttpRequest {
        request
            .query_opt("convert", self.convert.map(|v| v.to_string()))
            .query_opt("ocr", self.ocr.map(|v| v.to_string()))
            .query_opt("ocrLanguage", self.ocr_language.as_deref())
            .query_opt("pinned", self.pinned.map(|v| v.to_string()))
            .query_opt("timedTextLanguage", self.timed_text_language.as_deref())
            .query_opt("timedTextTrackName", self.timed_text_track_name.as_deref())
            .query_opt(
                "useContentAsIndexableText",
                self.use_content_as_indexable_text.map(|v| v.to_string()),
            )
            .query_opt("visibility", self.visibility.map(|v| v.as_str()))
    }
}

/// Role granted by a permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionRole {
    Owner,
    Writer,
    Reader,
}

/// Additional capabilities layered on a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdditionalRole {
    Commenter,
}

/// Kind of grantee a permission applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    User,
    Group,
    Domain,
    Anyone,
}

/// Access-control entry on a file
///
/// See: https://developers.google.com/drive/api/v2/reference/permissions#resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name of the grantee
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub role: PermissionRole,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub additional_roles: BTreeSet<AdditionalRole>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub permission_type: Option<PermissionType>,

    /// E-mail address or domain of the grantee
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_link: Option<bool>,
}

impl UserPermission {
    pub fn new(role: PermissionRole, permission_type: PermissionType) -> Self {
        Self {
            id: None,
            name: None,
            role,
            additional_roles: BTreeSet::new(),
            permission_type: Some(permission_type),
            value: None,
            email_address: None,
            with_link: None,
        }
    }

    /// Permission for a single user identified by e-mail
    pub fn for_user(role: PermissionRole, email: impl Into<String>) -> Self {
        Self::new(role, PermissionType::User).with_value(email)
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_additional_role(mut self, role: AdditionalRole) -> Self {
        self.additional_roles.insert(role);
        self
    }

    pub fn with_link(mut self, with_link: bool) -> Self {
        self.with_link = Some(with_link);
        self
    }

    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

/// Body sent when updating a permission; only the roles are mutable
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PermissionUpdate<'a> {
    pub role: PermissionRole,
    pub additional_roles: &'a BTreeSet<AdditionalRole>,
}

impl<'a> From<&'a UserPermission> for PermissionUpdate<'a> {
    fn from(permission: &'a UserPermission) -> Self {
        Self {
            role: permission.role,
            additional_roles: &permission.additional_roles,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PermissionListResource {
    #[serde(default)]
    items: Vec<UserPermission>,
}

/// Permissions attached to a file, keyed by permission ID
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "PermissionListResource")]
pub struct UserPermissionsList {
    permissions: HashMap<String, UserPermission>,
}

impl From<PermissionListResource> for UserPermissionsList {
    fn from(resource: PermissionListResource) -> Self {
        resource.items.into_iter().collect()
    }
}

impl FromIterator<UserPermission> for UserPermissionsList {
    /// Entries without an ID cannot be addressed and are dropped
    fn from_iter<I: IntoIterator<Item = UserPermission>>(iter: I) -> Self {
        let permissions = iter
            .into_iter()
            .filter_map(|permission| permission.id.clone().map(|id| (id, permission)))
            .collect();
        Self { permissions }
    }
}

impl UserPermissionsList {
    pub fn get(&self, permission_id: &str) -> Option<&UserPermission> {
        self.permissions.get(permission_id)
    }

    pub fn contains(&self, permission_id: &str) -> bool {
        self.permissions.contains_key(permission_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserPermission> {
        self.permissions.values()
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

impl IntoIterator for UserPermissionsList {
    type Item = UserPermission;
    type IntoIter = std::collections::hash_map::IntoValues<String, UserPermission>;

    fn into_iter(self) -> Self::IntoIter {
        self.permissions.into_values()
    }
}

/// Google API error envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
}
