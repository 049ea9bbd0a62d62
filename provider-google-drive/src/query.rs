//! File listing queries
//!
//! Builds the Drive `q` search expression and listing parameters. The
//! expression language belongs to the remote service; this module only
//! assembles clauses and quotes literals.

use chrono::{DateTime, SecondsFormat, Utc};

use bridge_traits::HttpRequest;

use crate::error::Result;
use crate::operations::DriveOperations;
use crate::types::{DriveFilesPage, FOLDER_MIME_TYPE, ROOT_FOLDER_ID};

/// A fully built file listing request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriveFileQuery {
    clauses: Vec<String>,
    max_results: Option<u32>,
    page_token: Option<String>,
    order_by: Option<String>,
}

impl DriveFileQuery {
    /// Direct children of a folder, excluding trashed items
    pub fn children_of(parent_id: &str, page_token: Option<&str>) -> Self {
        DriveFileQueryBuilder::detached()
            .parent_is(parent_id)
            .trashed(false)
            .from_page(page_token)
            .build()
    }

    /// Everything in the trash
    pub fn trash(page_token: Option<&str>) -> Self {
        DriveFileQueryBuilder::detached()
            .trashed(true)
            .from_page(page_token)
            .build()
    }

    /// The `q` expression, or `None` when no filter was set
    pub fn expression(&self) -> Option<String> {
        if self.clauses.is_empty() {
            None
        } else {
            Some(self.clauses.join(" and "))
        }
    }

    pub fn page_token(&self) -> Option<&str> {
        self.page_token.as_deref()
    }

    pub(crate) fn apply(&self, request: HttpRequest) -> HttpRequest {
        request
            .query_opt("q", self.expression())
            .query_opt("maxResults", self.max_results.map(|n| n.to_string()))
            .query_opt("orderBy", self.order_by.as_deref())
            .query_opt("pageToken", self.page_token.as_deref())
    }
}

/// Fluent builder for file listings
///
/// Obtained from [`DriveOperations::drive_file_query`]; `get_page` runs the
/// listing through the operations that created it.
///
/// ```ignore
/// let page = drive
///     .drive_file_query()
///     .parent_is("root")
///     .title_contains("invoice")
///     .not_folder()
///     .max_results(50)
///     .get_page()
///     .await?;
/// ```
pub struct DriveFileQueryBuilder<'a> {
    operations: Option<&'a dyn DriveOperations>,
    query: DriveFileQuery,
}

impl<'a> DriveFileQueryBuilder<'a> {
    pub fn new(operations: &'a dyn DriveOperations) -> Self {
        Self {
            operations: Some(operations),
            query: DriveFileQuery::default(),
        }
    }

    fn detached() -> Self {
        Self {
            operations: None,
            query: DriveFileQuery::default(),
        }
    }

    fn clause(mut self, clause: String) -> Self {
        self.query.clauses.push(clause);
        self
    }

    /// Files whose parents include `parent_id` ("root" for the root folder)
    pub fn parent_is(self, parent_id: &str) -> Self {
        let clause = format!("'{}' in parents", escape_literal(parent_id));
        self.clause(clause)
    }

    pub fn in_root(self) -> Self {
        self.parent_is(ROOT_FOLDER_ID)
    }

    pub fn title_is(self, title: &str) -> Self {
        let clause = format!("title = '{}'", escape_literal(title));
        self.clause(clause)
    }

    pub fn title_contains(self, text: &str) -> Self {
        let clause = format!("title contains '{}'", escape_literal(text));
        self.clause(clause)
    }

    pub fn full_text_contains(self, text: &str) -> Self {
        let clause = format!("fullText contains '{}'", escape_literal(text));
        self.clause(clause)
    }

    pub fn mime_type_is(self, mime_type: &str) -> Self {
        let clause = format!("mimeType = '{}'", escape_literal(mime_type));
        self.clause(clause)
    }

    pub fn is_folder(self) -> Self {
        self.mime_type_is(FOLDER_MIME_TYPE)
    }

    pub fn not_folder(self) -> Self {
        let clause = format!("mimeType != '{}'", FOLDER_MIME_TYPE);
        self.clause(clause)
    }

    pub fn trashed(self, trashed: bool) -> Self {
        self.clause(format!("trashed = {}", trashed))
    }

    pub fn starred(self, starred: bool) -> Self {
        self.clause(format!("starred = {}", starred))
    }

    pub fn hidden(self, hidden: bool) -> Self {
        self.clause(format!("hidden = {}", hidden))
    }

    pub fn modified_after(self, date: DateTime<Utc>) -> Self {
        self.clause(format!("modifiedDate > '{}'", format_date(date)))
    }

    pub fn modified_before(self, date: DateTime<Utc>) -> Self {
        self.clause(format!("modifiedDate < '{}'", format_date(date)))
    }

    /// Raw clause in the Drive query language, AND-ed with the others
    pub fn matching(self, expression: impl Into<String>) -> Self {
        self.clause(expression.into())
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.query.max_results = Some(max_results);
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.query.order_by = Some(order_by.into());
        self
    }

    /// Continue from a token returned by a previous page; `None` or an empty
    /// token starts from the first page
    pub fn from_page(mut self, page_token: Option<&str>) -> Self {
        self.query.page_token = page_token
            .filter(|token| !token.is_empty())
            .map(str::to_string);
        self
    }

    pub fn build(self) -> DriveFileQuery {
        self.query
    }

    /// Execute the listing and return one page
    pub async fn get_page(self) -> Result<DriveFilesPage> {
        match self.operations {
            Some(operations) => operations.list_files(&self.query).await,
            None => Err(crate::error::GoogleDriveError::InvalidArgument(
                "query builder is not bound to a Drive client".to_string(),
            )),
        }
    }
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::HttpMethod;
    use chrono::TimeZone;

    #[test]
    fn test_children_query() {
        let query = DriveFileQuery::children_of("root", None);

        assert_eq!(
            query.expression().as_deref(),
            Some("'root' in parents and trashed = false")
        );
        assert_eq!(query.page_token(), None);
    }

    #[test]
    fn test_trash_query_with_token() {
        let query = DriveFileQuery::trash(Some("token-2"));

        assert_eq!(query.expression().as_deref(), Some("trashed = true"));
        assert_eq!(query.page_token(), Some("token-2"));
    }

    #[test]
    fn test_empty_token_means_first_page() {
        let query = DriveFileQuery::trash(Some(""));
        assert_eq!(query.page_token(), None);
    }

    #[test]
    fn test_literals_are_escaped() {
        let query = DriveFileQueryBuilder::detached()
            .title_is("Jo's \\ notes")
            .build();

        assert_eq!(
            query.expression().as_deref(),
            Some("title = 'Jo\\'s \\\\ notes'")
        );
    }

    #[test]
    fn test_combined_filters() {
        let after = Utc.with_ymd_and_hms(2012, 6, 4, 12, 0, 0).unwrap();
        let query = DriveFileQueryBuilder::detached()
            .in_root()
            .not_folder()
            .starred(true)
            .modified_after(after)
            .max_results(25)
            .order_by("modifiedDate desc")
            .build();

        assert_eq!(
            query.expression().as_deref(),
            Some(
                "'root' in parents and mimeType != 'application/vnd.google-apps.folder' \
                 and starred = true and modifiedDate > '2012-06-04T12:00:00Z'"
            )
        );

        let request = query.apply(HttpRequest::new(HttpMethod::Get, "https://example.com/files"));
        assert!(request.url.contains("maxResults=25"));
        assert!(request.url.contains("orderBy=modifiedDate%20desc"));
        assert!(!request.url.contains("pageToken"));
    }

    #[test]
    fn test_unfiltered_query_has_no_expression() {
        let query = DriveFileQueryBuilder::detached().max_results(10).build();
        assert_eq!(query.expression(), None);
    }

    #[tokio::test]
    async fn test_detached_builder_cannot_execute() {
        let result = DriveFileQueryBuilder::detached().get_page().await;
        assert!(matches!(
            result,
            Err(crate::error::GoogleDriveError::InvalidArgument(_))
        ));
    }
}
