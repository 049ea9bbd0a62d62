//! Sender for GData Atom writes

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_runtime::config::{ClientConfig, DEFAULT_GDATA_VERSION};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::element::Element;
use crate::error::{GDataError, Result};

const ATOM_CONTENT_TYPE: &str = "application/atom+xml";

/// Posts, puts and deletes Atom entries on legacy GData feeds
///
/// Like the Drive connector it performs exactly one request per call and
/// leaves retry to the transport.
pub struct GDataClient {
    http_client: Arc<dyn HttpClient>,
    access_token: String,
    gdata_version: String,
    request_timeout: Option<Duration>,
}

impl GDataClient {
    pub fn new(http_client: Arc<dyn HttpClient>, access_token: String) -> Self {
        Self {
            http_client,
            access_token,
            gdata_version: DEFAULT_GDATA_VERSION.to_string(),
            request_timeout: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            http_client: Arc::clone(&config.http_client),
            access_token: config.access_token.clone(),
            gdata_version: config.gdata_version.clone(),
            request_timeout: Some(config.request_timeout),
        }
    }

    /// Create `entry` in the feed at `feed_url`, returning the stored entry
    #[instrument(skip(self, entry))]
    pub async fn insert_entry(&self, feed_url: &str, entry: &Element) -> Result<Element> {
        let request = with_entry(self.request(HttpMethod::Post, feed_url), entry)?;
        let response = self.send(request, feed_url).await?;

        info!("Inserted GData entry");
        parse_entry(&response)
    }

    /// Replace the entry at `edit_url`
    ///
    /// With an `etag` the write only succeeds if the entry is unchanged
    /// since it was read; otherwise it fails with `PreconditionFailed`.
    #[instrument(skip(self, entry))]
    pub async fn update_entry(
        &self,
        edit_url: &str,
        entry: &Element,
        etag: Option<&str>,
    ) -> Result<Element> {
        let request = with_etag(self.request(HttpMethod::Put, edit_url), etag);
        let request = with_entry(request, entry)?;
        let response = self.send(request, edit_url).await?;

        info!("Updated GData entry");
        parse_entry(&response)
    }

    #[instrument(skip(self))]
    pub async fn delete_entry(&self, edit_url: &str, etag: Option<&str>) -> Result<()> {
        let request = with_etag(self.request(HttpMethod::Delete, edit_url), etag);
        self.send(request, edit_url).await?;

        info!("Deleted GData entry");
        Ok(())
    }

    fn request(&self, method: HttpMethod, url: &str) -> HttpRequest {
        let request = HttpRequest::new(method, url)
            .bearer_token(&self.access_token)
            .header("GData-Version", self.gdata_version.as_str());

        match self.request_timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    async fn send(&self, request: HttpRequest, resource: &str) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "Sending GData request");

        let response = self.http_client.execute(request).await?;

        if response.is_success() {
            Ok(response)
        } else {
            warn!(status = response.status, "GData request failed");
            Err(GDataError::from_status(
                response.status,
                &response.body,
                resource,
            ))
        }
    }
}

fn with_etag(request: HttpRequest, etag: Option<&str>) -> HttpRequest {
    match etag {
        Some(etag) => request.header("If-Match", etag),
        None => request,
    }
}

fn with_entry(request: HttpRequest, entry: &Element) -> Result<HttpRequest> {
    let body = Bytes::from(entry.to_document()?);
    Ok(request.header("Content-Type", ATOM_CONTENT_TYPE).body(body))
}

fn parse_entry(response: &HttpResponse) -> Result<Element> {
    let text = std::str::from_utf8(&response.body).map_err(GDataError::xml)?;
    Element::parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ElementBuilder;
    use crate::namespaces::ATOM_NAMESPACE;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    const STORED_ENTRY: &str = "<entry xmlns='http://www.w3.org/2005/Atom' \
        xmlns:gd='http://schemas.google.com/g/2005' gd:etag='\"Q3k\"'>\
        <id>http://example.com/feeds/entries/1</id><title>Report</title></entry>";

    fn response(status: u16, body: &str) -> BridgeResult<HttpResponse> {
        Ok(HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        })
    }

    fn entry() -> Element {
        ElementBuilder::new_atom_entry_builder()
            .set_title("Report")
            .into_element()
    }

    fn client(mock_http: MockHttpClient) -> GDataClient {
        GDataClient::new(Arc::new(mock_http), "gdata-token".to_string())
    }

    #[tokio::test]
    async fn test_insert_entry_posts_atom() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Post);
            assert_eq!(req.url, "https://example.com/feeds/entries");
            assert_eq!(
                req.headers.get("Content-Type").map(String::as_str),
                Some("application/atom+xml")
            );
            assert_eq!(req.headers.get("GData-Version").map(String::as_str), Some("3.0"));
            assert_eq!(
                req.headers.get("Authorization").map(String::as_str),
                Some("Bearer gdata-token")
            );

            let body = String::from_utf8(req.body.clone().unwrap().to_vec()).unwrap();
            assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
            assert!(body.ends_with(
                "<entry xmlns=\"http://www.w3.org/2005/Atom\"><title>Report</title></entry>"
            ));

            response(201, STORED_ENTRY)
        });

        let stored = client(mock_http)
            .insert_entry("https://example.com/feeds/entries", &entry())
            .await
            .unwrap();

        assert_eq!(stored.namespace(), ATOM_NAMESPACE);
        assert_eq!(stored.child("id").map(Element::text).as_deref(), Some("http://example.com/feeds/entries/1"));
    }

    #[tokio::test]
    async fn test_update_entry_sends_if_match() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Put);
            assert_eq!(req.headers.get("If-Match").map(String::as_str), Some("\"Q3k\""));
            assert_eq!(
                req.headers.get("Content-Type").map(String::as_str),
                Some("application/atom+xml")
            );
            response(200, STORED_ENTRY)
        });

        let updated = client(mock_http)
            .update_entry("https://example.com/feeds/entries/1", &entry(), Some("\"Q3k\""))
            .await
            .unwrap();

        assert_eq!(updated.attribute("etag"), Some("\"Q3k\""));
    }

    #[tokio::test]
    async fn test_update_entry_stale_etag() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| response(412, "Etags mismatch"));

        let result = client(mock_http)
            .update_entry("https://example.com/feeds/entries/1", &entry(), Some("\"old\""))
            .await;

        assert!(matches!(result, Err(GDataError::PreconditionFailed(_))));
    }

    #[tokio::test]
    async fn test_delete_entry_without_etag() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Delete);
            assert!(!req.headers.contains_key("If-Match"));
            assert!(!req.headers.contains_key("Content-Type"));
            assert!(req.body.is_none());
            response(200, "")
        });

        client(mock_http)
            .delete_entry("https://example.com/feeds/entries/1", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rejected_entry_is_invalid_argument() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| response(400, "Entry must contain a title"));

        let result = client(mock_http)
            .insert_entry("https://example.com/feeds/entries", &entry())
            .await;

        match result {
            Err(GDataError::InvalidArgument(message)) => {
                assert_eq!(message, "Entry must contain a title")
            }
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_missing_entry() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| response(404, "Entry not found"));

        match client(mock_http)
            .delete_entry("https://example.com/feeds/entries/9", None)
            .await
        {
            Err(GDataError::NotFound { resource }) => {
                assert_eq!(resource, "https://example.com/feeds/entries/9")
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::OperationFailed("connection reset".to_string())));

        let result = client(mock_http)
            .insert_entry("https://example.com/feeds/entries", &entry())
            .await;

        assert!(matches!(result, Err(GDataError::Transport(_))));
    }

    #[tokio::test]
    async fn test_malformed_response_is_xml_error() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| response(201, "<entry><title>"));

        let result = client(mock_http)
            .insert_entry("https://example.com/feeds/entries", &entry())
            .await;

        assert!(matches!(result, Err(GDataError::Xml(_))));
    }
}
