//! End-to-end scenarios against an in-memory Drive service

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use provider_google_drive::{
    DriveFile, DriveOperations, GoogleDriveConnector, GoogleDriveError, UploadContent,
    UploadParameters,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

const BASE_URL: &str = "http://drive.test/drive/v2";
const UPLOAD_URL: &str = "http://drive.test/upload/drive/v2";
const PAGE_SIZE: usize = 2;

#[derive(Default)]
struct State {
    files: Vec<Value>,
    requests: usize,
    next_id: usize,
}

/// Minimal Drive v2 server: listings, labels, trash, delete, create and upload
#[derive(Default)]
struct FakeDrive {
    state: Mutex<State>,
}

impl FakeDrive {
    fn seeded() -> Arc<Self> {
        let drive = Self::default();
        {
            let mut state = drive.state.lock().unwrap();
            state.files = vec![
                json!({ "id": "a", "title": "a.txt", "parents": [{ "id": "root" }] }),
                json!({ "id": "b", "title": "b.txt", "parents": [{ "id": "root" }] }),
                json!({ "id": "c", "title": "c.txt", "parents": [{ "id": "root" }] }),
                json!({ "id": "old", "title": "old.txt", "parents": [{ "id": "root" }],
                        "labels": { "trashed": true } }),
            ];
        }
        Arc::new(drive)
    }

    fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests
    }
}

fn respond(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: Bytes::from(body.to_string()),
    }
}

fn not_found(id: &str) -> HttpResponse {
    respond(
        404,
        json!({ "error": { "code": 404, "message": format!("File not found: {}", id) } }),
    )
}

fn label(file: &Value, name: &str) -> bool {
    file["labels"][name].as_bool().unwrap_or(false)
}

fn has_parent(file: &Value, parent: &str) -> bool {
    file["parents"]
        .as_array()
        .is_some_and(|parents| parents.iter().any(|p| p["id"] == parent))
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| {
            (
                urlencoding::decode(k).unwrap().into_owned(),
                urlencoding::decode(v).unwrap().into_owned(),
            )
        })
        .collect()
}

impl State {
    fn position(&self, id: &str) -> Option<usize> {
        self.files.iter().position(|file| file["id"] == id)
    }

    fn list(&self, params: &HashMap<String, String>) -> HttpResponse {
        let q = params.get("q").map(String::as_str).unwrap_or_default();
        let matching: Vec<&Value> = if q == "trashed = true" {
            self.files.iter().filter(|f| label(f, "trashed")).collect()
        } else if let Some(rest) = q.strip_suffix(" in parents and trashed = false") {
            let parent = rest.trim_matches('\'');
            self.files
                .iter()
                .filter(|f| has_parent(f, parent) && !label(f, "trashed"))
                .collect()
        } else {
            return respond(400, json!({ "error": { "message": "Invalid query" } }));
        };

        let offset = match params.get("pageToken") {
            None => 0,
            Some(token) => match token.strip_prefix("offset-").and_then(|n| n.parse().ok()) {
                Some(offset) => offset,
                None => return respond(400, json!({ "error": { "message": "Invalid Value" } })),
            },
        };

        let end = (offset + PAGE_SIZE).min(matching.len());
        let items: Vec<&Value> = matching[offset.min(end)..end].to_vec();
        let mut body = json!({ "kind": "drive#fileList", "items": items });
        if end < matching.len() {
            body["nextPageToken"] = json!(format!("offset-{}", end));
        }
        respond(200, body)
    }

    fn create(&mut self, mut file: Value, size: Option<usize>) -> HttpResponse {
        self.next_id += 1;
        file["id"] = json!(format!("new-{}", self.next_id));
        if let Some(size) = size {
            file["fileSize"] = json!(size.to_string());
        }
        self.files.push(file.clone());
        respond(200, file)
    }

    fn update_labels(&mut self, id: &str, labels: &Value) -> HttpResponse {
        let Some(index) = self.position(id) else {
            return not_found(id);
        };
        let file = &mut self.files[index];
        if !file["labels"].is_object() {
            file["labels"] = json!({});
        }
        if let Some(changes) = labels.as_object() {
            for (name, value) in changes {
                file["labels"][name] = value.clone();
            }
        }
        respond(200, file.clone())
    }
}

/// Splits `metadata` and content out of a multipart/related body
fn split_multipart(body: &str) -> (Value, usize) {
    let parts: Vec<&str> = body.split("\r\n\r\n").collect();
    let metadata = parts[1].split("\r\n").next().unwrap();
    let content = &parts[2][..parts[2].rfind("\r\n--").unwrap()];
    (serde_json::from_str(metadata).unwrap(), content.len())
}

#[async_trait]
impl HttpClient for FakeDrive {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        let mut state = self.state.lock().unwrap();
        state.requests += 1;

        let (path, query) = request
            .url
            .split_once('?')
            .unwrap_or((request.url.as_str(), ""));
        let params = parse_query(query);
        let body = request
            .body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default();

        if let Some(path) = path.strip_prefix(UPLOAD_URL) {
            assert_eq!(path, "/files");
            assert_eq!(params.get("uploadType").map(String::as_str), Some("multipart"));
            let (metadata, size) = split_multipart(&body);
            return Ok(state.create(metadata, Some(size)));
        }

        let path = path
            .strip_prefix(BASE_URL)
            .ok_or_else(|| BridgeError::OperationFailed(format!("unexpected URL {}", request.url)))?;
        let segments: Vec<String> = path
            .trim_start_matches('/')
            .split('/')
            .map(|s| urlencoding::decode(s).unwrap().into_owned())
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        let response = match (request.method, segments.as_slice()) {
            (HttpMethod::Get, ["files"]) => state.list(&params),
            (HttpMethod::Post, ["files"]) => {
                state.create(serde_json::from_str(&body).unwrap(), None)
            }
            (HttpMethod::Get, ["files", id]) => match state.position(id) {
                Some(index) => respond(200, state.files[index].clone()),
                None => not_found(id),
            },
            (HttpMethod::Patch, ["files", id]) => {
                let patch: Value = serde_json::from_str(&body).unwrap();
                state.update_labels(id, &patch["labels"])
            }
            (HttpMethod::Delete, ["files", id]) => match state.position(id) {
                Some(index) => {
                    state.files.remove(index);
                    respond(204, Value::Null)
                }
                None => not_found(id),
            },
            (HttpMethod::Post, ["files", id, "trash"]) => {
                state.update_labels(id, &json!({ "trashed": true }))
            }
            (HttpMethod::Post, ["files", id, "untrash"]) => {
                state.update_labels(id, &json!({ "trashed": false }))
            }
            _ => respond(405, json!({ "error": { "message": "Method not allowed" } })),
        };

        Ok(response)
    }
}

fn connect(drive: &Arc<FakeDrive>) -> GoogleDriveConnector {
    let http_client: Arc<dyn HttpClient> = drive.clone();
    GoogleDriveConnector::new(http_client, "scenario-token".to_string())
        .with_endpoints(BASE_URL, UPLOAD_URL)
}

fn ids(files: &[DriveFile]) -> Vec<&str> {
    files.iter().map(DriveFile::id).collect()
}

#[tokio::test]
async fn test_pagination_visits_every_file_once() {
    let fake = FakeDrive::seeded();
    let drive = connect(&fake);

    let mut seen = Vec::new();
    let mut token: Option<String> = None;
    let mut pages = 0;
    loop {
        let page = drive.get_root_files(token.as_deref()).await.unwrap();
        pages += 1;
        seen.extend(page.items.iter().map(|f| f.id().to_string()));
        token = page.next_page_token;
        if token.is_none() {
            break;
        }
    }

    assert_eq!(seen, vec!["a", "b", "c"]);
    assert_eq!(seen.iter().collect::<HashSet<_>>().len(), seen.len());
    assert_eq!(pages, 2);
    assert_eq!(fake.request_count(), pages);
}

#[tokio::test]
async fn test_query_builder_walks_pages() {
    let fake = FakeDrive::seeded();
    let drive = connect(&fake);

    let first = drive
        .drive_file_query()
        .in_root()
        .trashed(false)
        .get_page()
        .await
        .unwrap();
    assert_eq!(ids(&first.items), vec!["a", "b"]);

    let second = drive
        .drive_file_query()
        .in_root()
        .trashed(false)
        .from_page(first.next_page_token.as_deref())
        .get_page()
        .await
        .unwrap();
    assert_eq!(ids(&second.items), vec!["c"]);
    assert!(!second.has_next_page());
}

#[tokio::test]
async fn test_star_is_idempotent() {
    let fake = FakeDrive::seeded();
    let drive = connect(&fake);

    assert!(drive.star("a").await.unwrap().is_starred());
    assert!(drive.star("a").await.unwrap().is_starred());
    assert!(drive.get_file("a").await.unwrap().is_starred());

    assert!(!drive.unstar("a").await.unwrap().is_starred());
    assert_eq!(fake.request_count(), 4);
}

#[tokio::test]
async fn test_hide_and_unhide() {
    let fake = FakeDrive::seeded();
    let drive = connect(&fake);

    assert!(drive.hide("b").await.unwrap().is_hidden());
    assert!(!drive.unhide("b").await.unwrap().is_hidden());
}

#[tokio::test]
async fn test_trash_moves_file_between_listings() {
    let fake = FakeDrive::seeded();
    let drive = connect(&fake);

    let trashed = drive.trash("c").await.unwrap();
    assert!(trashed.is_trashed());

    let trash = drive.get_trashed_files(None).await.unwrap();
    assert_eq!(ids(&trash.items), vec!["c", "old"]);

    let restored = drive.untrash("old").await.unwrap();
    assert!(!restored.is_trashed());

    let root = drive.get_files("root", None).await.unwrap();
    let next = drive
        .get_files("root", root.next_page_token.as_deref())
        .await
        .unwrap();
    let mut all = ids(&root.items);
    all.extend(ids(&next.items));
    assert_eq!(all, vec!["a", "b", "old"]);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let fake = FakeDrive::seeded();
    let drive = connect(&fake);

    drive.delete("b").await.unwrap();

    match drive.get_file("b").await {
        Err(GoogleDriveError::NotFound { resource }) => assert_eq!(resource, "b"),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert!(drive.delete("b").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_create_folder_and_upload_into_it() {
    let fake = FakeDrive::seeded();
    let drive = connect(&fake);

    let folder = drive.create_folder("root", "Reports").await.unwrap();
    assert!(folder.is_folder());
    assert_eq!(folder.title.as_deref(), Some("Reports"));
    assert!(drive.get_files(folder.id(), None).await.unwrap().items.is_empty());

    let metadata = DriveFile::builder()
        .title("q1.csv")
        .mime_type("text/csv")
        .parent(folder.id())
        .build();
    let uploaded = drive
        .upload(
            UploadContent::new("text/csv", "month,total\njan,10\n"),
            &metadata,
            &UploadParameters::new().convert(false),
        )
        .await
        .unwrap();

    assert_eq!(uploaded.size(), Some(19));
    assert_eq!(uploaded.parent_ids().collect::<Vec<_>>(), vec![folder.id()]);

    let children = drive.get_files(folder.id(), None).await.unwrap();
    assert_eq!(ids(&children.items), vec![uploaded.id()]);
}

#[tokio::test]
async fn test_invalid_page_token_is_rejected() {
    let fake = FakeDrive::seeded();
    let drive = connect(&fake);

    let result = drive.get_root_files(Some("not-a-token")).await;

    assert!(matches!(result, Err(GoogleDriveError::InvalidArgument(_))));
    assert_eq!(fake.request_count(), 1);
}
