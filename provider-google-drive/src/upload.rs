//! Multipart upload bodies
//!
//! Drive's `uploadType=multipart` takes a `multipart/related` body with the
//! JSON metadata first and the raw content second.

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use uuid::Uuid;

use crate::error::{GoogleDriveError, Result};
use crate::types::DriveFile;

/// Content of a file to upload
///
/// Owns the bytes outright. Building it from a reader drains the reader
/// once; the content is then moved into the request.
#[derive(Debug, Clone)]
pub struct UploadContent {
    content_type: String,
    data: Bytes,
}

impl UploadContent {
    pub fn new(content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Read `reader` to the end and take ownership of everything it produced
    pub async fn from_reader<R>(mut reader: R, content_type: impl Into<String>) -> Result<Self>
    where
        R: AsyncRead + Unpin,
    {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).await?;
        Ok(Self::new(content_type, buffer))
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Encoded multipart body plus the header value announcing its boundary
#[derive(Debug)]
pub(crate) struct MultipartBody {
    pub content_type: String,
    pub body: Bytes,
}

impl MultipartBody {
    pub fn new(metadata: &DriveFile, content: UploadContent) -> Result<Self> {
        let boundary = format!("social_google_{}", Uuid::new_v4().simple());
        Self::with_boundary(metadata, content, &boundary)
    }

    pub fn with_boundary(
        metadata: &DriveFile,
        content: UploadContent,
        boundary: &str,
    ) -> Result<Self> {
        let metadata = serde_json::to_vec(metadata).map_err(|e| {
            GoogleDriveError::Parse(format!("Failed to serialize upload metadata: {}", e))
        })?;

        let mut body = BytesMut::with_capacity(metadata.len() + content.data.len() + 256);

        body.put_slice(format!("--{}\r\n", boundary).as_bytes());
        body.put_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
        body.put_slice(&metadata);
        body.put_slice(b"\r\n");

        body.put_slice(format!("--{}\r\n", boundary).as_bytes());
        body.put_slice(format!("Content-Type: {}\r\n\r\n", content.content_type).as_bytes());
        body.put_slice(&content.data);
        body.put_slice(b"\r\n");

        body.put_slice(format!("--{}--\r\n", boundary).as_bytes());

        Ok(Self {
            content_type: format!("multipart/related; boundary={}", boundary),
            body: body.freeze(),
        })
    }
}
