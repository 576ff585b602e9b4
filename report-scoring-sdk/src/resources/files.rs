//! Files resource client
//!
//! Upload, list, preview and remove files stored by the backend.

use crate::client::{HttpClient, MessageResponse};
use crate::error::{SdkError, SdkResult};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::segment;

/// Client for file operations
#[derive(Debug, Clone)]
pub struct FilesClient {
    client: Arc<HttpClient>,
}

impl FilesClient {
    /// Create a new files client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Upload a file from disk as the multipart field `file`
    pub async fn upload(&self, path: impl AsRef<Path>) -> SdkResult<UploadedFile> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                SdkError::InvalidRequest(format!("{} has no usable file name", path.display()))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        self.upload_bytes(filename, bytes).await
    }

    /// Upload in-memory content as the multipart field `file`
    pub async fn upload_bytes(
        &self,
        filename: impl Into<String>,
        bytes: Vec<u8>,
    ) -> SdkResult<UploadedFile> {
        let filename = filename.into();
        info!(%filename, size = bytes.len(), "Uploading file");
        let part = Part::bytes(bytes).file_name(filename);
        let form = Form::new().part("file", part);
        self.client.post_multipart("/api/upload", form).await
    }

    /// URL of the backend preview for `filename`. No request is made.
    pub fn preview_url(&self, filename: &str) -> String {
        self.client
            .url(&format!("/api/preview/{}", segment(filename)))
    }

    /// List uploaded files, newest first
    pub async fn list(&self) -> SdkResult<Vec<FileEntry>> {
        self.client.get("/api/files").await
    }

    /// Delete an uploaded file by its uid
    pub async fn delete(&self, uid: &str) -> SdkResult<MessageResponse> {
        self.client
            .delete(&format!("/api/files/{}", segment(uid)))
            .await
    }

    /// Download the stored content of an uploaded file
    pub async fn download(&self, filename: &str) -> SdkResult<Vec<u8>> {
        self.client
            .get_bytes(&format!("/api/files/download/{}", segment(filename)))
            .await
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Stored name, with the upload timestamp appended
    pub filename: String,
    pub original_name: String,
    #[serde(default)]
    pub path: Option<String>,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
    pub upload_time: String,
}

/// An entry of the uploaded file listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub uid: String,
    pub filename: String,
    pub original_name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
    pub upload_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SdkConfig;
    use pretty_assertions::assert_eq;

    fn files() -> FilesClient {
        let http = HttpClient::new(SdkConfig::new("http://localhost:5000")).unwrap();
        FilesClient::new(Arc::new(http))
    }

    #[test]
    fn test_preview_url_plain_name() {
        assert_eq!(
            files().preview_url("scene.png"),
            "http://localhost:5000/api/preview/scene.png"
        );
    }

    #[test]
    fn test_preview_url_encodes_reserved_characters_once() {
        let name = "a b/c?.png";
        let url = files().preview_url(name);

        assert_eq!(url, "http://localhost:5000/api/preview/a%20b%2Fc%3F.png");

        let encoded = url.rsplit('/').next().unwrap();
        assert_eq!(urlencoding::decode(encoded).unwrap(), name);
    }

    #[test]
    fn test_preview_url_escapes_parentheses_and_bang() {
        assert_eq!(
            files().preview_url("fire (1)!.png"),
            "http://localhost:5000/api/preview/fire%20%281%29%21.png"
        );
    }

    #[test]
    fn test_preview_url_does_not_double_encode() {
        let url = files().preview_url("100%.png");
        assert_eq!(url, "http://localhost:5000/api/preview/100%25.png");
    }

    #[test]
    fn test_file_entry_deserializes_backend_shape() {
        let entry: FileEntry = serde_json::from_value(serde_json::json!({
            "uid": "scene_20240501_101500.png",
            "filename": "scene_20240501_101500.png",
            "original_name": "scene.png",
            "size": 2048,
            "type": "image/png",
            "upload_time": "2024.05.01 10:15"
        }))
        .unwrap();

        assert_eq!(entry.original_name, "scene.png");
        assert_eq!(entry.content_type, "image/png");
    }
}
