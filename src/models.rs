//! Request and response types for the ClawShare API.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::expiry::{compute_expiry_seconds, DEFAULT_EXPIRY_DAYS};
use crate::multipart::{EncodedBody, MultipartEncoder};
use crate::share_id::extract_share_id;

/// Caller-facing upload settings.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub expires_days: u64,
    /// Overrides `expires_days` when set.
    pub expires_hours: Option<u64>,
    pub password: Option<String>,
    /// Recipients may preview but not download.
    pub view_only: bool,
    /// Declared filename; defaults to the source path's basename.
    pub filename: Option<String>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            expires_days: DEFAULT_EXPIRY_DAYS,
            expires_hours: None,
            password: None,
            view_only: false,
            filename: None,
        }
    }
}

impl UploadOptions {
    pub fn expiry_seconds(&self) -> u64 {
        compute_expiry_seconds(self.expires_days, self.expires_hours)
    }
}

/// Everything sent to `POST /api/share`.
#[derive(Debug, Clone)]
pub struct ShareRequest {
    pub filename: String,
    pub content: Vec<u8>,
    pub content_type: String,
    pub expires_in: u64,
    pub password: Option<String>,
    pub view_only: bool,
}

impl ShareRequest {
    /// A request for in-memory content, expiring after the default seven days.
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .to_string();
        Self {
            filename,
            content,
            content_type,
            expires_in: compute_expiry_seconds(DEFAULT_EXPIRY_DAYS, None),
            password: None,
            view_only: false,
        }
    }

    pub fn with_options(mut self, options: &UploadOptions) -> Self {
        self.expires_in = options.expiry_seconds();
        self.password = options.password.clone();
        self.view_only = options.view_only;
        self
    }

    /// Encode as the form the server expects. An absent password is sent as
    /// an empty field, which the server reads as "no password".
    pub fn to_multipart(&self) -> EncodedBody {
        MultipartEncoder::new()
            .text("expiresIn", self.expires_in.to_string())
            .text("password", self.password.clone().unwrap_or_default())
            .text("download", if self.view_only { "false" } else { "true" })
            .file_with_type(
                "file",
                self.filename.clone(),
                self.content_type.clone(),
                self.content.as_slice(),
            )
            .encode()
    }
}

/// Response of a successful upload, kept as the server sent it.
///
/// Only `publicUrl` and `expiresIn` are typed. Every other key, including
/// explicit `null`s, stays in `extra` so serialising the result gives back
/// the server's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResult {
    pub public_url: String,
    pub expires_in: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ShareResult {
    pub fn share_id(&self) -> Option<&str> {
        self.extra_str("shareId")
    }

    pub fn upload_url(&self) -> Option<&str> {
        self.extra_str("uploadUrl")
    }

    pub fn created_at(&self) -> Option<&str> {
        self.extra_str("createdAt")
    }

    /// The share identifier, from `shareId` or else the public URL.
    pub fn id(&self) -> String {
        self.share_id()
            .map(str::to_string)
            .unwrap_or_else(|| extract_share_id(&self.public_url))
    }

    fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

/// One entry of the share listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub is_download: Option<bool>,
    #[serde(default)]
    pub downloads: Option<u64>,
}

impl std::fmt::Display for ShareSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size_str = self
            .size
            .map(format_size)
            .unwrap_or_else(|| "-".to_string());
        let expires = self.expires_at.as_deref().unwrap_or("unknown");
        write!(
            f,
            "{:<24} {:>10} {:<26} {}",
            self.id, size_str, expires, self.name
        )
    }
}

/// Where and how to download a share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub share_id: String,
    pub output_dir: PathBuf,
    /// Overrides the server-provided filename.
    pub filename: Option<String>,
    pub password: Option<String>,
}

impl DownloadTarget {
    /// Target the given share id or share URL, saving into the current
    /// directory under the server's filename.
    pub fn new(share_or_url: &str) -> Self {
        Self {
            share_id: extract_share_id(share_or_url),
            output_dir: PathBuf::from("."),
            filename: None,
            password: None,
        }
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `GET /api/download`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub meta: Option<DownloadMeta>,
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadMeta {
    #[serde(default)]
    pub name: Option<String>,
}

/// Response of `GET /api/share?list=true`.
#[derive(Debug, Deserialize)]
pub struct ShareListResponse {
    #[serde(default)]
    pub shares: Option<Vec<ShareSummary>>,
}

/// Response of `GET /api/share?id=...`.
#[derive(Debug, Deserialize)]
pub struct ShareInfoResponse {
    #[serde(default)]
    pub share: Option<ShareSummary>,
}

/// Response of `DELETE /api/download`.
#[derive(Debug, Deserialize)]
pub struct RevokeResponse {
    #[serde(default)]
    pub success: Option<bool>,
}

/// Format bytes into human-readable size.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b >= GB => format!("{:.2} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.2} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.2} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}

/// Format an expiry in seconds (e.g. "7d", "1d 2h", "45m", "30s").
pub fn format_expiry(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    match (days, hours, minutes) {
        (0, 0, 0) => format!("{}s", secs),
        (0, 0, m) => format!("{}m", m),
        (0, h, 0) => format!("{}h", h),
        (0, h, m) => format!("{}h {}m", h, m),
        (d, 0, _) => format!("{}d", d),
        (d, h, _) => format!("{}d {}h", d, h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry(30), "30s");
        assert_eq!(format_expiry(2700), "45m");
        assert_eq!(format_expiry(3600), "1h");
        assert_eq!(format_expiry(5400), "1h 30m");
        assert_eq!(format_expiry(604_800), "7d");
        assert_eq!(format_expiry(93_600), "1d 2h");
    }

    #[test]
    fn test_share_request_form_fields() {
        let options = UploadOptions {
            expires_hours: Some(1),
            view_only: true,
            ..UploadOptions::default()
        };
        let request = ShareRequest::new("notes.txt", b"hi".to_vec()).with_options(&options);
        assert_eq!(request.content_type, "text/plain");

        let encoded = request.to_multipart();
        let body = String::from_utf8(encoded.body).unwrap();
        assert!(body.contains("name=\"expiresIn\"\r\n\r\n3600\r\n"));
        assert!(body.contains("name=\"password\"\r\n\r\n\r\n"));
        assert!(body.contains("name=\"download\"\r\n\r\nfalse\r\n"));
        assert!(body.contains("name=\"file\"; filename=\"notes.txt\"\r\nContent-Type: text/plain\r\n\r\nhi\r\n"));
    }

    #[test]
    fn test_unknown_extension_is_octet_stream() {
        let request = ShareRequest::new("blob.zzzunknown", vec![0]);
        assert_eq!(request.content_type, "application/octet-stream");
        assert_eq!(request.expires_in, 604_800);
    }

    #[test]
    fn test_share_result_round_trips_verbatim() {
        let body = json!({
            "success": true,
            "shareId": "abc123",
            "uploadUrl": "https://r2/put",
            "publicUrl": "https://clawshare.io/s/abc123",
            "expiresIn": 3600
        });
        let result: ShareResult = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(result.id(), "abc123");
        assert_eq!(result.upload_url(), Some("https://r2/put"));
        assert_eq!(result.extra.get("success"), Some(&json!(true)));
        assert_eq!(serde_json::to_value(&result).unwrap(), body);
    }

    #[test]
    fn test_share_result_keeps_null_fields() {
        let body = json!({
            "createdAt": null,
            "expiresIn": 3600,
            "publicUrl": "https://x/s/y",
            "shareId": null
        });
        let result: ShareResult = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(result.share_id(), None);
        assert_eq!(result.created_at(), None);
        assert_eq!(result.id(), "y");
        assert_eq!(serde_json::to_value(&result).unwrap(), body);
    }

    #[test]
    fn test_share_result_id_from_url() {
        let result: ShareResult =
            serde_json::from_value(json!({"publicUrl": "https://x/s/zz9", "expiresIn": 60}))
                .unwrap();
        assert_eq!(result.id(), "zz9");
    }

    #[test]
    fn test_share_summary_display() {
        let summary: ShareSummary = serde_json::from_value(json!({
            "id": "abc123",
            "name": "report.pdf",
            "size": 2048
        }))
        .unwrap();
        let display = summary.to_string();
        assert_eq!(display.find("2.00 KB").map(|i| i + "2.00 KB".len()), Some(35));
        assert!(display.starts_with("abc123 "));
        assert!(display.contains("2.00 KB"));
        assert!(display.contains("unknown"));
        assert!(display.contains("report.pdf"));
    }

    #[test]
    fn test_download_target_from_url() {
        let target = DownloadTarget::new("https://host/s/abc123")
            .output_dir("/tmp/out")
            .password("pw");
        assert_eq!(target.share_id, "abc123");
        assert_eq!(target.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(target.password.as_deref(), Some("pw"));
        assert!(target.filename.is_none());
    }
}
