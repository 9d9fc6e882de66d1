//! ClawShare API client.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::config::ClientConfig;
use crate::error::{Result, ShareError};
use crate::models::{
    ApiErrorResponse, DownloadResponse, DownloadTarget, RevokeResponse, ShareInfoResponse,
    ShareListResponse, ShareRequest, ShareResult, ShareSummary, UploadOptions,
};

const SHARE_PATH: &str = "/api/share";
const DOWNLOAD_PATH: &str = "/api/download";

/// Client for a ClawShare server.
///
/// Holds no mutable state: every operation is one independent
/// request/response exchange (two, sequentially, for downloads), so a single
/// client can be shared across tasks.
#[derive(Debug, Clone)]
pub struct ShareClient {
    config: ClientConfig,
    http: Client,
}

impl ShareClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Client for `$CLAWSHARE_URL`, or the default server.
    pub fn from_env() -> Self {
        Self::new(ClientConfig::resolve(None))
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Upload a local file and create a share for it.
    ///
    /// The file is read fully into memory. Its basename is the declared
    /// filename unless `options.filename` overrides it. A path that is
    /// missing or not a regular file fails with [`ShareError::FileNotFound`].
    pub async fn upload<P: AsRef<Path>>(
        &self,
        path: P,
        options: &UploadOptions,
    ) -> Result<ShareResult> {
        let path = path.as_ref();
        let filename = match &options.filename {
            Some(name) => name.clone(),
            None => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| ShareError::FileNotFound(path.to_path_buf()))?,
        };

        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ShareError::FileNotFound(path.to_path_buf())
            } else {
                ShareError::local_io(path, e)
            }
        })?;
        if !metadata.is_file() {
            return Err(ShareError::FileNotFound(path.to_path_buf()));
        }

        let content = tokio::fs::read(path)
            .await
            .map_err(|e| ShareError::local_io(path, e))?;

        let request = ShareRequest::new(filename, content).with_options(options);
        self.share(&request).await
    }

    /// Create a share from an already-built request.
    pub async fn share(&self, request: &ShareRequest) -> Result<ShareResult> {
        let url = self.endpoint(SHARE_PATH);
        let encoded = request.to_multipart();
        log::debug!(
            "POST {} ({}, {} bytes, expires in {}s)",
            url,
            request.filename,
            request.content.len(),
            request.expires_in
        );

        let response = self
            .http
            .post(&url)
            .timeout(self.config.transfer_timeout)
            .header(CONTENT_TYPE, encoded.content_type)
            .body(encoded.body)
            .send()
            .await?;

        let result: ShareResult = read_json(response, "Upload failed").await?;
        log::info!("shared {} as {}", request.filename, result.public_url);
        Ok(result)
    }

    /// Download a share into `target.output_dir`, returning the written path.
    ///
    /// The lookup call checks the password and yields a separate
    /// `downloadUrl`; the bytes are then fetched from that URL. The file is
    /// written under a temporary name and moved into place only once the
    /// whole body has arrived, overwriting any existing file.
    pub async fn download(&self, target: &DownloadTarget) -> Result<PathBuf> {
        let url = self.endpoint(DOWNLOAD_PATH);
        let mut query = vec![("id", target.share_id.as_str())];
        if let Some(password) = target.password.as_deref().filter(|p| !p.is_empty()) {
            query.push(("password", password));
        }
        log::debug!("GET {}?id={}", url, target.share_id);

        let response = self
            .http
            .get(&url)
            .query(&query)
            .timeout(self.config.api_timeout)
            .send()
            .await?;
        let status = response.status().as_u16();
        let lookup: DownloadResponse = read_json(response, "Download failed").await?;

        if !lookup.success {
            let message = lookup.error.unwrap_or_else(|| "Download failed".to_string());
            return Err(ShareError::api(Some(status), message));
        }

        let filename = match &target.filename {
            Some(name) => name.clone(),
            None => server_filename(lookup.meta.and_then(|meta| meta.name))?,
        };
        let download_url = lookup.download_url.ok_or_else(|| {
            ShareError::MalformedResponse("download response has no downloadUrl".to_string())
        })?;

        let destination = target.output_dir.join(&filename);
        let written = self.fetch_to_file(&download_url, &destination).await?;
        log::info!(
            "downloaded share {} to {} ({} bytes)",
            target.share_id,
            destination.display(),
            written
        );
        Ok(destination)
    }

    /// List the caller's active shares.
    pub async fn list(&self) -> Result<Vec<ShareSummary>> {
        let url = self.endpoint(SHARE_PATH);
        log::debug!("GET {}?list=true", url);

        let response = self
            .http
            .get(&url)
            .query(&[("list", "true")])
            .timeout(self.config.api_timeout)
            .send()
            .await?;

        let listing: ShareListResponse = read_json(response, "Failed to list").await?;
        Ok(listing.shares.unwrap_or_default())
    }

    /// Fetch the stored metadata of one share.
    pub async fn info(&self, share_id: &str) -> Result<ShareSummary> {
        let url = self.endpoint(SHARE_PATH);
        log::debug!("GET {}?id={}", url, share_id);

        let response = self
            .http
            .get(&url)
            .query(&[("id", share_id)])
            .timeout(self.config.api_timeout)
            .send()
            .await?;

        let info: ShareInfoResponse = read_json(response, "Failed to fetch share").await?;
        info.share.ok_or_else(|| {
            ShareError::MalformedResponse("share info response has no share".to_string())
        })
    }

    /// Revoke a share. Returns the server's `success` flag; a soft failure
    /// is `Ok(false)`, an error status is an [`ShareError::Api`].
    pub async fn revoke(&self, share_id: &str) -> Result<bool> {
        let url = self.endpoint(DOWNLOAD_PATH);
        log::debug!("DELETE {}?id={}", url, share_id);

        let response = self
            .http
            .delete(&url)
            .query(&[("id", share_id)])
            .timeout(self.config.api_timeout)
            .send()
            .await?;

        let revoked: RevokeResponse = read_json(response, "Failed to revoke").await?;
        Ok(revoked.success.unwrap_or(false))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn fetch_to_file(&self, url: &str, destination: &Path) -> Result<u64> {
        log::debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .timeout(self.config.transfer_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(ShareError::api(
                Some(status.as_u16()),
                error_message(&body, "Download failed"),
            ));
        }

        let partial = partial_path(destination);
        let outcome = match write_body(response, &partial).await {
            Ok(written) => tokio::fs::rename(&partial, destination)
                .await
                .map(|_| written)
                .map_err(|e| ShareError::local_io(destination, e)),
            Err(e) => Err(e),
        };

        if outcome.is_err() {
            if let Err(e) = tokio::fs::remove_file(&partial).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("could not remove {}: {}", partial.display(), e);
                }
            }
        }
        outcome
    }
}

/// Interpret a JSON API response.
///
/// Non-2xx statuses become [`ShareError::Api`] with the body's `error`
/// field, or `fallback` when there is none. A 2xx body that does not decode
/// as `T` is a [`ShareError::MalformedResponse`].
async fn read_json<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(ShareError::api(
            Some(status.as_u16()),
            error_message(&body, fallback),
        ));
    }

    serde_json::from_slice(&body).map_err(|e| ShareError::MalformedResponse(e.to_string()))
}

fn error_message(body: &[u8], fallback: &str) -> String {
    serde_json::from_slice::<ApiErrorResponse>(body)
        .ok()
        .and_then(|e| e.error)
        .unwrap_or_else(|| fallback.to_string())
}

/// Reduce a server-provided name to a bare file name.
fn server_filename(name: Option<String>) -> Result<String> {
    name.as_deref()
        .and_then(|name| Path::new(name).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            ShareError::MalformedResponse("download response has no meta.name".to_string())
        })
}

fn partial_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!(".{}.part", name))
}

async fn write_body(response: Response, path: &Path) -> Result<u64> {
    let mut file = File::create(path)
        .await
        .map_err(|e| ShareError::local_io(path, e))?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| ShareError::local_io(path, e))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| ShareError::local_io(path, e))?;
    Ok(written)
}
