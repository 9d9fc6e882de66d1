//! clawshare - client for the ClawShare file-sharing service.
//!
//! This library provides functionality to:
//! - Upload a file and get a time-limited, optionally password-protected share link
//! - Download a shared file given its id or share URL
//! - List and inspect active shares
//! - Revoke a share
//!
//! # Example
//!
//! ```no_run
//! use clawshare::{ClientConfig, DownloadTarget, ShareClient, UploadOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ShareClient::new(ClientConfig::resolve(None));
//!
//!     let options = UploadOptions {
//!         expires_hours: Some(1),
//!         ..UploadOptions::default()
//!     };
//!     let share = client.upload("report.pdf", &options).await?;
//!     println!("{}", share.public_url);
//!
//!     let target = DownloadTarget::new(&share.public_url).output_dir("downloads");
//!     let path = client.download(&target).await?;
//!     println!("saved to {}", path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod expiry;
pub mod models;
pub mod multipart;
pub mod share_id;

// Re-exports for convenience
pub use client::ShareClient;
pub use config::ClientConfig;
pub use error::{Result, ShareError};
pub use expiry::compute_expiry_seconds;
pub use models::{DownloadTarget, ShareRequest, ShareResult, ShareSummary, UploadOptions};
pub use multipart::{EncodedBody, MultipartEncoder};
pub use share_id::extract_share_id;
