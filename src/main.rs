//! clawshare CLI - Share files through a ClawShare server.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;

use clawshare::models::{format_expiry, format_size};
use clawshare::{extract_share_id, ClientConfig, DownloadTarget, ShareClient, UploadOptions};

/// CLI tool for sharing files through ClawShare.
#[derive(Parser)]
#[command(name = "clawshare")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// ClawShare server URL (can also be set via CLAWSHARE_URL env var).
    #[arg(long, global = true, env = "CLAWSHARE_URL")]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload files and print their share links.
    Upload {
        /// Files to upload (supports glob patterns like *.pdf).
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Days until the link expires.
        #[arg(long, default_value_t = 7)]
        expires: u64,

        /// Hours until the link expires (overrides --expires).
        #[arg(long)]
        hours: Option<u64>,

        /// Protect the link with a password.
        #[arg(long)]
        password: Option<String>,

        /// Allow previewing only, not downloading.
        #[arg(long)]
        view_only: bool,
    },

    /// Download a shared file.
    Download {
        /// Share ID or share URL.
        share: String,

        /// Output directory.
        #[arg(long, short = 'o', default_value = ".")]
        output: PathBuf,

        /// Save under this filename instead of the original one.
        #[arg(long, short = 'f')]
        filename: Option<String>,

        /// Password, if the share requires one.
        #[arg(long, short = 'p')]
        password: Option<String>,
    },

    /// List your active shares.
    List,

    /// Show details of one share.
    Info {
        /// Share ID or share URL.
        share: String,
    },

    /// Revoke a share link.
    Revoke {
        /// Share ID or share URL.
        share: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let client = ShareClient::new(ClientConfig::resolve(cli.url));

    match cli.command {
        Commands::Upload {
            patterns,
            expires,
            hours,
            password,
            view_only,
        } => {
            let files = expand_patterns(&patterns)?;
            let options = UploadOptions {
                expires_days: expires,
                expires_hours: hours,
                password,
                view_only,
                filename: None,
            };

            let mut failed = 0;
            for (idx, path) in files.iter().enumerate() {
                let filename = path.file_name().unwrap_or_default().to_string_lossy();
                print!("[{}/{}] Uploading {}... ", idx + 1, files.len(), filename);

                match client.upload(path, &options).await {
                    Ok(share) => {
                        println!("OK");
                        println!("  Share URL: {}", share.public_url);
                        println!("  Expires:   in {}", format_expiry(share.expires_in));
                    }
                    Err(e) => {
                        println!("FAILED");
                        eprintln!("  Error: {}", e);
                        failed += 1;
                    }
                }
            }

            if failed > 0 {
                anyhow::bail!("{} of {} upload(s) failed", failed, files.len());
            }
        }

        Commands::Download {
            share,
            output,
            filename,
            password,
        } => {
            std::fs::create_dir_all(&output)
                .with_context(|| format!("Failed to create directory: {:?}", output))?;

            let mut target = DownloadTarget::new(&share).output_dir(output);
            if let Some(filename) = filename {
                target = target.filename(filename);
            }
            if let Some(password) = password {
                target = target.password(password);
            }

            print!("Downloading {}... ", target.share_id);
            let path = client
                .download(&target)
                .await
                .with_context(|| format!("Failed to download share: {}", target.share_id))?;

            println!("OK");
            println!("Saved to: {:?}", path);
        }

        Commands::List => {
            let shares = client.list().await.context("Failed to list shares")?;

            if shares.is_empty() {
                println!("No shares found.");
            } else {
                println!("{:<24} {:>10} {:<26} {}", "ID", "SIZE", "EXPIRES", "NAME");
                println!("{}", "-".repeat(80));
                for share in shares {
                    println!("{}", share);
                }
            }
        }

        Commands::Info { share } => {
            let share_id = extract_share_id(&share);
            let info = client
                .info(&share_id)
                .await
                .with_context(|| format!("Failed to fetch share: {}", share_id))?;

            println!("ID:        {}", info.id);
            println!("File:      {}", info.name);
            if let Some(size) = info.size {
                println!("Size:      {}", format_size(size));
            }
            if let Some(created) = &info.created_at {
                println!("Created:   {}", created);
            }
            println!("Expires:   {}", info.expires_at.as_deref().unwrap_or("unknown"));
            if let Some(is_download) = info.is_download {
                println!("Download:  {}", if is_download { "allowed" } else { "view only" });
            }
        }

        Commands::Revoke { share } => {
            let share_id = extract_share_id(&share);
            let revoked = client
                .revoke(&share_id)
                .await
                .with_context(|| format!("Failed to revoke share: {}", share_id))?;

            if !revoked {
                anyhow::bail!("Server did not revoke share: {}", share_id);
            }
            println!("Revoked share: {}", share_id);
        }
    }

    Ok(())
}

/// Expand glob patterns into a sorted, de-duplicated list of files.
///
/// A pattern matching nothing is taken as a literal path so that the
/// upload reports it as missing.
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let matches: Vec<PathBuf> = glob(pattern)
            .with_context(|| format!("Invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();

        if matches.is_empty() {
            files.push(PathBuf::from(pattern));
        } else {
            files.extend(matches);
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}
