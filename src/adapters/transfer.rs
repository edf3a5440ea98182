//! Destination folders and copies of frame payloads.
//!
//! Frames of a block land in numbered folders `<destination>/<block>/<n>`. A folder is
//! reused until it holds point-cloud files, then the next number is opened.

use crate::core::ConfigProvider;
use crate::domain::model::PathType;
use crate::utils::error::{FrameGridError, Result};
use std::path::{Path, PathBuf};

pub const FRAME_EXTENSION: &str = "laz";

const POINT_CLOUD_EXTENSIONS: [&str; 2] = ["laz", "las"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    pub search_dir: PathBuf,
    pub destination_dir: PathBuf,
}

/// Directory holding the payloads of `block`.
pub fn search_dir(search_root: &Path, block: &str, path_type: PathType) -> PathBuf {
    match path_type {
        PathType::Root => search_root.join(block).join("LAZ"),
        PathType::Flat => search_root.to_path_buf(),
    }
}

pub async fn plan_transfer<C: ConfigProvider>(config: &C, block: &str) -> Result<TransferPlan> {
    let destination_dir = resolve_destination(Path::new(config.destination_path()), block).await?;
    Ok(TransferPlan {
        search_dir: search_dir(Path::new(config.search_path()), block, config.path_type()),
        destination_dir,
    })
}

/// Folder the next frames of `block` should be copied to, created if needed.
pub async fn resolve_destination(destination_root: &Path, block: &str) -> Result<PathBuf> {
    let block_dir = destination_root.join(block);

    let latest = if tokio::fs::try_exists(&block_dir).await? {
        latest_numbered_dir(&block_dir).await?
    } else {
        None
    };

    let target = match latest {
        Some(number) => {
            let dir = block_dir.join(number.to_string());
            if has_point_cloud_files(&dir).await? {
                block_dir.join((number + 1).to_string())
            } else {
                dir
            }
        }
        None => block_dir.join("1"),
    };

    tokio::fs::create_dir_all(&target).await?;
    tracing::info!("Destination folder for block {}: {}", block, target.display());
    Ok(target)
}

async fn latest_numbered_dir(dir: &Path) -> Result<Option<u32>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut latest = None;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        if let Some(number) = entry.file_name().to_str().and_then(|n| n.parse::<u32>().ok()) {
            latest = latest.max(Some(number));
        }
    }
    Ok(latest)
}

async fn has_point_cloud_files(dir: &Path) -> Result<bool> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_point_cloud = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                POINT_CLOUD_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });
        if is_point_cloud {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Copies `<source_dir>/<frame>.laz` into `destination_dir`. Existing files are never
/// overwritten.
pub async fn copy_frame(source_dir: &Path, destination_dir: &Path, frame: &str) -> Result<PathBuf> {
    let file_name = format!("{}.{}", frame, FRAME_EXTENSION);
    let source = source_dir.join(&file_name);
    let destination = destination_dir.join(&file_name);

    let mut reader = match tokio::fs::File::open(&source).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(FrameGridError::FrameNotFound {
                path: source.display().to_string(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let mut writer = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&destination)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(FrameGridError::FrameAlreadyExists {
                path: destination.display().to_string(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let copied = match tokio::io::copy(&mut reader, &mut writer).await {
        Ok(bytes) => writer.sync_all().await.map(|_| bytes),
        Err(e) => Err(e),
    };

    match copied {
        Ok(bytes) => {
            tracing::debug!("Copied {} ({} bytes)", file_name, bytes);
            Ok(destination)
        }
        Err(e) => {
            // 複製失敗不留下不完整的檔案
            drop(writer);
            if let Err(cleanup) = tokio::fs::remove_file(&destination).await {
                tracing::warn!(
                    "Could not remove partial copy {}: {}",
                    destination.display(),
                    cleanup
                );
            }
            Err(e.into())
        }
    }
}
