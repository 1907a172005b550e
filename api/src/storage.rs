//! Blob store for uploaded images.

use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use rand_core::{OsRng, RngCore};
use tokio::{fs, io::AsyncWriteExt};

const MAX_NAME_ATTEMPTS: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("refusing to store outside the media root: {0}")]
    InvalidPath(String),
    #[error("could not find a free name for {0}")]
    NameExhausted(String),
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `content` at (or next to) `path` and return the stored
    /// relative path. An existing file is never overwritten.
    async fn save(&self, path: &str, content: &[u8]) -> Result<String, StorageError>;
}

/// Files under a directory on local disk.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn save(&self, path: &str, content: &[u8]) -> Result<String, StorageError> {
        let relative = Path::new(path);
        if path.is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidPath(path.to_string()));
        }

        if let Some(parent) = self.root.join(relative).parent() {
            fs::create_dir_all(parent).await?;
        }

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = if attempt == 0 {
                path.to_string()
            } else {
                with_suffix(path, &random_suffix())
            };

            let opened = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.root.join(&candidate))
                .await;

            match opened {
                Ok(mut file) => {
                    file.write_all(content).await?;
                    file.flush().await?;
                    return Ok(candidate);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(StorageError::NameExhausted(path.to_string()))
    }
}

/// Reduce a client-supplied filename to a safe single path segment.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

fn with_suffix(path: &str, suffix: &str) -> String {
    let (dir, file) = match path.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, path),
    };
    let renamed = match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{suffix}.{ext}"),
        _ => format!("{file}_{suffix}"),
    };
    match dir {
        Some(dir) => format!("{dir}/{renamed}"),
        None => renamed,
    }
}

fn random_suffix() -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut bytes = [0u8; 7];
    OsRng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| ALPHABET[usize::from(*b) % ALPHABET.len()] as char)
        .collect()
}
