//! File intake for estate uploads.
//!
//! One file per create request, written under the uploads directory as
//! `<epoch-millis>-<original-name>`. Collision handling is timestamp
//! granularity only.

use std::io;
use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Stored-file descriptor returned after accepting an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    pub path: String,
    pub original_name: String,
    pub size: u64,
}

#[derive(Clone, Debug)]
pub struct FileIntake {
    dir: PathBuf,
}

impl FileIntake {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist an uploaded file and return its descriptor.
    ///
    /// The directory is created on first use. The on-disk name keeps only the
    /// final path component of the client-supplied name, so a crafted name
    /// cannot escape the uploads directory.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> io::Result<StoredFile> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let safe_name = sanitize_name(original_name);
        let stored_name = format!("{}-{}", Utc::now().timestamp_millis(), safe_name);
        let path = self.dir.join(stored_name);

        tokio::fs::write(&path, bytes).await?;

        Ok(StoredFile {
            path: path.to_string_lossy().into_owned(),
            original_name: original_name.to_string(),
            size: bytes.len() as u64,
        })
    }
}

/// Reduce a client-supplied filename to its final path component.
fn sanitize_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .trim()
        .to_string();

    if base.is_empty() || base == "." || base == ".." {
        "upload".to_string()
    } else {
        base
    }
}
