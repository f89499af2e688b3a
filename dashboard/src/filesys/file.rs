//! JSON file operations

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::errors::DashboardError;

/// A file on disk holding a single JSON document
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
}

impl File {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path).await.is_ok()
    }

    /// Read and decode the document
    pub async fn read_json<T: DeserializeOwned>(&self) -> Result<T, DashboardError> {
        let contents = fs::read_to_string(&self.path).await?;
        let value = serde_json::from_str(&contents)?;
        Ok(value)
    }

    /// Read the document, or `None` when the file does not exist yet
    pub async fn read_json_opt<T: DeserializeOwned>(&self) -> Result<Option<T>, DashboardError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Encode and write the document through a temporary sibling, then rename
    pub async fn write_json<T: Serialize>(&self, value: &T) -> Result<(), DashboardError> {
        self.write_json_with_mode(value, None).await
    }

    /// Like [`File::write_json`], but the document is readable by its owner only.
    ///
    /// The temporary sibling is created 0o600, so the contents are never exposed.
    /// The mode is ignored off Unix.
    pub async fn write_json_owner_only<T: Serialize>(&self, value: &T) -> Result<(), DashboardError> {
        self.write_json_with_mode(value, Some(0o600)).await
    }

    async fn write_json_with_mode<T: Serialize>(
        &self,
        value: &T,
        mode: Option<u32>,
    ) -> Result<(), DashboardError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_vec_pretty(value)?;
        let temp_path = self.path.with_extension("tmp");

        // a leftover temp file keeps its old mode; start fresh
        if let Err(e) = fs::remove_file(&temp_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(e.into());
            }
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        restrict_mode(&mut options, mode);

        let mut file = options.open(&temp_path).await?;
        file.write_all(&contents).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }

    pub async fn delete(&self) -> Result<(), DashboardError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_mode(options: &mut fs::OpenOptions, mode: Option<u32>) {
    if let Some(mode) = mode {
        options.mode(mode);
    }
}

#[cfg(not(unix))]
fn restrict_mode(_options: &mut fs::OpenOptions, _mode: Option<u32>) {}
