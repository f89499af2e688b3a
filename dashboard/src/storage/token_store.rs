//! Durable storage for the session token

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::authn::token::SessionToken;
use crate::errors::DashboardError;
use crate::filesys::file::File;

/// Token store trait for testability.
///
/// One active session per client: the store holds at most one token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Get the persisted token, if any
    async fn load(&self) -> Result<Option<SessionToken>, DashboardError>;

    /// Persist a token, replacing the previous one
    async fn save(&self, token: &SessionToken) -> Result<(), DashboardError>;

    /// Forget the token
    async fn clear(&self) -> Result<(), DashboardError>;

    /// Forget the token only if it is still `token`. Returns whether it was cleared.
    ///
    /// The default is a separate load and clear; stores shared between tasks
    /// override it so a `save` cannot land in between.
    async fn clear_if(&self, token: &SessionToken) -> Result<bool, DashboardError> {
        match self.load().await? {
            Some(current) if current == *token => {
                self.clear().await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// On-disk representation of the session file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionFile {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token store backed by `session.json`
///
/// Writes are serialized within the process. Another process sharing the
/// file can still interleave with `clear_if`; last writer wins.
pub struct FileTokenStore {
    file: File,
    writes: tokio::sync::Mutex<()>,
}

impl FileTokenStore {
    pub fn new(file: File) -> Self {
        Self {
            file,
            writes: tokio::sync::Mutex::new(()),
        }
    }

    async fn read(&self) -> Result<Option<SessionToken>, DashboardError> {
        let stored: Option<SessionFile> = self.file.read_json_opt().await.map_err(|e| {
            DashboardError::StorageError(format!(
                "Failed to read session file {}: {}",
                self.file.path().display(),
                e
            ))
        })?;

        Ok(stored
            .map(|s| SessionToken::new(s.token))
            .filter(|t| !t.is_blank()))
    }

    async fn remove(&self) -> Result<(), DashboardError> {
        self.file.delete().await?;
        debug!("Session token removed from {}", self.file.path().display());
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<SessionToken>, DashboardError> {
        self.read().await
    }

    async fn save(&self, token: &SessionToken) -> Result<(), DashboardError> {
        let stored = SessionFile {
            token: token.expose().to_string(),
            saved_at: Utc::now(),
        };
        let _writing = self.writes.lock().await;
        self.file.write_json_owner_only(&stored).await?;
        debug!("Session token saved to {}", self.file.path().display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), DashboardError> {
        let _writing = self.writes.lock().await;
        self.remove().await
    }

    async fn clear_if(&self, token: &SessionToken) -> Result<bool, DashboardError> {
        let _writing = self.writes.lock().await;
        match self.read().await? {
            Some(current) if current == *token => {
                self.remove().await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// In-process token store; nothing survives the process
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<SessionToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SessionToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<SessionToken>, DashboardError> {
        let token = self.token.lock().unwrap_or_else(|e| e.into_inner());
        Ok(token.clone())
    }

    async fn save(&self, token: &SessionToken) -> Result<(), DashboardError> {
        let mut stored = self.token.lock().unwrap_or_else(|e| e.into_inner());
        *stored = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), DashboardError> {
        let mut stored = self.token.lock().unwrap_or_else(|e| e.into_inner());
        *stored = None;
        Ok(())
    }

    async fn clear_if(&self, token: &SessionToken) -> Result<bool, DashboardError> {
        let mut stored = self.token.lock().unwrap_or_else(|e| e.into_inner());
        if stored.as_ref() == Some(token) {
            *stored = None;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
