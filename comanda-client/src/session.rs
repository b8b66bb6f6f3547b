//! Session cache — persisted workspace identity
//!
//! The active business and the signed-in user survive reloads; the order
//! collection and the cart never do — they are rebuilt from fetch +
//! channel on every session start.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionCacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted session identity
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ActiveSession {
    /// Business reference (String ID)
    pub business: String,
    pub username: String,
    /// Unix timestamp, milliseconds
    pub saved_at: i64,
}

impl ActiveSession {
    pub fn new(business: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            business: business.into(),
            username: username.into(),
            saved_at: shared::util::now_millis(),
        }
    }
}

/// Session cache manager
///
/// One JSON file under the profile directory. Missing or corrupt files
/// degrade to "no session" rather than failing startup.
pub struct SessionCache {
    /// 缓存文件路径: {profile}/session.json
    file_path: PathBuf,
}

impl SessionCache {
    pub fn new(profile_dir: &Path) -> Self {
        Self {
            file_path: profile_dir.join("session.json"),
        }
    }

    /// 保存当前会话 (用于刷新后恢复状态)
    pub fn save(&self, session: &ActiveSession) -> Result<(), SessionCacheError> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.file_path, content)?;
        tracing::debug!(username = %session.username, "Session saved");
        Ok(())
    }

    /// 加载当前会话；文件缺失或损坏时返回 None
    pub fn load(&self) -> Result<Option<ActiveSession>, SessionCacheError> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.file_path)?;
        match serde_json::from_str::<ActiveSession>(&content) {
            Ok(session) => {
                tracing::debug!(username = %session.username, "Loaded cached session");
                Ok(Some(session))
            }
            Err(e) => {
                tracing::warn!("Corrupt session cache, clearing: {e}");
                let _ = std::fs::remove_file(&self.file_path);
                Ok(None)
            }
        }
    }

    /// 清除当前会话 (登出)
    pub fn clear(&self) -> Result<(), SessionCacheError> {
        if self.file_path.exists() {
            std::fs::remove_file(&self.file_path)?;
            tracing::debug!("Session cleared");
        }
        Ok(())
    }
}
