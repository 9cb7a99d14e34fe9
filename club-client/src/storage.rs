//! Session cookie storage - JSON file

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Persisted session of one project on this device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub project_id: String,
    /// Value of the fallback cookie header
    pub cookie: String,
    /// Unix seconds
    pub saved_at: i64,
}

impl StoredSession {
    pub fn new(project_id: impl Into<String>, cookie: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            cookie: cookie.into(),
            saved_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Session storage
#[derive(Debug, Clone)]
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Make sure the parent directory exists
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn save(&self, session: &StoredSession) -> std::io::Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, json)
    }

    /// Load the stored session; unreadable files count as absent
    pub fn load(&self) -> Option<StoredSession> {
        if !self.path.exists() {
            return None;
        }
        let json = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&json).ok()
    }

    /// Stored cookie, only if it was saved for `project_id`
    pub fn load_for(&self, project_id: &str) -> Option<String> {
        self.load()
            .filter(|s| s.project_id == project_id)
            .map(|s| s.cookie)
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn delete(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
