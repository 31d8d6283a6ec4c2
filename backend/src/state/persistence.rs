// Agent id persistence module
// Saves and loads the remote agent ids so restarts can reuse existing agents

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Error types for persistence operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// File I/O error
    IoError(String),
    /// JSON serialization/deserialization error
    JsonError(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceError::IoError(msg) => write!(f, "IO Error: {}", msg),
            PersistenceError::JsonError(msg) => write!(f, "JSON Error: {}", msg),
        }
    }
}

impl std::error::Error for PersistenceError {}

/// Agent ids as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAgentIds {
    /// Orchestrator agent id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orchestrator: Option<String>,
    /// Market-research worker agent id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_research: Option<String>,
    /// When the file was last written (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl StoredAgentIds {
    /// True when neither id is present
    pub fn is_empty(&self) -> bool {
        self.orchestrator.is_none() && self.market_research.is_none()
    }
}

/// Single-file store for agent ids
#[derive(Debug, Clone)]
pub struct AgentIdStore {
    path: PathBuf,
}

impl AgentIdStore {
    /// Create a store backed by `path`. Nothing is read until [`load`](Self::load).
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load stored ids
    ///
    /// # Returns
    /// * `Ok(StoredAgentIds)` - stored ids, or empty ids if the file does not exist
    /// * `Err(PersistenceError)` - if the file exists but cannot be read or parsed
    pub fn load(&self) -> Result<StoredAgentIds, PersistenceError> {
        if !self.path.exists() {
            return Ok(StoredAgentIds::default());
        }

        let json =
            fs::read_to_string(&self.path).map_err(|e| PersistenceError::IoError(e.to_string()))?;

        serde_json::from_str(&json).map_err(|e| PersistenceError::JsonError(e.to_string()))
    }

    /// Write ids, stamping the current time
    ///
    /// # Returns
    /// * `Ok(StoredAgentIds)` - what was written, including the timestamp
    /// * `Err(PersistenceError)` - if serialization or the write failed
    pub fn save(&self, ids: &StoredAgentIds) -> Result<StoredAgentIds, PersistenceError> {
        let stamped = StoredAgentIds {
            timestamp: Some(Utc::now().to_rfc3339()),
            ..ids.clone()
        };

        let json = serde_json::to_string_pretty(&stamped)
            .map_err(|e| PersistenceError::JsonError(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::IoError(e.to_string()))?;
        }
        fs::write(&self.path, json).map_err(|e| PersistenceError::IoError(e.to_string()))?;

        Ok(stamped)
    }

    /// Delete the file; a missing file is not an error
    pub fn clear(&self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::IoError(e.to_string())),
        }
    }
}
