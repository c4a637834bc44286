//! Durable session persistence: one JSON file per session.
//!
//! Writes are atomic (temp file + rename) so a reader never observes a
//! half-written record. Concurrent updates to the same id are a
//! last-writer-wins race; the store does not attempt conflict detection.

mod error;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use vidocs_core::{AssetHandle, SessionRecord, SessionSummary};

pub use error::StorageError;

/// Key-value store of [`SessionRecord`]s under `<root>/sessions/<id>.json`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    /// Opens the store, creating the sessions directory if absent.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = data_dir.as_ref().join("sessions");
        fs::create_dir_all(&root)
            .map_err(|e| StorageError::io(format!("create sessions dir {}", root.display()), e))?;
        Ok(Self { root })
    }

    fn session_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    /// Persists a new session, generating its id and creation timestamp.
    pub fn create(
        &self,
        title: String,
        markdown: String,
        asset: Option<AssetHandle>,
        resolved_model: String,
    ) -> Result<SessionRecord, StorageError> {
        let record = SessionRecord {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            created_at: Utc::now(),
            markdown,
            asset,
            resolved_model,
            turns: Vec::new(),
        };
        self.write_record(&record)?;
        Ok(record)
    }

    /// Loads the full record for `id`.
    pub fn get(&self, id: &str) -> Result<SessionRecord, StorageError> {
        let path = self.session_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound { id: id.to_owned() });
        }
        let bytes = fs::read(&path)
            .map_err(|e| StorageError::io(format!("read session {id}"), e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Corrupt { context: format!("session {id}"), source: e })
    }

    /// Lists summaries of all sessions, newest first.
    ///
    /// Entries that cannot be read or parsed are skipped with a warning so
    /// one corrupt file never breaks the whole history listing.
    pub fn list_all(&self) -> Result<Vec<SessionSummary>, StorageError> {
        let entries = fs::read_dir(&self.root)
            .map_err(|e| StorageError::io(format!("read sessions dir {}", self.root.display()), e))?;

        let mut summaries = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                },
            };
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            match fs::read(&path).map_err(StorageError::from_listing).and_then(|bytes| {
                serde_json::from_slice::<SessionRecord>(&bytes).map_err(|e| {
                    StorageError::Corrupt { context: path.display().to_string(), source: e }
                })
            }) {
                Ok(record) => summaries.push(SessionSummary {
                    id: record.id,
                    title: record.title,
                    timestamp: record.created_at,
                }),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping corrupt session file");
                },
            }
        }

        summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(summaries)
    }

    /// Whole-record replacement of an existing session.
    pub fn update(&self, record: &SessionRecord) -> Result<(), StorageError> {
        if !self.session_path(&record.id).exists() {
            return Err(StorageError::NotFound { id: record.id.clone() });
        }
        self.write_record(record)
    }

    /// Serializes and atomically replaces the session file.
    fn write_record(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let path = self.session_path(&record.id);
        let bytes = serde_json::to_vec_pretty(record).map_err(|e| StorageError::Corrupt {
            context: format!("serialize session {}", record.id),
            source: e,
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &bytes)
            .map_err(|e| StorageError::io(format!("write temp file for session {}", record.id), e))?;
        fs::rename(&tmp, &path)
            .map_err(|e| StorageError::io(format!("finalize session {}", record.id), e))
    }
}

impl StorageError {
    fn from_listing(source: std::io::Error) -> Self {
        Self::Io { context: "read session file during listing".to_owned(), source }
    }
}
