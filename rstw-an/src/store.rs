//! Single-document JSON store
//!
//! The whole database is one [`Document`] persisted as a single JSON file.
//! Every operation runs under one process-wide async mutex, so overlapping
//! requests observe a linear history of the document with FIFO fairness
//! (tokio's `Mutex` wakes waiters in arrival order). Writes go through a
//! temp file and an atomic rename, so the on-disk file moves from one
//! complete JSON document to the next and is never observable half-written.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::debug;

use rstw_common::models::Document;
use rstw_common::{Error, Result};

/// Mutex-guarded document store backed by a single JSON file.
///
/// Cloneable access is obtained by wrapping the store in an `Arc`; the inner
/// mutex is the only point of mutual exclusion in the process.
pub struct DocumentStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl DocumentStore {
    /// Create a store for the given file path. The file and its parent
    /// directory are created lazily on first access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current document, initializing the backing file to the empty
    /// document if it does not exist yet.
    pub async fn read(&self) -> Result<Document> {
        let _guard = self.lock.lock().await;
        self.load_locked().await
    }

    /// Unconditionally overwrite the document. Used for initialization; all
    /// regular mutations go through [`DocumentStore::update`].
    pub async fn write(&self, doc: Document) -> Result<Document> {
        let _guard = self.lock.lock().await;
        self.persist_locked(&doc).await?;
        Ok(doc)
    }

    /// Atomic read-modify-write: loads the current document, applies the
    /// mutator, persists the result, and returns it. The mutator must not
    /// have observable side effects beyond the returned document; if
    /// persisting fails nothing is applied.
    pub async fn update<F>(&self, mutator: F) -> Result<Document>
    where
        F: FnOnce(Document) -> Document,
    {
        let _guard = self.lock.lock().await;
        let current = self.load_locked().await?;
        let next = mutator(current);
        self.persist_locked(&next).await?;
        Ok(next)
    }

    async fn load_locked(&self) -> Result<Document> {
        self.ensure_parent_dir().await?;

        if !tokio::fs::try_exists(&self.path).await? {
            debug!("Initializing document store at {}", self.path.display());
            let doc = Document::default();
            self.persist_locked(&doc).await?;
            return Ok(doc);
        }

        let raw = tokio::fs::read_to_string(&self.path).await?;
        if raw.trim().is_empty() {
            return Ok(Document::default());
        }

        serde_json::from_str(&raw).map_err(|e| {
            Error::Storage(format!(
                "malformed document at {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn persist_locked(&self, doc: &Document) -> Result<()> {
        let serialized = serde_json::to_vec_pretty(doc)
            .map_err(|e| Error::Storage(format!("could not serialize document: {}", e)))?;

        // Write the full document to a sibling temp file, then rename over
        // the target. A crash mid-write leaves the previous file intact.
        let mut tmp_name = OsString::from(self.path.as_os_str());
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        tokio::fs::write(&tmp_path, &serialized).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }
}
