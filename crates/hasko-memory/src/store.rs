// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON file-backed memory store.
//!
//! The whole document is read on every access and rewritten on every save.
//! A store-wide async mutex serializes load -> mutate -> save cycles so that
//! overlapping requests cannot drop each other's updates.

use std::path::{Path, PathBuf};

use hasko_config::model::{CorruptionPolicy, MemoryConfig};
use hasko_core::HaskoError;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::types::{ChatRecord, MemoryDocument};

fn storage_err(e: impl std::error::Error + Send + Sync + 'static) -> HaskoError {
    HaskoError::Storage {
        source: Box::new(e),
    }
}

/// Persistent store for the memory document.
pub struct MemoryStore {
    path: PathBuf,
    max_size: u64,
    policy: CorruptionPolicy,
    lock: Mutex<()>,
}

impl MemoryStore {
    pub fn new(path: impl Into<PathBuf>, max_size: u64, policy: CorruptionPolicy) -> Self {
        Self {
            path: path.into(),
            max_size,
            policy,
            lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::new(
            &config.file_path,
            config.max_file_size,
            config.corruption_policy,
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted document.
    ///
    /// Never fails: a missing, unreadable or oversize file yields an empty
    /// document after applying the configured corruption policy.
    pub async fn load(&self) -> MemoryDocument {
        let len = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "memory file not found, starting empty");
                return MemoryDocument::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot stat memory file");
                return self.recover().await;
            }
        };

        if len > self.max_size {
            warn!(
                path = %self.path.display(),
                bytes = len,
                max_bytes = self.max_size,
                "memory file exceeds size ceiling"
            );
            return self.recover().await;
        }

        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read memory file");
                return self.recover().await;
            }
        };

        match serde_json::from_slice::<MemoryDocument>(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "memory file is not valid JSON");
                self.recover().await
            }
        }
    }

    /// Applies the corruption policy and returns a fresh document.
    async fn recover(&self) -> MemoryDocument {
        if self.policy == CorruptionPolicy::Backup {
            let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
            let mut backup = self.path.clone().into_os_string();
            backup.push(format!(".corrupt-{stamp}"));
            let backup = PathBuf::from(backup);
            match tokio::fs::rename(&self.path, &backup).await {
                Ok(()) => {
                    warn!(backup = %backup.display(), "moved unusable memory file aside")
                }
                Err(e) => warn!(error = %e, "could not back up unusable memory file"),
            }
        } else {
            warn!(path = %self.path.display(), "discarding unusable memory file");
        }
        MemoryDocument::default()
    }

    /// Serializes the document, evicting chats until it fits, and writes it
    /// atomically (temp file + rename).
    pub async fn save(&self, doc: &mut MemoryDocument) -> Result<(), HaskoError> {
        let bytes = self.truncate(doc)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(storage_err)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, &bytes).await.map_err(storage_err)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(storage_err)?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "memory saved");
        Ok(())
    }

    /// Removes the chat whose id sorts first until the serialized document
    /// fits the size ceiling or no chats remain. Returns the final bytes.
    ///
    /// Eviction is by id order, not by recency of use.
    pub fn truncate(&self, doc: &mut MemoryDocument) -> Result<Vec<u8>, HaskoError> {
        loop {
            let bytes = serde_json::to_vec_pretty(doc).map_err(storage_err)?;
            if bytes.len() as u64 <= self.max_size {
                return Ok(bytes);
            }
            match doc.chats.pop_first() {
                Some((chat_id, _)) => {
                    info!(
                        chat_id = %chat_id,
                        bytes = bytes.len(),
                        max_bytes = self.max_size,
                        "evicting chat to satisfy size ceiling"
                    );
                }
                None => {
                    warn!(
                        bytes = bytes.len(),
                        max_bytes = self.max_size,
                        "empty memory document still exceeds size ceiling"
                    );
                    return Ok(bytes);
                }
            }
        }
    }

    /// Returns a copy of one chat's record (empty if unknown).
    pub async fn snapshot(&self, chat_id: &str) -> ChatRecord {
        let _guard = self.lock.lock().await;
        self.load()
            .await
            .chats
            .remove(chat_id)
            .unwrap_or_default()
    }

    /// Runs `f` against one chat's record inside a single locked
    /// load -> mutate -> save cycle. The record is created if missing.
    pub async fn update_chat<R>(
        &self,
        chat_id: &str,
        f: impl FnOnce(&mut ChatRecord) -> R,
    ) -> Result<R, HaskoError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await;
        let out = f(doc.chats.entry(chat_id.to_string()).or_default());
        self.save(&mut doc).await?;
        Ok(out)
    }
}
