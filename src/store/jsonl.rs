//! JSON-lines record store
//!
//! Handles reading and writing records to disk, one file per record kind.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::sync::RwLock;

use crate::config::ResolverConfig;
use crate::core::{GrantError, GrantResult};
use crate::records::{Granted, Requested};

use super::RecordStore;

/// Default directory for record storage
const STORE_DIR: &str = "grants";

const GRANTED_FILE: &str = "granted.jsonl";
const REQUESTED_FILE: &str = "requested.jsonl";

/// A stored line: the content key next to the record
#[derive(Deserialize, Serialize)]
struct Line<T> {
    key: String,
    record: T,
}

/// Store keeping records in `granted.jsonl` and `requested.jsonl`
#[derive(Debug)]
pub struct JsonLinesStore {
    base_dir: PathBuf,
    /// Readers share, read-modify-write cycles are exclusive
    lock: RwLock<()>,
}

impl JsonLinesStore {
    /// Create a store in the default directory
    pub fn new() -> Self {
        Self::with_dir(STORE_DIR)
    }

    /// Create a store in a custom directory
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        let base_dir = dir.into();
        tracing::info!("[JsonLinesStore] Using directory {:?}", base_dir);
        Self {
            base_dir,
            lock: RwLock::new(()),
        }
    }

    /// Create a store in the configured directory, or the default one
    pub fn from_config(config: &ResolverConfig) -> Self {
        match &config.store_dir {
            Some(dir) => Self::with_dir(dir.clone()),
            None => Self::new(),
        }
    }

    pub fn granted_path(&self) -> PathBuf {
        self.base_dir.join(GRANTED_FILE)
    }

    pub fn requested_path(&self) -> PathBuf {
        self.base_dir.join(REQUESTED_FILE)
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn ensure_dir(&self) -> GrantResult<()> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir)?;
        }
        Ok(())
    }

    fn load<T: DeserializeOwned>(path: &Path) -> GrantResult<Vec<Line<T>>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = Vec::new();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let parsed = serde_json::from_str(&line).map_err(|e| {
                GrantError::store(format!("{}:{}: {}", path.display(), number + 1, e))
            })?;
            lines.push(parsed);
        }

        Ok(lines)
    }

    /// Replace the file by renaming a fully written sibling over it
    fn save_all<T: Serialize>(&self, path: &Path, lines: &[Line<T>]) -> GrantResult<()> {
        let temp = NamedTempFile::new_in(&self.base_dir)?;
        let mut writer = BufWriter::new(temp.as_file());

        for line in lines {
            let json = serde_json::to_string(line)?;
            writeln!(writer, "{}", json)?;
        }

        writer.flush()?;
        drop(writer);
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    async fn upsert<T: Serialize + DeserializeOwned>(
        &self,
        path: PathBuf,
        key: String,
        record: T,
    ) -> GrantResult<String> {
        let _guard = self.lock.write().await;
        self.ensure_dir()?;

        let mut lines: Vec<Line<T>> = Self::load(&path)?;
        match lines.iter_mut().find(|line| line.key == key) {
            Some(line) => line.record = record,
            None => {
                tracing::info!("[JsonLinesStore] Adding {} to {:?}", key, path);
                lines.push(Line {
                    key: key.clone(),
                    record,
                });
            }
        }

        self.save_all(&path, &lines)?;
        Ok(key)
    }
}

impl Default for JsonLinesStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for JsonLinesStore {
    async fn granted(&self) -> GrantResult<Vec<Granted>> {
        let _guard = self.lock.read().await;
        let lines: Vec<Line<Granted>> = Self::load(&self.granted_path())?;
        Ok(lines.into_iter().map(|line| line.record).collect())
    }

    async fn requested(&self) -> GrantResult<Vec<Requested>> {
        let _guard = self.lock.read().await;
        let lines: Vec<Line<Requested>> = Self::load(&self.requested_path())?;
        Ok(lines.into_iter().map(|line| line.record).collect())
    }

    async fn save_granted(&self, granted: Granted) -> GrantResult<String> {
        let key = granted.content_key()?;
        self.upsert(self.granted_path(), key, granted).await
    }

    async fn save_requested(&self, requested: Requested) -> GrantResult<String> {
        let key = requested.content_key()?;
        self.upsert(self.requested_path(), key, requested).await
    }

    fn name(&self) -> &str {
        "jsonl"
    }
}
