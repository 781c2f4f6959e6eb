use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::{NewsError, Result};

/// Durable key/value storage for one piece of process-wide state.
///
/// Each key is a JSON file under the data directory. Loading never fails:
/// a missing or unreadable file yields `T::default()`. Saving writes a temp
/// file next to the target and renames it over, so a crash mid-write leaves
/// the previous contents intact.
#[derive(Debug, Clone)]
pub struct PersistedStore<T> {
    dir: PathBuf,
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PersistedStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(dir: impl Into<PathBuf>, key: &str) -> Self {
        let dir = dir.into();
        let path = dir.join(format!("{}.json", key));
        Self {
            dir,
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored value, falling back to the default on any failure.
    pub fn load(&self) -> T {
        match self.try_load() {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "stored state unreadable, starting empty");
                T::default()
            }
        }
    }

    /// Like [`load`](Self::load) but reports what went wrong.
    /// `Ok(None)` means nothing has been stored yet.
    pub fn try_load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save(&self, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            NewsError::Storage(format!("cannot create {}: {}", self.dir.display(), e))
        })?;

        let content = serde_json::to_string_pretty(value)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| NewsError::Storage(format!("cannot write {}: {}", self.path.display(), e.error)))?;
        Ok(())
    }

    /// Read-modify-persist in one step. `f` returns whether it changed the
    /// value; unchanged values are not written back.
    ///
    /// Unlike [`load`](Self::load) this refuses to run over a file it cannot
    /// read, so unreadable state is never replaced by a default.
    pub fn update<F>(&self, f: F) -> Result<(T, bool)>
    where
        F: FnOnce(&mut T) -> bool,
    {
        let mut value = self.try_load()?.unwrap_or_default();
        let changed = f(&mut value);
        if changed {
            self.save(&value)?;
        }
        Ok((value, changed))
    }
}
