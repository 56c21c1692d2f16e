//! Storage backends for the post collection
//!
//! A backend only knows how to load and save the whole collection. The
//! [`Store`](super::Store) layers the read-modify-write operations and the
//! single-writer lock on top.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::error::{StoreError, StoreResult};
use crate::content::Post;

/// Whole-collection persistence
pub trait StorageBackend: Send + Sync {
    /// Load every post; a missing collection is empty, not an error
    fn load(&self) -> StoreResult<Vec<Post>>;

    /// Replace the persisted collection
    fn save(&self, posts: &[Post]) -> StoreResult<()>;

    /// Human readable location for logs
    fn describe(&self) -> String;

    /// Move an unreadable collection out of the way before it is replaced.
    /// Returns where it went, if anywhere.
    fn set_aside(&self) -> StoreResult<Option<String>> {
        Ok(None)
    }
}

/// Pretty-printed JSON array on disk, replaced atomically on save
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling of the collection file with `suffix` appended
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "posts.json".into());
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    /// Where an unreadable collection is kept
    pub fn corrupt_path(&self) -> PathBuf {
        self.sibling(".corrupt")
    }
}

impl StorageBackend for JsonFileBackend {
    fn load(&self) -> StoreResult<Vec<Post>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, posts: &[Post]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let content = serde_json::to_string_pretty(posts)?;
        let temp = self.temp_path();
        fs::write(&temp, content).map_err(|e| StoreError::io(&temp, e))?;
        fs::rename(&temp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn set_aside(&self) -> StoreResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let target = self.corrupt_path();
        fs::rename(&self.path, &target).map_err(|e| StoreError::io(&target, e))?;
        Ok(Some(target.display().to_string()))
    }
}

/// In-memory collection, for tests and throwaway servers
#[derive(Debug, Default)]
pub struct MemoryBackend {
    posts: Mutex<Vec<Post>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> StoreResult<Vec<Post>> {
        Ok(self
            .posts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, posts: &[Post]) -> StoreResult<()> {
        *self.posts.lock().unwrap_or_else(PoisonError::into_inner) = posts.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
