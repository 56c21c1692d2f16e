//! mdblog: a small markdown blog served over HTTP
//!
//! Posts live in a single JSON document. They are rendered from markdown
//! with syntax-highlighted code blocks and served through Tera templates.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;
pub mod store;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::content::MarkdownRenderer;
use crate::helpers::Clock;
use crate::store::Store;

/// The blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Post collection file
    pub db_path: PathBuf,
}

impl Blog {
    /// Create a blog from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config<P: AsRef<Path>>(base_dir: P, mut config: config::SiteConfig) -> Self {
        config.check_timestamp_format();
        let base_dir = base_dir.as_ref().to_path_buf();
        let db_path = base_dir.join(&config.db_file);
        Self {
            config,
            base_dir,
            db_path,
        }
    }

    /// Timestamp source for the configured zone
    pub fn clock(&self) -> Clock {
        Clock::new(self.config.time_zone())
    }

    pub fn open_store(&self) -> Store {
        Store::open(&self.db_path, self.clock())
    }

    pub fn renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::from_config(&self.config.highlight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_blog_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.db_path, dir.path().join("db/posts.json"));
        assert!(blog.open_store().list_all().is_empty());
    }

    #[test]
    fn test_blog_reads_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "title: Notes\ndb_file: data/blog.json\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.title, "Notes");
        assert_eq!(blog.db_path, dir.path().join("data/blog.json"));
    }

    #[test]
    fn test_display_format_does_not_change_storage() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "timestamp_format: \"%d/%m/%Y\"\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        let store = blog.open_store();
        let first = store
            .create(content::NewPost::new("First", "1234567890"))
            .unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(
            &first.created_at,
            helpers::DEFAULT_TIMESTAMP_FORMAT
        )
        .is_ok());

        let updated = store
            .update(first.id, content::PostChanges::default())
            .unwrap()
            .unwrap();
        assert!(updated.updated_at >= first.created_at);
    }

    #[test]
    fn test_invalid_timestamp_format_does_not_break_writes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_config.yml"), "timestamp_format: \"%Q\"\n").unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.timestamp_format, helpers::DEFAULT_TIMESTAMP_FORMAT);
        assert!(blog
            .open_store()
            .create(content::NewPost::new("Hello", "1234567890"))
            .is_ok());
    }
}
