//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::helpers::{is_valid_format, DEFAULT_TIMESTAMP_FORMAT};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub language: String,
    /// IANA time zone name used for timestamps; empty means host local time
    pub timezone: String,

    // Storage
    /// Post collection file, relative to the base directory
    pub db_file: String,
    /// chrono format used when timestamps are displayed
    pub timestamp_format: String,

    // Writing
    pub excerpt_length: usize,
    pub words_per_minute: usize,
    /// Show drafts on the index and post pages
    pub show_drafts: bool,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Server
    #[serde(default)]
    pub server: ServerConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Markdown Blog".to_string(),
            subtitle: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),
            timezone: String::new(),

            db_file: "db/posts.json".to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),

            excerpt_length: 150,
            words_per_minute: 200,
            show_drafts: false,
            highlight: HighlightConfig::default(),

            server: ServerConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
        let mut config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse {:?}", path))?;
        config.check_timestamp_format();
        Ok(config)
    }

    /// Replace an unusable `timestamp_format` with the default
    pub fn check_timestamp_format(&mut self) {
        if !is_valid_format(&self.timestamp_format) {
            tracing::warn!(
                "Invalid timestamp_format {:?}, using {:?}",
                self.timestamp_format,
                DEFAULT_TIMESTAMP_FORMAT
            );
            self.timestamp_format = DEFAULT_TIMESTAMP_FORMAT.to_string();
        }
    }

    /// Resolve the configured time zone, `None` meaning host local time
    pub fn time_zone(&self) -> Option<Tz> {
        if self.timezone.trim().is_empty() {
            return None;
        }
        match self.timezone.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(_) => {
                tracing::warn!("Unknown timezone {:?}, using local time", self.timezone);
                None
            }
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    /// syntect theme name
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "InspiredGitHub".to_string(),
            line_number: false,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.db_file, "db/posts.json");
        assert_eq!(config.excerpt_length, 150);
        assert_eq!(config.server.port, 3000);
        assert!(config.highlight.enable);
        assert!(config.time_zone().is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
timezone: Asia/Seoul
show_drafts: true
server:
  port: 8080
highlight:
  line_number: true
comments_enabled: yes
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert!(config.show_drafts);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "127.0.0.1");
        assert!(config.highlight.line_number);
        assert_eq!(config.highlight.theme, "InspiredGitHub");
        assert_eq!(config.time_zone(), Some(chrono_tz::Asia::Seoul));
        assert!(config.extra.contains_key("comments_enabled"));
    }

    #[test]
    fn test_unknown_timezone_falls_back() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..SiteConfig::default()
        };
        assert!(config.time_zone().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "title: From Disk\nexcerpt_length: 80\n").unwrap();
        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.title, "From Disk");
        assert_eq!(config.excerpt_length, 80);
        assert_eq!(config.words_per_minute, 200);
    }

    #[test]
    fn test_invalid_timestamp_format_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "timestamp_format: \"%Q\"\n").unwrap();
        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);

        fs::write(&path, "timestamp_format: \"%d/%m/%Y\"\n").unwrap();
        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.timestamp_format, "%d/%m/%Y");
    }
}
