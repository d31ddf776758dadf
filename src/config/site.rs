//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,

    // Directory
    pub content_dir: String,

    // Content
    pub content: ContentConfig,
    pub markdown: MarkdownConfig,

    // Server
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            author: String::new(),
            content_dir: "content/blog".to_string(),
            content: ContentConfig::default(),
            markdown: MarkdownConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {:?}: {}", path, e)))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid {:?}: {}", path, e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the loader cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.content.words_per_minute == 0 {
            return Err(Error::Config(
                "content.words_per_minute must be greater than zero".to_string(),
            ));
        }
        if self.content.extensions.is_empty() {
            return Err(Error::Config(
                "content.extensions must list at least one extension".to_string(),
            ));
        }
        Ok(())
    }
}

/// How documents are discovered and measured
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Reading speed used for the read-time estimate
    pub words_per_minute: usize,
    /// File extensions recognized as documents, without the dot
    pub extensions: Vec<String>,
    /// Log and skip unparseable documents instead of failing the listing
    pub skip_malformed: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
            extensions: vec!["md".to_string(), "markdown".to_string()],
            skip_malformed: false,
        }
    }
}

/// Markdown rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Extended (GFM) syntax: tables, strikethrough, task lists, footnotes
    pub enable_tables: bool,
    pub highlight: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            enable_tables: true,
            highlight: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// JSON server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}
