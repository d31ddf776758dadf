//! folio-rs: markdown content loader for a portfolio blog
//!
//! Reads a directory of markdown posts with YAML front-matter, derives read
//! time, and renders bodies to HTML on demand. Every call reads the directory
//! afresh; there is no cache to invalidate.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod server;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

/// Name of the site configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// A portfolio site rooted at a base directory
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the blog posts
    pub content_dir: PathBuf,
}

impl Folio {
    /// Open the site in `base_dir`, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build from an already loaded configuration
    pub fn with_config<P: Into<PathBuf>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.into();
        let content_dir = base_dir.join(&config.content_dir);
        Self {
            config,
            base_dir,
            content_dir,
        }
    }

    /// Repository over this site's content directory
    pub fn repository(&self) -> content::ContentRepository {
        content::ContentRepository::from_site(self)
    }
}
