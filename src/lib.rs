//! folio: typed content collections for a markdown blog
//!
//! This crate declares the blog's content collections, validates every
//! entry's frontmatter against its collection schema, and resolves
//! references between collections before anything downstream renders
//! pages.

pub mod commands;
pub mod comments;
pub mod config;
pub mod content;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentError, ContentStore, Registry};

/// A blog site on disk
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding convention-loaded collections, relative to `base_dir`
    pub content_dir: PathBuf,
    /// Declared collections
    pub registry: Registry,
}

impl Site {
    /// Create a site from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = PathBuf::from(&config.content_dir);
        let registry = content::models::site_registry(&config);
        Self {
            config,
            base_dir,
            content_dir,
            registry,
        }
    }

    /// Load and validate every collection
    pub fn load_content(&self) -> Result<ContentStore, ContentError> {
        self.registry.load(&self.base_dir, &self.content_dir)
    }

    /// Directories holding each collection's files
    pub fn collection_dirs(&self) -> Vec<PathBuf> {
        self.registry
            .iter()
            .map(|c| c.base_dir(&self.base_dir, &self.content_dir))
            .collect()
    }
}
