//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub url: String,
    pub output: OutputMode,

    #[serde(default)]
    pub markdown: MarkdownConfig,

    // Content
    pub content_dir: String,
    #[serde(default)]
    pub collections: HashMap<String, CollectionOverride>,

    #[serde(default)]
    pub comments: CommentsConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "http://example.com".to_string(),
            output: OutputMode::Static,
            markdown: MarkdownConfig::default(),
            content_dir: "src/content".to_string(),
            collections: HashMap::new(),
            comments: CommentsConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Loader override for a collection, if the config declares one
    pub fn collection(&self, name: &str) -> Option<&CollectionOverride> {
        self.collections.get(name)
    }
}

/// How the host framework emits the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Static,
    Server,
}

/// Markdown rendering settings handed through to the host framework
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub themes: ThemesConfig,
}

/// Code highlighting themes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemesConfig {
    pub light: String,
    pub dark: String,
}

impl Default for ThemesConfig {
    fn default() -> Self {
        Self {
            light: "dracula".to_string(),
            dark: "dracula".to_string(),
        }
    }
}

/// Glob loader override for one collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionOverride {
    /// Base directory, relative to the site root
    pub base: String,
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_pattern() -> String {
    "**/*.md".to_string()
}

/// Utterances comment widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    /// GitHub repository (`owner/name`) holding the comment issues
    pub repo: Option<String>,
    pub issue_term: String,
    pub theme: String,
    pub label: Option<String>,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            repo: None,
            issue_term: "pathname".to_string(),
            theme: "github-light".to_string(),
            label: None,
        }
    }
}
