//! The blog's collections and their typed records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::collection::{define_collection, Collection, CollectionData};
use super::discover::Loader;
use super::registry::Registry;
use super::schema::{Reference, Schema};
use crate::config::SiteConfig;

pub const BLOG: &str = "blog";
pub const CHARACTERS: &str = "characters";
pub const CONVERSATIONS: &str = "conversations";

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub summary: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl CollectionData for BlogPost {
    const COLLECTION: &'static str = BLOG;
}

/// An image with alt text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

/// A person who appears in conversations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub nationality: String,
    pub fields: Vec<String>,
    pub image: Image,
}

impl CollectionData for Character {
    const COLLECTION: &'static str = CHARACTERS;
}

/// An imagined conversation with a character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub name: String,
    pub topic: String,
    pub image: Image,
    pub sentences: Vec<String>,
    pub character: Reference,
}

impl CollectionData for Conversation {
    const COLLECTION: &'static str = CONVERSATIONS;
}

fn image_schema() -> Schema {
    Schema::object()
        .field("src", Schema::string())
        .field("alt", Schema::string())
        .into()
}

pub fn blog_schema() -> Schema {
    Schema::object()
        .field("title", Schema::string())
        .field("summary", Schema::string())
        .field("date", Schema::date())
        .field("imageURL", Schema::string())
        .field("tags", Schema::array(Schema::string()).optional())
        .into()
}

pub fn character_schema() -> Schema {
    Schema::object()
        .field("name", Schema::string())
        .field("nationality", Schema::string())
        .field("fields", Schema::array(Schema::string()))
        .field("image", image_schema())
        .into()
}

pub fn conversation_schema() -> Schema {
    Schema::object()
        .field("name", Schema::string())
        .field("topic", Schema::string())
        .field("image", image_schema())
        .field("sentences", Schema::array(Schema::string()))
        .field("character", Schema::reference(CHARACTERS))
        .into()
}

/// The blog's three collections, with loader overrides from the config
pub fn site_registry(config: &SiteConfig) -> Registry {
    let loader = |name: &str, default: Loader| match config.collection(name) {
        Some(o) => Loader::glob(&o.pattern, &o.base),
        None => default,
    };

    for name in config.collections.keys() {
        if ![BLOG, CHARACTERS, CONVERSATIONS].contains(&name.as_str()) {
            tracing::warn!("Ignoring loader override for unknown collection {}", name);
        }
    }

    let collections: [Collection; 3] = [
        define_collection(BLOG, loader(BLOG, Loader::Convention), blog_schema()),
        define_collection(
            CHARACTERS,
            loader(CHARACTERS, Loader::glob("**/*.md", "src/data/characters")),
            character_schema(),
        ),
        define_collection(
            CONVERSATIONS,
            loader(
                CONVERSATIONS,
                Loader::glob("**/*.md", "src/data/conversations"),
            ),
            conversation_schema(),
        ),
    ];

    let mut registry = Registry::new();
    for collection in collections {
        registry.define(collection);
    }
    registry
}
