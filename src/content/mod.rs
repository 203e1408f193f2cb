//! Content module - collections, schemas, loading and reference resolution

mod collection;
mod date;
pub mod discover;
mod error;
mod frontmatter;
pub mod models;
pub mod reference;
mod registry;
pub mod schema;
mod store;

pub use collection::{define_collection, Collection, CollectionData, CollectionEntry};
pub use discover::{discover, Discovered, Loader, RawEntry};
pub use error::{
    ContentError, DuplicateId, FieldViolation, FrontmatterError, Issue, ReferenceError,
    SchemaValidationError, UnreadableEntry, ValidationReport, Violation,
};
pub use frontmatter::{FrontMatter, FrontmatterParseError};
pub use models::{BlogPost, Character, Conversation, Image};
pub use reference::validate_reference;
pub use registry::Registry;
pub use schema::{Data, ObjectSchema, Reference, Schema};
pub use store::ContentStore;
