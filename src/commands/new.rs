//! Create a new entry from a collection's schema

use anyhow::Result;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::PathBuf;

use crate::content::Schema;
use crate::Site;

/// Write a scaffold for a new entry and return its path
pub fn create_entry(site: &Site, collection: &str, title: &str) -> Result<PathBuf> {
    let collection = site.registry.require(collection)?;
    let target_dir = collection.base_dir(&site.base_dir, &site.content_dir);
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug::slugify(title)));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let frontmatter = scaffold(collection.schema(), "", title, &today).unwrap_or(Value::Null);
    let content = format!("---\n{}---\n", serde_yaml::to_string(&frontmatter)?);

    fs::write(&file_path, content)?;
    tracing::info!("Created {:?}", file_path);

    Ok(file_path)
}

/// Placeholder value for every required field
fn scaffold(schema: &Schema, field: &str, title: &str, today: &str) -> Option<Value> {
    match schema {
        Schema::Optional(_) => None,
        Schema::String if matches!(field, "title" | "name") => Some(Value::from(title)),
        Schema::String | Schema::Reference(_) => Some(Value::from("")),
        Schema::Date => Some(Value::from(today)),
        Schema::Array(_) => Some(Value::Sequence(Vec::new())),
        Schema::Object(object) => {
            let mut mapping = Mapping::new();
            for (name, schema) in object.fields() {
                if let Some(value) = scaffold(schema, name, title, today) {
                    mapping.insert(Value::from(name), value);
                }
            }
            Some(Value::Mapping(mapping))
        }
    }
}

/// Run the new command
pub fn run(site: &Site, collection: &str, title: &str) -> Result<()> {
    let path = create_entry(site, collection, title)?;
    println!("Created: {:?}", path);
    Ok(())
}
