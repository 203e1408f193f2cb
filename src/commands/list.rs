//! List the entries of a collection

use anyhow::Result;

use crate::content::models::BLOG;
use crate::content::{BlogPost, CollectionEntry};
use crate::Site;

/// Print one line per entry, or the entries as JSON
pub fn run(site: &Site, collection: &str, json: bool) -> Result<()> {
    site.registry.require(collection)?;
    let store = site.load_content()?;
    let entries: Vec<&CollectionEntry> = store.collection(collection).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{} ({}):", collection, entries.len());
    for entry in entries {
        println!("  {}", describe(site, entry)?);
    }

    Ok(())
}

fn describe(site: &Site, entry: &CollectionEntry) -> Result<String> {
    let source = entry
        .path
        .strip_prefix(&site.base_dir)
        .unwrap_or(entry.path.as_path())
        .display();

    if entry.collection == BLOG {
        let post: BlogPost = entry.parse()?;
        return Ok(format!(
            "{} - {} [{}]",
            post.date.format("%Y-%m-%d"),
            post.title,
            source
        ));
    }
    Ok(format!("{} [{}]", entry.id, source))
}
