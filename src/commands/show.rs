//! Print one entry's validated data

use anyhow::{anyhow, Result};

use crate::Site;

pub fn run(site: &Site, collection: &str, id: &str) -> Result<()> {
    site.registry.require(collection)?;
    let store = site.load_content()?;
    let entry = store
        .get(collection, id)
        .ok_or_else(|| anyhow!("No entry {:?} in collection {}", id, collection))?;

    println!("{}", serde_json::to_string_pretty(&entry.data)?);
    Ok(())
}
