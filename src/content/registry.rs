//! Collection registry and the two-pass content load

use indexmap::IndexMap;
use std::path::Path;

use super::collection::Collection;
use super::error::{ContentError, ValidationReport};
use super::reference;
use super::store::ContentStore;

/// An ordered set of collections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    collections: IndexMap<String, Collection>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection, replacing any with the same name
    pub fn define(&mut self, collection: Collection) -> &mut Self {
        self.collections
            .insert(collection.name().to_string(), collection);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    /// Like [`Registry::get`], but an unknown name is an error
    pub fn require(&self, name: &str) -> Result<&Collection, ContentError> {
        self.get(name)
            .ok_or_else(|| ContentError::NotRegistered(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Every reference field must target a registered collection
    pub fn check_references(&self) -> Result<(), ContentError> {
        for collection in self.iter() {
            for target in collection.schema().references() {
                if !self.collections.contains_key(target) {
                    return Err(ContentError::UnknownCollection {
                        collection: collection.name().to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Load every collection, then resolve references across them.
    ///
    /// Either every entry is valid and every reference resolves, or the
    /// error carries every problem found in the pass.
    pub fn load(&self, root: &Path, content_dir: &Path) -> Result<ContentStore, ContentError> {
        self.check_references()?;

        let mut report = ValidationReport::default();
        let mut store = ContentStore::default();
        for collection in self.iter() {
            let (entries, issues) = collection.load_entries(root, content_dir)?;
            report.extend(issues);
            store.insert_collection(collection.name(), entries);
        }

        report.extend(reference::validate_all(&store));
        report.into_result()?;

        tracing::info!(
            "Loaded {} entries from {} collections",
            store.len(),
            self.collections.len()
        );
        Ok(store)
    }
}
