//! Loaded, validated content for one pass

use indexmap::IndexMap;

use super::collection::{CollectionData, CollectionEntry};
use super::discover::normalize_id;
use super::error::ContentError;
use super::schema::Reference;

/// Every validated entry, grouped by collection. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentStore {
    collections: IndexMap<String, IndexMap<String, CollectionEntry>>,
}

impl ContentStore {
    pub(crate) fn insert_collection(&mut self, name: &str, entries: Vec<CollectionEntry>) {
        let entries = entries.into_iter().map(|e| (e.id.clone(), e)).collect();
        self.collections.insert(name.to_string(), entries);
    }

    /// Names of the loaded collections
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Entries of one collection, in source path order
    pub fn collection(&self, name: &str) -> impl Iterator<Item = &CollectionEntry> {
        self.collections.get(name).into_iter().flat_map(|c| c.values())
    }

    /// Every entry of every collection
    pub fn entries(&self) -> impl Iterator<Item = &CollectionEntry> {
        self.collections.values().flat_map(|c| c.values())
    }

    /// Look up an entry by id, or by `id` slugified segment by segment so
    /// that `Ada` finds `Ada.md` and `Deep/Grace` finds `deep/Grace.md`
    pub fn get(&self, collection: &str, id: &str) -> Option<&CollectionEntry> {
        let entries = self.collections.get(collection)?;
        entries
            .get(id)
            .or_else(|| entries.get(normalize_id(id).as_str()))
    }

    /// Follow a reference to its entry
    pub fn resolve(&self, reference: &Reference) -> Option<&CollectionEntry> {
        self.get(&reference.collection, &reference.id)
    }

    pub fn len(&self) -> usize {
        self.collections.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Typed records of the collection `T` is bound to
    pub fn parse_all<T: CollectionData>(&self) -> Result<Vec<T>, ContentError> {
        self.collection(T::COLLECTION)
            .map(CollectionEntry::parse::<T>)
            .collect()
    }
}
