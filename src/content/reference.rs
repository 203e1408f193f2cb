//! Cross-collection reference resolution

use super::collection::CollectionEntry;
use super::error::{Issue, ReferenceError, ValidationReport};
use super::store::ContentStore;

/// Check that `target_id` names an entry of `target_collection`
pub fn validate_reference(
    source_entry: &CollectionEntry,
    field_path: &str,
    target_collection: &str,
    target_id: &str,
    store: &ContentStore,
) -> Result<(), ReferenceError> {
    if store.get(target_collection, target_id).is_some() {
        return Ok(());
    }
    Err(ReferenceError {
        target_collection: target_collection.to_string(),
        target_id: target_id.to_string(),
        source_entry: format!("{}/{}", source_entry.collection, source_entry.id),
        field: field_path.to_string(),
    })
}

/// Check every reference held by every entry in the store
pub fn validate_all(store: &ContentStore) -> ValidationReport {
    let mut report = ValidationReport::default();
    for entry in store.entries() {
        for (field, reference) in entry.data.references() {
            if let Err(e) =
                validate_reference(entry, &field, &reference.collection, &reference.id, store)
            {
                tracing::debug!("Unresolved reference in {}/{}: {}", entry.collection, entry.id, field);
                report.push(Issue::Reference(e));
            }
        }
    }
    report
}
