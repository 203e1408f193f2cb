//! Collections - a name, a loader and a schema

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::discover::{self, Loader, RawEntry};
use super::error::{
    ContentError, DuplicateId, FrontmatterError, Issue, SchemaValidationError, ValidationReport,
};
use super::frontmatter::FrontMatter;
use super::schema::{Data, Schema};

/// A declared collection
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    name: String,
    loader: Loader,
    schema: Schema,
}

/// Declare a collection. Declaration never fails; problems surface when
/// entries are loaded.
pub fn define_collection(name: &str, loader: Loader, schema: Schema) -> Collection {
    Collection {
        name: name.to_string(),
        loader,
        schema,
    }
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Directory this collection's files live in
    pub fn base_dir(&self, root: &Path, content_dir: &Path) -> PathBuf {
        self.loader.base_dir(root, content_dir, &self.name)
    }

    /// Load and validate every entry.
    ///
    /// Fails with the complete list of problems if any entry is invalid.
    /// References are not resolved here; see [`super::Registry::load`].
    pub fn load_all(
        &self,
        root: &Path,
        content_dir: &Path,
    ) -> Result<Vec<CollectionEntry>, ContentError> {
        let (entries, report) = self.load_entries(root, content_dir)?;
        report.into_result()?;
        Ok(entries)
    }

    /// Load every entry, returning the valid ones alongside every issue
    pub(crate) fn load_entries(
        &self,
        root: &Path,
        content_dir: &Path,
    ) -> Result<(Vec<CollectionEntry>, ValidationReport), ContentError> {
        let discovered = discover::discover(&self.loader, root, content_dir, &self.name)?;

        let results: Vec<Result<CollectionEntry, Vec<Issue>>> = discovered
            .entries
            .into_par_iter()
            .map(|raw| self.validate(raw))
            .collect();

        let mut report = ValidationReport::default();
        for unreadable in discovered.unreadable {
            report.push(Issue::Unreadable(unreadable));
        }
        let mut seen: IndexMap<String, Vec<PathBuf>> = IndexMap::new();
        let mut entries = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(entry) => {
                    seen.entry(entry.id.clone())
                        .or_default()
                        .push(entry.path.clone());
                    entries.push(entry);
                }
                Err(issues) => report.issues.extend(issues),
            }
        }

        for (id, paths) in seen {
            if paths.len() > 1 {
                entries.retain(|e| e.id != id);
                report.push(Issue::Duplicate(DuplicateId {
                    collection: self.name.clone(),
                    entry: id,
                    paths,
                }));
            }
        }

        tracing::debug!(
            "Loaded {} {} entries ({} issues)",
            entries.len(),
            self.name,
            report.len()
        );

        Ok((entries, report))
    }

    fn validate(&self, raw: RawEntry) -> Result<CollectionEntry, Vec<Issue>> {
        let (fm, body) = FrontMatter::parse(&raw.content).map_err(|e| {
            vec![Issue::Frontmatter(FrontmatterError {
                collection: self.name.clone(),
                entry: raw.id.clone(),
                message: e.to_string(),
            })]
        })?;

        let id = fm
            .get_str("slug")
            .map(str::to_string)
            .unwrap_or_else(|| raw.id.clone());

        let data = self.schema.parse(&fm.to_value()).map_err(|violations| {
            violations
                .into_iter()
                .map(|v| {
                    Issue::Schema(SchemaValidationError {
                        collection: self.name.clone(),
                        entry: id.clone(),
                        field: v.field,
                        violation: v.violation,
                    })
                })
                .collect::<Vec<_>>()
        })?;

        Ok(CollectionEntry {
            id,
            collection: self.name.clone(),
            path: raw.path,
            data,
            body: body.to_string(),
        })
    }
}

/// A validated entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionEntry {
    pub id: String,
    pub collection: String,
    /// Source file
    pub path: PathBuf,
    pub data: Data,
    /// Raw body after the frontmatter block
    pub body: String,
}

impl CollectionEntry {
    /// Look up a top-level field
    pub fn get(&self, field: &str) -> Option<&Data> {
        self.data.get(field)
    }

    /// Convert the validated data into its typed record
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ContentError> {
        let convert = || serde_json::to_value(&self.data).and_then(serde_json::from_value);
        convert().map_err(|source| ContentError::Data {
            collection: self.collection.clone(),
            entry: self.id.clone(),
            source,
        })
    }
}

/// A typed record bound to the collection it is loaded from
pub trait CollectionData: DeserializeOwned {
    const COLLECTION: &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::error::Violation;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn notes() -> Collection {
        define_collection(
            "notes",
            Loader::Convention,
            Schema::object()
                .field("title", Schema::string())
                .field("date", Schema::date())
                .into(),
        )
    }

    #[test]
    fn test_load_all_valid() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "content/notes/first.md",
            "---\ntitle: First\ndate: 2024-01-05\n---\nHello",
        );

        let entries = notes()
            .load_all(dir.path(), Path::new("content"))
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "first");
        assert_eq!(entries[0].collection, "notes");
        assert_eq!(entries[0].body, "Hello");
        assert_eq!(
            entries[0].get("title").and_then(Data::as_str),
            Some("First")
        );
    }

    #[test]
    fn test_load_all_reports_every_entry() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/notes/a.md", "---\ndate: 2024-01-05\n---\n");
        write(dir.path(), "content/notes/b.md", "---\ntitle: B\ndate: nope\n---\n");
        write(dir.path(), "content/notes/c.md", "---\ntitle: [x\n---\n");
        write(dir.path(), "content/notes/ok.md", "---\ntitle: Ok\ndate: 2024-01-05\n---\n");

        let err = notes()
            .load_all(dir.path(), Path::new("content"))
            .unwrap_err();
        let ContentError::Invalid(report) = err else {
            panic!("expected a validation report");
        };
        assert_eq!(report.len(), 3);

        let schema: Vec<_> = report
            .schema_errors()
            .map(|e| (e.entry.as_str(), e.field.as_str(), e.violation.clone()))
            .collect();
        assert_eq!(
            schema,
            vec![
                ("a", "title", Violation::Missing),
                ("b", "date", Violation::UnparsableDate("nope".to_string())),
            ]
        );
        assert!(matches!(&report.issues[2], Issue::Frontmatter(e) if e.entry == "c"));
    }

    #[test]
    fn test_slug_overrides_id() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "content/notes/2024-01-05-first.md",
            "---\nslug: hello\ntitle: First\ndate: 2024-01-05\n---\n",
        );
        let entries = notes()
            .load_all(dir.path(), Path::new("content"))
            .unwrap();
        assert_eq!(entries[0].id, "hello");
    }

    #[test]
    fn test_duplicate_ids() {
        let dir = TempDir::new().unwrap();
        let body = "---\ntitle: T\ndate: 2024-01-05\n---\n";
        write(dir.path(), "content/notes/Same.md", body);
        write(dir.path(), "content/notes/same.mdx", body);

        let (entries, report) = notes()
            .load_entries(dir.path(), Path::new("content"))
            .unwrap();
        assert!(entries.is_empty());
        assert!(
            matches!(&report.issues[..], [Issue::Duplicate(d)] if d.entry == "same" && d.paths.len() == 2)
        );
    }

    #[test]
    fn test_load_is_idempotent() {
        let dir = TempDir::new().unwrap();
        for i in 0..8 {
            write(
                dir.path(),
                &format!("content/notes/n{}.md", i),
                &format!("---\ntitle: N{}\ndate: 2024-01-0{}\n---\n", i, i + 1),
            );
        }
        let first = notes().load_all(dir.path(), Path::new("content")).unwrap();
        let second = notes().load_all(dir.path(), Path::new("content")).unwrap();
        assert_eq!(first.len(), 8);
        assert_eq!(first, second);
    }
}
