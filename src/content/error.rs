//! Content loading and validation errors

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a content load
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Invalid glob pattern {pattern:?} for collection {collection}: {message}")]
    Pattern {
        collection: String,
        pattern: String,
        message: String,
    },

    #[error("Collection {collection} references unknown collection {target}")]
    UnknownCollection { collection: String, target: String },

    #[error("Unknown collection: {0}")]
    NotRegistered(String),

    #[error("Could not convert {collection}/{entry} into its typed record: {source}")]
    Data {
        collection: String,
        entry: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Invalid(ValidationReport),
}

/// Why a single field failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Missing,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    UnparsableDate(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing => f.write_str("missing"),
            Violation::WrongType { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            Violation::UnparsableDate(raw) => write!(f, "unparsable date {:?}", raw),
        }
    }
}

/// A field-level violation, before it is attributed to an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted field path, with list indices (`image.src`, `tags[1]`)
    pub field: String,
    pub violation: Violation,
}

/// A frontmatter field that failed its schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaValidationError {
    pub collection: String,
    pub entry: String,
    pub field: String,
    pub violation: Violation,
}

/// A reference naming an entry that does not exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceError {
    pub target_collection: String,
    pub target_id: String,
    pub source_entry: String,
    pub field: String,
}

/// A frontmatter block that is not valid YAML or JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterError {
    pub collection: String,
    pub entry: String,
    pub message: String,
}

/// Two source files that map to the same identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateId {
    pub collection: String,
    pub entry: String,
    pub paths: Vec<PathBuf>,
}

/// A file or directory in a collection that could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadableEntry {
    pub collection: String,
    pub path: PathBuf,
    pub message: String,
}

/// One problem found while validating content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    Schema(SchemaValidationError),
    Reference(ReferenceError),
    Frontmatter(FrontmatterError),
    Duplicate(DuplicateId),
    Unreadable(UnreadableEntry),
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::Schema(e) => write!(
                f,
                "{}/{}: {}: {}",
                e.collection, e.entry, e.field, e.violation
            ),
            Issue::Reference(e) => write!(
                f,
                "{}: {}: no entry {:?} in collection {}",
                e.source_entry, e.field, e.target_id, e.target_collection
            ),
            Issue::Frontmatter(e) => write!(
                f,
                "{}/{}: invalid frontmatter: {}",
                e.collection, e.entry, e.message
            ),
            Issue::Duplicate(e) => write!(
                f,
                "{}/{}: duplicate id from {:?}",
                e.collection, e.entry, e.paths
            ),
            Issue::Unreadable(e) => {
                write!(f, "{}: cannot read {:?}: {}", e.collection, e.path, e.message)
            }
        }
    }
}

/// Every issue found during one load pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    pub fn schema_errors(&self) -> impl Iterator<Item = &SchemaValidationError> {
        self.issues.iter().filter_map(|i| match i {
            Issue::Schema(e) => Some(e),
            _ => None,
        })
    }

    pub fn reference_errors(&self) -> impl Iterator<Item = &ReferenceError> {
        self.issues.iter().filter_map(|i| match i {
            Issue::Reference(e) => Some(e),
            _ => None,
        })
    }

    /// `Ok(())` when nothing was reported
    pub fn into_result(self) -> Result<(), ContentError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ContentError::Invalid(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} content issue(s):", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  {}", issue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display_lists_every_issue() {
        let mut report = ValidationReport::default();
        report.push(Issue::Schema(SchemaValidationError {
            collection: "blog".to_string(),
            entry: "hello".to_string(),
            field: "title".to_string(),
            violation: Violation::Missing,
        }));
        report.push(Issue::Schema(SchemaValidationError {
            collection: "blog".to_string(),
            entry: "hello".to_string(),
            field: "date".to_string(),
            violation: Violation::UnparsableDate("soon".to_string()),
        }));

        let text = report.to_string();
        assert!(text.starts_with("2 content issue(s):"));
        assert!(text.contains("blog/hello: title: missing"));
        assert!(text.contains("blog/hello: date: unparsable date \"soon\""));
    }

    #[test]
    fn test_empty_report_is_ok() {
        assert!(ValidationReport::default().into_result().is_ok());
    }
}
