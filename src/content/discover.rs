//! Entry discovery - maps a collection's loader to the files that populate it

use glob::{MatchOptions, Pattern};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::{ContentError, UnreadableEntry};

/// How a collection finds its source files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loader {
    /// Every markdown file under `<content_dir>/<collection name>`
    Convention,
    /// Files under `base` (relative to the site root) matching `pattern`
    Glob { pattern: String, base: PathBuf },
}

impl Loader {
    pub fn glob<P: Into<PathBuf>>(pattern: &str, base: P) -> Self {
        Loader::Glob {
            pattern: pattern.to_string(),
            base: base.into(),
        }
    }

    /// Directory this loader scans
    pub fn base_dir(&self, root: &Path, content_dir: &Path, collection: &str) -> PathBuf {
        match self {
            Loader::Convention => root.join(content_dir).join(collection),
            Loader::Glob { base, .. } => root.join(base),
        }
    }
}

/// A discovered file, before frontmatter parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub id: String,
    pub path: PathBuf,
    pub content: String,
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// What a scan found: readable entries, and paths that could not be read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    /// In path order
    pub entries: Vec<RawEntry>,
    pub unreadable: Vec<UnreadableEntry>,
}

/// Scan storage for a collection's entries, in path order.
///
/// A missing base directory yields no entries. Files or directories that
/// cannot be walked or read are returned in `unreadable`, never dropped.
pub fn discover(
    loader: &Loader,
    root: &Path,
    content_dir: &Path,
    collection: &str,
) -> Result<Discovered, ContentError> {
    let base = loader.base_dir(root, content_dir, collection);
    if !base.is_dir() {
        tracing::debug!("No directory for collection {}: {:?}", collection, base);
        return Ok(Discovered::default());
    }

    let pattern = match loader {
        Loader::Convention => None,
        Loader::Glob { pattern, .. } => {
            Some(Pattern::new(pattern).map_err(|e| ContentError::Pattern {
                collection: collection.to_string(),
                pattern: pattern.clone(),
                message: e.to_string(),
            })?)
        }
    };
    let selects = |relative: &str| match &pattern {
        Some(pattern) => pattern.matches_with(relative, MATCH_OPTIONS),
        None => is_markdown_file(Path::new(relative)) && !is_hidden_by_underscore(relative),
    };
    let unreadable = |path: PathBuf, message: String| UnreadableEntry {
        collection: collection.to_string(),
        path,
        message,
    };

    let mut files = Vec::new();
    let mut failures = Vec::new();
    for entry in WalkDir::new(&base).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| base.clone());
                let relative = path.strip_prefix(&base).map(to_slash).unwrap_or_default();
                // A broken file link that would not be an entry anyway
                let is_other_file = e.loop_ancestor().is_none()
                    && !path.is_dir()
                    && Path::new(&relative).extension().is_some()
                    && !selects(&relative);
                if is_other_file {
                    tracing::debug!("Skipping unreadable non-entry {:?}: {}", path, e);
                } else {
                    tracing::warn!("Cannot read {:?}: {}", path, e);
                    failures.push(unreadable(path, e.to_string()));
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&base) else {
            continue;
        };
        let relative = to_slash(relative);
        if selects(&relative) {
            files.push((relative, entry.into_path()));
        }
    }
    files.sort();

    tracing::debug!("Discovered {} file(s) for collection {}", files.len(), collection);

    let read: Vec<Result<RawEntry, UnreadableEntry>> = files
        .into_par_iter()
        .map(|(relative, path)| match fs::read_to_string(&path) {
            Ok(content) => Ok(RawEntry {
                id: entry_id(&relative),
                path,
                content,
            }),
            Err(e) => Err(unreadable(path, e.to_string())),
        })
        .collect();

    let mut discovered = Discovered::default();
    for result in read {
        match result {
            Ok(entry) => discovered.entries.push(entry),
            Err(failure) => failures.push(failure),
        }
    }
    failures.sort_by(|a, b| a.path.cmp(&b.path));
    discovered.unreadable = failures;
    Ok(discovered)
}

/// Identifier for a path relative to the collection base: extension
/// stripped, each segment slugified.
pub fn entry_id(relative: &str) -> String {
    let without_ext = match relative.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !stem.ends_with('/') && !ext.contains('/') => {
            stem
        }
        _ => relative,
    };
    normalize_id(without_ext)
}

/// Slugify each `/`-separated segment of an identifier
pub fn normalize_id(id: &str) -> String {
    id.split('/')
        .filter(|segment| !segment.is_empty())
        .map(slug::slugify)
        .collect::<Vec<_>>()
        .join("/")
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e, "md" | "markdown" | "mdx"))
        .unwrap_or(false)
}

/// Paths with a segment starting with `_` are not entries
fn is_hidden_by_underscore(relative: &str) -> bool {
    relative.split('/').any(|segment| segment.starts_with('_'))
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_entry_id() {
        assert_eq!(entry_id("Ada.md"), "ada");
        assert_eq!(entry_id("2024/My First Post.mdx"), "2024/my-first-post");
        assert_eq!(entry_id("notes"), "notes");
        assert_eq!(entry_id("v1.2/release.md"), "v1-2/release");
        assert_eq!(entry_id("v1.2/release"), "v1-2/release");
    }

    #[test]
    fn test_normalize_id_matches_entry_id() {
        assert_eq!(normalize_id("Deep/Grace"), "deep/grace");
        assert_eq!(normalize_id("Ada"), entry_id("Ada.md"));
    }

    #[test]
    fn test_invalid_utf8_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/content/blog/a.md", "a");
        fs::write(root.join("src/content/blog/b.md"), [0xff, 0xfe, 0x00]).unwrap();

        let discovered =
            discover(&Loader::Convention, root, Path::new("src/content"), "blog").unwrap();
        assert_eq!(discovered.entries.len(), 1);
        assert_eq!(discovered.unreadable.len(), 1);
        assert!(discovered.unreadable[0].path.ends_with("b.md"));
        assert_eq!(discovered.unreadable[0].collection, "blog");
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/content/blog/a.md", "a");
        std::os::unix::fs::symlink(
            root.join("missing.md"),
            root.join("src/content/blog/post.md"),
        )
        .unwrap();
        // Not an entry either way
        std::os::unix::fs::symlink(
            root.join("missing.png"),
            root.join("src/content/blog/cover.png"),
        )
        .unwrap();

        let discovered =
            discover(&Loader::Convention, root, Path::new("src/content"), "blog").unwrap();
        assert_eq!(discovered.entries.len(), 1);
        assert_eq!(discovered.unreadable.len(), 1);
        assert!(discovered.unreadable[0].path.ends_with("post.md"));
    }

    #[test]
    fn test_convention_loader() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/content/blog/b.md", "b");
        write(root, "src/content/blog/a.mdx", "a");
        write(root, "src/content/blog/nested/c.md", "c");
        write(root, "src/content/blog/_drafts/d.md", "d");
        write(root, "src/content/blog/cover.png", "");

        let entries = discover(&Loader::Convention, root, Path::new("src/content"), "blog")
            .unwrap()
            .entries;
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "nested/c"]);
        assert_eq!(entries[0].content, "a");
    }

    #[test]
    fn test_glob_loader() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "src/data/characters/Ada.md", "ada");
        write(root, "src/data/characters/deep/Grace.md", "grace");
        write(root, "src/data/characters/notes.txt", "");

        let loader = Loader::glob("**/*.md", "src/data/characters");
        let entries = discover(&loader, root, Path::new("src/content"), "characters")
            .unwrap()
            .entries;
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["ada", "deep/grace"]);

        let loader = Loader::glob("*.md", "src/data/characters");
        let entries = discover(&loader, root, Path::new("src/content"), "characters")
            .unwrap()
            .entries;
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let discovered =
            discover(&Loader::Convention, dir.path(), Path::new("src/content"), "blog").unwrap();
        assert_eq!(discovered, Discovered::default());
    }

    #[test]
    fn test_bad_pattern() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        let loader = Loader::glob("[", "data");
        let err = discover(&loader, dir.path(), Path::new("src/content"), "x").unwrap_err();
        assert!(matches!(err, ContentError::Pattern { .. }));
    }
}
