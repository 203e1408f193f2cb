//! Validate every collection

use anyhow::{bail, Result};
use notify::Watcher;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::content::ContentError;
use crate::Site;

/// Load all content, printing a summary or every issue found
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    match site.load_content() {
        Ok(store) => {
            for name in store.collection_names() {
                println!("  {} ({})", name, store.collection(name).count());
            }
            tracing::info!(
                "Checked {} entries in {:.2}s",
                store.len(),
                start.elapsed().as_secs_f64()
            );
            Ok(())
        }
        Err(ContentError::Invalid(report)) => {
            eprintln!("{}", report);
            bail!("content check failed with {} issue(s)", report.len());
        }
        Err(e) => Err(e.into()),
    }
}

/// Watch content directories and the config file, re-checking on change
pub async fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for dir in site.collection_dirs() {
        if dir.exists() {
            watcher.watch(&dir, notify::RecursiveMode::Recursive)?;
        } else {
            tracing::debug!("Not watching missing directory {:?}", dir);
        }
    }

    let config_path = site.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(Path::new(&config_path), notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_check = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                // Debounce: only re-check if more than 500ms since the last one
                if last_check.elapsed() > Duration::from_millis(500) {
                    tracing::info!("Content changed, checking...");
                    let result = Site::new(&site.base_dir).and_then(|site| run(&site));
                    if let Err(e) = result {
                        tracing::error!("{}", e);
                    }
                    last_check = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_check_passes_on_empty_site() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(run(&site).is_ok());
    }

    #[test]
    fn test_check_fails_on_invalid_entry() {
        let dir = TempDir::new().unwrap();
        let blog = dir.path().join("src/content/blog");
        fs::create_dir_all(&blog).unwrap();
        fs::write(blog.join("post.md"), "---\ntitle: Only a title\n---\n").unwrap();

        let site = Site::new(dir.path()).unwrap();
        let err = run(&site).unwrap_err();
        assert_eq!(err.to_string(), "content check failed with 3 issue(s)");
    }
}
