//! Pre-seeding the ledger from an existing output tree.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use crate::dedup::hash::hash_file;
use crate::error::Result;

/// Walk an output tree and hash every regular file, returning the seed
/// mapping for the ledger. Hashing runs on a bounded worker pool; results
/// are merged once all workers finish, so no ordering is guaranteed (or
/// needed) between files.
pub async fn seed_from_directory(
    root: &Path,
    workers: usize,
    show_progress: bool,
) -> Result<HashMap<String, PathBuf>> {
    if !root.exists() {
        return Ok(HashMap::new());
    }

    let files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    let progress = if show_progress && !files.is_empty() {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} scanning [{bar:40.cyan/blue}] {pos}/{len}")
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(bar)
    } else {
        None
    };

    let workers = workers.max(1);
    let results: Vec<Option<(String, PathBuf)>> = stream::iter(files)
        .map(|path| {
            let progress = progress.clone();
            async move {
                let hashed = tokio::task::spawn_blocking({
                    let path = path.clone();
                    move || hash_file(&path)
                })
                .await;

                if let Some(ref bar) = progress {
                    bar.inc(1);
                }

                match hashed {
                    Ok(Ok(hash)) => Some((hash, path)),
                    Ok(Err(e)) => {
                        tracing::warn!("Failed to hash {}: {}", path.display(), e);
                        None
                    }
                    Err(e) => {
                        tracing::warn!("Hash worker panicked for {}: {}", path.display(), e);
                        None
                    }
                }
            }
        })
        .buffer_unordered(workers)
        .collect()
        .await;

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    let mut seed = HashMap::new();
    for (hash, path) in results.into_iter().flatten() {
        seed.entry(hash).or_insert(path);
    }

    Ok(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::hash_bytes;
    use std::fs;

    #[tokio::test]
    async fn test_scan_missing_directory_is_empty() {
        let seed = seed_from_directory(Path::new("/nonexistent/tree"), 4, false)
            .await
            .unwrap();
        assert!(seed.is_empty());
    }

    #[tokio::test]
    async fn test_scan_walks_nested_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.jpg"), b"alpha").unwrap();
        fs::write(dir.path().join("sub/b.jpg"), b"beta").unwrap();

        let seed = seed_from_directory(dir.path(), 4, false).await.unwrap();

        assert_eq!(seed.len(), 2);
        assert!(seed.contains_key(&hash_bytes(b"alpha")));
        assert!(seed.contains_key(&hash_bytes(b"beta")));
    }

    #[tokio::test]
    async fn test_scan_keeps_one_path_per_hash() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.jpg"), b"same").unwrap();
        fs::write(dir.path().join("two.jpg"), b"same").unwrap();

        let seed = seed_from_directory(dir.path(), 4, false).await.unwrap();

        assert_eq!(seed.len(), 1);
        let kept = &seed[&hash_bytes(b"same")];
        assert!(kept.ends_with("one.jpg") || kept.ends_with("two.jpg"));
    }
}
