//! Locating `*.semantic.json` snapshots under an input path.

use crate::semantic::snapshot::SNAPSHOT_SUFFIX;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Largest snapshot the engine will read (10 MB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Directory names never descended into: build output of the host toolchains
/// and dependency caches.
pub const SKIPPED_DIRS: &[&str] = &[
    "bin",
    "obj",
    "target",
    "node_modules",
    "packages",
    "vendor",
    "third_party",
    "dist",
    "out",
];

/// How strictly candidate files are vetted.
#[derive(Clone, Debug, Default)]
pub struct DiscoveryOptions {
    /// Skip snapshots larger than this many bytes.
    pub max_file_size: Option<u64>,
    /// Re-check each candidate with `symlink_metadata` and keep regular files only.
    pub regular_files_only: bool,
}

impl DiscoveryOptions {
    /// Size-capped, regular files only. The engine uses this.
    pub fn secure() -> Self {
        Self {
            max_file_size: Some(MAX_FILE_SIZE),
            regular_files_only: true,
        }
    }
}

/// Whether `path` names a semantic snapshot. A bare `.semantic.json` does not.
pub fn is_snapshot_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(SNAPSHOT_SUFFIX))
        .is_some_and(|stem| !stem.is_empty())
}

/// Collect every snapshot at or below `path`, sorted by path.
///
/// Symlinks inside the tree are not followed; the root itself may be one.
/// A `path` naming a single snapshot yields just that file.
pub fn discover_snapshot_files(path: &Path, options: &DiscoveryOptions) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_snapshot_file(entry.path()))
        .filter_map(|entry| vet(entry.into_path(), options))
        .collect();

    files.sort();
    log::debug!(
        "discovered {} snapshot files under {}",
        files.len(),
        path.display()
    );
    files
}

/// Apply the per-file checks in `options`, logging why a file is dropped.
fn vet(file: PathBuf, options: &DiscoveryOptions) -> Option<PathBuf> {
    if !options.regular_files_only && options.max_file_size.is_none() {
        return Some(file);
    }

    let meta = match std::fs::symlink_metadata(&file) {
        Ok(meta) => meta,
        Err(e) => {
            log::warn!("Cannot read metadata for {}: {}", file.display(), e);
            return None;
        }
    };

    if options.regular_files_only && !meta.is_file() {
        return None;
    }

    match options.max_file_size {
        Some(limit) if meta.len() > limit => {
            log::warn!(
                "Skipping {} ({} bytes exceeds the {} byte limit)",
                file.display(),
                meta.len(),
                limit
            );
            None
        }
        _ => Some(file),
    }
}

/// Hidden directories and [`SKIPPED_DIRS`] are pruned. The walk root is
/// always entered, so a temp dir named `.tmpXXXX` still works.
pub fn is_excluded_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}
