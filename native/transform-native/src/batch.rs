//! Batch transforms over a directory tree.
//!
//! Files are independent, so they are transformed in parallel. Nothing is
//! written back; callers decide what to do with each report.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::cache::TransformCache;
use crate::error::TransformError;
use crate::plugin::SlotsPlugin;

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<String, TransformError>,
}

/// Files under `root` accepted by the plugin's filter, in path order.
pub fn collect_files(root: &Path, plugin: &SlotsPlugin) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if plugin.transform_include(&path.to_string_lossy()) {
            files.push(path);
        }
    }

    files.sort();
    files
}

pub fn transform_directory(
    root: &Path,
    plugin: &SlotsPlugin,
    cache: Option<&TransformCache>,
) -> Vec<FileReport> {
    let files = collect_files(root, plugin);
    debug!(root = %root.display(), files = files.len(), "batch transform");

    files
        .into_par_iter()
        .map(|path| {
            let result = transform_file(&path, plugin, cache);
            FileReport { path, result }
        })
        .collect()
}

fn transform_file(
    path: &Path,
    plugin: &SlotsPlugin,
    cache: Option<&TransformCache>,
) -> Result<String, TransformError> {
    let code = fs::read_to_string(path).map_err(|source| TransformError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let id = path.to_string_lossy();
    match cache {
        Some(cache) => plugin.transform_cached(&code, &id, cache),
        None => plugin.transform(&code, &id),
    }
}
