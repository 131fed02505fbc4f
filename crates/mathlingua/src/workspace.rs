//! Collecting documents from the paths given to `check`.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, trace};

use crate::config::CheckConfig;

/// Collects the documents named by `paths`.
///
/// A file path is taken as is, whatever its extension. A directory is
/// walked recursively for files matching the configured extensions,
/// skipping dot-directories unless `include_hidden` is set. The result is
/// sorted and free of duplicates.
///
/// # Errors
///
/// Returns an I/O error if a path does not exist or a directory cannot be
/// read.
pub fn collect_files<P: AsRef<Path>>(
    paths: &[P],
    config: &CheckConfig,
) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let metadata = fs::metadata(path)?;
        if metadata.is_dir() {
            walk_dir(path, config, &mut files)?;
        } else {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files.dedup();
    debug!(files = files.len(); "Collected workspace files");
    Ok(files)
}

fn walk_dir(dir: &Path, config: &CheckConfig, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if !config.include_hidden() && is_hidden(&path) {
                trace!(path = path.display().to_string(); "Skipping hidden directory");
                continue;
            }
            walk_dir(&path, config, files)?;
        } else if config.matches(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
