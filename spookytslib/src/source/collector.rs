//! File collection inside a source folder.
//!
//! A single depth-first walk splits every regular file below a folder into
//! the files matching a predicate (sources for the engine) and the rest
//! (files to mirror verbatim).

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::report::{Skip, SkipKind};

/// Files under a folder, partitioned by a predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    /// Files the predicate accepted
    pub matching: Vec<PathBuf>,
    /// Every other regular file
    pub non_matching: Vec<PathBuf>,
    /// Subdirectories that could not be listed
    pub skipped: Vec<Skip>,
}

/// Collect all regular files under `dir`, split by `predicate`.
///
/// Order is the walk order with entries sorted by file name within each
/// directory, so it is stable for an unchanged tree. Symlinks are not
/// followed.
pub fn collect<F>(dir: impl AsRef<Path>, predicate: F) -> Collected
where
    F: Fn(&Path) -> bool,
{
    let dir = dir.as_ref();
    let mut collected = Collected::default();

    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| dir.to_path_buf());
                warn!(path = %path.display(), error = %err, "skipping unreadable directory");
                collected.skipped.push(Skip::new(SkipKind::Collect, path, err));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        if predicate(&path) {
            collected.matching.push(path);
        } else {
            collected.non_matching.push(path);
        }
    }

    collected
}
