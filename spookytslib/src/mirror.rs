//! Mirroring of non-source files into the output folder.
//!
//! Every file that is not handed to the engine (stylesheets, templates,
//! images, ...) is copied byte for byte to the same relative path under the
//! output folder. Destination directories are created only when a file needs
//! them, and existing destination files are overwritten, so re-running over
//! an unchanged tree leaves the output unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::SpookyError;
use crate::options::FailurePolicy;
use crate::report::{Skip, SkipKind};
use crate::source::collect;
use crate::Result;

/// Outcome of mirroring one folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorReport {
    /// Destination paths written
    pub copied: Vec<PathBuf>,
    /// Files that could not be copied, or directories that could not be listed
    pub skipped: Vec<Skip>,
}

/// Copy every file under `source_dir` that does not match `predicate` into
/// the same relative location under `dest_dir`.
pub fn mirror<F>(
    source_dir: impl AsRef<Path>,
    dest_dir: impl AsRef<Path>,
    predicate: F,
    policy: FailurePolicy,
) -> Result<MirrorReport>
where
    F: Fn(&Path) -> bool,
{
    let source_dir = source_dir.as_ref();
    let collected = collect(source_dir, predicate);
    let mut report = mirror_files(source_dir, dest_dir, &collected.non_matching, policy)?;
    report.skipped.splice(0..0, collected.skipped);
    Ok(report)
}

/// Copy an already collected list of files from `source_dir` to `dest_dir`.
///
/// Files outside `source_dir` are ignored. With [`FailurePolicy::Abort`] the
/// first failed copy is returned as an error; with [`FailurePolicy::Skip`]
/// it is recorded and the remaining files are still copied.
pub fn mirror_files(
    source_dir: impl AsRef<Path>,
    dest_dir: impl AsRef<Path>,
    files: &[PathBuf],
    policy: FailurePolicy,
) -> Result<MirrorReport> {
    let source_dir = source_dir.as_ref();
    let dest_dir = dest_dir.as_ref();
    let mut report = MirrorReport::default();

    for file in files {
        let Ok(relative) = file.strip_prefix(source_dir) else {
            continue;
        };
        let dest = dest_dir.join(relative);

        match copy_one(file, &dest) {
            Ok(()) => {
                debug!(from = %file.display(), to = %dest.display(), "copied");
                report.copied.push(dest);
            }
            Err(err) => match policy {
                FailurePolicy::Abort => return Err(err),
                FailurePolicy::Skip => {
                    warn!(path = %file.display(), error = %err, "skipping file that could not be copied");
                    report.skipped.push(Skip::new(SkipKind::Copy, file, err));
                }
            },
        }
    }

    Ok(report)
}

fn copy_one(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        // create_dir_all treats an existing directory as success
        fs::create_dir_all(parent).map_err(|e| SpookyError::io(parent, e))?;
    }
    fs::copy(from, to).map_err(|e| SpookyError::io(from, e))?;
    Ok(())
}
