//! Source folder discovery.
//!
//! Walks a location depth-first in pre-order and records every directory
//! whose base name is the source marker. Excluded directories are never
//! entered, and a matched folder is not searched for nested matches.
//!
//! In capped mode (the default) the walk stops at the first match, so a
//! location yields at most one source folder. Uncapped mode returns every
//! match in encounter order.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::SpookyError;
use crate::report::{Skip, SkipKind};
use crate::source::Layout;
use crate::Result;

/// Source folders found under one location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Matched folders in pre-order
    pub folders: Vec<PathBuf>,
    /// Directories that could not be listed and were treated as empty
    pub skipped: Vec<Skip>,
}

impl Discovery {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

/// Find source folders under `root`.
///
/// `root` itself is matched by the same rule as any nested directory, so
/// passing a `ts` folder directly yields that folder. A root that exists but
/// cannot be listed is an error; unreadable directories below it are
/// recorded in [`Discovery::skipped`] and the walk continues with their
/// siblings.
pub fn scan(root: impl AsRef<Path>, layout: &Layout, uncapped: bool) -> Result<Discovery> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(SpookyError::LocationNotFound(root.display().to_string()));
    }

    if root.is_dir() {
        fs::read_dir(root).map_err(|source| SpookyError::UnreadableRoot {
            path: root.to_path_buf(),
            source,
        })?;
    }

    let mut discovery = Discovery::default();
    let mut walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                warn!(path = %path.display(), error = %err, "skipping unreadable directory");
                discovery
                    .skipped
                    .push(Skip::new(SkipKind::Discovery, path, err));
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();

        // The root is never excluded, only its descendants
        if entry.depth() > 0 && layout.is_excluded(&name) {
            debug!(path = %entry.path().display(), "excluded");
            walker.skip_current_dir();
            continue;
        }

        if layout.is_source_marker(&name) {
            debug!(path = %entry.path().display(), "found source folder");
            discovery.folders.push(entry.path().to_path_buf());
            if !uncapped {
                break;
            }
            walker.skip_current_dir();
        }
    }

    Ok(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn mkdirs(root: &Path, dirs: &[&str]) {
        for dir in dirs {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
    }

    #[test]
    fn test_capped_finds_single_folder() {
        let temp = tempdir().unwrap();
        mkdirs(temp.path(), &["mod/static/src/ts", "mod/static/src/xml"]);

        let found = scan(temp.path(), &Layout::new(), false).unwrap();

        assert_eq!(found.folders, vec![temp.path().join("mod/static/src/ts")]);
        assert!(found.skipped.is_empty());
    }

    #[test]
    fn test_capped_stops_at_first_match() {
        let temp = tempdir().unwrap();
        mkdirs(temp.path(), &["a/ts", "b/ts", "c/deep/ts"]);

        let found = scan(temp.path(), &Layout::new(), false).unwrap();

        assert_eq!(found.folders, vec![temp.path().join("a/ts")]);
    }

    #[test]
    fn test_uncapped_finds_all_in_preorder() {
        let temp = tempdir().unwrap();
        mkdirs(temp.path(), &["a/ts", "b/x/y/ts", "c/ts"]);

        let found = scan(temp.path(), &Layout::new(), true).unwrap();

        assert_eq!(
            found.folders,
            vec![
                temp.path().join("a/ts"),
                temp.path().join("b/x/y/ts"),
                temp.path().join("c/ts"),
            ]
        );
    }

    #[test]
    fn test_does_not_descend_into_match() {
        let temp = tempdir().unwrap();
        mkdirs(temp.path(), &["m/ts/nested/ts"]);

        let found = scan(temp.path(), &Layout::new(), true).unwrap();

        assert_eq!(found.folders, vec![temp.path().join("m/ts")]);
    }

    #[test]
    fn test_excluded_directories_are_not_entered() {
        let temp = tempdir().unwrap();
        mkdirs(
            temp.path(),
            &["node_modules/pkg/ts", ".git/ts", ".vscode/ts", "z/ts"],
        );

        let found = scan(temp.path(), &Layout::new(), true).unwrap();

        assert_eq!(found.folders, vec![temp.path().join("z/ts")]);
    }

    #[test]
    fn test_custom_exclusion_pattern() {
        let temp = tempdir().unwrap();
        mkdirs(temp.path(), &["vendor-a/ts", "app/ts"]);

        let layout = Layout::new().exclude("vendor*").unwrap();
        let found = scan(temp.path(), &layout, true).unwrap();

        assert_eq!(found.folders, vec![temp.path().join("app/ts")]);
    }

    #[test]
    fn test_root_named_marker_matches() {
        let temp = tempdir().unwrap();
        mkdirs(temp.path(), &["mod/ts/sub"]);

        let root = temp.path().join("mod/ts");
        let found = scan(&root, &Layout::new(), false).unwrap();

        assert_eq!(found.folders, vec![root]);
    }

    #[test]
    fn test_excluded_root_is_still_scanned() {
        let temp = tempdir().unwrap();
        mkdirs(temp.path(), &["node_modules/lib/ts"]);

        let root = temp.path().join("node_modules");
        let found = scan(&root, &Layout::new(), false).unwrap();

        assert_eq!(found.folders, vec![root.join("lib/ts")]);
    }

    #[test]
    fn test_files_named_marker_are_ignored() {
        let temp = tempdir().unwrap();
        mkdirs(temp.path(), &["m"]);
        fs::write(temp.path().join("m/ts"), "not a folder").unwrap();

        let found = scan(temp.path(), &Layout::new(), true).unwrap();

        assert!(found.is_empty());
    }

    #[test]
    fn test_no_match_is_empty() {
        let temp = tempdir().unwrap();
        mkdirs(temp.path(), &["a/b/c", "d"]);

        let found = scan(temp.path(), &Layout::new(), true).unwrap();

        assert!(found.is_empty());
    }

    #[test]
    fn test_nonexistent_root() {
        let result = scan("/nonexistent/path/for/scan", &Layout::new(), false);

        assert!(matches!(result, Err(SpookyError::LocationNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        mkdirs(temp.path(), &["locked/ts", "open/ts"]);
        let locked = temp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not apply to root
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let found = scan(temp.path(), &Layout::new(), true).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(found.folders, vec![temp.path().join("open/ts")]);
        assert_eq!(found.skipped.len(), 1);
        assert_eq!(found.skipped[0].kind, SkipKind::Discovery);
    }
}
