//! Folder layout and path predicates.
//!
//! A [`Layout`] names the marker folder that holds sources (`ts`), the
//! sibling folder that receives output (`js`), the file suffixes on both
//! sides, and the directories the scanner must never descend into.

use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::SpookyError;
use crate::Result;

/// Directories skipped by default while scanning.
pub const DEFAULT_EXCLUDED: &[&str] = &["node_modules", ".git", ".vscode"];

/// Naming rules for source and output folders.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Base name of a source folder
    pub source_marker: String,
    /// Base name of the sibling output folder
    pub output_marker: String,
    /// Suffix of files handed to the engine (including the dot)
    pub source_suffix: String,
    /// Suffix the engine gives emitted files (including the dot)
    pub output_suffix: String,
    /// Directory names never descended into
    pub excluded_names: Vec<String>,
    /// Glob patterns matched against directory names, never descended into
    pub excluded_patterns: Vec<Pattern>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            source_marker: "ts".to_string(),
            output_marker: "js".to_string(),
            source_suffix: ".ts".to_string(),
            output_suffix: ".js".to_string(),
            excluded_names: DEFAULT_EXCLUDED.iter().map(|s| s.to_string()).collect(),
            excluded_patterns: Vec::new(),
        }
    }
}

impl Layout {
    /// Create the default `ts` → `js` layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the source and output marker names.
    pub fn markers(mut self, source: impl Into<String>, output: impl Into<String>) -> Self {
        self.source_marker = source.into();
        self.output_marker = output.into();
        self
    }

    /// Builder: set the source and output file suffixes.
    pub fn suffixes(mut self, source: impl Into<String>, output: impl Into<String>) -> Self {
        self.source_suffix = source.into();
        self.output_suffix = output.into();
        self
    }

    /// Skip every directory whose base name matches the glob `pattern`.
    ///
    /// Only the last path component is tested, so `dist*` skips `dist` and
    /// `dist-old` at any depth, while a pattern containing `/` never matches.
    /// The scan root itself is never skipped.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        match Pattern::new(pattern) {
            Ok(glob) => {
                self.excluded_patterns.push(glob);
                Ok(self)
            }
            Err(e) => Err(SpookyError::InvalidExclusion {
                pattern: pattern.to_string(),
                message: e.msg.to_string(),
            }),
        }
    }

    /// Check if a directory with this base name must not be descended into.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_names.iter().any(|n| n == name)
            || self.excluded_patterns.iter().any(|p| p.matches(name))
    }

    /// Check if a directory base name is the source marker.
    pub fn is_source_marker(&self, name: &str) -> bool {
        name == self.source_marker
    }

    /// Check if a file is a source file (its name ends with the source suffix).
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.file_name()
            .map(|n| n.to_string_lossy().ends_with(&self.source_suffix))
            .unwrap_or(false)
    }

    /// The output folder for a source folder: same parent, output marker name.
    pub fn output_folder(&self, source_folder: &Path) -> PathBuf {
        source_folder.with_file_name(&self.output_marker)
    }

    /// Where the engine is expected to write the output for `file`.
    ///
    /// The path of `file` relative to `source_folder` is re-rooted under
    /// `output_folder`, and a trailing source suffix becomes the output suffix.
    pub fn projected_output(
        &self,
        source_folder: &Path,
        output_folder: &Path,
        file: &Path,
    ) -> PathBuf {
        let relative = file.strip_prefix(source_folder).unwrap_or(file);
        let rel_str = relative.to_string_lossy();
        let renamed = match rel_str.strip_suffix(self.source_suffix.as_str()) {
            Some(stem) => format!("{}{}", stem, self.output_suffix),
            None => rel_str.to_string(),
        };
        output_folder.join(renamed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exclusions() {
        let layout = Layout::new();

        assert!(layout.is_excluded("node_modules"));
        assert!(layout.is_excluded(".git"));
        assert!(layout.is_excluded(".vscode"));
        assert!(!layout.is_excluded("static"));
        assert!(!layout.is_excluded("ts"));
    }

    #[test]
    fn test_exclude_pattern() {
        let layout = Layout::new().exclude("build*").unwrap();

        assert!(layout.is_excluded("build"));
        assert!(layout.is_excluded("build-cache"));
        assert!(!layout.is_excluded("src"));
    }

    #[test]
    fn test_source_file_predicate() {
        let layout = Layout::new();

        assert!(layout.is_source_file(Path::new("/m/ts/a.ts")));
        assert!(layout.is_source_file(Path::new("/m/ts/types.d.ts")));
        assert!(!layout.is_source_file(Path::new("/m/ts/style.css")));
        assert!(!layout.is_source_file(Path::new("/m/ts/a.tsx")));
    }

    #[test]
    fn test_output_folder_is_sibling() {
        let layout = Layout::new();
        let out = layout.output_folder(Path::new("/proj/mod/static/src/ts"));

        assert_eq!(out, PathBuf::from("/proj/mod/static/src/js"));
    }

    #[test]
    fn test_projected_output() {
        let layout = Layout::new();
        let src = Path::new("/p/ts");
        let out = Path::new("/p/js");

        assert_eq!(
            layout.projected_output(src, out, Path::new("/p/ts/widgets/a.ts")),
            PathBuf::from("/p/js/widgets/a.js")
        );
        assert_eq!(
            layout.projected_output(src, out, Path::new("/p/ts/assets.ts/b.ts")),
            PathBuf::from("/p/js/assets.ts/b.js")
        );
    }

    #[test]
    fn test_custom_markers() {
        let layout = Layout::new()
            .markers("coffee", "out")
            .suffixes(".coffee", ".js");

        assert!(layout.is_source_marker("coffee"));
        assert!(layout.is_source_file(Path::new("x/app.coffee")));
        assert_eq!(
            layout.output_folder(Path::new("/a/coffee")),
            PathBuf::from("/a/out")
        );
    }

    #[test]
    fn test_exclusion_matches_base_names_only() {
        let layout = Layout::new().exclude("dist*").unwrap();

        assert!(layout.is_excluded("dist"));
        assert!(layout.is_excluded("dist-old"));
        assert!(!layout.is_excluded("old-dist"));

        let nested = Layout::new().exclude("static/lib").unwrap();
        assert!(!nested.is_excluded("lib"));
        assert!(!nested.is_excluded("static"));
    }

    #[test]
    fn test_invalid_exclusion_pattern() {
        let err = Layout::new().exclude("[invalid").unwrap_err();

        assert!(matches!(
            &err,
            SpookyError::InvalidExclusion { pattern, .. } if pattern == "[invalid"
        ));
        assert!(err.to_string().starts_with("invalid directory exclusion '[invalid'"));
    }
}
