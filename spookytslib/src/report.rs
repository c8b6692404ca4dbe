//! Run reporting: progress events and the final run report.
//!
//! The orchestrator describes what it does as a stream of [`Event`]s handed
//! to a [`Reporter`], and returns a [`RunReport`] with the structured outcome
//! of every location and folder. Neither type does any I/O; rendering is up
//! to the caller.

use serde::Serialize;
use std::path::PathBuf;

use crate::transform::Diagnostic;

/// Where a non-fatal filesystem failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipKind {
    /// A directory could not be listed while searching for source folders
    Discovery,
    /// A directory could not be listed while collecting files
    Collect,
    /// A non-source file could not be copied
    Copy,
}

/// A path that was skipped instead of failing the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skip {
    pub kind: SkipKind,
    pub path: PathBuf,
    pub reason: String,
}

impl Skip {
    pub fn new(kind: SkipKind, path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self {
            kind,
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// A source file and the path its output will land on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedFile {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// What happened to one source folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompilationOutcome {
    /// The folder contains no source files; nothing was created
    Skipped,
    /// Dry run: what would have been compiled
    DryPreview { files: Vec<ProjectedFile> },
    /// The engine ran over the folder
    Completed {
        /// Source files handed to the engine
        files_compiled: usize,
        /// Projected outputs found on disk afterwards
        files_written: usize,
        /// Non-source files mirrored next to the output
        files_copied: usize,
        diagnostics: Vec<Diagnostic>,
    },
    /// The folder could not be processed (engine missing, output not creatable, ...)
    Failed { message: String },
}

/// A discovered source folder and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub outcome: CompilationOutcome,
}

/// How a location as a whole fared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocationStatus {
    /// At least one source folder was found and handled
    Processed,
    /// The location was searched without finding a source folder
    NoSourceFolders,
    /// The location does not exist
    NotFound { message: String },
    /// The location exists but cannot be listed
    Unreadable { message: String },
}

/// One requested location and everything found under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationReport {
    /// The location as given by the user
    pub location: String,
    /// The location resolved to an absolute path
    pub resolved: PathBuf,
    pub status: LocationStatus,
    pub folders: Vec<FolderReport>,
}

impl LocationReport {
    /// Whether this location counts against the exit status.
    pub fn is_failure(&self) -> bool {
        matches!(
            self.status,
            LocationStatus::NotFound { .. } | LocationStatus::Unreadable { .. }
        ) || self
            .folders
            .iter()
            .any(|f| matches!(f.outcome, CompilationOutcome::Failed { .. }))
    }
}

/// The result of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub dry: bool,
    pub locations: Vec<LocationReport>,
    /// Everything skipped along the way, in encounter order
    pub skipped: Vec<Skip>,
}

impl RunReport {
    /// True when any location failed structurally or any folder failed.
    pub fn has_failures(&self) -> bool {
        self.locations.iter().any(LocationReport::is_failure)
    }

    /// Number of failed locations.
    pub fn failure_count(&self) -> usize {
        self.locations.iter().filter(|l| l.is_failure()).count()
    }

    /// All discovered folders across locations.
    pub fn folders(&self) -> impl Iterator<Item = &FolderReport> {
        self.locations.iter().flat_map(|l| l.folders.iter())
    }

    /// Total number of source files compiled, or that would be in a dry run.
    pub fn source_file_count(&self) -> usize {
        self.folders()
            .map(|f| match &f.outcome {
                CompilationOutcome::DryPreview { files } => files.len(),
                CompilationOutcome::Completed { files_compiled, .. } => *files_compiled,
                _ => 0,
            })
            .sum()
    }
}

/// Severity of an event, used by renderers to route and filter it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A progress event, emitted in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started,
    ProcessingLocation {
        path: PathBuf,
    },
    LocationFailed {
        location: String,
        message: String,
    },
    NoSourceFolders {
        location: String,
    },
    FoundSourceFolder {
        path: PathBuf,
    },
    Compiling {
        source: PathBuf,
        output: PathBuf,
    },
    NoSourceFiles {
        folder: PathBuf,
    },
    /// The projected listing for a folder, identical in dry and wet runs
    SourceFiles {
        dry: bool,
        files: Vec<ProjectedFile>,
    },
    Compiled {
        count: usize,
    },
    Diagnostics {
        diagnostics: Vec<Diagnostic>,
    },
    FolderFailed {
        folder: PathBuf,
        message: String,
    },
    Copied {
        path: PathBuf,
    },
    Skipped(Skip),
    Finished {
        failures: usize,
    },
}

impl Event {
    pub fn severity(&self) -> Severity {
        match self {
            Event::LocationFailed { .. } | Event::FolderFailed { .. } | Event::Diagnostics { .. } => {
                Severity::Error
            }
            Event::Finished { failures } if *failures > 0 => Severity::Error,
            Event::Skipped(_) => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

/// Sink for progress events.
pub trait Reporter {
    fn event(&mut self, event: Event);
}

/// Collects events in memory.
impl Reporter for Vec<Event> {
    fn event(&mut self, event: Event) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(status: LocationStatus, folders: Vec<FolderReport>) -> LocationReport {
        LocationReport {
            location: "x".to_string(),
            resolved: PathBuf::from("/x"),
            status,
            folders,
        }
    }

    #[test]
    fn test_not_found_is_failure() {
        let report = RunReport {
            dry: false,
            locations: vec![
                location(LocationStatus::NoSourceFolders, vec![]),
                location(
                    LocationStatus::NotFound {
                        message: "gone".to_string(),
                    },
                    vec![],
                ),
            ],
            skipped: vec![],
        };

        assert!(report.has_failures());
        assert_eq!(report.failure_count(), 1);
    }

    #[test]
    fn test_diagnostics_are_not_failures() {
        let folder = FolderReport {
            source: PathBuf::from("/x/ts"),
            output: PathBuf::from("/x/js"),
            outcome: CompilationOutcome::Completed {
                files_compiled: 2,
                files_written: 2,
                files_copied: 0,
                diagnostics: vec![Diagnostic::message("Cannot find name 'foo'.")],
            },
        };
        let report = RunReport {
            dry: false,
            locations: vec![location(LocationStatus::Processed, vec![folder])],
            skipped: vec![],
        };

        assert!(!report.has_failures());
        assert_eq!(report.source_file_count(), 2);
    }

    #[test]
    fn test_failed_folder_is_failure() {
        let folder = FolderReport {
            source: PathBuf::from("/x/ts"),
            output: PathBuf::from("/x/js"),
            outcome: CompilationOutcome::Failed {
                message: "no engine".to_string(),
            },
        };
        let report = RunReport {
            dry: false,
            locations: vec![location(LocationStatus::Processed, vec![folder])],
            skipped: vec![],
        };

        assert!(report.has_failures());
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::Started.severity(), Severity::Info);
        assert_eq!(Event::Finished { failures: 0 }.severity(), Severity::Info);
        assert_eq!(Event::Finished { failures: 1 }.severity(), Severity::Error);
        assert_eq!(
            Event::Skipped(Skip::new(SkipKind::Copy, "/a", "denied")).severity(),
            Severity::Warning
        );
    }

    #[test]
    fn test_report_serializes_with_status_tags() {
        let report = RunReport {
            dry: true,
            locations: vec![location(LocationStatus::NoSourceFolders, vec![])],
            skipped: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["locations"][0]["status"]["status"], "no_source_folders");
    }
}
