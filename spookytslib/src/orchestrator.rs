//! Top-level driver for a compile run.
//!
//! The [`Orchestrator`] walks the requested locations in order. Each location
//! is resolved, scanned for source folders, and every folder found is
//! collected, compiled and mirrored (or, in a dry run, only listed). A
//! failure in one location is recorded and the run moves on; only an empty
//! location list stops the run before it starts.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::SpookyError;
use crate::mirror::mirror_files;
use crate::options::RunConfig;
use crate::report::{
    CompilationOutcome, Event, FolderReport, LocationReport, LocationStatus, ProjectedFile,
    Reporter, RunReport,
};
use crate::source::{collect, scan};
use crate::transform::{invoke, Transformer};
use crate::Result;

/// Drives discovery and compilation over a list of locations.
pub struct Orchestrator<'a> {
    config: &'a RunConfig,
    transformer: &'a dyn Transformer,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a RunConfig, transformer: &'a dyn Transformer) -> Self {
        Self {
            config,
            transformer,
        }
    }

    /// Process every location and return the run report.
    ///
    /// Fails only with [`SpookyError::NoDestinations`]. Everything else,
    /// including missing locations, ends up in the returned report; check
    /// [`RunReport::has_failures`] for the exit status.
    pub fn run(&self, locations: &[String], reporter: &mut dyn Reporter) -> Result<RunReport> {
        if locations.is_empty() {
            return Err(SpookyError::NoDestinations);
        }

        reporter.event(Event::Started);

        let mut report = RunReport {
            dry: self.config.dry,
            ..RunReport::default()
        };

        for location in locations {
            let location_report = self.process_location(location, &mut report, reporter);
            report.locations.push(location_report);
        }

        reporter.event(Event::Finished {
            failures: report.failure_count(),
        });

        Ok(report)
    }

    fn process_location(
        &self,
        location: &str,
        report: &mut RunReport,
        reporter: &mut dyn Reporter,
    ) -> LocationReport {
        let resolved = resolve(location);
        let mut location_report = LocationReport {
            location: location.to_string(),
            resolved: resolved.clone(),
            status: LocationStatus::Processed,
            folders: Vec::new(),
        };

        if !resolved.exists() {
            let message = SpookyError::LocationNotFound(location.to_string()).to_string();
            info!(location, "location does not exist");
            reporter.event(Event::LocationFailed {
                location: location.to_string(),
                message: message.clone(),
            });
            location_report.status = LocationStatus::NotFound { message };
            return location_report;
        }

        reporter.event(Event::ProcessingLocation {
            path: resolved.clone(),
        });

        let discovery = match scan(&resolved, &self.config.layout, self.config.uncapped) {
            Ok(d) => d,
            Err(err) => {
                let message = err.to_string();
                reporter.event(Event::LocationFailed {
                    location: location.to_string(),
                    message: message.clone(),
                });
                location_report.status = match err {
                    SpookyError::LocationNotFound(_) => LocationStatus::NotFound { message },
                    _ => LocationStatus::Unreadable { message },
                };
                return location_report;
            }
        };

        for skip in discovery.skipped {
            reporter.event(Event::Skipped(skip.clone()));
            report.skipped.push(skip);
        }

        if discovery.folders.is_empty() {
            info!(location, "no source folders found");
            reporter.event(Event::NoSourceFolders {
                location: location.to_string(),
            });
            location_report.status = LocationStatus::NoSourceFolders;
            return location_report;
        }

        for folder in discovery.folders {
            reporter.event(Event::FoundSourceFolder {
                path: folder.clone(),
            });
            let folder_report = self.compile_folder(&folder, report, reporter);
            location_report.folders.push(folder_report);
        }

        location_report
    }

    fn compile_folder(
        &self,
        source: &Path,
        report: &mut RunReport,
        reporter: &mut dyn Reporter,
    ) -> FolderReport {
        let layout = &self.config.layout;
        let output = layout.output_folder(source);

        reporter.event(Event::Compiling {
            source: source.to_path_buf(),
            output: output.clone(),
        });

        let collected = collect(source, |p| layout.is_source_file(p));
        for skip in collected.skipped {
            reporter.event(Event::Skipped(skip.clone()));
            report.skipped.push(skip);
        }

        let folder_report = |outcome| FolderReport {
            source: source.to_path_buf(),
            output: output.clone(),
            outcome,
        };

        if collected.matching.is_empty() {
            reporter.event(Event::NoSourceFiles {
                folder: source.to_path_buf(),
            });
            return folder_report(CompilationOutcome::Skipped);
        }

        let projected: Vec<ProjectedFile> = collected
            .matching
            .iter()
            .map(|file| ProjectedFile {
                source: file.clone(),
                output: layout.projected_output(source, &output, file),
            })
            .collect();

        reporter.event(Event::SourceFiles {
            dry: self.config.dry,
            files: projected.clone(),
        });

        if self.config.dry {
            return folder_report(CompilationOutcome::DryPreview { files: projected });
        }

        let wet = self.compile_wet(
            source,
            &output,
            &collected.matching,
            &collected.non_matching,
            report,
            reporter,
        );
        match wet {
            Ok(outcome) => folder_report(outcome),
            Err(err) => {
                let message = err.to_string();
                reporter.event(Event::FolderFailed {
                    folder: source.to_path_buf(),
                    message: message.clone(),
                });
                folder_report(CompilationOutcome::Failed { message })
            }
        }
    }

    fn compile_wet(
        &self,
        source: &Path,
        output: &Path,
        sources: &[PathBuf],
        others: &[PathBuf],
        report: &mut RunReport,
        reporter: &mut dyn Reporter,
    ) -> Result<CompilationOutcome> {
        fs::create_dir_all(output).map_err(|e| SpookyError::io(output, e))?;

        let options = self.config.transform.for_folder(source, output);
        let invocation = invoke(self.transformer, sources, &options, &self.config.layout)?;

        if !invocation.emitted {
            warn!(folder = %source.display(), "compiler emitted no output");
        }

        if invocation.has_diagnostics() {
            reporter.event(Event::Diagnostics {
                diagnostics: invocation.diagnostics.clone(),
            });
        } else {
            reporter.event(Event::Compiled {
                count: sources.len(),
            });
        }

        let mirrored = mirror_files(source, output, others, self.config.copy_failures)?;
        for path in &mirrored.copied {
            reporter.event(Event::Copied { path: path.clone() });
        }
        for skip in mirrored.skipped {
            reporter.event(Event::Skipped(skip.clone()));
            report.skipped.push(skip);
        }

        debug!(
            folder = %source.display(),
            emitted = invocation.emitted,
            written = invocation.files_written,
            copied = mirrored.copied.len(),
            "folder compiled"
        );

        Ok(CompilationOutcome::Completed {
            files_compiled: sources.len(),
            files_written: invocation.files_written,
            files_copied: mirrored.copied.len(),
            diagnostics: invocation.diagnostics,
        })
    }
}

/// Resolve a user supplied location against the current directory.
///
/// `.` and `..` are folded lexically so the last component is the real
/// folder name, which the scanner matches against the source marker.
fn resolve(location: &str) -> PathBuf {
    let absolute = std::path::absolute(location).unwrap_or_else(|_| PathBuf::from(location));

    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    resolved
}
