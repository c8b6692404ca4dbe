//! Terminal rendering of run events.
//!
//! Informational events go to stdout and are dropped in quiet mode.
//! Warnings, errors and compiler diagnostics always go to stderr.

use console::Style;
use spookytslib::{Event, Reporter, Severity};

/// Renders events as progress lines on the terminal.
pub struct ConsoleReporter {
    quiet: bool,
    marker: String,
}

impl ConsoleReporter {
    /// `marker` is the source folder name shown in messages.
    pub fn new(quiet: bool, marker: impl Into<String>) -> Self {
        Self {
            quiet,
            marker: marker.into(),
        }
    }

    /// The lines an event renders to, without styling.
    pub fn lines(&self, event: &Event) -> Vec<String> {
        match event {
            Event::Started => {
                vec!["🎃 SpookyTS: Starting TypeScript compilation...".to_string()]
            }
            Event::ProcessingLocation { path } => {
                vec![format!("📁 Processing location: {}", path.display())]
            }
            Event::LocationFailed { location, message } => {
                vec![format!(
                    "❌ Error processing location '{}': {}",
                    location, message
                )]
            }
            Event::NoSourceFolders { location } => {
                vec![format!(
                    "⚠️  No '{}' folders found in {}",
                    self.marker, location
                )]
            }
            Event::FoundSourceFolder { path } => {
                vec![format!("🔍 Found {} folder: {}", self.marker, path.display())]
            }
            Event::Compiling { source, output } => {
                vec![format!(
                    "📝 Compiling: {} → {}",
                    source.display(),
                    output.display()
                )]
            }
            Event::NoSourceFiles { folder } => {
                vec![format!(
                    "⚠️  No TypeScript files found in {}",
                    folder.display()
                )]
            }
            Event::SourceFiles { dry, files } => {
                let header = if *dry {
                    format!("🔍 [DRY RUN] Would compile {} TypeScript files", files.len())
                } else {
                    format!("🔨 Compiling {} TypeScript files", files.len())
                };
                std::iter::once(header)
                    .chain(files.iter().map(|f| {
                        format!("  {} → {}", f.source.display(), f.output.display())
                    }))
                    .collect()
            }
            Event::Compiled { count } => {
                vec![format!("✅ Successfully compiled {} files", count)]
            }
            Event::Diagnostics { diagnostics } => std::iter::once(
                "❌ TypeScript compilation errors:".to_string(),
            )
            .chain(diagnostics.iter().map(|d| d.to_string()))
            .collect(),
            Event::FolderFailed { folder, message } => {
                vec![format!(
                    "❌ Failed to compile {}: {}",
                    folder.display(),
                    message
                )]
            }
            Event::Copied { path } => vec![format!("📋 Copied: {}", path.display())],
            Event::Skipped(skip) => {
                vec![format!(
                    "⚠️  Skipped {}: {}",
                    skip.path.display(),
                    skip.reason
                )]
            }
            Event::Finished { failures: 0 } => {
                vec!["✅ SpookyTS: Compilation completed!".to_string()]
            }
            Event::Finished { failures } => {
                vec![format!(
                    "❌ SpookyTS: Compilation finished with {} failed location(s)",
                    failures
                )]
            }
        }
    }
}

impl Reporter for ConsoleReporter {
    fn event(&mut self, event: Event) {
        let severity = event.severity();
        if self.quiet && severity == Severity::Info {
            return;
        }

        let style = match severity {
            Severity::Info => Style::new(),
            Severity::Warning => Style::new().yellow(),
            Severity::Error => Style::new().red(),
        };

        for line in self.lines(&event) {
            match severity {
                Severity::Info => println!("{}", style.apply_to(line)),
                _ => eprintln!("{}", style.apply_to(line)),
            }
        }
    }
}
