//! # spookytslib
//!
//! Finds TypeScript source folders in a project tree and compiles each one
//! into a sibling JavaScript folder, keeping the project structure.
//!
//! ## Overview
//!
//! Odoo-style addons keep their TypeScript in a `ts/` folder and expect the
//! JavaScript next to it in `js/`. This library:
//!
//! - **Discovers** `ts` folders under a set of locations, skipping
//!   `node_modules`, `.git` and `.vscode`, stopping at the first folder per
//!   location unless the search is uncapped
//! - **Collects** the `.ts` files of each folder and hands them to a
//!   [`Transformer`] (the `tsc` compiler by default)
//! - **Mirrors** every other file (stylesheets, templates, images) into the
//!   `js` folder verbatim
//! - **Reports** progress as [`Event`]s and the outcome as a [`RunReport`]
//!
//! A dry run performs the same discovery and reports the same projected
//! output paths without touching the filesystem.
//!
//! ## Example
//!
//! ```rust
//! use spookytslib::{Orchestrator, RunConfig, TscTransformer};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! let ts = dir.path().join("my_addon/static/src/ts");
//! fs::create_dir_all(&ts).unwrap();
//! fs::write(ts.join("widget.ts"), "export const answer: number = 42;\n").unwrap();
//!
//! // Dry run: discover and list, write nothing
//! let config = RunConfig::new().dry(true);
//! let tsc = TscTransformer::default();
//! let mut events = Vec::new();
//! let report = Orchestrator::new(&config, &tsc)
//!     .run(&[dir.path().display().to_string()], &mut events)
//!     .unwrap();
//!
//! assert_eq!(report.source_file_count(), 1);
//! assert!(!dir.path().join("my_addon/static/src/js").exists());
//! ```

pub mod error;
pub mod mirror;
pub mod options;
pub mod orchestrator;
pub mod report;
pub mod source;
pub mod transform;

pub use error::SpookyError;
pub use mirror::{mirror, mirror_files, MirrorReport};
pub use options::{
    FailurePolicy, ModuleKind, ModuleResolution, RunConfig, ScriptTarget, TransformOptions,
};
pub use orchestrator::Orchestrator;
pub use report::{
    CompilationOutcome, Event, FolderReport, LocationReport, LocationStatus, ProjectedFile,
    Reporter, RunReport, Severity, Skip, SkipKind,
};
pub use source::{collect, scan, Collected, Discovery, Layout};
pub use transform::{
    invoke, parse_diagnostics, Diagnostic, EngineReport, Invocation, TscTransformer, Transformer,
};

/// Result type for spookytslib operations
pub type Result<T> = std::result::Result<T, SpookyError>;
