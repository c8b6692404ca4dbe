//! Source discovery: find folders and files to compile.
//!
//! This module handles the first stage of a run - discovering what to
//! compile. It provides:
//!
//! - **Folder layout**: marker names, suffixes and exclusions
//! - **Folder discovery**: find `ts` folders under a location
//! - **File collection**: split a folder's files into sources and the rest
//!
//! ## Example
//!
//! ```rust,ignore
//! use spookytslib::source::{collect, scan, Layout};
//!
//! let layout = Layout::new().exclude("dist")?;
//! let found = scan("addons", &layout, false)?;
//! for folder in &found.folders {
//!     let files = collect(folder, |p| layout.is_source_file(p));
//! }
//! ```

pub mod collector;
pub mod filter;
pub mod scanner;

pub use collector::{collect, Collected};
pub use filter::{Layout, DEFAULT_EXCLUDED};
pub use scanner::{scan, Discovery};
