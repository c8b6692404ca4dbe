//! Boundary to the external transformation engine.
//!
//! The engine itself (the TypeScript compiler) is not part of this crate. A
//! [`Transformer`] takes a batch of source files plus [`TransformOptions`]
//! and reports whether it emitted output and which diagnostics it produced.
//! [`TscTransformer`] drives the `tsc` executable; tests plug in their own.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use serde::Serialize;
use tracing::debug;

use crate::error::SpookyError;
use crate::options::TransformOptions;
use crate::source::Layout;
use crate::Result;

/// A message from the engine, passed through as reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: Option<PathBuf>,
    /// 1-based line
    pub line: Option<u32>,
    /// 1-based column
    pub column: Option<u32>,
    pub message: String,
}

impl Diagnostic {
    /// A diagnostic not tied to a file position.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            file: None,
            line: None,
            column: None,
            message: message.into(),
        }
    }

    /// A diagnostic at a position in a file.
    pub fn at(
        file: impl Into<PathBuf>,
        line: u32,
        column: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: Some(file.into()),
            line: Some(line),
            column: Some(column),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line, self.column) {
            (Some(file), Some(line), Some(column)) => {
                write!(f, "{} ({},{}): {}", file.display(), line, column, self.message)
            }
            (Some(file), _, _) => write!(f, "{}: {}", file.display(), self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

/// What the engine reported for one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineReport {
    /// Whether output files were emitted
    pub emitted: bool,
    /// Pre-flight and emit diagnostics, in engine order
    pub diagnostics: Vec<Diagnostic>,
}

/// An engine that turns source files into output files.
pub trait Transformer {
    /// Transform `files`, writing output under `options.out_dir`.
    ///
    /// Diagnostics are returned, not raised; an `Err` means the engine could
    /// not be run at all.
    fn transform(&self, files: &[PathBuf], options: &TransformOptions) -> Result<EngineReport>;
}

/// Result of handing one folder to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub emitted: bool,
    /// Projected output files found on disk after the engine returned
    pub files_written: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl Invocation {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Run `transformer` over `files` and verify what it wrote.
///
/// Diagnostics never abort: whatever the engine managed to emit is counted
/// by reading back the projected output path of every input file.
pub fn invoke(
    transformer: &dyn Transformer,
    files: &[PathBuf],
    options: &TransformOptions,
    layout: &Layout,
) -> Result<Invocation> {
    let report = transformer.transform(files, options)?;

    let files_written = files
        .iter()
        .map(|f| layout.projected_output(&options.root_dir, &options.out_dir, f))
        .filter(|out| out.is_file())
        .count();

    debug!(
        files = files.len(),
        written = files_written,
        diagnostics = report.diagnostics.len(),
        "engine finished"
    );

    Ok(Invocation {
        emitted: report.emitted,
        files_written,
        diagnostics: report.diagnostics,
    })
}

/// Drives the `tsc` command line compiler.
#[derive(Debug, Clone)]
pub struct TscTransformer {
    program: String,
}

impl Default for TscTransformer {
    fn default() -> Self {
        Self::new("tsc")
    }
}

impl TscTransformer {
    /// Use `program` (a name on `PATH` or a full path) as the compiler.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Command line arguments for compiling `files` with `options`.
    pub fn build_args(files: &[PathBuf], options: &TransformOptions) -> Vec<OsString> {
        fn flag(args: &mut Vec<OsString>, name: &str, value: bool) {
            args.push(format!("--{}", name).into());
            args.push(value.to_string().into());
        }

        let mut args: Vec<OsString> = vec![
            "--target".into(),
            options.target.as_str().into(),
            "--module".into(),
            options.module.as_str().into(),
            "--moduleResolution".into(),
            options.module_resolution.as_str().into(),
        ];
        flag(&mut args, "allowJs", options.allow_js);
        flag(&mut args, "declaration", options.declaration);
        args.push("--outDir".into());
        args.push(options.out_dir.clone().into_os_string());
        args.push("--rootDir".into());
        args.push(options.root_dir.clone().into_os_string());
        flag(&mut args, "strict", options.strict);
        flag(&mut args, "esModuleInterop", options.es_module_interop);
        flag(&mut args, "skipLibCheck", options.skip_lib_check);
        flag(
            &mut args,
            "forceConsistentCasingInFileNames",
            options.force_consistent_casing,
        );
        flag(&mut args, "removeComments", options.remove_comments);
        flag(&mut args, "sourceMap", options.source_map);
        flag(&mut args, "pretty", false);
        args.extend(files.iter().map(|f| f.clone().into_os_string()));
        args
    }
}

impl Transformer for TscTransformer {
    fn transform(&self, files: &[PathBuf], options: &TransformOptions) -> Result<EngineReport> {
        let args = Self::build_args(files, options);
        debug!(program = %self.program, args = args.len(), "running compiler");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| SpookyError::EngineLaunch {
                program: self.program.clone(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        // tsc: 0 = clean, 2 = diagnostics but outputs generated, 1 = outputs skipped
        let emitted = matches!(output.status.code(), Some(0) | Some(2));

        Ok(EngineReport {
            emitted,
            diagnostics: parse_diagnostics(&text),
        })
    }
}

/// Parse `tsc --pretty false` output into diagnostics.
///
/// Lines of the form `file(line,col): error TS1234: message` become located
/// diagnostics. Indented lines continue the previous message; any other
/// non-empty line becomes a diagnostic without a location.
pub fn parse_diagnostics(output: &str) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            if let Some(last) = diagnostics.last_mut() {
                last.message.push('\n');
                last.message.push_str(line.trim());
                continue;
            }
        }

        let diagnostic =
            parse_located(line).unwrap_or_else(|| Diagnostic::message(strip_code(line.trim())));
        diagnostics.push(diagnostic);
    }

    diagnostics
}

fn parse_located(line: &str) -> Option<Diagnostic> {
    let close = line.find("): ")?;
    let open = line[..close].rfind('(')?;
    let (line_no, column) = line[open + 1..close].split_once(',')?;
    let line_no = line_no.trim().parse().ok()?;
    let column = column.trim().parse().ok()?;
    let file = &line[..open];
    if file.is_empty() {
        return None;
    }
    Some(Diagnostic::at(
        file,
        line_no,
        column,
        strip_code(&line[close + 3..]),
    ))
}

/// Drop a leading `error TS1234: ` category and code.
fn strip_code(text: &str) -> String {
    let is_category = |head: &str| {
        let mut words = head.split_whitespace();
        matches!(words.next(), Some("error" | "warning" | "message"))
            && words.next().is_some_and(|code| code.starts_with("TS"))
            && words.next().is_none()
    };

    match text.split_once(": ") {
        Some((head, rest)) if is_category(head) => rest.to_string(),
        _ => text.to_string(),
    }
}
