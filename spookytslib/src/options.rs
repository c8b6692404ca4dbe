//! Input options for a compile run.
//!
//! This module contains all configuration types that control how a run
//! discovers folders and what it hands to the transformation engine. They are
//! built once, before the run, and only read afterwards.

use std::path::PathBuf;
use std::str::FromStr;

use crate::source::Layout;

/// What to do when a single non-source file cannot be mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure as a skip and keep going
    #[default]
    Skip,
    /// Stop mirroring the folder and mark it as failed
    Abort,
}

/// Language level of the emitted JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptTarget {
    Es5,
    Es2015,
    Es2017,
    #[default]
    Es2020,
    Es2022,
    EsNext,
}

impl ScriptTarget {
    /// Value passed on the engine command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptTarget::Es5 => "es5",
            ScriptTarget::Es2015 => "es2015",
            ScriptTarget::Es2017 => "es2017",
            ScriptTarget::Es2020 => "es2020",
            ScriptTarget::Es2022 => "es2022",
            ScriptTarget::EsNext => "esnext",
        }
    }
}

impl FromStr for ScriptTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "es5" => Ok(ScriptTarget::Es5),
            "es6" | "es2015" => Ok(ScriptTarget::Es2015),
            "es2017" => Ok(ScriptTarget::Es2017),
            "es2020" => Ok(ScriptTarget::Es2020),
            "es2022" => Ok(ScriptTarget::Es2022),
            "esnext" => Ok(ScriptTarget::EsNext),
            _ => Err(format!("Unknown script target: {}", s)),
        }
    }
}

/// Module system of the emitted JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleKind {
    CommonJs,
    Es2015,
    #[default]
    Es2020,
    EsNext,
}

impl ModuleKind {
    /// Value passed on the engine command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::CommonJs => "commonjs",
            ModuleKind::Es2015 => "es2015",
            ModuleKind::Es2020 => "es2020",
            ModuleKind::EsNext => "esnext",
        }
    }
}

impl FromStr for ModuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "commonjs" | "cjs" => Ok(ModuleKind::CommonJs),
            "es6" | "es2015" => Ok(ModuleKind::Es2015),
            "es2020" => Ok(ModuleKind::Es2020),
            "esnext" => Ok(ModuleKind::EsNext),
            _ => Err(format!("Unknown module kind: {}", s)),
        }
    }
}

/// How the engine resolves module imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleResolution {
    Classic,
    #[default]
    Node10,
    Node16,
    Bundler,
}

impl ModuleResolution {
    /// Value passed on the engine command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleResolution::Classic => "classic",
            ModuleResolution::Node10 => "node10",
            ModuleResolution::Node16 => "node16",
            ModuleResolution::Bundler => "bundler",
        }
    }
}

impl FromStr for ModuleResolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(ModuleResolution::Classic),
            "node" | "node10" => Ok(ModuleResolution::Node10),
            "node16" | "nodenext" => Ok(ModuleResolution::Node16),
            "bundler" => Ok(ModuleResolution::Bundler),
            _ => Err(format!("Unknown module resolution: {}", s)),
        }
    }
}

/// Options handed to the transformation engine for one source folder.
///
/// `out_dir` and `root_dir` are empty in the run-wide template and filled in
/// per folder by [`TransformOptions::for_folder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    pub target: ScriptTarget,
    pub module: ModuleKind,
    pub module_resolution: ModuleResolution,
    pub allow_js: bool,
    /// Emit `.d.ts` declaration files
    pub declaration: bool,
    pub out_dir: PathBuf,
    pub root_dir: PathBuf,
    pub strict: bool,
    pub es_module_interop: bool,
    pub skip_lib_check: bool,
    pub force_consistent_casing: bool,
    pub remove_comments: bool,
    pub source_map: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            target: ScriptTarget::default(),
            module: ModuleKind::default(),
            module_resolution: ModuleResolution::default(),
            allow_js: true,
            declaration: false,
            out_dir: PathBuf::new(),
            root_dir: PathBuf::new(),
            strict: true,
            es_module_interop: true,
            skip_lib_check: true,
            force_consistent_casing: true,
            remove_comments: false,
            source_map: false,
        }
    }
}

impl TransformOptions {
    /// Create the default engine options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the script target
    pub fn target(mut self, target: ScriptTarget) -> Self {
        self.target = target;
        self
    }

    /// Builder: set the module kind
    pub fn module(mut self, module: ModuleKind) -> Self {
        self.module = module;
        self
    }

    /// Builder: set the module resolution strategy
    pub fn module_resolution(mut self, resolution: ModuleResolution) -> Self {
        self.module_resolution = resolution;
        self
    }

    /// Copy of these options bound to one source/output folder pair.
    pub fn for_folder(&self, root_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            out_dir: out_dir.into(),
            ..self.clone()
        }
    }
}

/// Run-wide configuration, owned by the caller and read by the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Suppress informational progress output
    pub quiet: bool,
    /// Discover and list only, never touch the filesystem
    pub dry: bool,
    /// Allow more than one source folder per location
    pub uncapped: bool,
    /// Folder naming, extensions and exclusions
    pub layout: Layout,
    /// Engine options template
    pub transform: TransformOptions,
    /// Behaviour on individual copy failures
    pub copy_failures: FailurePolicy,
}

impl RunConfig {
    /// Create new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set quiet mode
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Builder: set dry mode
    pub fn dry(mut self, dry: bool) -> Self {
        self.dry = dry;
        self
    }

    /// Builder: lift the one-folder-per-location cap
    pub fn uncapped(mut self, uncapped: bool) -> Self {
        self.uncapped = uncapped;
        self
    }

    /// Builder: set the folder layout
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Builder: set the engine options template
    pub fn transform(mut self, options: TransformOptions) -> Self {
        self.transform = options;
        self
    }

    /// Builder: set the copy failure policy
    pub fn copy_failures(mut self, policy: FailurePolicy) -> Self {
        self.copy_failures = policy;
        self
    }
}
