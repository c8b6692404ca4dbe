//! # spookyts
//!
//! A CLI tool that compiles TypeScript folders into JavaScript folders while
//! keeping the project structure, built for Odoo addons.
//!
//! ## Overview
//!
//! spookyts is built on top of spookytslib. For every location given it
//! looks for a `ts` folder, compiles the `.ts` files in it with `tsc` into a
//! sibling `js` folder, and copies every other file across unchanged.
//!
//! ## Usage
//!
//! ```bash
//! # Compile the first ts folder found in an addon
//! spookyts compile addons/my_addon
//!
//! # Compile every ts folder in a tree
//! spookyts compile --uncapped addons/
//!
//! # Show what would be compiled without writing anything
//! spookyts compile --dry addons/my_addon
//!
//! # Use a project-local compiler
//! SPOOKYTS_TSC=node_modules/.bin/tsc spookyts compile addons/my_addon
//! ```

mod render;

use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use console::style;
use spookytslib::{
    FailurePolicy, Layout, ModuleKind, ModuleResolution, Orchestrator, RunConfig, ScriptTarget,
    TransformOptions, TscTransformer,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use render::ConsoleReporter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("spookyts")
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            "A typescript translation layer which compiles ts files to js files \
             while maintaining project structure for odoo projects.",
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log internal decisions to stderr"),
        )
        .subcommand(
            Command::new("compile")
                .about("Compile ts folders found in the given destinations")
                .arg_required_else_help(true)
                .arg(
                    Arg::new("destinations")
                        .action(ArgAction::Append)
                        .num_args(0..)
                        .help("Destinations to convert ts files."),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .action(ArgAction::SetTrue)
                        .help("Suppress output"),
                )
                .arg(
                    Arg::new("dry")
                        .short('d')
                        .long("dry")
                        .action(ArgAction::SetTrue)
                        .help(
                            "Run in dry mode. Only show what would be compiled \
                             without actually compiling anything.",
                        ),
                )
                .arg(
                    Arg::new("uncapped")
                        .short('u')
                        .long("uncapped")
                        .action(ArgAction::SetTrue)
                        .help(
                            "Uncap the search safety and allow spookyts to convert \
                             all ts folders in given destinations",
                        ),
                )
                .arg(
                    Arg::new("exclude")
                        .short('e')
                        .long("exclude")
                        .action(ArgAction::Append)
                        .help("Also skip directories whose name matches this glob pattern"),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Fail a folder when a non-TypeScript file cannot be copied"),
                )
                .arg(
                    Arg::new("target")
                        .long("target")
                        .value_parser(|s: &str| s.parse::<ScriptTarget>())
                        .help("ECMAScript target of the emitted JavaScript [default: es2020]"),
                )
                .arg(
                    Arg::new("module")
                        .long("module")
                        .value_parser(|s: &str| s.parse::<ModuleKind>())
                        .help("Module system of the emitted JavaScript [default: es2020]"),
                )
                .arg(
                    Arg::new("module-resolution")
                        .long("module-resolution")
                        .value_parser(|s: &str| s.parse::<ModuleResolution>())
                        .help("Module resolution strategy [default: node10]"),
                )
                .arg(
                    Arg::new("tsc")
                        .long("tsc")
                        .env("SPOOKYTS_TSC")
                        .default_value("tsc")
                        .help("TypeScript compiler executable"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(["text", "json"])
                        .default_value("text")
                        .help("Output format"),
                ),
        )
}

/// Build the folder layout from matches
fn build_layout(matches: &ArgMatches) -> Result<Layout, anyhow::Error> {
    let mut layout = Layout::new();

    if let Some(excludes) = matches.get_many::<String>("exclude") {
        for pattern in excludes {
            layout = layout.exclude(pattern)?;
        }
    }

    Ok(layout)
}

/// Build engine options from matches
fn build_transform(matches: &ArgMatches) -> TransformOptions {
    let mut options = TransformOptions::new();

    if let Some(target) = matches.get_one::<ScriptTarget>("target") {
        options = options.target(*target);
    }
    if let Some(module) = matches.get_one::<ModuleKind>("module") {
        options = options.module(*module);
    }
    if let Some(resolution) = matches.get_one::<ModuleResolution>("module-resolution") {
        options = options.module_resolution(*resolution);
    }

    options
}

/// Handler for the compile command
fn compile_handler(matches: &ArgMatches) -> Result<ExitCode, anyhow::Error> {
    let destinations: Vec<String> = matches
        .get_many::<String>("destinations")
        .map(|v| v.cloned().collect())
        .unwrap_or_default();
    let json = matches
        .get_one::<String>("output")
        .is_some_and(|o| o == "json");
    let quiet = matches.get_flag("quiet");

    let policy = if matches.get_flag("strict") {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Skip
    };

    let config = RunConfig::new()
        .quiet(quiet)
        .dry(matches.get_flag("dry"))
        .uncapped(matches.get_flag("uncapped"))
        .layout(build_layout(matches)?)
        .transform(build_transform(matches))
        .copy_failures(policy);

    let tsc = TscTransformer::new(
        matches
            .get_one::<String>("tsc")
            .map(|s| s.as_str())
            .unwrap_or("tsc"),
    );
    debug!(?config, program = tsc.program(), ?destinations, "starting compile run");

    // JSON mode keeps stdout for the report
    let mut reporter = ConsoleReporter::new(quiet || json, config.layout.source_marker.clone());
    let report = Orchestrator::new(&config, &tsc).run(&destinations, &mut reporter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if report.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn init_tracing(verbose: bool) {
    // Skips and failures are already rendered, so library warnings stay quiet by default
    let default = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let result = match matches.subcommand() {
        Some(("compile", sub)) => compile_handler(sub),
        _ => Ok(ExitCode::FAILURE),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e}", style("Error:").red());
            ExitCode::FAILURE
        }
    }
}
