//! # flowctl
//!
//! Command-line front end for Flow Canvas.
//!
//! ## Usage
//!
//! ```bash
//! flowctl validate canvas.json
//! flowctl compile canvas.json -o flow.json --routing-model --sync
//! flowctl import flow.json -o canvas.json
//! ```
//!
//! A canvas file is the JSON array of screens held by the store. A flow file
//! is the compiled document.
//!
//! ## Architecture
//!
//! - `Cli` / `Command` - arguments parsed with clap
//! - `run` - executes a command, writing results to the given sink
//! - Logs go to stderr so stdout stays machine-readable

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use flow_core::config::DEFAULT_FLOW_VERSION;
use flow_core::{
    compile, import_json, sync_visual_order_with_json, validate_flow, CompileConfig, Screen,
    ValidationConfig,
};

/// Command-line arguments for flowctl.
#[derive(Debug, Clone, Parser)]
#[command(name = "flowctl")]
#[command(about = "Validate, compile and import multi-screen form flows")]
#[command(version)]
pub struct Cli {
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// flowctl subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check a canvas file and print its diagnostics.
    Validate(ValidateArgs),
    /// Compile a canvas file into a flow document.
    Compile(CompileArgs),
    /// Rebuild a canvas file from a flow document.
    Import(ImportArgs),
}

/// Arguments for `flowctl validate`.
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Canvas file to check.
    pub input: PathBuf,

    /// Require every footer payload key to name a form field on its screen.
    #[arg(long)]
    pub check_payload_keys: bool,

    /// Fraction of a length limit at which a warning is raised.
    #[arg(long, default_value_t = 0.9)]
    pub warn_ratio: f64,

    /// Print the report as JSON instead of one line per diagnostic.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `flowctl compile`.
#[derive(Debug, Clone, Args)]
pub struct CompileArgs {
    /// Canvas file to compile.
    pub input: PathBuf,

    /// Output path; stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Flow document version to emit.
    #[arg(long, env = "FLOW_VERSION", default_value = DEFAULT_FLOW_VERSION)]
    pub flow_version: String,

    /// Data API version to emit.
    #[arg(long, env = "FLOW_DATA_API_VERSION")]
    pub data_api_version: Option<String>,

    /// Emit the screen routing model.
    #[arg(long)]
    pub routing_model: bool,

    /// Move footers to the end of each screen before compiling.
    #[arg(long)]
    pub sync: bool,
}

/// Arguments for `flowctl import`.
#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    /// Flow document to read.
    pub input: PathBuf,

    /// Output path; stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl From<&CompileArgs> for CompileConfig {
    fn from(args: &CompileArgs) -> Self {
        let mut config = CompileConfig::new(args.flow_version.clone());
        config.routing_model = args.routing_model;
        config.data_api_version.clone_from(&args.data_api_version);
        config
    }
}

impl From<&ValidateArgs> for ValidationConfig {
    fn from(args: &ValidateArgs) -> Self {
        Self {
            warn_ratio: args.warn_ratio,
            check_payload_keys: args.check_payload_keys,
        }
    }
}

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command succeeded.
    Success,
    /// The input was processed but failed validation.
    Invalid,
}

/// Run a parsed command, writing results that have no output file to `out`.
///
/// # Errors
///
/// Returns an error if a file cannot be read, parsed or written.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<Outcome> {
    match &cli.command {
        Command::Validate(args) => validate(args, out),
        Command::Compile(args) => compile_canvas(args, out).map(|()| Outcome::Success),
        Command::Import(args) => import(args, out).map(|()| Outcome::Success),
    }
}

/// Read a canvas file.
///
/// # Errors
///
/// Returns an error if the file is unreadable or is not a screen list.
pub fn load_canvas(path: &Path) -> Result<Vec<Screen>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read canvas file {}", path.display()))?;
    let screens: Vec<Screen> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid canvas file {}", path.display()))?;
    tracing::debug!(path = %path.display(), screens = screens.len(), "Loaded canvas");
    Ok(screens)
}

fn validate(args: &ValidateArgs, out: &mut impl Write) -> Result<Outcome> {
    let screens = load_canvas(&args.input)?;
    let report = validate_flow(&screens, &ValidationConfig::from(args));

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        writeln!(out, "{json}")?;
    } else {
        for diagnostic in report.diagnostics() {
            writeln!(out, "{diagnostic}")?;
        }
        writeln!(
            out,
            "{} error(s), {} warning(s)",
            report.error_count(),
            report.warning_count()
        )?;
    }

    tracing::info!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        "Validated {}",
        args.input.display()
    );
    Ok(if report.is_valid {
        Outcome::Success
    } else {
        Outcome::Invalid
    })
}

fn compile_canvas(args: &CompileArgs, out: &mut impl Write) -> Result<()> {
    let mut screens = load_canvas(&args.input)?;
    if args.sync {
        screens = screens
            .iter()
            .map(|s| sync_visual_order_with_json(s).screen)
            .collect();
    }

    let report = validate_flow(&screens, &ValidationConfig::default());
    if !report.is_valid {
        tracing::warn!(
            errors = report.error_count(),
            "Compiling a flow that does not validate"
        );
    }

    let document = compile(&screens, &CompileConfig::from(args));
    let json = document
        .to_json_pretty()
        .context("Failed to encode flow document")?;
    emit(args.output.as_deref(), &json, out)
}

fn import(args: &ImportArgs, out: &mut impl Write) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read flow document {}", args.input.display()))?;
    let screens = import_json(&text)
        .with_context(|| format!("Failed to import {}", args.input.display()))?;
    let json = serde_json::to_string_pretty(&screens).context("Failed to encode canvas")?;
    emit(args.output.as_deref(), &json, out)
}

fn emit(path: Option<&Path>, json: &str, out: &mut impl Write) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Wrote output");
        }
        None => writeln!(out, "{json}")?,
    }
    Ok(())
}
