//! flowctl entry point.

use std::process::ExitCode;

use clap::Parser;
use flow_cli::{run, Cli, Outcome};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    match run(&cli, &mut stdout)? {
        Outcome::Success => Ok(ExitCode::SUCCESS),
        Outcome::Invalid => Ok(ExitCode::FAILURE),
    }
}

/// Initialize tracing on stderr.
///
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,flow_core=debug"));

    let use_json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry().with(filter).with(layer).init();
    }
}
