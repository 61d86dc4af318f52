//! CLI entry point for fsprobe.
//!
//! Recreates a scratch tree, installs a recursive watch on its `source/`
//! subtree, performs the scripted filesystem scenarios and reports, one line
//! per scenario, which notifications the platform backend delivered.
//!
//! # Usage
//!
//! ```bash
//! # Report to ./testing_monitor/monitor.log and stdout
//! fsprobe
//!
//! # Report to a chosen file, with debug logs on stderr
//! fsprobe -v probe.log
//!
//! # Elsewhere, with a longer settle delay
//! fsprobe --root /tmp/fsprobe --settle-ms 3000
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::fs::File;
use std::io::{self, Write};

use camino::Utf8PathBuf;
use clap::Parser;
use color_eyre::eyre::WrapErr;
use fp_actions::ActionRegistry;
use fp_core::ProbeConfig;
use fp_harness::{Probe, Scratch};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Probe which change notifications the platform file watcher delivers for
/// a fixed set of filesystem operations.
#[derive(Parser)]
#[command(name = "fsprobe", version, about, long_about = None)]
struct Cli {
    /// File to write the report to, in addition to stdout.
    ///
    /// Defaults to `monitor.log` in the scratch root.
    report: Option<Utf8PathBuf>,

    /// Scratch root. Deleted and recreated on every run.
    #[arg(long, env = "FSPROBE_ROOT")]
    root: Option<Utf8PathBuf>,

    /// JSON configuration file.
    #[arg(long, env = "FSPROBE_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Wait after the last action before draining, in milliseconds.
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never interleave with the report on stdout.
/// Respects `RUST_LOG` if set; otherwise `info`, or `debug` with
/// `--verbose`, with the backend crate held at `warn`.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},notify=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

/// Builds a [`ProbeConfig`] from the config file, then CLI overrides.
fn build_config(cli: &Cli) -> color_eyre::Result<ProbeConfig> {
    let mut config = match &cli.config {
        Some(path) => ProbeConfig::from_json_file(path)
            .wrap_err_with(|| format!("Failed to load config from {path}"))?,
        None => ProbeConfig::default(),
    };

    if let Some(root) = &cli.root {
        config.scratch.root.clone_from(root);
    }
    if let Some(settle_ms) = cli.settle_ms {
        config.driver.settle_ms = settle_ms;
    }

    config.validate()?;
    debug!(?config, "Configuration resolved");
    Ok(config)
}

// =============================================================================
// REPORT SINK
// =============================================================================

/// Writes everything to both a file and stdout.
struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Resolve configuration and prepare a clean scratch tree
    let config = build_config(&cli)?;
    let scratch = Scratch::prepare(&config.scratch)?;
    info!(root = %scratch.root(), watched = %scratch.watched(), "Scratch tree ready");

    // 5. Open the report sink before anything is observed
    let report_path = cli
        .report
        .clone()
        .unwrap_or_else(|| scratch.default_report_path().to_owned());
    let file = File::create(&report_path)
        .wrap_err_with(|| format!("Failed to create report file {report_path}"))?;
    let mut sink = Tee {
        first: file,
        second: io::stdout().lock(),
    };

    // 6. Run the probe
    let registry = ActionRegistry::new(scratch.watched());
    let outcome = Probe::new(config).run(registry, &mut sink).await?;

    info!(
        report = %report_path,
        events = outcome.collector.total(),
        "Report written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["fsprobe"]).unwrap();
        assert!(cli.report.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli =
            Cli::try_parse_from(["fsprobe", "--root", "/tmp/probe", "--settle-ms", "250", "out.log"])
                .unwrap();
        assert_eq!(cli.report.as_deref().map(|p| p.as_str()), Some("out.log"));

        let config = build_config(&cli).unwrap();
        assert_eq!(config.scratch.root, "/tmp/probe");
        assert_eq!(config.driver.settle_ms, 250);
        assert_eq!(config.scratch.watched_dir, "source");
    }

    #[test]
    fn test_tee_writes_both() {
        let mut sink = Tee {
            first: Vec::new(),
            second: Vec::new(),
        };
        sink.write_all(b"empty: C\n").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.first, b"empty: C\n");
        assert_eq!(sink.second, b"empty: C\n");
    }
}
