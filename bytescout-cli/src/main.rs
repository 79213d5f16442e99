use anyhow::{Context, Result};
use bytescout::{
    config::{debug_requested, default_log_level, DEBUG_ENV_VAR},
    scan_tree, BytePattern, ScanConfig, ScanError,
};
use clap::Parser;
use colored::Colorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Find files that contain a byte pattern on an aligned block boundary.
///
/// Every regular file under DIRECTORY is read in blocks the size of PATTERN,
/// starting at offset 0. A file is printed when one of its blocks equals
/// PATTERN. Symbolic links are not followed.
#[derive(Parser)]
#[command(author, version, about, long_about)]
struct Cli {
    /// Root directory to scan
    directory: PathBuf,

    /// Bytes to look for, as 0x-prefixed hex (e.g. 0xAABBCCDD)
    pattern: BytePattern,

    /// Trace every directory and file visited to stderr (also enabled by BYTESCOUT_DEBUG)
    #[arg(short, long)]
    debug: bool,

    /// Print a summary line to stderr when the scan finishes
    #[arg(long)]
    stats: bool,

    /// Log level
    #[arg(
        long,
        default_value_t = default_log_level(),
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    log_level: String,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let trace = cli.debug || debug_requested(std::env::var_os(DEBUG_ENV_VAR).as_deref());
    let config = ScanConfig::new(cli.directory, cli.pattern)
        .with_trace(trace)
        .with_log_level(cli.log_level);

    setup_logging(&config)?;

    let mut stdout = io::stdout().lock();
    let summary = match scan_tree(&config, |path| write_path(&mut stdout, path)) {
        Ok(summary) => summary,
        // The reader went away (e.g. `| head`); nothing left to report to
        Err(ScanError::IoError(e)) if is_broken_pipe(&e) => return Ok(()),
        Err(e) => return Err(e).context("Scan aborted"),
    };
    match stdout.flush() {
        Err(e) if is_broken_pipe(&e) => return Ok(()),
        flushed => flushed.context("Failed to write matches")?,
    }
    debug!("{}", summary);

    if cli.stats {
        eprintln!("{}", summary.to_string().green());
    }
    Ok(())
}

/// Writes the path's raw bytes so non-UTF-8 names stay usable downstream
fn write_path(out: &mut impl Write, path: &Path) -> io::Result<()> {
    out.write_all(path.as_os_str().as_encoded_bytes())?;
    out.write_all(b"\n")
}

fn is_broken_pipe(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::BrokenPipe
}

fn setup_logging(config: &ScanConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.log_filter())
            .with_context(|| format!("Invalid log level: {}", config.log_level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    Ok(())
}
