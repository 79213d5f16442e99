use std::io;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::config::ScanConfig;
use crate::errors::ScanResult;
use crate::results::{ScanOutput, ScanSummary};
use crate::scanner::PatternScanner;
use crate::trace::{sink_for, TraceSink};
use crate::walker::DirectoryWalker;

/// Walks `config.root_path` and scans every regular file for the pattern.
///
/// `on_match` is called with each matching path as soon as it is found, in
/// the order the walker produced the files. Unreadable directories and files
/// are logged and skipped. Only running out of memory, or `on_match` failing,
/// ends the scan early with an `Err`.
pub fn scan_tree<F>(config: &ScanConfig, on_match: F) -> ScanResult<ScanSummary>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    let sink = sink_for(config.trace);
    scan_tree_with(config, &*sink, on_match)
}

/// Same as [`scan_tree`], with the trace sink supplied by the caller
pub fn scan_tree_with<S, F>(config: &ScanConfig, sink: S, mut on_match: F) -> ScanResult<ScanSummary>
where
    S: TraceSink,
    F: FnMut(&Path) -> io::Result<()>,
{
    info!(
        "Starting scan of {} for {}",
        config.root_path.display(),
        config.pattern
    );

    let mut walker = DirectoryWalker::new(&config.root_path, &sink);
    let scanner = PatternScanner::new(&config.pattern, &sink);
    let mut summary = ScanSummary::new();

    for next in walker.by_ref() {
        let path = match next {
            Ok(path) => path,
            Err(e) => {
                error!("{}", e);
                return Err(e);
            }
        };

        match scanner.scan(&path) {
            Ok(matched) => {
                summary.record_scan(matched);
                if matched {
                    debug!("Match: {}", path.display());
                    on_match(&path)?;
                }
            }
            Err(e) if e.is_fatal() => {
                error!("{}", e);
                return Err(e);
            }
            Err(e) => {
                warn!("{}", e);
                summary.record_skipped_file();
            }
        }
    }

    summary.record_walk(walker.stats());
    info!("Scan complete. {}", summary);
    Ok(summary)
}

/// Runs a scan and collects the matching paths instead of streaming them
pub fn collect_matches(config: &ScanConfig) -> ScanResult<ScanOutput> {
    let mut matches = Vec::new();
    let summary = scan_tree(config, |path| {
        matches.push(path.to_path_buf());
        Ok(())
    })?;
    Ok(ScanOutput { matches, summary })
}
