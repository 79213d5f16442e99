use std::fmt;
use std::path::PathBuf;

use crate::walker::WalkStats;

/// Totals for a completed scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Directories opened and enumerated
    pub directories_visited: u64,
    /// Directories that could not be opened
    pub directories_skipped: u64,
    /// Regular files read to the first match or the end
    pub files_scanned: u64,
    /// Regular files that could not be opened or read
    pub files_skipped: u64,
    /// Files with an aligned block equal to the pattern
    pub files_matched: u64,
}

impl ScanSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the walker's directory counters into the summary
    pub fn record_walk(&mut self, stats: WalkStats) {
        self.directories_visited = stats.directories_visited;
        self.directories_skipped = stats.directories_skipped;
    }

    pub fn record_scan(&mut self, matched: bool) {
        self.files_scanned += 1;
        if matched {
            self.files_matched += 1;
        }
    }

    pub fn record_skipped_file(&mut self) {
        self.files_skipped += 1;
    }

    /// Whether anything in the tree was unreadable
    pub fn is_complete(&self) -> bool {
        self.directories_skipped == 0 && self.files_skipped == 0
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found {} matching files out of {} scanned in {} directories",
            self.files_matched, self.files_scanned, self.directories_visited
        )?;
        if !self.is_complete() {
            write!(
                f,
                " ({} directories and {} files skipped)",
                self.directories_skipped, self.files_skipped
            )?;
        }
        Ok(())
    }
}

/// Matching paths of a scan, in the order they were found
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    pub matches: Vec<PathBuf>,
    pub summary: ScanSummary,
}
