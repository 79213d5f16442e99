//! Iterative depth-first directory traversal.
//!
//! The walker keeps pending directories on an explicit stack instead of the
//! call stack, so stack depth stays constant however deep the tree is:
//!
//! ```text
//! worklist: [root]
//! │
//! ├── pop root → read_dir → emit files, push subdirs   [a, b]
//! ├── pop b    → read_dir → emit files, push subdirs   [a, b/x]
//! ├── pop b/x  → ...
//! └── pop a    → ...
//! ```
//!
//! Entries are visited in whatever order the filesystem returns them. That
//! order is not sorted and may differ between runs, so callers that compare
//! results should compare sets.

use std::fs::{self, DirEntry, ReadDir};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::errors::{ScanError, ScanResult};
use crate::path::{join_child, normalize_root};
use crate::trace::{TraceEvent, TraceSink};

/// Counters for one walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Directories opened and enumerated
    pub directories_visited: u64,
    /// Directories that could not be opened
    pub directories_skipped: u64,
    /// Regular files handed downstream
    pub files_emitted: u64,
    /// Symlinks, devices, sockets and FIFOs
    pub entries_ignored: u64,
    /// Entries whose name or type could not be read
    pub entries_skipped: u64,
}

/// A directory currently being enumerated
struct OpenDirectory {
    path: PathBuf,
    entries: ReadDir,
}

/// Lazily yields every regular file under a root directory.
///
/// Each `next()` call reads just enough of the tree to produce one file path.
/// Unreadable directories and entries are logged and skipped. The only `Err`
/// the iterator yields is `ScanError::ResourceExhausted`, after which the
/// walk is over and `next()` returns `None`.
pub struct DirectoryWalker<S: TraceSink> {
    worklist: Vec<PathBuf>,
    current: Option<OpenDirectory>,
    sink: S,
    stats: WalkStats,
}

impl<S: TraceSink> DirectoryWalker<S> {
    /// Creates a walker rooted at `root`. Nothing is read until the first `next()`.
    pub fn new(root: impl AsRef<Path>, sink: S) -> Self {
        Self {
            worklist: vec![normalize_root(root.as_ref())],
            current: None,
            sink,
            stats: WalkStats::default(),
        }
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    fn open(&mut self, path: PathBuf) -> Option<OpenDirectory> {
        match fs::read_dir(&path) {
            Ok(entries) => {
                self.sink.record(TraceEvent::DirectoryOpened, &path);
                self.stats.directories_visited += 1;
                Some(OpenDirectory { path, entries })
            }
            Err(e) => {
                warn!("{}", ScanError::directory_unreadable(&path, e));
                self.stats.directories_skipped += 1;
                None
            }
        }
    }

    fn close_current(&mut self) {
        if let Some(dir) = self.current.take() {
            drop(dir.entries);
            self.sink.record(TraceEvent::DirectoryClosed, &dir.path);
        }
    }

    /// Releases every pending directory and the open handle
    fn abort(&mut self, error: ScanError) -> ScanError {
        self.current = None;
        self.worklist.clear();
        self.worklist.shrink_to_fit();
        error
    }
}

/// Routes one directory entry: subdirectories onto the worklist, regular
/// files back to the caller, everything else ignored.
fn dispatch_entry<S: TraceSink>(
    parent: &Path,
    entry: DirEntry,
    worklist: &mut Vec<PathBuf>,
    sink: &S,
    stats: &mut WalkStats,
) -> ScanResult<Option<PathBuf>> {
    let file_type = match entry.file_type() {
        Ok(file_type) => file_type,
        Err(e) => {
            warn!("Error reading entry type: {}: {}", entry.path().display(), e);
            stats.entries_skipped += 1;
            return Ok(None);
        }
    };

    if file_type.is_dir() {
        let child = join_child(parent, &entry.file_name())?;
        worklist
            .try_reserve(1)
            .map_err(|e| ScanError::resource_exhausted(format!("worklist node: {}", e)))?;
        sink.record(TraceEvent::DirectoryPushed, &child);
        worklist.push(child);
        Ok(None)
    } else if file_type.is_file() {
        let child = join_child(parent, &entry.file_name())?;
        stats.files_emitted += 1;
        Ok(Some(child))
    } else {
        stats.entries_ignored += 1;
        Ok(None)
    }
}

impl<S: TraceSink> Iterator for DirectoryWalker<S> {
    type Item = ScanResult<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(dir) = self.current.as_mut() else {
                let path = self.worklist.pop()?;
                self.current = self.open(path);
                continue;
            };

            let entry = match dir.entries.next() {
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    warn!("Error reading directory: {}: {}", dir.path.display(), e);
                    self.stats.entries_skipped += 1;
                    continue;
                }
                None => {
                    self.close_current();
                    continue;
                }
            };

            match dispatch_entry(
                &dir.path,
                entry,
                &mut self.worklist,
                &self.sink,
                &mut self.stats,
            ) {
                Ok(Some(file)) => return Some(Ok(file)),
                Ok(None) => continue,
                Err(e) => return Some(Err(self.abort(e))),
            }
        }
    }
}
