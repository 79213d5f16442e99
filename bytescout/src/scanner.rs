use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::trace;

use crate::errors::{ScanError, ScanResult};
use crate::pattern::BytePattern;
use crate::trace::{TraceEvent, TraceSink};

const BUFFER_CAPACITY: usize = 65536;

/// Checks files for a pattern on aligned block boundaries.
///
/// A file is read in blocks of exactly `pattern.len()` bytes starting at
/// offset 0. It matches when one of those blocks equals the pattern. An
/// occurrence that straddles two blocks is not a match, and a trailing block
/// shorter than the pattern is never compared.
#[derive(Debug)]
pub struct PatternScanner<'p, S: TraceSink> {
    pattern: &'p BytePattern,
    sink: S,
}

impl<'p, S: TraceSink> PatternScanner<'p, S> {
    pub fn new(pattern: &'p BytePattern, sink: S) -> Self {
        Self { pattern, sink }
    }

    /// Scans one file. Returns `Ok(true)` at the first aligned match.
    ///
    /// Open and read failures come back as skippable errors. Failing to
    /// allocate the block buffer is `ScanError::ResourceExhausted`.
    pub fn scan(&self, path: &Path) -> ScanResult<bool> {
        let file = File::open(path).map_err(|e| ScanError::file_unreadable(path, e))?;
        self.sink.record(TraceEvent::FileOpened, path);

        let mut block = allocate_block(self.pattern.len())?;

        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        let matched = find_aligned(&mut reader, self.pattern.as_bytes(), &mut block)
            .map_err(|e| ScanError::read_failed(path, e))?;

        trace!("{}: matched={}", path.display(), matched);
        self.sink.record(TraceEvent::FileScanned, path);
        Ok(matched)
    }
}

#[cfg(test)]
thread_local! {
    /// Makes the next block allocations on this thread fail
    pub(crate) static FAIL_BLOCK_ALLOCATION: std::cell::Cell<bool> =
        const { std::cell::Cell::new(false) };
}

fn allocate_block(len: usize) -> ScanResult<Vec<u8>> {
    #[cfg(test)]
    if FAIL_BLOCK_ALLOCATION.with(|fail| fail.get()) {
        return Err(ScanError::resource_exhausted("read buffer: allocation refused"));
    }

    let mut block = Vec::new();
    block
        .try_reserve_exact(len)
        .map_err(|e| ScanError::resource_exhausted(format!("read buffer: {}", e)))?;
    block.resize(len, 0);
    Ok(block)
}

/// Reads `block.len()`-sized blocks until one equals `pattern` or the input
/// runs short of a full block.
fn find_aligned<R: Read>(reader: &mut R, pattern: &[u8], block: &mut [u8]) -> io::Result<bool> {
    debug_assert_eq!(pattern.len(), block.len());
    loop {
        if read_block(reader, block)? < block.len() {
            return Ok(false);
        }
        if *block == *pattern {
            return Ok(true);
        }
    }
}

/// Fills `block` as far as the input allows. Returns the byte count, which is
/// only short of `block.len()` at end of input.
fn read_block<R: Read>(reader: &mut R, block: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < block.len() {
        match reader.read(&mut block[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
