//! Path string helpers used by the walker.
//!
//! Paths are built by concatenation (`parent + "/" + name`), never by asking
//! the filesystem, so normalization here is purely textual.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::errors::{ScanError, ScanResult};

const SEPARATOR: char = '/';

/// Collapses every run of `/` into a single `/`.
///
/// `normalize_path(normalize_path(p)) == normalize_path(p)` for any `p`.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut previous_was_separator = false;
    for c in path.chars() {
        let is_separator = c == SEPARATOR;
        if !(is_separator && previous_was_separator) {
            normalized.push(c);
        }
        previous_was_separator = is_separator;
    }
    normalized
}

/// Normalizes a root path given by the user.
///
/// Works on the raw bytes, so roots that are not valid UTF-8 are collapsed
/// too. `/` is ASCII and never part of a multi-byte sequence.
#[cfg(unix)]
pub fn normalize_root(root: &Path) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;

    let bytes = root.as_os_str().as_encoded_bytes();
    PathBuf::from(OsString::from_vec(collapse_separators(bytes)))
}

#[cfg(not(unix))]
pub fn normalize_root(root: &Path) -> PathBuf {
    match root.to_str() {
        Some(s) => PathBuf::from(normalize_path(s)),
        None => root.to_path_buf(),
    }
}

#[cfg(unix)]
fn collapse_separators(bytes: &[u8]) -> Vec<u8> {
    let mut collapsed = Vec::with_capacity(bytes.len());
    for &b in bytes {
        if !(b == b'/' && collapsed.last() == Some(&b'/')) {
            collapsed.push(b);
        }
    }
    collapsed
}

/// Builds `parent/name` without doubling the separator when `parent` already
/// ends in one (e.g. a root of `/` or `dir/`).
///
/// Directory entry names never contain `/`, so a normalized parent always
/// yields a normalized child.
pub fn join_child(parent: &Path, name: &OsStr) -> ScanResult<PathBuf> {
    let parent = parent.as_os_str();
    let needs_separator = !parent.as_encoded_bytes().ends_with(b"/");

    let mut joined = OsString::new();
    joined
        .try_reserve(parent.len() + name.len() + usize::from(needs_separator))
        .map_err(|e| ScanError::resource_exhausted(format!("path string: {}", e)))?;

    joined.push(parent);
    if needs_separator {
        joined.push("/");
    }
    joined.push(name);
    Ok(PathBuf::from(joined))
}
