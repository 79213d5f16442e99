use std::fmt;
use std::str::FromStr;

use crate::errors::{ScanError, ScanResult};

const HEX_PREFIX: &str = "0x";

/// An immutable, non-empty byte sequence to look for.
///
/// The pattern length also fixes the block size the scanner reads with, so a
/// match is only found at offsets that are multiples of `len()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BytePattern {
    bytes: Box<[u8]>,
}

impl BytePattern {
    /// Creates a pattern from raw bytes. Empty input is rejected.
    pub fn new(bytes: impl Into<Vec<u8>>) -> ScanResult<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ScanError::invalid_pattern("pattern must contain at least one byte"));
        }
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// Decodes a `0x`-prefixed, even-length hex string such as `0xAABBCCDD`
    pub fn from_hex(input: &str) -> ScanResult<Self> {
        let digits = input
            .strip_prefix(HEX_PREFIX)
            .ok_or_else(|| ScanError::invalid_pattern(input))?;
        if digits.is_empty() || digits.len() % 2 != 0 {
            return Err(ScanError::invalid_pattern(input));
        }

        let bytes = digits
            .as_bytes()
            .chunks(2)
            .map(|pair| match (hex_value(pair[0]), hex_value(pair[1])) {
                (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
                _ => Err(ScanError::invalid_pattern(input)),
            })
            .collect::<ScanResult<Vec<u8>>>()?;

        Self::new(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes in the pattern, always at least one
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

impl FromStr for BytePattern {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for BytePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(HEX_PREFIX)?;
        for byte in self.bytes.iter() {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}
