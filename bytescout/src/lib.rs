pub mod config;
pub mod engine;
pub mod errors;
pub mod path;
pub mod pattern;
pub mod results;
pub mod scanner;
pub mod trace;
pub mod walker;

pub use config::ScanConfig;
pub use engine::{collect_matches, scan_tree, scan_tree_with};
pub use errors::{ScanError, ScanResult};
pub use pattern::BytePattern;
pub use results::{ScanOutput, ScanSummary};
pub use scanner::PatternScanner;
pub use walker::{DirectoryWalker, WalkStats};
