use std::fmt;
use std::path::Path;
use tracing::debug;

/// A step of the walk or scan worth tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent {
    DirectoryOpened,
    DirectoryPushed,
    DirectoryClosed,
    FileOpened,
    FileScanned,
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            TraceEvent::DirectoryOpened => "Opened directory",
            TraceEvent::DirectoryPushed => "Pushed directory to worklist",
            TraceEvent::DirectoryClosed => "Closed directory",
            TraceEvent::FileOpened => "Opened file",
            TraceEvent::FileScanned => "Scanned file",
        };
        f.write_str(message)
    }
}

/// Receives trace events from the walker and the scanner.
///
/// The sink is handed to each component when it is built, so whether tracing
/// happens is decided once by the caller.
pub trait TraceSink {
    fn record(&self, event: TraceEvent, path: &Path);
}

impl<T: TraceSink + ?Sized> TraceSink for &T {
    fn record(&self, event: TraceEvent, path: &Path) {
        (**self).record(event, path)
    }
}

impl<T: TraceSink + ?Sized> TraceSink for Box<T> {
    fn record(&self, event: TraceEvent, path: &Path) {
        (**self).record(event, path)
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl TraceSink for Silent {
    fn record(&self, _event: TraceEvent, _path: &Path) {}
}

/// Forwards events to `tracing` at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn record(&self, event: TraceEvent, path: &Path) {
        debug!(target: "bytescout::trace", "{}: {}", path.display(), event);
    }
}

/// Picks the sink for a run: `LogSink` when tracing is enabled, `Silent` otherwise
pub fn sink_for(enabled: bool) -> Box<dyn TraceSink> {
    if enabled {
        Box::new(LogSink)
    } else {
        Box::new(Silent)
    }
}
