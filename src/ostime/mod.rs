// Platform timestamp retrieval behind a single capability trait

use crate::types::FileTimes;
use std::fs::Metadata;
use std::path::Path;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

/// Supplies creation, modification and access times for an already-stat'ed file.
///
/// Platforms lacking a distinct creation or access time may substitute the
/// modification time; callers never learn which fields were substituted.
pub trait TimeSource {
    fn file_times(&self, path: &Path, metadata: &Metadata) -> FileTimes;
}

/// Timestamp source for the platform the binary was built for
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformTimes;

impl TimeSource for PlatformTimes {
    fn file_times(&self, _path: &Path, metadata: &Metadata) -> FileTimes {
        platform_times(metadata)
    }
}

#[cfg(unix)]
fn platform_times(metadata: &Metadata) -> FileTimes {
    unix::file_times(metadata)
}

#[cfg(windows)]
fn platform_times(metadata: &Metadata) -> FileTimes {
    windows::file_times(metadata)
}

// Only the modification time is trusted here
#[cfg(not(any(unix, windows)))]
fn platform_times(metadata: &Metadata) -> FileTimes {
    match metadata.modified() {
        Ok(modified) => FileTimes::uniform(modified),
        Err(_) => FileTimes::uniform(std::time::UNIX_EPOCH),
    }
}
