// Windows: creation and access times come straight from the file attributes

use crate::types::FileTimes;
use std::fs::Metadata;
use std::time::UNIX_EPOCH;

pub fn file_times(metadata: &Metadata) -> FileTimes {
    let modified = metadata.modified().unwrap_or(UNIX_EPOCH);
    FileTimes {
        created: metadata.created().unwrap_or(modified),
        modified,
        accessed: metadata.accessed().unwrap_or(modified),
    }
}
