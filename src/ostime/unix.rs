// Unix: status change time stands in for creation time

use crate::types::FileTimes;
use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub fn file_times(metadata: &Metadata) -> FileTimes {
    FileTimes {
        created: from_timespec(metadata.ctime(), metadata.ctime_nsec()),
        modified: from_timespec(metadata.mtime(), metadata.mtime_nsec()),
        accessed: from_timespec(metadata.atime(), metadata.atime_nsec()),
    }
}

// Converts seconds plus nanoseconds relative to the epoch, negative seconds included
fn from_timespec(secs: i64, nsecs: i64) -> SystemTime {
    let nanos = Duration::from_nanos(nsecs.clamp(0, 999_999_999) as u64);
    if secs >= 0 {
        UNIX_EPOCH + Duration::from_secs(secs as u64) + nanos
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs()) + nanos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_positive_timespec() {
        let time = from_timespec(10, 5);
        assert_eq!(
            time.duration_since(UNIX_EPOCH).unwrap(),
            Duration::new(10, 5)
        );
    }

    #[test]
    fn converts_pre_epoch_timespec() {
        let time = from_timespec(-2, 500_000_000);
        assert_eq!(
            UNIX_EPOCH.duration_since(time).unwrap(),
            Duration::from_millis(1500)
        );
    }
}
