// File operations: metadata collection and rename execution

use crate::error::{CommitStep, RenameError};
use crate::limits::TEMP_MARKER;
use crate::ostime::TimeSource;
use crate::types::{FileRecord, PathStatus, PlannedRename};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

// Stats one path; directories are reported instead of recorded
pub fn inspect_path<T: TimeSource>(path: &Path, times: &T) -> Result<PathStatus, RenameError> {
    let metadata = fs::metadata(path).map_err(|source| RenameError::Metadata {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.is_dir() {
        return Ok(PathStatus::SkippedDirectory);
    }

    Ok(PathStatus::Included(FileRecord {
        path: path.to_path_buf(),
        size: metadata.len(),
        times: times.file_times(path, &metadata),
    }))
}

// Builds records for every non-directory input, failing on the first stat error
pub fn collect_records<T: TimeSource>(
    paths: &[PathBuf],
    times: &T,
) -> Result<Vec<FileRecord>, RenameError> {
    let mut records = Vec::with_capacity(paths.len());

    for path in paths {
        match inspect_path(path, times)? {
            PathStatus::Included(record) => records.push(record),
            PathStatus::SkippedDirectory => {
                debug!(path = %path.display(), "skipping directory");
            }
        }
    }

    Ok(records)
}

// Renames each pair in order, refusing to replace anything already on disk
pub fn execute_direct(
    entries: &[PlannedRename],
    sources: &HashSet<PathBuf>,
) -> Result<usize, RenameError> {
    let mut renamed = 0;

    for entry in entries {
        if entry.is_unchanged() {
            continue;
        }
        if path_occupied(&entry.destination) {
            let destination = entry.destination.clone();
            if sources.contains(&entry.destination) {
                return Err(RenameError::SourceCollision {
                    destination,
                    renamed,
                });
            }
            return Err(RenameError::DestinationExists {
                destination,
                renamed,
            });
        }

        fs::rename(&entry.source, &entry.destination).map_err(|source| {
            RenameError::Commit {
                step: CommitStep::Rename,
                from: entry.source.clone(),
                to: entry.destination.clone(),
                renamed,
                source,
            }
        })?;
        trace!(from = %entry.source.display(), to = %entry.destination.display(), "renamed");
        renamed += 1;
    }

    Ok(renamed)
}

// Executes renames in two phases through unique temporary names
pub fn execute_safe(entries: &[PlannedRename]) -> Result<usize, RenameError> {
    let mut allocator = TempNames::new();
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(entries.len());
    let mut moves = 0;

    for entry in entries {
        if entry.is_unchanged() {
            continue;
        }
        let temp_path = allocator.allocate(&entry.destination);

        fs::rename(&entry.source, &temp_path).map_err(|source| RenameError::Commit {
            step: CommitStep::Stage,
            from: entry.source.clone(),
            to: temp_path.clone(),
            renamed: moves,
            source,
        })?;
        trace!(from = %entry.source.display(), temp = %temp_path.display(), "staged");
        moves += 1;
        staged.push((temp_path, entry.destination.as_path()));
    }

    let mut renamed_count = 0;
    for (temp_path, final_path) in staged {
        if path_occupied(final_path) {
            remove_occupant(final_path).map_err(|source| RenameError::Commit {
                step: CommitStep::RemoveExisting,
                from: temp_path.clone(),
                to: final_path.to_path_buf(),
                renamed: moves,
                source,
            })?;
            debug!(path = %final_path.display(), "removed existing destination");
        }

        fs::rename(&temp_path, final_path).map_err(|source| RenameError::Commit {
            step: CommitStep::Finalize,
            from: temp_path.clone(),
            to: final_path.to_path_buf(),
            renamed: moves,
            source,
        })?;
        moves += 1;
        renamed_count += 1;
    }

    Ok(renamed_count)
}

// Clears whatever sits at a final destination; only empty directories can go
fn remove_occupant(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

/// Hands out staging names that are free on disk at allocation time
struct TempNames {
    pid: u32,
    counter: u64,
}

impl TempNames {
    fn new() -> Self {
        Self {
            pid: std::process::id(),
            counter: 0,
        }
    }

    // Picks `<stem>.renby.tmp.<pid>.<n><ext>` beside the destination
    fn allocate(&mut self, destination: &Path) -> PathBuf {
        let dir = destination.parent().unwrap_or(Path::new(""));
        let name = destination.file_name().unwrap_or_default();
        let (stem, ext) = crate::rename::split_extension(name);

        loop {
            let mut candidate = OsString::from(&stem);
            candidate.push(format!(".{}.{}.{}", TEMP_MARKER, self.pid, self.counter));
            candidate.push(&ext);
            self.counter += 1;

            let temp_path = dir.join(candidate);
            if !path_occupied(&temp_path) {
                return temp_path;
            }
        }
    }
}

// Any directory entry counts, dangling symlinks included
fn path_occupied(path: &Path) -> bool {
    match fs::symlink_metadata(path) {
        Ok(_) => true,
        Err(e) => e.kind() != io::ErrorKind::NotFound,
    }
}
