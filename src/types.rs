// Shared types used across modules

use crate::error::ConfigError;
use crate::limits::{DEFAULT_INITIAL_INDEX, DEFAULT_PATTERN, MAX_AFFIX_LENGTH, MAX_PATTERN_LENGTH};
use std::path::PathBuf;
use std::time::SystemTime;

/// The three timestamps a platform reports for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTimes {
    pub created: SystemTime,
    pub modified: SystemTime,
    pub accessed: SystemTime,
}

impl FileTimes {
    // All three fields set to the same instant
    pub fn uniform(time: SystemTime) -> Self {
        Self {
            created: time,
            modified: time,
            accessed: time,
        }
    }
}

/// Snapshot of one input file taken before sorting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
    pub times: FileTimes,
}

/// Result of inspecting one input path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStatus {
    Included(FileRecord),
    SkippedDirectory,
}

/// File attribute the batch is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    CreationTime,
    ModificationTime,
    AccessTime,
    Size,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::CreationTime => write!(f, "ctime"),
            SortKey::ModificationTime => write!(f, "mtime"),
            SortKey::AccessTime => write!(f, "atime"),
            SortKey::Size => write!(f, "size"),
        }
    }
}

/// Renaming options consumed read-only by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub sort_key: SortKey,
    pub reverse: bool,
    /// Width comes from the length, base is hexadecimal when it contains `x`
    pub pattern: String,
    /// Number given to the first file after sorting
    pub initial_index: i64,
    pub prefix: String,
    pub suffix: String,
    pub force_overwrite: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sort_key: SortKey::default(),
            reverse: false,
            pattern: String::from(DEFAULT_PATTERN),
            initial_index: DEFAULT_INITIAL_INDEX,
            prefix: String::new(),
            suffix: String::new(),
            force_overwrite: false,
        }
    }
}

impl Options {
    // Rejects option values that could never produce a valid batch
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pattern.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        if self.pattern.chars().count() > MAX_PATTERN_LENGTH {
            return Err(ConfigError::PatternTooLong(MAX_PATTERN_LENGTH));
        }
        if self.initial_index < 0 {
            return Err(ConfigError::NegativeInit);
        }
        if self.prefix.len() > MAX_AFFIX_LENGTH || self.suffix.len() > MAX_AFFIX_LENGTH {
            return Err(ConfigError::AffixTooLong(MAX_AFFIX_LENGTH));
        }
        Ok(())
    }
}

/// One source to destination pair of a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRename {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl PlannedRename {
    pub fn is_unchanged(&self) -> bool {
        self.source == self.destination
    }
}

/// Counts reported after a successful commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenameReport {
    pub renamed: usize,
    pub unchanged: usize,
}
