// Error types returned by the renaming engine

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Option values rejected before any file is touched.
///
/// `PatternTooLong` and `AffixTooLong` are limits of this tool that keep
/// generated names within common file name lengths; library callers with
/// other needs should check them before building `Options`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("pattern cannot be empty")]
    EmptyPattern,
    #[error("pattern too long (max {0} chars)")]
    PatternTooLong(usize),
    #[error("init value must be non-negative")]
    NegativeInit,
    #[error("prefix or postfix too long (max {0} bytes)")]
    AffixTooLong(usize),
}

/// A planned rename that cannot proceed without overwriting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collision {
    DuplicateDestination {
        destination: PathBuf,
        sources: Vec<PathBuf>,
    },
    ExistingDestination {
        destination: PathBuf,
    },
}

impl Collision {
    pub fn destination(&self) -> &PathBuf {
        match self {
            Collision::DuplicateDestination { destination, .. } => destination,
            Collision::ExistingDestination { destination } => destination,
        }
    }
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collision::DuplicateDestination {
                destination,
                sources,
            } => write!(
                f,
                "multiple sources {:?} -> same destination {:?}",
                sources, destination
            ),
            Collision::ExistingDestination { destination } => {
                write!(f, "destination already exists: {:?}", destination)
            }
        }
    }
}

/// Filesystem call that failed while committing a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStep {
    Rename,
    Stage,
    RemoveExisting,
    Finalize,
}

impl fmt::Display for CommitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitStep::Rename => write!(f, "failed to rename file"),
            CommitStep::Stage => write!(f, "failed to move source to temp"),
            CommitStep::RemoveExisting => write!(f, "failed to remove existing destination"),
            CommitStep::Finalize => write!(f, "failed to rename temp to destination"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("invalid options: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to get file info: {path:?}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("conflicts detected, aborting: {}", join_collisions(.0))]
    Collision(Vec<Collision>),

    /// `renamed` counts the renames completed before the check failed
    #[error("conflicts detected: destination {destination:?} is also a source ({renamed} completed)")]
    SourceCollision { destination: PathBuf, renamed: usize },

    #[error("destination already exists before renaming: {destination:?} ({renamed} completed)")]
    DestinationExists { destination: PathBuf, renamed: usize },

    #[error("access denied: cannot modify entries in {0:?}")]
    AccessDenied(PathBuf),

    /// `renamed` counts the renames completed before the failure
    #[error("{step}: {from:?} -> {to:?} ({renamed} completed)")]
    Commit {
        step: CommitStep,
        from: PathBuf,
        to: PathBuf,
        renamed: usize,
        #[source]
        source: io::Error,
    },
}

impl RenameError {
    // True when the failure happened after the filesystem was modified
    pub fn is_partial(&self) -> bool {
        match self {
            RenameError::Commit { renamed, .. }
            | RenameError::SourceCollision { renamed, .. }
            | RenameError::DestinationExists { renamed, .. } => *renamed > 0,
            _ => false,
        }
    }
}

fn join_collisions(collisions: &[Collision]) -> String {
    collisions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
