// renby - rename files into a sequential numbering ordered by time or size

pub mod app;
pub mod cli;
pub mod error;
pub mod file_ops;
pub mod limits;
pub mod ostime;
pub mod rename;
pub mod security;
pub mod settings;
pub mod types;

pub use error::{Collision, CommitStep, ConfigError, RenameError};
pub use ostime::{PlatformTimes, TimeSource};
pub use rename::{plan_renames, rename_files, rename_files_with, RenamePlan};
pub use types::{FileRecord, FileTimes, Options, PathStatus, RenameReport, SortKey};
