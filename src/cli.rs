// Command-line definitions and input expansion

use crate::limits::MAX_REGEX_SIZE;
use crate::settings::SettingKey;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "renby")]
#[command(about = "Rename files to sequential numbers ordered by time or size")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sort by creation time
    Ctime(RenameArgs),

    /// Sort by modification time
    Mtime(RenameArgs),

    /// Sort by access time
    Atime(RenameArgs),

    /// Sort by file size
    Size(RenameArgs),

    /// Show or change stored defaults
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RenameArgs {
    /// File patterns to rename (glob syntax)
    #[arg(required = true, value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Reverse sort order
    #[arg(short, long)]
    pub reverse: bool,

    /// Rename pattern (0: decimal, x: hexadecimal) [default: 000000]
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Prefix string
    #[arg(long)]
    pub pre: Option<String>,

    /// Postfix string
    #[arg(long)]
    pub post: Option<String>,

    /// Number given to the first file [default: 1]
    #[arg(short, long, allow_negative_numbers = true)]
    pub init: Option<i64>,

    /// Overwrite existing destinations through temporary names
    #[arg(short, long)]
    pub force: bool,

    /// Print the planned renames without changing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Only rename files whose name matches this regex
    #[arg(short, long = "match", value_name = "REGEX")]
    pub matching: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print stored defaults
    Show,

    /// Store a default value
    Set {
        key: ConfigKey,
        value: String,
    },

    /// Remove all stored defaults
    Reset,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Pattern,
    Pre,
    Post,
    Init,
}

impl From<ConfigKey> for SettingKey {
    fn from(key: ConfigKey) -> Self {
        match key {
            ConfigKey::Pattern => SettingKey::Pattern,
            ConfigKey::Pre => SettingKey::Prefix,
            ConfigKey::Post => SettingKey::Suffix,
            ConfigKey::Init => SettingKey::Init,
        }
    }
}

// Compiles the file name filter with a bounded automaton size
pub fn build_filter(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .size_limit(MAX_REGEX_SIZE)
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid regex: {}", e))
}

// Expands glob patterns into unique absolute paths, first occurrence wins
pub fn expand_inputs(patterns: &[String], filter: Option<&Regex>) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        let entries = glob::glob(pattern)
            .with_context(|| format!("invalid file pattern '{}'", pattern))?;
        let mut matched = 0;

        for entry in entries {
            let path = entry.with_context(|| format!("Failed to read match of '{}'", pattern))?;
            let path = std::path::absolute(&path)
                .with_context(|| format!("Failed to resolve: {}", path.display()))?;

            if let Some(filter) = filter {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy())
                    .unwrap_or_default();
                if !filter.is_match(&name) {
                    continue;
                }
            }

            matched += 1;
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }

        if matched == 0 {
            warn!("no files matched '{}'", pattern);
        }
    }

    Ok(files)
}
