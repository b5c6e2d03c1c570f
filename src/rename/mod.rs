// Rename strategy: ordering, number formatting, planning and the batch entry point

use crate::error::{Collision, RenameError};
use crate::file_ops::{collect_records, execute_direct, execute_safe};
use crate::ostime::{PlatformTimes, TimeSource};
use crate::security::ensure_writable;
use crate::types::{FileRecord, Options, PlannedRename, RenameReport, SortKey};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// Stable sort by the chosen key; reversal flips the comparison, not the list
pub fn sort_records(records: &mut [FileRecord], key: SortKey, reverse: bool) {
    records.sort_by(|a, b| {
        let ordering = compare_records(a, b, key);
        if reverse {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare_records(a: &FileRecord, b: &FileRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::CreationTime => a.times.created.cmp(&b.times.created),
        SortKey::ModificationTime => a.times.modified.cmp(&b.times.modified),
        SortKey::AccessTime => a.times.accessed.cmp(&b.times.accessed),
        SortKey::Size => a.size.cmp(&b.size),
    }
}

/// Zero-padded numeral layout derived from a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub width: usize,
    pub hex: bool,
}

impl NumberFormat {
    pub fn from_pattern(pattern: &str) -> Self {
        Self {
            width: pattern.chars().count(),
            hex: pattern.contains('x'),
        }
    }

    // Values wider than the field keep all their digits
    pub fn render(&self, value: u64) -> String {
        if self.hex {
            format!("{:0width$x}", value, width = self.width)
        } else {
            format!("{:0width$}", value, width = self.width)
        }
    }
}

// Splits a file name at its last dot; the extension keeps the dot
pub fn split_extension(name: &OsStr) -> (OsString, OsString) {
    if let Some(text) = name.to_str() {
        return match text.rfind('.') {
            Some(dot) => (OsString::from(&text[..dot]), OsString::from(&text[dot..])),
            None => (OsString::from(text), OsString::new()),
        };
    }

    // Non UTF-8 names fall back to the path rules
    let path = Path::new(name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => {
            let mut with_dot = OsString::from(".");
            with_dot.push(ext);
            (stem.to_os_string(), with_dot)
        }
        _ => (name.to_os_string(), OsString::new()),
    }
}

// Builds `prefix + number + suffix + extension` for one ordinal
pub fn generate_name(ordinal: usize, extension: &OsStr, options: &Options) -> OsString {
    let format = NumberFormat::from_pattern(&options.pattern);
    let value = (options.initial_index.max(0) as u64).saturating_add(ordinal as u64);

    let mut name = OsString::from(&options.prefix);
    name.push(format.render(value));
    name.push(&options.suffix);
    name.push(extension);
    name
}

// Target path for the record at `ordinal`, kept in the source's directory
fn destination_for(record: &FileRecord, ordinal: usize, options: &Options) -> PathBuf {
    let file_name = record.path.file_name().unwrap_or_default();
    let (_, extension) = split_extension(file_name);
    let new_name = generate_name(ordinal, &extension, options);

    match record.path.parent() {
        Some(dir) => dir.join(new_name),
        None => PathBuf::from(new_name),
    }
}

/// Ordered source to destination mapping with its collision data
#[derive(Debug, Clone, Default)]
pub struct RenamePlan {
    entries: Vec<PlannedRename>,
    sources: HashSet<PathBuf>,
    destinations: BTreeMap<PathBuf, Vec<PathBuf>>,
    collisions: Vec<Collision>,
}

impl RenamePlan {
    // Assigns ordinals in sorted order and records every collision
    pub fn build(records: &[FileRecord], options: &Options) -> Self {
        let entries = records
            .iter()
            .enumerate()
            .map(|(ordinal, record)| {
                let destination = destination_for(record, ordinal, options);
                debug!(
                    from = %record.path.display(),
                    to = %destination.display(),
                    ordinal,
                    "planned"
                );
                PlannedRename {
                    source: record.path.clone(),
                    destination,
                }
            })
            .collect();
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<PlannedRename>) -> Self {
        let mut plan = Self::default();
        for entry in &entries {
            plan.sources.insert(entry.source.clone());
            plan.destinations
                .entry(entry.destination.clone())
                .or_default()
                .push(entry.source.clone());
        }
        plan.entries = entries;
        plan.collisions = plan.detect_collisions();
        plan
    }

    fn detect_collisions(&self) -> Vec<Collision> {
        let mut collisions = Vec::new();

        for (destination, sources) in &self.destinations {
            if sources.len() > 1 {
                collisions.push(Collision::DuplicateDestination {
                    destination: destination.clone(),
                    sources: sources.clone(),
                });
            }
            if !self.sources.contains(destination) && destination.exists() {
                collisions.push(Collision::ExistingDestination {
                    destination: destination.clone(),
                });
            }
        }

        collisions
    }

    pub fn entries(&self) -> &[PlannedRename] {
        &self.entries
    }

    pub fn sources(&self) -> &HashSet<PathBuf> {
        &self.sources
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // True when the entry's destination appears in a collision
    pub fn has_conflict(&self, entry: &PlannedRename) -> bool {
        self.collisions
            .iter()
            .any(|c| c.destination() == &entry.destination)
    }

    pub fn pending(&self) -> impl Iterator<Item = &PlannedRename> {
        self.entries.iter().filter(|e| !e.is_unchanged())
    }

    // Fails unless the batch may proceed under the given overwrite policy
    pub fn check(&self, force_overwrite: bool) -> Result<(), RenameError> {
        if self.collisions.is_empty() {
            return Ok(());
        }
        if force_overwrite {
            for collision in &self.collisions {
                warn!("overwriting: {}", collision);
            }
            return Ok(());
        }
        Err(RenameError::Collision(self.collisions.clone()))
    }

    // Every directory touched by a pending rename
    fn touched_directories(&self) -> Vec<&Path> {
        let mut seen = HashSet::new();
        let mut dirs = Vec::new();
        for entry in self.pending() {
            for path in [&entry.source, &entry.destination] {
                let dir = path.parent().unwrap_or(Path::new(""));
                if seen.insert(dir) {
                    dirs.push(dir);
                }
            }
        }
        dirs
    }
}

// Validate, collect, sort and plan without touching the filesystem
pub fn plan_renames<T: TimeSource>(
    paths: &[PathBuf],
    options: &Options,
    times: &T,
) -> Result<RenamePlan, RenameError> {
    options.validate()?;

    let mut records = collect_records(paths, times)?;
    sort_records(&mut records, options.sort_key, options.reverse);
    Ok(RenamePlan::build(&records, options))
}

// Renames a batch using the platform timestamp source
pub fn rename_files(paths: &[PathBuf], options: &Options) -> Result<RenameReport, RenameError> {
    rename_files_with(paths, options, &PlatformTimes)
}

// Full pipeline: plan, collision check, access check, then commit
pub fn rename_files_with<T: TimeSource>(
    paths: &[PathBuf],
    options: &Options,
    times: &T,
) -> Result<RenameReport, RenameError> {
    let plan = plan_renames(paths, options, times)?;
    if plan.is_empty() {
        debug!("nothing to rename");
        return Ok(RenameReport::default());
    }

    plan.check(options.force_overwrite)?;

    for dir in plan.touched_directories() {
        ensure_writable(dir)?;
    }

    let renamed = if options.force_overwrite {
        execute_safe(plan.entries())?
    } else {
        execute_direct(plan.entries(), plan.sources())?
    };
    let report = RenameReport {
        renamed,
        unchanged: plan.entries().len() - renamed,
    };

    info!(
        renamed = report.renamed,
        unchanged = report.unchanged,
        sort = %options.sort_key,
        "batch complete"
    );
    Ok(report)
}
