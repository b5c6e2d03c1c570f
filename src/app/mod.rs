// Application driver: resolves options, runs the engine and reports results

use crate::cli::{build_filter, expand_inputs, Commands, ConfigAction, ConfigArgs, RenameArgs};
use crate::limits::{DEFAULT_INITIAL_INDEX, DEFAULT_PATTERN};
use crate::ostime::PlatformTimes;
use crate::rename::{plan_renames, rename_files, RenamePlan};
use crate::settings::{load_settings, reset_settings, save_setting, settings_path, SettingKey, Settings};
use crate::types::{Options, SortKey};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

pub struct Renby {
    settings_path: Option<PathBuf>,
}

impl Renby {
    pub fn new() -> Self {
        Self {
            settings_path: settings_path(),
        }
    }

    pub fn with_settings_path(path: Option<PathBuf>) -> Self {
        Self {
            settings_path: path,
        }
    }

    // Dispatches one parsed command, writing user-facing output to `out`
    pub fn run(&self, command: Commands, out: &mut impl Write) -> Result<()> {
        match command {
            Commands::Ctime(args) => self.run_rename(SortKey::CreationTime, args, out),
            Commands::Mtime(args) => self.run_rename(SortKey::ModificationTime, args, out),
            Commands::Atime(args) => self.run_rename(SortKey::AccessTime, args, out),
            Commands::Size(args) => self.run_rename(SortKey::Size, args, out),
            Commands::Config(args) => self.run_config(args, out),
        }
    }

    // Flag values win over stored settings, which win over built-in defaults
    pub fn resolve_options(&self, sort_key: SortKey, args: &RenameArgs) -> Options {
        let stored = load_settings(self.settings_path.as_deref());
        for (key, value) in stored_overrides(args, &stored) {
            info!("using stored {} = {}", key, value);
        }
        merge_options(sort_key, args, stored)
    }

    fn run_rename(&self, sort_key: SortKey, args: RenameArgs, out: &mut impl Write) -> Result<()> {
        let options = self.resolve_options(sort_key, &args);
        let filter = args.matching.as_deref().map(build_filter).transpose()?;
        let files = expand_inputs(&args.patterns, filter.as_ref())?;

        if args.dry_run {
            let plan = plan_renames(&files, &options, &PlatformTimes)?;
            print_plan(&plan, out)?;
            plan.check(options.force_overwrite)?;
            return Ok(());
        }

        let report = rename_files(&files, &options)?;
        info!(
            "Renamed {} file(s), {} already in place",
            report.renamed, report.unchanged
        );
        Ok(())
    }

    fn run_config(&self, args: ConfigArgs, out: &mut impl Write) -> Result<()> {
        let path = self
            .settings_path
            .as_deref()
            .context("No settings location available on this system")?;

        match args.action {
            ConfigAction::Show => {
                let settings = load_settings(Some(path));
                print_settings(&settings, out)?;
            }
            ConfigAction::Set { key, value } => {
                save_setting(path, key.into(), &value)?;
                info!("saved {} to {}", SettingKey::from(key), path.display());
            }
            ConfigAction::Reset => {
                reset_settings(path)?;
                info!("cleared settings at {}", path.display());
            }
        }
        Ok(())
    }
}

impl Default for Renby {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_options(sort_key: SortKey, args: &RenameArgs, stored: Settings) -> Options {
    Options {
        sort_key,
        reverse: args.reverse,
        pattern: args
            .pattern
            .clone()
            .or(stored.pattern)
            .unwrap_or_else(|| DEFAULT_PATTERN.to_string()),
        initial_index: args
            .init
            .or(stored.initial_index)
            .unwrap_or(DEFAULT_INITIAL_INDEX),
        prefix: args.pre.clone().or(stored.prefix).unwrap_or_default(),
        suffix: args.post.clone().or(stored.suffix).unwrap_or_default(),
        force_overwrite: args.force,
    }
}

// Stored values that will replace a built-in default because no flag was given
fn stored_overrides(args: &RenameArgs, stored: &Settings) -> Vec<(SettingKey, String)> {
    let mut used = Vec::new();
    if let (None, Some(pattern)) = (&args.pattern, &stored.pattern) {
        used.push((SettingKey::Pattern, format!("{:?}", pattern)));
    }
    if let (None, Some(prefix)) = (&args.pre, &stored.prefix) {
        used.push((SettingKey::Prefix, format!("{:?}", prefix)));
    }
    if let (None, Some(suffix)) = (&args.post, &stored.suffix) {
        used.push((SettingKey::Suffix, format!("{:?}", suffix)));
    }
    if let (None, Some(init)) = (args.init, stored.initial_index) {
        used.push((SettingKey::Init, init.to_string()));
    }
    used
}

fn print_plan(plan: &RenamePlan, out: &mut impl Write) -> Result<()> {
    for entry in plan.entries() {
        let marker = if entry.is_unchanged() {
            " (unchanged)"
        } else if plan.has_conflict(entry) {
            " [conflict]"
        } else {
            ""
        };
        writeln!(
            out,
            "{} -> {}{}",
            entry.source.display(),
            entry.destination.display(),
            marker
        )?;
    }
    Ok(())
}

fn print_settings(settings: &Settings, out: &mut impl Write) -> Result<()> {
    for key in SettingKey::ALL {
        match settings.get(key) {
            Some(value) => writeln!(out, "{} = {:?}", key, value)?,
            None => writeln!(out, "{} (unset)", key)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(patterns: &[String]) -> RenameArgs {
        RenameArgs {
            patterns: patterns.to_vec(),
            ..RenameArgs::default()
        }
    }

    #[test]
    fn flags_override_stored_settings() {
        let stored = Settings {
            pattern: Some("xx".into()),
            prefix: Some("img".into()),
            suffix: None,
            initial_index: Some(5),
        };
        let mut rename = args(&[]);
        rename.pattern = Some("0000".into());
        rename.post = Some("_v".into());

        let options = merge_options(SortKey::Size, &rename, stored);
        assert_eq!(options.pattern, "0000");
        assert_eq!(options.prefix, "img");
        assert_eq!(options.suffix, "_v");
        assert_eq!(options.initial_index, 5);
        assert_eq!(options.sort_key, SortKey::Size);
    }

    #[test]
    fn reports_only_stored_values_without_flags() {
        let stored = Settings {
            pattern: Some("xx".into()),
            prefix: Some("img".into()),
            suffix: None,
            initial_index: Some(5),
        };
        let mut rename = args(&[]);
        rename.pattern = Some("0000".into());

        let used = stored_overrides(&rename, &stored);
        assert_eq!(
            used,
            vec![
                (SettingKey::Prefix, "\"img\"".to_string()),
                (SettingKey::Init, "5".to_string()),
            ]
        );
        assert!(stored_overrides(&rename, &Settings::default()).is_empty());
    }

    #[test]
    fn defaults_fill_the_gaps() {
        let options = merge_options(SortKey::AccessTime, &args(&[]), Settings::default());
        assert_eq!(options.pattern, DEFAULT_PATTERN);
        assert_eq!(options.initial_index, DEFAULT_INITIAL_INDEX);
        assert!(options.prefix.is_empty());
        assert!(!options.force_overwrite);
    }

    #[test]
    fn dry_run_prints_without_renaming() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"aa").unwrap();
        fs::write(dir.path().join("b.txt"), b"b").unwrap();
        let app = Renby::with_settings_path(None);

        let mut rename = args(&[format!("{}/*.txt", dir.path().display())]);
        rename.pattern = Some("00".into());
        rename.dry_run = true;

        let mut out = Vec::new();
        app.run(Commands::Size(rename), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("b.txt -> "));
        assert!(lines[0].ends_with("01.txt"));
        assert!(lines[1].ends_with("02.txt"));
        assert!(dir.path().join("a.txt").exists());
        assert!(dir.path().join("b.txt").exists());
    }

    #[test]
    fn config_round_trip_through_commands() {
        let dir = TempDir::new().unwrap();
        let app = Renby::with_settings_path(Some(dir.path().join("settings.db")));
        let set = |key, value: &str| {
            Commands::Config(ConfigArgs {
                action: ConfigAction::Set {
                    key,
                    value: value.to_string(),
                },
            })
        };

        let mut sink = Vec::new();
        app.run(set(crate::cli::ConfigKey::Pattern, "xxx"), &mut sink)
            .unwrap();
        let mut out = Vec::new();
        app.run(
            Commands::Config(ConfigArgs {
                action: ConfigAction::Show,
            }),
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("pattern = \"xxx\""));
        assert!(text.contains("pre (unset)"));
    }
}
