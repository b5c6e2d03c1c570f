// Settings persistence using SQLite

use crate::limits::{MAX_AFFIX_LENGTH, MAX_PATTERN_LENGTH, SETTINGS_DIR, SETTINGS_ENV, SETTINGS_FILE};
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Result as SqlResult};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Stored defaults applied when a flag is not given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub pattern: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub initial_index: Option<i64>,
}

/// Keys accepted by `renby config set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Pattern,
    Prefix,
    Suffix,
    Init,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        SettingKey::Pattern,
        SettingKey::Prefix,
        SettingKey::Suffix,
        SettingKey::Init,
    ];

    fn column(self) -> &'static str {
        match self {
            SettingKey::Pattern => "pattern",
            SettingKey::Prefix => "pre",
            SettingKey::Suffix => "post",
            SettingKey::Init => "init",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl Settings {
    // Drops or trims values that could not have been saved by this tool
    pub fn sanitize(&mut self) {
        if self.pattern.as_deref() == Some("") {
            self.pattern = None;
        }
        if let Some(pattern) = &mut self.pattern {
            if pattern.chars().count() > MAX_PATTERN_LENGTH {
                *pattern = pattern.chars().take(MAX_PATTERN_LENGTH).collect();
            }
        }
        for affix in [&mut self.prefix, &mut self.suffix].into_iter().flatten() {
            if affix.len() > MAX_AFFIX_LENGTH {
                *affix = truncate_bytes(affix, MAX_AFFIX_LENGTH);
            }
        }
        if matches!(self.initial_index, Some(n) if n < 0) {
            self.initial_index = None;
        }
    }

    pub fn get(&self, key: SettingKey) -> Option<String> {
        match key {
            SettingKey::Pattern => self.pattern.clone(),
            SettingKey::Prefix => self.prefix.clone(),
            SettingKey::Suffix => self.suffix.clone(),
            SettingKey::Init => self.initial_index.map(|n| n.to_string()),
        }
    }
}

// Cuts at a char boundary no later than `max` bytes
fn truncate_bytes(text: &str, max: usize) -> String {
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

// Returns path to settings database, honoring the environment override
pub fn settings_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(SETTINGS_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::data_local_dir().map(|p| p.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

// Initializes database and creates tables if needed
fn init_db(conn: &Connection) -> SqlResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

fn open(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create: {}", parent.display()))?;
        }
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open settings: {}", path.display()))?;
    init_db(&conn).context("Failed to initialize settings table")?;
    Ok(conn)
}

// Loads settings, falling back to defaults when the store is unusable
pub fn load_settings(path: Option<&Path>) -> Settings {
    let Some(path) = path else {
        return Settings::default();
    };
    if !path.exists() {
        return Settings::default();
    }

    match read_settings(path) {
        Ok(mut settings) => {
            settings.sanitize();
            settings
        }
        Err(e) => {
            warn!("ignoring settings at {}: {:#}", path.display(), e);
            Settings::default()
        }
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    let conn = open(path)?;
    let mut settings = Settings::default();

    settings.pattern = get_setting(&conn, SettingKey::Pattern)?;
    settings.prefix = get_setting(&conn, SettingKey::Prefix)?;
    settings.suffix = get_setting(&conn, SettingKey::Suffix)?;
    settings.initial_index = get_setting(&conn, SettingKey::Init)?.and_then(|v| v.parse().ok());

    Ok(settings)
}

// Stores one value after checking it the same way the command line would
pub fn save_setting(path: &Path, key: SettingKey, value: &str) -> Result<()> {
    match key {
        SettingKey::Pattern => {
            if value.is_empty() || value.chars().count() > MAX_PATTERN_LENGTH {
                anyhow::bail!("Pattern must be 1 to {} chars", MAX_PATTERN_LENGTH);
            }
        }
        SettingKey::Prefix | SettingKey::Suffix => {
            if value.len() > MAX_AFFIX_LENGTH {
                anyhow::bail!("Value too long (max {} bytes)", MAX_AFFIX_LENGTH);
            }
        }
        SettingKey::Init => {
            let n: i64 = value
                .parse()
                .with_context(|| format!("Invalid init value: {}", value))?;
            if n < 0 {
                anyhow::bail!("Init value must be non-negative");
            }
        }
    }

    let conn = open(path)?;
    set_setting(&conn, key, value).with_context(|| format!("Failed to save {}", key))?;
    Ok(())
}

// Removes every stored value
pub fn reset_settings(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let conn = open(path)?;
    conn.execute("DELETE FROM settings", [])
        .context("Failed to clear settings")?;
    Ok(())
}

fn get_setting(conn: &Connection, key: SettingKey) -> SqlResult<Option<String>> {
    conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        [key.column()],
        |row| row.get(0),
    )
    .optional()
}

fn set_setting(conn: &Connection, key: SettingKey, value: &str) -> SqlResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
        [key.column(), value],
    )?;
    Ok(())
}
