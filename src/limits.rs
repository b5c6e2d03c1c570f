// Defaults, input limits and process exit codes

// Built-in option defaults
pub const DEFAULT_PATTERN: &str = "000000";
pub const DEFAULT_INITIAL_INDEX: i64 = 1;

// Input limits
pub const MAX_PATTERN_LENGTH: usize = 255;
pub const MAX_AFFIX_LENGTH: usize = 255;
pub const MAX_REGEX_SIZE: usize = 1024 * 1024;

// Marker embedded in staging names during a forced rename
pub const TEMP_MARKER: &str = "renby.tmp";

// Settings store
pub const SETTINGS_ENV: &str = "RENBY_SETTINGS";
pub const SETTINGS_DIR: &str = "renby";
pub const SETTINGS_FILE: &str = "settings.db";

// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
