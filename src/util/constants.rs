// CollectLog - util/constants.rs
//
// Single source of truth for all named constants, formats, and defaults.
// Values here are plain data; the config layer may override the ones marked
// as configurable before they reach the core.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "CollectLog";

/// Application identifier used for config directories.
pub const APP_ID: &str = "CollectLog";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Collection defaults (configurable via config.toml)
// =============================================================================

/// Directory searched when `--directory` is not given.
pub const DEFAULT_DIRECTORY: &str = ".";

/// Time window applied when `--timeWindow` is not given (one hour back).
pub const DEFAULT_TIME_WINDOW: &str = "1[h]";

/// Pattern set used by a shallow search.
pub const SHALLOW_PATTERNS: &str = "messages.p*;TBT*";

/// Pattern set used by a deep search.
pub const DEEP_PATTERNS: &str = "*";

/// Suffix appended to a locked file's name to form its bypass copy.
pub const BYPASS_COPY_SUFFIX: &str = ".roCopy";

// =============================================================================
// Separators
// =============================================================================

/// Separator between entries of a directory specifier or pattern set.
pub const LIST_SEPARATOR: char = ';';

/// Opens the unit part of a time window, e.g. the `[` in `30[m]`.
pub const WINDOW_UNIT_OPEN: char = '[';

/// Closes the unit part of a time window.
pub const WINDOW_UNIT_CLOSE: char = ']';

// =============================================================================
// Timestamp extraction
// =============================================================================

/// Number of characters taken from an anchor offset: `yyyy-mm-ddTHH:mm:ss`.
pub const TIMESTAMP_SPAN: usize = 19;

/// Position of the separator between the date and the time inside the span.
pub const DATE_TIME_SEPARATOR_POS: usize = 10;

/// Date-only format used to build anchors (`yyyy-mm-dd`).
pub const ANCHOR_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format the normalised 19-character span is parsed with.
pub const EMBEDDED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format accepted for `--eventDate`.
pub const EVENT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format accepted for `--eventTime`.
pub const EVENT_TIME_FORMAT: &str = "%H:%M:%S";

// =============================================================================
// Report output
// =============================================================================

/// Field delimiter of the report.
pub const REPORT_DELIMITER: u8 = b'|';

/// Date part of a report timestamp.
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Time part of a report timestamp.
pub const REPORT_TIME_FORMAT: &str = "%H:%M:%S";

/// Column header line written after the run header.
pub const REPORT_COLUMNS: &[&str] = &["Date", "Time", "SourceFile", "LogMessage"];

/// Prefix of a generated output filename.
pub const OUTPUT_FILENAME_PREFIX: &str = "CLD_";

/// Extension of a generated output filename.
pub const OUTPUT_FILENAME_EXTENSION: &str = "csv";

// =============================================================================
// Logging
// =============================================================================

/// Default log level. Kept quiet because stdout carries the report mirror.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Maximum length of a log line included in trace output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
