// CollectLog - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Per-line outcomes are not errors (see core::matcher::LineMatch); only
// configuration, directory, file, and output failures are modelled here.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all CollectLog operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum CollectError {
    /// Configuration could not be resolved. Fatal before scanning starts.
    Config(ConfigError),

    /// A directory could not be searched.
    Discovery(DiscoveryError),

    /// The report could not be written.
    Report(ReportError),
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Report(e) => write!(f, "Report error: {e}"),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Discovery(e) => Some(e),
            Self::Report(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors raised while resolving the run configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// `--eventDate` / `--eventTime` do not form a valid date and time.
    InvalidEventDateTime {
        date: String,
        time: String,
        source: chrono::ParseError,
    },

    /// The time window is not of the form `<integer>[<unit>]`.
    InvalidTimeWindow { value: String, reason: String },

    /// `--searchDepth` is neither `shallow` nor `deep`.
    InvalidSearchDepth { value: String },

    /// Subtracting the window from the event time leaves the calendar range.
    WindowOutOfRange { value: String },

    /// config.toml could not be parsed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// config.toml could not be read.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEventDateTime { date, time, source } => write!(
                f,
                "event date '{date}' and time '{time}' are not a valid timestamp \
                 (expected yyyy-mm-dd and HH:mm:ss): {source}"
            ),
            Self::InvalidTimeWindow { value, reason } => write!(
                f,
                "time window '{value}' is invalid: {reason}. Expected e.g. '30[m]' or '4[h]'"
            ),
            Self::InvalidSearchDepth { value } => write!(
                f,
                "search depth '{value}' is not recognised. Expected 'shallow' or 'deep'"
            ),
            Self::WindowOutOfRange { value } => write!(
                f,
                "time window '{value}' reaches before the earliest representable date"
            ),
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidEventDateTime { source, .. } => Some(source),
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for CollectError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to candidate file discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The directory does not exist or cannot be listed.
    DirectoryUnreadable { path: PathBuf, source: io::Error },

    /// The path exists but is not a directory.
    NotADirectory { path: PathBuf },
}

impl DiscoveryError {
    /// The directory the error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::DirectoryUnreadable { path, .. } | Self::NotADirectory { path } => path,
        }
    }
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryUnreadable { path, source } => {
                write!(f, "Unable to search '{}': {source}", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Unable to search '{}': not a directory", path.display())
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DirectoryUnreadable { source, .. } => Some(source),
            Self::NotADirectory { .. } => None,
        }
    }
}

impl From<DiscoveryError> for CollectError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Scan errors
// ---------------------------------------------------------------------------

/// Errors related to scanning a single log file.
///
/// These never abort a run: the driver reports them on the console and moves
/// on to the next file.
#[derive(Debug)]
pub enum ScanError {
    /// The file could not be opened directly, and its bypass copy was
    /// created but could not be opened either.
    Unopenable {
        path: PathBuf,
        copy: PathBuf,
        source: io::Error,
    },

    /// The file could not be opened directly and the bypass copy could not
    /// be created.
    BypassCopy {
        path: PathBuf,
        copy: PathBuf,
        source: io::Error,
    },

    /// Reading failed part-way through the file.
    Read {
        path: PathBuf,
        line_number: u64,
        source: io::Error,
    },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unopenable { path, copy, source } => write!(
                f,
                "Unable to open '{}' or its copy '{}': {source}",
                path.display(),
                copy.display()
            ),
            Self::BypassCopy { path, copy, source } => write!(
                f,
                "Unable to open '{}' or copy it to '{}': {source}",
                path.display(),
                copy.display()
            ),
            Self::Read {
                path,
                line_number,
                source,
            } => write!(
                f,
                "Read failed in '{}' after line {line_number}: {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unopenable { source, .. } => Some(source),
            Self::BypassCopy { source, .. } => Some(source),
            Self::Read { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

/// Errors writing the report to the console and the output file.
#[derive(Debug)]
pub enum ReportError {
    /// I/O error on the output sink.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Report I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "Report write error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
        }
    }
}

impl From<ReportError> for CollectError {
    fn from(e: ReportError) -> Self {
        Self::Report(e)
    }
}
