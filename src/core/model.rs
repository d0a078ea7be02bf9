// CollectLog - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
// These types are the shared vocabulary across all layers.

use chrono::NaiveDateTime;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// =============================================================================
// Search window
// =============================================================================

/// Inclusive interval `[window_start, event_time]` that log lines are
/// matched against. Built once per run by `core::window` and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    /// The incident time; upper bound of the window.
    pub event_time: NaiveDateTime,

    /// Lower bound of the window. Always `<= event_time`.
    pub window_start: NaiveDateTime,

    /// Number of date anchors looked for on each line: 1 for a zero-width
    /// window, 2 otherwise.
    pub anchor_count: u8,
}

impl SearchWindow {
    /// Whether `ts` lies inside the window (both bounds inclusive).
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts >= self.window_start && ts <= self.event_time
    }
}

// =============================================================================
// Search depth
// =============================================================================

/// How many files in a directory are considered candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDepth {
    /// Only the fixed shallow pattern set.
    #[default]
    Shallow,
    /// Every file in the directory.
    Deep,
}

impl SearchDepth {
    /// Lowercase name as used on the command line and in report headers.
    pub fn label(&self) -> &'static str {
        match self {
            SearchDepth::Shallow => "shallow",
            SearchDepth::Deep => "deep",
        }
    }
}

impl fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SearchDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shallow" => Ok(SearchDepth::Shallow),
            "deep" => Ok(SearchDepth::Deep),
            _ => Err(s.to_string()),
        }
    }
}

// =============================================================================
// Discovery and scan output
// =============================================================================

/// A file selected for scanning. The path is the directory joined with the
/// file name, exactly as reported in the `SourceFile` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
}

/// A log line whose embedded timestamp falls inside the search window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedEntry {
    /// Timestamp parsed out of the line.
    pub timestamp: NaiveDateTime,

    /// Path of the candidate file the line came from (never the bypass copy).
    pub source_file: PathBuf,

    /// The line exactly as read, without its terminator.
    pub raw_line: String,
}

/// Per-run counters returned by the collection driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectSummary {
    /// Directories in a `;` list that could not be searched.
    pub directories_skipped: usize,
    /// Candidate files produced by discovery.
    pub files_discovered: usize,
    /// Files whose scan ran to completion.
    pub files_scanned: usize,
    /// Files that could not be opened or whose read failed part-way.
    pub files_skipped: usize,
    /// Files that were read through a bypass copy.
    pub bypass_copies: usize,
    /// Lines read across all files.
    pub lines_read: u64,
    /// Lines written to the report.
    pub entries_matched: u64,
    /// Lines with a date anchor whose timestamp span did not parse.
    pub malformed_lines: u64,
}
