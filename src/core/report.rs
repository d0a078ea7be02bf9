// CollectLog - core/report.rs
//
// Pipe-delimited report output, mirrored to the console and the output file.
// Core layer: writes to any Write trait objects.

use crate::core::model::{MatchedEntry, SearchDepth, SearchWindow};
use crate::util::constants::{
    REPORT_COLUMNS, REPORT_DATE_FORMAT, REPORT_DELIMITER, REPORT_TIME_FORMAT,
};
use crate::util::error::ReportError;
use chrono::NaiveDateTime;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

// =============================================================================
// Report writer
// =============================================================================

/// Streams the report header and matched entries to both sinks.
///
/// Each record is serialised by the csv writer into a buffer and the same
/// bytes are then written to the console and the file. Fields are written
/// unquoted: raw log lines go out exactly as read, even when they contain
/// the `|` delimiter.
pub struct ReportWriter<C: Write, F: Write> {
    console: C,
    file: F,
    builder: csv::WriterBuilder,
    output_path: PathBuf,
    records: u64,
}

impl<C: Write, F: Write> ReportWriter<C, F> {
    /// `output_path` is used for error context and the run header only.
    pub fn new(console: C, file: F, output_path: &Path) -> Self {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(REPORT_DELIMITER)
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .flexible(true)
            .has_headers(false);
        Self {
            console,
            file,
            builder,
            output_path: output_path.to_path_buf(),
            records: 0,
        }
    }

    /// Write a line to the console only (skipped directories and files).
    ///
    /// Records are written through as they are produced, so the notice lands
    /// on the console in the order things happened.
    pub fn notice(&mut self, message: &str) -> Result<(), ReportError> {
        writeln!(self.console, "{message}")
            .and_then(|()| self.console.flush())
            .map_err(|source| self.io_error(source))
    }

    /// Write the run header and the column header line.
    pub fn write_header(
        &mut self,
        window: &SearchWindow,
        directory: &str,
        depth: SearchDepth,
    ) -> Result<(), ReportError> {
        let banner = format!(
            "Collecting Log Data [{depth}] from {} to {} within the directory '{directory}' into the file {}",
            format_timestamp(window.window_start),
            format_timestamp(window.event_time),
            self.output_path.display(),
        );
        self.write_record(&[banner.as_str()])?;
        self.write_record(REPORT_COLUMNS)
    }

    /// Write one `date|time|sourceFile|rawLine` record.
    pub fn write_entry(&mut self, entry: &MatchedEntry) -> Result<(), ReportError> {
        let date = entry.timestamp.format(REPORT_DATE_FORMAT).to_string();
        let time = entry.timestamp.format(REPORT_TIME_FORMAT).to_string();
        let source = entry.source_file.display().to_string();
        self.write_record(&[date.as_str(), time.as_str(), source.as_str(), entry.raw_line.as_str()])?;
        self.records += 1;
        Ok(())
    }

    /// Number of entries written so far.
    pub fn entries_written(&self) -> u64 {
        self.records
    }

    /// Flush both sinks and hand them back.
    pub fn finish(mut self) -> Result<(C, F), ReportError> {
        self.console
            .flush()
            .and_then(|()| self.file.flush())
            .map_err(|source| self.io_error(source))?;
        Ok((self.console, self.file))
    }

    fn write_record(&mut self, fields: &[&str]) -> Result<(), ReportError> {
        let bytes = self.serialise(fields)?;
        self.console
            .write_all(&bytes)
            .and_then(|()| self.file.write_all(&bytes))
            .map_err(|source| self.io_error(source))
    }

    fn serialise(&self, fields: &[&str]) -> Result<Vec<u8>, ReportError> {
        let mut writer = self.builder.from_writer(Vec::new());
        writer.write_record(fields).map_err(|source| ReportError::Csv {
            path: self.output_path.clone(),
            source,
        })?;
        writer
            .into_inner()
            .map_err(|e| self.io_error(io::Error::new(e.error().kind(), e.error().to_string())))
    }

    fn io_error(&self, source: io::Error) -> ReportError {
        ReportError::Io {
            path: self.output_path.clone(),
            source,
        }
    }
}

/// `yyyy-MM-dd|HH:mm:ss`, the timestamp form used throughout the report.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    format!(
        "{}|{}",
        ts.format(REPORT_DATE_FORMAT),
        ts.format(REPORT_TIME_FORMAT)
    )
}
