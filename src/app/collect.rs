// CollectLog - app/collect.rs
//
// Collection driver: window → discovery → per-file scan → report.
//
// Runs synchronously on the caller's thread. Output is streamed: each
// matched line is written as soon as it is read, in discovery order and then
// line order, with no cross-file sorting.
//
// Error policy:
//   - Window and single-directory discovery failures are returned as errors.
//   - A skipped directory in a `;` list, a file that cannot be opened even
//     through a bypass copy, and a read failure part-way through a file are
//     reported on the console and the run continues.
//   - Report write failures are returned as errors.
//
// The report file is created only once discovery has succeeded, so a run
// that fails before scanning leaves no empty report behind.

use crate::app::options::CollectRequest;
use crate::core::discovery;
use crate::core::matcher::{LineMatch, LineMatcher};
use crate::core::model::{CandidateFile, CollectSummary};
use crate::core::report::ReportWriter;
use crate::core::scanner::{FileScan, ScanItem};
use crate::core::window;
use crate::platform::fs::{self, LogOpener};
use crate::util::error::{CollectError, ReportError};
use std::io::{self, Write};
use std::path::Path;

/// Run one collection, writing the report to `console` and to the file
/// returned by `create_output`.
///
/// `create_output` is called after discovery, and only if discovery
/// succeeded. `opener` is used for every log file; pass
/// `platform::fs::StdOpener` for normal operation.
pub fn run_collection<O, C, F, M>(
    request: &CollectRequest,
    opener: &O,
    console: C,
    create_output: M,
) -> Result<CollectSummary, CollectError>
where
    O: LogOpener + ?Sized,
    C: Write,
    F: Write,
    M: FnOnce() -> io::Result<F>,
{
    let matcher = LineMatcher::new(window::build_window(
        request.event_time,
        &request.time_window,
    )?);
    let search_window = matcher.window();

    let found = discovery::discover(&request.directory, &request.patterns)?;
    for warning in &found.warnings {
        tracing::warn!(warning = %warning, "Discovery warning");
    }

    let files = exclude_output_file(found.files, &request.output);

    let mut summary = CollectSummary {
        directories_skipped: found.skipped_directories.len(),
        files_discovered: files.len(),
        ..Default::default()
    };

    let file = create_output().map_err(|source| ReportError::Io {
        path: request.output.clone(),
        source,
    })?;
    let mut report = ReportWriter::new(console, file, &request.output);
    for skipped in &found.skipped_directories {
        report.notice(&format!("Unable to search {}", skipped.path().display()))?;
    }
    report.write_header(search_window, &request.directory, request.depth)?;

    tracing::info!(
        files = files.len(),
        start = %search_window.window_start,
        event = %search_window.event_time,
        "Scanning candidate files"
    );

    for candidate in &files {
        scan_file(candidate, opener, &request.bypass_suffix, &matcher, &mut report, &mut summary)?;
    }

    summary.entries_matched = report.entries_written();
    report.finish()?;

    tracing::info!(
        files_scanned = summary.files_scanned,
        files_skipped = summary.files_skipped,
        bypass_copies = summary.bypass_copies,
        lines_read = summary.lines_read,
        entries = summary.entries_matched,
        malformed = summary.malformed_lines,
        "Collection complete"
    );

    Ok(summary)
}

/// Scan one candidate file into the report.
///
/// The opened file, and any bypass copy behind it, lives only for the
/// duration of this call.
fn scan_file<O, C, F>(
    candidate: &CandidateFile,
    opener: &O,
    bypass_suffix: &str,
    matcher: &LineMatcher,
    report: &mut ReportWriter<C, F>,
    summary: &mut CollectSummary,
) -> Result<(), ReportError>
where
    O: LogOpener + ?Sized,
    C: Write,
    F: Write,
{
    let mut opened = match fs::open_for_scan(opener, &candidate.path, bypass_suffix) {
        Ok(opened) => opened,
        Err(e) => {
            tracing::warn!(file = %candidate.path.display(), error = %e, "File skipped");
            summary.files_skipped += 1;
            return report.notice(&e.to_string());
        }
    };

    if opened.via_bypass() {
        summary.bypass_copies += 1;
    }
    tracing::debug!(
        file = %candidate.path.display(),
        copy = ?opened.bypass_path(),
        "Scanning file"
    );

    let mut scan = FileScan::new(&mut opened.reader, &candidate.path, matcher);
    let mut failed = false;
    for item in scan.by_ref() {
        match item {
            Ok(ScanItem::Matched(entry)) => report.write_entry(&entry)?,
            Ok(ScanItem::Skipped {
                reason: LineMatch::Malformed,
                ..
            }) => summary.malformed_lines += 1,
            Ok(ScanItem::Skipped { .. }) => {}
            Err(e) => {
                tracing::warn!(file = %candidate.path.display(), error = %e, "Scan aborted");
                report.notice(&e.to_string())?;
                failed = true;
            }
        }
    }

    summary.lines_read += scan.lines_read();
    if failed {
        summary.files_skipped += 1;
    } else {
        summary.files_scanned += 1;
    }

    tracing::debug!(
        file = %candidate.path.display(),
        lines = scan.lines_read(),
        "File scanned"
    );
    Ok(())
}

/// Drop the report file itself from the candidate list, so a deep search of
/// the output directory does not read back its own report.
fn exclude_output_file(files: Vec<CandidateFile>, output: &Path) -> Vec<CandidateFile> {
    let Ok(output) = std::fs::canonicalize(output) else {
        return files;
    };
    files
        .into_iter()
        .filter(|f| {
            let same = std::fs::canonicalize(&f.path).is_ok_and(|p| p == output);
            if same {
                tracing::debug!(file = %f.path.display(), "Output file excluded from scan");
            }
            !same
        })
        .collect()
}
