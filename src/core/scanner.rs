// CollectLog - core/scanner.rs
//
// Lazy line-by-line scan of one log file.
// Core layer: accepts any BufRead, never opens files itself. Opening (and the
// bypass-copy fallback) is owned by platform::fs.

use crate::core::matcher::{LineMatch, LineMatcher};
use crate::core::model::MatchedEntry;
use crate::util::error::ScanError;
use crate::util::logging::preview;
use std::io::BufRead;
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One step of a file scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanItem {
    /// The line's timestamp lies inside the window.
    Matched(MatchedEntry),
    /// The line was read and skipped for the given reason.
    Skipped { line_number: u64, reason: LineMatch },
}

/// Forward-only iterator over the lines of one file.
///
/// Yields one `ScanItem` per line. A read failure is yielded once as
/// `Err(ScanError::Read)` and ends the iteration.
#[derive(Debug)]
pub struct FileScan<'m, R> {
    reader: R,
    source_file: PathBuf,
    matcher: &'m LineMatcher,
    buf: Vec<u8>,
    line_number: u64,
    finished: bool,
}

impl<'m, R: BufRead> FileScan<'m, R> {
    /// Scan `reader`, attributing matches to `source_file`.
    pub fn new(reader: R, source_file: &Path, matcher: &'m LineMatcher) -> Self {
        Self {
            reader,
            source_file: source_file.to_path_buf(),
            matcher,
            buf: Vec::new(),
            line_number: 0,
            finished: false,
        }
    }

    /// Number of lines read so far.
    pub fn lines_read(&self) -> u64 {
        self.line_number
    }

    /// Read the next line, lossily decoded, without its terminator or a
    /// leading byte-order mark.
    fn read_line(&mut self) -> Option<Result<String, ScanError>> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                if self.line_number == 0 && self.buf.starts_with(UTF8_BOM) {
                    self.buf.drain(..UTF8_BOM.len());
                }
                self.line_number += 1;
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(source) => Some(Err(ScanError::Read {
                path: self.source_file.clone(),
                line_number: self.line_number,
                source,
            })),
        }
    }
}

impl<R: BufRead> Iterator for FileScan<'_, R> {
    type Item = Result<ScanItem, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let line = match self.read_line() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                self.finished = true;
                return Some(Err(e));
            }
            None => {
                self.finished = true;
                return None;
            }
        };

        let item = match self.matcher.match_line(&line) {
            LineMatch::Matched(timestamp) => ScanItem::Matched(MatchedEntry {
                timestamp,
                source_file: self.source_file.clone(),
                raw_line: line,
            }),
            reason => {
                if reason == LineMatch::Malformed {
                    tracing::trace!(
                        file = %self.source_file.display(),
                        line_number = self.line_number,
                        line = preview(&line),
                        "Malformed timestamp, line skipped"
                    );
                }
                ScanItem::Skipped {
                    line_number: self.line_number,
                    reason,
                }
            }
        };
        Some(Ok(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::SearchWindow;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::io::{self, BufReader, Cursor, Read};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .unwrap()
    }

    fn matcher() -> LineMatcher {
        LineMatcher::new(SearchWindow {
            event_time: at(12, 0, 0),
            window_start: at(11, 0, 0),
            anchor_count: 2,
        })
    }

    fn entries<R: BufRead>(scan: FileScan<'_, R>) -> Vec<Result<MatchedEntry, ScanError>> {
        scan.filter_map(|item| match item {
            Ok(ScanItem::Matched(entry)) => Some(Ok(entry)),
            Ok(ScanItem::Skipped { .. }) => None,
            Err(e) => Some(Err(e)),
        })
        .collect()
    }

    const SAMPLE: &str = "boot banner\r\n\
                          <1>2020-01-01;10:59:59;early\r\n\
                          <1>2020-01-01;11:00:00;first\r\n\
                          <1>2020-01-01;1x:00:00;broken\n\
                          <1>2020-01-01;11:45:10;second\n\
                          <1>2020-01-01;12:00:01;late";

    #[test]
    fn test_entries_in_line_order() {
        let m = matcher();
        let scan = FileScan::new(Cursor::new(SAMPLE), Path::new("logs/messages.p1"), &m);
        let entries: Vec<MatchedEntry> = entries(scan).into_iter().map(|r| r.unwrap()).collect();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].timestamp, at(11, 0, 0));
        assert_eq!(entries[0].raw_line, "<1>2020-01-01;11:00:00;first");
        assert_eq!(entries[0].source_file, PathBuf::from("logs/messages.p1"));
        assert_eq!(entries[1].raw_line, "<1>2020-01-01;11:45:10;second");
    }

    #[test]
    fn test_malformed_line_does_not_stop_scan() {
        let m = matcher();
        let items: Vec<ScanItem> = FileScan::new(Cursor::new(SAMPLE), Path::new("f"), &m)
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(items.len(), 6);
        assert_eq!(
            items[3],
            ScanItem::Skipped {
                line_number: 4,
                reason: LineMatch::Malformed
            }
        );
        assert!(matches!(items[4], ScanItem::Matched(_)));
    }

    #[test]
    fn test_invalid_utf8_decoded_lossily() {
        let m = matcher();
        let mut bytes = b"\xff\xfe 2020-01-01 11:30:00 ".to_vec();
        bytes.extend_from_slice(b"tail\n");
        let entries = entries(FileScan::new(Cursor::new(bytes), Path::new("f"), &m));
        assert_eq!(entries.len(), 1);
        let entry = entries[0].as_ref().unwrap();
        assert_eq!(entry.timestamp, at(11, 30, 0));
        assert!(entry.raw_line.ends_with("tail"));
    }

    #[test]
    fn test_leading_bom_stripped_from_first_line() {
        let m = matcher();
        let text = "\u{feff}2020-01-01 11:30:00 first line\n\u{feff}x 2020-01-01 11:31:00 second\n";
        let found = entries(FileScan::new(Cursor::new(text), Path::new("f"), &m));
        // With the mark removed the first line's date sits at offset 0 and
        // is not an anchor; a mark on a later line is ordinary text.
        assert_eq!(found.len(), 1);
        let entry = found[0].as_ref().unwrap();
        assert_eq!(entry.timestamp, at(11, 31, 0));
        assert_eq!(entry.raw_line, "\u{feff}x 2020-01-01 11:31:00 second");
    }

    #[test]
    fn test_bom_not_kept_in_raw_line() {
        let m = matcher();
        let text = "\u{feff}x 2020-01-01 11:30:00 first line\n";
        let found = entries(FileScan::new(Cursor::new(text), Path::new("f"), &m));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].as_ref().unwrap().raw_line, "x 2020-01-01 11:30:00 first line");
    }

    struct FailAfter {
        inner: Cursor<&'static str>,
        remaining: usize,
    }

    impl Read for FailAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "device gone"));
            }
            let len = self.remaining.min(buf.len());
            let n = self.inner.read(&mut buf[..len])?;
            self.remaining -= n;
            Ok(n)
        }
    }

    #[test]
    fn test_read_error_ends_scan() {
        let m = matcher();
        let reader = BufReader::new(FailAfter {
            inner: Cursor::new("x 2020-01-01 11:00:00 ok\nx 2020-01-01 11:00:01 lost\n"),
            remaining: 25,
        });
        let mut scan = FileScan::new(reader, Path::new("f"), &m);

        assert!(matches!(scan.next(), Some(Ok(ScanItem::Matched(_)))));
        assert!(matches!(
            scan.next(),
            Some(Err(ScanError::Read { line_number: 1, .. }))
        ));
        assert!(scan.next().is_none());
        assert_eq!(scan.lines_read(), 1);
    }
}
