// CollectLog - core/matcher.rs
//
// Per-line timestamp extraction and window test.
//
// A line is located by its date anchors: the `yyyy-mm-dd` text of the event
// date and, for a non-zero window, of the window-start date. The 19
// characters starting at the chosen anchor are normalised to
// `yyyy-mm-ddTHH:mm:ss` and parsed.
//
// Anchor offsets follow a "0 means not found" convention: a date at the very
// start of a line is never used as an anchor. Lines whose timestamp is the
// first thing on the line therefore never match.

use crate::core::model::SearchWindow;
use crate::util::constants::{
    ANCHOR_DATE_FORMAT, DATE_TIME_SEPARATOR_POS, EMBEDDED_TIMESTAMP_FORMAT, TIMESTAMP_SPAN,
};
use chrono::NaiveDateTime;

/// Outcome of testing one line against the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMatch {
    /// The embedded timestamp is inside the window.
    Matched(NaiveDateTime),
    /// The embedded timestamp parsed but lies outside the window.
    OutsideWindow(NaiveDateTime),
    /// An anchor was found but the span after it is not a timestamp.
    Malformed,
    /// Neither anchor occurs past the start of the line.
    NoAnchor,
}

/// Precomputed anchor strings for one search window.
#[derive(Debug, Clone)]
pub struct LineMatcher {
    window: SearchWindow,
    event_anchor: String,
    start_anchor: Option<String>,
}

impl LineMatcher {
    pub fn new(window: SearchWindow) -> Self {
        let event_anchor = window.event_time.format(ANCHOR_DATE_FORMAT).to_string();
        let start_anchor = (window.anchor_count == 2)
            .then(|| window.window_start.format(ANCHOR_DATE_FORMAT).to_string());
        Self {
            window,
            event_anchor,
            start_anchor,
        }
    }

    pub fn window(&self) -> &SearchWindow {
        &self.window
    }

    /// Classify a single line.
    ///
    /// The window-start anchor takes priority when present; the event anchor
    /// is used only when the window-start date does not occur on the line.
    /// If the prioritised anchor's span fails to parse, the line is
    /// malformed even if the other anchor would have parsed.
    pub fn match_line(&self, line: &str) -> LineMatch {
        let event_offset = anchor_offset(line, &self.event_anchor);
        let start_offset = self
            .start_anchor
            .as_deref()
            .and_then(|anchor| anchor_offset(line, anchor));

        let Some(offset) = start_offset.or(event_offset) else {
            return LineMatch::NoAnchor;
        };

        match extract_timestamp(line, offset) {
            Some(ts) if self.window.contains(ts) => LineMatch::Matched(ts),
            Some(ts) => LineMatch::OutsideWindow(ts),
            None => LineMatch::Malformed,
        }
    }
}

/// Byte offset of the first occurrence of `anchor` in `line`, treating an
/// occurrence at offset 0 as absent.
pub fn anchor_offset(line: &str, anchor: &str) -> Option<usize> {
    line.find(anchor).filter(|&offset| offset > 0)
}

/// Parse the timestamp span that starts at `offset`.
///
/// Returns `None` when the line is too short, the span does not fall on
/// character boundaries, or the normalised span is not a valid timestamp.
pub fn extract_timestamp(line: &str, offset: usize) -> Option<NaiveDateTime> {
    let span = line.get(offset..offset + TIMESTAMP_SPAN)?;
    let normalised = normalise_separator(span)?;
    NaiveDateTime::parse_from_str(&normalised, EMBEDDED_TIMESTAMP_FORMAT).ok()
}

/// Replace the date/time separator with `T`, turning `yyyy-mm-dd;HH:mm:ss`
/// or `yyyy-mm-dd HH:mm:ss` into `yyyy-mm-ddTHH:mm:ss`.
///
/// The guard compares everything after the separator with `";"`. For a
/// 19-character span that tail is 8 characters long, so the replacement
/// always happens.
fn normalise_separator(span: &str) -> Option<String> {
    let date = span.get(..DATE_TIME_SEPARATOR_POS)?;
    let time = span.get(DATE_TIME_SEPARATOR_POS + 1..)?;
    if time == ";" {
        return Some(span.to_string());
    }
    let mut normalised = String::with_capacity(span.len());
    normalised.push_str(date);
    normalised.push('T');
    normalised.push_str(time);
    Some(normalised)
}
