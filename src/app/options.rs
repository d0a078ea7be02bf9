// CollectLog - app/options.rs
//
// Resolution of raw option values into a validated run request.
//
// Precedence for each optional value: command line > config.toml > built-in
// constant (the last two are already merged into `AppConfig`). Every failure
// here is a ConfigError and aborts the run before any scanning starts.

use crate::core::model::SearchDepth;
use crate::core::window;
use crate::platform::config::AppConfig;
use crate::util::constants::{
    EVENT_DATE_FORMAT, EVENT_TIME_FORMAT, OUTPUT_FILENAME_EXTENSION, OUTPUT_FILENAME_PREFIX,
    WINDOW_UNIT_CLOSE, WINDOW_UNIT_OPEN,
};
use crate::util::error::ConfigError;
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Option values exactly as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
    pub event_date: String,
    pub event_time: String,
    pub directory: Option<String>,
    pub time_window: Option<String>,
    pub output_filename: Option<String>,
    pub search_depth: Option<String>,
}

/// Fully resolved configuration for one collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectRequest {
    /// Combined event date and time.
    pub event_time: NaiveDateTime,
    /// Directory specifier, possibly a `;` list.
    pub directory: String,
    /// Window specification, already validated.
    pub time_window: String,
    pub depth: SearchDepth,
    /// Pattern set selected by `depth`.
    pub patterns: String,
    /// Report file path.
    pub output: PathBuf,
    /// Suffix for bypass copies of locked files.
    pub bypass_suffix: String,
}

/// Validate `raw` and fill in defaults from `config`.
pub fn resolve(raw: &RawOptions, config: &AppConfig) -> Result<CollectRequest, ConfigError> {
    let event_time = parse_event_time(&raw.event_date, &raw.event_time)?;

    let time_window = raw
        .time_window
        .clone()
        .unwrap_or_else(|| config.time_window.clone());
    window::parse_time_window(&time_window)?;

    let depth = match raw.search_depth.as_deref() {
        Some(value) => value
            .parse::<SearchDepth>()
            .map_err(|value| ConfigError::InvalidSearchDepth { value })?,
        None => SearchDepth::default(),
    };

    let patterns = match depth {
        SearchDepth::Shallow => config.shallow_patterns.clone(),
        SearchDepth::Deep => config.deep_patterns.clone(),
    };

    let output = raw.output_filename.clone().unwrap_or_else(|| {
        default_output_filename(&raw.event_date, &raw.event_time, &time_window, depth)
    });

    let request = CollectRequest {
        event_time,
        directory: raw
            .directory
            .clone()
            .unwrap_or_else(|| config.directory.clone()),
        time_window,
        depth,
        patterns,
        output: PathBuf::from(output),
        bypass_suffix: config.bypass_suffix.clone(),
    };

    tracing::debug!(request = ?request, "Options resolved");
    Ok(request)
}

/// Combine `yyyy-mm-dd` and `HH:mm:ss` into one timestamp.
pub fn parse_event_time(date: &str, time: &str) -> Result<NaiveDateTime, ConfigError> {
    let format = format!("{EVENT_DATE_FORMAT}T{EVENT_TIME_FORMAT}");
    NaiveDateTime::parse_from_str(&format!("{}T{}", date.trim(), time.trim()), &format).map_err(
        |source| ConfigError::InvalidEventDateTime {
            date: date.to_string(),
            time: time.to_string(),
            source,
        },
    )
}

/// `CLD_<yyyymmdd>T<HHmmss>_<window>_<depth>.csv`, with the separators of
/// the date, time, and window removed: `CLD_20201231T112233_1h_shallow.csv`.
pub fn default_output_filename(
    date: &str,
    time: &str,
    time_window: &str,
    depth: SearchDepth,
) -> String {
    let window: String = time_window
        .chars()
        .filter(|c| *c != WINDOW_UNIT_OPEN && *c != WINDOW_UNIT_CLOSE)
        .collect();
    format!(
        "{OUTPUT_FILENAME_PREFIX}{}T{}_{window}_{depth}.{OUTPUT_FILENAME_EXTENSION}",
        date.replace('-', ""),
        time.replace(':', ""),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants;
    use chrono::NaiveDate;

    fn raw(date: &str, time: &str) -> RawOptions {
        RawOptions {
            event_date: date.to_string(),
            event_time: time.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let request = resolve(&raw("2020-12-31", "11:22:33"), &AppConfig::default()).unwrap();
        assert_eq!(
            request.event_time,
            NaiveDate::from_ymd_opt(2020, 12, 31)
                .and_then(|d| d.and_hms_opt(11, 22, 33))
                .unwrap()
        );
        assert_eq!(request.directory, ".");
        assert_eq!(request.time_window, "1[h]");
        assert_eq!(request.depth, SearchDepth::Shallow);
        assert_eq!(request.patterns, constants::SHALLOW_PATTERNS);
        assert_eq!(request.bypass_suffix, ".roCopy");
        assert_eq!(
            request.output,
            PathBuf::from("CLD_20201231T112233_1h_shallow.csv")
        );
    }

    #[test]
    fn test_deep_search_uses_all_files() {
        let mut options = raw("2019-08-12", "09:05:44");
        options.search_depth = Some("deep".to_string());
        options.time_window = Some("30[m]".to_string());
        let request = resolve(&options, &AppConfig::default()).unwrap();
        assert_eq!(request.patterns, "*");
        assert_eq!(
            request.output,
            PathBuf::from("CLD_20190812T090544_30m_deep.csv")
        );
    }

    #[test]
    fn test_command_line_overrides_config() {
        let config = AppConfig {
            directory: "/var/log".to_string(),
            time_window: "2[h]".to_string(),
            ..Default::default()
        };
        let mut options = raw("2019-11-04", "03:33:21");
        assert_eq!(resolve(&options, &config).unwrap().directory, "/var/log");

        options.directory = Some(".;./dirA;./dirB".to_string());
        options.output_filename = Some("incident.out".to_string());
        let request = resolve(&options, &config).unwrap();
        assert_eq!(request.directory, ".;./dirA;./dirB");
        assert_eq!(request.time_window, "2[h]");
        assert_eq!(request.output, PathBuf::from("incident.out"));
    }

    #[test]
    fn test_invalid_event_date_time() {
        for (date, time) in [("2020-13-01", "10:00:00"), ("2020-01-01", "10:00"), ("", "")] {
            assert!(
                matches!(
                    resolve(&raw(date, time), &AppConfig::default()),
                    Err(ConfigError::InvalidEventDateTime { .. })
                ),
                "expected rejection of {date:?} {time:?}"
            );
        }
    }

    #[test]
    fn test_invalid_window_and_depth() {
        let mut options = raw("2020-01-01", "12:00:00");
        options.time_window = Some("one hour".to_string());
        assert!(matches!(
            resolve(&options, &AppConfig::default()),
            Err(ConfigError::InvalidTimeWindow { .. })
        ));

        options.time_window = None;
        options.search_depth = Some("medium".to_string());
        assert!(matches!(
            resolve(&options, &AppConfig::default()),
            Err(ConfigError::InvalidSearchDepth { .. })
        ));
    }
}
