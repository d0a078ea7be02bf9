// CollectLog - core/discovery.rs
//
// Candidate file discovery: one directory at a time, non-recursive, with the
// run's pattern set applied to each file name.
//
// Architecture note: this module uses `walkdir` as an OS abstraction for
// listing a directory. It reads only directory entries, never file
// contents; that boundary is owned by the app layer (app::collect).
//
// Error policy:
//   - A directory that cannot be listed is a `DiscoveryError`; the caller
//     decides whether that is fatal (`discover` tolerates it inside a `;` list).
//   - Individual entries that cannot be inspected are skipped with a warning.
//   - Output order is pattern order, then file-name order within a pattern.
//     A file matching two patterns is listed twice.

use crate::core::model::CandidateFile;
use crate::core::pattern;
use crate::util::constants::LIST_SEPARATOR;
use crate::util::error::DiscoveryError;
use std::path::{Path, PathBuf};

/// Result of discovery over a full directory specifier.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Candidate files in discovery order.
    pub files: Vec<CandidateFile>,

    /// Directories of a `;` list that were skipped, in specifier order.
    pub skipped_directories: Vec<DiscoveryError>,

    /// Non-fatal per-entry problems (unreadable entries, bad patterns).
    pub warnings: Vec<String>,
}

// =============================================================================
// Multi-directory aggregation
// =============================================================================

/// Build the full candidate list for a directory specifier and pattern set.
///
/// A specifier containing `;` is split and each directory searched in turn;
/// a directory that cannot be listed is recorded in `skipped_directories` and
/// the remaining directories are still searched. A specifier without `;` is
/// a single directory and its failure is returned as `Err`.
pub fn discover(directory_spec: &str, pattern_set: &str) -> Result<Discovery, DiscoveryError> {
    let patterns = pattern::resolve_patterns(pattern_set);
    let mut discovery = Discovery::default();

    if !directory_spec.contains(LIST_SEPARATOR) {
        let (files, warnings) = collect_files(Path::new(directory_spec), &patterns)?;
        discovery.files = files;
        discovery.warnings = warnings;
        return Ok(discovery);
    }

    for dir in pattern::split_directories(directory_spec) {
        match collect_files(Path::new(&dir), &patterns) {
            Ok((files, warnings)) => {
                discovery.files.extend(files);
                discovery.warnings.extend(warnings);
            }
            Err(e) => {
                tracing::warn!(directory = %dir, error = %e, "Directory skipped");
                discovery.skipped_directories.push(e);
            }
        }
    }

    tracing::debug!(
        directories = directory_spec,
        files = discovery.files.len(),
        skipped = discovery.skipped_directories.len(),
        "Discovery complete"
    );

    Ok(discovery)
}

// =============================================================================
// Single directory
// =============================================================================

/// List the files directly inside `dir` that match any of `patterns`.
///
/// Returns the matches (pattern order, then file-name order) and any
/// non-fatal warnings. Fails only when `dir` itself cannot be listed.
pub fn collect_files(
    dir: &Path,
    patterns: &[String],
) -> Result<(Vec<CandidateFile>, Vec<String>), DiscoveryError> {
    // fs::metadata rather than Path::is_dir so PermissionDenied is kept
    // distinct from NotFound in the error source.
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(DiscoveryError::NotADirectory {
                path: dir.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(DiscoveryError::DirectoryUnreadable {
                path: dir.to_path_buf(),
                source,
            })
        }
    }

    let mut warnings: Vec<String> = Vec::new();
    let listing = list_directory(dir, &mut warnings)?;

    let mut files: Vec<CandidateFile> = Vec::new();
    for raw in patterns {
        let compiled = match glob::Pattern::new(raw) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(pattern = %raw, error = %e, "Invalid glob pattern matches nothing");
                continue;
            }
        };
        files.extend(
            listing
                .iter()
                .filter(|(name, _)| compiled.matches(name))
                .map(|(_, path)| CandidateFile { path: path.clone() }),
        );
    }

    tracing::debug!(
        directory = %dir.display(),
        entries = listing.len(),
        matched = files.len(),
        "Directory searched"
    );

    Ok((files, warnings))
}

/// Read the file entries of `dir` (no subdirectories), sorted by name.
fn list_directory(
    dir: &Path,
    warnings: &mut Vec<String>,
) -> Result<Vec<(String, PathBuf)>, DiscoveryError> {
    let walker = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut listing = Vec::new();
    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                // An error at depth 0 means the directory itself could not be
                // opened (e.g. permission to stat but not to list).
                if e.depth() == 0 {
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory loop"));
                    return Err(DiscoveryError::DirectoryUnreadable {
                        path: dir.to_path_buf(),
                        source,
                    });
                }
                let path_str = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let msg = format!("Cannot access '{path_str}': {e}");
                tracing::debug!(warning = %msg, "Discovery warning");
                warnings.push(msg);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        listing.push((name, entry.into_path()));
    }
    Ok(listing)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_temp_dir() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        fs::write(root.join("messages.p1"), "2020-01-01 line\n").expect("write messages.p1");
        fs::write(root.join("messages.p0"), "2020-01-01 line\n").expect("write messages.p0");
        fs::write(root.join("TBT_trace.log"), "2020-01-01 line\n").expect("write TBT");
        fs::write(root.join("other.log"), "2020-01-01 line\n").expect("write other.log");

        let sub = root.join("nested");
        fs::create_dir(&sub).expect("mkdir nested");
        fs::write(sub.join("messages.p9"), "deeper\n").expect("write nested");
        dir
    }

    fn names(files: &[CandidateFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_string())
            .collect()
    }

    fn patterns(set: &str) -> Vec<String> {
        pattern::resolve_patterns(set)
    }

    #[test]
    fn test_shallow_patterns_in_pattern_then_name_order() {
        let dir = make_temp_dir();
        let (files, warnings) =
            collect_files(dir.path(), &patterns("messages.p*;TBT*")).unwrap();
        assert_eq!(names(&files), vec!["messages.p0", "messages.p1", "TBT_trace.log"]);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn test_paths_are_directory_joined() {
        let dir = make_temp_dir();
        let (files, _) = collect_files(dir.path(), &patterns("TBT*")).unwrap();
        assert_eq!(files[0].path, dir.path().join("TBT_trace.log"));
    }

    #[test]
    fn test_deep_matches_all_files_but_not_subdirectories() {
        let dir = make_temp_dir();
        let (files, _) = collect_files(dir.path(), &patterns("*")).unwrap();
        let found = names(&files);
        assert_eq!(found.len(), 4, "got {found:?}");
        assert!(!found.contains(&"nested".to_string()));
        assert!(!found.contains(&"messages.p9".to_string()));
    }

    #[test]
    fn test_file_matching_two_patterns_listed_twice() {
        let dir = make_temp_dir();
        let (files, _) = collect_files(dir.path(), &patterns("messages.p1;*.p1")).unwrap();
        assert_eq!(names(&files), vec!["messages.p1", "messages.p1"]);
    }

    #[test]
    fn test_invalid_pattern_matches_nothing() {
        let dir = make_temp_dir();
        let (files, _) = collect_files(dir.path(), &patterns("[;TBT*")).unwrap();
        assert_eq!(names(&files), vec!["TBT_trace.log"]);
    }

    #[test]
    fn test_missing_directory_is_unreadable() {
        let result = collect_files(Path::new("/nonexistent/path/collectlog"), &patterns("*"));
        assert!(matches!(
            result,
            Err(DiscoveryError::DirectoryUnreadable { .. })
        ));
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let dir = make_temp_dir();
        let result = collect_files(&dir.path().join("other.log"), &patterns("*"));
        assert!(matches!(result, Err(DiscoveryError::NotADirectory { .. })));
    }

    #[test]
    fn test_multi_directory_skips_unreadable() {
        let dir = make_temp_dir();
        let spec = format!("/nonexistent/collectlog;{}", dir.path().display());
        let discovery = discover(&spec, "TBT*").unwrap();
        assert_eq!(names(&discovery.files), vec!["TBT_trace.log"]);
        assert_eq!(discovery.skipped_directories.len(), 1);
        assert_eq!(
            discovery.skipped_directories[0].path(),
            &PathBuf::from("/nonexistent/collectlog")
        );
    }

    #[test]
    fn test_multi_directory_preserves_specifier_order() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        fs::write(a.path().join("TBT_a"), "").unwrap();
        fs::write(b.path().join("TBT_b"), "").unwrap();

        let spec = format!("{};{}", b.path().display(), a.path().display());
        let discovery = discover(&spec, "TBT*").unwrap();
        assert_eq!(names(&discovery.files), vec!["TBT_b", "TBT_a"]);
    }

    #[test]
    fn test_single_unreadable_directory_is_error() {
        let result = discover("/nonexistent/collectlog", "*");
        assert!(matches!(
            result,
            Err(DiscoveryError::DirectoryUnreadable { .. })
        ));
    }
}
