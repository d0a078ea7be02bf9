// CollectLog - platform/fs.rs
//
// Opening log files for scanning, including the bypass-copy fallback for
// files that cannot be opened directly (typically an exclusive lock held by
// the writing process).
//
// The copy is owned by a drop guard, so it is removed on every exit path of
// the scan that used it: normal end of file, a read error, or an early return.

use crate::util::error::ScanError;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Opens log files for reading. Abstracted so tests can simulate locks and
/// failing devices.
pub trait LogOpener {
    type Reader: Read;

    fn open(&self, path: &Path) -> io::Result<Self::Reader>;
}

/// Opens files with `std::fs::File::open`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdOpener;

impl LogOpener for StdOpener {
    type Reader = File;

    fn open(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }
}

/// A temporary sibling copy of a log file. Deleted on drop.
#[derive(Debug)]
pub struct BypassCopy {
    path: PathBuf,
}

impl BypassCopy {
    /// Copy `original` to `<original><suffix>` and take ownership of the copy.
    pub fn create(original: &Path, suffix: &str) -> io::Result<Self> {
        let path = bypass_path(original, suffix);
        std::fs::copy(original, &path)?;
        tracing::debug!(
            original = %original.display(),
            copy = %path.display(),
            "Bypass copy created"
        );
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BypassCopy {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(copy = %self.path.display(), "Bypass copy removed"),
            Err(e) => tracing::warn!(
                copy = %self.path.display(),
                error = %e,
                "Failed to remove bypass copy"
            ),
        }
    }
}

/// Path of the bypass copy for `original`: the same name with `suffix` appended.
pub fn bypass_path(original: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(original.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// A log file opened for scanning.
#[derive(Debug)]
pub struct OpenedLog<R> {
    // Field order matters: the reader is dropped (file closed) before the
    // bypass copy is deleted.
    pub reader: BufReader<R>,
    bypass: Option<BypassCopy>,
}

impl<R> OpenedLog<R> {
    /// Whether the file is being read through a bypass copy.
    pub fn via_bypass(&self) -> bool {
        self.bypass.is_some()
    }

    /// Path of the bypass copy being read, if any.
    pub fn bypass_path(&self) -> Option<&Path> {
        self.bypass.as_ref().map(BypassCopy::path)
    }
}

/// Open `path` for scanning.
///
/// When `opener` cannot open the file, a bypass copy `<path><suffix>` is
/// created and opened instead. There is no further retry: if the copy
/// cannot be created (`ScanError::BypassCopy`) or opened
/// (`ScanError::Unopenable`), no copy is left behind.
pub fn open_for_scan<O: LogOpener + ?Sized>(
    opener: &O,
    path: &Path,
    suffix: &str,
) -> Result<OpenedLog<O::Reader>, ScanError> {
    let direct_err = match opener.open(path) {
        Ok(file) => {
            return Ok(OpenedLog {
                reader: BufReader::new(file),
                bypass: None,
            })
        }
        Err(e) => e,
    };

    tracing::debug!(
        file = %path.display(),
        error = %direct_err,
        "Direct open failed, trying bypass copy"
    );

    let bypass = BypassCopy::create(path, suffix).map_err(|source| ScanError::BypassCopy {
        path: path.to_path_buf(),
        copy: bypass_path(path, suffix),
        source,
    })?;
    // If this open fails, `bypass` is dropped on return and the copy removed.
    let file = opener
        .open(bypass.path())
        .map_err(|source| ScanError::Unopenable {
            path: path.to_path_buf(),
            copy: bypass.path().to_path_buf(),
            source,
        })?;

    Ok(OpenedLog {
        reader: BufReader::new(file),
        bypass: Some(bypass),
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::LockingOpener;
    use super::*;
    use std::io::BufRead;

    #[test]
    fn test_direct_open_has_no_bypass() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.p1");
        std::fs::write(&path, "line\n").unwrap();

        let opened = open_for_scan(&StdOpener, &path, ".roCopy").unwrap();
        assert!(!opened.via_bypass());
        assert!(opened.bypass_path().is_none());
    }

    #[test]
    fn test_locked_file_read_through_copy_then_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TBT_locked");
        std::fs::write(&path, "first\nsecond\n").unwrap();
        let opener = LockingOpener {
            locked: vec![path.clone()],
            ..Default::default()
        };

        let copy = bypass_path(&path, ".roCopy");
        {
            let opened = open_for_scan(&opener, &path, ".roCopy").unwrap();
            assert!(opened.via_bypass());
            assert_eq!(opened.bypass_path(), Some(copy.as_path()));
            assert!(copy.exists());
            let lines: Vec<String> = opened.reader.lines().map(|l| l.unwrap()).collect();
            assert_eq!(lines, vec!["first", "second"]);
        }
        assert!(!copy.exists(), "bypass copy must be removed after the scan");
        assert!(path.exists(), "original must be untouched");
    }

    #[test]
    fn test_copy_removed_when_scan_abandoned_early() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TBT_locked");
        std::fs::write(&path, "first\nsecond\n").unwrap();
        let opener = LockingOpener {
            locked: vec![path.clone()],
            ..Default::default()
        };

        let copy = bypass_path(&path, ".roCopy");
        let result: Result<(), String> = (|| {
            let opened = open_for_scan(&opener, &path, ".roCopy").map_err(|e| e.to_string())?;
            let mut lines = opened.reader.lines();
            let _ = lines.next();
            Err("stopped mid-scan".to_string())
        })();
        assert!(result.is_err());
        assert!(!copy.exists());
    }

    #[test]
    fn test_copy_unopenable_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TBT_locked");
        std::fs::write(&path, "data\n").unwrap();
        let copy = bypass_path(&path, ".roCopy");
        let opener = LockingOpener {
            locked: vec![path.clone(), copy.clone()],
            ..Default::default()
        };

        let result = open_for_scan(&opener, &path, ".roCopy");
        assert!(matches!(result, Err(ScanError::Unopenable { .. })));
        assert!(!copy.exists());
        assert_eq!(opener.opens.get(), 2);
    }

    #[test]
    fn test_missing_file_cannot_be_copied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vanished");
        let result = open_for_scan(&StdOpener, &path, ".roCopy");
        assert!(matches!(result, Err(ScanError::BypassCopy { .. })));
        assert!(!bypass_path(&path, ".roCopy").exists());
    }

    #[test]
    fn test_bypass_path_appends_suffix() {
        assert_eq!(
            bypass_path(Path::new("logs/messages.p1"), ".roCopy"),
            PathBuf::from("logs/messages.p1.roCopy")
        );
    }
}
