//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Read file contents with standardized error handling.
///
/// Wraps `fs::read_to_string`, so content that is not valid UTF-8 is an
/// error rather than being replaced.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Write content to file with standardized error handling.
///
/// Wraps `fs::write` with consistent `Error::internal_io` formatting.
pub fn write_file(path: &Path, content: &str, operation: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Write content to file atomically (write to .tmp, then rename).
///
/// Readers see either the old content or the new content, never a partial write.
pub fn write_file_atomic(path: &Path, content: &str, operation: &str) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let filename = path.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let tmp_path = parent.join(format!("{}.tmp", filename.to_string_lossy()));

    fs::write(&tmp_path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("{} (write temp)", operation))))?;

    fs::rename(&tmp_path, path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("{} (rename)", operation))))?;

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Replacement {
    pub from: String,
    pub to: String,
    pub occurrences: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchSummary {
    pub path: String,
    pub replacements: Vec<Replacement>,
    pub changed: bool,
}

/// Apply literal replacements to a file in order, then write it back.
///
/// Each pair replaces every occurrence of `from` in the text as it stands
/// after the previous pairs were applied.
pub fn patch_file(path: &Path, replacements: &[(String, String)]) -> Result<PatchSummary> {
    if let Some((from, _)) = replacements.iter().find(|(from, _)| from.is_empty()) {
        return Err(Error::validation_invalid_argument(
            "replace",
            "Replacement key must not be empty",
            Some(from.clone()),
            None,
        ));
    }

    let original = read_file(path, &format!("read {}", path.display()))?;
    let mut patched = original.clone();
    let mut applied = Vec::with_capacity(replacements.len());

    for (from, to) in replacements {
        let occurrences = patched.matches(from.as_str()).count();
        if occurrences > 0 {
            patched = patched.replace(from.as_str(), to);
        }
        applied.push(Replacement {
            from: from.clone(),
            to: to.clone(),
            occurrences,
        });
    }

    let changed = patched != original;
    if changed {
        write_file_atomic(path, &patched, &format!("patch {}", path.display()))?;
        log_status!("patch", "Rewrote {}", path.display());
    }

    Ok(PatchSummary {
        path: path.display().to_string(),
        replacements: applied,
        changed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "test content").unwrap();

        let content = read_file(temp.path(), "test read").unwrap();
        assert!(content.contains("test content"));
    }

    #[test]
    fn read_file_returns_error_for_missing_file() {
        let result = read_file(Path::new("/nonexistent/path.txt"), "test read");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn read_file_rejects_invalid_utf8() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(&[0xff, 0xfe, 0x00]).unwrap();

        let err = read_file(temp.path(), "test read").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert_eq!(err.details["context"], "test read");
    }

    #[test]
    fn write_file_succeeds_for_valid_path() {
        let temp = NamedTempFile::new().unwrap();
        let result = write_file(temp.path(), "new content", "test write");
        assert!(result.is_ok());

        let content = fs::read_to_string(temp.path()).unwrap();
        assert_eq!(content, "new content");
    }

    #[test]
    fn write_file_returns_error_for_invalid_path() {
        let result = write_file(
            Path::new("/nonexistent/dir/file.txt"),
            "content",
            "test write",
        );
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn write_file_atomic_replaces_content_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Build.cs");
        fs::write(&path, "old").unwrap();

        write_file_atomic(&path, "new", "test atomic").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.path().join("Build.cs.tmp").exists());
    }

    #[test]
    fn patch_file_applies_replacements_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Target.cs");
        fs::write(&path, "bUseUnity = true;\nbUseUnity = true;\nType = Game;\n").unwrap();

        let summary = patch_file(
            &path,
            &pairs(&[("true", "false"), ("Game", "Editor"), ("false", "FALSE")]),
        )
        .unwrap();

        assert!(summary.changed);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "bUseUnity = FALSE;\nbUseUnity = FALSE;\nType = Editor;\n"
        );
        let counts: Vec<usize> = summary.replacements.iter().map(|r| r.occurrences).collect();
        assert_eq!(counts, vec![2, 1, 2]);
    }

    #[test]
    fn patch_file_without_matches_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        fs::write(&path, "nothing to see").unwrap();

        let summary = patch_file(&path, &pairs(&[("absent", "present")])).unwrap();

        assert!(!summary.changed);
        assert_eq!(summary.replacements[0].occurrences, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "nothing to see");
    }

    #[test]
    fn patch_file_rejects_empty_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        fs::write(&path, "abc").unwrap();

        let err = patch_file(&path, &pairs(&[("", "x")])).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
        assert_eq!(fs::read_to_string(&path).unwrap(), "abc");
    }

    #[test]
    fn patch_file_missing_file_is_io_error() {
        let err = patch_file(Path::new("/nonexistent/file.txt"), &pairs(&[("a", "b")]))
            .unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }
}
