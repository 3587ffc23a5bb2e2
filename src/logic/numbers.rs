// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Extract matriculation numbers from the names of previously built archives.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use walkdir::WalkDir;

use crate::error::{PackError, PackResult};

/// Scan `root` recursively for `*.<extension>` files and collect capture group 1
/// of `pattern` from each file name.
///
/// Files are visited in file-name order. With `all` every capture is returned
/// in discovery order; otherwise repeats are dropped, keeping the first.
/// A matching name whose group did not participate yields an empty string.
/// Symbolic links are followed.
///
/// # Errors
///
/// Returns [`PackError::PathNotFound`] when `root` does not exist and
/// [`PackError::Io`] when a directory cannot be read.
pub fn extract_numbers(
    root: &Path,
    pattern: &Regex,
    extension: &str,
    all: bool,
) -> PackResult<Vec<String>> {
    if !root.exists() {
        return Err(PackError::PathNotFound(root.to_path_buf()));
    }

    let mut values = Vec::new();
    let mut seen = HashSet::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(root).to_path_buf();
            PackError::io(path, err.into())
        })?;
        if !entry.file_type().is_file() || !has_extension(entry.path(), extension) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        let Some(captures) = pattern.captures(&name) else {
            tracing::debug!(file = %name, "archive name does not match pattern");
            continue;
        };
        let value = captures
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        if all || seen.insert(value.clone()) {
            values.push(value);
        }
    }

    tracing::debug!(root = %root.display(), count = values.len(), all, "extracted identifiers");
    Ok(values)
}

/// The single distinct identifier under `root`, if there is exactly one.
///
/// # Errors
///
/// Returns [`PackError::Config`] when no identifier or more than one distinct
/// identifier is found, plus any error from [`extract_numbers`].
pub fn sole_number(root: &Path, pattern: &Regex, extension: &str) -> PackResult<String> {
    let mut values = extract_numbers(root, pattern, extension, false)?;
    values.retain(|v| !v.is_empty());
    match values.len() {
        1 => Ok(values.remove(0)),
        0 => Err(PackError::Config(format!(
            "no matriculation number found in archives under {}",
            root.display()
        ))),
        _ => Err(PackError::Config(format!(
            "ambiguous matriculation number under {}: {}",
            root.display(),
            values.join(", ")
        ))),
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use regex::Regex;
    use tempfile::TempDir;

    use super::{extract_numbers, sole_number};
    use crate::error::PackError;

    fn pattern() -> Regex {
        Regex::new(r"^(\d+)_\d+\.zip$").unwrap()
    }

    fn touch(dir: &std::path::Path, rel: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    /// Archives spread over nested exercise folders; file-name order gives
    /// a_ < b_ < c_ directories.
    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a_exercise/solution/4711_01.zip");
        touch(tmp.path(), "b_exercise/solution/1234_02.zip");
        touch(tmp.path(), "c_exercise/solution/4711_03.ZIP");
        touch(tmp.path(), "c_exercise/solution/4711_03.txt");
        touch(tmp.path(), "c_exercise/solution/notes.zip");
        tmp
    }

    #[test]
    fn deduplicates_in_first_seen_order() {
        let tmp = fixture();
        let values = extract_numbers(tmp.path(), &pattern(), "zip", false).unwrap();

        assert_eq!(values, ["4711", "1234"]);
    }

    // Uppercase extensions still count, but the pattern itself is case-sensitive.
    #[test]
    fn all_keeps_repeats_in_discovery_order() {
        let tmp = fixture();
        let loose = Regex::new(r"(?i)^(\d+)_\d+\.zip$").unwrap();
        let values = extract_numbers(tmp.path(), &loose, "zip", true).unwrap();

        assert_eq!(values, ["4711", "1234", "4711"]);
    }

    #[test]
    fn optional_group_yields_empty_string() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "solution_01.zip");
        let p = Regex::new(r"^(\d+)?_?solution_\d+\.zip$").unwrap();

        let values = extract_numbers(tmp.path(), &p, "zip", true).unwrap();
        assert_eq!(values, [""]);
    }

    #[test]
    #[cfg(unix)]
    fn symlinked_archives_are_counted() {
        let tmp = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        touch(elsewhere.path(), "4711_01.zip");
        std::os::unix::fs::symlink(
            elsewhere.path().join("4711_01.zip"),
            tmp.path().join("4711_01.zip"),
        )
        .unwrap();

        let values = extract_numbers(tmp.path(), &pattern(), "zip", false).unwrap();
        assert_eq!(values, ["4711"]);
    }

    #[test]
    fn missing_root_is_path_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = extract_numbers(&tmp.path().join("nope"), &pattern(), "zip", false).unwrap_err();

        assert!(matches!(err, PackError::PathNotFound(_)));
    }

    #[test]
    fn sole_number_requires_exactly_one_value() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "x/4711_01.zip");
        touch(tmp.path(), "y/4711_02.zip");
        assert_eq!(sole_number(tmp.path(), &pattern(), "zip").unwrap(), "4711");

        touch(tmp.path(), "z/1234_03.zip");
        assert!(matches!(
            sole_number(tmp.path(), &pattern(), "zip"),
            Err(PackError::Config(_))
        ));

        let empty = TempDir::new().unwrap();
        assert!(matches!(
            sole_number(empty.path(), &pattern(), "zip"),
            Err(PackError::Config(_))
        ));
    }
}
