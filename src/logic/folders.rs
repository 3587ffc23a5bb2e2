// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Discover exercise folders directly below a root directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::{PackError, PackResult};
use crate::models::exercise::{ExerciseFolder, Selection};

/// Exercise number captured by group 1 of `pattern`, if `name` matches.
pub fn exercise_number(pattern: &Regex, name: &str) -> Option<u32> {
    let captures = pattern.captures(name)?;
    let raw = captures.get(1)?.as_str();
    match raw.parse::<u32>() {
        Ok(number) => Some(number),
        Err(err) => {
            tracing::warn!(folder = name, capture = raw, "skipping folder: {err}");
            None
        }
    }
}

/// List subdirectories of `root` matching `pattern`, ascending by exercise number.
///
/// `numbers` keeps only the listed exercises; `newest` keeps only the highest
/// remaining one. An empty result is not an error.
///
/// # Errors
///
/// Returns [`PackError::PathNotFound`] when `root` is not a directory and
/// [`PackError::Io`] when it cannot be listed.
pub fn find_exercise_folders(
    root: &Path,
    pattern: &Regex,
    numbers: Option<&BTreeSet<u32>>,
    newest: bool,
) -> PackResult<Vec<ExerciseFolder>> {
    if !root.is_dir() {
        return Err(PackError::PathNotFound(root.to_path_buf()));
    }

    let mut folders = Vec::new();
    for entry in fs::read_dir(root).map_err(|err| PackError::io(root, err))? {
        let entry = entry.map_err(|err| PackError::io(root, err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(number) = exercise_number(pattern, &name) else {
            continue;
        };
        if numbers.is_some_and(|wanted| !wanted.contains(&number)) {
            tracing::debug!(folder = %name, number, "not among requested exercises");
            continue;
        }
        folders.push(ExerciseFolder::new(path, name, number));
    }

    folders.sort();
    if newest && let Some(last) = folders.pop() {
        folders = vec![last];
    }

    tracing::debug!(root = %root.display(), found = folders.len(), "exercise folders");
    Ok(folders)
}

/// Resolve a [`Selection`] to the matching folders.
///
/// # Errors
///
/// Same as [`find_exercise_folders`].
pub fn select_folders(
    root: &Path,
    pattern: &Regex,
    selection: &Selection,
) -> PackResult<Vec<ExerciseFolder>> {
    match selection {
        Selection::Numbers(numbers) => find_exercise_folders(root, pattern, Some(numbers), false),
        Selection::All => find_exercise_folders(root, pattern, None, false),
        Selection::Newest => find_exercise_folders(root, pattern, None, true),
    }
}
