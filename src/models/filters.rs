// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Include/exclude file filters and their disjointness check.

use std::collections::HashSet;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{PackError, PackResult};

/// Normalize a filter entry to a file-name glob.
///
/// A bare extension such as `.java` becomes `*.java`; everything else is
/// taken as a glob verbatim.
pub fn normalize_filter(entry: &str) -> String {
    let entry = entry.trim();
    if entry.starts_with('.') && !entry.contains(['*', '?', '[', '{']) {
        format!("*{entry}")
    } else {
        entry.to_string()
    }
}

/// Ensure no normalized entry appears in both lists.
pub fn assert_disjoint(include: &[String], exclude: &[String]) -> PackResult<()> {
    let included: HashSet<String> = include.iter().map(|e| normalize_filter(e)).collect();
    for entry in exclude {
        let normalized = normalize_filter(entry);
        if included.contains(&normalized) {
            return Err(PackError::FilterConflict(entry.trim().to_string()));
        }
    }
    Ok(())
}

/// Compiled include/exclude globs applied to file names.
#[derive(Clone, Debug)]
pub struct FileFilter {
    include: Option<GlobSet>,
    exclude: GlobSet,
}

impl FileFilter {
    /// Compile both lists after checking they are disjoint.
    ///
    /// An empty include list admits every file.
    pub fn new(include: &[String], exclude: &[String]) -> PackResult<Self> {
        assert_disjoint(include, exclude)?;
        let include = if include.iter().all(|e| e.trim().is_empty()) {
            None
        } else {
            Some(build_set(include)?)
        };
        Ok(Self {
            include,
            exclude: build_set(exclude)?,
        })
    }

    /// Whether the file at `path` should be packed.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let included = self.include.as_ref().is_none_or(|set| set.is_match(name));
        included && !self.exclude.is_match(name)
    }
}

fn build_set(entries: &[String]) -> PackResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for entry in entries.iter().filter(|e| !e.trim().is_empty()) {
        let pattern = normalize_filter(entry);
        let glob = Glob::new(&pattern).map_err(|source| PackError::InvalidFilter {
            filter: entry.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| PackError::InvalidFilter {
        filter: entries.join(","),
        source,
    })
}
