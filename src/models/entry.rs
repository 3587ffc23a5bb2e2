// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Archive entries and per-run build results.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::PackError;
use crate::models::exercise::ExerciseFolder;

/// One file to store: read from `base_dir/entry_path`, stored as `entry_path`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub base_dir: PathBuf,
    pub entry_path: PathBuf,
}

impl ArchiveEntry {
    /// Place `file` relative to `solution_dir` when it lives beneath it,
    /// otherwise under its own parent with its bare file name.
    pub fn for_file(file: &Path, solution_dir: &Path) -> Self {
        if let Ok(relative) = file.strip_prefix(solution_dir)
            && !relative.as_os_str().is_empty()
        {
            return Self {
                base_dir: solution_dir.to_path_buf(),
                entry_path: relative.to_path_buf(),
            };
        }
        let base_dir = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entry_path = file
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| file.to_path_buf());
        Self {
            base_dir,
            entry_path,
        }
    }

    /// Absolute location of the source file.
    pub fn source(&self) -> PathBuf {
        self.base_dir.join(&self.entry_path)
    }

    /// Name inside the archive, always `/`-separated.
    pub fn archive_name(&self) -> String {
        self.entry_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Everything needed to build one archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchivePlan {
    pub folder: ExerciseFolder,
    pub output: PathBuf,
    pub entries: Vec<ArchiveEntry>,
}

/// A finished archive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BuiltArchive {
    pub folder: ExerciseFolder,
    pub output: PathBuf,
    pub entries: usize,
    pub sha256: String,
}

/// A folder that could not be packed when the batch kept going.
#[derive(Debug, Serialize)]
pub struct FolderFailure {
    pub folder: ExerciseFolder,
    #[serde(serialize_with = "display")]
    pub error: PackError,
}

fn display<S: serde::Serializer>(error: &PackError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of a pack run.
#[derive(Debug, Default, Serialize)]
pub struct BuildReport {
    pub built: Vec<BuiltArchive>,
    pub failures: Vec<FolderFailure>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
