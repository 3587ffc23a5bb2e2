// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Build one submission archive per selected exercise folder.
//!
//! Responsibilities:
//! - Validate include/exclude filters before touching the filesystem.
//! - Collect solution files and the optional note file as archive entries.
//! - Name each archive from the matriculation number or the default label.
//! - Drive the configured [`Archiver`] once per folder.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Settings;
use crate::error::{PackError, PackResult};
use crate::logic::archiver::Archiver;
use crate::logic::folders::select_folders;
use crate::models::entry::{ArchiveEntry, ArchivePlan, BuildReport, BuiltArchive, FolderFailure};
use crate::models::exercise::{ExerciseFolder, Selection};
use crate::models::filters::FileFilter;
use crate::utils::{archive_digest, sanitize_component};

/// What to do when one folder cannot be packed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Return the first error; later folders are not processed.
    #[default]
    StopOnError,
    /// Record the failure in the report and continue with the next folder.
    KeepGoing,
}

/// Parameters of one pack run.
#[derive(Clone, Debug, Default)]
pub struct PackRequest {
    pub selection: Selection,
    /// File-name globs or bare extensions to pack; empty packs everything.
    pub include: Vec<String>,
    /// Entries to skip; `None` excludes previously built archives.
    pub exclude: Option<Vec<String>>,
    pub no_note: bool,
    /// Matriculation number used as the archive name prefix.
    pub identifier: Option<String>,
    pub policy: BatchPolicy,
}

/// `<prefix>_<NN>.<ext>` where the prefix is the identifier or the default label.
pub fn archive_file_name(settings: &Settings, identifier: Option<&str>, number: u32) -> String {
    let prefix = match identifier {
        Some(id) if !id.trim().is_empty() => sanitize_component(id),
        _ => settings.default_label.clone(),
    };
    format!(
        "{}_{}.{}",
        prefix,
        settings.padded(number),
        settings.archive_extension
    )
}

/// Reject entries that would collide inside the archive.
fn assert_unique_entries(entries: &[ArchiveEntry]) -> PackResult<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        let name = entry.archive_name();
        if !seen.insert(name.clone()) {
            return Err(PackError::Config(format!(
                "duplicate archive entry `{name}` (from {})",
                entry.source().display()
            )));
        }
    }
    Ok(())
}

/// Packs exercise folders with a given archiver.
pub struct ArchiveBuilder<'a> {
    settings: &'a Settings,
    archiver: &'a dyn Archiver,
}

impl<'a> ArchiveBuilder<'a> {
    pub fn new(settings: &'a Settings, archiver: &'a dyn Archiver) -> Self {
        Self { settings, archiver }
    }

    /// Pack every folder selected under `root`.
    ///
    /// Filter conflicts fail before any filesystem access. Per-folder errors
    /// follow `request.policy`.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::FilterConflict`] or [`PackError::InvalidFilter`]
    /// for bad filters and [`PackError::PathNotFound`] for a missing root.
    /// Under [`BatchPolicy::StopOnError`] the first per-folder error
    /// ([`PackError::SolutionPathMissing`], [`PackError::NoteFileMissing`],
    /// archiver or I/O failures) is returned as well.
    pub fn build(&self, root: &Path, request: &PackRequest) -> PackResult<BuildReport> {
        let exclude = request
            .exclude
            .clone()
            .unwrap_or_else(|| vec![self.settings.archive_glob()]);
        let filter = FileFilter::new(&request.include, &exclude)?;

        let folders = select_folders(root, &self.settings.folder_pattern, &request.selection)?;
        if folders.is_empty() {
            tracing::warn!(root = %root.display(), "no exercise folders selected");
        }

        let mut report = BuildReport::default();
        for folder in folders {
            match self.build_folder(&folder, &filter, request) {
                Ok(built) => report.built.push(built),
                Err(error) if request.policy == BatchPolicy::KeepGoing => {
                    tracing::warn!(folder = %folder.name, "skipping: {error}");
                    report.failures.push(FolderFailure { folder, error });
                }
                Err(error) => return Err(error),
            }
        }
        Ok(report)
    }

    /// Work out the output path and entries for one folder without writing.
    fn plan(
        &self,
        folder: &ExerciseFolder,
        filter: &FileFilter,
        request: &PackRequest,
    ) -> PackResult<ArchivePlan> {
        let solution_dir = folder.path.join(&self.settings.solution_dir);
        if !solution_dir.is_dir() {
            return Err(PackError::SolutionPathMissing(solution_dir));
        }

        let output = solution_dir.join(archive_file_name(
            self.settings,
            request.identifier.as_deref(),
            folder.number,
        ));

        let mut files = self.solution_files(&solution_dir, filter, &output)?;
        if !request.no_note {
            let note = &self.settings.note_file;
            if !note.is_file() {
                return Err(PackError::NoteFileMissing(note.clone()));
            }
            files.push(note.clone());
        }

        let entries: Vec<ArchiveEntry> = files
            .iter()
            .map(|file| ArchiveEntry::for_file(file, &solution_dir))
            .collect();
        assert_unique_entries(&entries)?;

        Ok(ArchivePlan {
            folder: folder.clone(),
            output,
            entries,
        })
    }

    fn build_folder(
        &self,
        folder: &ExerciseFolder,
        filter: &FileFilter,
        request: &PackRequest,
    ) -> PackResult<BuiltArchive> {
        let plan = self.plan(folder, filter, request)?;
        if plan.entries.is_empty() {
            tracing::warn!(folder = %folder.name, "no files selected; archive will be empty");
        }

        self.archiver.create(&plan.output, &plan.entries)?;
        let sha256 = archive_digest(&plan.output)?;

        tracing::info!(
            folder = %folder.name,
            number = folder.number,
            output = %plan.output.display(),
            entries = plan.entries.len(),
            %sha256,
            "archive built"
        );
        Ok(BuiltArchive {
            folder: plan.folder,
            output: plan.output,
            entries: plan.entries.len(),
            sha256,
        })
    }

    /// Files below `solution_dir` admitted by `filter`, in path order.
    fn solution_files(
        &self,
        solution_dir: &Path,
        filter: &FileFilter,
        output: &Path,
    ) -> PackResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(solution_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(solution_dir).to_path_buf();
                PackError::io(path, err.into())
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !filter.matches(path) {
                continue;
            }
            // Never pack the archive being written.
            if path == output {
                tracing::warn!(file = %path.display(), "skipping output archive");
                continue;
            }
            files.push(path.to_path_buf());
        }
        Ok(files)
    }
}
