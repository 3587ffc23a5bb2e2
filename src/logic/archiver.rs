// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Archiver backends: an external program driven by a structured argument list,
//! or an in-process ZIP writer.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::process::Command;

use zip::{CompressionMethod, write::FileOptions};

use crate::config::{ArchiverBackend, ArchiverConfig};
use crate::error::{PackError, PackResult};
use crate::models::entry::ArchiveEntry;

/// Writes one archive at `output` holding `entries`.
pub trait Archiver {
    fn create(&self, output: &Path, entries: &[ArchiveEntry]) -> PackResult<()>;
}

/// Build the archiver selected in the config.
pub fn from_config(config: &ArchiverConfig) -> Box<dyn Archiver> {
    match config.backend {
        ArchiverBackend::Command => Box::new(CommandArchiver::new(&config.program, &config.flags)),
        ArchiverBackend::Zip => Box::new(ZipArchiver),
    }
}

/// Runs an external `jar`-style tool:
/// `<program> <flags> <output> -C <base> <entry> [-C <base> <entry> ...]`.
///
/// Arguments are passed directly to the process, never through a shell.
#[derive(Clone, Debug)]
pub struct CommandArchiver {
    program: String,
    flags: String,
}

impl CommandArchiver {
    pub fn new(program: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flags: flags.into(),
        }
    }

    /// Argument list for one invocation.
    pub fn args(&self, output: &Path, entries: &[ArchiveEntry]) -> Vec<OsString> {
        let mut args = Vec::with_capacity(2 + entries.len() * 3);
        args.push(OsString::from(&self.flags));
        args.push(output.as_os_str().to_owned());
        for entry in entries {
            args.push(OsString::from("-C"));
            args.push(entry.base_dir.as_os_str().to_owned());
            args.push(entry.entry_path.as_os_str().to_owned());
        }
        args
    }
}

impl Archiver for CommandArchiver {
    fn create(&self, output: &Path, entries: &[ArchiveEntry]) -> PackResult<()> {
        let args = self.args(output, entries);
        tracing::debug!(program = %self.program, ?args, "running archiver");

        let result = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|err| PackError::io(&self.program, err))?;

        let stdout = String::from_utf8_lossy(&result.stdout);
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            tracing::debug!(program = %self.program, "{}", line.trim());
        }

        if !result.status.success() {
            return Err(PackError::Archiver {
                program: self.program.clone(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Writes a deflated ZIP directly with the `zip` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZipArchiver;

impl Archiver for ZipArchiver {
    fn create(&self, output: &Path, entries: &[ArchiveEntry]) -> PackResult<()> {
        if let Some(parent) = output.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|err| PackError::io(parent, err))?;
        }

        let zip_err = |source| PackError::Zip {
            path: output.to_path_buf(),
            source,
        };

        let file = File::create(output).map_err(|err| PackError::io(output, err))?;
        let mut zip = zip::ZipWriter::new(file);
        let options: FileOptions<'_, ()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in entries {
            let source = entry.source();
            let name = entry.archive_name();
            tracing::debug!(entry = %name, "adding");

            zip.start_file(name.as_str(), options).map_err(zip_err)?;
            let mut reader = File::open(&source).map_err(|err| PackError::io(&source, err))?;
            io::copy(&mut reader, &mut zip).map_err(|err| PackError::io(&source, err))?;
        }

        zip.finish().map_err(zip_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::fs::{self, File};
    use std::io::Read;
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;
    use zip::ZipArchive;

    use super::{Archiver, CommandArchiver, ZipArchiver};
    use crate::error::PackError;
    use crate::models::entry::ArchiveEntry;

    fn entry(base: &Path, rel: &str) -> ArchiveEntry {
        ArchiveEntry {
            base_dir: base.to_path_buf(),
            entry_path: PathBuf::from(rel),
        }
    }

    #[test]
    fn command_args_pair_base_dir_with_entry() {
        let archiver = CommandArchiver::new("jar", "cvf");
        let args = archiver.args(
            Path::new("/w/ex_01/solution/solution_01.zip"),
            &[
                entry(Path::new("/w/ex_01/solution"), "src/Main.java"),
                entry(Path::new("/etc/notes dir"), "note.txt"),
            ],
        );

        let expected: Vec<OsString> = [
            "cvf",
            "/w/ex_01/solution/solution_01.zip",
            "-C",
            "/w/ex_01/solution",
            "src/Main.java",
            "-C",
            "/etc/notes dir",
            "note.txt",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn missing_program_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let archiver = CommandArchiver::new("sheetpack-no-such-archiver", "cvf");

        let err = archiver
            .create(&tmp.path().join("out.zip"), &[])
            .unwrap_err();
        assert!(matches!(err, PackError::Io { .. }));
    }

    #[test]
    fn zip_archiver_stores_entries_with_forward_slashes() {
        let tmp = TempDir::new().unwrap();
        let solution = tmp.path().join("solution");
        fs::create_dir_all(solution.join("src")).unwrap();
        fs::write(solution.join("src").join("Main.java"), b"class Main {}").unwrap();
        fs::write(tmp.path().join("note.txt"), b"hello").unwrap();

        let output = solution.join("out.zip");
        ZipArchiver
            .create(
                &output,
                &[
                    ArchiveEntry::for_file(&solution.join("src").join("Main.java"), &solution),
                    ArchiveEntry::for_file(&tmp.path().join("note.txt"), &solution),
                ],
            )
            .unwrap();

        let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, ["note.txt", "src/Main.java"]);

        let mut body = String::new();
        archive
            .by_name("src/Main.java")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "class Main {}");
    }

    #[test]
    fn zip_archiver_reports_missing_source() {
        let tmp = TempDir::new().unwrap();
        let err = ZipArchiver
            .create(&tmp.path().join("out.zip"), &[entry(tmp.path(), "gone.txt")])
            .unwrap_err();

        assert!(matches!(err, PackError::Io { .. }));
    }
}
