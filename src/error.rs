// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Error kinds surfaced by folder discovery, identifier extraction, and packing.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors raised by the packing core.
///
/// Every variant is fatal to the operation that produced it; the CLI wraps
/// them in `anyhow` for reporting.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("filter `{0}` appears in both the include and exclude lists")]
    FilterConflict(String),

    #[error("solution directory missing: {}", .0.display())]
    SolutionPathMissing(PathBuf),

    #[error("note file missing: {}", .0.display())]
    NoteFileMissing(PathBuf),

    #[error("invalid pattern `{pattern}` for {name}: {reason}")]
    InvalidPattern {
        name: &'static str,
        pattern: String,
        reason: String,
    },

    #[error("invalid filter `{filter}`: {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: globset::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("archiver `{program}` exited with {status}: {stderr}")]
    Archiver {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("failed to write archive {}: {source}", .path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PackError {
    /// Wrap an I/O error together with the path that produced it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PackError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for the packing core.
pub type PackResult<T> = Result<T, PackError>;
