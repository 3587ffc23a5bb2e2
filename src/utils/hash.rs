// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! SHA-256 digests of built archives, reported alongside each output path.

use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{PackError, PackResult};

/// Lowercase hex SHA-256 of the file at `path`.
///
/// # Errors
///
/// Returns [`PackError::Io`] when the file cannot be opened or read.
pub fn archive_digest(path: &Path) -> PackResult<String> {
    let mut file = File::open(path).map_err(|err| PackError::io(path, err))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|err| PackError::io(path, err))?;
    Ok(format!("{:x}", hasher.finalize()))
}
