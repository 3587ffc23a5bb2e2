// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Small helpers shared by config loading and archive building.

pub mod hash;
pub mod sanitize_component;

/// Compute the SHA-256 digest of a built archive.
pub use hash::archive_digest;
/// Sanitize labels into filesystem-safe path components.
pub use sanitize_component::sanitize_component;
