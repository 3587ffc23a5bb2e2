// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Filesystem logic: folder discovery, identifier extraction, and archive building.

pub mod archiver;
pub mod folders;
pub mod numbers;
pub mod pack;
