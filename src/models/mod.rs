// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: exercise folders, file filters, and archive entries.

pub mod entry;
pub mod exercise;
pub mod filters;
