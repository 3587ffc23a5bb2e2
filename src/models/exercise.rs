// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Exercise folder domain model and selection modes.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

/// A directory whose name encodes an exercise number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExerciseFolder {
    pub path: PathBuf,
    pub name: String,
    pub number: u32,
}

impl ExerciseFolder {
    pub fn new(path: PathBuf, name: String, number: u32) -> Self {
        Self { path, name, number }
    }
}

impl Ord for ExerciseFolder {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for ExerciseFolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Which exercise folders a pack run should cover.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    /// Only the folders with these exercise numbers.
    Numbers(BTreeSet<u32>),
    /// Every matching folder.
    All,
    /// The folder with the highest exercise number.
    #[default]
    Newest,
}

impl Selection {
    /// Build a selection from CLI-style inputs: explicit numbers win over `all`.
    pub fn from_args(numbers: &[u32], all: bool) -> Self {
        if !numbers.is_empty() {
            Selection::Numbers(numbers.iter().copied().collect())
        } else if all {
            Selection::All
        } else {
            Selection::Newest
        }
    }
}
