// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! `--name-status` line decoding
//!
//! Each file line of `git log --name-status` is a status code followed by one
//! or two tab-separated paths:
//!
//! ```text
//! M	src/lib.rs
//! R100	old/path.rs	new/path.rs
//! ```
//!
//! Copies and renames carry two paths and expand to the changes the animation
//! needs: a copy only adds the destination, a rename deletes the source and
//! adds the destination.

use crate::error::GitError;
use crate::operation::{Action, FileChange};

/// What a status letter does to the paths on its line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEffect {
    /// One path, one change
    Single(Action),
    /// Two paths, the destination is added
    Copy,
    /// Two paths, the source is deleted and the destination added
    Rename,
}

impl StatusEffect {
    /// Number of tab-separated fields a line with this effect carries
    #[must_use]
    pub fn field_count(self) -> usize {
        match self {
            Self::Single(_) => 2,
            Self::Copy | Self::Rename => 3,
        }
    }
}

/// Supported status letters, keyed by the first character of the code
pub const STATUS_TABLE: &[(char, StatusEffect)] = &[
    ('A', StatusEffect::Single(Action::Add)),
    ('D', StatusEffect::Single(Action::Delete)),
    ('M', StatusEffect::Single(Action::Modify)),
    ('T', StatusEffect::Single(Action::Modify)),
    ('U', StatusEffect::Single(Action::Modify)),
    ('X', StatusEffect::Single(Action::Modify)),
    ('B', StatusEffect::Single(Action::Modify)),
    ('C', StatusEffect::Copy),
    ('R', StatusEffect::Rename),
];

/// Look up the effect of a status code
#[must_use]
pub fn status_effect(code: &str) -> Option<StatusEffect> {
    let letter = code.chars().next()?;
    STATUS_TABLE
        .iter()
        .find(|(c, _)| *c == letter)
        .map(|(_, effect)| *effect)
}

/// Decode one status line into the changes it describes
///
/// # Errors
///
/// Returns `GitError::MalformedFileLine` for a wrong field count,
/// `GitError::EmptyFieldValue` for an empty status or path, and
/// `GitError::UnknownStatusCode` for a status letter outside [`STATUS_TABLE`].
pub fn decode_status_line(line: &str) -> Result<Vec<FileChange>, GitError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 2 {
        return Err(GitError::MalformedFileLine {
            line: line.to_string(),
            expected: "at least 2",
            found: fields.len(),
        });
    }

    let code = fields[0];
    if code.is_empty() {
        return Err(GitError::EmptyFieldValue {
            line: line.to_string(),
            field: "status",
        });
    }

    let effect = status_effect(code).ok_or_else(|| GitError::UnknownStatusCode {
        code: code.to_string(),
        line: line.to_string(),
    })?;

    if let StatusEffect::Copy | StatusEffect::Rename = effect
        && fields.len() != effect.field_count()
    {
        return Err(GitError::MalformedFileLine {
            line: line.to_string(),
            expected: "exactly 3",
            found: fields.len(),
        });
    }

    let paths = &fields[1..effect.field_count()];
    if paths.iter().any(|p| p.is_empty()) {
        return Err(GitError::EmptyFieldValue {
            line: line.to_string(),
            field: "path",
        });
    }

    let changes = match effect {
        StatusEffect::Single(action) => vec![FileChange::new(action, paths[0])],
        StatusEffect::Copy => vec![FileChange::new(Action::Add, paths[1])],
        StatusEffect::Rename => vec![
            FileChange::new(Action::Delete, paths[0]),
            FileChange::new(Action::Add, paths[1]),
        ],
    };
    Ok(changes)
}
