// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Timeline record types
//!
//! A [`Response`] is the finished timeline: one [`Operation`] per retained
//! commit, each holding the [`FileChange`]s it made. Field names serialize in
//! camelCase because the JSON shape is consumed by the animation front end.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::parser::TimeReference;

/// Kind of change made to a path
///
/// Serialized as its integer code (`0` add, `1` modify, `2` delete).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Action {
    /// Path was created
    Add = 0,
    /// Path contents or mode changed
    Modify = 1,
    /// Path was removed
    Delete = 2,
}

impl From<Action> for u8 {
    fn from(action: Action) -> Self {
        action as u8
    }
}

impl TryFrom<u8> for Action {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Add),
            1 => Ok(Self::Modify),
            2 => Ok(Self::Delete),
            other => Err(format!("invalid action code: {other}")),
        }
    }
}

/// One effective path mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// What happened to the path
    pub action: Action,
    /// Path segments, split on `/`
    pub file: Vec<String>,
}

impl FileChange {
    /// Create a change for a `/`-separated path
    #[must_use]
    pub fn new(action: Action, path: &str) -> Self {
        Self {
            action,
            file: path.split('/').map(str::to_string).collect(),
        }
    }

    /// The path joined back with `/`
    #[must_use]
    pub fn path(&self) -> String {
        self.file.join("/")
    }
}

/// One retained commit on the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Longest directory shared by every changed file
    pub dir: Vec<String>,
    /// Synthetic animation duration
    pub duration: f64,
    /// Author display string (`name email`)
    pub name: String,
    /// Synthetic animation start offset
    pub start_date: f64,
    /// Real commit time, in the time reference the log was read with
    #[serde(skip)]
    pub start_time: DateTime<FixedOffset>,
    /// Changed files, never empty
    pub updates: Vec<FileChange>,
}

impl Operation {
    /// Create an operation and infer its common directory
    ///
    /// Timing fields start at zero until the schedule is applied.
    #[must_use]
    pub fn new(name: String, start_time: DateTime<FixedOffset>, updates: Vec<FileChange>) -> Self {
        let dir = common_dir(&updates);
        Self {
            dir,
            duration: 0.0,
            name,
            start_date: 0.0,
            start_time,
            updates,
        }
    }

    /// Synthetic end offset (`start_date + duration`)
    #[must_use]
    pub fn end_date(&self) -> f64 {
        self.start_date + self.duration
    }
}

/// Compute the longest directory prefix shared by all files
///
/// A segment at position `i` is only accepted when every file has at least
/// `i + 2` segments, so the result never swallows a file name.
#[must_use]
pub fn common_dir(files: &[FileChange]) -> Vec<String> {
    let Some(first) = files.first() else {
        return Vec::new();
    };

    let mut dir = Vec::new();
    for (i, candidate) in first.file.iter().enumerate() {
        let accepted = files
            .iter()
            .all(|f| f.file.len() >= i + 2 && f.file[i] == *candidate);
        if !accepted {
            break;
        }
        dir.push(candidate.clone());
    }
    dir
}

/// The finished timeline
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Midnight of the first operation's day, in milliseconds since epoch
    pub start_date: i64,
    /// Operations in commit order
    pub updates: Vec<Operation>,
    /// Zone in which the first operation's midnight is resolved
    #[serde(skip)]
    time_reference: TimeReference,
}

impl Response {
    /// Create an empty timeline
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty timeline whose start is midnight in `time_reference`
    #[must_use]
    pub fn with_time_reference(time_reference: TimeReference) -> Self {
        Self {
            time_reference,
            ..Self::default()
        }
    }

    /// Append an operation
    ///
    /// The first operation pushed fixes [`start_date`](Self::start_date).
    pub fn push(&mut self, operation: Operation) {
        if self.updates.is_empty() {
            self.start_date = self.time_reference.midnight_millis(&operation.start_time);
        }
        self.updates.push(operation);
    }

    /// Number of operations
    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Check whether the timeline has no operations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Total number of file changes across all operations
    #[must_use]
    pub fn file_change_count(&self) -> usize {
        self.updates.iter().map(|op| op.updates.len()).sum()
    }
}
