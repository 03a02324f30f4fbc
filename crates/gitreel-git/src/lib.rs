// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitreel-git: Git log processing for gitreel
//!
//! This library crate turns the history of a git repository into an animation
//! timeline: one operation per commit, each with its changed files, their
//! common directory, and a synthetic start and duration that fit every
//! calendar day into a fixed animation budget.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use gitreel_git::{GitRepo, ScheduleOptions, TimelineOptions};
//!
//! let repo = GitRepo::discover(".").expect("open repo");
//! let schedule = ScheduleOptions::new(10_000.0, 2_000.0).expect("valid durations");
//! let timeline = repo
//!     .timeline(&TimelineOptions::new(schedule).from("main"))
//!     .expect("build timeline");
//!
//! for op in &timeline.updates {
//!     println!("{:>10.1} {} ({} files)", op.start_date, op.name, op.updates.len());
//! }
//! ```

pub mod error;
pub mod lines;
pub mod operation;
pub mod parser;
pub mod repo;
pub mod schedule;
pub mod status;

pub use error::GitError;
pub use lines::LineSource;
pub use operation::{Action, FileChange, Operation, Response, common_dir};
pub use parser::{LogParser, TimeReference, parse_log};
pub use repo::{GitRepo, TimelineOptions, read_timeline};
pub use schedule::{DayStrategy, ScheduleOptions, ScheduleStats, schedule};
pub use status::decode_status_line;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::GitError;
    pub use crate::operation::{Action, FileChange, Operation, Response};
    pub use crate::parser::TimeReference;
    pub use crate::repo::{GitRepo, TimelineOptions, read_timeline};
    pub use crate::schedule::ScheduleOptions;
}
