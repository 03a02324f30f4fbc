// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Git log parsing
//!
//! Parses the output of
//!
//! ```text
//! git log <ref> --name-status --reverse --format="commit: %H%nAuthor: %an %ae%nDate: %at"
//! ```
//!
//! into [`Operation`]s. The grammar per commit is:
//!
//! ```text
//! commit: <sha>
//! [Merge: <parents>]...
//! Author: <name> <email>
//! Date: <unix seconds>
//!
//! <status>\t<path>[\t<path>]
//! ...
//! ```
//!
//! Parsing is all-or-nothing: the first line that does not fit the grammar
//! aborts the whole parse.

use std::io::{self, BufRead};

use chrono::{DateTime, FixedOffset, Local, NaiveTime, TimeZone, Timelike};
use tracing::{debug, trace};

use crate::error::GitError;
use crate::lines::LineSource;
use crate::operation::{FileChange, Operation, Response};
use crate::status::decode_status_line;

/// Prefix of the first header line of every commit
pub const COMMIT_PREFIX: &str = "commit";
/// Prefix of the parent line git adds to merge commits
pub const MERGE_PREFIX: &str = "Merge:";
/// Prefix of the author header line
pub const AUTHOR_PREFIX: &str = "Author: ";
/// Prefix of the date header line
pub const DATE_PREFIX: &str = "Date:";
/// `--format` argument producing the header lines above
pub const LOG_FORMAT: &str = "--format=commit: %H%nAuthor: %an %ae%nDate: %at";

/// Time zone used to interpret commit timestamps
///
/// The calendar day of a commit, and therefore how commits are grouped when
/// the timeline is scheduled, depends on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeReference {
    /// Coordinated universal time
    #[default]
    Utc,
    /// The local time zone of the machine running the parse
    Local,
}

impl TimeReference {
    /// Convert unix seconds to a time in this reference
    ///
    /// Returns `None` if the timestamp is out of range.
    #[must_use]
    pub fn at(self, seconds: i64) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Utc => DateTime::from_timestamp(seconds, 0).map(|t| t.fixed_offset()),
            Self::Local => Local
                .timestamp_opt(seconds, 0)
                .single()
                .map(|t| t.fixed_offset()),
        }
    }

    /// Milliseconds since epoch of midnight on `time`'s calendar day
    ///
    /// For [`TimeReference::Local`] midnight is resolved through the zone, so
    /// a DST change later in the day does not move it. With
    /// [`TimeReference::Utc`], or where local midnight is skipped by a DST
    /// change, the day is truncated in `time`'s own offset.
    #[must_use]
    pub fn midnight_millis(self, time: &DateTime<FixedOffset>) -> i64 {
        let zone_midnight = match self {
            Self::Utc => None,
            Self::Local => Local
                .from_local_datetime(&time.date_naive().and_time(NaiveTime::MIN))
                .earliest()
                .map(|m| m.timestamp()),
        };
        let seconds = zone_midnight
            .unwrap_or_else(|| time.timestamp() - i64::from(time.num_seconds_from_midnight()));
        seconds * 1000
    }
}

/// Classification of a raw log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Commit,
    Merge,
    Author(&'a str),
    Date(&'a str),
    Blank,
    Other,
}

impl<'a> LineKind<'a> {
    fn of(line: &'a str) -> Self {
        if line.starts_with(COMMIT_PREFIX) {
            Self::Commit
        } else if line.starts_with(MERGE_PREFIX) {
            Self::Merge
        } else if let Some(name) = line.strip_prefix(AUTHOR_PREFIX) {
            Self::Author(name)
        } else if let Some(date) = line.strip_prefix(DATE_PREFIX) {
            Self::Date(date)
        } else if line.trim().is_empty() {
            Self::Blank
        } else {
            Self::Other
        }
    }
}

/// Position in the commit grammar
enum State {
    ExpectCommitHeader,
    ExpectAuthorOrMerge,
    ExpectDate {
        author: String,
    },
    ExpectFilesOrNextCommit {
        author: String,
        time: DateTime<FixedOffset>,
    },
    Files {
        author: String,
        time: DateTime<FixedOffset>,
    },
}

/// A commit as read from the log, possibly without files
struct RawCommit {
    author: String,
    time: DateTime<FixedOffset>,
    files: Vec<FileChange>,
}

/// Streaming parser over `git log` output
///
/// Yields one [`Operation`] per commit that changed at least one file.
/// After the first error the parser yields nothing more.
pub struct LogParser<I> {
    lines: LineSource<I>,
    time_reference: TimeReference,
    finished: bool,
}

impl<R: BufRead> LogParser<io::Lines<R>> {
    /// Create a parser over a buffered reader
    #[must_use]
    pub fn from_reader(reader: R, time_reference: TimeReference) -> Self {
        Self::new(LineSource::from_reader(reader), time_reference)
    }
}

impl<I> LogParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    /// Create a parser over a line source
    #[must_use]
    pub fn new(lines: LineSource<I>, time_reference: TimeReference) -> Self {
        Self {
            lines,
            time_reference,
            finished: false,
        }
    }

    /// Parse the whole stream into a timeline
    ///
    /// Timing fields are left at zero; see [`crate::schedule`].
    ///
    /// # Errors
    ///
    /// Returns the first `GitError` encountered; no partial result is kept.
    pub fn into_response(self) -> Result<Response, GitError> {
        let mut response = Response::with_time_reference(self.time_reference);
        for operation in self {
            response.push(operation?);
        }
        Ok(response)
    }

    /// Read the next operation with files, skipping empty commits
    fn next_operation(&mut self) -> Result<Option<Operation>, GitError> {
        while let Some(commit) = self.read_commit()? {
            if commit.files.is_empty() {
                debug!(author = %commit.author, time = %commit.time, "Skipping commit without files");
                continue;
            }
            trace!(
                author = %commit.author,
                time = %commit.time,
                files = commit.files.len(),
                "Parsed commit"
            );
            return Ok(Some(Operation::new(commit.author, commit.time, commit.files)));
        }
        Ok(None)
    }

    /// Advance the line source, surfacing read errors
    fn advance(&mut self) -> Result<bool, GitError> {
        if self.lines.advance() {
            return Ok(true);
        }
        match self.lines.take_error() {
            Some(e) => Err(GitError::Read(e)),
            None => Ok(false),
        }
    }

    /// Read one commit record, or `None` at a clean end of stream
    fn read_commit(&mut self) -> Result<Option<RawCommit>, GitError> {
        let mut state = State::ExpectCommitHeader;
        loop {
            state = match state {
                State::ExpectCommitHeader => {
                    if !self.advance()? {
                        return Ok(None);
                    }
                    let line = self.lines.current_line();
                    if LineKind::of(line) != LineKind::Commit {
                        return Err(unexpected("commit", line));
                    }
                    State::ExpectAuthorOrMerge
                }
                State::ExpectAuthorOrMerge => {
                    const EXPECTED: &str = "Merge or Author";
                    if !self.advance()? {
                        return Err(GitError::UnexpectedEndOfStream { expected: EXPECTED });
                    }
                    let line = self.lines.current_line();
                    match LineKind::of(line) {
                        LineKind::Merge => State::ExpectAuthorOrMerge,
                        LineKind::Author(name) => State::ExpectDate {
                            author: name.to_string(),
                        },
                        _ => return Err(unexpected(EXPECTED, line)),
                    }
                }
                State::ExpectDate { author } => {
                    if !self.advance()? {
                        return Err(GitError::UnexpectedEndOfStream { expected: "Date" });
                    }
                    let line = self.lines.current_line();
                    let LineKind::Date(value) = LineKind::of(line) else {
                        return Err(unexpected("Date", line));
                    };
                    let time = self.parse_date(value).ok_or_else(|| GitError::MalformedDate {
                        line: line.to_string(),
                    })?;
                    State::ExpectFilesOrNextCommit { author, time }
                }
                State::ExpectFilesOrNextCommit { author, time } => {
                    if !self.advance()? {
                        return Ok(Some(RawCommit {
                            author,
                            time,
                            files: Vec::new(),
                        }));
                    }
                    self.lines.push_back();
                    if LineKind::of(self.lines.current_line()) == LineKind::Commit {
                        return Ok(Some(RawCommit {
                            author,
                            time,
                            files: Vec::new(),
                        }));
                    }
                    State::Files { author, time }
                }
                State::Files { author, time } => {
                    let files = self.read_files()?;
                    return Ok(Some(RawCommit {
                        author,
                        time,
                        files,
                    }));
                }
            };
        }
    }

    /// Read file lines up to the next commit header or end of stream
    fn read_files(&mut self) -> Result<Vec<FileChange>, GitError> {
        let mut files = Vec::new();
        let mut reached_next_commit = false;

        while self.advance()? {
            let line = self.lines.current_line();
            match LineKind::of(line) {
                LineKind::Commit => {
                    self.lines.push_back();
                    reached_next_commit = true;
                    break;
                }
                LineKind::Blank => continue,
                _ => files.extend(decode_status_line(line)?),
            }
        }

        if files.is_empty() && !reached_next_commit {
            return Err(GitError::NoFilesFound);
        }
        Ok(files)
    }

    fn parse_date(&self, value: &str) -> Option<DateTime<FixedOffset>> {
        let seconds: i64 = value.replace(' ', "").parse().ok()?;
        self.time_reference.at(seconds)
    }
}

impl<I> Iterator for LogParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = Result<Operation, GitError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_operation() {
            Ok(Some(operation)) => Some(Ok(operation)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

fn unexpected(expected: &'static str, line: &str) -> GitError {
    GitError::UnexpectedToken {
        expected,
        line: line.to_string(),
    }
}

/// Parse `git log` output from a reader
///
/// # Errors
///
/// Returns the first `GitError` encountered; no partial result is kept.
pub fn parse_log<R: BufRead>(
    reader: R,
    time_reference: TimeReference,
) -> Result<Response, GitError> {
    LogParser::from_reader(reader, time_reference).into_response()
}
