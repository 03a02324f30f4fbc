// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Repository access and timeline building
//!
//! The repository is opened and the requested ref resolved with `git2`, then
//! `git log` is spawned against the resolved commit and its stdout is parsed
//! line by line as it arrives.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};

use git2::{ErrorCode, Repository};
use tracing::{debug, info, warn};

use crate::error::GitError;
use crate::operation::Response;
use crate::parser::{LOG_FORMAT, TimeReference, parse_log};
use crate::schedule::{ScheduleOptions, schedule};

/// Executable used to produce the log
const GIT_COMMAND: &str = "git";

/// Configuration for building a timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineOptions {
    /// Branch, tag, or SHA whose history is read
    pub reference: String,
    /// Animation timing budget
    pub schedule: ScheduleOptions,
    /// Time zone that decides which calendar day a commit falls on
    pub time_reference: TimeReference,
}

impl TimelineOptions {
    /// Create options reading the history of `HEAD` in UTC
    #[must_use]
    pub fn new(schedule: ScheduleOptions) -> Self {
        Self {
            reference: "HEAD".to_string(),
            schedule,
            time_reference: TimeReference::Utc,
        }
    }

    /// Set the branch, tag, or SHA to read
    #[must_use]
    pub fn from(mut self, reference: &str) -> Self {
        self.reference = reference.to_string();
        self
    }

    /// Set the time zone used for day grouping
    #[must_use]
    pub fn with_time_reference(mut self, time_reference: TimeReference) -> Self {
        self.time_reference = time_reference;
        self
    }
}

/// Parse and schedule an already produced `git log` stream
///
/// # Errors
///
/// Returns the first `GitError` raised while parsing.
pub fn read_timeline<R: BufRead>(
    reader: R,
    options: &TimelineOptions,
) -> Result<Response, GitError> {
    let mut response = parse_log(reader, options.time_reference)?;
    let stats = schedule(&mut response.updates, &options.schedule);

    info!(
        operations = response.len(),
        file_changes = response.file_change_count(),
        active_days = stats.active_days,
        compressed_days = stats.compressed_days,
        total_duration = stats.total_duration,
        "Timeline built"
    );

    Ok(response)
}

/// A git repository wrapper for building timelines
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open a git repository at the given path
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if the path is not a git repository,
    /// or `GitError::Git2` if the repository exists but cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|e| repository_error(e, path))?;
        Ok(Self { repo })
    }

    /// Discover and open a git repository containing the given path
    ///
    /// This walks up the directory tree to find a `.git` directory.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if no repository is found, or
    /// `GitError::Git2` if the repository exists but cannot be opened.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|e| repository_error(e, path))?;
        Ok(Self { repo })
    }

    /// Check if the repository is bare
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.repo.is_bare()
    }

    /// Get the repository path
    #[must_use]
    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    /// Get the working directory path (None for bare repos)
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Resolve a branch, tag, or SHA to a commit SHA
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if the reference does not name a
    /// commit, or `GitError::Git2` if the object database cannot be read.
    pub fn resolve_commit(&self, reference: &str) -> Result<String, GitError> {
        let invalid = || GitError::InvalidReference {
            reference: reference.to_string(),
        };
        let object = self.repo.revparse_single(reference).map_err(|e| {
            if is_bad_reference(&e) {
                invalid()
            } else {
                GitError::Git2(e)
            }
        })?;
        let commit = object.peel_to_commit().map_err(|_| invalid())?;
        Ok(commit.id().to_string())
    }

    /// Build the `git log` command for a resolved commit
    fn log_command(&self, sha: &str) -> Command {
        let dir = self.workdir().unwrap_or_else(|| self.path());
        let mut cmd = Command::new(GIT_COMMAND);
        cmd.current_dir(dir)
            .args(["-c", "core.quotePath=false", "log", sha])
            .args(["--name-status", "--reverse", LOG_FORMAT])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        cmd
    }

    /// Read the history of `options.reference` and build the timeline
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if the reference cannot be resolved,
    /// `GitError::StreamStartFailure` if `git log` cannot be started,
    /// `GitError::UpstreamProcessFailure` if it exits unsuccessfully, or the
    /// first parse error in its output.
    pub fn timeline(&self, options: &TimelineOptions) -> Result<Response, GitError> {
        let sha = self.resolve_commit(&options.reference)?;
        info!(reference = %options.reference, %sha, "Reading git history");

        let mut child = self.log_command(&sha).spawn().map_err(|e| {
            let message = if e.kind() == std::io::ErrorKind::NotFound {
                "git is not installed or not in PATH".to_string()
            } else {
                e.to_string()
            };
            GitError::StreamStartFailure { message }
        })?;

        let Some(stdout) = child.stdout.take() else {
            // Reap the child before reporting; nothing can be read from it
            let _ = child.kill();
            let _ = child.wait();
            return Err(GitError::StreamStartFailure {
                message: "git log stdout was not captured".to_string(),
            });
        };

        match read_timeline(BufReader::new(stdout), options) {
            Ok(response) => {
                let status = child
                    .wait()
                    .map_err(|e| GitError::UpstreamProcessFailure {
                        status: e.to_string(),
                    })?;
                debug!(%status, "git log exited");
                if !status.success() {
                    return Err(GitError::UpstreamProcessFailure {
                        status: status.to_string(),
                    });
                }
                Ok(response)
            }
            Err(e) => {
                warn!(error = %e, "Stopping git log after parse failure");
                let _ = child.kill();
                let _ = child.wait();
                Err(e)
            }
        }
    }
}

/// Map a failure to open a repository, keeping only "not there" as not found
fn repository_error(error: git2::Error, path: &Path) -> GitError {
    if error.code() == ErrorCode::NotFound {
        GitError::RepositoryNotFound {
            path: path.display().to_string(),
        }
    } else {
        GitError::Git2(error)
    }
}

/// Check whether a rev-parse failure means the reference itself is bad
fn is_bad_reference(error: &git2::Error) -> bool {
    matches!(
        error.code(),
        ErrorCode::NotFound
            | ErrorCode::Ambiguous
            | ErrorCode::InvalidSpec
            | ErrorCode::UnbornBranch
            | ErrorCode::Invalid
    )
}
