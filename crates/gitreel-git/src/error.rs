// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gitreel-git

use thiserror::Error;

/// Errors that can occur while reading and parsing git history
///
/// Every variant is fatal: the first error aborts the whole parse and no
/// partial timeline is returned.
#[derive(Debug, Error)]
pub enum GitError {
    /// Error from git2 library
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// Repository not found at the specified path
    #[error("Repository not found: {path}")]
    RepositoryNotFound {
        /// The path that was searched for a repository
        path: String,
    },

    /// Invalid commit reference (branch, tag, or SHA)
    #[error("Invalid commit reference: {reference}")]
    InvalidReference {
        /// The reference string that could not be resolved
        reference: String,
    },

    /// The `git log` process could not be started or its output not captured
    #[error("Failed to start git log: {message}")]
    StreamStartFailure {
        /// Description of the failure
        message: String,
    },

    /// The `git log` process exited unsuccessfully
    #[error("git log exited with {status}")]
    UpstreamProcessFailure {
        /// Exit status as reported by the operating system
        status: String,
    },

    /// Reading a line from the log stream failed
    #[error("Failed to read git log output: {0}")]
    Read(#[from] std::io::Error),

    /// A line does not match the grammar expected at the current position
    #[error("git log unexpected token. expected: {expected}. got: {line:?}")]
    UnexpectedToken {
        /// The token expected at this position
        expected: &'static str,
        /// The offending line
        line: String,
    },

    /// The stream ended in the middle of a commit header
    #[error("git log ended unexpectedly. expected: {expected}")]
    UnexpectedEndOfStream {
        /// The token expected at this position
        expected: &'static str,
    },

    /// The date line does not carry a valid unix timestamp
    #[error("git log malformed date: {line:?}")]
    MalformedDate {
        /// The offending line
        line: String,
    },

    /// A status line has the wrong number of tab-separated fields
    #[error("git file line expected {expected} fields, got {found}: {line:?}")]
    MalformedFileLine {
        /// The offending line
        line: String,
        /// Required field count, as text (e.g. "at least 2")
        expected: &'static str,
        /// Actual field count
        found: usize,
    },

    /// A status line has an empty status code or path
    #[error("git file line has an empty {field}: {line:?}")]
    EmptyFieldValue {
        /// The offending line
        line: String,
        /// Which field was empty
        field: &'static str,
    },

    /// The status letter is not one git emits for `--name-status`
    #[error("git file line has unknown status {code:?}: {line:?}")]
    UnknownStatusCode {
        /// The status code field
        code: String,
        /// The offending line
        line: String,
    },

    /// A file section was started but contained no file lines
    #[error("git log commit has a file section without files")]
    NoFilesFound,

    /// Scheduling parameters cannot produce a valid timeline
    #[error("Invalid schedule: {message}")]
    InvalidSchedule {
        /// Description of the invalid parameter
        message: String,
    },
}

impl GitError {
    /// Check whether this error was raised by the log grammar rather than
    /// by the repository or the process around it
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedToken { .. }
                | Self::UnexpectedEndOfStream { .. }
                | Self::MalformedDate { .. }
                | Self::MalformedFileLine { .. }
                | Self::EmptyFieldValue { .. }
                | Self::UnknownStatusCode { .. }
                | Self::NoFilesFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_token_message_names_line_and_expectation() {
        let err = GitError::UnexpectedToken {
            expected: "Merge or Author",
            line: "Foo: bar".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("Merge or Author"));
        assert!(message.contains("Foo: bar"));
    }

    #[test]
    fn test_is_parse_error() {
        assert!(GitError::NoFilesFound.is_parse_error());
        assert!(
            GitError::MalformedDate {
                line: "Date: x".to_string()
            }
            .is_parse_error()
        );
        assert!(
            !GitError::UpstreamProcessFailure {
                status: "exit status: 128".to_string()
            }
            .is_parse_error()
        );
    }
}
