//! Configuration for the gitreel command line
//!
//! This module provides the command-line configuration: which repository and
//! ref to read, the animation timing budget, output options, and logging.

use std::path::PathBuf;

use clap::Parser;
use gitreel_git::{GitError, ScheduleOptions, TimeReference, TimelineOptions};

/// Default animation time for one calendar day
pub const DEFAULT_DAY_DURATION: f64 = 10_000.0;
/// Default cap on one commit's animation time
pub const DEFAULT_MAX_COMMIT_DURATION: f64 = 2_000.0;

/// gitreel - turn git history into an animation timeline
#[derive(Parser, Debug, Clone)]
#[command(name = "gitreel")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Path to the git repository
    ///
    /// Any directory inside the repository works; the repository root is
    /// discovered by walking up the tree.
    #[arg(default_value = ".", env = "GITREEL_REPOSITORY")]
    pub repository: PathBuf,

    /// Branch, tag, or SHA whose history is animated
    #[arg(short, long, default_value = "HEAD", env = "GITREEL_BRANCH")]
    pub branch: String,

    /// Animation time allotted to one calendar day
    #[arg(long, default_value_t = DEFAULT_DAY_DURATION, env = "GITREEL_DAY_DURATION")]
    pub day_duration: f64,

    /// Longest animation time a single commit may take
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_COMMIT_DURATION,
        env = "GITREEL_MAX_COMMIT_DURATION"
    )]
    pub max_commit_duration: f64,

    /// Group commits into days using the local time zone instead of UTC
    #[arg(long, default_value = "false")]
    pub local_time: bool,

    /// Read an already produced `git log` from stdin instead of running git
    ///
    /// The log must use the format
    /// `--name-status --reverse --format="commit: %H%nAuthor: %an %ae%nDate: %at"`.
    #[arg(long, default_value = "false")]
    pub stdin: bool,

    /// Write the timeline to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, default_value = "false")]
    pub pretty: bool,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with the JSON output.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repository: PathBuf::from("."),
            branch: "HEAD".to_string(),
            day_duration: DEFAULT_DAY_DURATION,
            max_commit_duration: DEFAULT_MAX_COMMIT_DURATION,
            local_time: false,
            stdin: false,
            output: None,
            pretty: false,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Get the time zone used for day grouping
    #[must_use]
    pub fn time_reference(&self) -> TimeReference {
        if self.local_time {
            TimeReference::Local
        } else {
            TimeReference::Utc
        }
    }

    /// Build the schedule options from the duration flags
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSchedule` if either duration is not a
    /// positive number.
    pub fn schedule_options(&self) -> Result<ScheduleOptions, ConfigError> {
        Ok(ScheduleOptions::new(
            self.day_duration,
            self.max_commit_duration,
        )?)
    }

    /// Build the timeline options for the library
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSchedule` if the durations are invalid.
    pub fn timeline_options(&self) -> Result<TimelineOptions, ConfigError> {
        Ok(TimelineOptions::new(self.schedule_options()?)
            .from(&self.branch)
            .with_time_reference(self.time_reference()))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The durations are not positive numbers
    /// - The repository path doesn't exist or isn't a directory (unless
    ///   reading from stdin)
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.schedule_options()?;

        if !self.stdin {
            if !self.repository.exists() {
                return Err(ConfigError::RepositoryNotFound(self.repository.clone()));
            }
            if !self.repository.is_dir() {
                return Err(ConfigError::RepositoryNotDirectory(
                    self.repository.clone(),
                ));
            }
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Repository path not found
    #[error("Repository path not found: {0}")]
    RepositoryNotFound(PathBuf),

    /// Repository path is not a directory
    #[error("Repository path is not a directory: {0}")]
    RepositoryNotDirectory(PathBuf),

    /// Durations cannot produce a valid schedule
    #[error("{0}")]
    InvalidSchedule(#[from] GitError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.repository, PathBuf::from("."));
        assert_eq!(config.branch, "HEAD");
        assert_eq!(config.day_duration, DEFAULT_DAY_DURATION);
        assert_eq!(config.max_commit_duration, DEFAULT_MAX_COMMIT_DURATION);
        assert!(!config.local_time);
        assert!(!config.stdin);
        assert!(config.output.is_none());
        assert!(!config.verbose);
        assert!(!config.quiet);
    }

    #[test]
    fn test_time_reference() {
        assert_eq!(Config::default().time_reference(), TimeReference::Utc);
        let config = Config {
            local_time: true,
            ..Default::default()
        };
        assert_eq!(config.time_reference(), TimeReference::Local);
    }

    #[test]
    fn test_timeline_options() {
        let config = Config {
            branch: "release".to_string(),
            day_duration: 1000.0,
            max_commit_duration: 250.0,
            ..Default::default()
        };
        let options = config.timeline_options().expect("valid options");
        assert_eq!(options.reference, "release");
        assert_eq!(options.schedule.capacity(), 4);
    }

    #[test]
    fn test_log_level_default() {
        let config = Config::default();
        assert_eq!(config.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_log_level_verbose() {
        let config = Config {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_log_level_quiet() {
        let config = Config {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_validate_nonexistent_repository() {
        let config = Config {
            repository: PathBuf::from("/nonexistent/path/12345"),
            ..Default::default()
        };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::RepositoryNotFound(_))));
    }

    #[test]
    fn test_validate_stdin_skips_repository_check() {
        let config = Config {
            repository: PathBuf::from("/nonexistent/path/12345"),
            stdin: true,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_durations() {
        let config = Config {
            max_commit_duration: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
