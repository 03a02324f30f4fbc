//! Timeline generation for the command line
//!
//! Builds a timeline either from a repository (spawning `git log`) or from a
//! log piped on stdin, and writes it out as JSON.

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};

use anyhow::{Context, Result};
use gitreel_git::{GitRepo, Response, read_timeline};
use tracing::info;

use crate::config::Config;

/// Build the timeline described by `config`
///
/// Reads stdin when `config.stdin` is set, otherwise runs `git log` in the
/// configured repository.
///
/// # Errors
///
/// Returns an error if the options are invalid, the repository cannot be
/// read, or the log does not parse.
pub fn build(config: &Config) -> Result<Response> {
    if config.stdin {
        let stdin = io::stdin();
        return build_from_reader(config, stdin.lock());
    }

    let options = config.timeline_options()?;
    let repo = GitRepo::discover(&config.repository)?;
    info!(repository = %repo.path().display(), "Opened repository");
    let response = repo
        .timeline(&options)
        .with_context(|| format!("Failed to build timeline for {}", options.reference))?;
    Ok(response)
}

/// Build a timeline from an already produced `git log` stream
///
/// # Errors
///
/// Returns an error if the options are invalid or the log does not parse.
pub fn build_from_reader<R: BufRead>(config: &Config, reader: R) -> Result<Response> {
    let options = config.timeline_options()?;
    let response = read_timeline(reader, &options).context("Failed to parse git log")?;
    Ok(response)
}

/// Serialize a timeline as JSON
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_json<W: Write>(response: &Response, mut writer: W, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, response)?;
    } else {
        serde_json::to_writer(&mut writer, response)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Build the timeline and write it to the configured destination
///
/// # Errors
///
/// Returns an error if the timeline cannot be built or written.
pub fn run(config: &Config) -> Result<()> {
    let response = build(config)?;

    match &config.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_json(&response, BufWriter::new(file), config.pretty)?;
            info!(path = %path.display(), operations = response.len(), "Timeline written");
        }
        None => {
            let stdout = io::stdout();
            write_json(&response, stdout.lock(), config.pretty)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    const LOG: &str = "\
commit: 1111111111111111111111111111111111111111
Author: Jane Doe jane@example.com
Date: 1700000000

A\tsrc/a.rs
A\tsrc/b.rs
";

    fn config() -> Config {
        Config {
            day_duration: 1000.0,
            max_commit_duration: 400.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_from_reader() {
        let response = build_from_reader(&config(), LOG.as_bytes()).expect("Should build");
        assert_eq!(response.len(), 1);
        assert_eq!(response.updates[0].dir, vec!["src"]);
        assert_eq!(response.updates[0].start_date, 600.0);
    }

    #[test]
    fn test_build_from_reader_reports_parse_error() {
        let err = build_from_reader(&config(), "Foo: bar\n".as_bytes())
            .expect_err("Should fail to parse");
        let message = format!("{err:#}");
        assert!(message.contains("Failed to parse git log"));
        assert!(message.contains("Foo: bar"));
    }

    #[test]
    fn test_build_from_reader_rejects_bad_durations() {
        let config = Config {
            day_duration: -1.0,
            ..config()
        };
        assert!(build_from_reader(&config, LOG.as_bytes()).is_err());
    }

    #[test]
    fn test_write_json_compact() {
        let response = build_from_reader(&config(), LOG.as_bytes()).expect("Should build");
        let mut out = Vec::new();
        write_json(&response, &mut out, false).expect("Should write");

        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);

        let value: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(value["startDate"], serde_json::json!(1_699_920_000_000i64));
        assert_eq!(
            value["updates"][0]["name"],
            serde_json::json!("Jane Doe jane@example.com")
        );
    }

    #[test]
    fn test_write_json_pretty() {
        let response = Response::new();
        let mut out = Vec::new();
        write_json(&response, &mut out, true).expect("Should write");
        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.contains("\"startDate\": 0"));
        assert!(text.contains("\"updates\": []"));
    }
}
