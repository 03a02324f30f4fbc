// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Line source with one line of pushback
//!
//! The commit grammar sometimes has to read a line before it knows whether the
//! line belongs to the current commit. [`LineSource::push_back`] hands such a
//! line back so the next [`LineSource::advance`] replays it instead of pulling
//! a new one from the underlying stream.

use std::io::{self, BufRead};

/// A line stream with a single line of lookahead
pub struct LineSource<I> {
    lines: I,
    current: Option<String>,
    pending: bool,
    error: Option<io::Error>,
}

impl<R: BufRead> LineSource<io::Lines<R>> {
    /// Create a line source over a buffered reader
    #[must_use]
    pub fn from_reader(reader: R) -> Self {
        Self::new(reader.lines())
    }
}

impl<I> LineSource<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    /// Create a line source over an iterator of lines
    #[must_use]
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            current: None,
            pending: false,
            error: None,
        }
    }

    /// Move to the next line
    ///
    /// Replays the pushed-back line if there is one. Returns `false` at end of
    /// stream or when the underlying read fails; in the latter case the error
    /// is available from [`last_error`](Self::last_error).
    pub fn advance(&mut self) -> bool {
        if self.pending {
            self.pending = false;
            return true;
        }

        match self.lines.next() {
            Some(Ok(line)) => {
                self.current = Some(line);
                true
            }
            Some(Err(e)) => {
                self.current = None;
                self.error = Some(e);
                false
            }
            None => {
                self.current = None;
                false
            }
        }
    }

    /// The line most recently produced by [`advance`](Self::advance)
    ///
    /// Empty before the first successful advance and after end of stream.
    #[must_use]
    pub fn current_line(&self) -> &str {
        self.current.as_deref().unwrap_or("")
    }

    /// Make the current line replayable by the next [`advance`](Self::advance)
    pub fn push_back(&mut self) {
        if self.current.is_some() {
            self.pending = true;
        }
    }

    /// Check whether a pushed-back line is waiting to be replayed
    #[must_use]
    pub fn has_pending_line(&self) -> bool {
        self.pending
    }

    /// Drop the pushed-back line, if any
    pub fn clear_pending(&mut self) {
        self.pending = false;
    }

    /// The read error that ended the stream, if any
    #[must_use]
    pub fn last_error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    /// Take ownership of the read error that ended the stream, if any
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}
