//! gitreel library
//!
//! This module exports the command-line configuration and timeline output for
//! use in integration tests and as a library.

pub mod config;
pub mod timeline;
