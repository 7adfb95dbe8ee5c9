//! cmdterm CLI Library
//!
//! This crate provides `ct`, a small numeric tool built with cmdterm. It
//! exists to exercise the framework end to end: sub-commands selected by
//! prefix, typed options and positionals, message errors from term logic,
//! and the standard `--help` and `--version` options.
//!
//! # Examples
//!
//! The CLI binary (`ct`) can be used in several ways:
//!
//! ```bash
//! # Sum numbers
//! ct sum 1 2 3.5
//!
//! # Abbreviated command, one digit after the decimal point
//! ct me -p 1 1 2
//!
//! # Describe the computation
//! ct max --verbose 3 9 4
//!
//! # Manual of a command, as plain text
//! ct help mean --man-format=plain
//! ```

pub mod commands;
pub mod stats;
