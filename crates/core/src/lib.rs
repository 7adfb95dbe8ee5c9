//! cmdterm Core Library
//!
//! This crate provides a declarative way to build command-line programs out of
//! composable *terms*. A term declares the arguments it accepts and computes a
//! value from the parsed command line; terms combine applicatively into whole
//! programs, optionally with named sub-commands.
//!
//! # Key Features
//!
//! - **Terms**: `pure`, `map`, `app` and friends, with left-biased failures
//! - **Arguments**: flags, options and positionals with typed converters
//! - **Standard Options**: `--help[=FMT]` and `--version` added automatically
//! - **Sub-commands**: selected by name or unambiguous prefix
//! - **Help**: manual pages as plain text or roff, shown through a pager
//! - **Error Handling**: usage and message errors with conventional exit codes
//!
//! # Examples
//!
//! A program with a flag and a sub-command:
//!
//! ```
//! use cmdterm_core::arg::{flag, ArgInfo};
//! use cmdterm_core::error::Failure;
//! use cmdterm_core::info::TermInfo;
//! use cmdterm_core::run::Program;
//! use cmdterm_core::term::Term;
//!
//! let dry_run = flag(ArgInfo::new(&["n", "dry-run"]).doc("Only print what would happen."));
//! let build = dry_run.map(|dry| if dry { "would build" } else { "built" }.to_string());
//! let program = Program::new(Term::pure("nothing to do".to_string()), TermInfo::new("tool").version("1.0"))
//!     .choice(build, TermInfo::new("build").doc("Build the project"));
//!
//! fn args(list: &[&str]) -> Vec<String> {
//!     list.iter().map(ToString::to_string).collect()
//! }
//!
//! assert_eq!(program.evaluate(&args(&["bu", "-n"])), Ok("would build".to_string()));
//! assert_eq!(program.evaluate(&args(&["--version"])), Err(Failure::Version));
//! ```

pub mod arg;
pub mod cmdline;
pub mod config;
pub mod context;
pub mod conv;
pub mod dispatch;
pub mod error;
pub mod eval;
pub mod help;
pub mod info;
pub mod manpage;
pub mod pager;
pub mod probe;
pub mod run;
pub mod suggest;
pub mod term;
pub mod trie;

pub use error::{Failure, Result};
pub use help::HelpFormat;
pub use info::{ManBlock, TermInfo};
pub use run::{Outcome, Program};
pub use term::Term;
