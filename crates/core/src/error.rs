use itertools::Itertools;
use thiserror::Error;

use crate::help::HelpFormat;

pub type Result<T> = std::result::Result<T, Failure>;

/// Result of presenting an outcome to the user.
pub type RenderResult<T> = std::result::Result<T, Error>;

/// The terminal outcome of an evaluation that did not produce a value.
///
/// `Help` and `Version` are not errors, they travel on the failure channel
/// because they short-circuit evaluation just like errors do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The command line itself is invalid.
    #[error("{}", .0)]
    Usage(String),

    /// Term logic rejected an otherwise well-formed command line.
    #[error("{}", .0)]
    Message(String),

    #[error("Help requested in `{}` format", .format)]
    Help {
        format: HelpFormat,
        target: Option<String>,
    },

    #[error("Version requested")]
    Version,
}

impl Failure {
    pub fn usage(doc: impl Into<String>) -> Self {
        Self::Usage(doc.into())
    }

    pub fn message(doc: impl Into<String>) -> Self {
        Self::Message(doc.into())
    }

    pub fn help(format: HelpFormat, target: Option<String>) -> Self {
        Self::Help { format, target }
    }

    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error spawning `{}`: {}", .program, .original)]
    Spawn {
        program: String,
        original: std::io::Error,
    },

    #[error("The pager `{}` exited with a non-success code.", .0)]
    PagerExit(String),

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),
}

impl Error {
    pub fn spawn_error(program: String, original: std::io::Error) -> Self {
        Self::Spawn { program, original }
    }
}

/// Quotes a command-line token for an error message: `` `tok' ``.
pub(crate) fn quote(token: &str) -> String {
    format!("`{token}'")
}

/// Formats names as "`a'", "`a' or `b'" or "`a', `b' or `c'".
pub(crate) fn alternatives<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [single] => quote(single.as_ref()),
        [init @ .., last] => format!(
            "{} or {}",
            init.iter().map(|name| quote(name.as_ref())).join(", "),
            quote(last.as_ref())
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternatives_formatting() {
        assert_eq!(alternatives::<&str>(&[]), "");
        assert_eq!(alternatives(&["a"]), "`a'");
        assert_eq!(alternatives(&["a", "b"]), "`a' or `b'");
        assert_eq!(alternatives(&["a", "b", "c"]), "`a', `b' or `c'");
    }

    #[test]
    fn test_failure_constructors() {
        assert_eq!(Failure::usage("bad"), Failure::Usage("bad".to_string()));
        assert_eq!(Failure::message("no"), Failure::Message("no".to_string()));
        assert!(Failure::usage("bad").is_usage());
        assert!(!Failure::Version.is_usage());
        assert_eq!(
            Failure::help(HelpFormat::Plain, Some("build".to_string())),
            Failure::Help {
                format: HelpFormat::Plain,
                target: Some("build".to_string())
            }
        );
    }

    #[test]
    fn test_failure_display_is_the_doc() {
        assert_eq!(Failure::usage("unknown option").to_string(), "unknown option");
        assert_eq!(Failure::message("out of range").to_string(), "out of range");
    }
}
