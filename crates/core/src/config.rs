//! Defaults and environment resolution for cmdterm.
//!
//! This module holds the constants the engine and the renderers share and
//! resolves the external programs used to page help: the pager and the
//! roff formatter.

use crate::help::HelpFormat;
use crate::probe::EnvironmentProbe;

/// Format used by a bare `--help`.
pub const DEFAULT_HELP_FORMAT: HelpFormat = HelpFormat::Pager;

pub const OPTIONS_SECTION: &str = "OPTIONS";
pub const ARGUMENTS_SECTION: &str = "ARGUMENTS";
pub const COMMANDS_SECTION: &str = "COMMANDS";

/// Column count used when the terminal width is unknown.
pub const DEFAULT_WIDTH: u16 = 80;
const MIN_WIDTH: u16 = 40;
const MAX_WIDTH: u16 = 120;

/// Environment variables naming a pager, in order of preference.
const PAGER_VARIABLES: [&str; 2] = ["MANPAGER", "PAGER"];
/// Pagers looked up in `PATH` when no variable names one.
const FALLBACK_PAGERS: [&str; 2] = ["less", "more"];
/// Roff formatters looked up in `PATH`, with their arguments.
const FORMATTERS: [(&str, &[&str]); 2] = [("groff", &["-m", "man", "-T", "utf8"]), ("nroff", &["-man"])];

/// Process exit codes.
pub mod exit {
    pub const OK: i32 = 0;
    /// Term logic reported an error message.
    pub const SOME_ERROR: i32 = 123;
    /// The command line could not be parsed.
    pub const CLI_ERROR: i32 = 124;
    /// Presenting the outcome failed, e.g. writing to a closed stream.
    pub const INTERNAL_ERROR: i32 = 125;
}

/// Settings applied to every evaluation of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    pub help_default: HelpFormat,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            help_default: DEFAULT_HELP_FORMAT,
        }
    }
}

/// Resolves the pager command.
///
/// `MANPAGER` and `PAGER` are honoured first, with `~` expanded; otherwise
/// `less` or `more` is used if found in `PATH`.
///
/// # Examples
///
/// ```
/// use cmdterm_core::config::get_pager_command;
/// use cmdterm_core::probe::StaticProbe;
///
/// let probe = StaticProbe::default().var("PAGER", "most -s");
/// assert_eq!(get_pager_command(&probe), Some(vec!["most".to_string(), "-s".to_string()]));
/// ```
pub fn get_pager_command(probe: &dyn EnvironmentProbe) -> Option<Vec<String>> {
    for variable in PAGER_VARIABLES {
        if let Some(command) = probe.var(variable) {
            let words = split_command(&shellexpand::tilde(&command));
            if !words.is_empty() {
                return Some(words);
            }
        }
    }

    FALLBACK_PAGERS
        .iter()
        .find_map(|pager| probe.find_executable(pager))
        .map(|path| vec![path.display().to_string()])
}

/// Resolves the roff formatter command, if one is installed.
pub fn get_formatter_command(probe: &dyn EnvironmentProbe) -> Option<Vec<String>> {
    FORMATTERS.iter().find_map(|(program, args)| {
        probe.find_executable(program).map(|path| {
            let mut command = vec![path.display().to_string()];
            command.extend(args.iter().map(ToString::to_string));
            command
        })
    })
}

/// Width to lay plain text out in, clamped to a readable range.
pub fn get_text_width(probe: &dyn EnvironmentProbe) -> usize {
    usize::from(
        probe
            .terminal_width()
            .filter(|width| *width > 0)
            .unwrap_or(DEFAULT_WIDTH)
            .clamp(MIN_WIDTH, MAX_WIDTH),
    )
}

fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::StaticProbe;
    use std::path::PathBuf;

    #[test]
    fn test_manpager_wins_over_pager() {
        let probe = StaticProbe::default()
            .var("MANPAGER", "most")
            .var("PAGER", "less -R");
        assert_eq!(get_pager_command(&probe), Some(vec!["most".to_string()]));
    }

    #[test]
    fn test_pager_variable_is_tilde_expanded() {
        let probe = StaticProbe::default().var("PAGER", "~/bin/pager");
        let command = get_pager_command(&probe).unwrap();
        assert!(!command[0].starts_with('~'));
        assert!(command[0].ends_with("bin/pager"));
    }

    #[test]
    fn test_blank_pager_variable_falls_through() {
        let probe = StaticProbe::default()
            .var("PAGER", "   ")
            .executable("more", "/usr/bin/more");
        assert_eq!(
            get_pager_command(&probe),
            Some(vec!["/usr/bin/more".to_string()])
        );
    }

    #[test]
    fn test_fallback_pager_prefers_less() {
        let probe = StaticProbe::default()
            .executable("more", "/usr/bin/more")
            .executable("less", "/usr/bin/less");
        assert_eq!(
            get_pager_command(&probe),
            Some(vec!["/usr/bin/less".to_string()])
        );
        assert_eq!(get_pager_command(&StaticProbe::default()), None);
    }

    #[test]
    fn test_formatter_prefers_groff() {
        let probe = StaticProbe::default()
            .executable("nroff", "/usr/bin/nroff")
            .executable("groff", "/usr/bin/groff");
        let command = get_formatter_command(&probe).unwrap();
        assert_eq!(PathBuf::from(&command[0]), PathBuf::from("/usr/bin/groff"));
        assert_eq!(&command[1..], &["-m", "man", "-T", "utf8"]);

        let nroff_only = StaticProbe::default().executable("nroff", "/usr/bin/nroff");
        assert_eq!(
            get_formatter_command(&nroff_only),
            Some(vec!["/usr/bin/nroff".to_string(), "-man".to_string()])
        );
    }

    #[test]
    fn test_text_width_is_clamped() {
        assert_eq!(get_text_width(&StaticProbe::default()), 80);
        assert_eq!(get_text_width(&StaticProbe::default().width(20)), 40);
        assert_eq!(get_text_width(&StaticProbe::default().width(300)), 120);
        assert_eq!(get_text_width(&StaticProbe::default().width(100)), 100);
    }

    #[test]
    fn test_default_eval_config() {
        assert_eq!(EvalConfig::default().help_default, HelpFormat::Pager);
    }
}
