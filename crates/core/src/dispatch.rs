//! Sub-command selection.

use log::debug;

use crate::cmdline::is_option;
use crate::context::{Command, Selection};
use crate::error::{alternatives, quote, Failure, Result};
use crate::suggest::{did_you_mean, suggestions};
use crate::trie::{Lookup, PrefixDict};

/// Message for a command name no choice answers to.
pub(crate) fn unknown_command(token: &str, names: &[String]) -> String {
    let found = suggestions(token, names.iter().map(String::as_str));
    if found.is_empty() && !names.is_empty() {
        format!(
            "unknown command {}, must be one of {}.",
            quote(token),
            alternatives(names)
        )
    } else {
        format!("unknown command {}.{}", quote(token), did_you_mean(&found))
    }
}

/// Chooses the command from the first argument, returning it with the
/// arguments left for that command.
///
/// With no arguments, or when the first one is an option, the main command
/// is chosen and keeps every argument. Otherwise the first argument must be
/// a choice's name or a prefix of exactly one.
///
/// # Errors
///
/// Returns a [`Failure::Usage`] when the first argument names no choice or
/// is ambiguous.
pub fn dispatch<'a>(
    main: &Command,
    choices: &[Command],
    args: &'a [String],
) -> Result<(Selection, &'a [String])> {
    let Some((first, rest)) = args.split_first() else {
        debug!("No arguments, selecting `{}`", main.name());
        return Ok((Selection::Main, args));
    };

    if is_option(first) {
        debug!("`{first}` is an option, selecting `{}`", main.name());
        return Ok((Selection::Main, args));
    }

    let index: PrefixDict<usize> = choices
        .iter()
        .enumerate()
        .map(|(position, choice)| (choice.name(), position))
        .collect();

    match index.lookup(first) {
        Lookup::Found(position) => {
            debug!("`{first}` selects command `{}`", choices[position].name());
            Ok((Selection::Choice(position), rest))
        }
        Lookup::Ambiguous(candidates) => Err(Failure::usage(format!(
            "command {} ambiguous and could be either {}",
            quote(first),
            alternatives(&candidates)
        ))),
        Lookup::NotFound => {
            let names: Vec<String> = index.names().map(ToString::to_string).collect();
            Err(Failure::usage(unknown_command(first, &names)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::TermInfo;

    fn command(name: &str) -> Command {
        Command::new(TermInfo::new(name), Vec::new())
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_no_arguments_selects_main() {
        let args = strings(&[]);
        let (selection, rest) = dispatch(&command("prog"), &[command("build")], &args).unwrap();
        assert_eq!(selection, Selection::Main);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_option_first_selects_main() {
        let args = strings(&["--verbose", "build"]);
        let (selection, rest) = dispatch(&command("prog"), &[command("build")], &args).unwrap();
        assert_eq!(selection, Selection::Main);
        assert_eq!(rest, &args[..]);
    }

    #[test]
    fn test_single_dash_is_not_an_option() {
        let args = strings(&["-"]);
        assert_eq!(
            dispatch(&command("prog"), &[command("build")], &args),
            Err(Failure::usage("unknown command `-', must be one of `build'."))
        );
    }

    #[test]
    fn test_prefix_selects_choice() {
        let choices = [command("build"), command("clean")];
        let args = strings(&["bui", "--flag"]);
        let (selection, rest) = dispatch(&command("prog"), &choices, &args).unwrap();
        assert_eq!(selection, Selection::Choice(0));
        assert_eq!(rest, &strings(&["--flag"])[..]);
    }

    #[test]
    fn test_ambiguous_prefix() {
        let choices = [command("bundle"), command("build")];
        let args = strings(&["bu"]);
        assert_eq!(
            dispatch(&command("prog"), &choices, &args),
            Err(Failure::usage(
                "command `bu' ambiguous and could be either `build' or `bundle'"
            ))
        );
    }

    #[test]
    fn test_exact_name_wins_over_longer_names() {
        let choices = [command("run"), command("runall")];
        let args = strings(&["run"]);
        let (selection, _) = dispatch(&command("prog"), &choices, &args).unwrap();
        assert_eq!(selection, Selection::Choice(0));
    }

    #[test]
    fn test_unknown_command_suggests() {
        let choices = [command("build"), command("clean")];
        let args = strings(&["bld"]);
        assert_eq!(
            dispatch(&command("prog"), &choices, &args),
            Err(Failure::usage("unknown command `bld'. Did you mean `build'?"))
        );
    }
}
