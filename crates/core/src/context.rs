//! Evaluation-time metadata.

use crate::arg::ArgInfo;
use crate::info::TermInfo;

/// A command as seen by the engine: its identity and its descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    info: TermInfo,
    args: Vec<ArgInfo>,
}

impl Command {
    #[must_use]
    pub fn new(info: TermInfo, args: Vec<ArgInfo>) -> Self {
        Self { info, args }
    }

    #[must_use]
    pub fn info(&self) -> &TermInfo {
        &self.info
    }

    #[must_use]
    pub fn args(&self) -> &[ArgInfo] {
        &self.args
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.info.name()
    }

    /// A copy with `extra` appended, skipping descriptors already present.
    #[must_use]
    pub fn with_args(&self, extra: &[ArgInfo]) -> Self {
        let mut args = self.args.clone();
        for info in extra {
            if !args.iter().any(|existing| existing.id() == info.id()) {
                args.push(info.clone());
            }
        }
        Self::new(self.info.clone(), args)
    }
}

/// Which of a program's commands an evaluation is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Main,
    /// Index into the program's choices.
    Choice(usize),
}

/// The program's main command, the sub-commands, and which of them is
/// being evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalContext {
    selection: Selection,
    main: Command,
    choices: Vec<Command>,
}

impl EvalContext {
    /// Context focused on the main command.
    #[must_use]
    pub fn new(main: Command, choices: Vec<Command>) -> Self {
        Self {
            selection: Selection::Main,
            main,
            choices,
        }
    }

    /// Context of a program made of a single term.
    #[must_use]
    pub fn single(command: Command) -> Self {
        Self::new(command, Vec::new())
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The command being evaluated.
    #[must_use]
    pub fn command(&self) -> &Command {
        match self.selection {
            Selection::Main => &self.main,
            Selection::Choice(index) => self.choices.get(index).unwrap_or(&self.main),
        }
    }

    #[must_use]
    pub fn main_command(&self) -> &Command {
        &self.main
    }

    #[must_use]
    pub fn choices(&self) -> &[Command] {
        &self.choices
    }

    #[must_use]
    pub fn is_main(&self) -> bool {
        self.selection == Selection::Main
    }

    /// Looks a command up by exact name. Choices are searched before the
    /// main command, so a choice named like the program is still found.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Selection> {
        if let Some(index) = self.choices.iter().position(|choice| choice.name() == name) {
            return Some(Selection::Choice(index));
        }
        (self.main.name() == name).then_some(Selection::Main)
    }

    /// The same context focused on another command. A choice index out of
    /// range focuses the main command.
    #[must_use]
    pub fn focus(&self, selection: Selection) -> Self {
        let selection = match selection {
            Selection::Choice(index) if index >= self.choices.len() => Selection::Main,
            other => other,
        };
        Self {
            selection,
            main: self.main.clone(),
            choices: self.choices.clone(),
        }
    }

    /// A new context with every command mapped through `f`, keeping the
    /// focus.
    #[must_use]
    pub fn map_commands(&self, f: impl Fn(&Command) -> Command) -> Self {
        Self {
            selection: self.selection,
            main: f(&self.main),
            choices: self.choices.iter().map(&f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(name: &str) -> Command {
        Command::new(TermInfo::new(name), vec![ArgInfo::new(&["x"])])
    }

    #[test]
    fn test_single_is_main() {
        let ctx = EvalContext::single(command("prog"));
        assert!(ctx.is_main());
        assert!(ctx.choices().is_empty());
        assert_eq!(ctx.main_command(), ctx.command());
    }

    #[test]
    fn test_find_and_focus() {
        let ctx = EvalContext::new(command("prog"), vec![command("build"), command("clean")]);
        assert_eq!(ctx.find("clean"), Some(Selection::Choice(1)));
        assert_eq!(ctx.find("prog"), Some(Selection::Main));
        assert!(ctx.find("cle").is_none());

        let focused = ctx.focus(Selection::Choice(0));
        assert!(!focused.is_main());
        assert_eq!(focused.command().name(), "build");
        assert_eq!(focused.choices().len(), 2);
        assert!(focused.focus(Selection::Main).is_main());
        assert!(ctx.focus(Selection::Choice(7)).is_main());
    }

    #[test]
    fn test_choice_named_like_program_is_not_main() {
        let ctx = EvalContext::new(command("git"), vec![command("git")]);
        assert_eq!(ctx.find("git"), Some(Selection::Choice(0)));

        let focused = ctx.focus(Selection::Choice(0));
        assert!(!focused.is_main());
        assert_eq!(focused.selection(), Selection::Choice(0));
    }

    #[test]
    fn test_with_args_skips_known_ids() {
        let extra = ArgInfo::new(&["help"]);
        let once = command("prog").with_args(&[extra.clone()]);
        let twice = once.with_args(&[extra]);
        assert_eq!(once.args().len(), 2);
        assert_eq!(twice.args(), once.args());
    }

    #[test]
    fn test_map_commands_keeps_focus_and_original() {
        let ctx = EvalContext::new(command("prog"), vec![command("build")]).focus(Selection::Choice(0));
        let extra = ArgInfo::new(&["help"]);
        let mapped = ctx.map_commands(|cmd| cmd.with_args(&[extra.clone()]));
        assert_eq!(mapped.selection(), Selection::Choice(0));
        assert_eq!(mapped.command().args().len(), 2);
        assert_eq!(mapped.main_command().args().len(), 2);
        assert_eq!(ctx.command().args().len(), 1);
        assert_eq!(ctx.choices()[0].args().len(), 1);
    }
}
