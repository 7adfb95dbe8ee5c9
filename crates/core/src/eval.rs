//! The evaluation engine.
//!
//! Evaluating a term parses the command line against the term's descriptors
//! plus the standard `--help` and `--version` options, interprets those
//! first, and only then runs the term. Help takes precedence over version,
//! version over the term itself.

use log::debug;

use crate::arg::{flag, vopt, ArgInfo, HELP_ID, VERSION_ID};
use crate::cmdline;
use crate::config::EvalConfig;
use crate::context::{Command, EvalContext, Selection};
use crate::dispatch::{dispatch, unknown_command};
use crate::error::{Failure, Result};
use crate::help::{help_format, HelpFormat};
use crate::info::TermInfo;
use crate::term::Term;

/// The standard options of a program.
pub struct StdOpts {
    help: Term<Option<HelpFormat>>,
    version: Option<Term<bool>>,
}

impl StdOpts {
    /// Standard options for a program whose main command is `main`.
    ///
    /// `--version` is only offered when `main` has a non-empty version.
    #[must_use]
    pub fn new(main: &TermInfo, config: &EvalConfig) -> Self {
        let section = main.sdocs_section();
        let help = vopt(
            help_format().some(),
            None,
            Some(config.help_default),
            ArgInfo::with_id(HELP_ID, &["help"])
                .docv("FMT")
                .docs(section)
                .doc(
                    "Show this help in format FMT. The value FMT must be one of `pager', \
                     `groff' or `plain'. With `pager', the manual page is shown through a \
                     pager if one is available.",
                ),
        );
        let version = main.version_str().map(|_| {
            flag(
                ArgInfo::with_id(VERSION_ID, &["version"])
                    .docs(section)
                    .doc("Show version information."),
            )
        });
        Self { help, version }
    }

    #[must_use]
    pub fn descriptors(&self) -> Vec<ArgInfo> {
        let mut descriptors = self.help.descriptors().to_vec();
        if let Some(version) = &self.version {
            descriptors.extend_from_slice(version.descriptors());
        }
        descriptors
    }

    /// Adds the standard options to every command of `ctx`.
    ///
    /// Commands that already carry them are left as they are, so injecting
    /// twice is the same as injecting once.
    #[must_use]
    pub fn inject(&self, ctx: &EvalContext) -> EvalContext {
        let descriptors = self.descriptors();
        ctx.map_commands(|command| command.with_args(&descriptors))
    }
}

/// The outcome of an evaluation and the context it was evaluated in.
pub struct Evaluation<A> {
    pub context: EvalContext,
    pub result: Result<A>,
}

fn run_term<A: 'static>(term: &Term<A>, std_opts: &StdOpts, ctx: &EvalContext, args: &[String]) -> Result<A> {
    let line = cmdline::parse(ctx.command().args(), args)?;

    if let Some(format) = std_opts.help.eval(ctx, &line)? {
        let target = (!ctx.is_main()).then(|| ctx.command().name().to_string());
        debug!("Help requested in `{format}` format for {target:?}");
        return Err(Failure::help(format, target));
    }

    if let Some(version) = &std_opts.version {
        if version.eval(ctx, &line)? {
            debug!("Version requested");
            return Err(Failure::Version);
        }
    }

    term.eval(ctx, &line)
}

/// Evaluates `term` in `ctx` after injecting the standard options.
pub fn eval_term<A: 'static>(
    term: &Term<A>,
    ctx: &EvalContext,
    args: &[String],
    config: &EvalConfig,
) -> Evaluation<A> {
    let std_opts = StdOpts::new(ctx.main_command().info(), config);
    let context = std_opts.inject(ctx);
    let result = run_term(term, &std_opts, &context, args);
    Evaluation { context, result }
}

/// Evaluates a single-term program with the default configuration.
///
/// # Errors
///
/// Returns the [`Failure`] that ended the evaluation: a usage or message
/// error, or a help or version request.
pub fn evaluate<A: 'static>(term: &Term<A>, info: &TermInfo, args: &[String]) -> Result<A> {
    evaluate_with(term, info, args, &EvalConfig::default()).result
}

/// Evaluates a single-term program.
pub fn evaluate_with<A: 'static>(
    term: &Term<A>,
    info: &TermInfo,
    args: &[String],
    config: &EvalConfig,
) -> Evaluation<A> {
    let main = Command::new(info.clone(), term.descriptors().to_vec());
    eval_term(term, &EvalContext::single(main), args, config)
}

/// Evaluates a program made of a main term and named sub-commands.
///
/// The first argument selects the sub-command (see [`dispatch`]); the rest
/// is evaluated by the selected term.
pub fn evaluate_choices<A: 'static>(
    main: (&Term<A>, &TermInfo),
    choices: &[(Term<A>, TermInfo)],
    args: &[String],
    config: &EvalConfig,
) -> Evaluation<A> {
    let (main_term, main_info) = main;
    let main_command = Command::new(main_info.clone(), main_term.descriptors().to_vec());
    let commands: Vec<Command> = choices
        .iter()
        .map(|(term, info)| Command::new(info.clone(), term.descriptors().to_vec()))
        .collect();
    let ctx = EvalContext::new(main_command.clone(), commands.clone());

    match dispatch(&main_command, &commands, args) {
        Ok((Selection::Main, rest)) => eval_term(main_term, &ctx, rest, config),
        Ok((Selection::Choice(index), rest)) => {
            eval_term(&choices[index].0, &ctx.focus(Selection::Choice(index)), rest, config)
        }
        Err(failure) => Evaluation {
            context: StdOpts::new(main_info, config).inject(&ctx),
            result: Err(failure),
        },
    }
}

/// The context whose help a help request asks for.
///
/// No target means the command of `ctx`; a target is looked up by exact
/// name among the choices, then the main command.
///
/// # Errors
///
/// Returns a [`Failure::Usage`] naming the target when no command has that
/// name.
pub fn help_context(ctx: &EvalContext, target: Option<&str>) -> Result<EvalContext> {
    let Some(name) = target else {
        return Ok(ctx.clone());
    };

    match ctx.find(name) {
        Some(selection) => Ok(ctx.focus(selection)),
        None => {
            let names: Vec<String> = ctx
                .choices()
                .iter()
                .map(|choice| choice.name().to_string())
                .collect();
            Err(Failure::usage(unknown_command(name, &names)))
        }
    }
}
