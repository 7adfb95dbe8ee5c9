//! Programs: evaluation followed by presentation of the outcome.

use std::io::{stderr, stdout, Write};

use log::{debug, error};

use crate::config::{exit, EvalConfig};
use crate::context::{EvalContext, Selection};
use crate::error::{Failure, RenderResult, Result};
use crate::eval::{evaluate_choices, evaluate_with, help_context, Evaluation};
use crate::help::{self, HelpFormat};
use crate::info::TermInfo;
use crate::probe::{EnvironmentProbe, SystemProbe};
use crate::term::Term;

/// What running a program amounted to, once presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<A> {
    /// The term computed a value; presenting it is up to the caller.
    Value(A),
    Help,
    Version,
    UsageError,
    MessageError,
    /// The outcome could not be presented, e.g. a stream was closed.
    InternalError,
}

impl<A> Outcome<A> {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Value(_) | Outcome::Help | Outcome::Version => exit::OK,
            Outcome::MessageError => exit::SOME_ERROR,
            Outcome::UsageError => exit::CLI_ERROR,
            Outcome::InternalError => exit::INTERNAL_ERROR,
        }
    }

    #[must_use]
    pub fn value(self) -> Option<A> {
        match self {
            Outcome::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// A main term, optionally with named sub-commands.
///
/// ```
/// use cmdterm_core::arg::{flag, ArgInfo};
/// use cmdterm_core::info::TermInfo;
/// use cmdterm_core::run::Program;
///
/// let program = Program::new(flag(ArgInfo::new(&["q", "quiet"])), TermInfo::new("prog"));
/// assert_eq!(program.evaluate(&["-q".to_string()]), Ok(true));
/// ```
pub struct Program<A> {
    term: Term<A>,
    info: TermInfo,
    choices: Vec<(Term<A>, TermInfo)>,
    config: EvalConfig,
}

impl<A: 'static> Program<A> {
    #[must_use]
    pub fn new(term: Term<A>, info: TermInfo) -> Self {
        Self {
            term,
            info,
            choices: Vec::new(),
            config: EvalConfig::default(),
        }
    }

    /// Adds a sub-command.
    #[must_use]
    pub fn choice(mut self, term: Term<A>, info: TermInfo) -> Self {
        self.choices.push((term, info));
        self
    }

    /// Format used by a bare `--help`.
    #[must_use]
    pub fn help_default(mut self, format: HelpFormat) -> Self {
        self.config.help_default = format;
        self
    }

    fn evaluation(&self, args: &[String]) -> Evaluation<A> {
        if self.choices.is_empty() {
            evaluate_with(&self.term, &self.info, args, &self.config)
        } else {
            evaluate_choices((&self.term, &self.info), &self.choices, args, &self.config)
        }
    }

    /// Evaluates the program without presenting anything.
    ///
    /// # Errors
    ///
    /// Returns the [`Failure`] that ended the evaluation.
    pub fn evaluate(&self, args: &[String]) -> Result<A> {
        self.evaluation(args).result
    }

    /// Evaluates the program and presents non-value outcomes: help and
    /// version to `out`, errors to `err`.
    pub fn run_with(
        &self,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
        probe: &dyn EnvironmentProbe,
    ) -> Outcome<A> {
        let Evaluation { context, result } = self.evaluation(args);

        match present(&context, result, out, err, probe) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Could not present the outcome: {e}");
                // Nothing more can be done if the error stream is gone too.
                let _ = writeln!(err, "{}: internal error, {e}", self.info.name());
                Outcome::InternalError
            }
        }
    }

    /// Runs the program over the process arguments and standard streams.
    pub fn run(&self) -> Outcome<A> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let outcome = self.run_with(&args, &mut stdout().lock(), &mut stderr().lock(), &SystemProbe);
        if let Err(e) = stdout().flush() {
            error!("Could not flush standard output: {e}");
            return Outcome::InternalError;
        }
        outcome
    }
}

fn present<A>(
    context: &EvalContext,
    result: Result<A>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    probe: &dyn EnvironmentProbe,
) -> RenderResult<Outcome<A>> {
    let failure = match result {
        Ok(value) => return Ok(Outcome::Value(value)),
        Err(failure) => failure,
    };
    debug!("Presenting {failure:?}");

    match failure {
        Failure::Help { format, target } => match help_context(context, target.as_deref()) {
            Ok(target) => {
                help::print_help(format, &target, out, probe)?;
                Ok(Outcome::Help)
            }
            Err(unknown) => {
                let main = context.focus(Selection::Main);
                help::write_usage_error(err, &main, &unknown.to_string())?;
                Ok(Outcome::UsageError)
            }
        },
        Failure::Version => {
            help::write_version(out, context)?;
            Ok(Outcome::Version)
        }
        Failure::Usage(doc) => {
            help::write_usage_error(err, context, &doc)?;
            Ok(Outcome::UsageError)
        }
        Failure::Message(doc) => {
            help::write_message_error(err, context, &doc)?;
            Ok(Outcome::MessageError)
        }
    }
}
