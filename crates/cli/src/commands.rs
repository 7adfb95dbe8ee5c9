//! The `ct` program, assembled from cmdterm terms.

use cmdterm_core::arg::{flag, opt, pos, pos_all, ArgInfo};
use cmdterm_core::conv::{float, string, uint};
use cmdterm_core::help::man_format;
use cmdterm_core::term::{main_name, map2, map3, Term};
use cmdterm_core::{Failure, HelpFormat, ManBlock, Program, TermInfo};

use crate::stats::{Job, Statistic};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Section listing the options every statistic accepts.
pub const COMMON_OPTIONS: &str = "COMMON OPTIONS";

const DEFAULT_PRECISION: usize = 2;

fn common() -> Term<(usize, bool)> {
    let precision = opt(
        uint(),
        DEFAULT_PRECISION,
        ArgInfo::new(&["p", "precision"])
            .docv("DIGITS")
            .doc("Print the result with DIGITS digits after the decimal point.")
            .docs(COMMON_OPTIONS),
    );
    let verbose = flag(
        ArgInfo::new(&["v", "verbose"])
            .doc("Describe the computation instead of printing the bare number.")
            .docs(COMMON_OPTIONS),
    );
    precision.zip(verbose)
}

fn numbers() -> Term<Vec<f64>> {
    pos_all(
        float(),
        Vec::new(),
        ArgInfo::new(&[]).docv("NUMBER").doc("The numbers to summarise."),
    )
}

fn statistic(statistic: Statistic) -> Term<Job> {
    map2(common(), numbers(), move |(precision, verbose), numbers| Job {
        statistic,
        numbers,
        precision,
        verbose,
    })
    .try_map(|job| {
        if job.numbers.is_empty() && !job.statistic.allows_empty() {
            Err(Failure::message(format!(
                "the {} of no numbers is undefined",
                job.statistic
            )))
        } else {
            Ok(job)
        }
    })
}

fn statistic_info(statistic: Statistic, doc: &str) -> TermInfo {
    TermInfo::new(statistic.name())
        .doc(doc)
        .sdocs(COMMON_OPTIONS)
        .man(vec![
            ManBlock::section("EXAMPLES"),
            ManBlock::pre("{mname} {tname} 1 2.5 -p 1"),
        ])
}

fn help() -> Term<Job> {
    let topic = pos(
        0,
        string().some(),
        None,
        ArgInfo::new(&[]).docv("COMMAND").doc("The command to describe."),
    );
    map3(man_format(), topic, main_name(), |format, topic, main| {
        Err::<Job, _>(Failure::help(format, Some(topic.unwrap_or(main))))
    })
    .ret()
}

/// The `ct` program: `sum`, `mean`, `max` and `help`.
///
/// Without a command, `ct` shows its manual page.
#[must_use]
pub fn program() -> Program<Job> {
    let main = Term::pure(Err::<Job, _>(Failure::help(HelpFormat::Pager, None))).ret();
    let info = TermInfo::new("ct")
        .version(VERSION)
        .doc("Summarise numbers")
        .sdocs(COMMON_OPTIONS)
        .man(vec![
            ManBlock::paragraph("{mname} computes simple statistics over the numbers given as arguments."),
            ManBlock::paragraph("Use `{mname} help COMMAND' for the manual of a command."),
            ManBlock::section("EXIT STATUS"),
            ManBlock::item("0", "on success."),
            ManBlock::item("123", "when a statistic is undefined for the numbers given."),
            ManBlock::item("124", "on command line parsing errors."),
            ManBlock::item("125", "on unexpected internal errors."),
        ]);

    Program::new(main, info)
        .choice(statistic(Statistic::Sum), statistic_info(Statistic::Sum, "Add numbers up"))
        .choice(statistic(Statistic::Mean), statistic_info(Statistic::Mean, "Average numbers"))
        .choice(statistic(Statistic::Max), statistic_info(Statistic::Max, "Find the largest number"))
        .choice(help(), TermInfo::new("help").doc("Show the manual of {mname} or of a command"))
}
