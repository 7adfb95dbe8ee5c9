//! Help formats and the presentation of outcomes.
//!
//! The engine only classifies outcomes; the functions here write them out:
//! help pages to the output stream (possibly through a pager), usage and
//! message errors to the error stream.

use std::fmt::{Display, Formatter};
use std::io::Write;
use std::str::FromStr;

use log::debug;

use crate::arg::{opt, ArgInfo};
use crate::config;
use crate::context::EvalContext;
use crate::conv::{enumeration, Converter};
use crate::error::RenderResult;
use crate::manpage::{self, ManPage};
use crate::pager::{self, PagerPlan};
use crate::probe::EnvironmentProbe;
use crate::term::Term;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelpFormat {
    /// Formatted manual page shown through a pager, plain text if none.
    Pager,
    Plain,
    /// Raw roff source.
    Groff,
}

const FORMATS: [(&str, HelpFormat); 3] = [
    ("pager", HelpFormat::Pager),
    ("plain", HelpFormat::Plain),
    ("groff", HelpFormat::Groff),
];

impl Display for HelpFormat {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let name = FORMATS
            .iter()
            .find(|(_, format)| format == self)
            .map_or("pager", |(name, _)| *name);
        formatter.write_str(name)
    }
}

impl FromStr for HelpFormat {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        help_format().parse(raw)
    }
}

/// Converter for `pager`, `plain` and `groff`.
#[must_use]
pub fn help_format() -> Converter<HelpFormat> {
    enumeration(&FORMATS).with_docv("FMT")
}

/// A `--man-format` option, for terms that request help themselves.
#[must_use]
pub fn man_format() -> Term<HelpFormat> {
    opt(
        help_format(),
        HelpFormat::Pager,
        ArgInfo::new(&["man-format"])
            .docv("FMT")
            .doc("Show output in format FMT. The value FMT must be one of `pager', `plain' or `groff'."),
    )
}

/// Writes the help page of `ctx`'s command in `format`.
///
/// # Errors
///
/// Returns an error when the output cannot be written.
pub fn print_help(
    format: HelpFormat,
    ctx: &EvalContext,
    out: &mut dyn Write,
    probe: &dyn EnvironmentProbe,
) -> RenderResult<()> {
    let page = manpage::build(ctx);
    let width = config::get_text_width(probe);

    match format {
        HelpFormat::Plain => out.write_all(page.to_plain(width).as_bytes())?,
        HelpFormat::Groff => out.write_all(page.to_groff().as_bytes())?,
        HelpFormat::Pager => {
            let plan = pager::plan(probe);
            debug!("Paging help for `{}` with {:?}", page.title(), plan);
            show_paged(&page, &plan, width, out)?;
        }
    }

    Ok(())
}

fn show_paged(page: &ManPage, plan: &PagerPlan, width: usize, out: &mut dyn Write) -> RenderResult<()> {
    let plain = page.to_plain(width);
    match plan {
        PagerPlan::Direct => out.write_all(plain.as_bytes())?,
        PagerPlan::Plain { pager } => pager::page_or_write(&[pager.as_slice()], &plain, &plain, out)?,
        PagerPlan::Groff { formatter, pager } => {
            pager::page_or_write(
                &[formatter.as_slice(), pager.as_slice()],
                &page.to_groff(),
                &plain,
                out,
            )?;
        }
    }
    Ok(())
}

/// The error stream report of a usage failure.
///
/// # Errors
///
/// Returns an error when the stream cannot be written.
pub fn write_usage_error(err: &mut dyn Write, ctx: &EvalContext, doc: &str) -> RenderResult<()> {
    let main = ctx.main_command().name();
    let invocation = if ctx.is_main() {
        main.to_string()
    } else {
        format!("{main} {}", ctx.command().name())
    };
    writeln!(err, "{main}: {doc}")?;
    writeln!(err, "Usage: {}", manpage::synopsis(ctx))?;
    writeln!(err, "Try `{invocation} --help' for more information.")?;
    Ok(())
}

/// The error stream report of an error message from term logic.
///
/// # Errors
///
/// Returns an error when the stream cannot be written.
pub fn write_message_error(err: &mut dyn Write, ctx: &EvalContext, doc: &str) -> RenderResult<()> {
    writeln!(err, "{}: {doc}", ctx.main_command().name())?;
    Ok(())
}

/// # Errors
///
/// Returns an error when the stream cannot be written.
pub fn write_version(out: &mut dyn Write, ctx: &EvalContext) -> RenderResult<()> {
    let version = ctx.main_command().info().version_str().unwrap_or_default();
    writeln!(out, "{version}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Command, Selection};
    use crate::info::TermInfo;
    use crate::probe::StaticProbe;

    fn context() -> EvalContext {
        let main = Command::new(TermInfo::new("prog").version("1.4.2").doc("Do things"), Vec::new());
        let build = Command::new(TermInfo::new("build").doc("Build things"), Vec::new());
        EvalContext::new(main, vec![build])
    }

    #[test]
    fn test_format_names() {
        assert_eq!(HelpFormat::Groff.to_string(), "groff");
        assert_eq!("plain".parse::<HelpFormat>(), Ok(HelpFormat::Plain));
        assert_eq!("pa".parse::<HelpFormat>(), Ok(HelpFormat::Pager));
        assert_eq!(
            "html".parse::<HelpFormat>(),
            Err("invalid value `html', expected one of `groff', `pager' or `plain'".to_string())
        );
    }

    #[test]
    fn test_plain_help() {
        let mut out = Vec::new();
        print_help(HelpFormat::Plain, &context(), &mut out, &StaticProbe::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("NAME\n"));
        assert!(text.contains("prog - Do things"));
        assert!(text.contains("build"));
    }

    #[test]
    fn test_groff_help() {
        let mut out = Vec::new();
        print_help(HelpFormat::Groff, &context(), &mut out, &StaticProbe::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(".TH \"PROG\" 1"));
        assert!(text.contains(".SH NAME"));
    }

    #[test]
    fn test_pager_without_terminal_writes_plain() {
        let probe = StaticProbe::default().executable("less", "/usr/bin/less");
        let mut paged = Vec::new();
        let mut plain = Vec::new();
        print_help(HelpFormat::Pager, &context(), &mut paged, &probe).unwrap();
        print_help(HelpFormat::Plain, &context(), &mut plain, &probe).unwrap();
        assert_eq!(paged, plain);
    }

    #[test]
    fn test_usage_error_report() {
        let mut err = Vec::new();
        write_usage_error(&mut err, &context(), "unknown option `--x'.").unwrap();
        let text = String::from_utf8(err).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "prog: unknown option `--x'.");
        assert!(lines[1].starts_with("Usage: prog"));
        assert_eq!(lines[2], "Try `prog --help' for more information.");
    }

    #[test]
    fn test_usage_error_names_sub_command() {
        let ctx = context();
        let mut err = Vec::new();
        write_usage_error(&mut err, &ctx.focus(Selection::Choice(0)), "bad").unwrap();
        let text = String::from_utf8(err).unwrap();
        assert!(text.contains("Usage: prog build"));
        assert!(text.contains("Try `prog build --help'"));
    }

    #[test]
    fn test_message_and_version() {
        let mut err = Vec::new();
        write_message_error(&mut err, &context(), "no input").unwrap();
        assert_eq!(String::from_utf8(err).unwrap(), "prog: no input\n");

        let mut out = Vec::new();
        write_version(&mut out, &context()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1.4.2\n");
    }
}
