//! The manual page of a command, rendered as plain text or roff.
//!
//! A [`ManPage`] is a list of [`ManBlock`]s built from the evaluation
//! context: generated sections (NAME, SYNOPSIS, commands, arguments and
//! options) merged with the sections the command's [`TermInfo`] supplies.
//!
//! [`TermInfo`]: crate::info::TermInfo

use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;
use leon::Template;
use log::debug;

use crate::arg::{ArgInfo, ArgKind};
use crate::context::EvalContext;
use crate::info::ManBlock;

const INDENT: usize = 7;
const ITEM_INDENT: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManPage {
    title: String,
    source: String,
    blocks: Vec<ManBlock>,
}

/// The invocation of the context's command, e.g. `prog build`.
fn invocation(ctx: &EvalContext) -> String {
    if ctx.is_main() {
        ctx.main_command().name().to_string()
    } else {
        format!("{} {}", ctx.main_command().name(), ctx.command().name())
    }
}

/// Expands `{tname}` and `{mname}` in a documentation string.
///
/// Docs are free text: one that is not a well-formed template, or that
/// names other variables, keeps every other character as written.
fn expand(text: &str, values: &HashMap<&str, &str>) -> String {
    if !text.contains(['{', '\\']) {
        return text.to_string();
    }
    let rendered = Template::parse(text)
        .map_err(|e| e.to_string())
        .and_then(|template| template.render(values).map_err(|e| e.to_string()));
    match rendered {
        Ok(text) => text,
        Err(reason) => {
            debug!("Documentation taken verbatim ({reason}): {text:?}");
            values.iter().fold(text.to_string(), |text, (key, value)| {
                text.replace(&format!("{{{key}}}"), value)
            })
        }
    }
}

fn positional_label(info: &ArgInfo) -> String {
    info.docv_str().to_string()
}

fn option_label(info: &ArgInfo) -> String {
    let docv = info.docv_str();
    info.names()
        .iter()
        .map(|name| {
            let long = name.starts_with("--");
            match (info.kind(), long) {
                (ArgKind::Opt { vopt: None }, true) => format!("{name}={docv}"),
                (ArgKind::Opt { vopt: None }, false) => format!("{name} {docv}"),
                (ArgKind::Opt { vopt: Some(_) }, true) => format!("{name}[={docv}]"),
                (ArgKind::Opt { vopt: Some(_) }, false) => format!("{name}[{docv}]"),
                _ => name.clone(),
            }
        })
        .join(", ")
}

fn annotated_doc(info: &ArgInfo, values: &HashMap<&str, &str>) -> String {
    let mut doc = expand(info.doc_str(), values);
    let note = if info.is_required() {
        Some("(required)".to_string())
    } else {
        info.absent().map(|absent| format!("(absent={absent})"))
    };
    if let Some(note) = note {
        if !doc.is_empty() {
            doc.push(' ');
        }
        doc.push_str(&note);
    }
    doc
}

fn option_sort_key(info: &ArgInfo) -> String {
    info.names()
        .first()
        .map(|name| name.trim_start_matches('-').to_lowercase())
        .unwrap_or_default()
}

/// The one line usage of the context's command.
///
/// Optional positionals are bracketed, lists are followed by an ellipsis.
#[must_use]
pub fn synopsis(ctx: &EvalContext) -> String {
    let mut parts = vec![invocation(ctx)];
    let args = ctx.command().args();

    if ctx.is_main() && !ctx.choices().is_empty() {
        parts.push("[COMMAND]".to_string());
    }
    if args.iter().any(|info| !info.is_positional()) {
        parts.push("[OPTION]…".to_string());
    }

    let positionals = args
        .iter()
        .filter_map(|info| match info.kind() {
            ArgKind::Pos(kind) => Some((*kind, info)),
            _ => None,
        })
        .sorted_by_key(|(kind, _)| kind.synopsis_key());
    for (kind, info) in positionals {
        let ellipsis = if kind.is_list() { "…" } else { "" };
        if info.is_required() {
            parts.push(format!("{}{ellipsis}", info.docv_str()));
        } else {
            parts.push(format!("[{}]{ellipsis}", info.docv_str()));
        }
    }

    parts.join(" ")
}

/// Builds the manual page of the context's command.
#[must_use]
pub fn build(ctx: &EvalContext) -> ManPage {
    let command = ctx.command();
    let main = ctx.main_command();
    let values = HashMap::from([("tname", command.name()), ("mname", main.name())]);

    let title = invocation(ctx);
    let mut sections: IndexMap<String, Vec<ManBlock>> = IndexMap::new();

    let doc = expand(command.info().doc_str(), &values);
    let name_line = if doc.is_empty() {
        title.clone()
    } else {
        format!("{title} - {doc}")
    };
    sections.insert("NAME".to_string(), vec![ManBlock::Paragraph(name_line)]);
    sections.insert("SYNOPSIS".to_string(), vec![ManBlock::Paragraph(synopsis(ctx))]);

    // User blocks before the first section describe the command.
    let mut current = "DESCRIPTION".to_string();
    let mut user: IndexMap<String, Vec<ManBlock>> = IndexMap::new();
    for block in command.info().man_blocks() {
        let block = match block {
            ManBlock::Section(title) => {
                current = title.clone();
                user.entry(current.clone()).or_default();
                continue;
            }
            ManBlock::Paragraph(text) => ManBlock::Paragraph(expand(text, &values)),
            ManBlock::Pre(text) => ManBlock::Pre(expand(text, &values)),
            ManBlock::Item { label, text } => ManBlock::item(expand(label, &values), expand(text, &values)),
            ManBlock::NoBlank => ManBlock::NoBlank,
        };
        user.entry(current.clone()).or_default().push(block);
    }
    if let Some(description) = user.shift_remove("DESCRIPTION") {
        sections.insert("DESCRIPTION".to_string(), description);
    }

    if ctx.is_main() {
        for choice in ctx.choices() {
            let text = expand(choice.info().doc_str(), &values);
            sections
                .entry(choice.info().docs_section().to_string())
                .or_default()
                .push(ManBlock::item(choice.name(), text));
        }
    }

    let (positionals, options): (Vec<&ArgInfo>, Vec<&ArgInfo>) =
        command.args().iter().partition(|info| info.is_positional());
    for info in positionals {
        sections
            .entry(info.docs_section().to_string())
            .or_default()
            .push(ManBlock::item(positional_label(info), annotated_doc(info, &values)));
    }
    for info in options.into_iter().sorted_by_key(|info| option_sort_key(info)) {
        sections
            .entry(info.docs_section().to_string())
            .or_default()
            .push(ManBlock::item(option_label(info), annotated_doc(info, &values)));
    }

    for (title, blocks) in user {
        sections.entry(title).or_default().extend(blocks);
    }

    let source = match main.info().version_str() {
        Some(version) => {
            sections.insert(
                "VERSION".to_string(),
                vec![ManBlock::Paragraph(format!("{} {version}", main.name()))],
            );
            format!("{} {version}", main.name())
        }
        None => main.name().to_string(),
    };

    let blocks = sections
        .into_iter()
        .flat_map(|(title, blocks)| std::iter::once(ManBlock::Section(title)).chain(blocks))
        .collect();

    ManPage {
        title,
        source,
        blocks,
    }
}

fn wrap(text: &str, indent: usize, width: usize) -> Vec<String> {
    let available = width.saturating_sub(indent).max(20);
    let padding = " ".repeat(indent);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > available {
            lines.push(format!("{padding}{line}"));
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(format!("{padding}{line}"));
    }
    lines
}

fn escape_groff(text: &str) -> String {
    let escaped = text.replace('\\', "\\e").replace('-', "\\-");
    if escaped.starts_with(['.', '\'']) {
        format!("\\&{escaped}")
    } else {
        escaped
    }
}

impl ManPage {
    /// The command invocation the page documents, e.g. `prog build`.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn blocks(&self) -> &[ManBlock] {
        &self.blocks
    }

    /// Renders the page as plain text laid out for `width` columns.
    #[must_use]
    pub fn to_plain(&self, width: usize) -> String {
        let mut out = String::new();
        let mut separate = false;

        for block in &self.blocks {
            let lines = match block {
                ManBlock::Section(title) => {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(title);
                    out.push('\n');
                    separate = false;
                    continue;
                }
                ManBlock::NoBlank => {
                    separate = false;
                    continue;
                }
                ManBlock::Paragraph(text) => wrap(text, INDENT, width),
                ManBlock::Pre(text) => text
                    .lines()
                    .map(|line| format!("{}{line}", " ".repeat(INDENT)))
                    .collect(),
                ManBlock::Item { label, text } => std::iter::once(format!("{}{label}", " ".repeat(INDENT)))
                    .chain(wrap(text, ITEM_INDENT, width))
                    .collect(),
            };

            if separate {
                out.push('\n');
            }
            for line in lines {
                out.push_str(&line);
                out.push('\n');
            }
            separate = true;
        }

        out
    }

    /// Renders the page as roff source for the `man` macros.
    #[must_use]
    pub fn to_groff(&self) -> String {
        let title = self.title.replace(' ', "-").to_uppercase();
        let mut out = vec![format!(
            ".TH \"{title}\" 1 \"\" \"{}\" \"{} Manual\"",
            escape_groff(&self.source),
            escape_groff(&self.title)
        )];

        let mut pending_space = false;
        for block in &self.blocks {
            match block {
                ManBlock::Section(title) => {
                    out.push(format!(".SH {}", escape_groff(title)));
                    pending_space = false;
                    continue;
                }
                ManBlock::NoBlank => {
                    pending_space = false;
                    continue;
                }
                _ => {}
            }
            if pending_space {
                out.push(".PP".to_string());
            }
            match block {
                ManBlock::Paragraph(text) => out.push(escape_groff(text)),
                ManBlock::Pre(text) => {
                    out.push(".nf".to_string());
                    out.extend(text.lines().map(escape_groff));
                    out.push(".fi".to_string());
                }
                ManBlock::Item { label, text } => {
                    out.push(".TP 4".to_string());
                    out.push(format!("\\fB{}\\fR", escape_groff(label)));
                    out.push(escape_groff(text));
                    pending_space = false;
                    continue;
                }
                ManBlock::Section(_) | ManBlock::NoBlank => {}
            }
            pending_space = true;
        }

        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::{flag, opt, pos_all, required, vopt};
    use crate::context::{Command, Selection};
    use crate::conv::{int, string};
    use crate::info::TermInfo;
    use crate::term::Term;

    fn args<A: 'static>(term: &Term<A>) -> Vec<ArgInfo> {
        term.descriptors().to_vec()
    }

    fn build_context() -> EvalContext {
        let files = pos_all(string(), vec![], ArgInfo::new(&[]).docv("FILE").doc("Files to build."));
        let jobs = opt(int(), 1, ArgInfo::new(&["j", "jobs"]).doc("Run {tname} with N jobs.").docv("N"));
        let mut descriptors = args(&files);
        descriptors.extend(args(&jobs));

        let main = Command::new(TermInfo::new("prog").version("2.0").doc("A {mname} tool"), Vec::new());
        let build = Command::new(
            TermInfo::new("build").doc("Build things").man(vec![
                ManBlock::paragraph("{mname} {tname} compiles files."),
                ManBlock::section("EXAMPLES"),
                ManBlock::pre("prog build a.c"),
            ]),
            descriptors,
        );
        EvalContext::new(main, vec![build]).focus(Selection::Choice(0))
    }

    #[test]
    fn test_synopsis() {
        let ctx = build_context();
        assert_eq!(synopsis(&ctx), "prog build [OPTION]… [FILE]…");

        let main = ctx.focus(Selection::Main);
        assert_eq!(synopsis(&main), "prog [COMMAND]");
    }

    #[test]
    fn test_synopsis_required_positional() {
        let file = required(crate::arg::pos(0, string().some(), None, ArgInfo::new(&[]).docv("SRC")));
        let ctx = EvalContext::single(Command::new(TermInfo::new("cp"), args(&file)));
        assert_eq!(synopsis(&ctx), "cp SRC");
    }

    #[test]
    fn test_option_labels() {
        let verbose = flag(ArgInfo::new(&["v", "verbose"]));
        let count = opt(int(), 0, ArgInfo::new(&["n", "count"]));
        let color = vopt(string(), "never".to_string(), "always".to_string(), ArgInfo::new(&["color"]).docv("WHEN"));
        assert_eq!(option_label(&args(&verbose)[0]), "-v, --verbose");
        assert_eq!(option_label(&args(&count)[0]), "-n INT, --count=INT");
        assert_eq!(option_label(&args(&color)[0]), "--color[=WHEN]");
    }

    #[test]
    fn test_sections_in_order() {
        let page = build(&build_context());
        let sections: Vec<&str> = page
            .blocks()
            .iter()
            .filter_map(|block| match block {
                ManBlock::Section(title) => Some(title.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            sections,
            vec!["NAME", "SYNOPSIS", "DESCRIPTION", "ARGUMENTS", "OPTIONS", "EXAMPLES", "VERSION"]
        );
    }

    #[test]
    fn test_templates_are_expanded() {
        let page = build(&build_context());
        let text = page.to_plain(80);
        assert!(text.contains("prog build - Build things"));
        assert!(text.contains("prog build compiles files."));
        assert!(text.contains("Run build with N jobs. (absent=1)"));
    }

    #[test]
    fn test_docs_that_are_not_templates_stay_verbatim() {
        let main = Command::new(TermInfo::new("prog").doc("Broken {tname"), Vec::new());
        let text = build(&EvalContext::single(main)).to_plain(80);
        assert!(text.contains("prog - Broken {tname\n"));

        let win = flag(ArgInfo::new(&["win"]).doc("Defaults to C:\\temp on {tname}."));
        let json = flag(ArgInfo::new(&["json"]).doc("Print results as {\"key\": value} objects."));
        let mut descriptors = args(&win);
        descriptors.extend(args(&json));
        let main = Command::new(TermInfo::new("prog"), descriptors);
        let text = build(&EvalContext::single(main)).to_plain(80);
        assert!(text.contains("Defaults to C:\\temp on prog."));
        assert!(text.contains("Print results as {\"key\": value} objects."));
    }

    #[test]
    fn test_plain_layout() {
        let main = Command::new(TermInfo::new("prog").doc("Do things"), Vec::new());
        let text = build(&EvalContext::single(main)).to_plain(80);
        assert_eq!(text, "NAME\n       prog - Do things\n\nSYNOPSIS\n       prog\n");
    }

    #[test]
    fn test_wrap() {
        let lines = wrap("aaaa bbbb cccc dddd eeee ffff", 2, 22);
        assert_eq!(lines, vec!["  aaaa bbbb cccc dddd", "  eeee ffff"]);
    }

    #[test]
    fn test_groff_escaping() {
        assert_eq!(escape_groff("--jobs"), "\\-\\-jobs");
        assert_eq!(escape_groff(".hidden"), "\\&.hidden");
        assert_eq!(escape_groff("a\\b"), "a\\eb");
    }

    #[test]
    fn test_groff_page() {
        let text = build(&build_context()).to_groff();
        assert!(text.starts_with(".TH \"PROG-BUILD\" 1"));
        assert!(text.contains(".SH SYNOPSIS"));
        assert!(text.contains(".TP 4\n\\fB\\-j N, \\-\\-jobs=N\\fR"));
        assert!(text.contains(".nf\nprog build a.c\n.fi"));
    }
}
