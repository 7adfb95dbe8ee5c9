//! The command-line parser.
//!
//! [`parse`] matches raw tokens against argument descriptors and records,
//! per descriptor, what was given. It checks only the shape of the command
//! line (known option names, values where required, no stray positionals);
//! converting values and checking repetitions is left to the terms.

use indexmap::IndexMap;
use itertools::Itertools;
use log::trace;

use crate::arg::{ArgId, ArgInfo, ArgKind};
use crate::error::{alternatives, quote, Failure, Result};
use crate::suggest::{did_you_mean, suggestions};
use crate::trie::{Lookup, PrefixDict};

/// One occurrence of an optional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// The option's full name, even when given abbreviated.
    pub name: String,
    pub value: Option<String>,
}

/// A parsed command line, keyed by descriptor identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmdLine {
    options: IndexMap<ArgId, Vec<Occurrence>>,
    positionals: IndexMap<ArgId, Vec<String>>,
}

impl CmdLine {
    #[must_use]
    pub fn occurrences(&self, id: ArgId) -> &[Occurrence] {
        self.options.get(&id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn positionals(&self, id: ArgId) -> &[String] {
        self.positionals.get(&id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_present(&self, id: ArgId) -> bool {
        !self.occurrences(id).is_empty() || !self.positionals(id).is_empty()
    }
}

/// Whether a token is an option rather than a value or positional.
#[must_use]
pub fn is_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

#[derive(Debug, Clone)]
struct Target {
    id: ArgId,
    name: String,
}

struct Parser<'a> {
    infos: IndexMap<ArgId, &'a ArgInfo>,
    names: PrefixDict<Target>,
    args: &'a [String],
    next: usize,
    line: CmdLine,
}

impl<'a> Parser<'a> {
    fn new(descriptors: &'a [ArgInfo], args: &'a [String]) -> Self {
        let mut infos = IndexMap::new();
        for info in descriptors {
            infos.entry(info.id()).or_insert(info);
        }

        let mut names = PrefixDict::new();
        let mut line = CmdLine::default();
        for info in infos.values().filter(|info| !info.is_positional()) {
            for name in info.names() {
                names.insert(
                    name.clone(),
                    Target {
                        id: info.id(),
                        name: name.clone(),
                    },
                );
            }
            line.options.insert(info.id(), Vec::new());
        }

        Self {
            infos,
            names,
            args,
            next: 0,
            line,
        }
    }

    fn kind(&self, id: ArgId) -> &'a ArgKind {
        let info: &'a ArgInfo = self.infos[&id];
        info.kind()
    }

    fn unknown(&self, name: &str) -> Failure {
        let long_names = self.names.names().filter(|candidate| candidate.starts_with("--"));
        Failure::usage(format!(
            "unknown option {}.{}",
            quote(name),
            did_you_mean(&suggestions(name, long_names))
        ))
    }

    fn resolve_long(&self, name: &str) -> Result<Target> {
        match self.names.lookup(name) {
            Lookup::Found(target) => Ok(target),
            Lookup::Ambiguous(candidates) => Err(Failure::usage(format!(
                "option {} ambiguous and could be either {}",
                quote(name),
                alternatives(&candidates)
            ))),
            Lookup::NotFound => Err(self.unknown(name)),
        }
    }

    fn resolve_short(&self, name: &str) -> Result<Target> {
        self.names.get(name).cloned().ok_or_else(|| self.unknown(name))
    }

    /// Takes the following token as the value of an option, if it accepts one.
    fn take_value(&mut self, kind: &ArgKind) -> Option<String> {
        let args = self.args;
        let candidate = args.get(self.next)?;
        let takes = match kind {
            ArgKind::Opt { vopt: None } => true,
            ArgKind::Opt { vopt: Some(_) } => !is_option(candidate),
            ArgKind::Flag | ArgKind::Pos(_) => false,
        };
        if takes {
            self.next += 1;
            Some(candidate.clone())
        } else {
            None
        }
    }

    fn record(&mut self, target: Target, value: Option<String>) {
        trace!("Option `{}` given with value {:?}", target.name, value);
        self.line
            .options
            .entry(target.id)
            .or_default()
            .push(Occurrence {
                name: target.name,
                value,
            });
    }

    fn long_option(&mut self, token: &str) -> Result<()> {
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (token, None),
        };
        let target = self.resolve_long(name)?;
        let kind = self.kind(target.id);
        let value = match inline {
            Some(value) => Some(value),
            None => self.take_value(kind),
        };
        self.record(target, value);
        Ok(())
    }

    /// `-x`, `-xVALUE`, `-x VALUE` and grouped flags such as `-abc`.
    fn short_options(&mut self, token: &str) -> Result<()> {
        let mut rest = &token[1..];
        while let Some(short) = rest.chars().next() {
            let after = &rest[short.len_utf8()..];
            let target = self.resolve_short(&format!("-{short}"))?;
            match self.kind(target.id) {
                ArgKind::Flag => {
                    self.record(target, None);
                    rest = after;
                }
                kind => {
                    let value = if after.is_empty() {
                        self.take_value(kind)
                    } else {
                        Some(after.to_string())
                    };
                    self.record(target, value);
                    break;
                }
            }
        }
        Ok(())
    }

    fn run(mut self) -> Result<CmdLine> {
        let args = self.args;
        let mut positionals: Vec<String> = Vec::new();

        while let Some(token) = args.get(self.next) {
            self.next += 1;
            if token == "--" {
                positionals.extend(args[self.next..].iter().cloned());
                break;
            }
            if !is_option(token) {
                positionals.push(token.clone());
            } else if token.starts_with("--") {
                self.long_option(token)?;
            } else {
                self.short_options(token)?;
            }
        }

        self.distribute(positionals)
    }

    fn distribute(mut self, positionals: Vec<String>) -> Result<CmdLine> {
        let mut claimed = vec![false; positionals.len()];

        for info in self.infos.values() {
            let ArgKind::Pos(kind) = info.kind() else {
                continue;
            };
            let indices = kind.select(positionals.len());
            for index in &indices {
                claimed[*index] = true;
            }
            let values = indices.iter().map(|index| positionals[*index].clone()).collect();
            self.line.positionals.insert(info.id(), values);
        }

        let unclaimed: Vec<&String> = positionals
            .iter()
            .zip(&claimed)
            .filter(|(_, claimed)| !**claimed)
            .map(|(token, _)| token)
            .collect();

        if unclaimed.is_empty() {
            Ok(self.line)
        } else {
            Err(Failure::usage(format!(
                "too many arguments, don't know what to do with {}",
                unclaimed.iter().map(|token| quote(token)).join(", ")
            )))
        }
    }
}

/// Parses `args` against `descriptors`.
///
/// Descriptors are deduplicated by identity, so a descriptor listed several
/// times (a term reused in a composition) is harmless.
///
/// # Errors
///
/// Returns a [`Failure::Usage`] for unknown or ambiguous options and for
/// positional arguments no descriptor claims.
pub fn parse(descriptors: &[ArgInfo], args: &[String]) -> Result<CmdLine> {
    Parser::new(descriptors, args).run()
}
