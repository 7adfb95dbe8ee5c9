//! Argument descriptors and the leaf terms built from them.
//!
//! An [`ArgInfo`] describes one flag, option or positional argument. The
//! functions of this module turn an `ArgInfo` and a [`Converter`] into a
//! [`Term`] that declares exactly that descriptor and reads its value from
//! the parsed command line.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::cmdline::{CmdLine, Occurrence};
use crate::config::{ARGUMENTS_SECTION, OPTIONS_SECTION};
use crate::conv::Converter;
use crate::error::{quote, Failure, Result};
use crate::term::Term;

/// Identity of a descriptor; the parsed command line is keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArgId(usize);

pub(crate) const HELP_ID: ArgId = ArgId(0);
pub(crate) const VERSION_ID: ArgId = ArgId(1);

static NEXT_ID: AtomicUsize = AtomicUsize::new(2);

impl ArgId {
    fn fresh() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Which positional arguments a positional descriptor claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosKind {
    /// The argument at `index`, counted from the end when `rev` is set.
    Nth { index: usize, rev: bool },
    All,
    /// Every argument before `index`.
    Left(usize),
    /// Every argument after `index`.
    Right(usize),
}

impl PosKind {
    /// Indices of the claimed arguments among `count` positionals.
    #[must_use]
    pub fn select(self, count: usize) -> Vec<usize> {
        match self {
            PosKind::Nth { index, rev: false } => (index < count).then_some(index).into_iter().collect(),
            PosKind::Nth { index, rev: true } => index
                .checked_add(1)
                .and_then(|nth| count.checked_sub(nth))
                .into_iter()
                .collect(),
            PosKind::All => (0..count).collect(),
            PosKind::Left(index) => (0..index.min(count)).collect(),
            PosKind::Right(index) => (index.saturating_add(1)..count).collect(),
        }
    }

    /// Ordering key used to lay positionals out in a synopsis.
    pub(crate) fn synopsis_key(self) -> usize {
        match self {
            PosKind::Nth { index, rev: false } => index,
            PosKind::Nth { index, rev: true } => usize::MAX - index,
            PosKind::All | PosKind::Left(_) => 0,
            PosKind::Right(index) => index.saturating_add(1),
        }
    }

    pub(crate) fn is_list(self) -> bool {
        !matches!(self, PosKind::Nth { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgKind {
    Flag,
    /// Option taking a value; `vopt` is the printed value used when the
    /// option is given without one.
    Opt { vopt: Option<String> },
    Pos(PosKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgInfo {
    id: ArgId,
    names: Vec<String>,
    docv: String,
    doc: String,
    docs: Option<String>,
    kind: ArgKind,
    absent: Option<String>,
    required: bool,
}

fn dashed(name: &str) -> String {
    let name = name.trim_start_matches('-');
    if name.chars().count() == 1 {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}

impl ArgInfo {
    /// Describes an argument with the given names.
    ///
    /// One-character names become short options (`-v`), longer ones long
    /// options (`--verbose`). Positional arguments take no names.
    #[must_use]
    pub fn new(names: &[&str]) -> Self {
        Self::with_id(ArgId::fresh(), names)
    }

    pub(crate) fn with_id(id: ArgId, names: &[&str]) -> Self {
        Self {
            id,
            names: names.iter().map(|name| dashed(name)).collect(),
            docv: String::new(),
            doc: String::new(),
            docs: None,
            kind: ArgKind::Flag,
            absent: None,
            required: false,
        }
    }

    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Placeholder for the value in documentation, e.g. `FILE`.
    #[must_use]
    pub fn docv(mut self, docv: impl Into<String>) -> Self {
        self.docv = docv.into();
        self
    }

    /// Help section the argument is listed in.
    #[must_use]
    pub fn docs(mut self, section: impl Into<String>) -> Self {
        self.docs = Some(section.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> ArgId {
        self.id
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn docv_str(&self) -> &str {
        &self.docv
    }

    #[must_use]
    pub fn doc_str(&self) -> &str {
        &self.doc
    }

    #[must_use]
    pub fn docs_section(&self) -> &str {
        match (&self.docs, self.is_positional()) {
            (Some(section), _) => section,
            (None, true) => ARGUMENTS_SECTION,
            (None, false) => OPTIONS_SECTION,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &ArgKind {
        &self.kind
    }

    /// Printed default value, shown in help as `absent=`.
    #[must_use]
    pub fn absent(&self) -> Option<&str> {
        self.absent.as_deref()
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub fn is_positional(&self) -> bool {
        matches!(self.kind, ArgKind::Pos(_))
    }

    /// The longest name, used when a message must name the option.
    #[must_use]
    pub fn long_name(&self) -> &str {
        self.names
            .iter()
            .max_by_key(|name| name.len())
            .map_or(self.docv.as_str(), String::as_str)
    }

    fn with_kind(mut self, kind: ArgKind) -> Self {
        self.kind = kind;
        self
    }

    fn with_default_docv(mut self, docv: &str) -> Self {
        if self.docv.is_empty() {
            self.docv = docv.to_string();
        }
        self
    }

    fn with_absent(mut self, absent: String) -> Self {
        self.absent = Some(absent).filter(|absent| !absent.is_empty());
        self
    }

    fn mark_required(&mut self) {
        self.required = true;
        self.absent = None;
    }
}

fn single_occurrence(line: &CmdLine, id: ArgId) -> Result<Option<&Occurrence>> {
    match line.occurrences(id) {
        [] => Ok(None),
        [occurrence] => Ok(Some(occurrence)),
        [_, repeated, ..] => Err(Failure::usage(format!(
            "option {} cannot be repeated",
            quote(&repeated.name)
        ))),
    }
}

fn flag_value(occurrence: &Occurrence) -> Result<bool> {
    match occurrence.value {
        None => Ok(true),
        Some(_) => Err(Failure::usage(format!(
            "option {} cannot take an argument",
            quote(&occurrence.name)
        ))),
    }
}

fn option_value<T: Clone + 'static>(conv: &Converter<T>, occurrence: &Occurrence, bare: Option<&T>) -> Result<T> {
    match &occurrence.value {
        Some(raw) => conv
            .parse(raw)
            .map_err(|message| Failure::usage(format!("option {}: {message}", quote(&occurrence.name)))),
        None => bare.cloned().ok_or_else(|| {
            Failure::usage(format!("option {} needs an argument", quote(&occurrence.name)))
        }),
    }
}

fn positional_value<T: 'static>(conv: &Converter<T>, docv: &str, raw: &str) -> Result<T> {
    conv.parse(raw)
        .map_err(|message| Failure::usage(format!("{docv} argument: {message}")))
}

/// A flag: `false` when absent, `true` when given once.
#[must_use]
pub fn flag(info: ArgInfo) -> Term<bool> {
    let info = info.with_kind(ArgKind::Flag);
    let id = info.id();
    Term::new(vec![info], move |_, line| match single_occurrence(line, id)? {
        None => Ok(false),
        Some(occurrence) => flag_value(occurrence),
    })
}

/// A repeatable flag, one `true` per occurrence (`-vvv` gives three).
#[must_use]
pub fn flag_all(info: ArgInfo) -> Term<Vec<bool>> {
    let info = info.with_kind(ArgKind::Flag);
    let id = info.id();
    Term::new(vec![info], move |_, line| {
        line.occurrences(id).iter().map(flag_value).collect()
    })
}

/// Mutually exclusive flags each standing for a value.
#[must_use]
pub fn vflag<V: Clone + 'static>(default: V, flags: Vec<(V, ArgInfo)>) -> Term<V> {
    let flags: Vec<(V, ArgInfo)> = flags
        .into_iter()
        .map(|(value, info)| (value, info.with_kind(ArgKind::Flag)))
        .collect();
    let descriptors = flags.iter().map(|(_, info)| info.clone()).collect();
    let choices: Vec<(V, ArgId)> = flags
        .into_iter()
        .map(|(value, info)| (value, info.id()))
        .collect();

    Term::new(descriptors, move |_, line| {
        let mut chosen: Option<(&V, &Occurrence)> = None;
        for (value, id) in &choices {
            let Some(occurrence) = single_occurrence(line, *id)? else {
                continue;
            };
            flag_value(occurrence)?;
            if let Some((_, previous)) = chosen {
                return Err(Failure::usage(format!(
                    "options {} and {} cannot be present at the same time",
                    quote(&previous.name),
                    quote(&occurrence.name)
                )));
            }
            chosen = Some((value, occurrence));
        }
        Ok(chosen.map_or_else(|| default.clone(), |(value, _)| value.clone()))
    })
}

/// An option with a value, `default` when absent.
#[must_use]
pub fn opt<T: Clone + 'static>(conv: Converter<T>, default: T, info: ArgInfo) -> Term<T> {
    let info = info
        .with_kind(ArgKind::Opt { vopt: None })
        .with_default_docv(conv.docv())
        .with_absent(conv.print(&default));
    let id = info.id();
    Term::new(vec![info], move |_, line| match single_occurrence(line, id)? {
        None => Ok(default.clone()),
        Some(occurrence) => option_value(&conv, occurrence, None),
    })
}

/// Like [`opt`], but the option may be given bare, meaning `bare`.
#[must_use]
pub fn vopt<T: Clone + 'static>(conv: Converter<T>, default: T, bare: T, info: ArgInfo) -> Term<T> {
    let info = info
        .with_kind(ArgKind::Opt {
            vopt: Some(conv.print(&bare)),
        })
        .with_default_docv(conv.docv())
        .with_absent(conv.print(&default));
    let id = info.id();
    Term::new(vec![info], move |_, line| match single_occurrence(line, id)? {
        None => Ok(default.clone()),
        Some(occurrence) => option_value(&conv, occurrence, Some(&bare)),
    })
}

/// A repeatable option collecting every value, `default` when absent.
#[must_use]
pub fn opt_all<T: Clone + 'static>(conv: Converter<T>, default: Vec<T>, info: ArgInfo) -> Term<Vec<T>> {
    let absent = default.iter().map(|value| conv.print(value)).collect::<Vec<_>>().join(", ");
    let info = info
        .with_kind(ArgKind::Opt { vopt: None })
        .with_default_docv(conv.docv())
        .with_absent(absent);
    let id = info.id();
    Term::new(vec![info], move |_, line| {
        let occurrences = line.occurrences(id);
        if occurrences.is_empty() {
            return Ok(default.clone());
        }
        occurrences
            .iter()
            .map(|occurrence| option_value(&conv, occurrence, None))
            .collect()
    })
}

fn positional<T: Clone + 'static>(kind: PosKind, conv: Converter<T>, default: T, info: ArgInfo) -> Term<T> {
    let info = info
        .with_kind(ArgKind::Pos(kind))
        .with_default_docv(conv.docv())
        .with_absent(conv.print(&default));
    let id = info.id();
    let docv = info.docv_str().to_string();
    Term::new(vec![info], move |_, line| match line.positionals(id).first() {
        None => Ok(default.clone()),
        Some(raw) => positional_value(&conv, &docv, raw),
    })
}

fn positional_list<T: Clone + 'static>(
    kind: PosKind,
    conv: Converter<T>,
    default: Vec<T>,
    info: ArgInfo,
) -> Term<Vec<T>> {
    let absent = default.iter().map(|value| conv.print(value)).collect::<Vec<_>>().join(" ");
    let info = info
        .with_kind(ArgKind::Pos(kind))
        .with_default_docv(conv.docv())
        .with_absent(absent);
    let id = info.id();
    let docv = info.docv_str().to_string();
    Term::new(vec![info], move |_, line| {
        let values = line.positionals(id);
        if values.is_empty() {
            return Ok(default.clone());
        }
        values
            .iter()
            .map(|raw| positional_value(&conv, &docv, raw))
            .collect()
    })
}

/// The positional argument at `index`.
#[must_use]
pub fn pos<T: Clone + 'static>(index: usize, conv: Converter<T>, default: T, info: ArgInfo) -> Term<T> {
    positional(PosKind::Nth { index, rev: false }, conv, default, info)
}

/// The positional argument at `index` counting from the last one.
#[must_use]
pub fn pos_rev<T: Clone + 'static>(index: usize, conv: Converter<T>, default: T, info: ArgInfo) -> Term<T> {
    positional(PosKind::Nth { index, rev: true }, conv, default, info)
}

#[must_use]
pub fn pos_all<T: Clone + 'static>(conv: Converter<T>, default: Vec<T>, info: ArgInfo) -> Term<Vec<T>> {
    positional_list(PosKind::All, conv, default, info)
}

/// Every positional argument before `index`.
#[must_use]
pub fn pos_left<T: Clone + 'static>(
    index: usize,
    conv: Converter<T>,
    default: Vec<T>,
    info: ArgInfo,
) -> Term<Vec<T>> {
    positional_list(PosKind::Left(index), conv, default, info)
}

/// Every positional argument after `index`.
#[must_use]
pub fn pos_right<T: Clone + 'static>(
    index: usize,
    conv: Converter<T>,
    default: Vec<T>,
    info: ArgInfo,
) -> Term<Vec<T>> {
    positional_list(PosKind::Right(index), conv, default, info)
}

fn missing_message(info: &ArgInfo) -> String {
    if info.is_positional() {
        format!("required argument {} is missing", info.docv_str())
    } else {
        format!("required option {} is missing", quote(info.long_name()))
    }
}

fn mark_first_required<A: 'static>(term: &Term<A>) -> (Vec<ArgInfo>, String) {
    let mut descriptors = term.descriptors().to_vec();
    let missing = match descriptors.first_mut() {
        Some(info) => {
            info.mark_required();
            missing_message(info)
        }
        None => "a required value is missing".to_string(),
    };
    (descriptors, missing)
}

/// Makes an optional argument mandatory: `None` becomes a usage error.
#[must_use]
pub fn required<T: 'static>(term: Term<Option<T>>) -> Term<T> {
    let (descriptors, missing) = mark_first_required(&term);
    Term::new(descriptors, move |ctx, line| {
        term.eval(ctx, line)?
            .ok_or_else(|| Failure::usage(missing.clone()))
    })
}

/// Makes a list argument mandatory: an empty list becomes a usage error.
#[must_use]
pub fn non_empty<T: 'static>(term: Term<Vec<T>>) -> Term<Vec<T>> {
    let (descriptors, missing) = mark_first_required(&term);
    Term::new(descriptors, move |ctx, line| {
        let values = term.eval(ctx, line)?;
        if values.is_empty() {
            Err(Failure::usage(missing.clone()))
        } else {
            Ok(values)
        }
    })
}
