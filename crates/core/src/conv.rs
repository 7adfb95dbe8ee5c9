//! Value converters for option and positional arguments.
//!
//! A [`Converter`] turns a raw command-line string into a typed value and
//! prints a value back for documentation (e.g. `absent=` defaults). Parse
//! errors are plain messages; the argument terms wrap them with the name of
//! the offending option or positional.

use std::path::PathBuf;
use std::rc::Rc;

use crate::error::{alternatives, quote};
use crate::trie::{Lookup, PrefixDict};

type ParseFn<T> = dyn Fn(&str) -> std::result::Result<T, String>;
type PrintFn<T> = dyn Fn(&T) -> String;

pub struct Converter<T> {
    parse: Rc<ParseFn<T>>,
    print: Rc<PrintFn<T>>,
    docv: String,
}

impl<T> Clone for Converter<T> {
    fn clone(&self) -> Self {
        Self {
            parse: Rc::clone(&self.parse),
            print: Rc::clone(&self.print),
            docv: self.docv.clone(),
        }
    }
}

impl<T: 'static> Converter<T> {
    pub fn new(
        docv: impl Into<String>,
        parse: impl Fn(&str) -> std::result::Result<T, String> + 'static,
        print: impl Fn(&T) -> String + 'static,
    ) -> Self {
        Self {
            parse: Rc::new(parse),
            print: Rc::new(print),
            docv: docv.into(),
        }
    }

    /// Parses a raw command-line value.
    ///
    /// # Errors
    ///
    /// Returns a human readable message when `raw` is not a valid value.
    pub fn parse(&self, raw: &str) -> std::result::Result<T, String> {
        (self.parse)(raw)
    }

    #[must_use]
    pub fn print(&self, value: &T) -> String {
        (self.print)(value)
    }

    /// Default value placeholder used in documentation.
    #[must_use]
    pub fn docv(&self) -> &str {
        &self.docv
    }

    #[must_use]
    pub fn with_docv(mut self, docv: impl Into<String>) -> Self {
        self.docv = docv.into();
        self
    }

    /// Lifts the converter to optional values; `None` prints as empty.
    #[must_use]
    pub fn some(self) -> Converter<Option<T>> {
        let parse = Rc::clone(&self.parse);
        let print = Rc::clone(&self.print);
        Converter::new(
            self.docv,
            move |raw| parse(raw).map(Some),
            move |value: &Option<T>| value.as_ref().map(|v| print(v)).unwrap_or_default(),
        )
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, expected: &str) -> std::result::Result<T, String> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| format!("invalid value {}, expected {expected}", quote(raw)))
}

#[must_use]
pub fn string() -> Converter<String> {
    Converter::new(
        "STRING",
        |raw| Ok(raw.to_string()),
        |value: &String| value.clone(),
    )
}

#[must_use]
pub fn int() -> Converter<i64> {
    Converter::new(
        "INT",
        |raw| parse_number(raw, "an integer"),
        |value: &i64| value.to_string(),
    )
}

#[must_use]
pub fn uint() -> Converter<usize> {
    Converter::new(
        "NUM",
        |raw| parse_number(raw, "a non-negative integer"),
        |value: &usize| value.to_string(),
    )
}

#[must_use]
pub fn float() -> Converter<f64> {
    Converter::new(
        "NUM",
        |raw| parse_number(raw, "a number"),
        |value: &f64| value.to_string(),
    )
}

#[must_use]
pub fn boolean() -> Converter<bool> {
    enumeration(&[("true", true), ("false", false)]).with_docv("BOOL")
}

#[must_use]
pub fn path() -> Converter<PathBuf> {
    Converter::new(
        "PATH",
        |raw| {
            if raw.is_empty() {
                Err("invalid value `', expected a path".to_string())
            } else {
                Ok(PathBuf::from(raw))
            }
        },
        |value: &PathBuf| value.display().to_string(),
    )
}

/// Converter over a closed set of named values.
///
/// Unambiguous abbreviations of a name are accepted.
#[must_use]
pub fn enumeration<T: Clone + PartialEq + 'static>(choices: &[(&str, T)]) -> Converter<T> {
    let dict: PrefixDict<T> = choices
        .iter()
        .map(|(name, value)| (*name, value.clone()))
        .collect();
    let names: Vec<String> = dict.names().map(ToString::to_string).collect();
    let printable: Vec<(String, T)> = choices
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect();

    Converter::new(
        "ENUM",
        move |raw| match dict.lookup(raw) {
            Lookup::Found(value) => Ok(value),
            Lookup::Ambiguous(candidates) => Err(format!(
                "invalid value {}, could be either {}",
                quote(raw),
                alternatives(&candidates)
            )),
            Lookup::NotFound => Err(format!(
                "invalid value {}, expected one of {}",
                quote(raw),
                alternatives(&names)
            )),
        },
        move |value| {
            printable
                .iter()
                .find(|(_, candidate)| candidate == value)
                .map(|(name, _)| name.clone())
                .unwrap_or_default()
        },
    )
}

/// Converter for `sep`-separated lists of `conv` values.
#[must_use]
pub fn list<T: 'static>(sep: char, conv: Converter<T>) -> Converter<Vec<T>> {
    let docv = format!("{}[{sep}{}…]", conv.docv(), conv.docv());
    let element = conv.clone();
    Converter::new(
        docv,
        move |raw| {
            if raw.is_empty() {
                return Ok(Vec::new());
            }
            raw.split(sep).map(|item| element.parse(item)).collect()
        },
        move |values: &Vec<T>| {
            values
                .iter()
                .map(|value| conv.print(value))
                .collect::<Vec<_>>()
                .join(&sep.to_string())
        },
    )
}
