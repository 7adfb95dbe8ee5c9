//! Static identity and documentation of a term.
//!
//! Documentation strings may reference `{tname}` (the command's name) and
//! `{mname}` (the main program's name); they are expanded when help is
//! rendered. Use `\{` for a literal brace.

use crate::config::{COMMANDS_SECTION, OPTIONS_SECTION};

/// A block of a manual page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManBlock {
    /// Starts a new section; the following blocks belong to it.
    Section(String),
    Paragraph(String),
    /// Preformatted text, never reflowed.
    Pre(String),
    Item { label: String, text: String },
    /// Suppresses the blank line before the next block.
    NoBlank,
}

impl ManBlock {
    pub fn section(title: impl Into<String>) -> Self {
        Self::Section(title.into())
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph(text.into())
    }

    pub fn pre(text: impl Into<String>) -> Self {
        Self::Pre(text.into())
    }

    pub fn item(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Item {
            label: label.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermInfo {
    name: String,
    version: Option<String>,
    doc: String,
    sdocs: String,
    docs: String,
    man: Vec<ManBlock>,
}

impl TermInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            doc: String::new(),
            sdocs: OPTIONS_SECTION.to_string(),
            docs: COMMANDS_SECTION.to_string(),
            man: Vec::new(),
        }
    }

    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// One line description, shown in the NAME section and command lists.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Section in which the standard `--help`/`--version` options are listed.
    #[must_use]
    pub fn sdocs(mut self, section: impl Into<String>) -> Self {
        self.sdocs = section.into();
        self
    }

    /// Section of the main command's page in which this command is listed.
    #[must_use]
    pub fn docs(mut self, section: impl Into<String>) -> Self {
        self.docs = section.into();
        self
    }

    #[must_use]
    pub fn man(mut self, blocks: Vec<ManBlock>) -> Self {
        self.man = blocks;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version string; `None` when absent or empty.
    #[must_use]
    pub fn version_str(&self) -> Option<&str> {
        self.version.as_deref().filter(|version| !version.is_empty())
    }

    #[must_use]
    pub fn doc_str(&self) -> &str {
        &self.doc
    }

    #[must_use]
    pub fn sdocs_section(&self) -> &str {
        &self.sdocs
    }

    #[must_use]
    pub fn docs_section(&self) -> &str {
        &self.docs
    }

    #[must_use]
    pub fn man_blocks(&self) -> &[ManBlock] {
        &self.man
    }
}
