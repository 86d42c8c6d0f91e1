//! Documents and the fragments they are split into.

mod extract;

pub use extract::{ExtractOptions, extract, reassemble};

use std::fmt;
use std::ops::Range;

/// How a document's content is split into fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// The whole document is one textual fragment.
    Plain,
    /// Android-style `<string name="...">VALUE</string>` resources.
    XmlStrings,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("plain"),
            Self::XmlStrings => f.write_str("xml-strings"),
        }
    }
}

/// Raw content plus the format tag it should be processed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub content: String,
    pub format: Format,
}

impl Document {
    pub fn new(content: impl Into<String>, format: Format) -> Self {
        Self {
            content: content.into(),
            format,
        }
    }

    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(content, Format::Plain)
    }

    pub fn xml_strings(content: impl Into<String>) -> Self {
        Self::new(content, Format::XmlStrings)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentKind {
    /// Markup outside translatable text, copied verbatim.
    Structural,
    /// Candidate for translation. `name` is the enclosing `<string>`'s
    /// `name` attribute when there is one.
    Textual { name: Option<String> },
}

/// A classified byte span of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub span: Range<usize>,
    pub kind: FragmentKind,
}

impl Fragment {
    pub const fn is_textual(&self) -> bool {
        matches!(self.kind, FragmentKind::Textual { .. })
    }

    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            FragmentKind::Textual { name } => name.as_deref(),
            FragmentKind::Structural => None,
        }
    }

    /// The fragment's text within `content`.
    pub fn text<'a>(&self, content: &'a str) -> &'a str {
        &content[self.span.clone()]
    }
}
