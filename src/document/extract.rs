//! Fragment extraction and reassembly.
//!
//! XML string resources are matched with regular expressions, which assumes
//! well-formed, non-nested `<string>` elements. Nested or malformed markup can
//! make a match end early; such input is passed through, never repaired.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use super::{Document, Format, Fragment, FragmentKind};
use crate::guard;

// Shortest VALUE up to the first closing tag. The attribute group may not end
// in `/`, so a self-closing `<string name="x"/>` never opens a match.
static STRING_ELEMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<string(\s[^>]*[^/>])?>(.*?)</string\s*>").expect("valid string element regex")
});

static NAME_ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)name\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid name attribute regex")
});

// Untagged text directly followed by a closing tag: `>Hello</string>`.
static LEGACY_VALUE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)>([^<>]+)</string\s*>").expect("valid legacy value regex")
});

/// Knobs for the XML-strings strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Also treat `>TEXT</string>` outside named elements as textual when
    /// TEXT passes [`guard::is_plain_english`].
    pub legacy_markup: bool,
}

/// Splits `document` into contiguous, non-overlapping fragments that cover
/// its content exactly, in document order.
pub fn extract(document: &Document, options: ExtractOptions) -> Vec<Fragment> {
    let content = document.content.as_str();
    if content.is_empty() {
        return Vec::new();
    }

    match document.format {
        Format::Plain => vec![Fragment {
            span: 0..content.len(),
            kind: FragmentKind::Textual { name: None },
        }],
        Format::XmlStrings => {
            let mut textual = named_values(content);
            if options.legacy_markup {
                let legacy = legacy_values(content, &textual);
                textual.extend(legacy);
                textual.sort_by_key(|(span, _)| span.start);
            }
            fill_structural(content.len(), textual)
        }
    }
}

/// Rebuilds the content from `fragments`, substituting `replacements[i]` for
/// textual fragment `i` where present. Structural spans are copied verbatim.
pub fn reassemble(content: &str, fragments: &[Fragment], replacements: &[Option<String>]) -> String {
    let mut out = String::with_capacity(content.len());
    for (index, fragment) in fragments.iter().enumerate() {
        let replacement = replacements.get(index).and_then(Option::as_deref);
        match (&fragment.kind, replacement) {
            (FragmentKind::Textual { .. }, Some(text)) => out.push_str(text),
            _ => out.push_str(fragment.text(content)),
        }
    }
    out
}

fn named_values(content: &str) -> Vec<(Range<usize>, Option<String>)> {
    STRING_ELEMENT_REGEX
        .captures_iter(content)
        .filter_map(|caps| {
            let value = caps.get(2)?;
            if value.as_str().is_empty() {
                return None;
            }
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let name = name_attribute(attrs)?;
            Some((value.range(), Some(name)))
        })
        .collect()
}

fn name_attribute(attrs: &str) -> Option<String> {
    let caps = NAME_ATTR_REGEX.captures(attrs)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

fn legacy_values(
    content: &str,
    named: &[(Range<usize>, Option<String>)],
) -> Vec<(Range<usize>, Option<String>)> {
    let mut found = Vec::new();
    let mut gap_start = 0;

    let gap_ends = named
        .iter()
        .map(|(span, _)| span.clone())
        .chain(std::iter::once(content.len()..content.len()));

    for span in gap_ends {
        let gap = &content[gap_start..span.start];
        for caps in LEGACY_VALUE_REGEX.captures_iter(gap) {
            let Some(value) = caps.get(1) else { continue };
            if guard::is_plain_english(value.as_str()) {
                let range = value.range();
                found.push((gap_start + range.start..gap_start + range.end, None));
            }
        }
        gap_start = span.end;
    }

    found
}

fn fill_structural(len: usize, textual: Vec<(Range<usize>, Option<String>)>) -> Vec<Fragment> {
    let mut fragments = Vec::with_capacity(textual.len() * 2 + 1);
    let mut cursor = 0;

    for (span, name) in textual {
        if span.start > cursor {
            fragments.push(Fragment {
                span: cursor..span.start,
                kind: FragmentKind::Structural,
            });
        }
        cursor = span.end;
        fragments.push(Fragment {
            span,
            kind: FragmentKind::Textual { name },
        });
    }

    if cursor < len {
        fragments.push(Fragment {
            span: cursor..len,
            kind: FragmentKind::Structural,
        });
    }

    fragments
}
