//! Placeholder guard.
//!
//! Decides whether a textual fragment may be handed to a translation backend.
//! Backends routinely mangle format tokens, so any protected token anywhere in
//! a fragment protects the whole fragment.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

// %s, %d, %1$s, %.2f, %-5d
static PRINTF_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%(?:\d+\$)?[-+#0]*\d*(?:\.\d+)?[sdifuxXoeEgGcb@]").expect("valid printf regex")
});

// {count}, {user_name}, {0}
static BRACE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(?:[A-Za-z_][A-Za-z0-9_]*|\d+)\}").expect("valid brace regex")
});

// @string/app_name, @android:string/ok, @+id/title, ?attr/colorPrimary
static RESOURCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[@?]\+?(?:[A-Za-z_][\w.]*:)?[A-Za-z_]\w*/[A-Za-z_][\w.]*")
        .expect("valid resource reference regex")
});

// Literal backslash escapes as they appear in resource files.
static ESCAPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\\(?:[ntr\\'"]|u[0-9A-Fa-f]{4})"#).expect("valid escape regex")
});

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://").expect("valid url regex"));

// <b>, </b>, <xliff:g id="x">, <![CDATA[
static MARKUP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!\[CDATA\[|</?[A-Za-z][\w:.-]*(?:\s[^<>]*)?/?>").expect("valid markup regex")
});

// &amp;, &#169;, &#x2014;
static ENTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:[A-Za-z]+|#\d+|#[xX][0-9A-Fa-f]+);").expect("valid entity regex")
});

static PLAIN_ENGLISH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9 .,_\-]+$").expect("valid plain english regex"));

/// The kind of token that caused a fragment to be protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Printf,
    BraceVariable,
    ResourceReference,
    EscapeSequence,
    Url,
    InlineMarkup,
    Entity,
    /// No Latin letter, so nothing for an English → Chinese backend to do.
    NothingToTranslate,
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Printf => "printf specifier",
            Self::BraceVariable => "brace variable",
            Self::ResourceReference => "resource reference",
            Self::EscapeSequence => "escape sequence",
            Self::Url => "url",
            Self::InlineMarkup => "inline markup",
            Self::Entity => "character entity",
            Self::NothingToTranslate => "no translatable text",
        };
        f.write_str(name)
    }
}

/// Guard decision for one fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderVerdict {
    Translatable,
    Protected(PlaceholderKind),
}

impl PlaceholderVerdict {
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::Protected(_))
    }

    pub const fn kind(self) -> Option<PlaceholderKind> {
        match self {
            Self::Translatable => None,
            Self::Protected(kind) => Some(kind),
        }
    }
}

/// Classifies `text`, reporting the first protected pattern that matches.
pub fn inspect(text: &str) -> PlaceholderVerdict {
    if !text.chars().any(|c| c.is_ascii_alphabetic()) {
        return PlaceholderVerdict::Protected(PlaceholderKind::NothingToTranslate);
    }

    let patterns: [(&Regex, PlaceholderKind); 7] = [
        (&URL_REGEX, PlaceholderKind::Url),
        (&RESOURCE_REGEX, PlaceholderKind::ResourceReference),
        (&PRINTF_REGEX, PlaceholderKind::Printf),
        (&BRACE_REGEX, PlaceholderKind::BraceVariable),
        (&ESCAPE_REGEX, PlaceholderKind::EscapeSequence),
        (&MARKUP_REGEX, PlaceholderKind::InlineMarkup),
        (&ENTITY_REGEX, PlaceholderKind::Entity),
    ];

    patterns
        .into_iter()
        .find(|(regex, _)| regex.is_match(text))
        .map_or(PlaceholderVerdict::Translatable, |(_, kind)| {
            PlaceholderVerdict::Protected(kind)
        })
}

pub fn is_protected(text: &str) -> bool {
    inspect(text).is_protected()
}

/// Narrow English test used for untagged `>TEXT</string>` candidates:
/// only ASCII letters, digits, spaces and `. , _ -`.
pub fn is_plain_english(text: &str) -> bool {
    PLAIN_ENGLISH_REGEX.is_match(text.trim())
}
