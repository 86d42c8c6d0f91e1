//! Traditional → simplified Chinese script conversion.

use zhconv::{Variant, zhconv};

/// Character-level script normalization applied to every pipeline output.
///
/// Implementations must be total and idempotent: converting already
/// simplified text returns it unchanged.
pub trait ScriptConverter: Send + Sync {
    fn convert(&self, text: &str) -> String;
}

/// Converts to simplified Chinese (`zh-Hans`) using the OpenCC and MediaWiki
/// rulesets bundled with `zhconv`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hans;

impl ScriptConverter for Hans {
    fn convert(&self, text: &str) -> String {
        if text.is_ascii() {
            return text.to_string();
        }
        zhconv(text, Variant::ZhHans)
    }
}

/// Leaves text untouched. Useful when only the translation stage is wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl ScriptConverter for Identity {
    fn convert(&self, text: &str) -> String {
        text.to_string()
    }
}
