use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Languages the pipeline translates between. The direction is fixed:
/// English source, simplified Chinese target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Language {
    English,
    SimplifiedChinese,
}

impl Language {
    /// Code understood by Argos Translate.
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::SimplifiedChinese => "zh",
        }
    }

    /// Human-readable name, used in prompts.
    pub const fn name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::SimplifiedChinese => "Simplified Chinese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub source_text: String,
    pub source_language: Language,
    pub target_language: Language,
}

impl TranslationRequest {
    pub fn new(source_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            source_language: Language::English,
            target_language: Language::SimplifiedChinese,
        }
    }

    /// Compute cache key for this request as answered by `provider`.
    pub fn cache_key(&self, provider: &str) -> String {
        let cache_input = serde_json::json!({
            "source_text": self.source_text,
            "source_language": self.source_language.code(),
            "target_language": self.target_language.code(),
            "provider": provider,
        });

        let mut hasher = Sha256::new();
        hasher.update(cache_input.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Outcome of running a request through the backend chain.
///
/// `success` is false when every provider failed or echoed the input back;
/// `text` is then the untouched source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub text: String,
    pub success: bool,
    pub provider: Option<String>,
}

impl TranslationResult {
    pub fn translated(text: String, provider: &str) -> Self {
        Self {
            text,
            success: true,
            provider: Some(provider.to_string()),
        }
    }

    pub fn untranslated(request: &TranslationRequest) -> Self {
        Self {
            text: request.source_text.clone(),
            success: false,
            provider: None,
        }
    }
}
