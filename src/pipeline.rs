//! Per-document orchestration: extract, guard, translate, normalize and
//! reassemble.
//!
//! Textual fragments are processed concurrently and put back in document
//! order before reassembly. The whole reassembled document then goes through
//! the script converter once more, which catches traditional characters in
//! structural text such as comments.

use futures_util::{StreamExt, stream};
use std::fmt;
use std::sync::Arc;

use crate::document::{self, Document, ExtractOptions, Format, Fragment};
use crate::guard::{self, PlaceholderVerdict};
use crate::script::ScriptConverter;
use crate::translation::{BackendChain, DEFAULT_CONCURRENCY, TranslationRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Send translatable English fragments to the backend chain.
    pub translate: bool,
    /// Also translate plain documents, not only XML string resources.
    pub translate_plain: bool,
    pub extract: ExtractOptions,
    /// Fragments of one document in flight at once.
    pub jobs: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            translate: true,
            translate_plain: true,
            extract: ExtractOptions::default(),
            jobs: DEFAULT_CONCURRENCY,
        }
    }
}

/// Lifecycle of a textual fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extracted,
    Guarded,
    Translated,
    Normalized,
    Reassembled,
}

/// What happened to a fragment's text on the way through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentOutcome {
    /// A provider produced a different text.
    Translated { provider: String },
    /// Every provider failed or declined; the source text was kept.
    Untranslated,
    /// The guard kept the text away from the providers.
    Protected(PlaceholderVerdict),
    /// Translation is switched off for this document.
    ConvertedOnly,
}

impl fmt::Display for FragmentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Translated { provider } => write!(f, "translated by {provider}"),
            Self::Untranslated => write!(f, "untranslated"),
            Self::Protected(verdict) => match verdict.kind() {
                Some(kind) => write!(f, "protected ({kind})"),
                None => write!(f, "protected"),
            },
            Self::ConvertedOnly => write!(f, "converted only"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentReport {
    /// Position among all fragments of the document.
    pub index: usize,
    /// The `name` attribute of the enclosing `<string>`, if any.
    pub name: Option<String>,
    pub stages: Vec<Stage>,
    pub outcome: FragmentOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentReport {
    pub fragments: Vec<FragmentReport>,
}

impl DocumentReport {
    fn count(&self, predicate: impl Fn(&FragmentOutcome) -> bool) -> usize {
        self.fragments
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }

    pub fn translated(&self) -> usize {
        self.count(|outcome| matches!(outcome, FragmentOutcome::Translated { .. }))
    }

    pub fn untranslated(&self) -> usize {
        self.count(|outcome| matches!(outcome, FragmentOutcome::Untranslated))
    }

    pub fn protected(&self) -> usize {
        self.count(|outcome| matches!(outcome, FragmentOutcome::Protected(_)))
    }
}

impl fmt::Display for DocumentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fragments: {} translated, {} protected, {} untranslated",
            self.fragments.len(),
            self.translated(),
            self.protected(),
            self.untranslated()
        )
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub document: Document,
    pub report: DocumentReport,
}

pub struct Pipeline {
    chain: BackendChain,
    converter: Arc<dyn ScriptConverter>,
    options: PipelineOptions,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("chain", &self.chain)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(
        chain: BackendChain,
        converter: Arc<dyn ScriptConverter>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            chain,
            converter,
            options,
        }
    }

    pub const fn options(&self) -> &PipelineOptions {
        &self.options
    }

    fn translates(&self, format: Format) -> bool {
        self.options.translate && (format == Format::XmlStrings || self.options.translate_plain)
    }

    /// Runs one document through the pipeline.
    ///
    /// Never fails: provider problems leave fragments untranslated.
    pub async fn run(&self, input: &Document) -> PipelineOutput {
        let content = input.content.as_str();
        let fragments = document::extract(input, self.options.extract);
        let translate = self.translates(input.format);

        let mut processed: Vec<(usize, String, FragmentReport)> = stream::iter(
            fragments
                .iter()
                .enumerate()
                .filter(|(_, fragment)| fragment.is_textual())
                .map(|(index, fragment)| self.process(index, fragment, content, translate)),
        )
        .buffer_unordered(self.options.jobs.max(1))
        .collect()
        .await;
        processed.sort_by_key(|(index, _, _)| *index);

        let mut replacements: Vec<Option<String>> = vec![None; fragments.len()];
        let mut report = DocumentReport::default();
        for (index, text, mut fragment_report) in processed {
            replacements[index] = Some(text);
            fragment_report.stages.push(Stage::Reassembled);
            report.fragments.push(fragment_report);
        }

        let reassembled = document::reassemble(content, &fragments, &replacements);
        let converted = self.converter.convert(&reassembled);
        log::debug!("{} document: {report}", input.format);

        PipelineOutput {
            document: Document::new(converted, input.format),
            report,
        }
    }

    async fn process(
        &self,
        index: usize,
        fragment: &Fragment,
        content: &str,
        translate: bool,
    ) -> (usize, String, FragmentReport) {
        let raw = fragment.text(content);
        let (leading, core, trailing) = split_padding(raw);
        let mut stages = vec![Stage::Extracted];

        let verdict = guard::inspect(core);
        stages.push(Stage::Guarded);

        let (text, outcome) = if verdict.is_protected() {
            (core.to_string(), FragmentOutcome::Protected(verdict))
        } else if translate {
            let result = self.chain.translate(&TranslationRequest::new(core)).await;
            stages.push(Stage::Translated);
            let outcome = match result.provider {
                Some(provider) if result.success => FragmentOutcome::Translated { provider },
                _ => FragmentOutcome::Untranslated,
            };
            (result.text, outcome)
        } else {
            (core.to_string(), FragmentOutcome::ConvertedOnly)
        };

        let normalized = self.converter.convert(&text);
        stages.push(Stage::Normalized);

        let report = FragmentReport {
            index,
            name: fragment.name().map(str::to_string),
            stages,
            outcome,
        };
        (index, format!("{leading}{normalized}{trailing}"), report)
    }
}

/// Splits `text` into leading whitespace, core and trailing whitespace.
fn split_padding(text: &str) -> (&str, &str, &str) {
    let start = text.len() - text.trim_start().len();
    let end = text.trim_end().len().max(start);
    (&text[..start], &text[start..end], &text[end..])
}
