//! Scripted providers for exercising the backend chain without a network or
//! a local model.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{Provider, ProviderError, TranslationRequest};

#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Looks the text up; unknown text is echoed back unchanged.
    Dictionary(HashMap<String, String>),
    /// Always returns the input, like a backend that declined.
    Echo,
    /// Always fails.
    Failing,
    /// Sleeps before answering with the given text.
    Slow { delay: Duration, reply: String },
}

#[derive(Debug)]
pub struct MockProvider {
    name: String,
    behavior: MockBehavior,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn new(name: &str, behavior: MockBehavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn dictionary(name: &str, pairs: &[(&str, &str)]) -> Self {
        let entries = pairs
            .iter()
            .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
            .collect();
        Self::new(name, MockBehavior::Dictionary(entries))
    }

    pub fn echo(name: &str) -> Self {
        Self::new(name, MockBehavior::Echo)
    }

    pub fn failing(name: &str) -> Self {
        Self::new(name, MockBehavior::Failing)
    }

    pub fn slow(name: &str, delay: Duration, reply: &str) -> Self {
        Self::new(
            name,
            MockBehavior::Slow {
                delay,
                reply: reply.to_string(),
            },
        )
    }

    /// Number of `translate` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Dictionary(entries) => Ok(entries
                .get(&request.source_text)
                .cloned()
                .unwrap_or_else(|| request.source_text.clone())),
            MockBehavior::Echo => Ok(request.source_text.clone()),
            MockBehavior::Failing => Err(ProviderError::Stream(format!(
                "{} is scripted to fail",
                self.name
            ))),
            MockBehavior::Slow { delay, reply } => {
                tokio::time::sleep(*delay).await;
                Ok(reply.clone())
            }
        }
    }
}
