//! Ordered provider fallback.
//!
//! Providers are tried in order. A provider that fails, times out or hands
//! back the input unchanged makes the chain move on. When every provider is
//! exhausted the source text comes back untranslated; the chain itself never
//! fails.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use super::{Provider, ProviderError, TranslationRequest, TranslationResult};
use crate::cache::CacheManager;

/// Default bound on concurrent provider calls.
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug)]
pub struct BackendChain {
    providers: Vec<Arc<dyn Provider>>,
    deadline: Option<Duration>,
    limiter: Arc<Semaphore>,
    cache: Option<CacheManager>,
}

impl BackendChain {
    pub fn new(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self {
            providers,
            deadline: None,
            limiter: Arc::new(Semaphore::new(DEFAULT_CONCURRENCY)),
            cache: None,
        }
    }

    /// A chain with no providers: every request comes back untranslated.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Gives every provider call its own deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Bounds the number of provider calls in flight across all documents.
    #[must_use]
    pub fn with_concurrency(mut self, permits: usize) -> Self {
        self.limiter = Arc::new(Semaphore::new(permits.max(1)));
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CacheManager) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn translate(&self, request: &TranslationRequest) -> TranslationResult {
        for provider in &self.providers {
            let name = provider.name();
            match self.attempt(provider.as_ref(), request).await {
                Ok(text) if text != request.source_text => {
                    return TranslationResult::translated(text, name);
                }
                Ok(_) => {
                    log::debug!("{name} returned the input unchanged, falling back");
                }
                Err(e) => {
                    log::warn!("{name} failed to translate {:?}: {e}", request.source_text);
                }
            }
        }

        TranslationResult::untranslated(request)
    }

    async fn attempt(
        &self,
        provider: &dyn Provider,
        request: &TranslationRequest,
    ) -> Result<String, ProviderError> {
        let cache_key = request.cache_key(provider.name());
        if let Some(cached) = self.cached(&cache_key) {
            log::debug!("cache hit for {} ({})", cache_key, provider.name());
            return Ok(cached);
        }

        let Ok(_permit) = self.limiter.acquire().await else {
            return Err(ProviderError::Closed);
        };

        let call = provider.translate(request);
        let text = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, call)
                .await
                .map_err(|_| ProviderError::Timeout(deadline))??,
            None => call.await?,
        };

        if text != request.source_text {
            self.store(&cache_key, request, provider.name(), &text);
        }

        Ok(text)
    }

    fn cached(&self, cache_key: &str) -> Option<String> {
        let cache = self.cache.as_ref()?;
        cache.get(cache_key).unwrap_or_else(|e| {
            log::debug!("translation cache lookup failed: {e:#}");
            None
        })
    }

    fn store(&self, cache_key: &str, request: &TranslationRequest, provider: &str, text: &str) {
        if let Some(cache) = &self.cache
            && let Err(e) = cache.put(cache_key, request, provider, text)
        {
            log::debug!("translation cache write failed: {e:#}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::translation::mock::MockProvider;
    use tempfile::TempDir;

    fn chain_of(providers: Vec<Arc<MockProvider>>) -> BackendChain {
        BackendChain::new(
            providers
                .into_iter()
                .map(|p| p as Arc<dyn Provider>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_primary_success_skips_secondary() {
        let primary = Arc::new(MockProvider::dictionary("offline", &[("Hello", "你好")]));
        let secondary = Arc::new(MockProvider::dictionary("online", &[("Hello", "哈囉")]));
        let chain = chain_of(vec![primary.clone(), secondary.clone()]);

        let result = chain.translate(&TranslationRequest::new("Hello")).await;

        assert_eq!(result.text, "你好");
        assert!(result.success);
        assert_eq!(result.provider.as_deref(), Some("offline"));
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_error_falls_back_to_secondary() {
        let primary = Arc::new(MockProvider::failing("offline"));
        let secondary = Arc::new(MockProvider::dictionary("online", &[("Hello", "你好")]));
        let chain = chain_of(vec![primary.clone(), secondary]);

        let result = chain.translate(&TranslationRequest::new("Hello")).await;

        assert_eq!(result.text, "你好");
        assert_eq!(result.provider.as_deref(), Some("online"));
        assert_eq!(primary.calls(), 1);
    }

    #[tokio::test]
    async fn test_identical_output_falls_back_to_secondary() {
        let primary = Arc::new(MockProvider::echo("offline"));
        let secondary = Arc::new(MockProvider::dictionary("online", &[("Hello", "你好")]));
        let chain = chain_of(vec![primary, secondary]);

        let result = chain.translate(&TranslationRequest::new("Hello")).await;

        assert_eq!(result.text, "你好");
        assert_eq!(result.provider.as_deref(), Some("online"));
    }

    #[tokio::test]
    async fn test_all_providers_exhausted_returns_source() {
        let chain = chain_of(vec![
            Arc::new(MockProvider::failing("offline")),
            Arc::new(MockProvider::echo("online")),
        ]);

        let result = chain.translate(&TranslationRequest::new("Hello")).await;

        assert_eq!(result.text, "Hello");
        assert!(!result.success);
        assert!(result.provider.is_none());
    }

    #[tokio::test]
    async fn test_single_provider_without_secondary_returns_source_on_failure() {
        let chain = chain_of(vec![Arc::new(MockProvider::failing("offline"))]);
        let result = chain.translate(&TranslationRequest::new("Hello")).await;
        assert_eq!(result.text, "Hello");
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_empty_chain_returns_source() {
        let chain = BackendChain::empty();
        assert!(chain.is_empty());

        let result = chain.translate(&TranslationRequest::new("Hello")).await;
        assert_eq!(result.text, "Hello");
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_deadline_moves_on_to_next_provider() {
        let slow = Arc::new(MockProvider::slow("offline", Duration::from_secs(5), "慢"));
        let fast = Arc::new(MockProvider::dictionary("online", &[("Hello", "你好")]));
        let chain = chain_of(vec![slow.clone(), fast])
            .with_deadline(Some(Duration::from_millis(50)));

        let result = chain.translate(&TranslationRequest::new("Hello")).await;

        assert_eq!(result.text, "你好");
        assert_eq!(slow.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_answers_repeat_requests() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheManager::open(temp_dir.path().join("translations.db")).unwrap();
        let provider = Arc::new(MockProvider::dictionary("offline", &[("Hello", "你好")]));
        let chain = chain_of(vec![provider.clone()]).with_cache(cache);

        let request = TranslationRequest::new("Hello");
        let first = chain.translate(&request).await;
        let second = chain.translate(&request).await;

        assert_eq!(first, second);
        assert_eq!(second.text, "你好");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_declined_translations_are_not_cached() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheManager::open(temp_dir.path().join("translations.db")).unwrap();
        let provider = Arc::new(MockProvider::echo("offline"));
        let chain = chain_of(vec![provider.clone()]).with_cache(cache);

        let request = TranslationRequest::new("Hello");
        chain.translate(&request).await;
        chain.translate(&request).await;

        assert_eq!(provider.calls(), 2);
    }

    #[test]
    fn test_provider_names_keep_order() {
        let chain = chain_of(vec![
            Arc::new(MockProvider::echo("offline")),
            Arc::new(MockProvider::echo("online")),
        ]);
        assert_eq!(chain.provider_names(), vec!["offline", "online"]);
    }
}
