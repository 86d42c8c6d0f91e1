mod chain;
pub mod mock;
mod offline;
mod online;
mod provider;
mod request;
mod sse;

pub use chain::{BackendChain, DEFAULT_CONCURRENCY};
pub use offline::{ArgosProvider, DEFAULT_COMMAND};
pub use online::OnlineProvider;
pub use provider::{Provider, ProviderError};
pub use request::{Language, TranslationRequest, TranslationResult};
