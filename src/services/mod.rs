pub mod lastfm;
pub mod openrouter;
pub mod recommender;

pub use lastfm::LastFmClient;
pub use openrouter::OpenRouterClient;
pub use recommender::Recommender;

use crate::error::Result;
use crate::models::TrackRef;
use async_trait::async_trait;

/// Chat-completion backend that turns a prompt into raw text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send `system_instruction` followed by `prompt` and return the assistant text.
    /// Every failure is propagated.
    async fn complete(&self, prompt: &str, system_instruction: &str) -> Result<String>;
}

/// Music metadata lookups used to enrich prompts.
///
/// Lookups are best-effort: implementations log failures and return an
/// empty list instead of an error.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn get_top_tracks(&self, country: &str, limit: usize) -> Vec<TrackRef>;

    async fn get_similar_tracks(&self, artist: &str, track: &str, limit: usize) -> Vec<TrackRef>;
}

#[cfg(test)]
pub(crate) mod test_support;
