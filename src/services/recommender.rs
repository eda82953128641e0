use crate::error::{AppError, Result};
use crate::models::{RecommendationSet, TrackRef, UserProfile};
use crate::services::{CompletionProvider, MetadataProvider};
use std::sync::Arc;
use tracing::{debug, info};

pub const SYSTEM_INSTRUCTION: &str =
    "You are a music recommendation engine that ONLY outputs valid JSON, nothing else.";

pub const MISSING_SEED_MESSAGE: &str = "Artist and track name required";
pub const NO_SIMILAR_MESSAGE: &str = "No similar tracks found";

/// Trending tracks mixed into profile prompts
const TRENDING_LIMIT: usize = 3;
/// Similar tracks fed to the model for seed-track prompts
const SIMILAR_LIMIT: usize = 8;

/// Turns a listener profile or a seed track into LLM-generated recommendations.
///
/// Metadata lookups run first and only enrich the prompt; the completion call
/// is the single source of recommendations and its JSON is returned as-is.
pub struct Recommender {
    completions: Arc<dyn CompletionProvider>,
    metadata: Arc<dyn MetadataProvider>,
    trending_country: String,
}

impl Recommender {
    pub fn new(
        completions: Arc<dyn CompletionProvider>,
        metadata: Arc<dyn MetadataProvider>,
        trending_country: impl Into<String>,
    ) -> Self {
        Self {
            completions,
            metadata,
            trending_country: trending_country.into(),
        }
    }

    pub async fn generate_from_profile(&self, profile: &UserProfile) -> Result<RecommendationSet> {
        info!(
            interests = %profile.interests,
            genres = %profile.genres,
            mood = %profile.mood,
            "Generating recommendations from profile"
        );

        let trending = self
            .metadata
            .get_top_tracks(&self.trending_country, TRENDING_LIMIT)
            .await;
        debug!("Enriching profile prompt with {} trending tracks", trending.len());

        let prompt = profile_prompt(profile, &trending);
        self.ask(&prompt).await
    }

    pub async fn generate_from_seed_track(
        &self,
        artist: &str,
        track: &str,
    ) -> Result<RecommendationSet> {
        if artist.is_empty() || track.is_empty() {
            return Err(AppError::Validation(MISSING_SEED_MESSAGE.to_string()));
        }

        info!("Generating recommendations similar to {} - {}", artist, track);

        let similar = self
            .metadata
            .get_similar_tracks(artist, track, SIMILAR_LIMIT)
            .await;

        if similar.is_empty() {
            return Err(AppError::NotFound(NO_SIMILAR_MESSAGE.to_string()));
        }

        let prompt = similar_tracks_prompt(&similar);
        self.ask(&prompt).await
    }

    async fn ask(&self, prompt: &str) -> Result<RecommendationSet> {
        let text = self.completions.complete(prompt, SYSTEM_INSTRUCTION).await?;

        let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            AppError::UpstreamFormat(format!(
                "Completion was not valid JSON: {} | Response was: {}",
                e,
                text.chars().take(200).collect::<String>()
            ))
        })?;

        let recommendations = RecommendationSet::new(value);
        info!("Model returned {} recommendations", recommendations.items().len());

        Ok(recommendations)
    }
}

fn profile_prompt(profile: &UserProfile, trending: &[TrackRef]) -> String {
    let trending_line = if trending.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nTrending songs to consider: {}",
            TrackRef::join_for_prompt(trending)
        )
    };

    format!(
        r#"
User profile:
- Interests: {}
- Preferred genres: {}
- Current mood: {}
- Favorite artists: {}
{}

Recommend 10 songs that match this profile. For each song, include a Spotify search URL.

Return ONLY valid JSON, nothing else:
{{
  "recommendations": [
    {{
      "title": "Song Title",
      "artist": "Artist Name",
      "reason": "Why this song matches",
      "suggested_genre": "genre",
      "spotify_url": "https://open.spotify.com/search/{{URL encoded title and artist}}"
    }}
  ]
}}
"#,
        profile.interests, profile.genres, profile.mood, profile.artists, trending_line
    )
}

fn similar_tracks_prompt(similar: &[TrackRef]) -> String {
    format!(
        r#"
Based on these similar tracks: {}

Generate 10 new song recommendations that fit this vibe.

Return ONLY valid JSON:
{{
  "recommendations": [
    {{
      "title": "Song Title",
      "artist": "Artist Name",
      "reason": "Why this fits",
      "suggested_genre": "genre",
      "spotify_url": "https://open.spotify.com/search/{{encoded}}"
    }}
  ]
}}
"#,
        TrackRef::join_for_prompt(similar)
    )
}
