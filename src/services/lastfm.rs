use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::TrackRef;
use crate::services::MetadataProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Last.fm client for trending and similar-track lookups.
#[derive(Debug, Clone)]
pub struct LastFmClient {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct TopTracksResponse {
    tracks: Option<TrackList>,
    #[serde(flatten)]
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct SimilarTracksResponse {
    similartracks: Option<TrackList>,
    #[serde(flatten)]
    error: ApiError,
}

/// Last.fm reports failures as `{"error": 6, "message": "..."}`, often with a 200 status.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiError {
    error: Option<i64>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackList {
    #[serde(default)]
    track: Vec<LastFmTrack>,
}

#[derive(Debug, Deserialize)]
struct LastFmTrack {
    name: Option<String>,
    artist: Option<LastFmArtist>,
}

/// `geo.getTopTracks` nests the artist as an object; some payloads use a bare string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LastFmArtist {
    Name(String),
    Object { name: Option<String> },
}

impl LastFmTrack {
    fn into_track_ref(self) -> TrackRef {
        let artist = match self.artist {
            Some(LastFmArtist::Name(name)) => name,
            Some(LastFmArtist::Object { name }) => name.unwrap_or_default(),
            None => String::new(),
        };
        TrackRef::new(self.name.unwrap_or_default(), artist)
    }
}

impl ApiError {
    fn check(&self) -> Result<()> {
        match self.error {
            Some(code) => Err(AppError::UpstreamTransport(format!(
                "Last.fm error {}: {}",
                code,
                self.message.as_deref().unwrap_or("unknown")
            ))),
            None => Ok(()),
        }
    }
}

impl LastFmClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            api_key: config.lastfm_api_key.clone(),
            base_url: config.lastfm_url.clone(),
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
        limit: usize,
    ) -> Result<Option<T>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        let limit = limit.to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("method", method),
            ("api_key", api_key),
            ("format", "json"),
            ("limit", limit.as_str()),
        ];
        query.extend_from_slice(params);

        debug!("Calling Last.fm {}", method);

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| AppError::UpstreamTransport(format!("Last.fm request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamTransport(format!(
                "Last.fm returned status: {}",
                response.status()
            )));
        }

        let data = response
            .json::<T>()
            .await
            .map_err(|e| AppError::UpstreamFormat(format!("Failed to parse Last.fm response: {}", e)))?;

        Ok(Some(data))
    }

    async fn try_top_tracks(&self, country: &str, limit: usize) -> Result<Vec<TrackRef>> {
        let Some(data) = self
            .fetch::<TopTracksResponse>("geo.getTopTracks", &[("country", country)], limit)
            .await?
        else {
            return Ok(Vec::new());
        };
        data.error.check()?;

        Ok(collect_tracks(data.tracks, limit))
    }

    async fn try_similar_tracks(
        &self,
        artist: &str,
        track: &str,
        limit: usize,
    ) -> Result<Vec<TrackRef>> {
        let Some(data) = self
            .fetch::<SimilarTracksResponse>(
                "track.getSimilar",
                &[("artist", artist), ("track", track)],
                limit,
            )
            .await?
        else {
            return Ok(Vec::new());
        };
        data.error.check()?;

        Ok(collect_tracks(data.similartracks, limit))
    }
}

fn collect_tracks(list: Option<TrackList>, limit: usize) -> Vec<TrackRef> {
    list.map(|l| {
        l.track
            .into_iter()
            .take(limit)
            .map(LastFmTrack::into_track_ref)
            .collect()
    })
    .unwrap_or_default()
}

#[async_trait]
impl MetadataProvider for LastFmClient {
    async fn get_top_tracks(&self, country: &str, limit: usize) -> Vec<TrackRef> {
        self.try_top_tracks(country, limit).await.unwrap_or_else(|e| {
            warn!("Last.fm top tracks lookup failed: {}", e);
            Vec::new()
        })
    }

    async fn get_similar_tracks(&self, artist: &str, track: &str, limit: usize) -> Vec<TrackRef> {
        self.try_similar_tracks(artist, track, limit)
            .await
            .unwrap_or_else(|e| {
                warn!("Last.fm similar tracks lookup for {} - {} failed: {}", artist, track, e);
                Vec::new()
            })
    }
}
