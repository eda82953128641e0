//! In-process fakes for provider-level tests.

use crate::error::{AppError, Result};
use crate::models::TrackRef;
use crate::services::{CompletionProvider, MetadataProvider};
use async_trait::async_trait;
use axum::Router;
use std::sync::Mutex;

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Base URL of a local port with nothing listening on it.
pub async fn closed_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub enum Reply {
    Text(String),
    MissingKey,
    Unreachable,
}

/// Records every prompt and answers with a canned reply.
pub struct FakeCompletion {
    reply: Reply,
    prompts: Mutex<Vec<(String, String)>>,
}

impl FakeCompletion {
    pub fn replying(text: &str) -> Self {
        Self::with(Reply::Text(text.to_string()))
    }

    pub fn with(reply: Reply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// `(prompt, system_instruction)` pairs in call order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for FakeCompletion {
    async fn complete(&self, prompt: &str, system_instruction: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), system_instruction.to_string()));

        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::MissingKey => Err(AppError::Config("OPENROUTER_API_KEY is not set".into())),
            Reply::Unreachable => Err(AppError::UpstreamTransport("connection refused".into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    TopTracks { country: String, limit: usize },
    Similar { artist: String, track: String, limit: usize },
}

/// Returns fixed track lists and records each lookup.
#[derive(Default)]
pub struct FakeMetadata {
    top: Vec<TrackRef>,
    similar: Vec<TrackRef>,
    lookups: Mutex<Vec<Lookup>>,
}

impl FakeMetadata {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_top(top: Vec<TrackRef>) -> Self {
        Self {
            top,
            ..Self::default()
        }
    }

    pub fn with_similar(similar: Vec<TrackRef>) -> Self {
        Self {
            similar,
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> Vec<Lookup> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataProvider for FakeMetadata {
    async fn get_top_tracks(&self, country: &str, limit: usize) -> Vec<TrackRef> {
        self.lookups.lock().unwrap().push(Lookup::TopTracks {
            country: country.to_string(),
            limit,
        });
        self.top.iter().take(limit).cloned().collect()
    }

    async fn get_similar_tracks(&self, artist: &str, track: &str, limit: usize) -> Vec<TrackRef> {
        self.lookups.lock().unwrap().push(Lookup::Similar {
            artist: artist.to_string(),
            track: track.to_string(),
            limit,
        });
        self.similar.iter().take(limit).cloned().collect()
    }
}
