use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parsed completion output, relayed to the client untouched.
///
/// The completion provider is trusted to follow the requested shape
/// (`{"recommendations": [...]}`); nothing here rejects or rewrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationSet(Value);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationItem {
    pub title: String,
    pub artist: String,
    pub reason: String,
    pub suggested_genre: String,
    pub spotify_url: String,
}

impl RecommendationSet {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    #[cfg(test)]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Lenient view over `recommendations`. Entries that are not objects are skipped.
    pub fn items(&self) -> Vec<RecommendationItem> {
        self.0
            .get("recommendations")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.is_object())
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}
