use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Free-text listener profile sent to `/api/recommend`.
/// Every field is optional and treated as empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    #[serde(deserialize_with = "null_as_empty")]
    pub interests: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub genres: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub mood: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub artists: String,
}

/// Seed track sent to `/api/similar`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SimilarRequest {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1))]
    pub artist: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1))]
    pub track: String,
}

/// Clients send `null` for cleared fields; treat it like an absent field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
