pub mod profile;
pub mod recommendation;
pub mod track;

pub use profile::{SimilarRequest, UserProfile};
pub use recommendation::RecommendationSet;
pub use track::TrackRef;
