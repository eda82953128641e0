pub mod recommend;

pub use recommend::{recommend_routes, AppState};
