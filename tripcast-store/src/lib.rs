pub mod app_config;
pub mod recommendation_repo;

pub use app_config::Config;
pub use recommendation_repo::RecommendationBoard;
