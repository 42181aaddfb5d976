pub mod normalizer;
pub mod validator;
pub mod scorer;
pub mod pipeline;
pub mod engine;
pub mod trend;
pub mod generator;
pub mod insight;

#[cfg(test)]
mod fixtures;

pub use normalizer::OfferNormalizer;
pub use validator::OfferValidator;
pub use scorer::OfferScorer;
pub use pipeline::OfferPipeline;
pub use engine::RecommendationEngine;
pub use trend::{apply_verified_prices, TrendBuilder};
pub use generator::MockOfferSource;
pub use insight::TemplateInsightService;
