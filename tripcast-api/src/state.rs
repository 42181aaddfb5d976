use std::sync::Arc;
use tripcast_core::repository::RecommendationRepository;
use tripcast_core::supplier::{InsightService, RawOfferSource};
use tripcast_offer::{MockOfferSource, RecommendationEngine, TemplateInsightService, TrendBuilder};
use tripcast_store::{Config, RecommendationBoard};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    pub trend: Arc<TrendBuilder>,
    /// One planning session shared by every caller: a build replaces the
    /// whole board and verifications land on whatever build is current.
    pub board: Arc<dyn RecommendationRepository>,
}

impl AppState {
    pub fn new(
        config: &Config,
        source: Arc<dyn RawOfferSource>,
        insights: Arc<dyn InsightService>,
    ) -> Self {
        Self {
            engine: Arc::new(RecommendationEngine::new(config, source.clone(), insights)),
            trend: Arc::new(TrendBuilder::new(config, source)),
            board: Arc::new(RecommendationBoard::new()),
        }
    }

    /// Wires the stand-in offer generator and template insights.
    pub fn with_mock_provider(config: &Config) -> Self {
        Self::new(
            config,
            Arc::new(MockOfferSource::new(&config.provider).with_currency(config.pricing.base_currency.clone())),
            Arc::new(TemplateInsightService),
        )
    }
}
