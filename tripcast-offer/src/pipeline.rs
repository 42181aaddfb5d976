use tripcast_core::offer::OfferCanonical;
use tripcast_core::search::RawOffer;
use tripcast_store::app_config::Config;

use crate::normalizer::OfferNormalizer;
use crate::scorer::OfferScorer;
use crate::validator::OfferValidator;

/// Raw offer -> canonical -> validated, plus scoring.
pub struct OfferPipeline {
    normalizer: OfferNormalizer,
    validator: OfferValidator,
    scorer: OfferScorer,
}

impl OfferPipeline {
    pub fn new(normalizer: OfferNormalizer, validator: OfferValidator, scorer: OfferScorer) -> Self {
        Self {
            normalizer,
            validator,
            scorer,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            OfferNormalizer::new(config.pricing.clone()),
            OfferValidator::new(config.validation.clone())
                .with_reference_currency(config.pricing.base_currency.clone()),
            OfferScorer::new(config.scoring.clone()),
        )
    }

    pub fn process(&self, raw: RawOffer) -> OfferCanonical {
        self.validator.validate(self.normalizer.normalize(raw))
    }

    pub fn score(&self, offer: &OfferCanonical) -> f64 {
        self.scorer.score(offer)
    }
}

impl Default for OfferPipeline {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
