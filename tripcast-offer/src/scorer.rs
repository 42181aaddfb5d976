use tripcast_core::offer::OfferCanonical;
use tripcast_store::app_config::ScoringConfig;

/// Display price that maps to a price term of 1.0.
pub const PRICE_SCALE: f64 = 50_000.0;
/// Quality penalty per stop.
pub const STOP_PENALTY: f64 = 5.0;
/// Minutes of travel that add 1.0 to the quality penalty.
pub const DURATION_SCALE: f64 = 600.0;

/// Linear price/quality blend. Lower is better.
pub struct OfferScorer {
    config: ScoringConfig,
}

impl OfferScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, offer: &OfferCanonical) -> f64 {
        let price_term = offer.display_price() as f64 / PRICE_SCALE;
        let quality_term = offer.total_stops() as f64 * STOP_PENALTY
            + offer.total_duration_minutes() as f64 / DURATION_SCALE;

        self.config.price_weight * price_term + self.config.quality_weight * quality_term
    }
}

impl Default for OfferScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{raw_one_stop, raw_round_trip};
    use crate::normalizer::OfferNormalizer;

    #[test]
    fn test_direct_round_trip_score() {
        let offer = OfferNormalizer::default().normalize(raw_round_trip("NRT", "PR", 300.0));
        // 300 * 56.45 = 16935; two 240 minute slices, no stops
        let expected = 0.75 * (16935.0 / 50_000.0) + 0.25 * (480.0 / 600.0);
        assert!((OfferScorer::default().score(&offer) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic_in_price() {
        let scorer = OfferScorer::default();
        let normalizer = OfferNormalizer::default();
        let cheap = normalizer.normalize(raw_round_trip("NRT", "PR", 300.0));
        let dear = normalizer.normalize(raw_round_trip("NRT", "PR", 320.0));
        assert!(scorer.score(&cheap) < scorer.score(&dear));
    }

    #[test]
    fn test_stops_penalized() {
        let scorer = OfferScorer::default();
        let normalizer = OfferNormalizer::default();
        let direct = normalizer.normalize(raw_round_trip("NRT", "PR", 300.0));
        let one_stop = normalizer.normalize(raw_one_stop("NRT", "HKG", "CX", 300.0));
        assert_eq!(one_stop.total_stops(), 1);
        assert!(scorer.score(&direct) < scorer.score(&one_stop));
    }

    #[test]
    fn test_longer_trip_penalized() {
        let scorer = OfferScorer::default();
        let normalizer = OfferNormalizer::default();
        let mut raw = raw_round_trip("NRT", "PR", 300.0);
        let short = normalizer.normalize(raw.clone());

        let segment = &mut raw.slices[0].segments[0];
        segment.duration_minutes = 360;
        segment.arrive_at = segment.depart_at + chrono::Duration::minutes(360);
        let long = normalizer.normalize(raw);

        assert_eq!(short.display_price(), long.display_price());
        assert_eq!(short.total_stops(), long.total_stops());
        assert_eq!(long.total_duration_minutes(), short.total_duration_minutes() + 120);
        assert!(scorer.score(&short) < scorer.score(&long));
    }

    #[test]
    fn test_weights_are_tunable() {
        let offer = OfferNormalizer::default().normalize(raw_one_stop("NRT", "HKG", "CX", 300.0));
        let price_only = OfferScorer::new(ScoringConfig {
            price_weight: 1.0,
            quality_weight: 0.0,
        });
        assert!((price_only.score(&offer) - 16935.0 / 50_000.0).abs() < 1e-9);
    }
}
