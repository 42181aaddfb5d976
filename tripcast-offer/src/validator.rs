use tripcast_core::offer::{Confidence, OfferCanonical, ReasonCode};
use tripcast_core::search::TripType;
use tripcast_store::app_config::{PricingConfig, ValidationConfig};

/// Plausibility checks that quarantine suspicious offers instead of failing.
pub struct OfferValidator {
    config: ValidationConfig,
    reference_currency: String,
}

impl OfferValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            config,
            reference_currency: PricingConfig::default().base_currency,
        }
    }

    /// Currency the configured FX rate converts from.
    pub fn with_reference_currency(mut self, currency: impl Into<String>) -> Self {
        self.reference_currency = currency.into();
        self
    }

    /// Returns the offer with an updated verdict.
    ///
    /// Every rule runs and adds its own reason code, so defects accumulate
    /// within a pass. Reason codes are rebuilt on each call; status and
    /// confidence only ever move down.
    pub fn validate(&self, offer: OfferCanonical) -> OfferCanonical {
        let mut offer = offer;
        let mut reasons = Vec::new();
        let price = offer.display_price();
        let long_haul = self.config.is_long_haul(&offer.destination);

        // 1. Regional low-cost carriers do not fly long-haul
        if long_haul {
            let carrier = offer.outbound().and_then(|s| s.first_carrier());
            if let Some(carrier) = carrier {
                if self.config.reserved_lcc_carriers.iter().any(|c| c == carrier) {
                    reasons.push(ReasonCode::InvalidCarrierForDistance);
                }
            }
        }

        // 2. Hard floor for long-haul fares
        if long_haul && price < self.config.long_haul_price_floor {
            reasons.push(ReasonCode::OutlierHardPriceTooLow);
        }

        // 3. Round trips need both directions
        if offer.trip_type == TripType::RoundTrip && offer.slices.len() < 2 {
            reasons.push(ReasonCode::MissingInboundSlice);
        }

        // 4. Connection continuity, once per broken connection
        for slice in &offer.slices {
            for _ in slice.broken_connections() {
                reasons.push(ReasonCode::InvalidSegmentConnection);
            }
        }

        // 5. Display prices are only meaningful in the reference currency
        if offer.price.currency != self.reference_currency {
            reasons.push(ReasonCode::UnsupportedCurrency);
        }

        let verdict = &mut offer.validation;
        verdict.reason_codes = reasons;
        if !verdict.reason_codes.is_empty() {
            verdict.quarantine();
            tracing::debug!(
                "Quarantined offer {} to {} at {}: {:?}",
                offer.id,
                offer.destination,
                price,
                verdict.reason_codes
            );
        }

        // Soft outlier: cheap fares outside the known-cheap markets
        if price < self.config.soft_outlier_floor
            && !self.config.soft_outlier_allow_list.iter().any(|a| a == &offer.destination)
        {
            verdict.downgrade(Confidence::Medium);
        }

        offer
    }
}

impl Default for OfferValidator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
