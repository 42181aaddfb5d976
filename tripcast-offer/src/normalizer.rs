use chrono::Utc;
use tripcast_core::itinerary::{FlightSlice, SliceDirection};
use tripcast_core::offer::{OfferCanonical, OfferFlags, PriceBlock, ValidationVerdict};
use tripcast_core::search::RawOffer;
use tripcast_store::app_config::PricingConfig;
use uuid::Uuid;

/// Turns provider results into canonical offers with display-currency pricing.
pub struct OfferNormalizer {
    config: PricingConfig,
}

impl OfferNormalizer {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Builds a canonical offer with a fresh id and a VALID/HIGH verdict.
    ///
    /// Pricing rounds twice: the passenger-adjusted total is rounded in the
    /// provider currency, then rounded again after conversion. Reproducible
    /// prices depend on keeping both steps.
    pub fn normalize(&self, raw: RawOffer) -> OfferCanonical {
        let raw_total = (raw.base_price * raw.passengers.price_multiplier()).round();
        let total_php = (raw_total * self.config.fx_rate).round() as i64;

        let mut slices: Vec<FlightSlice> = raw
            .slices
            .into_iter()
            .map(|s| FlightSlice::new(s.direction, s.segments))
            .collect();
        // Outbound first; stable so provider order survives within a direction.
        slices.sort_by_key(|s| s.direction == SliceDirection::Inbound);

        OfferCanonical {
            id: Uuid::new_v4(),
            provider: raw.provider,
            trip_type: raw.trip_type,
            origin: raw.origin,
            destination: raw.destination,
            depart_date: raw.depart_date,
            return_date: raw.return_date,
            passengers: raw.passengers,
            cabin: raw.cabin,
            price: PriceBlock {
                raw_total,
                currency: raw.base_currency,
                total_php,
                fx_rate: self.config.fx_rate,
                fx_timestamp: Utc::now(),
                taxes_included: self.config.taxes_included,
            },
            slices,
            flags: OfferFlags {
                separate_tickets: raw.separate_tickets.unwrap_or(false),
                low_cost_carrier: raw.low_cost_carrier.unwrap_or(false),
                baggage_unknown: raw.baggage_unknown.unwrap_or(false),
            },
            validation: ValidationVerdict::default(),
        }
    }
}

impl Default for OfferNormalizer {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}
