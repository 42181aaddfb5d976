use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::itinerary::{FlightSlice, SliceDirection};
use crate::search::{CabinClass, Passengers, TripType};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Valid,
    Quarantined,
}

/// Trust in an offer's displayed price. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Named data-quality defects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    InvalidCarrierForDistance,
    OutlierHardPriceTooLow,
    MissingInboundSlice,
    InvalidSegmentConnection,
    /// Base fare quoted in a currency the FX rate does not apply to.
    UnsupportedCurrency,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationVerdict {
    pub status: ValidationStatus,
    pub reason_codes: Vec<ReasonCode>,
    pub confidence: Confidence,
}

impl Default for ValidationVerdict {
    fn default() -> Self {
        Self {
            status: ValidationStatus::Valid,
            reason_codes: Vec::new(),
            confidence: Confidence::High,
        }
    }
}

impl ValidationVerdict {
    /// Lowers confidence to `tier` unless it is already lower.
    pub fn downgrade(&mut self, tier: Confidence) {
        self.confidence = self.confidence.min(tier);
    }

    pub fn quarantine(&mut self) {
        self.status = ValidationStatus::Quarantined;
        self.downgrade(Confidence::Low);
    }

    pub fn has_reason(&self, code: ReasonCode) -> bool {
        self.reason_codes.contains(&code)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBlock {
    /// Total in the provider currency, rounded to whole units.
    pub raw_total: f64,
    pub currency: String,
    /// Total converted into the display currency, rounded to whole units.
    pub total_php: i64,
    pub fx_rate: f64,
    pub fx_timestamp: DateTime<Utc>,
    pub taxes_included: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OfferFlags {
    pub separate_tickets: bool,
    pub low_cost_carrier: bool,
    pub baggage_unknown: bool,
}

/// Normalized, currency-converted flight offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferCanonical {
    pub id: Uuid,
    pub provider: String,
    pub trip_type: TripType,
    pub origin: String,
    pub destination: String,
    pub depart_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub passengers: Passengers,
    pub cabin: CabinClass,
    pub price: PriceBlock,
    pub slices: Vec<FlightSlice>,
    pub flags: OfferFlags,
    pub validation: ValidationVerdict,
}

impl OfferCanonical {
    pub fn display_price(&self) -> i64 {
        self.price.total_php
    }

    pub fn is_valid(&self) -> bool {
        self.validation.status == ValidationStatus::Valid
    }

    pub fn outbound(&self) -> Option<&FlightSlice> {
        self.slices
            .iter()
            .find(|s| s.direction == SliceDirection::Outbound)
            .or_else(|| self.slices.first())
    }

    pub fn inbound(&self) -> Option<&FlightSlice> {
        self.slices
            .iter()
            .find(|s| s.direction == SliceDirection::Inbound)
    }

    /// Stops across outbound and, if present, inbound.
    pub fn total_stops(&self) -> u32 {
        self.outbound().map(|s| s.stops).unwrap_or(0) + self.inbound().map(|s| s.stops).unwrap_or(0)
    }

    pub fn total_duration_minutes(&self) -> u32 {
        self.outbound().map(|s| s.total_duration_minutes).unwrap_or(0)
            + self.inbound().map(|s| s.total_duration_minutes).unwrap_or(0)
    }
}
