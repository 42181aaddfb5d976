use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::CountryRef;
use crate::offer::{Confidence, OfferCanonical};
use crate::{CoreError, CoreResult};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short label for a zero-based month index.
pub fn month_label(month: u32) -> CoreResult<&'static str> {
    MONTH_LABELS
        .get(month as usize)
        .copied()
        .ok_or_else(|| CoreError::ValidationError(format!("month {} is outside 0..=11", month)))
}

/// `YYYY-MM` key for a zero-based month index.
pub fn month_key(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month + 1)
}

/// Which of the two monthly picks a traveller checked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferKind {
    Cheapest,
    Recommended,
}

/// The winning country for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthRecommendation {
    /// Zero-based calendar month.
    pub month: u32,
    pub year: i32,
    pub country: CountryRef,
    pub cheapest: OfferCanonical,
    pub recommended: OfferCanonical,
    pub score: f64,
    pub insight: String,
    pub refreshed_at: DateTime<Utc>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub verified_offer: Option<OfferKind>,
    #[serde(default)]
    pub user_price: Option<i64>,
    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,
}

impl MonthRecommendation {
    pub fn offer(&self, kind: OfferKind) -> &OfferCanonical {
        match kind {
            OfferKind::Cheapest => &self.cheapest,
            OfferKind::Recommended => &self.recommended,
        }
    }

    pub fn mark_verified(&mut self, kind: OfferKind, observed_price: i64, at: DateTime<Utc>) {
        self.verified = true;
        self.verified_offer = Some(kind);
        self.user_price = Some(observed_price);
        self.verified_at = Some(at);
    }
}

/// Representative prices for one month of a trend chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketPricePoint {
    pub month_key: String,
    pub label: String,
    pub cheapest: Option<i64>,
    pub recommended: Option<i64>,
    pub verified: Option<i64>,
    pub confidence: Confidence,
    pub updated_at: DateTime<Utc>,
}

/// A traveller-reported price check, kept in memory only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub month: u32,
    pub year: i32,
    pub country_code: String,
    pub offer_kind: OfferKind,
    pub displayed_price: i64,
    pub observed_price: i64,
    pub delta: i64,
    pub reported_at: DateTime<Utc>,
}
