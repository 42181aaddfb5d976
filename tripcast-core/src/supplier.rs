use async_trait::async_trait;
use chrono::NaiveDate;

use crate::catalog::Airport;
use crate::search::{RawOffer, TrackedQuery};

/// Any flight search backend able to answer a single dated sample.
///
/// Implementations own their retry and timeout policy; an `Err` here is
/// treated by callers as an empty sample.
#[async_trait]
pub trait RawOfferSource: Send + Sync {
    async fn search_offers(
        &self,
        query: &TrackedQuery,
        depart_date: NaiveDate,
        destination: &Airport,
    ) -> Result<Vec<RawOffer>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Short travel blurb for a month's pick.
#[async_trait]
pub trait InsightService: Send + Sync {
    async fn describe(
        &self,
        country_name: &str,
        month_label: &str,
        price: i64,
        stops: u32,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

pub const FALLBACK_INSIGHT: &str =
    "Prices for this month look steady. Check the fare again closer to booking.";

/// Calls the insight service, swallowing failures into [`FALLBACK_INSIGHT`].
pub async fn insight_or_fallback(
    service: &dyn InsightService,
    country_name: &str,
    month_label: &str,
    price: i64,
    stops: u32,
) -> String {
    match service.describe(country_name, month_label, price, stops).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => FALLBACK_INSIGHT.to_string(),
        Err(e) => {
            tracing::warn!("Insight service failed for {} in {}: {}", country_name, month_label, e);
            FALLBACK_INSIGHT.to_string()
        }
    }
}
