use chrono::{Datelike, NaiveDate, Utc};
use std::sync::Arc;
use tripcast_core::catalog::{Airport, DestinationCatalog};
use tripcast_core::offer::{Confidence, OfferCanonical};
use tripcast_core::recommendation::{month_key, month_label, MarketPricePoint, MonthRecommendation};
use tripcast_core::search::{is_iata_code, TrackedQuery};
use tripcast_core::supplier::RawOfferSource;
use tripcast_core::{CoreError, CoreResult};
use tripcast_store::app_config::{Config, RecommendationConfig};

use crate::pipeline::OfferPipeline;

/// Twelve-point price series for one destination, one sample per month.
pub struct TrendBuilder {
    source: Arc<dyn RawOfferSource>,
    catalog: DestinationCatalog,
    pipeline: OfferPipeline,
    config: RecommendationConfig,
}

impl TrendBuilder {
    pub fn new(config: &Config, source: Arc<dyn RawOfferSource>) -> Self {
        Self {
            source,
            catalog: DestinationCatalog::default(),
            pipeline: OfferPipeline::from_config(config),
            config: config.recommendation.clone(),
        }
    }

    pub fn with_catalog(mut self, catalog: DestinationCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Always returns twelve points. `verified` is left empty here; see
    /// [`apply_verified_prices`].
    pub async fn get_yearly_trend(&self, query: &TrackedQuery, destination: &str) -> CoreResult<Vec<MarketPricePoint>> {
        query.validate()?;
        if !is_iata_code(destination) {
            return Err(CoreError::ValidationError(format!(
                "destination '{}' is not a three-letter airport code",
                destination
            )));
        }

        let airport = self
            .catalog
            .find_airport(destination)
            .map(|(_, airport)| airport.clone())
            .unwrap_or_else(|| Airport {
                iata: destination.to_string(),
                city: destination.to_string(),
            });
        let year = self.config.horizon_year.unwrap_or_else(|| Utc::now().year());

        let mut points = Vec::with_capacity(12);
        for month in 0..12u32 {
            let sample = self.sample_month(query, &airport, year, month).await;
            let cheapest = sample.as_ref().map(|o| o.display_price());

            points.push(MarketPricePoint {
                month_key: month_key(year, month),
                label: month_label(month)?.to_string(),
                cheapest,
                recommended: cheapest.map(|p| (p as f64 * self.config.trend_premium).round() as i64),
                verified: None,
                confidence: sample.map(|o| o.validation.confidence).unwrap_or(Confidence::Low),
                updated_at: Utc::now(),
            });
        }

        Ok(points)
    }

    /// The first valid offer on the sample day, else the first offer at all.
    async fn sample_month(
        &self,
        query: &TrackedQuery,
        airport: &Airport,
        year: i32,
        month: u32,
    ) -> Option<OfferCanonical> {
        let day = self.config.trend_sample_day.clamp(1, 28);
        let depart_date = NaiveDate::from_ymd_opt(year, month + 1, day)?;

        let raw_offers = match self.source.search_offers(query, depart_date, airport).await {
            Ok(offers) => offers,
            Err(e) => {
                tracing::warn!("Trend sample failed for {} on {}: {}", airport.iata, depart_date, e);
                return None;
            }
        };

        let offers: Vec<OfferCanonical> = raw_offers.into_iter().map(|raw| self.pipeline.process(raw)).collect();
        let index = offers.iter().position(|o| o.is_valid()).unwrap_or(0);
        offers.into_iter().nth(index)
    }
}

/// Copies traveller-verified prices onto matching trend points.
///
/// A month counts only when the verified offer flew to `destination`.
pub fn apply_verified_prices(points: &mut [MarketPricePoint], destination: &str, months: &[MonthRecommendation]) {
    for rec in months {
        let (Some(kind), Some(price)) = (rec.verified_offer, rec.user_price) else {
            continue;
        };
        if rec.offer(kind).destination != destination {
            continue;
        }
        let key = month_key(rec.year, rec.month);
        if let Some(point) = points.iter_mut().find(|p| p.month_key == key) {
            point.verified = Some(price);
        }
    }
}
