use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tripcast_core::recommendation::{MonthRecommendation, OfferKind, VerificationReport};
use tripcast_core::repository::RecommendationRepository;
use tripcast_core::{CoreError, CoreResult};

/// In-memory session board holding the latest monthly build.
///
/// Verification reports live only as long as the process.
#[derive(Default)]
pub struct RecommendationBoard {
    months: RwLock<BTreeMap<u32, MonthRecommendation>>,
    reports: RwLock<Vec<VerificationReport>>,
}

impl RecommendationBoard {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecommendationRepository for RecommendationBoard {
    async fn replace_all(&self, months: Vec<MonthRecommendation>) -> CoreResult<()> {
        let mut guard = self.months.write().await;
        guard.clear();
        for rec in months {
            guard.insert(rec.month, rec);
        }
        tracing::debug!("Recommendation board now holds {} months", guard.len());
        Ok(())
    }

    async fn list(&self) -> CoreResult<Vec<MonthRecommendation>> {
        Ok(self.months.read().await.values().cloned().collect())
    }

    async fn get(&self, month: u32) -> CoreResult<Option<MonthRecommendation>> {
        Ok(self.months.read().await.get(&month).cloned())
    }

    async fn confirm_verification(
        &self,
        month: u32,
        kind: OfferKind,
        observed_price: i64,
    ) -> CoreResult<MonthRecommendation> {
        if observed_price <= 0 {
            return Err(CoreError::ValidationError(format!(
                "observed price must be positive, got {}",
                observed_price
            )));
        }

        // Holding the write guard across the update keeps each month record consistent.
        let mut months = self.months.write().await;
        let rec = months
            .get_mut(&month)
            .ok_or_else(|| CoreError::NotFound(format!("no recommendation for month {}", month)))?;

        let now = Utc::now();
        let displayed_price = rec.offer(kind).display_price();
        rec.mark_verified(kind, observed_price, now);

        let report = VerificationReport {
            month,
            year: rec.year,
            country_code: rec.country.code.clone(),
            offer_kind: kind,
            displayed_price,
            observed_price,
            delta: observed_price - displayed_price,
            reported_at: now,
        };
        tracing::info!(
            "Verified {:?} offer for {} month {}: displayed {}, observed {}",
            kind,
            report.country_code,
            month,
            displayed_price,
            observed_price
        );
        self.reports.write().await.push(report);

        Ok(rec.clone())
    }

    async fn list_reports(&self) -> CoreResult<Vec<VerificationReport>> {
        Ok(self.reports.read().await.clone())
    }
}
