use async_trait::async_trait;

use crate::recommendation::{MonthRecommendation, OfferKind, VerificationReport};
use crate::CoreResult;

/// Session store for the latest monthly build and the verification workflow.
#[async_trait]
pub trait RecommendationRepository: Send + Sync {
    /// Replaces the stored months with a fresh build.
    async fn replace_all(&self, months: Vec<MonthRecommendation>) -> CoreResult<()>;

    async fn list(&self) -> CoreResult<Vec<MonthRecommendation>>;

    async fn get(&self, month: u32) -> CoreResult<Option<MonthRecommendation>>;

    /// Records a traveller-observed price against one month's pick.
    /// Last write wins when the same month is confirmed twice.
    async fn confirm_verification(
        &self,
        month: u32,
        kind: OfferKind,
        observed_price: i64,
    ) -> CoreResult<MonthRecommendation>;

    async fn list_reports(&self) -> CoreResult<Vec<VerificationReport>>;
}
