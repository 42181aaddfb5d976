use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tripcast_core::recommendation::{MarketPricePoint, MonthRecommendation, OfferKind, VerificationReport};
use tripcast_core::search::TrackedQuery;
use tripcast_offer::apply_verified_prices;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TrendRequest {
    pub query: TrackedQuery,
    pub destination: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub offer_kind: OfferKind,
    pub observed_price: i64,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/recommendations
/// Rebuilds the year of monthly picks and replaces the session board
pub async fn build_recommendations(
    State(state): State<AppState>,
    Json(query): Json<TrackedQuery>,
) -> Result<Json<Vec<MonthRecommendation>>, AppError> {
    let months = state.engine.get_monthly_recommendations(&query).await?;
    state.board.replace_all(months.clone()).await?;
    Ok(Json(months))
}

/// GET /v1/recommendations
pub async fn list_recommendations(
    State(state): State<AppState>,
) -> Result<Json<Vec<MonthRecommendation>>, AppError> {
    Ok(Json(state.board.list().await?))
}

/// GET /v1/recommendations/{month}
pub async fn get_recommendation(
    State(state): State<AppState>,
    Path(month): Path<u32>,
) -> Result<Json<MonthRecommendation>, AppError> {
    let rec = state
        .board
        .get(month)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("no recommendation for month {}", month)))?;
    Ok(Json(rec))
}

/// POST /v1/recommendations/{month}/verify
pub async fn verify_recommendation(
    State(state): State<AppState>,
    Path(month): Path<u32>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<MonthRecommendation>, AppError> {
    if month > 11 {
        return Err(AppError::ValidationError(format!("month {} is outside 0..=11", month)));
    }
    let rec = state
        .board
        .confirm_verification(month, req.offer_kind, req.observed_price)
        .await?;
    Ok(Json(rec))
}

/// GET /v1/verifications
pub async fn list_verifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<VerificationReport>>, AppError> {
    Ok(Json(state.board.list_reports().await?))
}

/// POST /v1/trend
pub async fn yearly_trend(
    State(state): State<AppState>,
    Json(req): Json<TrendRequest>,
) -> Result<Json<Vec<MarketPricePoint>>, AppError> {
    let mut points = state.trend.get_yearly_trend(&req.query, &req.destination).await?;
    let months = state.board.list().await?;
    apply_verified_prices(&mut points, &req.destination, &months);
    Ok(Json(points))
}
