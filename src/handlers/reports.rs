use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::services::reports::SummaryReport;
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SummaryQuery {
    /// Calendar year, paired with `month`
    pub year: Option<i32>,
    /// Month 1-12, paired with `year`
    pub month: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/reports/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Totals over all records or one month", body = SummaryReport),
        (status = 400, description = "Invalid period", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn summary_report(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<SummaryReport> {
    let report = state
        .reports_service()
        .summary(query.year, query.month)
        .await?;
    Ok(Json(ApiResponse::success(report)))
}
