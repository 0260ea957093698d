use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::services::nakliye::{
    BulkDeleteOutcome, CreateNakliyeInput, UpdateNakliyeInput, DEFAULT_LIMIT,
};
use crate::{ApiResponse, ApiResult, AppState};

pub use crate::entities::nakliye_kayit::Model as NakliyeKayit;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Rows to skip
    pub skip: Option<u64>,
    /// Rows to return (default 100)
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/nakliye",
    params(ListQuery),
    responses(
        (status = 200, description = "Nakliye records, newest first", body = Vec<NakliyeKayit>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "nakliye"
)]
pub async fn list_nakliye(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<NakliyeKayit>> {
    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let records = state.nakliye_service().list(skip, limit).await?;
    Ok(Json(ApiResponse::success(records)))
}

#[utoipa::path(
    get,
    path = "/api/nakliye/{id}",
    params(("id" = Uuid, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Nakliye record", body = NakliyeKayit),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "nakliye"
)]
pub async fn get_nakliye(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<NakliyeKayit> {
    match state.nakliye_service().get(id).await? {
        Some(record) => Ok(Json(ApiResponse::success(record))),
        None => Err(ServiceError::NotFound(format!(
            "Nakliye record {} not found",
            id
        ))),
    }
}

#[utoipa::path(
    get,
    path = "/api/nakliye/search/{term}",
    params(
        ("term" = String, Path, description = "Search term matched against customer, sequence and waybill numbers"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Matching records", body = Vec<NakliyeKayit>)
    ),
    tag = "nakliye"
)]
pub async fn search_nakliye(
    State(state): State<AppState>,
    Path(term): Path<String>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<NakliyeKayit>> {
    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let records = state.nakliye_service().search(&term, skip, limit).await?;
    Ok(Json(ApiResponse::success(records)))
}

#[utoipa::path(
    get,
    path = "/api/nakliye/period/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Records within the month", body = Vec<NakliyeKayit>),
        (status = 400, description = "Invalid period", body = crate::errors::ErrorResponse)
    ),
    tag = "nakliye"
)]
pub async fn list_nakliye_period(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> ApiResult<Vec<NakliyeKayit>> {
    let records = state.nakliye_service().list_period(year, month).await?;
    Ok(Json(ApiResponse::success(records)))
}

#[utoipa::path(
    post,
    path = "/api/nakliye",
    request_body = CreateNakliyeInput,
    responses(
        (status = 200, description = "Record created", body = NakliyeKayit),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "nakliye"
)]
pub async fn create_nakliye(
    State(state): State<AppState>,
    Json(payload): Json<CreateNakliyeInput>,
) -> ApiResult<NakliyeKayit> {
    let created = state.nakliye_service().create(payload).await?;
    Ok(Json(ApiResponse::success(created)))
}

#[utoipa::path(
    put,
    path = "/api/nakliye/{id}",
    params(("id" = Uuid, Path, description = "Record ID")),
    request_body = UpdateNakliyeInput,
    responses(
        (status = 200, description = "Record updated", body = NakliyeKayit),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "nakliye"
)]
pub async fn update_nakliye(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNakliyeInput>,
) -> ApiResult<NakliyeKayit> {
    let updated = state.nakliye_service().update(id, payload).await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/nakliye/{id}",
    params(("id" = Uuid, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Record deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "nakliye"
)]
pub async fn delete_nakliye(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.nakliye_service().delete(id).await?;
    Ok(Json(ApiResponse::success(serde_json::json!({
        "id": id,
        "deleted": true
    }))))
}

#[utoipa::path(
    post,
    path = "/api/nakliye/bulk-delete",
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Counts of deleted and failed rows", body = BulkDeleteOutcome)
    ),
    tag = "nakliye"
)]
pub async fn bulk_delete_nakliye(
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> ApiResult<BulkDeleteOutcome> {
    if payload.ids.is_empty() {
        return Err(ServiceError::ValidationError(
            "ids must not be empty".into(),
        ));
    }
    let outcome = state.nakliye_service().bulk_delete(&payload.ids).await?;
    Ok(Json(ApiResponse::success(outcome)))
}
