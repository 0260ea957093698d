use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::handlers::nakliye::ListQuery;
use crate::services::yatan_tutar::{CreateYatanTutarInput, UpdateYatanTutarInput};
use crate::{ApiResponse, ApiResult, AppState};

pub use crate::entities::yatan_tutar::Model as YatanTutar;

pub async fn list_yatan_tutar(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<YatanTutar>> {
    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(crate::services::nakliye::DEFAULT_LIMIT);
    let records = state.yatan_tutar_service().list(skip, limit).await?;
    Ok(Json(ApiResponse::success(records)))
}

pub async fn get_yatan_tutar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<YatanTutar> {
    match state.yatan_tutar_service().get(id).await? {
        Some(record) => Ok(Json(ApiResponse::success(record))),
        None => Err(ServiceError::NotFound(format!(
            "Deposit record {} not found",
            id
        ))),
    }
}

pub async fn create_yatan_tutar(
    State(state): State<AppState>,
    Json(payload): Json<CreateYatanTutarInput>,
) -> ApiResult<YatanTutar> {
    let created = state.yatan_tutar_service().create(payload).await?;
    Ok(Json(ApiResponse::success(created)))
}

pub async fn update_yatan_tutar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateYatanTutarInput>,
) -> ApiResult<YatanTutar> {
    let updated = state.yatan_tutar_service().update(id, payload).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn delete_yatan_tutar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.yatan_tutar_service().delete(id).await?;
    Ok(Json(ApiResponse::success(serde_json::json!({
        "id": id,
        "deleted": true
    }))))
}
