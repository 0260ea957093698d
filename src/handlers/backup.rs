use axum::{extract::State, response::Json};
use serde_json::json;

use crate::auth::OptionalAuthUser;
use crate::services::backup::{BackupDocument, ImportOutcome};
use crate::{ApiResponse, ApiResult, AppState};

/// Exports everything as one JSON document. A valid token enriches the
/// backup with the exporting account; without one the export is anonymous,
/// matching the desktop client's offline behavior.
#[utoipa::path(
    get,
    path = "/api/backup/export",
    responses(
        (status = 200, description = "Full backup document", body = BackupDocument)
    ),
    tag = "backup"
)]
pub async fn export_backup(
    State(state): State<AppState>,
    OptionalAuthUser(claims): OptionalAuthUser,
) -> ApiResult<BackupDocument> {
    let user = claims.map(|c| json!({ "identifier": c.sub }));
    let document = state.backup_service().export(user).await?;
    Ok(Json(ApiResponse::success(document)))
}

#[utoipa::path(
    post,
    path = "/api/backup/import",
    request_body = BackupDocument,
    responses(
        (status = 200, description = "Import counts", body = ImportOutcome),
        (status = 400, description = "Malformed document", body = crate::errors::ErrorResponse)
    ),
    tag = "backup"
)]
pub async fn import_backup(
    State(state): State<AppState>,
    Json(document): Json<BackupDocument>,
) -> ApiResult<ImportOutcome> {
    let outcome = state.backup_service().import(document).await?;
    Ok(Json(ApiResponse::success(outcome)))
}
