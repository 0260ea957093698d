use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Nakliye Kontrol Sistemi API",
        version = "1.0.0",
        description = r#"
# Nakliye Kontrol Sistemi

Record keeping for Arkas Lojistik transport hauls: nakliye records with their
charge breakdown, deposited amounts for period reconciliation, JSON backups
and account management.

## Authentication

Account endpoints under `/api/auth` issue a JWT after login:

```
Authorization: Bearer <token>
```

Record endpoints do not require a token; the desktop client also operates
offline against a local copy.
        "#
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development")
    ),
    tags(
        (name = "nakliye", description = "Transport records"),
        (name = "yatan-tutar", description = "Deposited amounts"),
        (name = "backup", description = "JSON export and import"),
        (name = "reports", description = "Summary reports"),
        (name = "auth", description = "Accounts and verification")
    ),
    paths(
        crate::handlers::nakliye::list_nakliye,
        crate::handlers::nakliye::get_nakliye,
        crate::handlers::nakliye::search_nakliye,
        crate::handlers::nakliye::list_nakliye_period,
        crate::handlers::nakliye::create_nakliye,
        crate::handlers::nakliye::update_nakliye,
        crate::handlers::nakliye::delete_nakliye,
        crate::handlers::nakliye::bulk_delete_nakliye,

        crate::handlers::backup::export_backup,
        crate::handlers::backup::import_backup,

        crate::handlers::reports::summary_report,

        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::verify,
        crate::handlers::auth::me,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,
            crate::errors::ErrorResponse,

            crate::entities::nakliye_kayit::Model,
            crate::entities::yatan_tutar::Model,
            crate::services::nakliye::CreateNakliyeInput,
            crate::services::nakliye::UpdateNakliyeInput,
            crate::services::nakliye::BulkDeleteOutcome,
            crate::services::yatan_tutar::CreateYatanTutarInput,
            crate::services::yatan_tutar::UpdateYatanTutarInput,
            crate::services::backup::BackupDocument,
            crate::services::backup::ImportOutcome,
            crate::services::reports::SummaryReport,

            crate::auth::RegisterInput,
            crate::auth::TokenResponse,
            crate::handlers::auth::UserProfile,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::VerifyRequest,
            crate::handlers::nakliye::BulkDeleteRequest,
        )
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_includes_core_paths() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_string(&openapi).unwrap();
        assert!(json.contains("Nakliye Kontrol Sistemi"));
        assert!(json.contains("/api/nakliye"));
        assert!(json.contains("/api/auth/login"));
    }
}
