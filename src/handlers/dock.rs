// src/handlers/dock.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::dock::SyncReport,
    services::auth::ensure_super_admin,
};

// POST /api/dock/sync
#[utoipa::path(
    post,
    path = "/api/dock/sync",
    tag = "Dock",
    responses(
        (status = 200, description = "Relatório do sincronismo", body = SyncReport),
        (status = 403, description = "Sync desabilitado ou sem permissão"),
        (status = 502, description = "Falha na API da Dock")
    ),
    security(("api_jwt" = []))
)]
pub async fn trigger_sync(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    ensure_super_admin(&user.0).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let report = app_state
        .dock_sync_service
        .sync_all(&app_state.db_pool)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(report)))
}
