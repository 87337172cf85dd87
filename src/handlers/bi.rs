// src/handlers/bi.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::bi::{BiDashboardResponse, BiQuery},
};

// GET /api/bi
#[utoipa::path(
    get,
    path = "/api/bi",
    tag = "BI",
    params(BiQuery),
    responses(
        (status = 200, description = "Painel completo de indicadores", body = BiDashboardResponse),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_bi(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<BiQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = app_state
        .auth_service
        .resolve_scope(&app_state.db_pool, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let dashboard = app_state
        .bi_service
        .dashboard(&app_state.db_pool, &scope, &query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(dashboard)))
}
