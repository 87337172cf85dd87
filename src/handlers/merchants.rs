// src/handlers/merchants.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::merchant::{MerchantDetail, MerchantFilters, MerchantListResponse},
};

// GET /api/merchants
#[utoipa::path(
    get,
    path = "/api/merchants",
    tag = "Merchants",
    params(MerchantFilters),
    responses(
        (status = 200, description = "Diretório de ECs com resumo e paginação", body = MerchantListResponse),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_merchants(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(filters): Query<MerchantFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = app_state
        .auth_service
        .resolve_scope(&app_state.db_pool, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let mask = !user.0.view_sensitive_data;

    let response = app_state
        .merchant_service
        .list(&app_state.db_pool, &scope, &filters, mask)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(response)))
}

// GET /api/merchants/{id}
#[utoipa::path(
    get,
    path = "/api/merchants/{id}",
    tag = "Merchants",
    params(("id" = i64, Path, description = "ID do estabelecimento")),
    responses(
        (status = 200, description = "Detalhe do EC", body = MerchantDetail),
        (status = 404, description = "Estabelecimento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_merchant(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = app_state
        .auth_service
        .resolve_scope(&app_state.db_pool, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let mask = !user.0.view_sensitive_data;

    let detail = app_state
        .merchant_service
        .detail(&app_state.db_pool, &scope, id, mask)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}
