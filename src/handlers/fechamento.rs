// src/handlers/fechamento.rs

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
    models::transaction::{FechamentoQuery, FechamentoResponse},
};

// GET /api/fechamento
#[utoipa::path(
    get,
    path = "/api/fechamento",
    tag = "Fechamento",
    params(FechamentoQuery),
    responses(
        (status = 200, description = "Relatório do período: resumo, transações e série diária", body = FechamentoResponse),
        (status = 403, description = "Simulação de usuário sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_fechamento(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<FechamentoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    // O escopo efetivo considera o "visualizar como" (só SUPER_ADMIN), com a
    // identidade simulada passada explicitamente daqui para baixo.
    let scope = app_state
        .auth_service
        .resolve_effective_scope(&app_state.db_pool, &user.0, query.simulated_user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .transaction_service
        .fechamento(&app_state.db_pool, &scope, &query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(response)))
}
