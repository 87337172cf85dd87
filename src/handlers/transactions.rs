// src/handlers/transactions.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::transaction::{GroupedQuery, LabeledGroupedTotal, TransactionQuery},
};

// GET /api/transactions
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Transactions",
    params(TransactionQuery),
    responses(
        (status = 200, description = "Página de transações no escopo do caller"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<TransactionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = app_state
        .auth_service
        .resolve_scope(&app_state.db_pool, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let (transactions, pagination) = app_state
        .transaction_service
        .list(&app_state.db_pool, &scope, &query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::OK,
        Json(json!({ "transactions": transactions, "pagination": pagination })),
    ))
}

// GET /api/transactions/grouped?by=day|brand|status|product
#[utoipa::path(
    get,
    path = "/api/transactions/grouped",
    tag = "Transactions",
    params(GroupedQuery),
    responses(
        (status = 200, description = "Totais agregados pela chave pedida", body = Vec<LabeledGroupedTotal>)
    ),
    security(("api_jwt" = []))
)]
pub async fn grouped_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<GroupedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = app_state
        .auth_service
        .resolve_scope(&app_state.db_pool, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let groups = app_state
        .transaction_service
        .grouped(&app_state.db_pool, &scope, &query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(groups)))
}
