// src/handlers/repasse.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        scope::AccessScope,
        settlement::{MonthlySettlement, RepasseYearResponse},
    },
    services::{auth::ensure_admin, settlement_service::InvoiceUploadResponse},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RepasseQuery {
    #[param(example = 2024)]
    pub year: i32,
    pub customer_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatePayload {
    pub customer_id: i64,
    #[validate(range(min = 1, max = 12, message = "Mês deve estar entre 1 e 12"))]
    pub month: i32,
    #[validate(range(min = 2020, max = 2100, message = "Ano fora do intervalo"))]
    pub year: i32,
}

// Determina o cliente do extrato: o pedido tem que caber no escopo; sem
// pedido, só funciona quando o escopo aponta para exatamente um cliente.
fn resolve_repasse_customer(
    scope: &AccessScope,
    requested: Option<i64>,
) -> Result<i64, AppError> {
    match requested {
        Some(customer_id) => {
            if scope.narrow(Some(customer_id)).is_empty() {
                Err(AppError::AccessDenied)
            } else {
                Ok(customer_id)
            }
        }
        None => scope.single_customer().ok_or(AppError::CustomerRequired),
    }
}

// GET /api/repasse?year=
#[utoipa::path(
    get,
    path = "/api/repasse",
    tag = "Repasse",
    params(RepasseQuery),
    responses(
        (status = 200, description = "Extrato anual de repasse com resumo", body = RepasseYearResponse),
        (status = 400, description = "Cliente não informado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_repasse(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<RepasseQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = app_state
        .auth_service
        .resolve_scope(&app_state.db_pool, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let customer_id = resolve_repasse_customer(&scope, query.customer_id)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .settlement_service
        .year_view(&app_state.db_pool, customer_id, query.year)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(response)))
}

// POST /api/repasse/upload (multipart: file, settlementId)
#[utoipa::path(
    post,
    path = "/api/repasse/upload",
    tag = "Repasse",
    responses(
        (status = 200, description = "Nota recebida; fechamento em validação", body = InvoiceUploadResponse),
        (status = 400, description = "Arquivo rejeitado"),
        (status = 409, description = "Fechamento não aceita nota"),
        (status = 413, description = "Arquivo acima de 5MB")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let scope = app_state
        .auth_service
        .resolve_scope(&app_state.db_pool, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let mut settlement_id: Option<Uuid> = None;
    let mut upload: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "Multipart inválido."))?
    {
        match field.name() {
            Some("settlementId") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "Multipart inválido."))?;
                settlement_id = Some(Uuid::parse_str(text.trim()).map_err(|_| {
                    ApiError::new(StatusCode::BAD_REQUEST, "settlementId não é um UUID.")
                })?);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("nota").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "Upload interrompido."))?;
                upload = Some((file_name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let settlement_id = settlement_id.ok_or_else(|| {
        ApiError::new(StatusCode::BAD_REQUEST, "Campo 'settlementId' é obrigatório.")
    })?;
    let (file_name, content_type, bytes) = upload
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "Campo 'file' é obrigatório."))?;

    let response = app_state
        .settlement_service
        .upload_invoice(
            &app_state.db_pool,
            &scope,
            settlement_id,
            &file_name,
            &content_type,
            bytes,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(response)))
}

// POST /api/repasse/{settlementId}/pay
#[utoipa::path(
    post,
    path = "/api/repasse/{settlementId}/pay",
    tag = "Repasse",
    params(("settlementId" = Uuid, Path, description = "ID do fechamento")),
    responses(
        (status = 200, description = "Repasse pago", body = MonthlySettlement),
        (status = 403, description = "Sem permissão"),
        (status = 409, description = "Fechamento não está apto a pagamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn pay_settlement(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(settlement_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&user.0).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let settlement = app_state
        .settlement_service
        .mark_paid(&app_state.db_pool, settlement_id, user.0.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(settlement)))
}

// POST /api/repasse/invoices/{invoiceId}/revalidate
#[utoipa::path(
    post,
    path = "/api/repasse/invoices/{invoiceId}/revalidate",
    tag = "Repasse",
    params(("invoiceId" = Uuid, Path, description = "ID da nota fiscal")),
    responses(
        (status = 200, description = "Validação reprocessada", body = InvoiceUploadResponse),
        (status = 409, description = "Nota não está pendente")
    ),
    security(("api_jwt" = []))
)]
pub async fn revalidate_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(invoice_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&user.0).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .settlement_service
        .revalidate_invoice(&app_state.db_pool, invoice_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(response)))
}

// POST /api/repasse/consolidate
#[utoipa::path(
    post,
    path = "/api/repasse/consolidate",
    tag = "Repasse",
    request_body = ConsolidatePayload,
    responses(
        (status = 200, description = "Período consolidado", body = MonthlySettlement),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn consolidate_period(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<ConsolidatePayload>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&user.0).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let settlement = app_state
        .settlement_service
        .consolidate_month(
            &app_state.db_pool,
            payload.customer_id,
            payload.month,
            payload.year,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(settlement)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extrato_exige_cliente_determinado() {
        // Admin irrestrito precisa dizer qual cliente quer
        assert!(matches!(
            resolve_repasse_customer(&AccessScope::Unrestricted, None),
            Err(AppError::CustomerRequired)
        ));
        assert_eq!(
            resolve_repasse_customer(&AccessScope::Unrestricted, Some(7)).unwrap(),
            7
        );
    }

    #[test]
    fn extrato_nao_fura_o_escopo() {
        let scope = AccessScope::Customers(vec![7]);
        assert_eq!(resolve_repasse_customer(&scope, None).unwrap(), 7);
        assert!(matches!(
            resolve_repasse_customer(&scope, Some(9)),
            Err(AppError::AccessDenied)
        ));

        // Usuário com mais de um ISO precisa escolher
        let scope = AccessScope::Customers(vec![7, 8]);
        assert!(matches!(
            resolve_repasse_customer(&scope, None),
            Err(AppError::CustomerRequired)
        ));
        assert_eq!(resolve_repasse_customer(&scope, Some(8)).unwrap(), 8);
    }
}
