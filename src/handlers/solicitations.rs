// src/handlers/solicitations.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        file::FileOwner,
        solicitation::{
            CompleteSolicitationPayload, CreateSolicitationPayload, DeclineSolicitationPayload,
            ReviewSolicitationPayload, Solicitation, SolicitationDetail, SolicitationStatus,
        },
    },
    services::auth::ensure_admin,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SolicitationListQuery {
    pub status: Option<SolicitationStatus>,
}

// POST /api/solicitations
#[utoipa::path(
    post,
    path = "/api/solicitations",
    tag = "Solicitations",
    request_body = CreateSolicitationPayload,
    responses(
        (status = 201, description = "Solicitação aberta", body = SolicitationDetail),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_solicitation(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateSolicitationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let scope = app_state
        .auth_service
        .resolve_scope(&app_state.db_pool, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .solicitation_service
        .create(&app_state.db_pool, &scope, user.0.id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/solicitations
#[utoipa::path(
    get,
    path = "/api/solicitations",
    tag = "Solicitations",
    params(SolicitationListQuery),
    responses(
        (status = 200, description = "Solicitações visíveis no escopo", body = Vec<Solicitation>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_solicitations(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<SolicitationListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = app_state
        .auth_service
        .resolve_scope(&app_state.db_pool, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let solicitations = app_state
        .solicitation_service
        .list(&app_state.db_pool, &scope, query.status)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(solicitations)))
}

// GET /api/solicitations/{id}
#[utoipa::path(
    get,
    path = "/api/solicitations/{id}",
    tag = "Solicitations",
    params(("id" = Uuid, Path, description = "ID da solicitação")),
    responses(
        (status = 200, description = "Detalhe com grades e documentos", body = SolicitationDetail),
        (status = 404, description = "Solicitação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_solicitation(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = app_state
        .auth_service
        .resolve_scope(&app_state.db_pool, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .solicitation_service
        .detail(&app_state.db_pool, &scope, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/solicitations/{id}/submit
#[utoipa::path(
    post,
    path = "/api/solicitations/{id}/submit",
    tag = "Solicitations",
    params(("id" = Uuid, Path, description = "ID da solicitação")),
    responses(
        (status = 200, description = "Solicitação enviada para análise", body = Solicitation),
        (status = 400, description = "Sem documentos anexados"),
        (status = 409, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn submit_solicitation(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = app_state
        .auth_service
        .resolve_scope(&app_state.db_pool, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let solicitation = app_state
        .solicitation_service
        .submit(&app_state.db_pool, &scope, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(solicitation)))
}

// POST /api/solicitations/{id}/review
#[utoipa::path(
    post,
    path = "/api/solicitations/{id}/review",
    tag = "Solicitations",
    params(("id" = Uuid, Path, description = "ID da solicitação")),
    request_body = ReviewSolicitationPayload,
    responses(
        (status = 200, description = "Contraproposta registrada", body = SolicitationDetail),
        (status = 409, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn review_solicitation(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewSolicitationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&user.0).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .solicitation_service
        .review(&app_state.db_pool, &user.0, id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/solicitations/{id}/approve
#[utoipa::path(
    post,
    path = "/api/solicitations/{id}/approve",
    tag = "Solicitations",
    params(("id" = Uuid, Path, description = "ID da solicitação")),
    responses(
        (status = 200, description = "Solicitação aprovada", body = Solicitation),
        (status = 409, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_solicitation(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&user.0).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let solicitation = app_state
        .solicitation_service
        .approve(&app_state.db_pool, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(solicitation)))
}

// POST /api/solicitations/{id}/decline
#[utoipa::path(
    post,
    path = "/api/solicitations/{id}/decline",
    tag = "Solicitations",
    params(("id" = Uuid, Path, description = "ID da solicitação")),
    request_body = DeclineSolicitationPayload,
    responses(
        (status = 200, description = "Solicitação recusada", body = Solicitation),
        (status = 409, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn decline_solicitation(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<DeclineSolicitationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&user.0).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let solicitation = app_state
        .solicitation_service
        .decline(&app_state.db_pool, id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(solicitation)))
}

// POST /api/solicitations/{id}/complete
#[utoipa::path(
    post,
    path = "/api/solicitations/{id}/complete",
    tag = "Solicitations",
    params(("id" = Uuid, Path, description = "ID da solicitação")),
    request_body = CompleteSolicitationPayload,
    responses(
        (status = 200, description = "Solicitação concluída", body = SolicitationDetail),
        (status = 409, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn complete_solicitation(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteSolicitationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&user.0).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .solicitation_service
        .complete(&app_state.db_pool, id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/solicitations/{id}/documents (multipart: file, documentType?)
#[utoipa::path(
    post,
    path = "/api/solicitations/{id}/documents",
    tag = "Solicitations",
    params(("id" = Uuid, Path, description = "ID da solicitação")),
    responses(
        (status = 201, description = "Documento anexado"),
        (status = 400, description = "Arquivo inválido"),
        (status = 404, description = "Solicitação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn attach_document(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let scope = app_state
        .auth_service
        .resolve_scope(&app_state.db_pool, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let mut document_type: Option<String> = None;
    let mut upload: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "Multipart inválido."))?
    {
        match field.name() {
            Some("documentType") => {
                document_type = field.text().await.ok();
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("documento").to_string();
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

    let (file_name, content_type, bytes) = upload
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "Campo 'file' é obrigatório."))?;

    let file = app_state
        .file_service
        .upload_for_owner(
            &app_state.db_pool,
            FileOwner::Solicitation,
            &id.to_string(),
            &file_name,
            &content_type,
            document_type.as_deref(),
            bytes,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .solicitation_service
        .link_document(&app_state.db_pool, &scope, id, file.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(file)))
}
