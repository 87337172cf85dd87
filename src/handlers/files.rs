// src/handlers/files.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::file::{FileOwner, StoredFile},
    services::auth::ensure_admin,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FileListQuery {
    pub document_type: Option<String>,
}

fn parse_owner(segment: &str) -> Result<FileOwner, ApiError> {
    FileOwner::parse(segment).ok_or_else(|| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "Entidade deve ser 'merchants' ou 'solicitations'.",
        )
    })
}

// POST /api/files/{entity}/{id} (multipart: file, documentType?)
#[utoipa::path(
    post,
    path = "/api/files/{entity}/{id}",
    tag = "Files",
    params(
        ("entity" = String, Path, description = "merchants | solicitations"),
        ("id" = String, Path, description = "ID da entidade dona")
    ),
    responses(
        (status = 201, description = "Arquivo gravado e vinculado", body = StoredFile),
        (status = 400, description = "Arquivo inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_file(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path((entity, owner_id)): Path<(String, String)>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let owner = parse_owner(&entity)?;

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
            owner,
            &owner_id,
            &file_name,
            &content_type,
            document_type.as_deref(),
            bytes,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(file)))
}

// GET /api/files/{entity}/{id}
#[utoipa::path(
    get,
    path = "/api/files/{entity}/{id}",
    tag = "Files",
    params(
        ("entity" = String, Path, description = "merchants | solicitations"),
        ("id" = String, Path, description = "ID da entidade dona"),
        FileListQuery
    ),
    responses(
        (status = 200, description = "Arquivos vivos da entidade", body = Vec<StoredFile>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_files(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path((entity, owner_id)): Path<(String, String)>,
    Query(query): Query<FileListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = parse_owner(&entity)?;

    let files = app_state
        .file_service
        .list_for_owner(
            &app_state.db_pool,
            owner,
            &owner_id,
            query.document_type.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(files)))
}

// DELETE /api/files/{fileId}
#[utoipa::path(
    delete,
    path = "/api/files/{fileId}",
    tag = "Files",
    params(("fileId" = Uuid, Path, description = "ID do arquivo")),
    responses(
        (status = 200, description = "Arquivo desativado", body = StoredFile),
        (status = 404, description = "Arquivo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_file(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(file_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin(&user.0).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let file = app_state
        .file_service
        .soft_delete(&app_state.db_pool, file_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(file)))
}
