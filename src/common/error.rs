// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro de domínio, com `thiserror` para melhor ergonomia.
// Os handlers convertem para ApiError (localizado) na borda HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Acesso negado")]
    AccessDenied,

    #[error("Estabelecimento não encontrado")]
    MerchantNotFound,

    #[error("Categoria não encontrada")]
    CategoryNotFound,

    #[error("Solicitação não encontrada")]
    SolicitationNotFound,

    #[error("Fechamento não encontrado")]
    SettlementNotFound,

    #[error("Nota fiscal não encontrada")]
    InvoiceNotFound,

    #[error("Arquivo não encontrado")]
    FileNotFound,

    #[error("Cliente (ISO) não informado")]
    CustomerRequired,

    #[error("Cliente (ISO) não encontrado")]
    CustomerNotFound,

    #[error("Tipo de arquivo não suportado: {0}")]
    UnsupportedFileType(String),

    #[error("Arquivo excede o tamanho máximo ({0} bytes)")]
    FileTooLarge(usize),

    #[error("Comissão abaixo do mínimo para repasse")]
    CommissionBelowMinimum,

    #[error("Transição de status não permitida: {0}")]
    InvalidStatusTransition(String),

    #[error("Solicitação sem documentos anexados")]
    MissingDocuments,

    #[error("Sincronização Dock desabilitada")]
    DockSyncDisabled,

    #[error("Erro na API da Dock: {0}")]
    DockApiError(#[from] reqwest::Error),

    #[error("Falha de escrita no object storage: {0}")]
    StorageWriteFailed(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    // Código estável usado pelo catálogo i18n e pelos clientes.
    fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation",
            AppError::EmailAlreadyExists => "email_already_exists",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken | AppError::JwtError(_) => "invalid_token",
            AppError::UserNotFound => "user_not_found",
            AppError::AccessDenied => "access_denied",
            AppError::MerchantNotFound => "merchant_not_found",
            AppError::CategoryNotFound => "category_not_found",
            AppError::SolicitationNotFound => "solicitation_not_found",
            AppError::SettlementNotFound => "settlement_not_found",
            AppError::InvoiceNotFound => "invoice_not_found",
            AppError::FileNotFound => "file_not_found",
            AppError::CustomerRequired => "customer_required",
            AppError::CustomerNotFound => "customer_not_found",
            AppError::UnsupportedFileType(_) => "unsupported_file_type",
            AppError::FileTooLarge(_) => "file_too_large",
            AppError::CommissionBelowMinimum => "commission_below_minimum",
            AppError::InvalidStatusTransition(_) => "invalid_status_transition",
            AppError::MissingDocuments => "missing_documents",
            AppError::DockSyncDisabled => "dock_sync_disabled",
            AppError::DockApiError(_) => "dock_api_error",
            AppError::StorageWriteFailed(_) => "storage_write_failed",
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::CustomerRequired
            | AppError::UnsupportedFileType(_)
            | AppError::MissingDocuments => StatusCode::BAD_REQUEST,
            AppError::FileTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::JwtError(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::AccessDenied | AppError::DockSyncDisabled => StatusCode::FORBIDDEN,
            AppError::UserNotFound
            | AppError::CustomerNotFound
            | AppError::MerchantNotFound
            | AppError::CategoryNotFound
            | AppError::SolicitationNotFound
            | AppError::SettlementNotFound
            | AppError::InvoiceNotFound
            | AppError::FileNotFound => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists
            | AppError::CommissionBelowMinimum
            | AppError::InvalidStatusTransition(_) => StatusCode::CONFLICT,
            AppError::DockApiError(_) | AppError::StorageWriteFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Converte para a resposta HTTP localizada. Erros 5xx são logados aqui,
    // com a mensagem detalhada que o thiserror nos dá.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Erro interno do servidor: {self}");
        }

        // Validação retorna todos os detalhes campo a campo.
        let details = match self {
            AppError::ValidationError(errors) => {
                let mut map = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    map.insert(field.to_string(), messages);
                }
                serde_json::to_value(map).ok()
            }
            _ => None,
        };

        ApiError {
            status,
            message: store.translate(self.code(), &locale.0),
            details,
        }
    }
}

// O erro já "pronto para o cliente": status + mensagem no idioma do caller.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => Json(json!({ "error": self.message, "details": details })),
            None => Json(json!({ "error": self.message })),
        };
        (self.status, body).into_response()
    }
}
