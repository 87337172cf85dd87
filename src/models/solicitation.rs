// src/models/solicitation.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::file::StoredFile;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "solicitation_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolicitationStatus {
    SendDocuments, // Aguardando anexos obrigatórios
    Pending,       // Enviada, na fila do admin
    Reviewed,      // Admin registrou a contraproposta
    Approved,
    Declined,
    Completed,     // Taxas sincronizadas no processador
}

impl SolicitationStatus {
    pub fn label_pt(self) -> &'static str {
        match self {
            SolicitationStatus::SendDocuments => "Envio de documentos",
            SolicitationStatus::Pending => "Pendente",
            SolicitationStatus::Reviewed => "Analisada",
            SolicitationStatus::Approved => "Aprovada",
            SolicitationStatus::Declined => "Recusada",
            SolicitationStatus::Completed => "Concluída",
        }
    }
}

// Eventos do fluxo de pricing. A máquina é linear com a bifurcação
// aprova/recusa depois da análise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolicitationEvent {
    Submit,
    Review,
    Approve,
    Decline,
    Complete,
}

impl SolicitationEvent {
    pub fn target(self) -> SolicitationStatus {
        match self {
            SolicitationEvent::Submit => SolicitationStatus::Pending,
            SolicitationEvent::Review => SolicitationStatus::Reviewed,
            SolicitationEvent::Approve => SolicitationStatus::Approved,
            SolicitationEvent::Decline => SolicitationStatus::Declined,
            SolicitationEvent::Complete => SolicitationStatus::Completed,
        }
    }

    // Estado exigido para aplicar o evento. Reaplicar um evento cujo alvo já
    // é o status corrente é um no-op (idempotência sob retry).
    pub fn apply(self, current: SolicitationStatus) -> Result<SolicitationStatus, AppError> {
        let target = self.target();
        if current == target {
            return Ok(current);
        }

        let allowed_from = match self {
            SolicitationEvent::Submit => SolicitationStatus::SendDocuments,
            SolicitationEvent::Review => SolicitationStatus::Pending,
            SolicitationEvent::Approve | SolicitationEvent::Decline => SolicitationStatus::Reviewed,
            SolicitationEvent::Complete => SolicitationStatus::Approved,
        };

        if current == allowed_from {
            Ok(target)
        } else {
            Err(AppError::InvalidStatusTransition(format!(
                "{current:?} -> {target:?}"
            )))
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Solicitation {
    pub id: Uuid,
    pub customer_id: i64,
    pub merchant_id: Option<i64>,

    #[schema(example = "4712100")]
    pub cnae: String,
    #[schema(example = "5411")]
    pub mcc: String,

    pub status: SolicitationStatus,

    pub requested_by: Uuid,
    pub reviewed_by: Option<Uuid>,
    pub decline_reason: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Célula da grade: as três taxas em paralelo por (bandeira, produto).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolicitationFee {
    pub id: i64,
    pub solicitation_id: Uuid,
    #[schema(example = "VISA")]
    pub brand: String,
    #[schema(example = "CREDIT")]
    pub product_type: String,
    // O que o ISO pediu
    #[schema(example = "2.10")]
    pub requested_fee: Option<Decimal>,
    // O que o admin ofertou na análise
    #[schema(example = "2.25")]
    pub admin_fee: Option<Decimal>,
    // O que foi sincronizado do processador na conclusão
    #[schema(example = "2.25")]
    pub dock_fee: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolicitationDetail {
    pub solicitation: Solicitation,
    pub fees: Vec<SolicitationFee>,
    pub documents: Vec<StoredFile>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestedFeeCell {
    #[schema(example = "VISA")]
    pub brand: String,
    #[schema(example = "CREDIT")]
    pub product_type: String,
    #[schema(example = "2.10")]
    pub fee_percent: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSolicitationPayload {
    pub customer_id: i64,
    pub merchant_id: Option<i64>,

    #[validate(length(min = 7, max = 7, message = "CNAE deve ter 7 dígitos"))]
    pub cnae: String,

    #[validate(length(min = 4, max = 4, message = "MCC deve ter 4 dígitos"))]
    pub mcc: String,

    #[validate(length(min = 1, message = "Informe ao menos uma taxa"))]
    pub fees: Vec<RequestedFeeCell>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSolicitationPayload {
    #[validate(length(min = 1, message = "Informe ao menos uma taxa"))]
    pub admin_fees: Vec<RequestedFeeCell>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeclineSolicitationPayload {
    #[validate(length(min = 3, message = "Informe o motivo da recusa"))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteSolicitationPayload {
    #[validate(length(min = 1, message = "Informe ao menos uma taxa"))]
    pub dock_fees: Vec<RequestedFeeCell>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fluxo_feliz_ate_concluida() {
        let mut status = SolicitationStatus::SendDocuments;
        for event in [
            SolicitationEvent::Submit,
            SolicitationEvent::Review,
            SolicitationEvent::Approve,
            SolicitationEvent::Complete,
        ] {
            status = event.apply(status).unwrap();
        }
        assert_eq!(status, SolicitationStatus::Completed);
    }

    #[test]
    fn recusa_so_depois_da_analise() {
        assert!(SolicitationEvent::Decline.apply(SolicitationStatus::Pending).is_err());
        assert_eq!(
            SolicitationEvent::Decline.apply(SolicitationStatus::Reviewed).unwrap(),
            SolicitationStatus::Declined
        );
    }

    #[test]
    fn reaplicar_evento_e_noop() {
        // Retry do mesmo submit não explode nem regride
        assert_eq!(
            SolicitationEvent::Submit.apply(SolicitationStatus::Pending).unwrap(),
            SolicitationStatus::Pending
        );
    }

    #[test]
    fn pular_etapas_e_recusado() {
        assert!(SolicitationEvent::Complete.apply(SolicitationStatus::Pending).is_err());
        assert!(SolicitationEvent::Approve.apply(SolicitationStatus::SendDocuments).is_err());
        // Recusada é terminal: nada sai dela
        assert!(SolicitationEvent::Submit.apply(SolicitationStatus::Declined).is_err());
    }
}
