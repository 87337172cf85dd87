// src/models/merchant.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::common::mask;
use crate::models::transaction::Pagination;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "kyc_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycStatus {
    Approved,
    Pending,
    InAnalysis,
    Rejected,
}

impl KycStatus {
    pub fn label_pt(self) -> &'static str {
        match self {
            KycStatus::Approved => "Aprovado",
            KycStatus::Pending => "Pendente",
            KycStatus::InAnalysis => "Em análise",
            KycStatus::Rejected => "Reprovado",
        }
    }
}

// --- Structs ---

// Linha da listagem do diretório (join com categoria, endereço, agente e ISO).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantListRow {
    pub id: i64,

    #[schema(example = "Padaria do Bairro LTDA")]
    pub name: String,
    pub trade_name: Option<String>,

    #[schema(example = "12345678000190")]
    pub document: Option<String>,

    #[schema(example = 7)]
    pub customer_id: i64,
    pub customer_name: String,

    pub category_description: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub sales_agent_name: Option<String>,

    pub kyc_status: KycStatus,
    pub anticipation_locked: bool,
    pub active: bool,

    pub created_at: Option<DateTime<Utc>>,
}

impl MerchantListRow {
    // Redação para quem não tem a permissão de dados sensíveis.
    pub fn masked(mut self) -> Self {
        self.name = mask::mask_establishment(Some(&self.name));
        self.trade_name = Some(mask::mask_establishment(self.trade_name.as_deref()));
        self.document = Some(mask::mask_cnpj(self.document.as_deref()));
        self
    }
}

// Detalhe do EC com os cadastros satélites.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantDetail {
    pub id: i64,
    pub slug: String,
    pub customer_id: i64,
    pub customer_name: String,

    pub name: String,
    pub trade_name: Option<String>,
    pub document: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,

    pub cnae: Option<String>,
    pub mcc: Option<String>,
    pub category_description: Option<String>,

    pub street: Option<String>,
    pub number: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,

    pub anticipation_enabled: Option<bool>,
    pub anticipation_fee: Option<Decimal>,
    pub settlement_days: Option<i32>,
    pub pix_enabled: Option<bool>,

    pub sales_agent_name: Option<String>,
    pub legal_nature: Option<String>,

    pub kyc_status: KycStatus,
    pub anticipation_locked: bool,
    pub active: bool,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MerchantDetail {
    pub fn masked(mut self) -> Self {
        self.name = mask::mask_establishment(Some(&self.name));
        self.trade_name = Some(mask::mask_establishment(self.trade_name.as_deref()));
        self.document = Some(mask::mask_cnpj(self.document.as_deref()));
        self.email = Some(mask::mask_email(self.email.as_deref()));
        self.phone = Some(mask::mask_phone(self.phone.as_deref()));
        self.street = Some(mask::mask_address(self.street.as_deref()));
        self.number = Some("****".to_string());
        self.zip_code = Some("****".to_string());
        self
    }
}

// Contagens derivadas exibidas ao lado da listagem.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSummary {
    pub total: i64,
    pub active_count: i64,
    pub inactive_count: i64,
    pub kyc_approved: i64,
    pub kyc_pending: i64,
    pub kyc_in_analysis: i64,
    pub kyc_rejected: i64,
    pub anticipation_locked_count: i64,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantFilters {
    // Busca textual por razão social / nome fantasia / CNPJ
    pub search: Option<String>,
    pub customer_id: Option<i64>,
    pub kyc_status: Option<KycStatus>,
    pub active: Option<bool>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantListResponse {
    pub merchants: Vec<MerchantListRow>,
    pub summary: MerchantSummary,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mascara_do_detalhe_cobre_todos_os_campos_sensiveis() {
        let detail = MerchantDetail {
            id: 1,
            slug: "ec-1".into(),
            customer_id: 7,
            customer_name: "ISO Sul".into(),
            name: "ACME CORP".into(),
            trade_name: Some("ACME".into()),
            document: Some("12345678000190".into()),
            email: Some("contato@acme.com.br".into()),
            phone: Some("11987654321".into()),
            cnae: Some("4712100".into()),
            mcc: Some("5411".into()),
            category_description: None,
            street: Some("Rua das Flores".into()),
            number: Some("100".into()),
            district: None,
            city: Some("São Paulo".into()),
            state: Some("SP".into()),
            zip_code: Some("01000-000".into()),
            anticipation_enabled: None,
            anticipation_fee: None,
            settlement_days: None,
            pix_enabled: None,
            sales_agent_name: None,
            legal_nature: None,
            kyc_status: KycStatus::Approved,
            anticipation_locked: false,
            active: true,
            created_at: None,
            updated_at: None,
        };

        let masked = detail.masked();
        assert_eq!(masked.name, "AC*****RP");
        assert_eq!(masked.document.as_deref(), Some("12****90"));
        assert_eq!(masked.email.as_deref(), Some("c****@acme.com.br"));
        assert_eq!(masked.phone.as_deref(), Some("****4321"));
        assert_eq!(masked.street.as_deref(), Some("Rua ****"));
        // Cidade/UF seguem visíveis: são usadas nos filtros da listagem
        assert_eq!(masked.city.as_deref(), Some("São Paulo"));
    }
}
