// src/models/transaction.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::labels::{CaptureChannel, CardBrand, ProductType, TransactionStatus};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[schema(example = 1)]
    pub page: i64,
    #[schema(example = 25)]
    pub page_size: i64,
    #[schema(example = 1342)]
    pub total: i64,
    #[schema(example = 54)]
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, page_size: i64, total: i64) -> Self {
        let total_pages = if total == 0 { 0 } else { (total + page_size - 1) / page_size };
        Self { page, page_size, total, total_pages }
    }
}

// Linha crua replicada do processador; status/bandeira/produto são texto
// livre do vocabulário dele.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionRow {
    pub id: i64,
    pub external_id: String,
    pub customer_id: i64,
    pub merchant_id: i64,
    pub merchant_name: String,
    pub nsu: Option<String>,
    pub authorization_code: Option<String>,
    pub amount: Decimal,
    pub net_amount: Decimal,
    pub mdr_fee: Decimal,
    pub status: String,
    pub product_type: String,
    pub brand: String,
    pub capture_channel: String,
    pub installments: i32,
    pub captured_at: DateTime<Utc>,
}

// Item que a UI consome, com os rótulos já resolvidos.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    pub id: i64,
    pub external_id: String,
    pub customer_id: i64,
    pub merchant_id: i64,
    pub merchant_name: String,
    pub nsu: Option<String>,
    pub authorization_code: Option<String>,
    #[schema(example = "150.00")]
    pub amount: Decimal,
    pub net_amount: Decimal,
    pub mdr_fee: Decimal,
    pub status: TransactionStatus,
    pub status_label: String,
    pub product_type: ProductType,
    pub product_label: String,
    pub brand: CardBrand,
    pub brand_label: String,
    pub capture_channel: CaptureChannel,
    pub channel_label: String,
    pub installments: i32,
    pub captured_at: DateTime<Utc>,
}

impl From<TransactionRow> for TransactionItem {
    fn from(row: TransactionRow) -> Self {
        let status = TransactionStatus::parse(&row.status);
        let product = ProductType::parse(&row.product_type);
        let brand = CardBrand::parse(&row.brand);
        let channel = CaptureChannel::parse(&row.capture_channel);
        TransactionItem {
            id: row.id,
            external_id: row.external_id,
            customer_id: row.customer_id,
            merchant_id: row.merchant_id,
            merchant_name: row.merchant_name,
            nsu: row.nsu,
            authorization_code: row.authorization_code,
            amount: row.amount,
            net_amount: row.net_amount,
            mdr_fee: row.mdr_fee,
            status,
            status_label: status.label_pt().to_string(),
            product_type: product,
            product_label: product.label_pt().to_string(),
            brand,
            brand_label: brand.label_pt().to_string(),
            capture_channel: channel,
            channel_label: channel.label_pt().to_string(),
            installments: row.installments,
            captured_at: row.captured_at,
        }
    }
}

// --- Agrupamentos pré-agregados ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupedTotal {
    // A chave crua do agrupamento (dia ISO, código da bandeira/status/produto)
    pub key: String,
    pub transaction_count: i64,
    pub total_amount: Decimal,
    pub net_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LabeledGroupedTotal {
    pub key: String,
    pub label: String,
    pub transaction_count: i64,
    pub total_amount: Decimal,
    pub net_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Day,
    Brand,
    Status,
    Product,
}

// --- Fechamento (relatório de período) ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FechamentoSummary {
    pub transaction_count: i64,
    #[schema(example = "185000.00")]
    pub gross_amount: Decimal,
    pub net_amount: Decimal,
    pub mdr_total: Decimal,
    #[schema(example = "2220.00")]
    pub commission_value: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub day: NaiveDate,
    pub transaction_count: i64,
    pub total_amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FechamentoResponse {
    pub summary: FechamentoSummary,
    pub transactions: Vec<TransactionItem>,
    pub pagination: Pagination,
    pub chart_data: Vec<DailyPoint>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FechamentoQuery {
    #[param(value_type = Option<String>, example = "2024-03-01")]
    pub date_from: Option<NaiveDate>,
    #[param(value_type = Option<String>, example = "2024-03-31")]
    pub date_to: Option<NaiveDate>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub customer_id: Option<i64>,
    // Visualizar como outro usuário; honrado apenas para SUPER_ADMIN
    pub simulated_user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    #[param(value_type = Option<String>)]
    pub date_from: Option<NaiveDate>,
    #[param(value_type = Option<String>)]
    pub date_to: Option<NaiveDate>,
    pub customer_id: Option<i64>,
    pub merchant_id: Option<i64>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupedQuery {
    pub by: GroupBy,
    #[param(value_type = Option<String>)]
    pub date_from: Option<NaiveDate>,
    #[param(value_type = Option<String>)]
    pub date_to: Option<NaiveDate>,
    pub customer_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginacao_arredonda_para_cima() {
        let p = Pagination::new(1, 25, 51);
        assert_eq!(p.total_pages, 3);
        let vazio = Pagination::new(1, 25, 0);
        assert_eq!(vazio.total_pages, 0);
    }

    #[test]
    fn item_resolve_rotulos_do_vocabulario() {
        let row = TransactionRow {
            id: 1,
            external_id: "tx-1".into(),
            customer_id: 7,
            merchant_id: 10,
            merchant_name: "ACME".into(),
            nsu: None,
            authorization_code: None,
            amount: "150.00".parse().unwrap(),
            net_amount: "147.00".parse().unwrap(),
            mdr_fee: "3.00".parse().unwrap(),
            status: "PRE_AUTHORIZED".into(),
            product_type: "CREDIT_INSTALLMENTS".into(),
            brand: "ELO".into(),
            capture_channel: "POS".into(),
            installments: 3,
            captured_at: Utc::now(),
        };

        let item = TransactionItem::from(row);
        assert_eq!(item.status, TransactionStatus::PreAuthorized);
        assert_eq!(item.status_label, "Pré-autorizada");
        assert_eq!(item.product_label, "Crédito parcelado");
        assert_eq!(item.brand_label, "Elo");
    }
}
