// src/models/category.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantCategory {
    pub id: i64,
    pub slug: String,

    #[schema(example = "4712100")]
    pub cnae: String,
    #[schema(example = "5411")]
    pub mcc: String,
    #[schema(example = "Comércio varejista de mercadorias em geral")]
    pub description: String,

    #[schema(example = "1.50")]
    pub risk_factor: Decimal,

    // Carências (em dias) por produto
    pub credit_waiting_days: i32,
    pub installment_waiting_days: i32,
    pub anticipation_waiting_days: i32,

    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFee {
    pub id: i64,
    pub category_id: i64,
    #[schema(example = "VISA")]
    pub brand: String,
    #[schema(example = "CREDIT")]
    pub product_type: String,
    #[schema(example = "2.39")]
    pub fee_percent: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithFees {
    pub category: MerchantCategory,
    pub fees: Vec<CategoryFee>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryPayload {
    #[validate(length(min = 2, message = "O slug deve ter no mínimo 2 caracteres"))]
    #[schema(example = "varejo-alimentar")]
    pub slug: String,

    #[validate(length(min = 7, max = 7, message = "CNAE deve ter 7 dígitos"))]
    #[schema(example = "4712100")]
    pub cnae: String,

    #[validate(length(min = 4, max = 4, message = "MCC deve ter 4 dígitos"))]
    #[schema(example = "5411")]
    pub mcc: String,

    #[validate(length(min = 3, message = "required"))]
    pub description: String,

    #[schema(example = "1.50")]
    pub risk_factor: Decimal,

    #[serde(default = "default_credit_days")]
    pub credit_waiting_days: i32,
    #[serde(default = "default_installment_days")]
    pub installment_waiting_days: i32,
    #[serde(default = "default_credit_days")]
    pub anticipation_waiting_days: i32,
}

fn default_credit_days() -> i32 {
    1
}

fn default_installment_days() -> i32 {
    30
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryPayload {
    #[validate(length(min = 3, message = "required"))]
    pub description: String,
    pub risk_factor: Decimal,
    pub credit_waiting_days: i32,
    pub installment_waiting_days: i32,
    pub anticipation_waiting_days: i32,
    pub active: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeCellPayload {
    #[schema(example = "CREDIT")]
    pub product_type: String,
    #[schema(example = "2.39")]
    pub fee_percent: Decimal,
}

// Substitui atomicamente a grade de uma (categoria, bandeira).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertFeeSchedulePayload {
    #[validate(length(min = 2, message = "required"))]
    #[schema(example = "VISA")]
    pub brand: String,

    pub fees: Vec<FeeCellPayload>,
}
