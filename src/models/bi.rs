// src/models/bi.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::models::transaction::{DailyPoint, LabeledGroupedTotal};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveKpis {
    pub transaction_count: i64,
    #[schema(example = "1850000.00")]
    pub total_amount: Decimal,
    pub net_amount: Decimal,
    #[schema(example = "148.73")]
    pub average_ticket: Decimal,
    // Percentual de transações autorizadas/capturadas sobre o total
    #[schema(example = "93.40")]
    pub approval_rate: Decimal,
    pub active_merchants: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HourlyCell {
    #[schema(example = 14)]
    pub hour: i32,
    pub transaction_count: i64,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WeekdayShiftRow {
    pub weekday: i32,
    pub shift: String,
    pub transaction_count: i64,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayShiftCell {
    #[schema(example = 1)]
    pub weekday: i32,
    pub weekday_label: String,
    #[schema(example = "TARDE")]
    pub shift: String,
    pub shift_label: String,
    pub transaction_count: i64,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopMerchant {
    pub merchant_id: i64,
    pub merchant_name: String,
    pub transaction_count: i64,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettlementKpis {
    pub settlement_count: i64,
    pub total_commission: Decimal,
    pub paid_commission: Decimal,
    pub pending_commission: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MdrMarginRow {
    pub product_type: String,
    pub gross_amount: Decimal,
    pub mdr_total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MdrMargin {
    pub product_type: String,
    pub product_label: String,
    pub gross_amount: Decimal,
    pub mdr_total: Decimal,
    // MDR efetivo em pontos percentuais sobre o volume bruto
    #[schema(example = "2.31")]
    pub effective_rate: Decimal,
}

// O payload único que a tela de BI consome.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BiDashboardResponse {
    pub kpis: ExecutiveKpis,
    pub daily_series: Vec<DailyPoint>,
    pub brand_mix: Vec<LabeledGroupedTotal>,
    pub product_mix: Vec<LabeledGroupedTotal>,
    pub hourly_heatmap: Vec<HourlyCell>,
    pub weekday_shifts: Vec<WeekdayShiftCell>,
    pub status_funnel: Vec<LabeledGroupedTotal>,
    pub top_merchants: Vec<TopMerchant>,
    pub settlements: SettlementKpis,
    pub mdr_margins: Vec<MdrMargin>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BiQuery {
    #[param(value_type = Option<String>, example = "2024-03-01")]
    pub date_from: Option<NaiveDate>,
    #[param(value_type = Option<String>, example = "2024-03-31")]
    pub date_to: Option<NaiveDate>,
    pub customer_id: Option<i64>,
}

pub fn weekday_label(weekday: i32) -> &'static str {
    match weekday {
        0 => "Domingo",
        1 => "Segunda-feira",
        2 => "Terça-feira",
        3 => "Quarta-feira",
        4 => "Quinta-feira",
        5 => "Sexta-feira",
        6 => "Sábado",
        _ => "Desconhecido",
    }
}

pub fn shift_label(shift: &str) -> &'static str {
    match shift {
        "MADRUGADA" => "Madrugada (0h-5h)",
        "MANHA" => "Manhã (6h-11h)",
        "TARDE" => "Tarde (12h-17h)",
        "NOITE" => "Noite (18h-23h)",
        _ => "Desconhecido",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotulos_de_dia_e_turno() {
        assert_eq!(weekday_label(0), "Domingo");
        assert_eq!(weekday_label(6), "Sábado");
        assert_eq!(weekday_label(9), "Desconhecido");
        assert_eq!(shift_label("TARDE"), "Tarde (12h-17h)");
        assert_eq!(shift_label("XYZ"), "Desconhecido");
    }
}
