// src/models/settlement.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// Comissão mínima (R$ 100,00) para um fechamento entrar no fluxo de repasse.
// Abaixo disso o valor acumula para um período futuro.
pub const MIN_COMMISSION: Decimal = Decimal::ONE_HUNDRED;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "settlement_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    PendingInvoice, // Aguardando a nota fiscal do ISO
    Validating,     // Nota enviada, validação em andamento
    Eligible,       // Nota válida, apto a pagamento
    Paid,           // Terminal
    Accumulated,    // Abaixo do mínimo, rola para um período futuro
}

impl SettlementStatus {
    // Status inicial de um fechamento recém-consolidado.
    pub fn for_commission(commission: Decimal) -> Self {
        if commission >= MIN_COMMISSION {
            SettlementStatus::PendingInvoice
        } else {
            SettlementStatus::Accumulated
        }
    }

    // Destino do fechamento quando a validação da nota termina.
    pub fn after_validation(valid: bool) -> Self {
        if valid {
            SettlementStatus::Eligible
        } else {
            SettlementStatus::PendingInvoice
        }
    }

    pub fn label_pt(self) -> &'static str {
        match self {
            SettlementStatus::PendingInvoice => "Aguardando nota fiscal",
            SettlementStatus::Validating => "Validando nota fiscal",
            SettlementStatus::Eligible => "Apto a pagamento",
            SettlementStatus::Paid => "Pago",
            SettlementStatus::Accumulated => "Acumulado",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_validation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceValidationStatus {
    Pending,
    Valid,
    Invalid,
}

// Status exibido no extrato anual. Meses sem linha consolidada aparecem como
// pending_consolidation, que não existe no banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportedStatus {
    PendingConsolidation,
    PendingInvoice,
    Validating,
    Eligible,
    Paid,
    Accumulated,
}

impl From<SettlementStatus> for ReportedStatus {
    fn from(status: SettlementStatus) -> Self {
        match status {
            SettlementStatus::PendingInvoice => ReportedStatus::PendingInvoice,
            SettlementStatus::Validating => ReportedStatus::Validating,
            SettlementStatus::Eligible => ReportedStatus::Eligible,
            SettlementStatus::Paid => ReportedStatus::Paid,
            SettlementStatus::Accumulated => ReportedStatus::Accumulated,
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySettlement {
    pub id: Uuid,

    #[schema(example = 7)]
    pub customer_id: i64,

    #[schema(example = 3)]
    pub month: i32,
    #[schema(example = 2024)]
    pub year: i32,

    #[schema(example = 1250)]
    pub total_transactions: i64,
    #[schema(example = "185000.00")]
    pub total_amount: Decimal,
    #[schema(example = "1.20")]
    pub commission_percent: Decimal,
    #[schema(example = "2220.00")]
    pub commission_value: Decimal,

    pub status: SettlementStatus,

    #[schema(value_type = String, format = Date, example = "2024-04-10")]
    pub invoice_deadline: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2024-04-20")]
    pub payment_deadline: NaiveDate,

    pub paid_at: Option<DateTime<Utc>>,
    pub paid_by_user_id: Option<Uuid>,

    // Fechamento posterior que absorveu este saldo acumulado
    pub rolled_into: Option<Uuid>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MonthlySettlement {
    // Porta de entrada do upload de nota: só aguardando-nota/acumulado, e
    // nunca abaixo da comissão mínima.
    pub fn ensure_can_receive_invoice(&self) -> Result<(), AppError> {
        match self.status {
            SettlementStatus::PendingInvoice | SettlementStatus::Accumulated => {
                if self.commission_value >= MIN_COMMISSION {
                    Ok(())
                } else {
                    Err(AppError::CommissionBelowMinimum)
                }
            }
            other => Err(AppError::InvalidStatusTransition(format!(
                "upload de nota com status {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettlementInvoice {
    pub id: Uuid,
    pub settlement_id: Uuid,

    pub file_url: String,
    pub file_name: String,
    pub file_type: String,

    #[schema(example = "35240312345678000190550010000012341000012349")]
    pub access_key: Option<String>,
    pub invoice_number: Option<String>,
    #[schema(example = "2220.00")]
    pub invoice_value: Option<Decimal>,
    pub issuer_cnpj: Option<String>,
    pub issuer_name: Option<String>,

    pub validation_status: InvoiceValidationStatus,
    pub validated_at: Option<DateTime<Utc>>,
    pub validation_error: Option<String>,

    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

// --- Visão anual (derivada, nunca persistida) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub total_transactions: i64,
    pub total_amount: Decimal,
    pub total_commission: Decimal,
    pub eligible_amount: Decimal,
    pub paid_amount: Decimal,
    pub pending_amount: Decimal,
}

impl YearSummary {
    // Fold sobre as linhas do ano. Cada linha cai em no máximo um balde,
    // decidido pelo status corrente no momento da leitura. Linhas roladas
    // (saldo absorvido por fechamento posterior) não contam comissão: o
    // valor já vive na linha que as absorveu.
    pub fn from_rows(rows: &[MonthlySettlement]) -> Self {
        let mut summary = YearSummary {
            total_transactions: 0,
            total_amount: Decimal::ZERO,
            total_commission: Decimal::ZERO,
            eligible_amount: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
            pending_amount: Decimal::ZERO,
        };

        for row in rows {
            summary.total_transactions += row.total_transactions;
            summary.total_amount += row.total_amount;

            if row.rolled_into.is_some() {
                continue;
            }
            summary.total_commission += row.commission_value;

            match row.status {
                SettlementStatus::Eligible => summary.eligible_amount += row.commission_value,
                SettlementStatus::Paid => summary.paid_amount += row.commission_value,
                SettlementStatus::PendingInvoice
                | SettlementStatus::Validating
                | SettlementStatus::Accumulated => {
                    summary.pending_amount += row.commission_value
                }
            }
        }

        summary
    }
}

// Entrada do extrato anual: um item por mês, com ou sem linha consolidada.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepasseMonth {
    #[schema(example = 3)]
    pub month: i32,
    pub status: ReportedStatus,
    pub status_label: String,
    pub settlement: Option<MonthlySettlement>,
    pub invoice: Option<SettlementInvoice>,
    // Sinaliza para a UI que o valor acumulará em vez de oferecer upload
    pub will_accumulate: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepasseYearResponse {
    pub year: i32,
    pub customer_id: i64,
    pub settlements: Vec<RepasseMonth>,
    pub year_summary: YearSummary,
}

// Prazos do período: nota até o dia 10 e pagamento até o dia 20 do mês
// seguinte ao fechado.
pub fn period_deadlines(month: u32, year: i32) -> (NaiveDate, NaiveDate) {
    let (next_month, next_year) = if month == 12 { (1, year + 1) } else { (month + 1, year) };
    // Dias 10 e 20 existem em qualquer mês
    let invoice = NaiveDate::from_ymd_opt(next_year, next_month, 10).expect("data válida");
    let payment = NaiveDate::from_ymd_opt(next_year, next_month, 20).expect("data válida");
    (invoice, payment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settlement(commission: &str, status: SettlementStatus) -> MonthlySettlement {
        MonthlySettlement {
            id: Uuid::new_v4(),
            customer_id: 7,
            month: 3,
            year: 2024,
            total_transactions: 10,
            total_amount: Decimal::new(10_000, 2),
            commission_percent: Decimal::new(120, 2),
            commission_value: commission.parse().unwrap(),
            status,
            invoice_deadline: NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
            payment_deadline: NaiveDate::from_ymd_opt(2024, 4, 20).unwrap(),
            paid_at: None,
            paid_by_user_id: None,
            rolled_into: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn comissao_abaixo_do_minimo_acumula() {
        assert_eq!(
            SettlementStatus::for_commission("99.99".parse().unwrap()),
            SettlementStatus::Accumulated
        );
        assert_eq!(
            SettlementStatus::for_commission("100.00".parse().unwrap()),
            SettlementStatus::PendingInvoice
        );
    }

    #[test]
    fn upload_recusado_abaixo_do_minimo() {
        let row = settlement("50.00", SettlementStatus::Accumulated);
        assert!(matches!(
            row.ensure_can_receive_invoice(),
            Err(AppError::CommissionBelowMinimum)
        ));
    }

    #[test]
    fn upload_recusado_em_status_terminal_ou_em_validacao() {
        for status in [
            SettlementStatus::Validating,
            SettlementStatus::Eligible,
            SettlementStatus::Paid,
        ] {
            let row = settlement("250.00", status);
            assert!(matches!(
                row.ensure_can_receive_invoice(),
                Err(AppError::InvalidStatusTransition(_))
            ));
        }
    }

    #[test]
    fn upload_aceito_aguardando_nota_com_comissao_suficiente() {
        let row = settlement("250.00", SettlementStatus::PendingInvoice);
        assert!(row.ensure_can_receive_invoice().is_ok());

        // Acumulado que cruzou o mínimo também aceita
        let row = settlement("130.00", SettlementStatus::Accumulated);
        assert!(row.ensure_can_receive_invoice().is_ok());
    }

    #[test]
    fn validacao_invalida_volta_para_aguardando_nota() {
        assert_eq!(
            SettlementStatus::after_validation(false),
            SettlementStatus::PendingInvoice
        );
        assert_eq!(
            SettlementStatus::after_validation(true),
            SettlementStatus::Eligible
        );
    }

    #[test]
    fn baldes_do_ano_sao_particao_estrita() {
        let rows = vec![
            settlement("200.00", SettlementStatus::Paid),
            settlement("150.00", SettlementStatus::Eligible),
            settlement("120.00", SettlementStatus::PendingInvoice),
            settlement("110.00", SettlementStatus::Validating),
            settlement("60.00", SettlementStatus::Accumulated),
        ];
        let summary = YearSummary::from_rows(&rows);

        assert_eq!(summary.total_commission, "640.00".parse().unwrap());
        assert_eq!(summary.paid_amount, "200.00".parse().unwrap());
        assert_eq!(summary.eligible_amount, "150.00".parse().unwrap());
        // pending = aguardando + validando + acumulado
        assert_eq!(summary.pending_amount, "290.00".parse().unwrap());
        // Partição: os baldes somam exatamente o total
        assert_eq!(
            summary.eligible_amount + summary.paid_amount + summary.pending_amount,
            summary.total_commission
        );
    }

    #[test]
    fn linha_rolada_nao_conta_comissao_duas_vezes() {
        let mut rolled = settlement("60.00", SettlementStatus::Accumulated);
        rolled.rolled_into = Some(Uuid::new_v4());
        // O fechamento que absorveu os 60 já os carrega
        let absorber = settlement("180.00", SettlementStatus::PendingInvoice);

        let summary = YearSummary::from_rows(&[rolled, absorber]);
        assert_eq!(summary.total_commission, "180.00".parse().unwrap());
        assert_eq!(summary.pending_amount, "180.00".parse().unwrap());
        // Transações dos dois meses seguem contando
        assert_eq!(summary.total_transactions, 20);
    }

    #[test]
    fn prazos_do_periodo_caem_no_mes_seguinte() {
        let (invoice, payment) = period_deadlines(3, 2024);
        assert_eq!(invoice, NaiveDate::from_ymd_opt(2024, 4, 10).unwrap());
        assert_eq!(payment, NaiveDate::from_ymd_opt(2024, 4, 20).unwrap());

        // Dezembro vira janeiro do ano seguinte
        let (invoice, _) = period_deadlines(12, 2024);
        assert_eq!(invoice, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
    }
}
