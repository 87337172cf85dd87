// src/services/settlement_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SettlementRepository,
    dock::fiscal::{FiscalApiClient, ValidationOutcome},
    models::{
        scope::AccessScope,
        settlement::{
            InvoiceValidationStatus, MIN_COMMISSION, MonthlySettlement, RepasseMonth,
            RepasseYearResponse, ReportedStatus, SettlementInvoice, SettlementStatus, YearSummary,
            period_deadlines,
        },
    },
    storage::{ObjectStorage, object_key, split_file_name},
};

// Limite de upload da nota fiscal.
pub const MAX_INVOICE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 2] = ["pdf", "xml"];
const ALLOWED_CONTENT_TYPES: [&str; 3] = ["application/pdf", "application/xml", "text/xml"];

// Checagem pura do arquivo da nota: extensão e MIME na lista, tamanho no
// teto. Devolve (nome sem extensão, extensão normalizada).
pub fn validate_invoice_file(
    file_name: &str,
    content_type: &str,
    size: usize,
) -> Result<(String, String), AppError> {
    let (stem, extension) = split_file_name(file_name);

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str())
        || !ALLOWED_CONTENT_TYPES.contains(&content_type)
    {
        return Err(AppError::UnsupportedFileType(format!(
            "{content_type} ({file_name})"
        )));
    }
    if size > MAX_INVOICE_BYTES {
        return Err(AppError::FileTooLarge(size));
    }

    Ok((stem, extension))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceUploadResponse {
    pub settlement: MonthlySettlement,
    pub invoice: SettlementInvoice,
}

#[derive(Clone)]
pub struct SettlementService {
    repo: SettlementRepository,
    storage: Arc<dyn ObjectStorage>,
    fiscal: Option<FiscalApiClient>,
}

impl SettlementService {
    pub fn new(
        repo: SettlementRepository,
        storage: Arc<dyn ObjectStorage>,
        fiscal: Option<FiscalApiClient>,
    ) -> Self {
        Self { repo, storage, fiscal }
    }

    // =========================================================================
    //  CONSOLIDAÇÃO MENSAL
    // =========================================================================

    // Consolida o período do cliente: soma as transações liquidadas, aplica
    // o percentual de comissão e incorpora saldos acumulados anteriores.
    // Re-rodar recalcula a mesma linha (upsert pela chave natural); períodos
    // que já avançaram no fluxo não são tocados.
    pub async fn consolidate_month(
        &self,
        pool: &PgPool,
        customer_id: i64,
        month: i32,
        year: i32,
    ) -> Result<MonthlySettlement, AppError> {
        if let Some(existing) = self.repo.find_period(pool, customer_id, month, year).await? {
            if !matches!(
                existing.status,
                SettlementStatus::PendingInvoice | SettlementStatus::Accumulated
            ) {
                tracing::info!(
                    "Consolidação {customer_id}/{month:02}-{year} ignorada: status {:?}",
                    existing.status
                );
                return Ok(existing);
            }
        }

        let percent = self
            .repo
            .customer_commission_percent(pool, customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        let mut tx = pool.begin().await?;

        let (count, amount) = self
            .repo
            .month_aggregate(&mut *tx, customer_id, month, year)
            .await?;
        let base_commission = (amount * percent / Decimal::ONE_HUNDRED).round_dp(2);

        let carried = self
            .repo
            .accumulated_before(&mut *tx, customer_id, month, year)
            .await?;
        let carried_total: Decimal = carried.iter().map(|s| s.commission_value).sum();

        let commission = base_commission + carried_total;
        let status = SettlementStatus::for_commission(commission);
        let (invoice_deadline, payment_deadline) = period_deadlines(month as u32, year);

        let settlement = self
            .repo
            .upsert_settlement(
                &mut *tx,
                customer_id,
                month,
                year,
                count,
                amount,
                percent,
                commission,
                status,
                invoice_deadline,
                payment_deadline,
            )
            .await?;

        // O saldo antigo passa a viver nesta linha.
        if !carried.is_empty() {
            let ids: Vec<Uuid> = carried.iter().map(|s| s.id).collect();
            self.repo.mark_rolled_into(&mut *tx, &ids, settlement.id).await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Fechamento {customer_id}/{month:02}-{year}: {} transações, comissão {} ({:?})",
            count,
            commission,
            settlement.status
        );
        Ok(settlement)
    }

    // =========================================================================
    //  UPLOAD E VALIDAÇÃO DA NOTA
    // =========================================================================

    pub async fn upload_invoice(
        &self,
        pool: &PgPool,
        scope: &AccessScope,
        settlement_id: Uuid,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<InvoiceUploadResponse, AppError> {
        let settlement = self
            .repo
            .find_by_id(pool, settlement_id)
            .await?
            .ok_or(AppError::SettlementNotFound)?;

        // Fora do escopo responde como inexistente.
        if let Some(allowed) = scope.as_filter() {
            if !allowed.contains(&settlement.customer_id) {
                return Err(AppError::SettlementNotFound);
            }
        }

        let (stem, extension) = validate_invoice_file(file_name, content_type, bytes.len())?;
        settlement.ensure_can_receive_invoice()?;

        // Storage primeiro: se a gravação falhar, nada mudou no banco.
        let key = object_key("settlements", &settlement.id.to_string(), &stem, &extension);
        let url = self.storage.put(&key, bytes, content_type).await?;

        // Nota nova + transição para validating em uma transação só: não
        // pode existir nota sem o status acompanhar.
        let mut tx = pool.begin().await?;
        self.repo.deactivate_live_invoice(&mut *tx, settlement.id).await?;
        let invoice = self
            .repo
            .insert_invoice(&mut *tx, settlement.id, &url, file_name, &extension)
            .await?;
        let settlement = self
            .repo
            .update_status(&mut *tx, settlement.id, SettlementStatus::Validating)
            .await?;
        tx.commit().await?;

        tracing::info!(
            "Nota {} recebida para o fechamento {} ({}/{})",
            invoice.id,
            settlement.id,
            settlement.month,
            settlement.year
        );

        // Validação inline, melhor esforço: se o serviço fiscal estiver
        // fora, a nota fica pendente e o revalidate resolve depois.
        if let Some(fiscal) = &self.fiscal {
            match fiscal.validate(&url).await {
                Ok(outcome) => return self.complete_validation(pool, invoice.id, outcome).await,
                Err(e) => {
                    tracing::warn!("Validação fiscal adiada para a nota {}: {e}", invoice.id);
                }
            }
        }

        Ok(InvoiceUploadResponse { settlement, invoice })
    }

    // Aplica o veredito da validação: nota válida promove o fechamento a
    // eligible; inválida devolve para pending_invoice guardando o motivo.
    // Reaplicar o mesmo veredito é um no-op.
    pub async fn complete_validation(
        &self,
        pool: &PgPool,
        invoice_id: Uuid,
        outcome: ValidationOutcome,
    ) -> Result<InvoiceUploadResponse, AppError> {
        let invoice = self
            .repo
            .find_invoice(pool, invoice_id)
            .await?
            .ok_or(AppError::InvoiceNotFound)?;
        if !invoice.active {
            return Err(AppError::InvoiceNotFound);
        }

        let settlement = self
            .repo
            .find_by_id(pool, invoice.settlement_id)
            .await?
            .ok_or(AppError::SettlementNotFound)?;

        let target_status = if outcome.valid {
            InvoiceValidationStatus::Valid
        } else {
            InvoiceValidationStatus::Invalid
        };

        if invoice.validation_status == target_status {
            return Ok(InvoiceUploadResponse { settlement, invoice });
        }

        let mut tx = pool.begin().await?;

        let invoice = self
            .repo
            .apply_validation(
                &mut *tx,
                invoice.id,
                target_status,
                outcome.access_key.as_deref(),
                outcome.invoice_number.as_deref(),
                outcome.invoice_value,
                outcome.issuer_cnpj.as_deref(),
                outcome.issuer_name.as_deref(),
                outcome.error.as_deref(),
            )
            .await?;

        let settlement = if settlement.status == SettlementStatus::Validating {
            self.repo
                .update_status(
                    &mut *tx,
                    settlement.id,
                    SettlementStatus::after_validation(outcome.valid),
                )
                .await?
        } else {
            settlement
        };

        tx.commit().await?;

        if outcome.valid {
            tracing::info!("Nota {} validada; fechamento apto a pagamento", invoice.id);
        } else {
            tracing::warn!(
                "Nota {} recusada: {}",
                invoice.id,
                invoice.validation_error.as_deref().unwrap_or("sem detalhe")
            );
        }

        Ok(InvoiceUploadResponse { settlement, invoice })
    }

    // Reprocessa uma nota presa em pending (serviço fiscal indisponível no
    // upload).
    pub async fn revalidate_invoice(
        &self,
        pool: &PgPool,
        invoice_id: Uuid,
    ) -> Result<InvoiceUploadResponse, AppError> {
        let invoice = self
            .repo
            .find_invoice(pool, invoice_id)
            .await?
            .ok_or(AppError::InvoiceNotFound)?;
        if !invoice.active || invoice.validation_status != InvoiceValidationStatus::Pending {
            return Err(AppError::InvalidStatusTransition(format!(
                "revalidação com status {:?}",
                invoice.validation_status
            )));
        }

        let fiscal = self.fiscal.as_ref().ok_or_else(|| {
            AppError::InternalServerError(anyhow::anyhow!(
                "serviço de validação fiscal não configurado"
            ))
        })?;

        let outcome = fiscal.validate(&invoice.file_url).await?;
        self.complete_validation(pool, invoice.id, outcome).await
    }

    // =========================================================================
    //  PAGAMENTO E EXTRATO ANUAL
    // =========================================================================

    // Ação manual do admin. Pagar de novo devolve a linha como está; nada
    // sai de paid.
    pub async fn mark_paid(
        &self,
        pool: &PgPool,
        settlement_id: Uuid,
        paid_by: Uuid,
    ) -> Result<MonthlySettlement, AppError> {
        let settlement = self
            .repo
            .find_by_id(pool, settlement_id)
            .await?
            .ok_or(AppError::SettlementNotFound)?;

        match settlement.status {
            SettlementStatus::Paid => Ok(settlement),
            SettlementStatus::Eligible => {
                let paid = self.repo.mark_paid(pool, settlement_id, paid_by).await?;
                tracing::info!(
                    "Repasse {} pago ({}/{}, R$ {})",
                    paid.id,
                    paid.month,
                    paid.year,
                    paid.commission_value
                );
                Ok(paid)
            }
            other => Err(AppError::InvalidStatusTransition(format!(
                "pagamento com status {other:?}"
            ))),
        }
    }

    pub async fn year_view(
        &self,
        pool: &PgPool,
        customer_id: i64,
        year: i32,
    ) -> Result<RepasseYearResponse, AppError> {
        let rows = self.repo.list_year(pool, customer_id, year).await?;
        let invoices = self.repo.live_invoices_for_year(pool, customer_id, year).await?;
        let year_summary = YearSummary::from_rows(&rows);

        let settlements = (1..=12)
            .map(|month| {
                let row = rows.iter().find(|s| s.month == month).cloned();
                match row {
                    Some(settlement) => {
                        let invoice = invoices
                            .iter()
                            .find(|i| i.settlement_id == settlement.id)
                            .cloned();
                        let will_accumulate = settlement.status == SettlementStatus::Accumulated
                            && settlement.commission_value < MIN_COMMISSION;
                        RepasseMonth {
                            month,
                            status: ReportedStatus::from(settlement.status),
                            status_label: settlement.status.label_pt().to_string(),
                            settlement: Some(settlement),
                            invoice,
                            will_accumulate,
                        }
                    }
                    None => RepasseMonth {
                        month,
                        status: ReportedStatus::PendingConsolidation,
                        status_label: "Aguardando consolidação".to_string(),
                        settlement: None,
                        invoice: None,
                        will_accumulate: false,
                    },
                }
            })
            .collect();

        Ok(RepasseYearResponse { year, customer_id, settlements, year_summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nota_aceita_somente_pdf_e_xml() {
        assert!(validate_invoice_file("nota.pdf", "application/pdf", 1024).is_ok());
        assert!(validate_invoice_file("nota.xml", "text/xml", 1024).is_ok());

        assert!(matches!(
            validate_invoice_file("nota.docx", "application/msword", 1024),
            Err(AppError::UnsupportedFileType(_))
        ));
        // Extensão certa com MIME errado também cai fora
        assert!(matches!(
            validate_invoice_file("nota.pdf", "image/png", 1024),
            Err(AppError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn nota_acima_de_5mb_e_recusada() {
        assert!(matches!(
            validate_invoice_file("nota.pdf", "application/pdf", MAX_INVOICE_BYTES + 1),
            Err(AppError::FileTooLarge(_))
        ));
        // No limite exato passa
        assert!(validate_invoice_file("nota.pdf", "application/pdf", MAX_INVOICE_BYTES).is_ok());
    }

    #[test]
    fn extensao_normalizada_em_minusculas() {
        let (stem, ext) = validate_invoice_file("NF Março.PDF", "application/pdf", 10).unwrap();
        assert_eq!(stem, "NF Março");
        assert_eq!(ext, "pdf");
    }
}
