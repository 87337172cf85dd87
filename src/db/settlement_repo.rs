// src/db/settlement_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::settlement::{
        InvoiceValidationStatus, MonthlySettlement, SettlementInvoice, SettlementStatus,
    },
};

#[derive(Clone)]
pub struct SettlementRepository {
    pool: PgPool,
}

impl SettlementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  FECHAMENTOS MENSAIS
    // =========================================================================

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<MonthlySettlement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, MonthlySettlement>(
            "SELECT * FROM monthly_settlements WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(row)
    }

    pub async fn find_period<'e, E>(
        &self,
        executor: E,
        customer_id: i64,
        month: i32,
        year: i32,
    ) -> Result<Option<MonthlySettlement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, MonthlySettlement>(
            "SELECT * FROM monthly_settlements WHERE customer_id = $1 AND month = $2 AND year = $3",
        )
        .bind(customer_id)
        .bind(month)
        .bind(year)
        .fetch_optional(executor)
        .await?;

        Ok(row)
    }

    pub async fn list_year<'e, E>(
        &self,
        executor: E,
        customer_id: i64,
        year: i32,
    ) -> Result<Vec<MonthlySettlement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, MonthlySettlement>(
            r#"
            SELECT * FROM monthly_settlements
            WHERE customer_id = $1 AND year = $2
            ORDER BY month ASC
            "#,
        )
        .bind(customer_id)
        .bind(year)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    // Totais do período direto das transações liquidadas do cliente.
    pub async fn month_aggregate<'e, E>(
        &self,
        executor: E,
        customer_id: i64,
        month: i32,
        year: i32,
    ) -> Result<(i64, Decimal), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row: (i64, Decimal) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE customer_id = $1
              AND status IN ('AUTHORIZED', 'CAPTURED')
              AND EXTRACT(MONTH FROM captured_at)::int = $2
              AND EXTRACT(YEAR FROM captured_at)::int = $3
            "#,
        )
        .bind(customer_id)
        .bind(month)
        .bind(year)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    pub async fn customer_commission_percent<'e, E>(
        &self,
        executor: E,
        customer_id: i64,
    ) -> Result<Option<Decimal>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row: Option<(Decimal,)> =
            sqlx::query_as("SELECT commission_percent FROM customers WHERE id = $1")
                .bind(customer_id)
                .fetch_optional(executor)
                .await?;

        Ok(row.map(|(p,)| p))
    }

    // Acumulados ainda não absorvidos, anteriores ao período informado.
    pub async fn accumulated_before<'e, E>(
        &self,
        executor: E,
        customer_id: i64,
        month: i32,
        year: i32,
    ) -> Result<Vec<MonthlySettlement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, MonthlySettlement>(
            r#"
            SELECT * FROM monthly_settlements
            WHERE customer_id = $1
              AND status = 'accumulated'
              AND rolled_into IS NULL
              AND (year < $3 OR (year = $3 AND month < $2))
            ORDER BY year, month
            "#,
        )
        .bind(customer_id)
        .bind(month)
        .bind(year)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn upsert_settlement<'e, E>(
        &self,
        executor: E,
        customer_id: i64,
        month: i32,
        year: i32,
        total_transactions: i64,
        total_amount: Decimal,
        commission_percent: Decimal,
        commission_value: Decimal,
        status: SettlementStatus,
        invoice_deadline: NaiveDate,
        payment_deadline: NaiveDate,
    ) -> Result<MonthlySettlement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, MonthlySettlement>(
            r#"
            INSERT INTO monthly_settlements (
                customer_id, month, year,
                total_transactions, total_amount,
                commission_percent, commission_value,
                status, invoice_deadline, payment_deadline
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (customer_id, month, year) DO UPDATE SET
                total_transactions = EXCLUDED.total_transactions,
                total_amount = EXCLUDED.total_amount,
                commission_percent = EXCLUDED.commission_percent,
                commission_value = EXCLUDED.commission_value,
                status = EXCLUDED.status,
                invoice_deadline = EXCLUDED.invoice_deadline,
                payment_deadline = EXCLUDED.payment_deadline,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(month)
        .bind(year)
        .bind(total_transactions)
        .bind(total_amount)
        .bind(commission_percent)
        .bind(commission_value)
        .bind(status)
        .bind(invoice_deadline)
        .bind(payment_deadline)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    // Marca saldos acumulados como absorvidos pelo fechamento alvo.
    pub async fn mark_rolled_into<'e, E>(
        &self,
        executor: E,
        ids: &[Uuid],
        target: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE monthly_settlements SET rolled_into = $2, updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(target)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: SettlementStatus,
    ) -> Result<MonthlySettlement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, MonthlySettlement>(
            r#"
            UPDATE monthly_settlements
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    pub async fn mark_paid<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        paid_by: Uuid,
    ) -> Result<MonthlySettlement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, MonthlySettlement>(
            r#"
            UPDATE monthly_settlements
            SET status = 'paid', paid_at = NOW(), paid_by_user_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(paid_by)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    // =========================================================================
    //  NOTAS FISCAIS
    // =========================================================================

    pub async fn find_invoice<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<SettlementInvoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, SettlementInvoice>(
            "SELECT * FROM settlement_invoices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(row)
    }

    pub async fn live_invoice<'e, E>(
        &self,
        executor: E,
        settlement_id: Uuid,
    ) -> Result<Option<SettlementInvoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, SettlementInvoice>(
            "SELECT * FROM settlement_invoices WHERE settlement_id = $1 AND active = TRUE",
        )
        .bind(settlement_id)
        .fetch_optional(executor)
        .await?;

        Ok(row)
    }

    pub async fn live_invoices_for_year<'e, E>(
        &self,
        executor: E,
        customer_id: i64,
        year: i32,
    ) -> Result<Vec<SettlementInvoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, SettlementInvoice>(
            r#"
            SELECT i.* FROM settlement_invoices i
            JOIN monthly_settlements s ON s.id = i.settlement_id
            WHERE s.customer_id = $1 AND s.year = $2 AND i.active = TRUE
            "#,
        )
        .bind(customer_id)
        .bind(year)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    // Re-upload desativa a nota anterior em vez de duplicar.
    pub async fn deactivate_live_invoice<'e, E>(
        &self,
        executor: E,
        settlement_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE settlement_invoices SET active = FALSE WHERE settlement_id = $1 AND active = TRUE",
        )
        .bind(settlement_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn insert_invoice<'e, E>(
        &self,
        executor: E,
        settlement_id: Uuid,
        file_url: &str,
        file_name: &str,
        file_type: &str,
    ) -> Result<SettlementInvoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, SettlementInvoice>(
            r#"
            INSERT INTO settlement_invoices (settlement_id, file_url, file_name, file_type)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(settlement_id)
        .bind(file_url)
        .bind(file_name)
        .bind(file_type)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn apply_validation<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        status: InvoiceValidationStatus,
        access_key: Option<&str>,
        invoice_number: Option<&str>,
        invoice_value: Option<Decimal>,
        issuer_cnpj: Option<&str>,
        issuer_name: Option<&str>,
        validation_error: Option<&str>,
    ) -> Result<SettlementInvoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, SettlementInvoice>(
            r#"
            UPDATE settlement_invoices SET
                validation_status = $2,
                access_key = $3,
                invoice_number = $4,
                invoice_value = $5,
                issuer_cnpj = $6,
                issuer_name = $7,
                validation_error = $8,
                validated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(invoice_id)
        .bind(status)
        .bind(access_key)
        .bind(invoice_number)
        .bind(invoice_value)
        .bind(issuer_cnpj)
        .bind(issuer_name)
        .bind(validation_error)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }
}
