// src/db/transaction_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::transaction::{DailyPoint, FechamentoSummary, GroupBy, GroupedTotal, TransactionRow},
};

// Filtros comuns das consultas de transação. O filtro de clientes já chega
// conjugado com o escopo do caller (None = irrestrito).
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub customer_ids: Option<Vec<i64>>,
    pub merchant_id: Option<i64>,
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

// Cláusula WHERE compartilhada; os binds $1..$5 seguem a ordem dos campos.
const FILTER_CLAUSE: &str = r#"
      ($1::bigint[] IS NULL OR t.customer_id = ANY($1))
      AND ($2::bigint IS NULL OR t.merchant_id = $2)
      AND ($3::text IS NULL OR t.status = $3)
      AND ($4::date IS NULL OR t.captured_at::date >= $4)
      AND ($5::date IS NULL OR t.captured_at::date <= $5)
"#;

#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn page<'e, E>(
        &self,
        executor: E,
        filter: &TransactionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TransactionRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT
                t.id, t.external_id, t.customer_id, t.merchant_id,
                m.name AS merchant_name,
                t.nsu, t.authorization_code,
                t.amount, t.net_amount, t.mdr_fee,
                t.status, t.product_type, t.brand, t.capture_channel,
                t.installments, t.captured_at
            FROM transactions t
            JOIN merchants m ON m.id = t.merchant_id
            WHERE {FILTER_CLAUSE}
            ORDER BY t.captured_at DESC
            LIMIT $6 OFFSET $7
            "#
        );

        let rows = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(&filter.customer_ids)
            .bind(filter.merchant_id)
            .bind(&filter.status)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    pub async fn count<'e, E>(
        &self,
        executor: E,
        filter: &TransactionFilter,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT COUNT(*) FROM transactions t WHERE {FILTER_CLAUSE}");

        let (total,): (i64,) = sqlx::query_as(&sql)
            .bind(&filter.customer_ids)
            .bind(filter.merchant_id)
            .bind(&filter.status)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .fetch_one(executor)
            .await?;

        Ok(total)
    }

    pub async fn summary<'e, E>(
        &self,
        executor: E,
        filter: &TransactionFilter,
    ) -> Result<FechamentoSummary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT
                COUNT(*) AS transaction_count,
                COALESCE(SUM(t.amount), 0) AS gross_amount,
                COALESCE(SUM(t.net_amount), 0) AS net_amount,
                COALESCE(SUM(t.mdr_fee), 0) AS mdr_total,
                0::numeric AS commission_value
            FROM transactions t
            WHERE {FILTER_CLAUSE}
            "#
        );

        let summary = sqlx::query_as::<_, FechamentoSummary>(&sql)
            .bind(&filter.customer_ids)
            .bind(filter.merchant_id)
            .bind(&filter.status)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .fetch_one(executor)
            .await?;

        Ok(summary)
    }

    pub async fn daily_series<'e, E>(
        &self,
        executor: E,
        filter: &TransactionFilter,
    ) -> Result<Vec<DailyPoint>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT
                t.captured_at::date AS day,
                COUNT(*) AS transaction_count,
                COALESCE(SUM(t.amount), 0) AS total_amount
            FROM transactions t
            WHERE {FILTER_CLAUSE}
            GROUP BY 1
            ORDER BY 1 ASC
            "#
        );

        let rows = sqlx::query_as::<_, DailyPoint>(&sql)
            .bind(&filter.customer_ids)
            .bind(filter.merchant_id)
            .bind(&filter.status)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    pub async fn grouped<'e, E>(
        &self,
        executor: E,
        filter: &TransactionFilter,
        by: GroupBy,
    ) -> Result<Vec<GroupedTotal>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // A expressão da chave é fixa por variante; nada vindo do usuário.
        let key_expr = match by {
            GroupBy::Day => "to_char(t.captured_at, 'YYYY-MM-DD')",
            GroupBy::Brand => "t.brand",
            GroupBy::Status => "t.status",
            GroupBy::Product => "t.product_type",
        };

        let sql = format!(
            r#"
            SELECT
                {key_expr} AS key,
                COUNT(*) AS transaction_count,
                COALESCE(SUM(t.amount), 0) AS total_amount,
                COALESCE(SUM(t.net_amount), 0) AS net_amount
            FROM transactions t
            WHERE {FILTER_CLAUSE}
            GROUP BY 1
            ORDER BY total_amount DESC
            "#
        );

        let rows = sqlx::query_as::<_, GroupedTotal>(&sql)
            .bind(&filter.customer_ids)
            .bind(filter.merchant_id)
            .bind(&filter.status)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }
}
