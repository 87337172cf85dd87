// src/db/bi_repo.rs

use chrono::NaiveDate;
use sqlx::{Acquire, Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::{
        bi::{ExecutiveKpis, HourlyCell, MdrMarginRow, SettlementKpis, TopMerchant, WeekdayShiftRow},
        transaction::{DailyPoint, GroupedTotal},
    },
};

// Binds $1..$3 compartilhados por todas as agregações de transação.
const FILTER_CLAUSE: &str = r#"
      ($1::bigint[] IS NULL OR t.customer_id = ANY($1))
      AND ($2::date IS NULL OR t.captured_at::date >= $2)
      AND ($3::date IS NULL OR t.captured_at::date <= $3)
"#;

#[derive(Debug, Clone, Default)]
pub struct BiFilter {
    pub customer_ids: Option<Vec<i64>>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

pub struct BiAggregates {
    pub kpis: ExecutiveKpis,
    pub daily_series: Vec<DailyPoint>,
    pub brand_mix: Vec<GroupedTotal>,
    pub product_mix: Vec<GroupedTotal>,
    pub hourly_heatmap: Vec<HourlyCell>,
    pub weekday_shifts: Vec<WeekdayShiftRow>,
    pub status_funnel: Vec<GroupedTotal>,
    pub top_merchants: Vec<TopMerchant>,
    pub settlements: SettlementKpis,
    pub mdr_margins: Vec<MdrMarginRow>,
}

#[derive(Clone)]
pub struct BiRepository {
    pool: PgPool,
}

impl BiRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Todas as agregações do painel dentro de uma transação (snapshot
    // consistente entre os gráficos).
    pub async fn aggregates<'e, E>(
        &self,
        executor: E,
        filter: &BiFilter,
    ) -> Result<BiAggregates, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // A. KPIs executivos
        let sql = format!(
            r#"
            SELECT
                COUNT(*) AS transaction_count,
                COALESCE(SUM(t.amount), 0) AS total_amount,
                COALESCE(SUM(t.net_amount), 0) AS net_amount,
                CASE WHEN COUNT(*) = 0 THEN 0
                     ELSE ROUND(SUM(t.amount) / COUNT(*), 2)
                END AS average_ticket,
                CASE WHEN COUNT(*) = 0 THEN 0
                     ELSE ROUND(
                        COUNT(*) FILTER (WHERE t.status IN ('AUTHORIZED', 'CAPTURED'))::numeric
                        * 100 / COUNT(*), 2)
                END AS approval_rate,
                COUNT(DISTINCT t.merchant_id) AS active_merchants
            FROM transactions t
            WHERE {FILTER_CLAUSE}
            "#
        );
        let kpis = sqlx::query_as::<_, ExecutiveKpis>(&sql)
            .bind(&filter.customer_ids)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .fetch_one(&mut *tx)
            .await?;

        // B. Série diária
        let sql = format!(
            r#"
            SELECT
                t.captured_at::date AS day,
                COUNT(*) AS transaction_count,
                COALESCE(SUM(t.amount), 0) AS total_amount
            FROM transactions t
            WHERE {FILTER_CLAUSE}
            GROUP BY 1 ORDER BY 1 ASC
            "#
        );
        let daily_series = sqlx::query_as::<_, DailyPoint>(&sql)
            .bind(&filter.customer_ids)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .fetch_all(&mut *tx)
            .await?;

        // C/D/G. Mix por bandeira, por produto e funil de status
        let mut grouped = Vec::with_capacity(3);
        for key_expr in ["t.brand", "t.product_type", "t.status"] {
            let sql = format!(
                r#"
                SELECT
                    {key_expr} AS key,
                    COUNT(*) AS transaction_count,
                    COALESCE(SUM(t.amount), 0) AS total_amount,
                    COALESCE(SUM(t.net_amount), 0) AS net_amount
                FROM transactions t
                WHERE {FILTER_CLAUSE}
                GROUP BY 1 ORDER BY total_amount DESC
                "#
            );
            let rows = sqlx::query_as::<_, GroupedTotal>(&sql)
                .bind(&filter.customer_ids)
                .bind(filter.date_from)
                .bind(filter.date_to)
                .fetch_all(&mut *tx)
                .await?;
            grouped.push(rows);
        }
        let status_funnel = grouped.pop().unwrap_or_default();
        let product_mix = grouped.pop().unwrap_or_default();
        let brand_mix = grouped.pop().unwrap_or_default();

        // E. Heatmap por hora do dia
        let sql = format!(
            r#"
            SELECT
                EXTRACT(HOUR FROM t.captured_at)::int AS hour,
                COUNT(*) AS transaction_count,
                COALESCE(SUM(t.amount), 0) AS total_amount
            FROM transactions t
            WHERE {FILTER_CLAUSE}
            GROUP BY 1 ORDER BY 1 ASC
            "#
        );
        let hourly_heatmap = sqlx::query_as::<_, HourlyCell>(&sql)
            .bind(&filter.customer_ids)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .fetch_all(&mut *tx)
            .await?;

        // F. Volume por dia da semana x turno
        let sql = format!(
            r#"
            SELECT
                EXTRACT(DOW FROM t.captured_at)::int AS weekday,
                CASE
                    WHEN EXTRACT(HOUR FROM t.captured_at) < 6 THEN 'MADRUGADA'
                    WHEN EXTRACT(HOUR FROM t.captured_at) < 12 THEN 'MANHA'
                    WHEN EXTRACT(HOUR FROM t.captured_at) < 18 THEN 'TARDE'
                    ELSE 'NOITE'
                END AS shift,
                COUNT(*) AS transaction_count,
                COALESCE(SUM(t.amount), 0) AS total_amount
            FROM transactions t
            WHERE {FILTER_CLAUSE}
            GROUP BY 1, 2 ORDER BY 1, 2
            "#
        );
        let weekday_shifts = sqlx::query_as::<_, WeekdayShiftRow>(&sql)
            .bind(&filter.customer_ids)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .fetch_all(&mut *tx)
            .await?;

        // H. Top 10 estabelecimentos por volume
        let sql = format!(
            r#"
            SELECT
                t.merchant_id,
                m.name AS merchant_name,
                COUNT(*) AS transaction_count,
                COALESCE(SUM(t.amount), 0) AS total_amount
            FROM transactions t
            JOIN merchants m ON m.id = t.merchant_id
            WHERE {FILTER_CLAUSE}
            GROUP BY t.merchant_id, m.name
            ORDER BY total_amount DESC
            LIMIT 10
            "#
        );
        let top_merchants = sqlx::query_as::<_, TopMerchant>(&sql)
            .bind(&filter.customer_ids)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .fetch_all(&mut *tx)
            .await?;

        // I. Resumo de repasse nos períodos que intersectam a janela.
        // Linhas roladas ficam de fora: a comissão delas já vive no
        // fechamento que as absorveu.
        let settlements = sqlx::query_as::<_, SettlementKpis>(
            r#"
            SELECT
                COUNT(*) AS settlement_count,
                COALESCE(SUM(s.commission_value), 0) AS total_commission,
                COALESCE(SUM(s.commission_value) FILTER (WHERE s.status = 'paid'), 0)
                    AS paid_commission,
                COALESCE(SUM(s.commission_value)
                    FILTER (WHERE s.status IN ('pending_invoice', 'validating', 'accumulated')), 0)
                    AS pending_commission
            FROM monthly_settlements s
            WHERE s.rolled_into IS NULL
              AND ($1::bigint[] IS NULL OR s.customer_id = ANY($1))
              AND ($2::date IS NULL OR make_date(s.year, s.month, 1)
                    >= date_trunc('month', $2::timestamp)::date)
              AND ($3::date IS NULL OR make_date(s.year, s.month, 1) <= $3)
            "#,
        )
        .bind(&filter.customer_ids)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .fetch_one(&mut *tx)
        .await?;

        // J. Margem de MDR por produto
        let sql = format!(
            r#"
            SELECT
                t.product_type,
                COALESCE(SUM(t.amount), 0) AS gross_amount,
                COALESCE(SUM(t.mdr_fee), 0) AS mdr_total
            FROM transactions t
            WHERE {FILTER_CLAUSE}
            GROUP BY 1 ORDER BY gross_amount DESC
            "#
        );
        let mdr_margins = sqlx::query_as::<_, MdrMarginRow>(&sql)
            .bind(&filter.customer_ids)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(BiAggregates {
            kpis,
            daily_series,
            brand_mix,
            product_mix,
            hourly_heatmap,
            weekday_shifts,
            status_funnel,
            top_merchants,
            settlements,
            mdr_margins,
        })
    }
}
