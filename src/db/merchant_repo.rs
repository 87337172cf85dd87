// src/db/merchant_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::merchant::{KycStatus, MerchantDetail, MerchantListRow, MerchantSummary},
};

#[derive(Debug, Clone, Default)]
pub struct MerchantFilter {
    pub customer_ids: Option<Vec<i64>>,
    pub search: Option<String>,
    pub kyc_status: Option<KycStatus>,
    pub active: Option<bool>,
}

// WHERE compartilhado entre listagem, contagem e resumo ($1..$4).
const FILTER_CLAUSE: &str = r#"
      ($1::bigint[] IS NULL OR m.customer_id = ANY($1))
      AND ($2::text IS NULL
           OR m.name ILIKE '%' || $2 || '%'
           OR m.trade_name ILIKE '%' || $2 || '%'
           OR m.document ILIKE '%' || $2 || '%')
      AND ($3::kyc_status IS NULL OR m.kyc_status = $3)
      AND ($4::boolean IS NULL OR m.active = $4)
"#;

#[derive(Clone)]
pub struct MerchantRepository {
    pool: PgPool,
}

impl MerchantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        filter: &MerchantFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MerchantListRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT
                m.id, m.name, m.trade_name, m.document,
                m.customer_id, c.name AS customer_name,
                cat.description AS category_description,
                a.city, a.state,
                sa.name AS sales_agent_name,
                m.kyc_status, m.anticipation_locked, m.active,
                m.created_at
            FROM merchants m
            JOIN customers c ON c.id = m.customer_id
            LEFT JOIN merchant_categories cat ON cat.id = m.category_id
            LEFT JOIN addresses a ON a.id = m.address_id
            LEFT JOIN sales_agents sa ON sa.id = m.sales_agent_id
            WHERE {FILTER_CLAUSE}
            ORDER BY m.name ASC
            LIMIT $5 OFFSET $6
            "#
        );

        let rows = sqlx::query_as::<_, MerchantListRow>(&sql)
            .bind(&filter.customer_ids)
            .bind(&filter.search)
            .bind(filter.kyc_status)
            .bind(filter.active)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    pub async fn count<'e, E>(
        &self,
        executor: E,
        filter: &MerchantFilter,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT COUNT(*) FROM merchants m WHERE {FILTER_CLAUSE}");

        let (total,): (i64,) = sqlx::query_as(&sql)
            .bind(&filter.customer_ids)
            .bind(&filter.search)
            .bind(filter.kyc_status)
            .bind(filter.active)
            .fetch_one(executor)
            .await?;

        Ok(total)
    }

    // Contagens derivadas exibidas junto da listagem: ativos/inativos,
    // baldes de KYC e travas de antecipação, sob os mesmos filtros.
    pub async fn summary<'e, E>(
        &self,
        executor: E,
        filter: &MerchantFilter,
    ) -> Result<MerchantSummary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE m.active) AS active_count,
                COUNT(*) FILTER (WHERE NOT m.active) AS inactive_count,
                COUNT(*) FILTER (WHERE m.kyc_status = 'APPROVED') AS kyc_approved,
                COUNT(*) FILTER (WHERE m.kyc_status = 'PENDING') AS kyc_pending,
                COUNT(*) FILTER (WHERE m.kyc_status = 'IN_ANALYSIS') AS kyc_in_analysis,
                COUNT(*) FILTER (WHERE m.kyc_status = 'REJECTED') AS kyc_rejected,
                COUNT(*) FILTER (WHERE m.anticipation_locked) AS anticipation_locked_count
            FROM merchants m
            WHERE {FILTER_CLAUSE}
            "#
        );

        let summary = sqlx::query_as::<_, MerchantSummary>(&sql)
            .bind(&filter.customer_ids)
            .bind(&filter.search)
            .bind(filter.kyc_status)
            .bind(filter.active)
            .fetch_one(executor)
            .await?;

        Ok(summary)
    }

    pub async fn find_detail<'e, E>(
        &self,
        executor: E,
        id: i64,
        customer_ids: Option<&[i64]>,
    ) -> Result<Option<MerchantDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let detail = sqlx::query_as::<_, MerchantDetail>(
            r#"
            SELECT
                m.id, m.slug, m.customer_id, c.name AS customer_name,
                m.name, m.trade_name, m.document, m.email, m.phone,
                cat.cnae, cat.mcc, cat.description AS category_description,
                a.street, a.number, a.district, a.city, a.state, a.zip_code,
                cfg.anticipation_enabled, cfg.anticipation_fee,
                cfg.settlement_days, cfg.pix_enabled,
                sa.name AS sales_agent_name,
                ln.description AS legal_nature,
                m.kyc_status, m.anticipation_locked, m.active,
                m.created_at, m.updated_at
            FROM merchants m
            JOIN customers c ON c.id = m.customer_id
            LEFT JOIN merchant_categories cat ON cat.id = m.category_id
            LEFT JOIN addresses a ON a.id = m.address_id
            LEFT JOIN merchant_configurations cfg ON cfg.id = m.configuration_id
            LEFT JOIN sales_agents sa ON sa.id = m.sales_agent_id
            LEFT JOIN legal_natures ln ON ln.id = m.legal_nature_id
            WHERE m.id = $1
              AND ($2::bigint[] IS NULL OR m.customer_id = ANY($2))
            "#,
        )
        .bind(id)
        .bind(customer_ids)
        .fetch_optional(executor)
        .await?;

        Ok(detail)
    }
}
