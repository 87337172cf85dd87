// src/db/solicitation_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        file::StoredFile,
        solicitation::{Solicitation, SolicitationFee, SolicitationStatus},
    },
};

#[derive(Clone)]
pub struct SolicitationRepository {
    pool: PgPool,
}

impl SolicitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        customer_id: i64,
        merchant_id: Option<i64>,
        cnae: &str,
        mcc: &str,
        requested_by: Uuid,
    ) -> Result<Solicitation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let solicitation = sqlx::query_as::<_, Solicitation>(
            r#"
            INSERT INTO solicitations (customer_id, merchant_id, cnae, mcc, requested_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(merchant_id)
        .bind(cnae)
        .bind(mcc)
        .bind(requested_by)
        .fetch_one(executor)
        .await?;

        Ok(solicitation)
    }

    pub async fn insert_requested_fee<'e, E>(
        &self,
        executor: E,
        solicitation_id: Uuid,
        brand: &str,
        product_type: &str,
        requested_fee: Decimal,
    ) -> Result<SolicitationFee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let fee = sqlx::query_as::<_, SolicitationFee>(
            r#"
            INSERT INTO solicitation_fees (solicitation_id, brand, product_type, requested_fee)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (solicitation_id, brand, product_type)
                DO UPDATE SET requested_fee = EXCLUDED.requested_fee
            RETURNING *
            "#,
        )
        .bind(solicitation_id)
        .bind(brand)
        .bind(product_type)
        .bind(requested_fee)
        .fetch_one(executor)
        .await?;

        Ok(fee)
    }

    // Grava a coluna do admin (análise) ou da Dock (conclusão) na célula.
    pub async fn set_fee_column<'e, E>(
        &self,
        executor: E,
        solicitation_id: Uuid,
        brand: &str,
        product_type: &str,
        admin_fee: Option<Decimal>,
        dock_fee: Option<Decimal>,
    ) -> Result<SolicitationFee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let fee = sqlx::query_as::<_, SolicitationFee>(
            r#"
            INSERT INTO solicitation_fees (solicitation_id, brand, product_type, admin_fee, dock_fee)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (solicitation_id, brand, product_type) DO UPDATE SET
                admin_fee = COALESCE(EXCLUDED.admin_fee, solicitation_fees.admin_fee),
                dock_fee = COALESCE(EXCLUDED.dock_fee, solicitation_fees.dock_fee)
            RETURNING *
            "#,
        )
        .bind(solicitation_id)
        .bind(brand)
        .bind(product_type)
        .bind(admin_fee)
        .bind(dock_fee)
        .fetch_one(executor)
        .await?;

        Ok(fee)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        customer_ids: Option<&[i64]>,
    ) -> Result<Option<Solicitation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let solicitation = sqlx::query_as::<_, Solicitation>(
            r#"
            SELECT * FROM solicitations
            WHERE id = $1
              AND ($2::bigint[] IS NULL OR customer_id = ANY($2))
            "#,
        )
        .bind(id)
        .bind(customer_ids)
        .fetch_optional(executor)
        .await?;

        Ok(solicitation)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        customer_ids: Option<&[i64]>,
        status: Option<SolicitationStatus>,
    ) -> Result<Vec<Solicitation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let solicitations = sqlx::query_as::<_, Solicitation>(
            r#"
            SELECT * FROM solicitations
            WHERE ($1::bigint[] IS NULL OR customer_id = ANY($1))
              AND ($2::solicitation_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(customer_ids)
        .bind(status)
        .fetch_all(executor)
        .await?;

        Ok(solicitations)
    }

    pub async fn list_fees<'e, E>(
        &self,
        executor: E,
        solicitation_id: Uuid,
    ) -> Result<Vec<SolicitationFee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let fees = sqlx::query_as::<_, SolicitationFee>(
            r#"
            SELECT * FROM solicitation_fees
            WHERE solicitation_id = $1
            ORDER BY brand, product_type
            "#,
        )
        .bind(solicitation_id)
        .fetch_all(executor)
        .await?;

        Ok(fees)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: SolicitationStatus,
        reviewed_by: Option<Uuid>,
        decline_reason: Option<&str>,
    ) -> Result<Solicitation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let solicitation = sqlx::query_as::<_, Solicitation>(
            r#"
            UPDATE solicitations SET
                status = $2,
                reviewed_by = COALESCE($3, reviewed_by),
                decline_reason = COALESCE($4, decline_reason),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(reviewed_by)
        .bind(decline_reason)
        .fetch_one(executor)
        .await?;

        Ok(solicitation)
    }

    pub async fn link_document<'e, E>(
        &self,
        executor: E,
        solicitation_id: Uuid,
        file_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO solicitation_fee_documents (solicitation_id, file_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(solicitation_id)
        .bind(file_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn list_documents<'e, E>(
        &self,
        executor: E,
        solicitation_id: Uuid,
    ) -> Result<Vec<StoredFile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let documents = sqlx::query_as::<_, StoredFile>(
            r#"
            SELECT f.* FROM files f
            JOIN solicitation_fee_documents d ON d.file_id = f.id
            WHERE d.solicitation_id = $1 AND f.active = TRUE
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(solicitation_id)
        .fetch_all(executor)
        .await?;

        Ok(documents)
    }

    pub async fn count_documents<'e, E>(
        &self,
        executor: E,
        solicitation_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM solicitation_fee_documents d
            JOIN files f ON f.id = d.file_id
            WHERE d.solicitation_id = $1 AND f.active = TRUE
            "#,
        )
        .bind(solicitation_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }
}
