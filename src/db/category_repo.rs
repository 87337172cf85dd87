// src/db/category_repo.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::category::{CategoryFee, CreateCategoryPayload, MerchantCategory, UpdateCategoryPayload},
};

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        payload: &CreateCategoryPayload,
    ) -> Result<MerchantCategory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, MerchantCategory>(
            r#"
            INSERT INTO merchant_categories (
                slug, cnae, mcc, description, risk_factor,
                credit_waiting_days, installment_waiting_days, anticipation_waiting_days
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&payload.slug)
        .bind(&payload.cnae)
        .bind(&payload.mcc)
        .bind(&payload.description)
        .bind(payload.risk_factor)
        .bind(payload.credit_waiting_days)
        .bind(payload.installment_waiting_days)
        .bind(payload.anticipation_waiting_days)
        .fetch_one(executor)
        .await?;

        Ok(category)
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<MerchantCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let categories = sqlx::query_as::<_, MerchantCategory>(
            "SELECT * FROM merchant_categories ORDER BY description ASC",
        )
        .fetch_all(executor)
        .await?;

        Ok(categories)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: i64,
    ) -> Result<Option<MerchantCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, MerchantCategory>(
            "SELECT * FROM merchant_categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(category)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        payload: &UpdateCategoryPayload,
    ) -> Result<Option<MerchantCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, MerchantCategory>(
            r#"
            UPDATE merchant_categories SET
                description = $2,
                risk_factor = $3,
                credit_waiting_days = $4,
                installment_waiting_days = $5,
                anticipation_waiting_days = $6,
                active = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.description)
        .bind(payload.risk_factor)
        .bind(payload.credit_waiting_days)
        .bind(payload.installment_waiting_days)
        .bind(payload.anticipation_waiting_days)
        .bind(payload.active)
        .fetch_optional(executor)
        .await?;

        Ok(category)
    }

    pub async fn list_fees<'e, E>(
        &self,
        executor: E,
        category_id: i64,
    ) -> Result<Vec<CategoryFee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let fees = sqlx::query_as::<_, CategoryFee>(
            r#"
            SELECT * FROM category_fees
            WHERE category_id = $1
            ORDER BY brand, product_type
            "#,
        )
        .bind(category_id)
        .fetch_all(executor)
        .await?;

        Ok(fees)
    }

    // Troca atômica da grade de uma (categoria, bandeira).
    pub async fn replace_brand_fees<'e, E>(
        &self,
        executor: E,
        category_id: i64,
        brand: &str,
        fees: &[(String, Decimal)],
    ) -> Result<Vec<CategoryFee>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        sqlx::query("DELETE FROM category_fees WHERE category_id = $1 AND brand = $2")
            .bind(category_id)
            .bind(brand)
            .execute(&mut *tx)
            .await?;

        let mut inserted = Vec::with_capacity(fees.len());
        for (product_type, fee_percent) in fees {
            let fee = sqlx::query_as::<_, CategoryFee>(
                r#"
                INSERT INTO category_fees (category_id, brand, product_type, fee_percent)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(category_id)
            .bind(brand)
            .bind(product_type)
            .bind(fee_percent)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(fee);
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
