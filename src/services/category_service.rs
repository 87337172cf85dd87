// src/services/category_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::CategoryRepository,
    models::category::{
        CategoryWithFees, CreateCategoryPayload, MerchantCategory, UpdateCategoryPayload,
        UpsertFeeSchedulePayload,
    },
};

#[derive(Clone)]
pub struct CategoryService {
    repo: CategoryRepository,
}

impl CategoryService {
    pub fn new(repo: CategoryRepository) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        pool: &PgPool,
        payload: &CreateCategoryPayload,
    ) -> Result<MerchantCategory, AppError> {
        let category = self.repo.create(pool, payload).await?;
        tracing::info!("Categoria criada: {} (CNAE {})", category.slug, category.cnae);
        Ok(category)
    }

    pub async fn list(&self, pool: &PgPool) -> Result<Vec<MerchantCategory>, AppError> {
        self.repo.list(pool).await
    }

    pub async fn update(
        &self,
        pool: &PgPool,
        id: i64,
        payload: &UpdateCategoryPayload,
    ) -> Result<MerchantCategory, AppError> {
        self.repo
            .update(pool, id, payload)
            .await?
            .ok_or(AppError::CategoryNotFound)
    }

    pub async fn with_fees(&self, pool: &PgPool, id: i64) -> Result<CategoryWithFees, AppError> {
        let category = self
            .repo
            .find_by_id(pool, id)
            .await?
            .ok_or(AppError::CategoryNotFound)?;
        let fees = self.repo.list_fees(pool, id).await?;
        Ok(CategoryWithFees { category, fees })
    }

    // Substitui a grade da bandeira inteira de uma vez; célula a célula
    // deixaria taxas órfãs de produtos removidos.
    pub async fn upsert_fee_schedule(
        &self,
        pool: &PgPool,
        id: i64,
        payload: &UpsertFeeSchedulePayload,
    ) -> Result<CategoryWithFees, AppError> {
        let category = self
            .repo
            .find_by_id(pool, id)
            .await?
            .ok_or(AppError::CategoryNotFound)?;

        let cells: Vec<(String, rust_decimal::Decimal)> = payload
            .fees
            .iter()
            .map(|cell| (cell.product_type.clone(), cell.fee_percent))
            .collect();

        self.repo
            .replace_brand_fees(pool, category.id, &payload.brand, &cells)
            .await?;

        let fees = self.repo.list_fees(pool, category.id).await?;
        Ok(CategoryWithFees { category, fees })
    }
}
