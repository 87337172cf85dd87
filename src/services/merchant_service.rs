// src/services/merchant_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{MerchantRepository, merchant_repo::MerchantFilter},
    models::{
        merchant::{MerchantDetail, MerchantFilters, MerchantListResponse},
        scope::AccessScope,
        transaction::Pagination,
    },
};

const DEFAULT_PAGE_SIZE: i64 = 25;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone)]
pub struct MerchantService {
    repo: MerchantRepository,
}

impl MerchantService {
    pub fn new(repo: MerchantRepository) -> Self {
        Self { repo }
    }

    // Diretório de ECs: página filtrada + contagens derivadas, sempre
    // conjugado com o escopo. `mask` redige os dados sensíveis de quem não
    // tem a permissão.
    pub async fn list(
        &self,
        pool: &PgPool,
        scope: &AccessScope,
        filters: &MerchantFilters,
        mask: bool,
    ) -> Result<MerchantListResponse, AppError> {
        let effective = scope.narrow(filters.customer_id);
        let filter = MerchantFilter {
            customer_ids: effective.as_filter(),
            search: filters.search.clone().filter(|s| !s.trim().is_empty()),
            kyc_status: filters.kyc_status,
            active: filters.active,
        };

        let page = filters.page.unwrap_or(1).max(1);
        let page_size = filters
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let total = self.repo.count(pool, &filter).await?;
        let summary = self.repo.summary(pool, &filter).await?;
        let rows = self
            .repo
            .list(pool, &filter, page_size, (page - 1) * page_size)
            .await?;

        let merchants = if mask {
            rows.into_iter().map(|row| row.masked()).collect()
        } else {
            rows
        };

        Ok(MerchantListResponse {
            merchants,
            summary,
            pagination: Pagination::new(page, page_size, total),
        })
    }

    pub async fn detail(
        &self,
        pool: &PgPool,
        scope: &AccessScope,
        merchant_id: i64,
        mask: bool,
    ) -> Result<MerchantDetail, AppError> {
        let detail = self
            .repo
            .find_detail(pool, merchant_id, scope.as_filter().as_deref())
            .await?
            .ok_or(AppError::MerchantNotFound)?;

        Ok(if mask { detail.masked() } else { detail })
    }
}
