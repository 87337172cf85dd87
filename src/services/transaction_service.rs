// src/services/transaction_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{
        error::AppError,
        labels::{CardBrand, ProductType, TransactionStatus},
    },
    db::{SettlementRepository, TransactionRepository, transaction_repo::TransactionFilter},
    models::{
        scope::AccessScope,
        transaction::{
            FechamentoQuery, FechamentoResponse, GroupBy, GroupedQuery, LabeledGroupedTotal,
            Pagination, TransactionItem, TransactionQuery,
        },
    },
};

const DEFAULT_PAGE_SIZE: i64 = 25;
const MAX_PAGE_SIZE: i64 = 100;

fn page_bounds(page: Option<i64>, page_size: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, page_size)
}

#[derive(Clone)]
pub struct TransactionService {
    repo: TransactionRepository,
    settlement_repo: SettlementRepository,
}

impl TransactionService {
    pub fn new(repo: TransactionRepository, settlement_repo: SettlementRepository) -> Self {
        Self { repo, settlement_repo }
    }

    // Relatório de fechamento do período: resumo, página de transações e a
    // série diária para o gráfico. O escopo efetivo já chega resolvido
    // (inclusive quando o admin está "visualizando como").
    pub async fn fechamento(
        &self,
        pool: &PgPool,
        scope: &AccessScope,
        query: &FechamentoQuery,
    ) -> Result<FechamentoResponse, AppError> {
        let effective = scope.narrow(query.customer_id);
        let filter = TransactionFilter {
            customer_ids: effective.as_filter(),
            date_from: query.date_from,
            date_to: query.date_to,
            ..Default::default()
        };
        let (page, page_size) = page_bounds(query.page, query.page_size);

        let mut summary = self.repo.summary(pool, &filter).await?;
        let total = self.repo.count(pool, &filter).await?;
        let rows = self
            .repo
            .page(pool, &filter, page_size, (page - 1) * page_size)
            .await?;
        let chart_data = self.repo.daily_series(pool, &filter).await?;

        // A comissão do período só é determinável quando o relatório cobre
        // exatamente um cliente (o percentual é por ISO).
        if let Some(customer_id) = effective.single_customer() {
            if let Some(percent) = self
                .settlement_repo
                .customer_commission_percent(pool, customer_id)
                .await?
            {
                summary.commission_value =
                    (summary.gross_amount * percent / Decimal::ONE_HUNDRED).round_dp(2);
            }
        }

        Ok(FechamentoResponse {
            summary,
            transactions: rows.into_iter().map(TransactionItem::from).collect(),
            pagination: Pagination::new(page, page_size, total),
            chart_data,
        })
    }

    pub async fn list(
        &self,
        pool: &PgPool,
        scope: &AccessScope,
        query: &TransactionQuery,
    ) -> Result<(Vec<TransactionItem>, Pagination), AppError> {
        let effective = scope.narrow(query.customer_id);
        let filter = TransactionFilter {
            customer_ids: effective.as_filter(),
            merchant_id: query.merchant_id,
            status: query.status.clone(),
            date_from: query.date_from,
            date_to: query.date_to,
        };
        let (page, page_size) = page_bounds(query.page, query.page_size);

        let total = self.repo.count(pool, &filter).await?;
        let rows = self
            .repo
            .page(pool, &filter, page_size, (page - 1) * page_size)
            .await?;

        Ok((
            rows.into_iter().map(TransactionItem::from).collect(),
            Pagination::new(page, page_size, total),
        ))
    }

    pub async fn grouped(
        &self,
        pool: &PgPool,
        scope: &AccessScope,
        query: &GroupedQuery,
    ) -> Result<Vec<LabeledGroupedTotal>, AppError> {
        let effective = scope.narrow(query.customer_id);
        let filter = TransactionFilter {
            customer_ids: effective.as_filter(),
            date_from: query.date_from,
            date_to: query.date_to,
            ..Default::default()
        };

        let rows = self.repo.grouped(pool, &filter, query.by).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let label = match query.by {
                    GroupBy::Day => row.key.clone(),
                    GroupBy::Brand => CardBrand::parse(&row.key).label_pt().to_string(),
                    GroupBy::Status => TransactionStatus::parse(&row.key).label_pt().to_string(),
                    GroupBy::Product => ProductType::parse(&row.key).label_pt().to_string(),
                };
                LabeledGroupedTotal {
                    key: row.key,
                    label,
                    transaction_count: row.transaction_count,
                    total_amount: row.total_amount,
                    net_amount: row.net_amount,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagina_e_tamanho_sao_saneados() {
        assert_eq!(page_bounds(None, None), (1, 25));
        assert_eq!(page_bounds(Some(0), Some(-5)), (1, 1));
        assert_eq!(page_bounds(Some(3), Some(500)), (3, 100));
    }
}
