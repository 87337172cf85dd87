// src/services/bi_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{
        error::AppError,
        labels::{CardBrand, ProductType, TransactionStatus},
    },
    db::{BiRepository, bi_repo::BiFilter},
    models::{
        bi::{BiDashboardResponse, BiQuery, MdrMargin, WeekdayShiftCell, shift_label, weekday_label},
        scope::AccessScope,
        transaction::LabeledGroupedTotal,
    },
};

#[derive(Clone)]
pub struct BiService {
    repo: BiRepository,
}

impl BiService {
    pub fn new(repo: BiRepository) -> Self {
        Self { repo }
    }

    // Monta o payload único do painel a partir das agregações independentes,
    // resolvendo os rótulos do vocabulário do processador.
    pub async fn dashboard(
        &self,
        pool: &PgPool,
        scope: &AccessScope,
        query: &BiQuery,
    ) -> Result<BiDashboardResponse, AppError> {
        let effective = scope.narrow(query.customer_id);
        let filter = BiFilter {
            customer_ids: effective.as_filter(),
            date_from: query.date_from,
            date_to: query.date_to,
        };

        let agg = self.repo.aggregates(pool, &filter).await?;

        let brand_mix = agg
            .brand_mix
            .into_iter()
            .map(|row| LabeledGroupedTotal {
                label: CardBrand::parse(&row.key).label_pt().to_string(),
                key: row.key,
                transaction_count: row.transaction_count,
                total_amount: row.total_amount,
                net_amount: row.net_amount,
            })
            .collect();

        let product_mix = agg
            .product_mix
            .into_iter()
            .map(|row| LabeledGroupedTotal {
                label: ProductType::parse(&row.key).label_pt().to_string(),
                key: row.key,
                transaction_count: row.transaction_count,
                total_amount: row.total_amount,
                net_amount: row.net_amount,
            })
            .collect();

        let status_funnel = agg
            .status_funnel
            .into_iter()
            .map(|row| LabeledGroupedTotal {
                label: TransactionStatus::parse(&row.key).label_pt().to_string(),
                key: row.key,
                transaction_count: row.transaction_count,
                total_amount: row.total_amount,
                net_amount: row.net_amount,
            })
            .collect();

        let weekday_shifts = agg
            .weekday_shifts
            .into_iter()
            .map(|row| WeekdayShiftCell {
                weekday: row.weekday,
                weekday_label: weekday_label(row.weekday).to_string(),
                shift_label: shift_label(&row.shift).to_string(),
                shift: row.shift,
                transaction_count: row.transaction_count,
                total_amount: row.total_amount,
            })
            .collect();

        let mdr_margins = agg
            .mdr_margins
            .into_iter()
            .map(|row| {
                let effective_rate = if row.gross_amount.is_zero() {
                    Decimal::ZERO
                } else {
                    (row.mdr_total * Decimal::ONE_HUNDRED / row.gross_amount).round_dp(2)
                };
                MdrMargin {
                    product_label: ProductType::parse(&row.product_type).label_pt().to_string(),
                    product_type: row.product_type,
                    gross_amount: row.gross_amount,
                    mdr_total: row.mdr_total,
                    effective_rate,
                }
            })
            .collect();

        Ok(BiDashboardResponse {
            kpis: agg.kpis,
            daily_series: agg.daily_series,
            brand_mix,
            product_mix,
            hourly_heatmap: agg.hourly_heatmap,
            weekday_shifts,
            status_funnel,
            top_merchants: agg.top_merchants,
            settlements: agg.settlements,
            mdr_margins,
        })
    }
}
