// src/services/dock_sync_service.rs

use sqlx::{PgConnection, PgPool};

use crate::{
    common::error::AppError,
    db::DockRepository,
    dock::client::DockApiClient,
    models::dock::{DockMerchant, SyncReport},
};

// Job disparado pelo operador: replica o cadastro da Dock para o banco
// local, em lote, linear e sem concorrência. Falha de um registro é logada
// e contada, nunca aborta o lote.
#[derive(Clone)]
pub struct DockSyncService {
    repo: DockRepository,
    client: Option<DockApiClient>,
    enabled: bool,
}

impl DockSyncService {
    pub fn new(repo: DockRepository, client: Option<DockApiClient>, enabled: bool) -> Self {
        Self { repo, client, enabled }
    }

    pub async fn sync_all(&self, pool: &PgPool) -> Result<SyncReport, AppError> {
        if !self.enabled {
            return Err(AppError::DockSyncDisabled);
        }
        let client = self.client.as_ref().ok_or(AppError::DockSyncDisabled)?;

        let merchants = client.list_merchants().await?;
        tracing::info!("Sync Dock: {} estabelecimentos recebidos", merchants.len());

        let mut report = SyncReport::default();
        let mut conn = pool.acquire().await?;

        for merchant in &merchants {
            match self.sync_merchant(&mut conn, client, merchant, &mut report).await {
                Ok(()) => {}
                Err(e) => {
                    report.merchants.failed += 1;
                    tracing::warn!("Sync do EC {} falhou: {e}", merchant.slug);
                }
            }
        }

        tracing::info!(
            "Sync Dock concluído: {} inseridos / {} atualizados / {} falhas",
            report.merchants.inserted,
            report.merchants.updated,
            report.merchants.failed
        );
        Ok(report)
    }

    async fn sync_merchant(
        &self,
        conn: &mut PgConnection,
        client: &DockApiClient,
        merchant: &DockMerchant,
        report: &mut SyncReport,
    ) -> Result<(), AppError> {
        // O ISO dono precisa existir localmente; sem ele o EC fica para o
        // próximo sync.
        let customer_id = self
            .repo
            .find_customer_by_slug(conn, &merchant.customer_slug)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        let mut address_id = None;
        if let Some(address) = &merchant.address {
            let upserted = self.repo.upsert_address(conn, address).await?;
            report.addresses.record(upserted.inserted);
            address_id = Some(upserted.id);
        }

        let mut category_id = None;
        if let Some(category) = &merchant.category {
            let upserted = self.repo.upsert_category(conn, category).await?;
            report.categories.record(upserted.inserted);
            category_id = Some(upserted.id);
        }

        let mut configuration_id = None;
        if let Some(configuration) = &merchant.configuration {
            let upserted = self.repo.upsert_configuration(conn, configuration).await?;
            report.configurations.record(upserted.inserted);
            configuration_id = Some(upserted.id);
        }

        let mut sales_agent_id = None;
        if let Some(agent) = &merchant.sales_agent {
            let upserted = self.repo.upsert_sales_agent(conn, agent).await?;
            report.sales_agents.record(upserted.inserted);
            sales_agent_id = Some(upserted.id);
        }

        let mut legal_nature_id = None;
        if let Some(nature) = &merchant.legal_nature {
            let upserted = self.repo.upsert_legal_nature(conn, nature).await?;
            report.legal_natures.record(upserted.inserted);
            legal_nature_id = Some(upserted.id);
        }

        let upserted = self
            .repo
            .upsert_merchant(
                conn,
                merchant,
                customer_id,
                category_id,
                address_id,
                configuration_id,
                sales_agent_id,
                legal_nature_id,
            )
            .await?;
        report.merchants.record(upserted.inserted);
        let merchant_id = upserted.id;

        if let Some(account) = &merchant.pix_account {
            let pix = self.repo.upsert_pix_account(conn, merchant_id, account).await?;
            report.pix_accounts.record(pix.inserted);
        }

        // Taxas efetivas do EC, uma chamada por slug.
        let prices = client.merchant_prices(&merchant.slug).await?;
        for price in &prices {
            match self.repo.upsert_merchant_price(conn, merchant_id, price).await {
                Ok(upserted) => report.prices.record(upserted.inserted),
                Err(e) => {
                    report.prices.failed += 1;
                    tracing::warn!("Preço {} do EC {} falhou: {e}", price.slug, merchant.slug);
                }
            }
        }

        Ok(())
    }
}
