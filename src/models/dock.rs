// src/models/dock.rs

// DTOs da API da Dock (somente leitura) e o relatório do job de sincronismo.
// A chave natural de tudo é o slug; o sync nunca procura por id local.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize)]
pub struct DockAddress {
    pub slug: String,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DockCategory {
    pub slug: String,
    pub cnae: String,
    pub mcc: String,
    pub description: String,
    #[serde(default)]
    pub risk_factor: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DockConfiguration {
    pub slug: String,
    pub anticipation_enabled: bool,
    #[serde(default)]
    pub anticipation_fee: Option<Decimal>,
    pub settlement_days: i32,
    pub pix_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DockSalesAgent {
    pub slug: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DockLegalNature {
    pub slug: String,
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DockPixAccount {
    pub slug: String,
    pub key_type: String,
    pub key_value: String,
    pub bank_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DockMerchant {
    pub slug: String,
    pub customer_slug: String,
    pub name: String,
    pub trade_name: Option<String>,
    pub document: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub active: bool,

    pub address: Option<DockAddress>,
    pub category: Option<DockCategory>,
    pub configuration: Option<DockConfiguration>,
    pub sales_agent: Option<DockSalesAgent>,
    pub legal_nature: Option<DockLegalNature>,
    pub pix_account: Option<DockPixAccount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DockMerchantPrice {
    pub slug: String,
    pub brand: String,
    pub product_type: String,
    pub fee_percent: Decimal,
}

// --- Relatório do job ---

#[derive(Debug, Clone, Copy, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncCounter {
    pub inserted: u32,
    pub updated: u32,
    pub failed: u32,
}

impl SyncCounter {
    pub fn record(&mut self, inserted: bool) {
        if inserted {
            self.inserted += 1;
        } else {
            self.updated += 1;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub merchants: SyncCounter,
    pub addresses: SyncCounter,
    pub categories: SyncCounter,
    pub configurations: SyncCounter,
    pub sales_agents: SyncCounter,
    pub legal_natures: SyncCounter,
    pub pix_accounts: SyncCounter,
    pub prices: SyncCounter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contador_separa_insercao_de_atualizacao() {
        let mut counter = SyncCounter::default();
        counter.record(true);
        counter.record(false);
        counter.record(false);
        assert_eq!(counter.inserted, 1);
        assert_eq!(counter.updated, 2);
        assert_eq!(counter.failed, 0);
    }
}
