// src/dock/client.rs

// Cliente somente-leitura da API da Dock (o processador). O job de sync
// replica o cadastro para o banco local; nada aqui escreve na Dock.

use std::time::Duration;

use reqwest::Client;

use crate::common::error::AppError;
use crate::models::dock::{DockMerchant, DockMerchantPrice};

#[derive(Clone)]
pub struct DockApiClient {
    http: Client,
    base_url: String,
    token: String,
}

impl DockApiClient {
    pub fn new(base_url: String, token: String) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub async fn list_merchants(&self) -> Result<Vec<DockMerchant>, AppError> {
        let url = format!("{}/v1/merchants", self.base_url);
        tracing::debug!("GET {url}");

        let merchants = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<DockMerchant>>()
            .await?;

        Ok(merchants)
    }

    pub async fn merchant_prices(&self, slug: &str) -> Result<Vec<DockMerchantPrice>, AppError> {
        let url = format!("{}/v1/merchants/{slug}/merchant_prices", self.base_url);
        tracing::debug!("GET {url}");

        let prices = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<DockMerchantPrice>>()
            .await?;

        Ok(prices)
    }
}
