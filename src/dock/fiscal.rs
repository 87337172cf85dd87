// src/dock/fiscal.rs

// Validação fiscal da nota (NF-e) é um colaborador externo: mandamos a URL
// do arquivo e recebemos o veredito com os campos extraídos do documento.

use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::common::error::AppError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub valid: bool,
    pub access_key: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_value: Option<Decimal>,
    pub issuer_cnpj: Option<String>,
    pub issuer_name: Option<String>,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct FiscalApiClient {
    http: Client,
    base_url: String,
}

impl FiscalApiClient {
    pub fn new(base_url: String) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn validate(&self, file_url: &str) -> Result<ValidationOutcome, AppError> {
        let url = format!("{}/v1/invoices/validate", self.base_url);
        tracing::debug!("POST {url}");

        let outcome = self
            .http
            .post(&url)
            .json(&json!({ "fileUrl": file_url }))
            .send()
            .await?
            .error_for_status()?
            .json::<ValidationOutcome>()
            .await?;

        Ok(outcome)
    }
}
