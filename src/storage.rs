// src/storage.rs

// Contrato com o object storage: grava o blob e devolve a URL pública,
// apaga pelo mesmo par bucket/chave. As chaves seguem o namespace
// {entidade-plural}/{id}/{nome}.{extensao}.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::common::error::AppError;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, AppError>;
    // Remove pelo URL devolvido no put (mesmo namespace bucket/chave).
    async fn delete_url(&self, url: &str) -> Result<(), AppError>;
}

// Implementação HTTP (storage compatível com PUT/DELETE autenticado).
pub struct HttpObjectStorage {
    http: Client,
    base_url: String,
    bucket: String,
    token: Option<String>,
}

impl HttpObjectStorage {
    pub fn new(base_url: String, bucket: String, token: Option<String>) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket,
            token,
        })
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.bucket, key)
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, AppError> {
        let url = self.url_for(key);

        let mut request = self
            .http
            .put(&url)
            .header("Content-Type", content_type)
            .body(bytes);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::StorageWriteFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::StorageWriteFailed(format!(
                "status {} ao gravar {key}",
                response.status()
            )));
        }

        tracing::debug!("Blob gravado no storage: {key}");
        Ok(url)
    }

    async fn delete_url(&self, url: &str) -> Result<(), AppError> {
        let mut request = self.http.delete(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::StorageWriteFailed(e.to_string()))?;

        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::StorageWriteFailed(format!(
                "status {} ao remover {url}",
                response.status()
            )));
        }
        Ok(())
    }
}

// Monta a chave namespaced de um arquivo.
pub fn object_key(owner_plural: &str, entity_id: &str, name: &str, extension: &str) -> String {
    format!("{owner_plural}/{entity_id}/{}.{extension}", sanitize_name(name))
}

// Nome de arquivo seguro para URL: minúsculas, alfanumérico e hífens.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() { "arquivo".to_string() } else { trimmed.to_string() }
}

// Separa "nota março.PDF" em ("nota março", "pdf").
pub fn split_file_name(file_name: &str) -> (String, String) {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            (stem.to_string(), ext.to_ascii_lowercase())
        }
        _ => (file_name.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chave_segue_o_namespace() {
        assert_eq!(
            object_key("merchants", "10", "Contrato Social", "pdf"),
            "merchants/10/contrato-social.pdf"
        );
    }

    #[test]
    fn nome_sanitizado_nao_tem_caracteres_especiais() {
        assert_eq!(sanitize_name("Nota Fiscal (março)"), "nota-fiscal-mar-o");
        assert_eq!(sanitize_name("///"), "arquivo");
    }

    #[test]
    fn separa_nome_e_extensao() {
        assert_eq!(split_file_name("nota.PDF"), ("nota".into(), "pdf".into()));
        assert_eq!(split_file_name("sem-extensao"), ("sem-extensao".into(), String::new()));
    }
}
