// src/models/file.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub id: Uuid,

    #[schema(example = "contrato-social")]
    pub name: String,
    #[schema(example = "pdf")]
    pub extension: String,
    #[schema(example = "https://storage.acquirer.com.br/backoffice/merchants/10/contrato-social.pdf")]
    pub url: String,
    #[schema(example = "application/pdf")]
    pub content_type: String,
    pub size_bytes: i64,

    // Classificação livre: CONTRATO, IDENTIDADE, COMPROVANTE...
    pub document_type: Option<String>,

    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

// Entidade dona do arquivo; define o namespace da chave no storage e a
// tabela de vínculo usada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FileOwner {
    Merchant,
    Solicitation,
}

impl FileOwner {
    pub fn plural(self) -> &'static str {
        match self {
            FileOwner::Merchant => "merchants",
            FileOwner::Solicitation => "solicitations",
        }
    }

    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "merchants" => Some(FileOwner::Merchant),
            "solicitations" => Some(FileOwner::Solicitation),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segmento_de_rota_resolve_o_dono() {
        assert_eq!(FileOwner::parse("merchants"), Some(FileOwner::Merchant));
        assert_eq!(FileOwner::parse("solicitations"), Some(FileOwner::Solicitation));
        assert_eq!(FileOwner::parse("users"), None);
    }
}
