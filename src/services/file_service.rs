// src/services/file_service.rs

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FileRepository,
    models::file::{FileOwner, StoredFile},
    storage::{ObjectStorage, object_key, split_file_name},
};

// Documentos cadastrais aceitam imagem além de PDF/XML.
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 5] = ["pdf", "xml", "png", "jpg", "jpeg"];

pub fn validate_document_file(
    file_name: &str,
    size: usize,
) -> Result<(String, String), AppError> {
    let (stem, extension) = split_file_name(file_name);

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::UnsupportedFileType(file_name.to_string()));
    }
    if size > MAX_FILE_BYTES {
        return Err(AppError::FileTooLarge(size));
    }

    Ok((stem, extension))
}

#[derive(Clone)]
pub struct FileService {
    repo: FileRepository,
    storage: Arc<dyn ObjectStorage>,
}

impl FileService {
    pub fn new(repo: FileRepository, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { repo, storage }
    }

    // Grava o blob, registra o metadado e vincula à entidade dona, nesta
    // ordem: storage primeiro, banco em uma transação só.
    #[allow(clippy::too_many_arguments)]
    pub async fn upload_for_owner(
        &self,
        pool: &PgPool,
        owner: FileOwner,
        owner_id: &str,
        file_name: &str,
        content_type: &str,
        document_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<StoredFile, AppError> {
        let (stem, extension) = validate_document_file(file_name, bytes.len())?;
        let size_bytes = bytes.len() as i64;

        let key = object_key(owner.plural(), owner_id, &stem, &extension);
        let url = self.storage.put(&key, bytes, content_type).await?;

        let mut tx = pool.begin().await?;
        let file = self
            .repo
            .insert(&mut *tx, &stem, &extension, &url, content_type, size_bytes, document_type)
            .await?;

        match owner {
            FileOwner::Merchant => {
                let merchant_id: i64 =
                    owner_id.parse().map_err(|_| AppError::MerchantNotFound)?;
                self.repo.link_to_merchant(&mut *tx, merchant_id, file.id).await?;
            }
            // Solicitação vincula pela própria tabela de documentos; o
            // chamador usa o id devolvido.
            FileOwner::Solicitation => {}
        }
        tx.commit().await?;

        tracing::info!("Arquivo {} gravado em {}", file.id, file.url);
        Ok(file)
    }

    pub async fn list_for_owner(
        &self,
        pool: &PgPool,
        owner: FileOwner,
        owner_id: &str,
        document_type: Option<&str>,
    ) -> Result<Vec<StoredFile>, AppError> {
        self.repo
            .list_for_owner(pool, owner, owner_id, document_type)
            .await
    }

    // Soft-delete: desativa a linha e depois tenta remover o blob. A
    // remoção do blob é melhor esforço; se falhar, o metadado já está
    // inativo e o blob vira órfão inofensivo.
    pub async fn soft_delete(&self, pool: &PgPool, file_id: Uuid) -> Result<StoredFile, AppError> {
        let file = self
            .repo
            .deactivate(pool, file_id)
            .await?
            .ok_or(AppError::FileNotFound)?;

        if let Err(e) = self.storage.delete_url(&file.url).await {
            tracing::warn!("Blob de {} não removido do storage: {e}", file.id);
        }

        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documento_aceita_imagem_e_pdf() {
        assert!(validate_document_file("rg.png", 1024).is_ok());
        assert!(validate_document_file("contrato.pdf", 1024).is_ok());
        assert!(matches!(
            validate_document_file("planilha.xlsx", 1024),
            Err(AppError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn documento_acima_de_10mb_e_recusado() {
        assert!(matches!(
            validate_document_file("contrato.pdf", MAX_FILE_BYTES + 1),
            Err(AppError::FileTooLarge(_))
        ));
    }
}
