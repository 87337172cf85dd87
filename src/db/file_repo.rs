// src/db/file_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::file::{FileOwner, StoredFile}};

#[derive(Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        name: &str,
        extension: &str,
        url: &str,
        content_type: &str,
        size_bytes: i64,
        document_type: Option<&str>,
    ) -> Result<StoredFile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let file = sqlx::query_as::<_, StoredFile>(
            r#"
            INSERT INTO files (name, extension, url, content_type, size_bytes, document_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(extension)
        .bind(url)
        .bind(content_type)
        .bind(size_bytes)
        .bind(document_type)
        .fetch_one(executor)
        .await?;

        Ok(file)
    }

    pub async fn link_to_merchant<'e, E>(
        &self,
        executor: E,
        merchant_id: i64,
        file_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO merchant_files (merchant_id, file_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(merchant_id)
        .bind(file_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<StoredFile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let file = sqlx::query_as::<_, StoredFile>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(file)
    }

    // Arquivos vivos de uma entidade, com filtro opcional por tipo de
    // documento.
    pub async fn list_for_owner<'e, E>(
        &self,
        executor: E,
        owner: FileOwner,
        owner_id: &str,
        document_type: Option<&str>,
    ) -> Result<Vec<StoredFile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let files = match owner {
            FileOwner::Merchant => {
                let merchant_id: i64 = owner_id.parse().map_err(|_| AppError::MerchantNotFound)?;
                sqlx::query_as::<_, StoredFile>(
                    r#"
                    SELECT f.* FROM files f
                    JOIN merchant_files mf ON mf.file_id = f.id
                    WHERE mf.merchant_id = $1
                      AND f.active = TRUE
                      AND ($2::text IS NULL OR f.document_type = $2)
                    ORDER BY f.created_at DESC
                    "#,
                )
                .bind(merchant_id)
                .bind(document_type)
                .fetch_all(executor)
                .await?
            }
            FileOwner::Solicitation => {
                let solicitation_id =
                    Uuid::parse_str(owner_id).map_err(|_| AppError::SolicitationNotFound)?;
                sqlx::query_as::<_, StoredFile>(
                    r#"
                    SELECT f.* FROM files f
                    JOIN solicitation_fee_documents d ON d.file_id = f.id
                    WHERE d.solicitation_id = $1
                      AND f.active = TRUE
                      AND ($2::text IS NULL OR f.document_type = $2)
                    ORDER BY f.created_at DESC
                    "#,
                )
                .bind(solicitation_id)
                .bind(document_type)
                .fetch_all(executor)
                .await?
            }
        };

        Ok(files)
    }

    // Soft-delete: a linha fica para auditoria, o blob sai do storage.
    pub async fn deactivate<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<StoredFile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let file = sqlx::query_as::<_, StoredFile>(
            r#"
            UPDATE files SET active = FALSE
            WHERE id = $1 AND active = TRUE
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(file)
    }
}
