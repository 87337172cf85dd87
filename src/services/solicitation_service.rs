// src/services/solicitation_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SolicitationRepository,
    models::{
        auth::User,
        scope::AccessScope,
        solicitation::{
            CompleteSolicitationPayload, CreateSolicitationPayload, DeclineSolicitationPayload,
            RequestedFeeCell, ReviewSolicitationPayload, Solicitation, SolicitationDetail,
            SolicitationEvent, SolicitationStatus,
        },
    },
};

#[derive(Clone)]
pub struct SolicitationService {
    repo: SolicitationRepository,
}

impl SolicitationService {
    pub fn new(repo: SolicitationRepository) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        pool: &PgPool,
        scope: &AccessScope,
        requested_by: Uuid,
        payload: &CreateSolicitationPayload,
    ) -> Result<SolicitationDetail, AppError> {
        // O ISO só abre solicitação para cliente do próprio escopo.
        if scope.narrow(Some(payload.customer_id)).is_empty() {
            return Err(AppError::AccessDenied);
        }

        let mut tx = pool.begin().await?;

        let solicitation = self
            .repo
            .insert(
                &mut *tx,
                payload.customer_id,
                payload.merchant_id,
                &payload.cnae,
                &payload.mcc,
                requested_by,
            )
            .await?;

        let mut fees = Vec::with_capacity(payload.fees.len());
        for cell in &payload.fees {
            let fee = self
                .repo
                .insert_requested_fee(
                    &mut *tx,
                    solicitation.id,
                    &cell.brand,
                    &cell.product_type,
                    cell.fee_percent,
                )
                .await?;
            fees.push(fee);
        }

        tx.commit().await?;

        tracing::info!(
            "Solicitação {} aberta (CNAE {}, {} taxas)",
            solicitation.id,
            solicitation.cnae,
            fees.len()
        );
        Ok(SolicitationDetail { solicitation, fees, documents: Vec::new() })
    }

    pub async fn list(
        &self,
        pool: &PgPool,
        scope: &AccessScope,
        status: Option<SolicitationStatus>,
    ) -> Result<Vec<Solicitation>, AppError> {
        self.repo
            .list(pool, scope.as_filter().as_deref(), status)
            .await
    }

    pub async fn detail(
        &self,
        pool: &PgPool,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<SolicitationDetail, AppError> {
        let solicitation = self
            .repo
            .find_by_id(pool, id, scope.as_filter().as_deref())
            .await?
            .ok_or(AppError::SolicitationNotFound)?;

        let fees = self.repo.list_fees(pool, id).await?;
        let documents = self.repo.list_documents(pool, id).await?;

        Ok(SolicitationDetail { solicitation, fees, documents })
    }

    // SEND_DOCUMENTS -> PENDING. Exige ao menos um documento anexado.
    pub async fn submit(
        &self,
        pool: &PgPool,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<Solicitation, AppError> {
        let solicitation = self
            .repo
            .find_by_id(pool, id, scope.as_filter().as_deref())
            .await?
            .ok_or(AppError::SolicitationNotFound)?;

        let next = SolicitationEvent::Submit.apply(solicitation.status)?;
        if next == solicitation.status {
            return Ok(solicitation);
        }

        if self.repo.count_documents(pool, id).await? == 0 {
            return Err(AppError::MissingDocuments);
        }

        self.repo.update_status(pool, id, next, None, None).await
    }

    // PENDING -> REVIEWED, registrando a grade ofertada pelo admin.
    pub async fn review(
        &self,
        pool: &PgPool,
        reviewer: &User,
        id: Uuid,
        payload: &ReviewSolicitationPayload,
    ) -> Result<SolicitationDetail, AppError> {
        let solicitation = self
            .repo
            .find_by_id(pool, id, None)
            .await?
            .ok_or(AppError::SolicitationNotFound)?;

        let next = SolicitationEvent::Review.apply(solicitation.status)?;

        let mut tx = pool.begin().await?;
        self.write_fee_column(&mut tx, id, &payload.admin_fees, true).await?;
        let solicitation = if next != solicitation.status {
            self.repo
                .update_status(&mut *tx, id, next, Some(reviewer.id), None)
                .await?
        } else {
            solicitation
        };
        tx.commit().await?;

        let fees = self.repo.list_fees(pool, id).await?;
        let documents = self.repo.list_documents(pool, id).await?;
        Ok(SolicitationDetail { solicitation, fees, documents })
    }

    pub async fn approve(&self, pool: &PgPool, id: Uuid) -> Result<Solicitation, AppError> {
        self.transition(pool, id, SolicitationEvent::Approve, None, None).await
    }

    pub async fn decline(
        &self,
        pool: &PgPool,
        id: Uuid,
        payload: &DeclineSolicitationPayload,
    ) -> Result<Solicitation, AppError> {
        self.transition(pool, id, SolicitationEvent::Decline, None, Some(&payload.reason))
            .await
    }

    // APPROVED -> COMPLETED, registrando as taxas que o processador
    // efetivamente aplicou.
    pub async fn complete(
        &self,
        pool: &PgPool,
        id: Uuid,
        payload: &CompleteSolicitationPayload,
    ) -> Result<SolicitationDetail, AppError> {
        let solicitation = self
            .repo
            .find_by_id(pool, id, None)
            .await?
            .ok_or(AppError::SolicitationNotFound)?;

        let next = SolicitationEvent::Complete.apply(solicitation.status)?;

        let mut tx = pool.begin().await?;
        self.write_fee_column(&mut tx, id, &payload.dock_fees, false).await?;
        let solicitation = if next != solicitation.status {
            self.repo.update_status(&mut *tx, id, next, None, None).await?
        } else {
            solicitation
        };
        tx.commit().await?;

        let fees = self.repo.list_fees(pool, id).await?;
        let documents = self.repo.list_documents(pool, id).await?;
        Ok(SolicitationDetail { solicitation, fees, documents })
    }

    pub async fn link_document(
        &self,
        pool: &PgPool,
        scope: &AccessScope,
        id: Uuid,
        file_id: Uuid,
    ) -> Result<(), AppError> {
        let solicitation = self
            .repo
            .find_by_id(pool, id, scope.as_filter().as_deref())
            .await?
            .ok_or(AppError::SolicitationNotFound)?;

        // Terminais não recebem mais documentos.
        if matches!(
            solicitation.status,
            SolicitationStatus::Declined | SolicitationStatus::Completed
        ) {
            return Err(AppError::InvalidStatusTransition(format!(
                "anexo com status {:?}",
                solicitation.status
            )));
        }

        self.repo.link_document(pool, id, file_id).await
    }

    async fn transition(
        &self,
        pool: &PgPool,
        id: Uuid,
        event: SolicitationEvent,
        reviewed_by: Option<Uuid>,
        reason: Option<&str>,
    ) -> Result<Solicitation, AppError> {
        let solicitation = self
            .repo
            .find_by_id(pool, id, None)
            .await?
            .ok_or(AppError::SolicitationNotFound)?;

        let next = event.apply(solicitation.status)?;
        if next == solicitation.status {
            return Ok(solicitation);
        }

        self.repo
            .update_status(pool, id, next, reviewed_by, reason)
            .await
    }

    async fn write_fee_column(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: Uuid,
        cells: &[RequestedFeeCell],
        admin_column: bool,
    ) -> Result<(), AppError> {
        for cell in cells {
            let (admin_fee, dock_fee) = if admin_column {
                (Some(cell.fee_percent), None)
            } else {
                (None, Some(cell.fee_percent))
            };
            self.repo
                .set_fee_column(
                    &mut **tx,
                    id,
                    &cell.brand,
                    &cell.product_type,
                    admin_fee,
                    dock_fee,
                )
                .await?;
        }
        Ok(())
    }
}
