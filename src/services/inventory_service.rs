// src/services/inventory_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InventoryRepository,
    models::{
        auth::{Role, User},
        inventory::{InventoryPartView, InventoryRequest, RequestPriority, RequestStatus},
    },
};

#[derive(Clone)]
pub struct InventoryService {
    repo: InventoryRepository,
    pool: PgPool,
}

impl InventoryService {
    pub fn new(repo: InventoryRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // --- PEÇAS ---

    pub async fn create_part(
        &self,
        name: &str,
        sku: Option<&str>,
        description: Option<&str>,
        stock_quantity: i32,
        min_stock_level: i32,
        max_stock_level: Option<i32>,
        unit_price: Option<Decimal>,
    ) -> Result<InventoryPartView, AppError> {
        let part = self
            .repo
            .create_part(
                name,
                sku,
                description,
                stock_quantity,
                min_stock_level,
                max_stock_level,
                unit_price,
            )
            .await?;
        Ok(part.into())
    }

    pub async fn list_parts(&self) -> Result<Vec<InventoryPartView>, AppError> {
        let parts = self.repo.list_parts().await?;
        Ok(parts.into_iter().map(Into::into).collect())
    }

    // Entrada ou correção manual de estoque. Delta negativo que deixaria o
    // saldo abaixo de zero é recusado.
    pub async fn adjust_stock(&self, id: Uuid, delta: i32) -> Result<InventoryPartView, AppError> {
        self.repo
            .find_part(id)
            .await?
            .ok_or(AppError::PartNotFound)?;

        let part = self
            .repo
            .adjust_stock(id, delta)
            .await?
            .ok_or(AppError::InsufficientStock)?;

        if part.stock_quantity <= part.min_stock_level {
            tracing::warn!("⚠️ Peça '{}' em nível crítico: {}", part.name, part.stock_quantity);
        }
        Ok(part.into())
    }

    // --- REQUISIÇÕES ---

    pub async fn create_request(
        &self,
        requester: &User,
        part_id: Uuid,
        quantity: i32,
        priority: RequestPriority,
        notes: Option<&str>,
    ) -> Result<InventoryRequest, AppError> {
        self.repo
            .find_part(part_id)
            .await?
            .ok_or(AppError::PartNotFound)?;

        self.repo
            .create_request(part_id, requester.id, quantity, priority, notes)
            .await
    }

    pub async fn list_requests(
        &self,
        status: Option<RequestStatus>,
        requester_id: Option<Uuid>,
    ) -> Result<Vec<InventoryRequest>, AppError> {
        self.repo.list_requests(status, requester_id).await
    }

    // Aprovação de um passo só: pending -> approved | rejected.
    pub async fn review_request(
        &self,
        id: Uuid,
        reviewer: &User,
        approve: bool,
    ) -> Result<InventoryRequest, AppError> {
        let request = self
            .repo
            .find_request(id)
            .await?
            .ok_or(AppError::RequestNotFound)?;

        if request.status != RequestStatus::Pending {
            return Err(AppError::RequestNotPending);
        }

        let new_status = if approve {
            RequestStatus::Approved
        } else {
            RequestStatus::Rejected
        };

        // O UPDATE exige o status de origem: se outra revisão passou na
        // frente, nenhuma linha é atingida.
        self.repo
            .update_request_status(
                &self.pool,
                id,
                RequestStatus::Pending,
                new_status,
                Some(reviewer.id),
                Some(Utc::now()),
            )
            .await?
            .ok_or(AppError::RequestNotPending)
    }

    // Atendimento: baixa o estoque e marca como fulfilled, atomicamente.
    pub async fn fulfill_request(&self, id: Uuid) -> Result<InventoryRequest, AppError> {
        let request = self
            .repo
            .find_request(id)
            .await?
            .ok_or(AppError::RequestNotFound)?;

        if request.status != RequestStatus::Approved {
            return Err(AppError::RequestNotApproved);
        }

        let mut tx = self.pool.begin().await?;

        self.repo
            .deduct_stock(&mut *tx, request.part_id, request.quantity)
            .await?
            .ok_or(AppError::InsufficientStock)?;

        // Se outro atendimento ganhou a corrida, o erro derruba a transação
        // e a baixa de estoque acima é desfeita junto.
        let fulfilled = self
            .repo
            .update_request_status(
                &mut *tx,
                id,
                RequestStatus::Approved,
                RequestStatus::Fulfilled,
                None,
                None,
            )
            .await?
            .ok_or(AppError::RequestNotApproved)?;

        tx.commit().await?;
        Ok(fulfilled)
    }

    // O solicitante (ou um admin) desiste enquanto ainda está pendente.
    pub async fn cancel_request(
        &self,
        id: Uuid,
        user: &User,
    ) -> Result<InventoryRequest, AppError> {
        let request = self
            .repo
            .find_request(id)
            .await?
            .ok_or(AppError::RequestNotFound)?;

        if request.status != RequestStatus::Pending {
            return Err(AppError::RequestNotPending);
        }
        if request.requester_id != user.id && user.role != Role::Admin {
            return Err(AppError::Forbidden);
        }

        self.repo
            .update_request_status(
                &self.pool,
                id,
                RequestStatus::Pending,
                RequestStatus::Cancelled,
                None,
                None,
            )
            .await?
            .ok_or(AppError::RequestNotPending)
    }
}
