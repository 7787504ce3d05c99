// src/db/inventory_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{InventoryPart, InventoryRequest, RequestPriority, RequestStatus},
};

const PART_COLUMNS: &str = "id, name, sku, description, stock_quantity, min_stock_level, \
                            max_stock_level, unit_price, created_at, updated_at";

const REQUEST_COLUMNS: &str = "id, part_id, requester_id, quantity, status, priority, notes, \
                               reviewed_by, reviewed_at, created_at, updated_at";

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
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
    ) -> Result<InventoryPart, AppError> {
        let part = sqlx::query_as::<_, InventoryPart>(&format!(
            "INSERT INTO inventory_parts
                (name, sku, description, stock_quantity, min_stock_level, max_stock_level, unit_price)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {PART_COLUMNS}"
        ))
        .bind(name)
        .bind(sku)
        .bind(description)
        .bind(stock_quantity)
        .bind(min_stock_level)
        .bind(max_stock_level)
        .bind(unit_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(part)
    }

    pub async fn find_part(&self, id: Uuid) -> Result<Option<InventoryPart>, AppError> {
        let part = sqlx::query_as::<_, InventoryPart>(&format!(
            "SELECT {PART_COLUMNS} FROM inventory_parts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(part)
    }

    pub async fn list_parts(&self) -> Result<Vec<InventoryPart>, AppError> {
        let parts = sqlx::query_as::<_, InventoryPart>(&format!(
            "SELECT {PART_COLUMNS} FROM inventory_parts ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(parts)
    }

    // Ajuste manual de estoque (entrada ou correção). O CHECK no banco
    // impede saldo negativo; aqui devolvemos None quando a linha não existe.
    pub async fn adjust_stock(
        &self,
        id: Uuid,
        delta: i32,
    ) -> Result<Option<InventoryPart>, AppError> {
        let part = sqlx::query_as::<_, InventoryPart>(&format!(
            "UPDATE inventory_parts
             SET stock_quantity = stock_quantity + $2, updated_at = now()
             WHERE id = $1 AND stock_quantity + $2 >= 0
             RETURNING {PART_COLUMNS}"
        ))
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        Ok(part)
    }

    // Baixa condicionada ao saldo: se não houver estoque suficiente a query
    // não atinge nenhuma linha e o serviço converte em InsufficientStock.
    pub async fn deduct_stock<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        quantity: i32,
    ) -> Result<Option<InventoryPart>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let part = sqlx::query_as::<_, InventoryPart>(&format!(
            "UPDATE inventory_parts
             SET stock_quantity = stock_quantity - $2, updated_at = now()
             WHERE id = $1 AND stock_quantity >= $2
             RETURNING {PART_COLUMNS}"
        ))
        .bind(id)
        .bind(quantity)
        .fetch_optional(executor)
        .await?;

        Ok(part)
    }

    // --- REQUISIÇÕES ---

    pub async fn create_request(
        &self,
        part_id: Uuid,
        requester_id: Uuid,
        quantity: i32,
        priority: RequestPriority,
        notes: Option<&str>,
    ) -> Result<InventoryRequest, AppError> {
        let request = sqlx::query_as::<_, InventoryRequest>(&format!(
            "INSERT INTO inventory_requests (part_id, requester_id, quantity, priority, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(part_id)
        .bind(requester_id)
        .bind(quantity)
        .bind(priority)
        .bind(notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn find_request(&self, id: Uuid) -> Result<Option<InventoryRequest>, AppError> {
        let request = sqlx::query_as::<_, InventoryRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM inventory_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn list_requests(
        &self,
        status: Option<RequestStatus>,
        requester_id: Option<Uuid>,
    ) -> Result<Vec<InventoryRequest>, AppError> {
        let mut builder: sqlx::QueryBuilder<Postgres> = sqlx::QueryBuilder::new(format!(
            "SELECT {REQUEST_COLUMNS} FROM inventory_requests WHERE true"
        ));

        if let Some(status) = status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(requester_id) = requester_id {
            builder.push(" AND requester_id = ").push_bind(requester_id);
        }
        builder.push(" ORDER BY created_at DESC");

        let requests = builder
            .build_query_as::<InventoryRequest>()
            .fetch_all(&self.pool)
            .await?;

        Ok(requests)
    }

    // O WHERE carrega o status esperado: a troca de estado só acontece se a
    // requisição ainda estiver na etapa de origem. Duas revisões (ou dois
    // atendimentos) concorrentes nunca passam as duas.
    pub async fn update_request_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        expected: RequestStatus,
        status: RequestStatus,
        reviewed_by: Option<Uuid>,
        reviewed_at: Option<DateTime<Utc>>,
    ) -> Result<Option<InventoryRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, InventoryRequest>(&format!(
            "UPDATE inventory_requests
             SET status = $3,
                 reviewed_by = COALESCE($4, reviewed_by),
                 reviewed_at = COALESCE($5, reviewed_at),
                 updated_at = now()
             WHERE id = $1 AND status = $2
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(id)
        .bind(expected)
        .bind(status)
        .bind(reviewed_by)
        .bind(reviewed_at)
        .fetch_optional(executor)
        .await?;

        Ok(request)
    }
}
