// src/db/equipment_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::equipments::{Equipment, EquipmentStatus},
};

const EQUIPMENT_COLUMNS: &str = "id, client_id, equipment_type, brand, model, serial_number, \
                                 status, notes, created_at, updated_at";

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: PgPool,
}

impl EquipmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Aceita executor: o assistente do cliente cria equipamento + ordem na
    // mesma transação.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        equipment_type: &str,
        brand: Option<&str>,
        model: Option<&str>,
        serial_number: &str,
        notes: Option<&str>,
    ) -> Result<Equipment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let equipment = sqlx::query_as::<_, Equipment>(&format!(
            "INSERT INTO equipments (client_id, equipment_type, brand, model, serial_number, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {EQUIPMENT_COLUMNS}"
        ))
        .bind(client_id)
        .bind(equipment_type)
        .bind(brand)
        .bind(model)
        .bind(serial_number)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(equipment)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Equipment>, AppError> {
        let equipment = sqlx::query_as::<_, Equipment>(&format!(
            "SELECT {EQUIPMENT_COLUMNS} FROM equipments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(equipment)
    }

    pub async fn list(&self, client_id: Option<Uuid>) -> Result<Vec<Equipment>, AppError> {
        let equipments = match client_id {
            Some(client_id) => {
                sqlx::query_as::<_, Equipment>(&format!(
                    "SELECT {EQUIPMENT_COLUMNS} FROM equipments
                     WHERE client_id = $1 ORDER BY created_at DESC"
                ))
                .bind(client_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Equipment>(&format!(
                    "SELECT {EQUIPMENT_COLUMNS} FROM equipments ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(equipments)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: EquipmentStatus,
    ) -> Result<Option<Equipment>, AppError> {
        let equipment = sqlx::query_as::<_, Equipment>(&format!(
            "UPDATE equipments SET status = $2, updated_at = now()
             WHERE id = $1
             RETURNING {EQUIPMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(equipment)
    }
}
