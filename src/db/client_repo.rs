// src/db/client_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::clients::Client};

const CLIENT_COLUMNS: &str =
    "id, profile_id, full_name, email, phone, address, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Cadastro de cliente. Aceita executor: o auto-registro cria usuário e
    // cliente na mesma transação.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        profile_id: Option<Uuid>,
        full_name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(&format!(
            "INSERT INTO clients (profile_id, full_name, email, phone, address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(profile_id)
        .bind(full_name)
        .bind(email)
        .bind(phone)
        .bind(address)
        .fetch_one(executor)
        .await?;

        Ok(client)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    // O cliente logado enxerga o próprio cadastro através do vínculo com a conta.
    pub async fn find_by_profile(&self, profile_id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE profile_id = $1"
        ))
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    pub async fn list(&self) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }
}
