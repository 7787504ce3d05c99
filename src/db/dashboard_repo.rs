// src/db/dashboard_repo.rs

use std::collections::HashSet;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{clients::Client, orders::ServiceOrder},
};

// O dashboard trabalha sobre snapshots: busca as linhas cruas e deixa toda a
// agregação para services/stats.rs. Nada de SUM/COUNT espalhado em SQL por
// página. A conta é uma só e é testável sem banco.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn fetch_orders_snapshot(&self) -> Result<Vec<ServiceOrder>, AppError> {
        let orders = sqlx::query_as::<_, ServiceOrder>(
            "SELECT id, order_number, status, priority, client_id, technician_id,
                    receptionist_id, equipment_id, problem_description, diagnosis, solution,
                    device_condition, accessories, internal_notes, client_notes, estimated_cost,
                    final_cost, advance_payment, commission_total, received_date,
                    estimated_completion, completed_date, delivered_date, created_at, updated_at
             FROM service_orders",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    pub async fn fetch_clients_snapshot(&self) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT id, profile_id, full_name, email, phone, address, is_active,
                    created_at, updated_at
             FROM clients",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    // Conjunto de clientes que já abriram alguma ordem (categoria
    // "withOrders" do painel de clientes recentes).
    pub async fn client_ids_with_orders(&self) -> Result<HashSet<Uuid>, AppError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT DISTINCT client_id FROM service_orders WHERE client_id IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
