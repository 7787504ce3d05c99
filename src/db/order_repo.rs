// src/db/order_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::orders::{OrderPriority, ServiceOrder},
};

const ORDER_COLUMNS: &str = "id, order_number, status, priority, client_id, technician_id, \
    receptionist_id, equipment_id, problem_description, diagnosis, solution, device_condition, \
    accessories, internal_notes, client_notes, estimated_cost, final_cost, advance_payment, \
    commission_total, received_date, estimated_completion, completed_date, delivered_date, \
    created_at, updated_at";

// Dados de inserção de uma ordem. O status nunca entra aqui: toda ordem
// nasce em `received`.
#[derive(Debug, Clone)]
pub struct NewServiceOrder {
    pub order_number: String,
    pub priority: OrderPriority,
    pub client_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub receptionist_id: Option<Uuid>,
    pub equipment_id: Option<Uuid>,
    pub problem_description: Option<String>,
    pub device_condition: Option<String>,
    pub accessories: Option<String>,
    pub client_notes: Option<String>,
    pub estimated_cost: Option<Decimal>,
    pub estimated_completion: Option<DateTime<Utc>>,
    pub received_date: DateTime<Utc>,
}

// Campos editáveis pela equipe fora do fluxo de status. Tudo opcional:
// o update é parcial e só grava o que veio no payload.
#[derive(Debug, Default, Clone)]
pub struct OrderFieldUpdates {
    pub priority: Option<OrderPriority>,
    pub problem_description: Option<String>,
    pub diagnosis: Option<String>,
    pub solution: Option<String>,
    pub device_condition: Option<String>,
    pub accessories: Option<String>,
    pub internal_notes: Option<String>,
    pub client_notes: Option<String>,
    pub estimated_cost: Option<Decimal>,
    pub final_cost: Option<Decimal>,
    pub advance_payment: Option<Decimal>,
    pub commission_total: Option<Decimal>,
    pub estimated_completion: Option<DateTime<Utc>>,
}

// Linha do detalhe: cabeçalho + nomes resolvidos nos joins.
#[derive(Debug, sqlx::FromRow)]
pub struct OrderDetailRow {
    #[sqlx(flatten)]
    pub order: ServiceOrder,
    pub client_name: Option<String>,
    pub technician_name: Option<String>,
    pub equipment_label: Option<String>,
}

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        data: &NewServiceOrder,
    ) -> Result<ServiceOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, ServiceOrder>(&format!(
            "INSERT INTO service_orders (
                order_number, status, priority, client_id, technician_id, receptionist_id,
                equipment_id, problem_description, device_condition, accessories, client_notes,
                estimated_cost, estimated_completion, received_date
             )
             VALUES ($1, 'received', $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&data.order_number)
        .bind(data.priority)
        .bind(data.client_id)
        .bind(data.technician_id)
        .bind(data.receptionist_id)
        .bind(data.equipment_id)
        .bind(data.problem_description.as_deref())
        .bind(data.device_condition.as_deref())
        .bind(data.accessories.as_deref())
        .bind(data.client_notes.as_deref())
        .bind(data.estimated_cost)
        .bind(data.estimated_completion)
        .bind(data.received_date)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ServiceOrder>, AppError> {
        let order = sqlx::query_as::<_, ServiceOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM service_orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn find_detail(&self, id: Uuid) -> Result<Option<OrderDetailRow>, AppError> {
        let row = sqlx::query_as::<_, OrderDetailRow>(
            "SELECT o.*,
                    c.full_name AS client_name,
                    t.full_name AS technician_name,
                    NULLIF(concat_ws(' ', e.equipment_type, e.brand, e.model), '') AS equipment_label
             FROM service_orders o
             LEFT JOIN clients c ON c.id = o.client_id
             LEFT JOIN users t ON t.id = o.technician_id
             LEFT JOIN equipments e ON e.id = o.equipment_id
             WHERE o.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list(
        &self,
        status: Option<&str>,
        technician_id: Option<Uuid>,
        client_id: Option<Uuid>,
    ) -> Result<Vec<ServiceOrder>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {ORDER_COLUMNS} FROM service_orders WHERE true"
        ));

        if let Some(status) = status {
            builder.push(" AND status = ").push_bind(status.to_string());
        }
        if let Some(technician_id) = technician_id {
            builder.push(" AND technician_id = ").push_bind(technician_id);
        }
        if let Some(client_id) = client_id {
            builder.push(" AND client_id = ").push_bind(client_id);
        }
        builder.push(" ORDER BY created_at DESC");

        let orders = builder
            .build_query_as::<ServiceOrder>()
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    // Update parcial dos campos editáveis; `updated_at` sempre avança.
    // Campos derivados/identidade (id, order_number, datas do ciclo) nunca
    // passam por aqui.
    pub async fn update_fields(
        &self,
        id: Uuid,
        updates: &OrderFieldUpdates,
    ) -> Result<Option<ServiceOrder>, AppError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE service_orders SET updated_at = now()");

        if let Some(priority) = updates.priority {
            builder.push(", priority = ").push_bind(priority);
        }
        if let Some(ref v) = updates.problem_description {
            builder.push(", problem_description = ").push_bind(v.clone());
        }
        if let Some(ref v) = updates.diagnosis {
            builder.push(", diagnosis = ").push_bind(v.clone());
        }
        if let Some(ref v) = updates.solution {
            builder.push(", solution = ").push_bind(v.clone());
        }
        if let Some(ref v) = updates.device_condition {
            builder.push(", device_condition = ").push_bind(v.clone());
        }
        if let Some(ref v) = updates.accessories {
            builder.push(", accessories = ").push_bind(v.clone());
        }
        if let Some(ref v) = updates.internal_notes {
            builder.push(", internal_notes = ").push_bind(v.clone());
        }
        if let Some(ref v) = updates.client_notes {
            builder.push(", client_notes = ").push_bind(v.clone());
        }
        if let Some(v) = updates.estimated_cost {
            builder.push(", estimated_cost = ").push_bind(v);
        }
        if let Some(v) = updates.final_cost {
            builder.push(", final_cost = ").push_bind(v);
        }
        if let Some(v) = updates.advance_payment {
            builder.push(", advance_payment = ").push_bind(v);
        }
        if let Some(v) = updates.commission_total {
            builder.push(", commission_total = ").push_bind(v);
        }
        if let Some(v) = updates.estimated_completion {
            builder.push(", estimated_completion = ").push_bind(v);
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(format!(" RETURNING {ORDER_COLUMNS}"));

        let order = builder
            .build_query_as::<ServiceOrder>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    // Persiste o resultado de uma transição: só as colunas que o motor de
    // ciclo de vida derivou, mais o updated_at.
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: &str,
        completed_date: Option<DateTime<Utc>>,
        delivered_date: Option<DateTime<Utc>>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ServiceOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, ServiceOrder>(&format!(
            "UPDATE service_orders
             SET status = $2, completed_date = $3, delivered_date = $4, updated_at = $5
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(completed_date)
        .bind(delivered_date)
        .bind(updated_at)
        .fetch_optional(executor)
        .await?;

        Ok(order)
    }

    pub async fn update_technician<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        technician_id: Option<Uuid>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ServiceOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, ServiceOrder>(&format!(
            "UPDATE service_orders SET technician_id = $2, updated_at = $3
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(technician_id)
        .bind(updated_at)
        .fetch_optional(executor)
        .await?;

        Ok(order)
    }

    pub async fn update_receptionist(
        &self,
        id: Uuid,
        receptionist_id: Option<Uuid>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ServiceOrder>, AppError> {
        let order = sqlx::query_as::<_, ServiceOrder>(&format!(
            "UPDATE service_orders SET receptionist_id = $2, updated_at = $3
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(receptionist_id)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM service_orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
