// src/models/clients.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Cliente da assistência. Pode (ou não) ter um login vinculado: quando um
// usuário se auto-registra, `profile_id` aponta para a conta dele; clientes
// cadastrados no balcão ficam sem vínculo até criarem conta.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub profile_id: Option<Uuid>,
    #[schema(example = "Maria Fernanda Souza")]
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Categorias usadas pelos painéis de "clientes recentes" do dashboard.
// Cada categoria vira um predicado sobre o snapshot de clientes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClientCategory {
    Total,
    Active,
    Inactive,
    WithOrders,
    NewThisMonth,
}
