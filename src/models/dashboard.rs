// src/models/dashboard.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// Cards do topo do dashboard. Tudo aqui é derivado de um snapshot das
// ordens em memória (services/stats.rs), nunca calculado em SQL espalhado.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_orders: usize,
    pub active_orders: usize,
    pub in_progress_orders: usize,
    pub new_this_month: usize,
    // Contagem por status bruto; status desconhecidos mantêm balde próprio.
    pub by_status: BTreeMap<String, usize>,
    #[schema(example = "12500.00")]
    pub completed_revenue: Decimal,
    pub pending_balance: Decimal,
    pub average_resolution_days: i64,
}

// Carga de trabalho por técnico. `technician_id = null` é o balde
// "não atribuído". Ausência de técnico não é erro, é um estado exibível.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianLoadEntry {
    pub technician_id: Option<Uuid>,
    #[schema(example = "Carlos Lima")]
    pub technician_name: String,
    pub total_orders: usize,
    pub active_orders: usize,
}
