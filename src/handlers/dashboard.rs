// src/handlers/dashboard.rs

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{RequireRole, StaffOnly},
    },
    models::{
        clients::{Client, ClientCategory},
        dashboard::{DashboardSummary, TechnicianLoadEntry},
        orders::ServiceOrder,
    },
};

#[derive(Debug, Deserialize)]
pub struct RecentOrdersFilter {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecentClientsFilter {
    pub category: Option<ClientCategory>,
}

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Contadores e totais financeiros da oficina", body = DashboardSummary)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = app_state
        .dashboard_service
        .summary()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(summary))
}

// GET /api/dashboard/recent-orders
#[utoipa::path(
    get,
    path = "/api/dashboard/recent-orders",
    tag = "Dashboard",
    params(("status" = Option<String>, Query, description = "Filtra o painel por status")),
    responses(
        (status = 200, description = "As 5 ordens mais recentes", body = Vec<ServiceOrder>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_recent_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    Query(filter): Query<RecentOrdersFilter>,
) -> Result<Json<Vec<ServiceOrder>>, ApiError> {
    let orders = app_state
        .dashboard_service
        .recent_orders(filter.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(orders))
}

// GET /api/dashboard/recent-clients?category=...
#[utoipa::path(
    get,
    path = "/api/dashboard/recent-clients",
    tag = "Dashboard",
    params(("category" = Option<String>, Query, description = "total | active | inactive | with_orders | new_this_month")),
    responses(
        (status = 200, description = "Os 5 clientes mais recentes da categoria", body = Vec<Client>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_recent_clients(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    Query(filter): Query<RecentClientsFilter>,
) -> Result<Json<Vec<Client>>, ApiError> {
    let category = filter.category.unwrap_or(ClientCategory::Total);

    let clients = app_state
        .dashboard_service
        .recent_clients(category)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(clients))
}

// GET /api/dashboard/technician-load
#[utoipa::path(
    get,
    path = "/api/dashboard/technician-load",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Ordens totais e ativas por técnico", body = Vec<TechnicianLoadEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_technician_load(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
) -> Result<Json<Vec<TechnicianLoadEntry>>, ApiError> {
    let entries = app_state
        .dashboard_service
        .technician_load()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(entries))
}
