// src/services/dashboard_service.rs
//
// Busca um snapshot das linhas e delega toda a conta ao agregador puro
// (services/stats.rs). Cada painel fornece apenas o predicado da categoria.

use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DashboardRepository, UserRepository},
    models::{
        auth::Role,
        clients::{Client, ClientCategory},
        dashboard::{DashboardSummary, TechnicianLoadEntry},
        orders::ServiceOrder,
    },
    services::stats,
};

const RECENT_PANEL_SIZE: usize = 5;

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    user_repo: UserRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, user_repo: UserRepository) -> Self {
        Self { repo, user_repo }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, AppError> {
        let orders = self.repo.fetch_orders_snapshot().await?;
        let now = Utc::now();

        Ok(DashboardSummary {
            total_orders: orders.len(),
            active_orders: stats::count_active(&orders),
            in_progress_orders: stats::count_in_progress(&orders),
            new_this_month: stats::count_new_in_month(&orders, now),
            by_status: stats::count_by_status(&orders),
            completed_revenue: stats::completed_revenue(&orders),
            pending_balance: stats::pending_balance(&orders),
            average_resolution_days: stats::average_resolution_days(&orders),
        })
    }

    // As 5 ordens mais recentes, opcionalmente filtradas por status.
    pub async fn recent_orders(
        &self,
        status: Option<String>,
    ) -> Result<Vec<ServiceOrder>, AppError> {
        let orders = self.repo.fetch_orders_snapshot().await?;

        let top = stats::top_n_by_recency(
            &orders,
            |o| status.as_deref().is_none_or(|s| o.status == s),
            |o| o.created_at,
            RECENT_PANEL_SIZE,
        );

        Ok(top.into_iter().cloned().collect())
    }

    pub async fn recent_clients(
        &self,
        category: ClientCategory,
    ) -> Result<Vec<Client>, AppError> {
        let clients = self.repo.fetch_clients_snapshot().await?;
        let with_orders = self.repo.client_ids_with_orders().await?;
        let now = Utc::now();

        let top = stats::top_n_by_recency(
            &clients,
            |c| match category {
                ClientCategory::Total => true,
                ClientCategory::Active => c.is_active,
                ClientCategory::Inactive => !c.is_active,
                ClientCategory::WithOrders => with_orders.contains(&c.id),
                ClientCategory::NewThisMonth => {
                    c.created_at.month() == now.month() && c.created_at.year() == now.year()
                }
            },
            |c| c.created_at,
            RECENT_PANEL_SIZE,
        );

        Ok(top.into_iter().cloned().collect())
    }

    // Carga por técnico, incluindo o balde "não atribuído".
    pub async fn technician_load(&self) -> Result<Vec<TechnicianLoadEntry>, AppError> {
        let orders = self.repo.fetch_orders_snapshot().await?;
        let technicians = self.user_repo.list_by_role(Role::Technician).await?;
        let totals = stats::count_by_technician(&orders);

        let active_for = |technician_id: Option<Uuid>| {
            orders
                .iter()
                .filter(|o| o.technician_id == technician_id && stats::is_active_status(&o.status))
                .count()
        };

        let mut entries: Vec<TechnicianLoadEntry> = technicians
            .into_iter()
            .map(|tech| TechnicianLoadEntry {
                total_orders: totals.get(&Some(tech.id)).copied().unwrap_or(0),
                active_orders: active_for(Some(tech.id)),
                technician_id: Some(tech.id),
                technician_name: tech.full_name,
            })
            .collect();

        // Ausência de técnico não é erro: vira uma linha exibível.
        let unassigned_total = totals.get(&None).copied().unwrap_or(0);
        if unassigned_total > 0 {
            entries.push(TechnicianLoadEntry {
                technician_id: None,
                technician_name: "Não atribuído".to_string(),
                total_orders: unassigned_total,
                active_orders: active_for(None),
            });
        }

        Ok(entries)
    }
}
