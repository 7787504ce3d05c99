// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        ClientRepository, DashboardRepository, EquipmentRepository, InventoryRepository,
        NotificationRepository, OrderRepository, UserRepository,
    },
    services::{
        auth::AuthService, dashboard_service::DashboardService,
        inventory_service::InventoryService, order_service::OrderService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub order_service: OrderService,
    pub inventory_service: InventoryService,
    pub dashboard_service: DashboardService,
    pub client_repo: ClientRepository,
    pub equipment_repo: EquipmentRepository,
    pub notification_repo: NotificationRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let client_repo = ClientRepository::new(db_pool.clone());
        let equipment_repo = EquipmentRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());
        let notification_repo = NotificationRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            client_repo.clone(),
            jwt_secret.clone(),
            db_pool.clone(),
        );
        let order_service = OrderService::new(
            order_repo,
            client_repo.clone(),
            equipment_repo.clone(),
            user_repo.clone(),
            notification_repo.clone(),
            db_pool.clone(),
        );
        let inventory_service = InventoryService::new(inventory_repo, db_pool.clone());
        let dashboard_service = DashboardService::new(dashboard_repo, user_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            order_service,
            inventory_service,
            dashboard_service,
            client_repo,
            equipment_repo,
            notification_repo,
        })
    }
}
