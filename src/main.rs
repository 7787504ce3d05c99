//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/", post(handlers::auth::create_staff));

    let client_routes = Router::new()
        .route(
            "/",
            post(handlers::clients::create_client).get(handlers::clients::list_clients),
        )
        .route("/{id}", get(handlers::clients::get_client));

    let equipment_routes = Router::new()
        .route(
            "/",
            post(handlers::equipments::create_equipment).get(handlers::equipments::list_equipments),
        )
        .route(
            "/{id}/status",
            patch(handlers::equipments::update_equipment_status),
        );

    let order_routes = Router::new()
        .route(
            "/",
            post(handlers::orders::open_order).get(handlers::orders::list_orders),
        )
        .route("/request", post(handlers::orders::create_client_request))
        .route("/mine", get(handlers::orders::list_my_orders))
        .route(
            "/{id}",
            get(handlers::orders::get_order)
                .patch(handlers::orders::update_order)
                .delete(handlers::orders::delete_order),
        )
        .route("/{id}/status", patch(handlers::orders::transition_order))
        .route("/{id}/technician", patch(handlers::orders::assign_technician))
        .route(
            "/{id}/receptionist",
            patch(handlers::orders::assign_receptionist),
        );

    let inventory_routes = Router::new()
        .route(
            "/parts",
            post(handlers::inventory::create_part).get(handlers::inventory::list_parts),
        )
        .route("/parts/{id}/stock", patch(handlers::inventory::adjust_stock))
        .route(
            "/requests",
            post(handlers::inventory::create_request).get(handlers::inventory::list_requests),
        )
        .route(
            "/requests/{id}/review",
            patch(handlers::inventory::review_request),
        )
        .route(
            "/requests/{id}/fulfill",
            patch(handlers::inventory::fulfill_request),
        )
        .route(
            "/requests/{id}/cancel",
            patch(handlers::inventory::cancel_request),
        );

    let notification_routes = Router::new()
        .route("/", get(handlers::notifications::list_notifications))
        .route(
            "/{id}/read",
            patch(handlers::notifications::mark_notification_read),
        );

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .route("/recent-orders", get(handlers::dashboard::get_recent_orders))
        .route(
            "/recent-clients",
            get(handlers::dashboard::get_recent_clients),
        )
        .route(
            "/technician-load",
            get(handlers::dashboard::get_technician_load),
        );

    // Tudo que não é login/registro passa pelo auth_guard.
    let protected_routes = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/clients", client_routes)
        .nest("/api/equipments", equipment_routes)
        .nest("/api/orders", order_routes)
        .nest("/api/inventory", inventory_routes)
        .nest("/api/notifications", notification_routes)
        .nest("/api/dashboard", dashboard_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
