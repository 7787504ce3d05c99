// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::create_staff,

        // --- Clients ---
        handlers::clients::create_client,
        handlers::clients::list_clients,
        handlers::clients::get_client,

        // --- Equipments ---
        handlers::equipments::create_equipment,
        handlers::equipments::list_equipments,
        handlers::equipments::update_equipment_status,

        // --- ORDERS ---
        handlers::orders::open_order,
        handlers::orders::create_client_request,
        handlers::orders::list_orders,
        handlers::orders::list_my_orders,
        handlers::orders::get_order,
        handlers::orders::update_order,
        handlers::orders::transition_order,
        handlers::orders::assign_technician,
        handlers::orders::assign_receptionist,
        handlers::orders::delete_order,

        // --- INVENTORY ---
        handlers::inventory::create_part,
        handlers::inventory::list_parts,
        handlers::inventory::adjust_stock,
        handlers::inventory::create_request,
        handlers::inventory::list_requests,
        handlers::inventory::review_request,
        handlers::inventory::fulfill_request,
        handlers::inventory::cancel_request,

        // --- Notifications ---
        handlers::notifications::list_notifications,
        handlers::notifications::mark_notification_read,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_recent_orders,
        handlers::dashboard::get_recent_clients,
        handlers::dashboard::get_technician_load,
    ),
    components(
        schemas(

            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::CreateStaffPayload,
            models::auth::AuthResponse,

            // --- Clients ---
            models::clients::Client,
            handlers::clients::CreateClientPayload,

            // --- Equipments ---
            models::equipments::EquipmentStatus,
            models::equipments::Equipment,
            handlers::equipments::CreateEquipmentPayload,
            handlers::equipments::UpdateEquipmentStatusPayload,

            // --- Orders ---
            models::orders::OrderStatus,
            models::orders::OrderPriority,
            models::orders::ServiceOrder,
            models::orders::ServiceOrderDetail,
            handlers::orders::OpenOrderPayload,
            handlers::orders::ClientRequestPayload,
            handlers::orders::UpdateOrderPayload,
            handlers::orders::TransitionPayload,
            handlers::orders::AssignTechnicianPayload,
            handlers::orders::AssignReceptionistPayload,

            // --- Inventory ---
            models::inventory::InventoryPart,
            models::inventory::StockAvailability,
            models::inventory::InventoryPartView,
            models::inventory::RequestStatus,
            models::inventory::RequestPriority,
            models::inventory::InventoryRequest,
            handlers::inventory::CreatePartPayload,
            handlers::inventory::AdjustStockPayload,
            handlers::inventory::CreateRequestPayload,
            handlers::inventory::ReviewRequestPayload,

            // --- Notifications ---
            models::notifications::Notification,

            // --- DASHBOARD ---
            models::dashboard::DashboardSummary,
            models::dashboard::TechnicianLoadEntry,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Contas da Equipe"),
        (name = "Clients", description = "Cadastro de Clientes"),
        (name = "Equipments", description = "Aparelhos dos Clientes"),
        (name = "Orders", description = "Ordens de Serviço e Ciclo de Vida"),
        (name = "Inventory", description = "Peças e Requisições de Estoque"),
        (name = "Notifications", description = "Notificações do Usuário"),
        (name = "Dashboard", description = "Indicadores Gerenciais da Oficina")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
