// src/handlers/orders.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    db::order_repo::OrderFieldUpdates,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{AdminOnly, ClientOnly, ReceptionOnly, RequireRole, StaffOnly},
    },
    models::orders::{OrderPriority, OrderStatus, ServiceOrder, ServiceOrderDetail},
    services::order_service::{ClientRequestInput, OpenOrderInput},
};

// ---
// Validação customizada
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn default_priority() -> OrderPriority {
    OrderPriority::Medium
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrderPayload {
    pub client_id: Option<Uuid>,
    pub equipment_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,

    #[serde(default = "default_priority")]
    #[schema(example = "medium")]
    pub priority: OrderPriority,

    #[schema(example = "Notebook não liga")]
    pub problem_description: Option<String>,
    pub device_condition: Option<String>,
    pub accessories: Option<String>,
    pub client_notes: Option<String>,

    #[validate(custom(function = validate_not_negative))]
    #[serde(default)]
    pub estimated_cost: Option<Decimal>,
    pub estimated_completion: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_client_request))]
pub struct ClientRequestPayload {
    // Ou um equipamento já cadastrado...
    pub equipment_id: Option<Uuid>,

    // ...ou os dados para cadastrar um novo na hora.
    #[schema(example = "impressora")]
    pub equipment_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,

    #[validate(length(min = 1, message = "Descreva o problema."))]
    pub problem_description: String,
    pub accessories: Option<String>,
    pub client_notes: Option<String>,
}

// Regra: a solicitação precisa apontar um aparelho existente ou trazer
// ao menos o tipo do aparelho novo.
fn validate_client_request(payload: &ClientRequestPayload) -> Result<(), ValidationError> {
    if payload.equipment_id.is_none() && payload.equipment_type.is_none() {
        let mut err = ValidationError::new("equipment_required");
        err.message =
            Some("Informe um equipamento cadastrado ou o tipo do aparelho novo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct OrderFilter {
    pub status: Option<String>,
    pub technician_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderPayload {
    pub priority: Option<OrderPriority>,
    pub problem_description: Option<String>,
    pub diagnosis: Option<String>,
    pub solution: Option<String>,
    pub device_condition: Option<String>,
    pub accessories: Option<String>,
    pub internal_notes: Option<String>,
    pub client_notes: Option<String>,

    #[validate(custom(function = validate_not_negative))]
    pub estimated_cost: Option<Decimal>,
    #[validate(custom(function = validate_not_negative))]
    pub final_cost: Option<Decimal>,
    #[validate(custom(function = validate_not_negative))]
    pub advance_payment: Option<Decimal>,
    #[validate(custom(function = validate_not_negative))]
    pub commission_total: Option<Decimal>,

    pub estimated_completion: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPayload {
    // A desserialização já garante que o status é um dos oito do vocabulário.
    #[schema(example = "diagnosis")]
    pub new_status: OrderStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignTechnicianPayload {
    // `null` remove a designação.
    pub technician_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignReceptionistPayload {
    pub receptionist_id: Option<Uuid>,
}

// ---
// Handlers
// ---

// POST /api/orders
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = OpenOrderPayload,
    responses(
        (status = 201, description = "Ordem aberta com status `received`", body = ServiceOrder)
    ),
    security(("api_jwt" = []))
)]
pub async fn open_order(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ReceptionOnly>,
    Json(payload): Json<OpenOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let order = app_state
        .order_service
        .open_order(
            &user.0,
            OpenOrderInput {
                client_id: payload.client_id,
                equipment_id: payload.equipment_id,
                technician_id: payload.technician_id,
                priority: payload.priority,
                problem_description: payload.problem_description,
                device_condition: payload.device_condition,
                accessories: payload.accessories,
                client_notes: payload.client_notes,
                estimated_cost: payload.estimated_cost,
                estimated_completion: payload.estimated_completion,
            },
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(order)))
}

// POST /api/orders/request (assistente do cliente)
#[utoipa::path(
    post,
    path = "/api/orders/request",
    tag = "Orders",
    request_body = ClientRequestPayload,
    responses(
        (status = 201, description = "Solicitação registrada", body = ServiceOrder)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client_request(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ClientOnly>,
    Json(payload): Json<ClientRequestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let order = app_state
        .order_service
        .open_client_request(
            &user.0,
            ClientRequestInput {
                equipment_id: payload.equipment_id,
                equipment_type: payload.equipment_type,
                brand: payload.brand,
                model: payload.model,
                serial_number: payload.serial_number,
                problem_description: payload.problem_description,
                accessories: payload.accessories,
                client_notes: payload.client_notes,
            },
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(order)))
}

// GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    params(
        ("status" = Option<String>, Query, description = "Filtra por status"),
        ("technician_id" = Option<Uuid>, Query, description = "Filtra por técnico"),
        ("client_id" = Option<Uuid>, Query, description = "Filtra por cliente")
    ),
    responses(
        (status = 200, description = "Ordens de serviço", body = Vec<ServiceOrder>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<ServiceOrder>>, ApiError> {
    let orders = app_state
        .order_service
        .list(filter.status.as_deref(), filter.technician_id, filter.client_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(orders))
}

// GET /api/orders/mine (visão do cliente)
#[utoipa::path(
    get,
    path = "/api/orders/mine",
    tag = "Orders",
    responses(
        (status = 200, description = "Ordens do cliente autenticado", body = Vec<ServiceOrder>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<ClientOnly>,
) -> Result<Json<Vec<ServiceOrder>>, ApiError> {
    let orders = app_state
        .order_service
        .list_for_client_user(&user.0)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(orders))
}

// GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 200, description = "Detalhe com os próximos status permitidos", body = ServiceOrderDetail),
        (status = 404, description = "Ordem não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceOrderDetail>, ApiError> {
    let detail = app_state
        .order_service
        .get_detail(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(detail))
}

// PATCH /api/orders/{id}
#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    request_body = UpdateOrderPayload,
    responses(
        (status = 200, description = "Campos atualizados", body = ServiceOrder),
        (status = 404, description = "Ordem não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderPayload>,
) -> Result<Json<ServiceOrder>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let updates = OrderFieldUpdates {
        priority: payload.priority,
        problem_description: payload.problem_description,
        diagnosis: payload.diagnosis,
        solution: payload.solution,
        device_condition: payload.device_condition,
        accessories: payload.accessories,
        internal_notes: payload.internal_notes,
        client_notes: payload.client_notes,
        estimated_cost: payload.estimated_cost,
        final_cost: payload.final_cost,
        advance_payment: payload.advance_payment,
        commission_total: payload.commission_total,
        estimated_completion: payload.estimated_completion,
    };

    let order = app_state
        .order_service
        .update_fields(id, &updates)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(order))
}

// PATCH /api/orders/{id}/status
#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    request_body = TransitionPayload,
    responses(
        (status = 200, description = "Transição aplicada", body = ServiceOrder),
        (status = 409, description = "Estado terminal não aceita transição")
    ),
    security(("api_jwt" = []))
)]
pub async fn transition_order(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionPayload>,
) -> Result<Json<ServiceOrder>, ApiError> {
    let order = app_state
        .order_service
        .transition(id, payload.new_status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(order))
}

// PATCH /api/orders/{id}/technician
#[utoipa::path(
    patch,
    path = "/api/orders/{id}/technician",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    request_body = AssignTechnicianPayload,
    responses(
        (status = 200, description = "Técnico designado (não muda o status)", body = ServiceOrder)
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_technician(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<ReceptionOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignTechnicianPayload>,
) -> Result<Json<ServiceOrder>, ApiError> {
    let order = app_state
        .order_service
        .assign_technician(id, payload.technician_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(order))
}

// PATCH /api/orders/{id}/receptionist
#[utoipa::path(
    patch,
    path = "/api/orders/{id}/receptionist",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    request_body = AssignReceptionistPayload,
    responses(
        (status = 200, description = "Recepcionista designado", body = ServiceOrder)
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_receptionist(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<ReceptionOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignReceptionistPayload>,
) -> Result<Json<ServiceOrder>, ApiError> {
    let order = app_state
        .order_service
        .assign_receptionist(id, payload.receptionist_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(order))
}

// DELETE /api/orders/{id}
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 204, description = "Ordem excluída"),
        (status = 409, description = "Apenas ordens canceladas podem ser excluídas")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .order_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
