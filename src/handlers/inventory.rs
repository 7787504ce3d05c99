// src/handlers/inventory.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{AdminOnly, RequireRole, StaffOnly},
    },
    models::inventory::{InventoryPartView, InventoryRequest, RequestPriority, RequestStatus},
};

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn default_request_priority() -> RequestPriority {
    RequestPriority::Normal
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartPayload {
    #[validate(length(min = 1, message = "O nome da peça é obrigatório."))]
    #[schema(example = "Tela LCD 15.6\"")]
    pub name: String,

    pub sku: Option<String>,
    pub description: Option<String>,

    #[validate(range(min = 0, message = "O estoque inicial não pode ser negativo."))]
    #[serde(default)]
    pub stock_quantity: i32,

    #[validate(range(min = 0, message = "O nível mínimo não pode ser negativo."))]
    #[serde(default)]
    pub min_stock_level: i32,

    pub max_stock_level: Option<i32>,

    #[validate(custom(function = validate_not_negative))]
    #[serde(default)]
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockPayload {
    // Positivo repõe, negativo corrige. O saldo nunca fica abaixo de zero.
    #[schema(example = 5)]
    pub delta: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestPayload {
    pub part_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser ao menos 1."))]
    pub quantity: i32,

    #[serde(default = "default_request_priority")]
    #[schema(example = "normal")]
    pub priority: RequestPriority,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub requester_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequestPayload {
    pub approve: bool,
}

// ---
// Handlers: peças
// ---

// POST /api/inventory/parts
#[utoipa::path(
    post,
    path = "/api/inventory/parts",
    tag = "Inventory",
    request_body = CreatePartPayload,
    responses(
        (status = 201, description = "Peça cadastrada", body = InventoryPartView)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_part(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    Json(payload): Json<CreatePartPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let part = app_state
        .inventory_service
        .create_part(
            &payload.name,
            payload.sku.as_deref(),
            payload.description.as_deref(),
            payload.stock_quantity,
            payload.min_stock_level,
            payload.max_stock_level,
            payload.unit_price,
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(part)))
}

// GET /api/inventory/parts
#[utoipa::path(
    get,
    path = "/api/inventory/parts",
    tag = "Inventory",
    responses(
        (status = 200, description = "Peças com o rótulo de disponibilidade", body = Vec<InventoryPartView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_parts(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
) -> Result<Json<Vec<InventoryPartView>>, ApiError> {
    let parts = app_state
        .inventory_service
        .list_parts()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(parts))
}

// PATCH /api/inventory/parts/{id}/stock
#[utoipa::path(
    patch,
    path = "/api/inventory/parts/{id}/stock",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID da peça")),
    request_body = AdjustStockPayload,
    responses(
        (status = 200, description = "Estoque ajustado", body = InventoryPartView),
        (status = 409, description = "Estoque insuficiente para o ajuste")
    ),
    security(("api_jwt" = []))
)]
pub async fn adjust_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjustStockPayload>,
) -> Result<Json<InventoryPartView>, ApiError> {
    let part = app_state
        .inventory_service
        .adjust_stock(id, payload.delta)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(part))
}

// ---
// Handlers: requisições
// ---

// POST /api/inventory/requests
#[utoipa::path(
    post,
    path = "/api/inventory/requests",
    tag = "Inventory",
    request_body = CreateRequestPayload,
    responses(
        (status = 201, description = "Requisição aberta como `pending`", body = InventoryRequest),
        (status = 404, description = "Peça não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_request(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<StaffOnly>,
    Json(payload): Json<CreateRequestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let request = app_state
        .inventory_service
        .create_request(
            &user.0,
            payload.part_id,
            payload.quantity,
            payload.priority,
            payload.notes.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(request)))
}

// GET /api/inventory/requests
#[utoipa::path(
    get,
    path = "/api/inventory/requests",
    tag = "Inventory",
    params(
        ("status" = Option<String>, Query, description = "Filtra por status"),
        ("requester_id" = Option<Uuid>, Query, description = "Filtra por solicitante")
    ),
    responses(
        (status = 200, description = "Requisições de peças", body = Vec<InventoryRequest>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_requests(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    Query(filter): Query<RequestFilter>,
) -> Result<Json<Vec<InventoryRequest>>, ApiError> {
    let requests = app_state
        .inventory_service
        .list_requests(filter.status, filter.requester_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(requests))
}

// PATCH /api/inventory/requests/{id}/review
#[utoipa::path(
    patch,
    path = "/api/inventory/requests/{id}/review",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID da requisição")),
    request_body = ReviewRequestPayload,
    responses(
        (status = 200, description = "Requisição aprovada ou rejeitada", body = InventoryRequest),
        (status = 409, description = "Requisição não está pendente")
    ),
    security(("api_jwt" = []))
)]
pub async fn review_request(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequestPayload>,
) -> Result<Json<InventoryRequest>, ApiError> {
    let request = app_state
        .inventory_service
        .review_request(id, &user.0, payload.approve)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(request))
}

// PATCH /api/inventory/requests/{id}/fulfill
#[utoipa::path(
    patch,
    path = "/api/inventory/requests/{id}/fulfill",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID da requisição")),
    responses(
        (status = 200, description = "Estoque baixado e requisição atendida", body = InventoryRequest),
        (status = 409, description = "Requisição não aprovada ou estoque insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn fulfill_request(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<Json<InventoryRequest>, ApiError> {
    let request = app_state
        .inventory_service
        .fulfill_request(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(request))
}

// PATCH /api/inventory/requests/{id}/cancel
#[utoipa::path(
    patch,
    path = "/api/inventory/requests/{id}/cancel",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID da requisição")),
    responses(
        (status = 200, description = "Requisição cancelada pelo solicitante", body = InventoryRequest),
        (status = 403, description = "Apenas o solicitante ou um admin pode cancelar")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_request(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireRole<StaffOnly>,
    Path(id): Path<Uuid>,
) -> Result<Json<InventoryRequest>, ApiError> {
    let request = app_state
        .inventory_service
        .cancel_request(id, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(request))
}
