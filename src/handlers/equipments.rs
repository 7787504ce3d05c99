// src/handlers/equipments.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{RequireRole, StaffOnly},
    },
    models::equipments::{Equipment, EquipmentStatus},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipmentPayload {
    pub client_id: Uuid,

    #[validate(length(min = 1, message = "O tipo do equipamento é obrigatório."))]
    #[schema(example = "notebook")]
    pub equipment_type: String,

    pub brand: Option<String>,
    pub model: Option<String>,

    // Quando ausente, um número de série EQ-<hex> é gerado.
    pub serial_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EquipmentFilter {
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipmentStatusPayload {
    #[schema(example = "maintenance")]
    pub status: EquipmentStatus,
}

// POST /api/equipments
#[utoipa::path(
    post,
    path = "/api/equipments",
    tag = "Equipments",
    request_body = CreateEquipmentPayload,
    responses(
        (status = 201, description = "Equipamento cadastrado", body = Equipment),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_equipment(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    Json(payload): Json<CreateEquipmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    // O dono precisa existir antes do aparelho.
    app_state
        .client_repo
        .find_by_id(payload.client_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?
        .ok_or_else(|| AppError::ClientNotFound.to_api_error(&locale))?;

    let serial = payload.serial_number.unwrap_or_else(|| {
        let raw = Uuid::new_v4().simple().to_string();
        format!("EQ-{}", &raw[..8].to_uppercase())
    });

    let equipment = app_state
        .equipment_repo
        .create(
            &app_state.db_pool,
            payload.client_id,
            &payload.equipment_type,
            payload.brand.as_deref(),
            payload.model.as_deref(),
            &serial,
            payload.notes.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(equipment)))
}

// GET /api/equipments?client_id=...
#[utoipa::path(
    get,
    path = "/api/equipments",
    tag = "Equipments",
    params(("client_id" = Option<Uuid>, Query, description = "Filtra pelo dono")),
    responses(
        (status = 200, description = "Equipamentos cadastrados", body = Vec<Equipment>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_equipments(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    Query(filter): Query<EquipmentFilter>,
) -> Result<Json<Vec<Equipment>>, ApiError> {
    let equipments = app_state
        .equipment_repo
        .list(filter.client_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(equipments))
}

// PATCH /api/equipments/{id}/status
#[utoipa::path(
    patch,
    path = "/api/equipments/{id}/status",
    tag = "Equipments",
    params(("id" = Uuid, Path, description = "ID do equipamento")),
    request_body = UpdateEquipmentStatusPayload,
    responses(
        (status = 200, description = "Status atualizado", body = Equipment),
        (status = 404, description = "Equipamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_equipment_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEquipmentStatusPayload>,
) -> Result<Json<Equipment>, ApiError> {
    let equipment = app_state
        .equipment_repo
        .update_status(id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?
        .ok_or_else(|| AppError::EquipmentNotFound.to_api_error(&locale))?;

    Ok(Json(equipment))
}
