// src/models/equipments.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "equipment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EquipmentStatus {
    Active,
    Inactive,
    Maintenance,
    Retired,
}

// Equipamento pertence a exatamente um cliente. Criado explicitamente pela
// equipe ou implicitamente quando um cliente abre uma solicitação de serviço
// para um aparelho ainda não cadastrado (número de série é gerado se faltar).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: Uuid,
    pub client_id: Uuid,
    #[schema(example = "notebook")]
    pub equipment_type: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[schema(example = "EQ-9F2C01A4")]
    pub serial_number: String,
    pub status: EquipmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
