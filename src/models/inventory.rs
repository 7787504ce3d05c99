// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Peças de Estoque ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPart {
    pub id: Uuid,
    #[schema(example = "Tela LCD 15.6\"")]
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub stock_quantity: i32,
    pub min_stock_level: i32,
    pub max_stock_level: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Estado derivado de disponibilidade. Os rótulos são o contrato com o front
// e ficam exatamente como a tela os exibe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum StockAvailability {
    #[serde(rename = "Agotado")]
    OutOfStock,
    #[serde(rename = "Stock Bajo")]
    LowStock,
    #[serde(rename = "Disponible")]
    Available,
}

impl InventoryPart {
    // Agotado (q = 0), Stock Bajo (0 < q <= min), Disponible (q > min).
    pub fn availability(&self) -> StockAvailability {
        if self.stock_quantity <= 0 {
            StockAvailability::OutOfStock
        } else if self.stock_quantity <= self.min_stock_level {
            StockAvailability::LowStock
        } else {
            StockAvailability::Available
        }
    }
}

// Peça + rótulo derivado, como as listagens devolvem.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPartView {
    #[serde(flatten)]
    pub part: InventoryPart,
    pub availability: StockAvailability,
}

impl From<InventoryPart> for InventoryPartView {
    fn from(part: InventoryPart) -> Self {
        let availability = part.availability();
        Self { part, availability }
    }
}

// --- Requisições de Peças ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Fulfilled,
    Cancelled,
}

// Vocabulário próprio das requisições (low/normal/high/urgent).
// Não é o mesmo enum de prioridade das ordens de serviço.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestPriority {
    Low,
    Normal,
    High,
    Urgent,
}

// Aprovação de um passo só: pending -> approved/rejected (revisor),
// approved -> fulfilled (baixa de estoque), pending -> cancelled (solicitante).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRequest {
    pub id: Uuid,
    pub part_id: Uuid,
    pub requester_id: Uuid,
    pub quantity: i32,
    pub status: RequestStatus,
    pub priority: RequestPriority,
    pub notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(stock_quantity: i32, min_stock_level: i32) -> InventoryPart {
        let t0 = Utc::now();
        InventoryPart {
            id: Uuid::new_v4(),
            name: "Tela LCD 15.6\"".to_string(),
            sku: None,
            description: None,
            stock_quantity,
            min_stock_level,
            max_stock_level: None,
            unit_price: None,
            created_at: t0,
            updated_at: t0,
        }
    }

    #[test]
    fn availability_boundaries() {
        // min = 5: esgotado em 0, baixo até o mínimo, disponível acima dele.
        assert_eq!(part(0, 5).availability(), StockAvailability::OutOfStock);
        assert_eq!(part(1, 5).availability(), StockAvailability::LowStock);
        assert_eq!(part(5, 5).availability(), StockAvailability::LowStock);
        assert_eq!(part(6, 5).availability(), StockAvailability::Available);
    }

    #[test]
    fn zero_stock_wins_over_low_stock_when_min_is_zero() {
        // Com min = 0, q = 0 é "Agotado", nunca "Stock Bajo".
        assert_eq!(part(0, 0).availability(), StockAvailability::OutOfStock);
        assert_eq!(part(1, 0).availability(), StockAvailability::Available);
    }

    #[test]
    fn availability_labels_are_the_front_contract() {
        let labels: Vec<String> = [
            StockAvailability::OutOfStock,
            StockAvailability::LowStock,
            StockAvailability::Available,
        ]
        .iter()
        .map(|a| serde_json::to_string(a).unwrap())
        .collect();
        assert_eq!(labels, vec!["\"Agotado\"", "\"Stock Bajo\"", "\"Disponible\""]);
    }
}
