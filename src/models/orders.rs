// src/models/orders.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// O vocabulário de status da ordem. A coluna no banco é TEXT e o campo no
// modelo é String: um valor legado fora desta lista ainda é lido, listado e
// contado no seu próprio balde. O enum entra na desserialização dos payloads
// de transição e nas constantes do motor de ciclo de vida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Received,
    Diagnosis,
    WaitingParts,
    Repair,
    Testing,
    Completed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Received,
        OrderStatus::Diagnosis,
        OrderStatus::WaitingParts,
        OrderStatus::Repair,
        OrderStatus::Testing,
        OrderStatus::Completed,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Received => "received",
            OrderStatus::Diagnosis => "diagnosis",
            OrderStatus::WaitingParts => "waiting_parts",
            OrderStatus::Repair => "repair",
            OrderStatus::Testing => "testing",
            OrderStatus::Completed => "completed",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    // `delivered` e `cancelled` encerram a ordem de vez.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

// Prioridade da ordem de serviço. Não confundir com a prioridade das
// requisições de peças, que tem vocabulário próprio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderPriority {
    Low,
    Medium,
    High,
    Urgent,
}

// A ordem de serviço como sai do banco.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: Uuid,
    #[schema(example = "ORD-1704103200000")]
    pub order_number: String,
    #[schema(example = "received")]
    pub status: String,
    pub priority: OrderPriority,
    pub client_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub receptionist_id: Option<Uuid>,
    pub equipment_id: Option<Uuid>,
    pub problem_description: Option<String>,
    pub diagnosis: Option<String>,
    pub solution: Option<String>,
    pub device_condition: Option<String>,
    pub accessories: Option<String>,
    pub internal_notes: Option<String>,
    pub client_notes: Option<String>,
    pub estimated_cost: Option<Decimal>,
    pub final_cost: Option<Decimal>,
    pub advance_payment: Option<Decimal>,
    pub commission_total: Option<Decimal>,
    pub received_date: Option<DateTime<Utc>>,
    pub estimated_completion: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub delivered_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Detalhe da ordem: cabeçalho + nomes resolvidos + os próximos status que a
// tela pode oferecer como botão.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderDetail {
    #[serde(flatten)]
    pub header: ServiceOrder,
    pub client_name: Option<String>,
    pub technician_name: Option<String>,
    pub equipment_label: Option<String>,
    pub allowed_next: Vec<OrderStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_parse() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("em_revisao"), None);
    }

    #[test]
    fn only_delivered_and_cancelled_are_terminal() {
        let terminal: Vec<OrderStatus> = OrderStatus::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![OrderStatus::Delivered, OrderStatus::Cancelled]);
    }
}
