// src/services/lifecycle.rs
//
// O motor do ciclo de vida da ordem de serviço. Tudo aqui é puro: dado
// (ordem, novo status, agora) devolvemos uma ordem nova, sem tocar na
// original e sem nenhum I/O. Quem persiste o resultado é o order_service.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{common::error::AppError, models::orders::{OrderStatus, ServiceOrder}};

// A tabela de transições, explícita. A tela consulta a mesma tabela para
// decidir quais botões mostrar; o serviço a consulta antes de gravar.
//
// Política: estados terminais não saem para lugar nenhum; qualquer estado
// não-terminal pode ir para qualquer status (inclusive ele mesmo). Isso
// preserva o comportamento do balcão, onde a equipe corrige etapas
// manualmente e pode entregar uma ordem que pulou o `completed`.
// Um status corrompido/desconhecido é tratado como não-terminal.
pub fn allowed_next(current: &str) -> &'static [OrderStatus] {
    match OrderStatus::parse(current) {
        Some(status) if status.is_terminal() => &[],
        _ => &OrderStatus::ALL,
    }
}

pub fn can_transition(current: &str, next: OrderStatus) -> bool {
    allowed_next(current).contains(&next)
}

/// Valida e aplica uma transição de status, derivando os efeitos de data:
/// - `completed_date` é gravada uma única vez, na primeira passagem por
///   `completed`;
/// - `delivered_date` é gravada em toda transição para `delivered`;
/// - `updated_at` sempre avança para `now`.
pub fn apply_transition(
    order: &ServiceOrder,
    new_status: OrderStatus,
    now: DateTime<Utc>,
) -> Result<ServiceOrder, AppError> {
    if let Some(current) = OrderStatus::parse(&order.status) {
        if current.is_terminal() {
            return Err(AppError::TerminalStatus {
                current: order.status.clone(),
            });
        }
    }

    if !can_transition(&order.status, new_status) {
        return Err(AppError::InvalidTransition {
            from: order.status.clone(),
            to: new_status.as_str().to_string(),
        });
    }

    let mut updated = order.clone();
    updated.status = new_status.as_str().to_string();

    if new_status == OrderStatus::Completed && updated.completed_date.is_none() {
        updated.completed_date = Some(now);
    }
    if new_status == OrderStatus::Delivered {
        updated.delivered_date = Some(now);
    }
    updated.updated_at = now;

    Ok(updated)
}

/// Designa (ou remove) o técnico. Não mexe no status: avançar a etapa é uma
/// ação separada e explícita da equipe.
pub fn assign_technician(
    order: &ServiceOrder,
    technician_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> ServiceOrder {
    let mut updated = order.clone();
    updated.technician_id = technician_id;
    updated.updated_at = now;
    updated
}

pub fn assign_receptionist(
    order: &ServiceOrder,
    receptionist_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> ServiceOrder {
    let mut updated = order.clone();
    updated.receptionist_id = receptionist_id;
    updated.updated_at = now;
    updated
}

/// Exclusão só é permitida para ordens canceladas.
pub fn can_delete(order: &ServiceOrder) -> bool {
    order.status == OrderStatus::Cancelled.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::orders::OrderPriority;
    use chrono::TimeZone;

    fn order_with_status(status: &str) -> ServiceOrder {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        ServiceOrder {
            id: Uuid::new_v4(),
            order_number: "ORD-1704103200000".to_string(),
            status: status.to_string(),
            priority: OrderPriority::Medium,
            client_id: None,
            technician_id: None,
            receptionist_id: None,
            equipment_id: None,
            problem_description: Some("Não liga".to_string()),
            diagnosis: None,
            solution: None,
            device_condition: None,
            accessories: None,
            internal_notes: None,
            client_notes: None,
            estimated_cost: None,
            final_cost: None,
            advance_payment: None,
            commission_total: None,
            received_date: Some(t0),
            estimated_completion: None,
            completed_date: None,
            delivered_date: None,
            created_at: t0,
            updated_at: t0,
        }
    }

    fn instant(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn completed_sets_dates_on_first_pass() {
        let order = order_with_status("received");
        let t = instant(5, 12);

        let updated = apply_transition(&order, OrderStatus::Completed, t).unwrap();

        assert_eq!(updated.status, "completed");
        assert_eq!(updated.completed_date, Some(t));
        assert_eq!(updated.updated_at, t);
        // A ordem original não foi tocada
        assert_eq!(order.status, "received");
        assert_eq!(order.completed_date, None);
    }

    #[test]
    fn completed_date_is_idempotent() {
        let order = order_with_status("repair");
        let t1 = instant(5, 12);
        let t2 = instant(6, 9);

        let first = apply_transition(&order, OrderStatus::Completed, t1).unwrap();
        let second = apply_transition(&first, OrderStatus::Completed, t2).unwrap();

        // Segunda passagem não muda a data de conclusão, só o updated_at.
        assert_eq!(second.completed_date, Some(t1));
        assert_eq!(second.updated_at, t2);
    }

    #[test]
    fn delivered_refreshes_delivered_date_each_time() {
        let t1 = instant(5, 12);
        let t2 = instant(7, 8);

        let completed = apply_transition(&order_with_status("testing"), OrderStatus::Completed, t1).unwrap();
        let delivered = apply_transition(&completed, OrderStatus::Delivered, t2).unwrap();
        assert_eq!(delivered.delivered_date, Some(t2));

        // Entrega direta, pulando o completed: permitido, sem completed_date.
        let direct = apply_transition(&order_with_status("repair"), OrderStatus::Delivered, t2).unwrap();
        assert_eq!(direct.delivered_date, Some(t2));
        assert_eq!(direct.completed_date, None);
    }

    #[test]
    fn cancelled_is_terminal() {
        let order = order_with_status("cancelled");
        for next in OrderStatus::ALL {
            let result = apply_transition(&order, next, instant(9, 9));
            assert!(matches!(result, Err(AppError::TerminalStatus { .. })));
        }
        assert_eq!(order.status, "cancelled");
    }

    #[test]
    fn delivered_is_terminal() {
        let order = order_with_status("delivered");
        let result = apply_transition(&order, OrderStatus::Received, instant(9, 9));
        assert!(matches!(result, Err(AppError::TerminalStatus { .. })));
    }

    #[test]
    fn cancel_reachable_from_any_non_terminal_state() {
        for status in ["received", "diagnosis", "waiting_parts", "repair", "testing", "completed"] {
            let updated =
                apply_transition(&order_with_status(status), OrderStatus::Cancelled, instant(3, 3))
                    .unwrap();
            assert_eq!(updated.status, "cancelled");
        }
    }

    #[test]
    fn unknown_status_is_treated_as_non_terminal() {
        // Linha legada com status fora do vocabulário: ainda dá para corrigir.
        let order = order_with_status("em_revisao");
        let updated = apply_transition(&order, OrderStatus::Diagnosis, instant(2, 2)).unwrap();
        assert_eq!(updated.status, "diagnosis");
    }

    #[test]
    fn allowed_next_table_matches_policy() {
        assert!(allowed_next("delivered").is_empty());
        assert!(allowed_next("cancelled").is_empty());
        assert_eq!(allowed_next("received").len(), 8);
        assert!(can_transition("received", OrderStatus::Completed));
        assert!(!can_transition("delivered", OrderStatus::Received));
    }

    #[test]
    fn assignments_do_not_touch_status() {
        let order = order_with_status("diagnosis");
        let tech = Uuid::new_v4();
        let t = instant(4, 10);

        let updated = assign_technician(&order, Some(tech), t);
        assert_eq!(updated.technician_id, Some(tech));
        assert_eq!(updated.status, "diagnosis");
        assert_eq!(updated.updated_at, t);

        let cleared = assign_receptionist(&updated, None, t);
        assert_eq!(cleared.receptionist_id, None);
        assert_eq!(cleared.status, "diagnosis");
    }

    #[test]
    fn delete_gate_requires_cancelled() {
        assert!(can_delete(&order_with_status("cancelled")));
        assert!(!can_delete(&order_with_status("received")));
        assert!(!can_delete(&order_with_status("delivered")));
    }
}
