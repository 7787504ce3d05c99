// src/services/stats.rs
//
// O agregador de estatísticas do dashboard. Funções totais e puras sobre um
// snapshot em memória: nunca falham, nunca fazem I/O. Dado parcial ou
// malformado degrada para zero/vazio. O painel não pode quebrar porque o
// backend devolveu linhas incompletas.
//
// Antes, cada página recalculava esses números por conta própria; aqui fica
// a única implementação, e cada tela fornece apenas o predicado de filtro.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::orders::{OrderStatus, ServiceOrder};

// Os quatro sub-status "de bancada" que o painel exibe como um único
// balde "em andamento". A união é decisão de apresentação e fica fixa aqui.
const IN_PROGRESS: [OrderStatus; 4] = [
    OrderStatus::Diagnosis,
    OrderStatus::WaitingParts,
    OrderStatus::Repair,
    OrderStatus::Testing,
];

const CLOSED: [OrderStatus; 3] = [
    OrderStatus::Completed,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
];

/// Contagem por status bruto, em uma passada. Status fora do vocabulário
/// viram um balde próprio (não são descartados), espelhando o fallback
/// `label || status` da renderização.
pub fn count_by_status(orders: &[ServiceOrder]) -> BTreeMap<String, usize> {
    let mut buckets: BTreeMap<String, usize> = BTreeMap::new();
    for order in orders {
        *buckets.entry(order.status.clone()).or_insert(0) += 1;
    }
    buckets
}

/// Uma ordem está ativa quando o status não é de fechamento. Status fora do
/// vocabulário contam como ativos (a regra é "não está fechada").
pub fn is_active_status(status: &str) -> bool {
    !CLOSED.iter().any(|s| s.as_str() == status)
}

/// Ordens ainda abertas: status fora de {completed, delivered, cancelled}.
pub fn count_active(orders: &[ServiceOrder]) -> usize {
    orders.iter().filter(|o| is_active_status(&o.status)).count()
}

/// Ordens em bancada: status em {diagnosis, waiting_parts, repair, testing}.
pub fn count_in_progress(orders: &[ServiceOrder]) -> usize {
    orders
        .iter()
        .filter(|o| IN_PROGRESS.iter().any(|s| s.as_str() == o.status))
        .count()
}

/// Ordens criadas no mesmo mês-calendário da data de referência.
/// É mês+ano iguais, de propósito. Não é "últimos 30 dias".
pub fn count_new_in_month(orders: &[ServiceOrder], reference: DateTime<Utc>) -> usize {
    orders
        .iter()
        .filter(|o| {
            o.created_at.month() == reference.month() && o.created_at.year() == reference.year()
        })
        .count()
}

/// Receita das ordens fechadas: soma de `final_cost` onde o status é
/// `completed` ou `delivered`; custo ausente conta como zero.
pub fn completed_revenue(orders: &[ServiceOrder]) -> Decimal {
    orders
        .iter()
        .filter(|o| {
            o.status == OrderStatus::Completed.as_str()
                || o.status == OrderStatus::Delivered.as_str()
        })
        .fold(Decimal::ZERO, |acc, o| {
            acc + o.final_cost.unwrap_or(Decimal::ZERO)
        })
}

/// Saldo a receber: soma de `(final_cost - advance_payment)` apenas quando
/// os dois campos existem e o custo final é maior que o adiantamento.
/// Qualquer outra ordem contribui com zero, então o total nunca é negativo.
pub fn pending_balance(orders: &[ServiceOrder]) -> Decimal {
    orders.iter().fold(Decimal::ZERO, |acc, o| {
        match (o.final_cost, o.advance_payment) {
            (Some(final_cost), Some(advance)) if final_cost > advance => {
                acc + (final_cost - advance)
            }
            _ => acc,
        }
    })
}

/// Média, em dias inteiros, entre recebimento e conclusão das ordens
/// fechadas que têm as duas datas. Lista sem ordens qualificadas devolve 0,
/// nunca NaN ou divisão por zero.
pub fn average_resolution_days(orders: &[ServiceOrder]) -> i64 {
    let mut total_days: i64 = 0;
    let mut qualifying: i64 = 0;

    for order in orders {
        let closed = order.status == OrderStatus::Completed.as_str()
            || order.status == OrderStatus::Delivered.as_str();
        if !closed {
            continue;
        }
        if let (Some(received), Some(completed)) = (order.received_date, order.completed_date) {
            total_days += (completed - received).num_days();
            qualifying += 1;
        }
    }

    if qualifying == 0 { 0 } else { total_days / qualifying }
}

/// Os `n` registros mais recentes que passam no predicado, genérico sobre o
/// tipo da linha (ordens e clientes usam o mesmo caminho; cada painel só
/// fornece o predicado da categoria). A ordenação é estável: empates de
/// timestamp preservam a ordem de entrada.
pub fn top_n_by_recency<'a, T, P, K>(
    rows: &'a [T],
    mut predicate: P,
    created_at: K,
    n: usize,
) -> Vec<&'a T>
where
    P: FnMut(&T) -> bool,
    K: Fn(&T) -> DateTime<Utc>,
{
    let mut selected: Vec<&T> = rows.iter().filter(|row| predicate(row)).collect();
    selected.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    selected.truncate(n);
    selected
}

/// Contagem por técnico; `None` é o balde "não atribuído".
pub fn count_by_technician(orders: &[ServiceOrder]) -> HashMap<Option<Uuid>, usize> {
    let mut buckets: HashMap<Option<Uuid>, usize> = HashMap::new();
    for order in orders {
        *buckets.entry(order.technician_id).or_insert(0) += 1;
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::orders::OrderPriority;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn order(status: &str) -> ServiceOrder {
        ServiceOrder {
            id: Uuid::new_v4(),
            order_number: "ORD-1704103200000".to_string(),
            status: status.to_string(),
            priority: OrderPriority::Medium,
            client_id: None,
            technician_id: None,
            receptionist_id: None,
            equipment_id: None,
            problem_description: None,
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
            received_date: Some(at(2024, 1, 1)),
            estimated_completion: None,
            completed_date: None,
            delivered_date: None,
            created_at: at(2024, 1, 1),
            updated_at: at(2024, 1, 1),
        }
    }

    #[test]
    fn count_by_status_buckets_sum_to_total() {
        let orders = vec![
            order("received"),
            order("received"),
            order("delivered"),
            order("repair"),
            order("em_revisao"), // fora do vocabulário: mantém balde próprio
        ];

        let buckets = count_by_status(&orders);
        assert_eq!(buckets.get("received"), Some(&2));
        assert_eq!(buckets.get("delivered"), Some(&1));
        assert_eq!(buckets.get("em_revisao"), Some(&1));
        assert_eq!(buckets.values().sum::<usize>(), orders.len());
    }

    #[test]
    fn in_progress_equals_sum_of_the_four_buckets() {
        let orders = vec![
            order("diagnosis"),
            order("repair"),
            order("repair"),
            order("testing"),
            order("waiting_parts"),
            order("received"),
            order("completed"),
        ];

        let buckets = count_by_status(&orders);
        let expected = ["diagnosis", "repair", "testing", "waiting_parts"]
            .iter()
            .map(|s| buckets.get(*s).copied().unwrap_or(0))
            .sum::<usize>();

        assert_eq!(count_in_progress(&orders), expected);
        assert_eq!(count_in_progress(&orders), 5);
    }

    #[test]
    fn active_excludes_closed_statuses() {
        let orders = vec![
            order("received"),
            order("repair"),
            order("completed"),
            order("delivered"),
            order("cancelled"),
        ];
        assert_eq!(count_active(&orders), 2);
    }

    #[test]
    fn new_in_month_uses_calendar_buckets() {
        let mut january = order("received");
        january.created_at = at(2024, 1, 30);
        let mut february = order("received");
        february.created_at = at(2024, 2, 2);
        let mut last_year = order("received");
        last_year.created_at = at(2023, 2, 10);

        let orders = vec![january, february, last_year];

        // 2 de fevereiro de 2024: só conta a ordem de fevereiro/2024, mesmo
        // que a de 30 de janeiro esteja dentro de "30 dias corridos".
        assert_eq!(count_new_in_month(&orders, at(2024, 2, 28)), 1);
        assert_eq!(count_new_in_month(&orders, at(2024, 1, 5)), 1);
    }

    #[test]
    fn pending_balance_counts_only_underpaid_orders() {
        let mut first = order("completed");
        first.final_cost = Some(Decimal::from(500));
        first.advance_payment = Some(Decimal::from(200));

        let mut second = order("delivered");
        second.final_cost = Some(Decimal::from(300));
        second.advance_payment = Some(Decimal::from(300));

        let third = order("received"); // sem final_cost

        let orders = vec![first, second, third];
        assert_eq!(pending_balance(&orders), Decimal::from(300));
    }

    #[test]
    fn pending_balance_never_goes_negative() {
        let mut overpaid = order("completed");
        overpaid.final_cost = Some(Decimal::from(100));
        overpaid.advance_payment = Some(Decimal::from(250));

        assert_eq!(pending_balance(&[overpaid]), Decimal::ZERO);
    }

    #[test]
    fn completed_revenue_treats_missing_cost_as_zero() {
        let mut paid = order("completed");
        paid.final_cost = Some(Decimal::from(450));
        let unpriced = order("delivered"); // final_cost = None
        let open = {
            let mut o = order("repair");
            o.final_cost = Some(Decimal::from(999));
            o
        };

        assert_eq!(completed_revenue(&[paid, unpriced, open]), Decimal::from(450));
    }

    #[test]
    fn average_resolution_days_handles_empty_input() {
        assert_eq!(average_resolution_days(&[]), 0);
        // Ordens sem data de conclusão também não quebram nada.
        assert_eq!(average_resolution_days(&[order("completed")]), 0);
    }

    #[test]
    fn average_resolution_days_integer_average() {
        let mut fast = order("completed");
        fast.received_date = Some(at(2024, 1, 1));
        fast.completed_date = Some(at(2024, 1, 3)); // 2 dias

        let mut slow = order("delivered");
        slow.received_date = Some(at(2024, 1, 1));
        slow.completed_date = Some(at(2024, 1, 8)); // 7 dias

        let open = order("repair"); // não qualifica

        assert_eq!(average_resolution_days(&[fast, slow, open]), 4); // (2+7)/2
    }

    #[test]
    fn top_n_keeps_input_order_on_ties() {
        let mut orders = Vec::new();
        for i in 0..8u32 {
            let mut o = order("received");
            // Dois grupos com o mesmo timestamp para forçar empates
            o.created_at = at(2024, 1, 10 + (i / 4));
            o.order_number = format!("ORD-{i}");
            orders.push(o);
        }

        let top = top_n_by_recency(&orders, |_| true, |o| o.created_at, 5);
        assert_eq!(top.len(), 5);
        // Os quatro do dia 11 vêm primeiro, na ordem de entrada; depois o
        // primeiro do dia 10.
        let numbers: Vec<&str> = top.iter().map(|o| o.order_number.as_str()).collect();
        assert_eq!(numbers, vec!["ORD-4", "ORD-5", "ORD-6", "ORD-7", "ORD-0"]);
    }

    #[test]
    fn top_n_applies_the_category_predicate() {
        let orders = vec![order("received"), order("repair"), order("received")];
        let top = top_n_by_recency(&orders, |o| o.status == "received", |o| o.created_at, 5);
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn technician_buckets_include_unassigned() {
        let tech = Uuid::new_v4();
        let mut assigned = order("repair");
        assigned.technician_id = Some(tech);

        let buckets = count_by_technician(&[assigned, order("received"), order("diagnosis")]);
        assert_eq!(buckets.get(&Some(tech)), Some(&1));
        assert_eq!(buckets.get(&None), Some(&2));
    }
}
