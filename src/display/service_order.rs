//! Service order display formatting
//!
//! Orders are listed newest first by the service; this module only lays them
//! out. The client column shows whatever name the caller resolved.

use crate::clock::Clock;
use crate::models::{Money, ServiceOrder};

use super::{column_width, format_date, format_date_time, truncate};

/// Format a list of service orders as a table
pub fn format_service_order_list(orders: &[ServiceOrder], clock: &dyn Clock) -> String {
    if orders.is_empty() {
        return "Nenhuma ordem de serviço encontrada.".to_string();
    }

    let client_width = column_width("Cliente", orders.iter().map(|o| o.client_name.as_str()), 25);
    let product_width = column_width("Produto", orders.iter().map(|o| o.product.as_str()), 20);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<7}  {:<10}  {:<client_width$}  {:<product_width$}  {:<10}  {:<12}  {:>14}\n",
        "Nº OS", "Data", "Cliente", "Produto", "Prioridade", "Status", "Valor",
    ));
    output.push_str(&format!(
        "{:-<7}  {:-<10}  {:-<client_width$}  {:-<product_width$}  {:-<10}  {:-<12}  {:->14}\n",
        "", "", "", "", "", "", "",
    ));

    for order in orders {
        output.push_str(&format!(
            "{:<7}  {:<10}  {:<client_width$}  {:<product_width$}  {:<10}  {:<12}  {:>14}\n",
            order.order_number,
            format_date(clock, order.date),
            truncate(&order.client_name, client_width),
            truncate(&order.product, product_width),
            order.priority,
            order.status,
            order.value,
        ));
    }

    let total: Money = orders.iter().map(|o| o.value).sum();
    output.push_str(&format!(
        "\n{} ordem(ns), total {}\n",
        orders.len(),
        total
    ));

    output
}

/// Format a single order's details
pub fn format_service_order_details(order: &ServiceOrder, clock: &dyn Clock) -> String {
    let mut output = String::new();

    output.push_str(&format!("Ordem de Serviço #{}\n", order.order_number));
    output.push_str(&format!("  ID:          {}\n", order.id));
    output.push_str(&format!(
        "  Cliente:     {} ({})\n",
        order.client_name, order.client_id
    ));
    output.push_str(&format!("  Produto:     {}\n", order.product));
    if !order.description.is_empty() {
        output.push_str(&format!("  Descrição:   {}\n", order.description));
    }
    if let Some(observation) = &order.observation {
        output.push_str(&format!("  Observação:  {}\n", observation));
    }
    output.push_str(&format!("  Prioridade:  {}\n", order.priority));
    output.push_str(&format!("  Status:      {}\n", order.status));
    output.push_str(&format!("  Valor:       {}\n", order.value));
    output.push_str(&format!(
        "  Data:        {}\n",
        format_date_time(clock, order.date)
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{ClientId, OrderStatus, Priority, ServiceOrderDraft, ServiceOrderId};
    use chrono::{TimeZone, Utc};

    fn order(number: u64, cents: i64) -> ServiceOrder {
        let mut draft = ServiceOrderDraft::new(ClientId::new(1), "Notebook Dell", Money::from_cents(cents));
        draft.priority = Priority::High;
        draft.status = OrderStatus::InProgress;
        draft.description = "Não liga".into();
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        ServiceOrder::from_draft(ServiceOrderId::new(number), number, "Maria".into(), draft, at)
    }

    #[test]
    fn test_list_with_total() {
        let clock = FixedClock::utc(Utc::now());
        let output = format_service_order_list(&[order(2, 15000), order(1, 5050)], &clock);
        assert!(output.contains("Nº OS"));
        assert!(output.contains("05/03/2024"));
        assert!(output.contains("Em Andamento"));
        assert!(output.contains("2 ordem(ns), total R$ 200,50"));
    }

    #[test]
    fn test_empty_list() {
        let clock = FixedClock::utc(Utc::now());
        assert!(format_service_order_list(&[], &clock).starts_with("Nenhuma"));
    }

    #[test]
    fn test_details() {
        let clock = FixedClock::utc(Utc::now());
        let output = format_service_order_details(&order(7, 100), &clock);
        assert!(output.contains("Ordem de Serviço #7"));
        assert!(output.contains("Maria (cli-1)"));
        assert!(output.contains("Descrição:   Não liga"));
        assert!(output.contains("05/03/2024 14:30"));
        assert!(!output.contains("Observação"));
    }
}
