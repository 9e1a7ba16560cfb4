//! Client display formatting

use crate::clock::Clock;
use crate::models::{Client, DocumentKind};

use super::{column_width, format_date, truncate};

/// Format a list of clients as a table
pub fn format_client_list(clients: &[Client]) -> String {
    if clients.is_empty() {
        return "Nenhum cliente encontrado.".to_string();
    }

    let name_width = column_width("Nome", clients.iter().map(|c| c.name.as_str()), 35);
    let doc_width = column_width("Documento", clients.iter().map(|c| c.document.as_str()), 18);
    let phone_width = column_width("Telefone", clients.iter().map(|c| c.phone.as_str()), 16);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8}  {:<name_width$}  {:<doc_width$}  {:<phone_width$}  {}\n",
        "ID", "Nome", "Documento", "Telefone", "Cidade/UF",
    ));
    output.push_str(&format!(
        "{:-<8}  {:-<name_width$}  {:-<doc_width$}  {:-<phone_width$}  {:-<20}\n",
        "", "", "", "", "",
    ));

    for client in clients {
        let place = if client.city.is_empty() {
            client.state.clone()
        } else if client.state.is_empty() {
            client.city.clone()
        } else {
            format!("{}/{}", client.city, client.state)
        };

        output.push_str(&format!(
            "{:<8}  {:<name_width$}  {:<doc_width$}  {:<phone_width$}  {}\n",
            client.id.to_string(),
            truncate(&client.name, name_width),
            truncate(&client.document, doc_width),
            truncate(&client.phone, phone_width),
            place,
        ));
    }

    output.push_str(&format!("\n{} cliente(s)\n", clients.len()));
    output
}

/// Format a single client's details, with the number of linked orders
pub fn format_client_details(client: &Client, order_count: usize, clock: &dyn Clock) -> String {
    let mut output = String::new();

    output.push_str(&format!("Cliente: {}\n", client.name));
    output.push_str(&format!("  ID:            {}\n", client.id));
    output.push_str(&format!(
        "  {:<14} {}\n",
        format!("{}:", DocumentKind::classify(&client.document)),
        client.document
    ));
    if !client.email.is_empty() {
        output.push_str(&format!("  Email:         {}\n", client.email));
    }
    if !client.phone.is_empty() {
        output.push_str(&format!("  Telefone:      {}\n", client.phone));
    }
    if !client.street.is_empty() {
        output.push_str(&format!("  Endereço:      {}\n", client.address_line()));
    }
    output.push_str(&format!(
        "  Cadastro:      {}\n",
        format_date(clock, client.created_at)
    ));
    output.push_str(&format!("  Ordens:        {}\n", order_count));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{ClientDraft, ClientId};
    use chrono::{TimeZone, Utc};

    fn client(name: &str, city: &str) -> Client {
        let mut draft = ClientDraft::new(name, "123.456.789-09");
        draft.city = city.into();
        draft.state = "SP".into();
        draft.phone = "(11) 98888-7777".into();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Client::from_draft(ClientId::new(3), draft, at)
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_client_list(&[]), "Nenhum cliente encontrado.");
    }

    #[test]
    fn test_list_table() {
        let output = format_client_list(&[client("Maria Souza", "Campinas")]);
        assert!(output.contains("Nome"));
        assert!(output.contains("cli-3"));
        assert!(output.contains("Maria Souza"));
        assert!(output.contains("Campinas/SP"));
        assert!(output.contains("1 cliente(s)"));
    }

    #[test]
    fn test_details() {
        let clock = FixedClock::utc(Utc::now());
        let output = format_client_details(&client("Maria", ""), 2, &clock);
        assert!(output.contains("Cliente: Maria"));
        assert!(output.contains("CPF:"));
        assert!(output.contains("01/03/2024"));
        assert!(output.contains("Ordens:        2"));
    }
}
