//! Purchase display formatting

use crate::clock::Clock;
use crate::models::{Money, Purchase};

use super::{column_width, format_date, truncate};

/// Format a list of purchases as a table
pub fn format_purchase_list(purchases: &[Purchase], clock: &dyn Clock) -> String {
    if purchases.is_empty() {
        return "Nenhuma compra encontrada.".to_string();
    }

    let supplier_width =
        column_width("Fornecedor", purchases.iter().map(|p| p.supplier.as_str()), 25);
    let product_width = column_width("Produto", purchases.iter().map(|p| p.product.as_str()), 20);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8}  {:<10}  {:<supplier_width$}  {:<10}  {:<product_width$}  {:>14}\n",
        "ID", "Data", "Fornecedor", "NF", "Produto", "Valor",
    ));
    output.push_str(&format!(
        "{:-<8}  {:-<10}  {:-<supplier_width$}  {:-<10}  {:-<product_width$}  {:->14}\n",
        "", "", "", "", "", "",
    ));

    for purchase in purchases {
        output.push_str(&format!(
            "{:<8}  {:<10}  {:<supplier_width$}  {:<10}  {:<product_width$}  {:>14}\n",
            purchase.id.to_string(),
            format_date(clock, purchase.date),
            truncate(&purchase.supplier, supplier_width),
            truncate(&purchase.invoice_number, 10),
            truncate(&purchase.product, product_width),
            purchase.value,
        ));
    }

    let total: Money = purchases.iter().map(|p| p.value).sum();
    output.push_str(&format!("\n{} compra(s), total {}\n", purchases.len(), total));

    output
}

/// Format a single purchase's details
pub fn format_purchase_details(purchase: &Purchase, clock: &dyn Clock) -> String {
    let mut output = String::new();

    output.push_str(&format!("Compra: {}\n", purchase.supplier));
    output.push_str(&format!("  ID:          {}\n", purchase.id));
    output.push_str(&format!("  Data:        {}\n", format_date(clock, purchase.date)));
    if !purchase.document.is_empty() {
        output.push_str(&format!("  Documento:   {}\n", purchase.document));
    }
    if !purchase.invoice_number.is_empty() {
        output.push_str(&format!("  NF:          {}\n", purchase.invoice_number));
    }
    if !purchase.product.is_empty() {
        output.push_str(&format!("  Produto:     {}\n", purchase.product));
    }
    if !purchase.description.is_empty() {
        output.push_str(&format!("  Descrição:   {}\n", purchase.description));
    }
    output.push_str(&format!("  Valor:       {}\n", purchase.value));

    output
}
