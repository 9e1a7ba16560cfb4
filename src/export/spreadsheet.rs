//! Spreadsheet export
//!
//! Each entity type is projected to a flat table of display strings with
//! Portuguese headers, then written as one worksheet of an `.xlsx` workbook.
//! The workbook is meant for people; it is not read back by the importer.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::clock::Clock;
use crate::display::format_date;
use crate::error::BackofficeResult;
use crate::models::{Client, Purchase, ServiceOrder};
use crate::services::ServiceOrderService;
use crate::storage::{DatasetCounts, Storage};

/// Default file name for the full workbook
pub const DEFAULT_WORKBOOK_NAME: &str = "dados-erp.xlsx";

const CLIENT_HEADERS: &[&str] = &[
    "Nome",
    "Documento",
    "Email",
    "Telefone",
    "CEP",
    "Endereço",
    "Número",
    "Complemento",
    "Bairro",
    "Cidade",
    "Estado",
    "Data de Cadastro",
];

const SERVICE_ORDER_HEADERS: &[&str] = &[
    "Nº OS",
    "Cliente",
    "Produto",
    "Descrição",
    "Observação",
    "Prioridade",
    "Status",
    "Valor",
    "Data",
];

const PURCHASE_HEADERS: &[&str] = &[
    "Data",
    "Fornecedor",
    "Documento",
    "NF",
    "Produto",
    "Descrição",
    "Valor",
];

/// Which entity a single-sheet export covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sheet {
    Clients,
    ServiceOrders,
    Purchases,
}

impl Sheet {
    pub fn name(&self) -> &'static str {
        match self {
            Sheet::Clients => "Clientes",
            Sheet::ServiceOrders => "Ordens de Serviço",
            Sheet::Purchases => "Compras",
        }
    }

    /// Default file name when the sheet is exported on its own
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Sheet::Clients => "clientes.xlsx",
            Sheet::ServiceOrders => "ordens-de-servico.xlsx",
            Sheet::Purchases => "compras.xlsx",
        }
    }
}

/// A worksheet's worth of display strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTable {
    pub name: &'static str,
    pub headers: &'static [&'static str],
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Look up a cell by header label
    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        let col = self.headers.iter().position(|h| *h == header)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

pub fn clients_table(clients: &[Client], clock: &dyn Clock) -> SheetTable {
    let rows = clients
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.document.clone(),
                c.email.clone(),
                c.phone.clone(),
                c.postal_code.clone(),
                c.street.clone(),
                c.number.clone(),
                c.complement.clone().unwrap_or_default(),
                c.neighborhood.clone(),
                c.city.clone(),
                c.state.clone(),
                format_date(clock, c.created_at),
            ]
        })
        .collect();

    SheetTable {
        name: Sheet::Clients.name(),
        headers: CLIENT_HEADERS,
        rows,
    }
}

pub fn service_orders_table(orders: &[ServiceOrder], clock: &dyn Clock) -> SheetTable {
    let rows = orders
        .iter()
        .map(|o| {
            vec![
                o.order_number.to_string(),
                o.client_name.clone(),
                o.product.clone(),
                o.description.clone(),
                o.observation.clone().unwrap_or_default(),
                o.priority.label().to_string(),
                o.status.label().to_string(),
                o.value.format_brl(),
                format_date(clock, o.date),
            ]
        })
        .collect();

    SheetTable {
        name: Sheet::ServiceOrders.name(),
        headers: SERVICE_ORDER_HEADERS,
        rows,
    }
}

pub fn purchases_table(purchases: &[Purchase], clock: &dyn Clock) -> SheetTable {
    let rows = purchases
        .iter()
        .map(|p| {
            vec![
                format_date(clock, p.date),
                p.supplier.clone(),
                p.document.clone(),
                p.invoice_number.clone(),
                p.product.clone(),
                p.description.clone(),
                p.value.format_brl(),
            ]
        })
        .collect();

    SheetTable {
        name: Sheet::Purchases.name(),
        headers: PURCHASE_HEADERS,
        rows,
    }
}

/// Write tables as worksheets of one workbook, in the given order
pub fn write_workbook(tables: &[SheetTable], path: &Path) -> BackofficeResult<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for table in tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(table.name)?;

        for (col, header) in table.headers.iter().enumerate() {
            let col = col as u16;
            worksheet.write_string_with_format(0, col, *header, &header_format)?;

            let widest = table
                .rows
                .iter()
                .filter_map(|row| row.get(col as usize))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(10);
            worksheet.set_column_width(col, (widest + 2).min(60) as f64)?;
        }

        for (index, row) in table.rows.iter().enumerate() {
            let row_num = (index + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                worksheet.write_string(row_num, col as u16, cell.as_str())?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Build the three tables from storage (orders carry current client names)
pub fn workbook_tables(storage: &Storage, clock: &dyn Clock) -> BackofficeResult<Vec<SheetTable>> {
    let orders = ServiceOrderService::with_clock(storage, clock).list()?;
    Ok(vec![
        clients_table(&storage.clients.get_all()?, clock),
        service_orders_table(&orders, clock),
        purchases_table(&storage.purchases.get_all()?, clock),
    ])
}

/// Export everything to one workbook with a sheet per entity type
pub fn export_workbook(
    storage: &Storage,
    clock: &dyn Clock,
    path: &Path,
) -> BackofficeResult<DatasetCounts> {
    let tables = workbook_tables(storage, clock)?;
    write_workbook(&tables, path)?;
    storage.counts()
}

/// Export a single entity type to its own workbook; returns the row count
pub fn export_sheet(
    storage: &Storage,
    clock: &dyn Clock,
    sheet: Sheet,
    path: &Path,
) -> BackofficeResult<usize> {
    let table = match sheet {
        Sheet::Clients => clients_table(&storage.clients.get_all()?, clock),
        Sheet::ServiceOrders => {
            let orders = ServiceOrderService::with_clock(storage, clock).list()?;
            service_orders_table(&orders, clock)
        }
        Sheet::Purchases => purchases_table(&storage.purchases.get_all()?, clock),
    };
    let rows = table.rows.len();
    write_workbook(std::slice::from_ref(&table), path)?;
    Ok(rows)
}
