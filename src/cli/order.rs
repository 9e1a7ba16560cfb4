//! Service order CLI commands

use clap::Subcommand;

use crate::clock::SystemClock;
use crate::display::service_order::{format_service_order_details, format_service_order_list};
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::period::parse_date;
use crate::models::{Money, OrderStatus, Priority, ServiceOrderDraft, ServiceOrderPatch};
use crate::services::{ClientService, ServiceOrderService};
use crate::storage::Storage;

/// Service order subcommands
#[derive(Subcommand, Debug)]
pub enum OrderCommands {
    /// Open a new service order dated now
    Add {
        /// Client name or ID
        client: String,
        /// Product being serviced
        product: String,
        /// Value (e.g. "150", "1.234,56")
        value: String,
        /// Order number (defaults to the next free number)
        #[arg(short, long)]
        number: Option<u64>,
        /// Problem description
        #[arg(short, long)]
        description: Option<String>,
        /// Internal observation
        #[arg(short, long)]
        observation: Option<String>,
        /// Priority (low, normal, high, urgent)
        #[arg(short, long, default_value = "normal")]
        priority: String,
        /// Status (pending, in_progress, completed, cancelled)
        #[arg(short, long, default_value = "pending")]
        status: String,
    },
    /// List service orders, newest first
    List {
        /// Only orders with a field containing this text
        #[arg(short, long)]
        search: Option<String>,
        /// Only orders opened on this date (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show order details
    Show {
        /// Order number ("15" or "#15") or ID ("os-3")
        order: String,
    },
    /// Edit an order
    Edit {
        /// Order number or ID
        order: String,
        /// New order number
        #[arg(short, long)]
        number: Option<u64>,
        /// Move the order to another client
        #[arg(short, long)]
        client: Option<String>,
        /// New product
        #[arg(long)]
        product: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New observation (empty to clear)
        #[arg(short, long)]
        observation: Option<String>,
        /// New priority
        #[arg(short, long)]
        priority: Option<String>,
        /// New status
        #[arg(short, long)]
        status: Option<String>,
        /// New value
        #[arg(short, long)]
        value: Option<String>,
    },
    /// Delete an order
    Delete {
        /// Order number or ID
        order: String,
    },
    /// Print the suggested number for the next order
    NextNumber,
}

/// Handle a service order command
pub fn handle_order_command(storage: &Storage, cmd: OrderCommands) -> BackofficeResult<()> {
    let service = ServiceOrderService::new(storage);
    let clients = ClientService::new(storage);

    match cmd {
        OrderCommands::Add {
            client,
            product,
            value,
            number,
            description,
            observation,
            priority,
            status,
        } => {
            let client = clients.require(&client)?;

            let mut draft = ServiceOrderDraft::new(client.id, product, parse_value(&value)?);
            draft.order_number = number;
            draft.description = description.unwrap_or_default();
            draft.observation = observation;
            draft.priority = parse_priority(&priority)?;
            draft.status = parse_status(&status)?;

            let order = service.create(draft)?;
            println!("Created service order #{}", order.order_number);
            println!("  Client: {}", order.client_name);
            println!("  Value: {}", order.value);
            println!("  ID: {}", order.id);
        }

        OrderCommands::List { search, date } => {
            let date = date.as_deref().map(parse_date).transpose().map_err(|e| {
                BackofficeError::Validation(e.to_string())
            })?;
            let orders = service.list_matching(search.as_deref(), date)?;
            print!("{}", format_service_order_list(&orders, &SystemClock));
        }

        OrderCommands::Show { order } => {
            let mut found = service.require(&order)?;
            // Prefer the client's current name over the stored snapshot
            if let Some(client) = clients.get(found.client_id)? {
                found.client_name = client.name;
            }
            print!("{}", format_service_order_details(&found, &SystemClock));
        }

        OrderCommands::Edit {
            order,
            number,
            client,
            product,
            description,
            observation,
            priority,
            status,
            value,
        } => {
            let found = service.require(&order)?;

            let patch = ServiceOrderPatch {
                order_number: number,
                client_id: client
                    .as_deref()
                    .map(|c| clients.require(c).map(|c| c.id))
                    .transpose()?,
                product,
                description,
                observation,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                status: status.as_deref().map(parse_status).transpose()?,
                value: value.as_deref().map(parse_value).transpose()?,
            };

            if patch.is_empty() {
                println!("No changes specified. Use --help to see the editable fields.");
                return Ok(());
            }

            let updated = service.update(found.id, patch)?;
            println!(
                "Updated service order #{} ({})",
                updated.order_number, updated.status
            );
        }

        OrderCommands::Delete { order } => {
            let found = service.require(&order)?;
            let removed = service.delete(found.id)?;
            println!(
                "Deleted service order #{} ({})",
                removed.order_number, removed.client_name
            );
        }

        OrderCommands::NextNumber => {
            println!("{}", service.next_order_number()?);
        }
    }

    Ok(())
}

pub(crate) fn parse_value(value: &str) -> BackofficeResult<Money> {
    Money::parse(value).map_err(|e| {
        BackofficeError::Validation(format!(
            "Invalid value: '{}'. Use a format like '150' or '1.234,56'. Error: {}",
            value, e
        ))
    })
}

fn parse_priority(value: &str) -> BackofficeResult<Priority> {
    Priority::parse(value).ok_or_else(|| {
        BackofficeError::Validation(format!(
            "Invalid priority: '{}'. Valid priorities: low, normal, high, urgent",
            value
        ))
    })
}

fn parse_status(value: &str) -> BackofficeResult<OrderStatus> {
    OrderStatus::parse(value).ok_or_else(|| {
        BackofficeError::Validation(format!(
            "Invalid status: '{}'. Valid statuses: pending, in_progress, completed, cancelled",
            value
        ))
    })
}
