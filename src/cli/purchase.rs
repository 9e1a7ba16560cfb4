//! Purchase CLI commands

use chrono::{DateTime, NaiveTime, Utc};
use clap::Subcommand;

use crate::clock::{Clock, SystemClock};
use crate::display::purchase::{format_purchase_details, format_purchase_list};
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::period::parse_date;
use crate::models::{PurchaseDraft, PurchasePatch};
use crate::services::PurchaseService;
use crate::storage::Storage;

use super::order::parse_value;

/// Purchase subcommands
#[derive(Subcommand, Debug)]
pub enum PurchaseCommands {
    /// Record a purchase
    Add {
        /// Supplier name
        supplier: String,
        /// Value (e.g. "99,90")
        value: String,
        /// Purchase date (YYYY-MM-DD or DD/MM/YYYY, defaults to now)
        #[arg(long)]
        date: Option<String>,
        /// Supplier CPF or CNPJ
        #[arg(short, long)]
        document: Option<String>,
        /// Invoice (NF) number
        #[arg(short, long)]
        invoice: Option<String>,
        /// Product bought
        #[arg(short, long)]
        product: Option<String>,
        /// Description
        #[arg(long)]
        description: Option<String>,
    },
    /// List purchases, newest first
    List {
        /// Only purchases with a field containing this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show purchase details
    Show {
        /// Purchase ID ("pur-3" or "3")
        purchase: String,
    },
    /// Edit a purchase
    Edit {
        /// Purchase ID
        purchase: String,
        /// New date
        #[arg(long)]
        date: Option<String>,
        /// New supplier
        #[arg(short, long)]
        supplier: Option<String>,
        /// New document
        #[arg(short, long)]
        document: Option<String>,
        /// New invoice number
        #[arg(short, long)]
        invoice: Option<String>,
        /// New product
        #[arg(short, long)]
        product: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New value
        #[arg(short, long)]
        value: Option<String>,
    },
    /// Delete a purchase
    Delete {
        /// Purchase ID
        purchase: String,
    },
}

/// Handle a purchase command
pub fn handle_purchase_command(storage: &Storage, cmd: PurchaseCommands) -> BackofficeResult<()> {
    let service = PurchaseService::new(storage);
    let clock = SystemClock;

    match cmd {
        PurchaseCommands::Add {
            supplier,
            value,
            date,
            document,
            invoice,
            product,
            description,
        } => {
            let date = match date {
                Some(d) => start_of_day(&clock, &d)?,
                None => clock.now(),
            };

            let mut draft = PurchaseDraft::new(date, supplier, parse_value(&value)?);
            draft.document = document.unwrap_or_default();
            draft.invoice_number = invoice.unwrap_or_default();
            draft.product = product.unwrap_or_default();
            draft.description = description.unwrap_or_default();

            let purchase = service.create(draft)?;
            println!("Recorded purchase from {}", purchase.supplier);
            println!("  Value: {}", purchase.value);
            println!("  ID: {}", purchase.id);
        }

        PurchaseCommands::List { search } => {
            let purchases = match search {
                Some(query) => service.search(&query)?,
                None => service.list()?,
            };
            print!("{}", format_purchase_list(&purchases, &clock));
        }

        PurchaseCommands::Show { purchase } => {
            let found = service.require(&purchase)?;
            print!("{}", format_purchase_details(&found, &clock));
        }

        PurchaseCommands::Edit {
            purchase,
            date,
            supplier,
            document,
            invoice,
            product,
            description,
            value,
        } => {
            let found = service.require(&purchase)?;

            let patch = PurchasePatch {
                date: date.as_deref().map(|d| start_of_day(&clock, d)).transpose()?,
                supplier,
                document,
                invoice_number: invoice,
                product,
                description,
                value: value.as_deref().map(parse_value).transpose()?,
            };

            if patch.is_empty() {
                println!("No changes specified. Use --help to see the editable fields.");
                return Ok(());
            }

            let updated = service.update(found.id, patch)?;
            println!("Updated purchase {} ({})", updated.id, updated.value);
        }

        PurchaseCommands::Delete { purchase } => {
            let found = service.require(&purchase)?;
            let removed = service.delete(found.id)?;
            println!("Deleted purchase {} from {}", removed.id, removed.supplier);
        }
    }

    Ok(())
}

/// Local midnight of a typed date, as an instant
fn start_of_day(clock: &dyn Clock, date: &str) -> BackofficeResult<DateTime<Utc>> {
    let date = parse_date(date).map_err(|e| BackofficeError::Validation(e.to_string()))?;
    Ok(clock.from_local(date.and_time(NaiveTime::MIN)))
}
