//! Client CLI commands

use clap::{Args, Subcommand};

use crate::display::client::{format_client_details, format_client_list};
use crate::error::BackofficeResult;
use crate::models::{ClientDraft, ClientPatch};
use crate::services::ClientService;
use crate::storage::Storage;

/// Address fields shared by `add` and `edit`
#[derive(Args, Debug, Default)]
pub struct AddressArgs {
    /// Postal code (CEP)
    #[arg(long)]
    pub cep: Option<String>,
    /// Street
    #[arg(long)]
    pub street: Option<String>,
    /// House number
    #[arg(long)]
    pub number: Option<String>,
    /// Complement (apartment, block...)
    #[arg(long)]
    pub complement: Option<String>,
    /// Neighborhood
    #[arg(long)]
    pub neighborhood: Option<String>,
    /// City
    #[arg(long)]
    pub city: Option<String>,
    /// State (UF)
    #[arg(long)]
    pub state: Option<String>,
}

/// Client subcommands
#[derive(Subcommand, Debug)]
pub enum ClientCommands {
    /// Register a new client
    Add {
        /// Client name
        name: String,
        /// CPF (11 digits) or CNPJ (14 digits)
        document: String,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
        /// Phone number
        #[arg(short, long)]
        phone: Option<String>,
        #[command(flatten)]
        address: AddressArgs,
    },
    /// List clients
    List {
        /// Only clients with a field containing this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show client details
    Show {
        /// Client name or ID
        client: String,
    },
    /// Edit a client
    Edit {
        /// Client name or ID
        client: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New CPF or CNPJ
        #[arg(short, long)]
        document: Option<String>,
        /// New email
        #[arg(short, long)]
        email: Option<String>,
        /// New phone
        #[arg(short, long)]
        phone: Option<String>,
        #[command(flatten)]
        address: AddressArgs,
    },
    /// Delete a client without service orders
    Delete {
        /// Client name or ID
        client: String,
    },
}

/// Handle a client command
pub fn handle_client_command(storage: &Storage, cmd: ClientCommands) -> BackofficeResult<()> {
    let service = ClientService::new(storage);

    match cmd {
        ClientCommands::Add {
            name,
            document,
            email,
            phone,
            address,
        } => {
            let draft = ClientDraft {
                name,
                document,
                phone: phone.unwrap_or_default(),
                email: email.unwrap_or_default(),
                postal_code: address.cep.unwrap_or_default(),
                street: address.street.unwrap_or_default(),
                number: address.number.unwrap_or_default(),
                complement: address.complement,
                neighborhood: address.neighborhood.unwrap_or_default(),
                city: address.city.unwrap_or_default(),
                state: address.state.unwrap_or_default(),
            };

            let client = service.create(draft)?;
            println!("Created client: {}", client.name);
            println!("  Document: {}", client.document);
            println!("  ID: {}", client.id);
        }

        ClientCommands::List { search } => {
            let clients = match search {
                Some(query) => service.search(&query)?,
                None => service.list()?,
            };
            print!("{}", format_client_list(&clients));
        }

        ClientCommands::Show { client } => {
            let found = service.require(&client)?;
            let order_count = storage.service_orders.count_by_client(found.id)?;
            print!(
                "{}",
                format_client_details(&found, order_count, &crate::clock::SystemClock)
            );
        }

        ClientCommands::Edit {
            client,
            name,
            document,
            email,
            phone,
            address,
        } => {
            let found = service.require(&client)?;

            let patch = ClientPatch {
                name,
                document,
                phone,
                email,
                postal_code: address.cep,
                street: address.street,
                number: address.number,
                complement: address.complement,
                neighborhood: address.neighborhood,
                city: address.city,
                state: address.state,
            };

            if patch.is_empty() {
                println!("No changes specified. Use --help to see the editable fields.");
                return Ok(());
            }

            let updated = service.update(found.id, patch)?;
            println!("Updated client: {}", updated.name);
        }

        ClientCommands::Delete { client } => {
            let found = service.require(&client)?;
            let removed = service.delete(found.id)?;
            println!("Deleted client: {}", removed.name);
        }
    }

    Ok(())
}
