//! Client service
//!
//! Validation and normalization of client records, plus the deletion guard
//! that protects clients referenced by service orders.

use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::document::{format_document, validate_document};
use crate::models::{Client, ClientDraft, ClientId, ClientPatch};
use crate::storage::Storage;

/// Service for client management
pub struct ClientService<'a> {
    storage: &'a Storage,
    clock: &'a dyn Clock,
}

impl<'a> ClientService<'a> {
    /// Create a new client service using the system clock
    pub fn new(storage: &'a Storage) -> Self {
        Self::with_clock(storage, &SystemClock)
    }

    pub fn with_clock(storage: &'a Storage, clock: &'a dyn Clock) -> Self {
        Self { storage, clock }
    }

    /// Register a new client
    pub fn create(&self, mut draft: ClientDraft) -> BackofficeResult<Client> {
        draft.name = validate_name(&draft.name)?;
        draft.document = normalize_document(&draft.document)?;
        validate_email(&draft.email)?;

        let created_at = self.clock.now();
        let client = self
            .storage
            .clients
            .insert_with(|id| Client::from_draft(id, draft, created_at))?;

        self.storage.log_create(&client);
        info!(client = %client.id, "client created");

        Ok(client)
    }

    /// Get a client by ID
    pub fn get(&self, id: ClientId) -> BackofficeResult<Option<Client>> {
        self.storage.clients.get(id)
    }

    /// Find a client by ID ("7" or "cli-7") or by exact name (case-insensitive)
    pub fn find(&self, identifier: &str) -> BackofficeResult<Option<Client>> {
        if let Ok(id) = identifier.parse::<ClientId>() {
            if let Some(client) = self.storage.clients.get(id)? {
                return Ok(Some(client));
            }
        }

        let wanted = identifier.trim().to_lowercase();
        Ok(self
            .storage
            .clients
            .get_all()?
            .into_iter()
            .find(|c| c.name.to_lowercase() == wanted))
    }

    /// Resolve an identifier or fail with a "not found" error
    pub fn require(&self, identifier: &str) -> BackofficeResult<Client> {
        self.find(identifier)?
            .ok_or_else(|| BackofficeError::client_not_found(identifier))
    }

    /// All clients, sorted by name
    pub fn list(&self) -> BackofficeResult<Vec<Client>> {
        let mut clients = self.storage.clients.get_all()?;
        clients.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        Ok(clients)
    }

    /// Clients with any field containing the query, sorted by name
    pub fn search(&self, query: &str) -> BackofficeResult<Vec<Client>> {
        let clients = self.list()?;
        if query.trim().is_empty() {
            return Ok(clients);
        }
        Ok(clients.into_iter().filter(|c| c.matches(query.trim())).collect())
    }

    /// Apply a partial update
    pub fn update(&self, id: ClientId, mut patch: ClientPatch) -> BackofficeResult<Client> {
        let before = self
            .storage
            .clients
            .get(id)?
            .ok_or_else(|| BackofficeError::client_not_found(id.to_string()))?;

        patch.name = patch.name.as_deref().map(validate_name).transpose()?;
        patch.document = patch
            .document
            .as_deref()
            .map(normalize_document)
            .transpose()?;
        if let Some(email) = &patch.email {
            validate_email(email)?;
        }

        let mut client = before.clone();
        client.apply(patch);
        self.storage.clients.replace(client.clone())?;

        self.storage.log_update(&before, &client);

        Ok(client)
    }

    /// Delete a client that no service order references
    pub fn delete(&self, id: ClientId) -> BackofficeResult<Client> {
        let client = self
            .storage
            .clients
            .get(id)?
            .ok_or_else(|| BackofficeError::client_not_found(id.to_string()))?;

        if !self.storage.can_delete_client(id)? {
            let count = self.storage.service_orders.count_by_client(id)?;
            return Err(BackofficeError::LinkedServiceOrders {
                client: client.name,
                count,
            });
        }

        let removed = self.storage.clients.remove(id)?;
        self.storage.log_delete(&removed);
        info!(client = %id, "client deleted");

        Ok(removed)
    }
}

fn validate_name(name: &str) -> BackofficeResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BackofficeError::Validation("Client name cannot be empty".into()));
    }
    Ok(name.to_string())
}

fn normalize_document(document: &str) -> BackofficeResult<String> {
    validate_document(document).map_err(BackofficeError::Validation)?;
    Ok(format_document(document))
}

fn validate_email(email: &str) -> BackofficeResult<()> {
    let email = email.trim();
    if !email.is_empty() && !email.contains('@') {
        return Err(BackofficeError::Validation(format!(
            "Invalid email address: {}",
            email
        )));
    }
    Ok(())
}
