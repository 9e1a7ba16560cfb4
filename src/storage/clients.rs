//! Client repository
//!
//! Clients are stored in clients.json.

use crate::audit::EntityType;
use crate::models::{Client, ClientId};

use super::collection::{JsonCollection, Record};

impl Record for Client {
    type Id = ClientId;
    const ENTITY: EntityType = EntityType::Client;

    fn id(&self) -> ClientId {
        self.id
    }

    fn set_id(&mut self, id: ClientId) {
        self.id = id;
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

/// Repository for client persistence
pub type ClientRepository = JsonCollection<Client>;
