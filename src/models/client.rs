//! Client model
//!
//! A customer of the business, referenced by service orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ClientId;

/// A client record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Store-assigned identifier
    #[serde(default)]
    pub id: ClientId,

    pub name: String,

    /// CPF or CNPJ, punctuated
    #[serde(default)]
    pub document: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub email: String,

    /// Postal code (CEP)
    #[serde(rename = "cep", default)]
    pub postal_code: String,

    #[serde(default)]
    pub street: String,

    #[serde(default)]
    pub number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,

    #[serde(default)]
    pub neighborhood: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub state: String,

    /// When the client was registered
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// The fields a person fills in when registering a client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientDraft {
    pub name: String,
    pub document: String,
    pub phone: String,
    pub email: String,
    pub postal_code: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

impl ClientDraft {
    /// Start a draft with the two required fields
    pub fn new(name: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document: document.into(),
            ..Self::default()
        }
    }
}

/// A partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub document: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub postal_code: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    /// `Some("")` clears the complement
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl ClientPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Client {
    /// Build a client from a draft with a store-assigned ID
    pub fn from_draft(id: ClientId, draft: ClientDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            document: draft.document,
            phone: draft.phone,
            email: draft.email,
            postal_code: draft.postal_code,
            street: draft.street,
            number: draft.number,
            complement: draft.complement.filter(|c| !c.trim().is_empty()),
            neighborhood: draft.neighborhood,
            city: draft.city,
            state: draft.state,
            created_at,
        }
    }

    /// Apply a partial update
    pub fn apply(&mut self, patch: ClientPatch) {
        let ClientPatch {
            name,
            document,
            phone,
            email,
            postal_code,
            street,
            number,
            complement,
            neighborhood,
            city,
            state,
        } = patch;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = document {
            self.document = v;
        }
        if let Some(v) = phone {
            self.phone = v;
        }
        if let Some(v) = email {
            self.email = v;
        }
        if let Some(v) = postal_code {
            self.postal_code = v;
        }
        if let Some(v) = street {
            self.street = v;
        }
        if let Some(v) = number {
            self.number = v;
        }
        if let Some(v) = complement {
            self.complement = if v.trim().is_empty() { None } else { Some(v) };
        }
        if let Some(v) = neighborhood {
            self.neighborhood = v;
        }
        if let Some(v) = city {
            self.city = v;
        }
        if let Some(v) = state {
            self.state = v;
        }
    }

    /// Single-line address for display
    pub fn address_line(&self) -> String {
        let mut line = format!("{}, {}", self.street, self.number);
        if let Some(complement) = &self.complement {
            line.push_str(" - ");
            line.push_str(complement);
        }
        format!(
            "{} - {}, {}/{} - CEP {}",
            line, self.neighborhood, self.city, self.state, self.postal_code
        )
    }

    /// Case-insensitive match against every visible field
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        let id = self.id.get().to_string();
        let fields: [&str; 12] = [
            &id,
            &self.name,
            &self.document,
            &self.phone,
            &self.email,
            &self.postal_code,
            &self.street,
            &self.number,
            self.complement.as_deref().unwrap_or(""),
            &self.neighborhood,
            &self.city,
            &self.state,
        ];
        fields
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Client {
        let mut draft = ClientDraft::new("Maria Souza", "123.456.789-09");
        draft.city = "Campinas".into();
        draft.state = "SP".into();
        draft.street = "Rua das Flores".into();
        draft.number = "10".into();
        draft.complement = Some("  ".into());
        Client::from_draft(ClientId::new(1), draft, Utc::now())
    }

    #[test]
    fn test_blank_complement_is_dropped() {
        assert_eq!(sample().complement, None);
    }

    #[test]
    fn test_apply_patch() {
        let mut client = sample();
        client.apply(ClientPatch {
            name: Some("Maria S. Souza".into()),
            complement: Some("Apto 3".into()),
            ..ClientPatch::default()
        });

        assert_eq!(client.name, "Maria S. Souza");
        assert_eq!(client.complement.as_deref(), Some("Apto 3"));
        assert_eq!(client.city, "Campinas");

        client.apply(ClientPatch {
            complement: Some(String::new()),
            ..ClientPatch::default()
        });
        assert_eq!(client.complement, None);
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let client = sample();
        assert!(client.matches("maria"));
        assert!(client.matches("CAMPINAS"));
        assert!(client.matches("456.789"));
        assert!(!client.matches("Recife"));
    }

    #[test]
    fn test_camel_case_serialization() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("cep").is_some());
        assert!(json.get("complement").is_none());
    }
}
