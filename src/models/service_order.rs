//! Service order model
//!
//! A unit of paid work for a client. Orders carry a sequential order number,
//! a priority, a workflow status and the amount charged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::ids::{ClientId, ServiceOrderId};
use super::money::Money;

/// How urgent an order is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn all() -> [Self; 4] {
        [Self::Low, Self::Normal, Self::High, Self::Urgent]
    }

    /// Display label used in listings and spreadsheets
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Baixa",
            Self::Normal => "Normal",
            Self::High => "Alta",
            Self::Urgent => "Urgente",
        }
    }

    /// Parse from either the stored key or the display label
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "baixa" => Some(Self::Low),
            "normal" => Some(Self::Normal),
            "high" | "alta" => Some(Self::High),
            "urgent" | "urgente" => Some(Self::Urgent),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Where an order is in its workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn all() -> [Self; 4] {
        [
            Self::Pending,
            Self::InProgress,
            Self::Completed,
            Self::Cancelled,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::InProgress => "Em Andamento",
            Self::Completed => "Concluída",
            Self::Cancelled => "Cancelada",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "pending" | "pendente" => Some(Self::Pending),
            "in_progress" | "em_andamento" => Some(Self::InProgress),
            "completed" | "concluída" | "concluida" => Some(Self::Completed),
            "cancelled" | "canceled" | "cancelada" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A service order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    /// Store-assigned identifier
    #[serde(default)]
    pub id: ServiceOrderId,

    /// Sequential number shown to the client (not guaranteed unique)
    #[serde(deserialize_with = "number_or_string")]
    pub order_number: u64,

    pub client_id: ClientId,

    /// Client name as it was when the order was last written
    #[serde(default)]
    pub client_name: String,

    #[serde(default)]
    pub product: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub status: OrderStatus,

    #[serde(default)]
    pub value: Money,

    /// When the order was opened
    pub date: DateTime<Utc>,
}

/// The fields a person fills in when opening an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOrderDraft {
    /// Defaults to the last order number + 1
    pub order_number: Option<u64>,
    pub client_id: ClientId,
    pub product: String,
    pub description: String,
    pub observation: Option<String>,
    pub priority: Priority,
    pub status: OrderStatus,
    pub value: Money,
}

impl ServiceOrderDraft {
    pub fn new(client_id: ClientId, product: impl Into<String>, value: Money) -> Self {
        Self {
            order_number: None,
            client_id,
            product: product.into(),
            description: String::new(),
            observation: None,
            priority: Priority::default(),
            status: OrderStatus::default(),
            value,
        }
    }
}

/// A partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceOrderPatch {
    pub order_number: Option<u64>,
    pub client_id: Option<ClientId>,
    pub product: Option<String>,
    pub description: Option<String>,
    /// `Some("")` clears the observation
    pub observation: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<OrderStatus>,
    pub value: Option<Money>,
}

impl ServiceOrderPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ServiceOrder {
    /// Build an order from a draft; the caller resolves number, client name and date
    pub fn from_draft(
        id: ServiceOrderId,
        order_number: u64,
        client_name: String,
        draft: ServiceOrderDraft,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            order_number,
            client_id: draft.client_id,
            client_name,
            product: draft.product,
            description: draft.description,
            observation: draft.observation.filter(|o| !o.trim().is_empty()),
            priority: draft.priority,
            status: draft.status,
            value: draft.value,
            date,
        }
    }

    /// Apply a partial update (client name is re-resolved by the caller)
    pub fn apply(&mut self, patch: ServiceOrderPatch) {
        let ServiceOrderPatch {
            order_number,
            client_id,
            product,
            description,
            observation,
            priority,
            status,
            value,
        } = patch;

        if let Some(v) = order_number {
            self.order_number = v;
        }
        if let Some(v) = client_id {
            self.client_id = v;
        }
        if let Some(v) = product {
            self.product = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = observation {
            self.observation = if v.trim().is_empty() { None } else { Some(v) };
        }
        if let Some(v) = priority {
            self.priority = v;
        }
        if let Some(v) = status {
            self.status = v;
        }
        if let Some(v) = value {
            self.value = v;
        }
    }

    /// Case-insensitive match against every visible field
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        let order_number = self.order_number.to_string();
        let value = self.value.to_string();
        let date = self.date.format("%d/%m/%Y").to_string();
        let fields: [&str; 9] = [
            &order_number,
            &self.client_name,
            &self.product,
            &self.description,
            self.observation.as_deref().unwrap_or(""),
            self.priority.label(),
            self.status.label(),
            &value,
            &date,
        ];
        fields
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Order numbers typed into a form may have been stored as strings
fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid order number: {:?}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> ServiceOrder {
        let mut draft = ServiceOrderDraft::new(ClientId::new(1), "Notebook", Money::from_cents(25000));
        draft.description = "Troca de tela".into();
        draft.observation = Some(String::new());
        ServiceOrder::from_draft(
            ServiceOrderId::new(1),
            7,
            "Maria Souza".into(),
            draft,
            Utc.with_ymd_and_hms(2024, 3, 10, 14, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_labels() {
        assert_eq!(Priority::Urgent.label(), "Urgente");
        assert_eq!(OrderStatus::InProgress.to_string(), "Em Andamento");
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!(Priority::parse("ALTA"), Some(Priority::High));
        assert_eq!(Priority::parse("urgent"), Some(Priority::Urgent));
        assert_eq!(OrderStatus::parse("in-progress"), Some(OrderStatus::InProgress));
        assert_eq!(OrderStatus::parse("Em Andamento"), Some(OrderStatus::InProgress));
        assert_eq!(OrderStatus::parse("done"), None);
    }

    #[test]
    fn test_enum_serialization_keys() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), "\"low\"");
    }

    #[test]
    fn test_order_number_accepts_strings() {
        let json = r#"{"id":3,"orderNumber":"15","clientId":2,"clientName":"Ana",
            "product":"Impressora","description":"","priority":"high",
            "status":"completed","value":80.5,"date":"2024-03-01T12:00:00.000Z"}"#;
        let order: ServiceOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_number, 15);
        assert_eq!(order.value, Money::from_cents(8050));
        assert_eq!(order.status, OrderStatus::Completed);
    }

    #[test]
    fn test_apply_patch() {
        let mut order = sample();
        order.apply(ServiceOrderPatch {
            status: Some(OrderStatus::Completed),
            value: Some(Money::from_cents(30000)),
            ..ServiceOrderPatch::default()
        });
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.value.cents(), 30000);
        assert_eq!(order.product, "Notebook");
        assert_eq!(order.observation, None);
    }

    #[test]
    fn test_matches() {
        let order = sample();
        assert!(order.matches("tela"));
        assert!(order.matches("pendente"));
        assert!(order.matches("10/03/2024"));
        assert!(!order.matches("geladeira"));
    }
}
