//! Purchase model
//!
//! Money spent with suppliers. Purchases have no links to other entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::PurchaseId;
use super::money::Money;

/// A purchase from a supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    #[serde(default)]
    pub id: PurchaseId,

    pub date: DateTime<Utc>,

    #[serde(default)]
    pub supplier: String,

    /// Supplier's CPF or CNPJ
    #[serde(default)]
    pub document: String,

    #[serde(default)]
    pub invoice_number: String,

    #[serde(default)]
    pub product: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub value: Money,
}

/// The fields a person fills in when recording a purchase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseDraft {
    pub date: DateTime<Utc>,
    pub supplier: String,
    pub document: String,
    pub invoice_number: String,
    pub product: String,
    pub description: String,
    pub value: Money,
}

impl PurchaseDraft {
    pub fn new(date: DateTime<Utc>, supplier: impl Into<String>, value: Money) -> Self {
        Self {
            date,
            supplier: supplier.into(),
            document: String::new(),
            invoice_number: String::new(),
            product: String::new(),
            description: String::new(),
            value,
        }
    }
}

/// A partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchasePatch {
    pub date: Option<DateTime<Utc>>,
    pub supplier: Option<String>,
    pub document: Option<String>,
    pub invoice_number: Option<String>,
    pub product: Option<String>,
    pub description: Option<String>,
    pub value: Option<Money>,
}

impl PurchasePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Purchase {
    pub fn from_draft(id: PurchaseId, draft: PurchaseDraft) -> Self {
        Self {
            id,
            date: draft.date,
            supplier: draft.supplier,
            document: draft.document,
            invoice_number: draft.invoice_number,
            product: draft.product,
            description: draft.description,
            value: draft.value,
        }
    }

    pub fn apply(&mut self, patch: PurchasePatch) {
        let PurchasePatch {
            date,
            supplier,
            document,
            invoice_number,
            product,
            description,
            value,
        } = patch;

        if let Some(v) = date {
            self.date = v;
        }
        if let Some(v) = supplier {
            self.supplier = v;
        }
        if let Some(v) = document {
            self.document = v;
        }
        if let Some(v) = invoice_number {
            self.invoice_number = v;
        }
        if let Some(v) = product {
            self.product = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = value {
            self.value = v;
        }
    }

    /// Case-insensitive match against every visible field
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        let date = self.date.format("%d/%m/%Y").to_string();
        let value = self.value.to_string();
        let fields: [&str; 7] = [
            &date,
            &self.supplier,
            &self.document,
            &self.invoice_number,
            &self.product,
            &self.description,
            &value,
        ];
        fields
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}
