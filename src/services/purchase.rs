//! Purchase service

use tracing::info;

use crate::error::{BackofficeError, BackofficeResult};
use crate::models::document::{digits, format_document};
use crate::models::{Money, Purchase, PurchaseDraft, PurchaseId, PurchasePatch};
use crate::storage::Storage;

/// Service for purchase management
pub struct PurchaseService<'a> {
    storage: &'a Storage,
}

impl<'a> PurchaseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a purchase
    pub fn create(&self, mut draft: PurchaseDraft) -> BackofficeResult<Purchase> {
        draft.supplier = draft.supplier.trim().to_string();
        draft.document = tidy_document(&draft.document);
        validate(&draft.supplier, draft.value)?;

        let purchase = self
            .storage
            .purchases
            .insert_with(|id| Purchase::from_draft(id, draft))?;

        self.storage.log_create(&purchase);
        info!(purchase = %purchase.id, "purchase recorded");

        Ok(purchase)
    }

    pub fn get(&self, id: PurchaseId) -> BackofficeResult<Option<Purchase>> {
        self.storage.purchases.get(id)
    }

    pub fn require(&self, identifier: &str) -> BackofficeResult<Purchase> {
        let found = match identifier.parse::<PurchaseId>() {
            Ok(id) => self.storage.purchases.get(id)?,
            Err(_) => None,
        };
        found.ok_or_else(|| BackofficeError::purchase_not_found(identifier))
    }

    /// Apply a partial update
    pub fn update(&self, id: PurchaseId, mut patch: PurchasePatch) -> BackofficeResult<Purchase> {
        let before = self
            .storage
            .purchases
            .get(id)?
            .ok_or_else(|| BackofficeError::purchase_not_found(id.to_string()))?;

        patch.supplier = patch.supplier.map(|s| s.trim().to_string());
        patch.document = patch.document.map(|d| tidy_document(&d));

        let mut purchase = before.clone();
        purchase.apply(patch);
        validate(&purchase.supplier, purchase.value)?;

        self.storage.purchases.replace(purchase.clone())?;
        self.storage.log_update(&before, &purchase);

        Ok(purchase)
    }

    pub fn delete(&self, id: PurchaseId) -> BackofficeResult<Purchase> {
        let removed = self.storage.purchases.remove(id)?;
        self.storage.log_delete(&removed);
        Ok(removed)
    }

    /// All purchases, newest first
    pub fn list(&self) -> BackofficeResult<Vec<Purchase>> {
        let mut purchases = self.storage.purchases.get_all()?;
        purchases.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(purchases)
    }

    /// Purchases with any field containing the query, newest first
    pub fn search(&self, query: &str) -> BackofficeResult<Vec<Purchase>> {
        let query = query.trim();
        let purchases = self.list()?;
        if query.is_empty() {
            return Ok(purchases);
        }
        Ok(purchases.into_iter().filter(|p| p.matches(query)).collect())
    }
}

/// Punctuate a CPF/CNPJ when it has the right length, otherwise keep as typed
fn tidy_document(document: &str) -> String {
    match digits(document).len() {
        11 | 14 => format_document(document),
        _ => document.trim().to_string(),
    }
}

fn validate(supplier: &str, value: Money) -> BackofficeResult<()> {
    if supplier.is_empty() {
        return Err(BackofficeError::Validation("Supplier cannot be empty".into()));
    }
    if value.is_negative() {
        return Err(BackofficeError::Validation(format!(
            "Purchase value cannot be negative: {}",
            value
        )));
    }
    Ok(())
}
