//! Service order service
//!
//! Opening, editing and listing service orders. Orders keep a copy of their
//! client's name; it is refreshed on every edit, and listings show the
//! client's current name whenever the client still exists.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{
    Client, ClientId, Money, ServiceOrder, ServiceOrderDraft, ServiceOrderId, ServiceOrderPatch,
};
use crate::storage::Storage;

/// Service for service order management
pub struct ServiceOrderService<'a> {
    storage: &'a Storage,
    clock: &'a dyn Clock,
}

impl<'a> ServiceOrderService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self::with_clock(storage, &SystemClock)
    }

    pub fn with_clock(storage: &'a Storage, clock: &'a dyn Clock) -> Self {
        Self { storage, clock }
    }

    /// Suggested number for the next order (highest in use + 1)
    pub fn next_order_number(&self) -> BackofficeResult<u64> {
        Ok(self.storage.service_orders.max_order_number()? + 1)
    }

    /// Open a new order dated now
    pub fn create(&self, draft: ServiceOrderDraft) -> BackofficeResult<ServiceOrder> {
        let client = self.require_client(draft.client_id)?;
        validate_fields(&draft.product, draft.value)?;

        let order_number = match draft.order_number {
            Some(n) => n,
            None => self.next_order_number()?,
        };
        self.warn_on_duplicate_number(order_number, None)?;

        let date = self.clock.now();
        let order = self.storage.service_orders.insert_with(|id| {
            ServiceOrder::from_draft(id, order_number, client.name, draft, date)
        })?;

        self.storage.log_create(&order);
        info!(order = %order.id, number = order.order_number, "service order created");

        Ok(order)
    }

    /// Get an order by ID
    pub fn get(&self, id: ServiceOrderId) -> BackofficeResult<Option<ServiceOrder>> {
        self.storage.service_orders.get(id)
    }

    /// Find an order by ID ("os-3") or by order number ("#15" or "15")
    ///
    /// A bare number is tried as an order number first.
    pub fn find(&self, identifier: &str) -> BackofficeResult<Option<ServiceOrder>> {
        let identifier = identifier.trim();

        if !identifier.starts_with("os-") {
            if let Ok(number) = identifier.trim_start_matches('#').parse::<u64>() {
                let mut matches = self.storage.service_orders.by_order_number(number)?;
                if !matches.is_empty() {
                    // Duplicated numbers resolve to the most recent order
                    matches.sort_by(|a, b| b.date.cmp(&a.date));
                    return Ok(matches.into_iter().next());
                }
            }
        }

        match identifier.parse::<ServiceOrderId>() {
            Ok(id) => self.storage.service_orders.get(id),
            Err(_) => Ok(None),
        }
    }

    pub fn require(&self, identifier: &str) -> BackofficeResult<ServiceOrder> {
        self.find(identifier)?
            .ok_or_else(|| BackofficeError::service_order_not_found(identifier))
    }

    /// Apply a partial update and refresh the client name
    pub fn update(
        &self,
        id: ServiceOrderId,
        patch: ServiceOrderPatch,
    ) -> BackofficeResult<ServiceOrder> {
        let before = self
            .storage
            .service_orders
            .get(id)?
            .ok_or_else(|| BackofficeError::service_order_not_found(id.to_string()))?;

        if let Some(number) = patch.order_number {
            if number != before.order_number {
                self.warn_on_duplicate_number(number, Some(id))?;
            }
        }

        let mut order = before.clone();
        order.apply(patch);
        validate_fields(&order.product, order.value)?;

        order.client_name = self.require_client(order.client_id)?.name;

        self.storage.service_orders.replace(order.clone())?;
        self.storage.log_update(&before, &order);

        Ok(order)
    }

    /// Delete an order
    pub fn delete(&self, id: ServiceOrderId) -> BackofficeResult<ServiceOrder> {
        let removed = self.storage.service_orders.remove(id)?;
        self.storage.log_delete(&removed);
        info!(order = %id, "service order deleted");
        Ok(removed)
    }

    /// All orders, newest first, with current client names
    pub fn list(&self) -> BackofficeResult<Vec<ServiceOrder>> {
        let names: HashMap<ClientId, String> = self
            .storage
            .clients
            .get_all()?
            .into_iter()
            .map(|c: Client| (c.id, c.name))
            .collect();

        let mut orders = self.storage.service_orders.get_all()?;
        for order in &mut orders {
            if let Some(name) = names.get(&order.client_id) {
                order.client_name = name.clone();
            }
        }
        orders.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    /// Orders matching an optional text query and an optional local date
    pub fn list_matching(
        &self,
        query: Option<&str>,
        date: Option<NaiveDate>,
    ) -> BackofficeResult<Vec<ServiceOrder>> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());

        Ok(self
            .list()?
            .into_iter()
            .filter(|o| query.map_or(true, |q| o.matches(q)))
            .filter(|o| date.map_or(true, |d| self.clock.to_local(o.date).date() == d))
            .collect())
    }

    /// Orders with any field containing the query, newest first
    pub fn search(&self, query: &str) -> BackofficeResult<Vec<ServiceOrder>> {
        self.list_matching(Some(query), None)
    }

    /// Orders opened on a given local date, newest first
    pub fn filter_by_date(&self, date: NaiveDate) -> BackofficeResult<Vec<ServiceOrder>> {
        self.list_matching(None, Some(date))
    }

    /// The most recent orders by date
    pub fn recent(&self, limit: usize) -> BackofficeResult<Vec<ServiceOrder>> {
        let mut orders = self.list()?;
        orders.truncate(limit);
        Ok(orders)
    }

    fn require_client(&self, client_id: ClientId) -> BackofficeResult<Client> {
        self.storage
            .clients
            .get(client_id)?
            .ok_or_else(|| BackofficeError::client_not_found(client_id.to_string()))
    }

    fn warn_on_duplicate_number(
        &self,
        number: u64,
        exclude: Option<ServiceOrderId>,
    ) -> BackofficeResult<()> {
        let clash = self
            .storage
            .service_orders
            .by_order_number(number)?
            .into_iter()
            .any(|o| Some(o.id) != exclude);
        if clash {
            warn!(number, "order number already in use");
        }
        Ok(())
    }
}

fn validate_fields(product: &str, value: Money) -> BackofficeResult<()> {
    if product.trim().is_empty() {
        return Err(BackofficeError::Validation("Product cannot be empty".into()));
    }
    if value.is_negative() {
        return Err(BackofficeError::Validation(format!(
            "Order value cannot be negative: {}",
            value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::paths::BackofficePaths;
    use crate::models::{ClientDraft, ClientPatch, OrderStatus};
    use crate::services::ClientService;
    use chrono::{Duration, FixedOffset, TimeZone, Utc};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn add_client(storage: &Storage, name: &str) -> Client {
        ClientService::new(storage)
            .create(ClientDraft::new(name, "12345678909"))
            .unwrap()
    }

    fn draft(client: &Client, product: &str) -> ServiceOrderDraft {
        ServiceOrderDraft::new(client.id, product, Money::from_cents(15000))
    }

    #[test]
    fn test_create_assigns_number_name_and_date() {
        let (_temp, storage) = create_test_storage();
        let client = add_client(&storage, "Maria");
        let clock = FixedClock::utc(Utc.with_ymd_and_hms(2024, 3, 10, 15, 30, 0).unwrap());
        let service = ServiceOrderService::with_clock(&storage, &clock);

        assert_eq!(service.next_order_number().unwrap(), 1);
        let first = service.create(draft(&client, "Notebook")).unwrap();
        assert_eq!(first.order_number, 1);
        assert_eq!(first.client_name, "Maria");
        assert_eq!(first.date, clock.now());
        assert_eq!(first.status, OrderStatus::Pending);

        let mut numbered = draft(&client, "Monitor");
        numbered.order_number = Some(40);
        service.create(numbered).unwrap();
        assert_eq!(service.next_order_number().unwrap(), 41);
    }

    #[test]
    fn test_create_requires_existing_client() {
        let (_temp, storage) = create_test_storage();
        let service = ServiceOrderService::new(&storage);

        let err = service
            .create(ServiceOrderDraft::new(ClientId::new(3), "Notebook", Money::zero()))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Client not found: cli-3");
        assert_eq!(storage.service_orders.count().unwrap(), 0);
    }

    #[test]
    fn test_create_rejects_negative_value() {
        let (_temp, storage) = create_test_storage();
        let client = add_client(&storage, "Maria");
        let service = ServiceOrderService::new(&storage);

        let err = service
            .create(ServiceOrderDraft::new(client.id, "Notebook", Money::from_cents(-1)))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_duplicate_numbers_are_allowed() {
        let (_temp, storage) = create_test_storage();
        let client = add_client(&storage, "Maria");
        let service = ServiceOrderService::new(&storage);

        let mut a = draft(&client, "A");
        a.order_number = Some(7);
        let mut b = draft(&client, "B");
        b.order_number = Some(7);
        service.create(a).unwrap();
        service.create(b).unwrap();

        assert_eq!(storage.service_orders.by_order_number(7).unwrap().len(), 2);
    }

    #[test]
    fn test_update_re_resolves_client_name() {
        let (_temp, storage) = create_test_storage();
        let maria = add_client(&storage, "Maria");
        let joao = add_client(&storage, "João");
        let service = ServiceOrderService::new(&storage);
        let order = service.create(draft(&maria, "Notebook")).unwrap();

        ClientService::new(&storage)
            .update(
                maria.id,
                ClientPatch {
                    name: Some("Maria Souza".into()),
                    ..ClientPatch::default()
                },
            )
            .unwrap();

        // Stored snapshot is stale until the order is edited
        assert_eq!(storage.service_orders.get(order.id).unwrap().unwrap().client_name, "Maria");
        // Listings show the live name
        assert_eq!(service.list().unwrap()[0].client_name, "Maria Souza");

        let edited = service
            .update(
                order.id,
                ServiceOrderPatch {
                    status: Some(OrderStatus::InProgress),
                    ..ServiceOrderPatch::default()
                },
            )
            .unwrap();
        assert_eq!(edited.client_name, "Maria Souza");

        let moved = service
            .update(
                order.id,
                ServiceOrderPatch {
                    client_id: Some(joao.id),
                    ..ServiceOrderPatch::default()
                },
            )
            .unwrap();
        assert_eq!(moved.client_name, "João");
        assert_eq!(moved.date, order.date);
    }

    #[test]
    fn test_update_to_missing_client_fails() {
        let (_temp, storage) = create_test_storage();
        let maria = add_client(&storage, "Maria");
        let service = ServiceOrderService::new(&storage);
        let order = service.create(draft(&maria, "Notebook")).unwrap();

        let err = service
            .update(
                order.id,
                ServiceOrderPatch {
                    client_id: Some(ClientId::new(77)),
                    ..ServiceOrderPatch::default()
                },
            )
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            storage.service_orders.get(order.id).unwrap().unwrap().client_id,
            maria.id
        );
    }

    #[test]
    fn test_list_newest_first_and_recent() {
        let (_temp, storage) = create_test_storage();
        let client = add_client(&storage, "Maria");
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        for day in 0..7 {
            let clock = FixedClock::utc(start + Duration::days(day));
            ServiceOrderService::with_clock(&storage, &clock)
                .create(draft(&client, &format!("Item {}", day)))
                .unwrap();
        }

        let service = ServiceOrderService::new(&storage);
        let recent = service.recent(5).unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].product, "Item 6");
        assert_eq!(recent[4].product, "Item 2");
    }

    #[test]
    fn test_search_and_date_filter() {
        let (_temp, storage) = create_test_storage();
        let client = add_client(&storage, "Maria");
        // 01:00 UTC on the 11th is the 10th in UTC-3
        let instant = Utc.with_ymd_and_hms(2024, 3, 11, 1, 0, 0).unwrap();
        let clock = FixedClock::with_offset(instant, FixedOffset::west_opt(3 * 3600).unwrap());
        let service = ServiceOrderService::with_clock(&storage, &clock);

        service.create(draft(&client, "Geladeira")).unwrap();

        assert_eq!(service.search("GELADEIRA").unwrap().len(), 1);
        assert!(service.search("fogão").unwrap().is_empty());

        let tenth = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let eleventh = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        assert_eq!(service.filter_by_date(tenth).unwrap().len(), 1);
        assert!(service.filter_by_date(eleventh).unwrap().is_empty());
        assert_eq!(
            service.list_matching(Some("geladeira"), Some(tenth)).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_find_by_number_or_id() {
        let (_temp, storage) = create_test_storage();
        let client = add_client(&storage, "Maria");
        let service = ServiceOrderService::new(&storage);

        let mut numbered = draft(&client, "Notebook");
        numbered.order_number = Some(15);
        let order = service.create(numbered).unwrap();

        assert_eq!(service.find("#15").unwrap().unwrap().id, order.id);
        assert_eq!(service.find("15").unwrap().unwrap().id, order.id);
        assert_eq!(service.find("os-1").unwrap().unwrap().id, order.id);
        assert!(service.find("os-9").unwrap().is_none());
        assert!(service.require("99").unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete() {
        let (_temp, storage) = create_test_storage();
        let client = add_client(&storage, "Maria");
        let service = ServiceOrderService::new(&storage);
        let order = service.create(draft(&client, "Notebook")).unwrap();

        service.delete(order.id).unwrap();
        assert!(service.get(order.id).unwrap().is_none());
        assert!(service.delete(order.id).unwrap_err().is_not_found());
        assert!(storage.can_delete_client(client.id).unwrap());
    }
}
