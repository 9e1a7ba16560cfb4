//! Service order repository
//!
//! Service orders are stored in service_orders.json, with lookups by client
//! and by order number on top of the generic collection.

use crate::audit::EntityType;
use crate::clock::Clock;
use crate::error::BackofficeResult;
use crate::models::{ClientId, DateWindow, ServiceOrder, ServiceOrderId};

use super::collection::{JsonCollection, Record};

impl Record for ServiceOrder {
    type Id = ServiceOrderId;
    const ENTITY: EntityType = EntityType::ServiceOrder;

    fn id(&self) -> ServiceOrderId {
        self.id
    }

    fn set_id(&mut self, id: ServiceOrderId) {
        self.id = id;
    }

    fn label(&self) -> String {
        format!("OS {} - {}", self.order_number, self.client_name)
    }
}

/// Repository for service order persistence
pub type ServiceOrderRepository = JsonCollection<ServiceOrder>;

impl JsonCollection<ServiceOrder> {
    /// Orders that reference a client
    pub fn by_client(&self, client_id: ClientId) -> BackofficeResult<Vec<ServiceOrder>> {
        self.filter(|o| o.client_id == client_id)
    }

    /// Number of orders that reference a client
    pub fn count_by_client(&self, client_id: ClientId) -> BackofficeResult<usize> {
        self.count_where(|o| o.client_id == client_id)
    }

    /// Orders carrying a given order number
    pub fn by_order_number(&self, order_number: u64) -> BackofficeResult<Vec<ServiceOrder>> {
        self.filter(|o| o.order_number == order_number)
    }

    /// Highest order number in use, 0 when there are no orders
    pub fn max_order_number(&self) -> BackofficeResult<u64> {
        Ok(self
            .get_all()?
            .iter()
            .map(|o| o.order_number)
            .max()
            .unwrap_or(0))
    }

    /// Orders whose local date falls inside the window
    pub fn in_window(
        &self,
        window: &DateWindow,
        clock: &dyn Clock,
    ) -> BackofficeResult<Vec<ServiceOrder>> {
        self.filter(|o| window.contains(clock.to_local(o.date)))
    }
}
