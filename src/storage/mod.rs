//! Storage layer
//!
//! One JSON file per entity type under the data directory, written
//! atomically on every mutation. `Storage` ties the three repositories
//! together with the audit log and owns the operations that span more than
//! one collection: the client deletion guard and the full-dataset replace.

pub mod clients;
pub mod collection;
pub mod file_io;
pub mod init;
pub mod purchases;
pub mod service_orders;

pub use clients::ClientRepository;
pub use collection::{JsonCollection, Record};
pub use file_io::{commit_all, read_json, write_json_atomic};
pub use init::initialize_storage;
pub use purchases::PurchaseRepository;
pub use service_orders::ServiceOrderRepository;

use tracing::{debug, warn};

use crate::audit::{generate_diff, AuditEntry, AuditLogger};
use crate::config::paths::BackofficePaths;
use crate::error::BackofficeError;
use crate::models::{Client, ClientId, Purchase, ServiceOrder};

/// Record counts of a full data set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetCounts {
    pub clients: usize,
    pub service_orders: usize,
    pub purchases: usize,
}

impl std::fmt::Display for DatasetCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} client(s), {} service order(s), {} purchase(s)",
            self.clients, self.service_orders, self.purchases
        )
    }
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BackofficePaths,
    pub clients: ClientRepository,
    pub service_orders: ServiceOrderRepository,
    pub purchases: PurchaseRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance (nothing is loaded yet)
    pub fn new(paths: BackofficePaths) -> Result<Self, BackofficeError> {
        paths.ensure_directories()?;

        Ok(Self {
            clients: ClientRepository::new(paths.clients_file()),
            service_orders: ServiceOrderRepository::new(paths.service_orders_file()),
            purchases: PurchaseRepository::new(paths.purchases_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Create and load in one step
    pub fn open(paths: BackofficePaths) -> Result<Self, BackofficeError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &BackofficePaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), BackofficeError> {
        self.clients.load()?;
        self.service_orders.load()?;
        self.purchases.load()?;
        debug!(counts = %self.counts()?, "loaded data");
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }

    pub fn counts(&self) -> Result<DatasetCounts, BackofficeError> {
        Ok(DatasetCounts {
            clients: self.clients.count()?,
            service_orders: self.service_orders.count()?,
            purchases: self.purchases.count()?,
        })
    }

    /// Whether a client can be removed (no service order references it)
    pub fn can_delete_client(&self, client_id: ClientId) -> Result<bool, BackofficeError> {
        Ok(self.service_orders.count_by_client(client_id)? == 0)
    }

    /// Replace every collection at once
    ///
    /// All three replacements are validated and written to temp files first;
    /// only when every one of them is staged are they renamed over the live
    /// files. In-memory state is then reloaded from disk.
    pub fn bulk_replace(
        &self,
        clients: Vec<Client>,
        service_orders: Vec<ServiceOrder>,
        purchases: Vec<Purchase>,
    ) -> Result<DatasetCounts, BackofficeError> {
        let staged_clients = self.clients.stage_replace(clients)?;

        let staged_orders = match self.service_orders.stage_replace(service_orders) {
            Ok(staged) => staged,
            Err(e) => {
                staged_clients.discard();
                return Err(e);
            }
        };

        let staged_purchases = match self.purchases.stage_replace(purchases) {
            Ok(staged) => staged,
            Err(e) => {
                staged_clients.discard();
                staged_orders.discard();
                return Err(e);
            }
        };

        let counts = DatasetCounts {
            clients: staged_clients.len(),
            service_orders: staged_orders.len(),
            purchases: staged_purchases.len(),
        };

        commit_all(vec![
            staged_clients.into_file(),
            staged_orders.into_file(),
            staged_purchases.into_file(),
        ])?;

        self.load_all()?;
        Ok(counts)
    }

    fn append_audit(&self, entry: AuditEntry) {
        // The mutation is already on disk; a lost audit line must not undo it
        if let Err(e) = self.audit.log(&entry) {
            warn!(error = %e, "failed to write audit entry");
        }
    }

    /// Record a newly created record in the audit log
    pub fn log_create<T: Record>(&self, record: &T) {
        self.append_audit(AuditEntry::create(
            T::ENTITY,
            record.id().to_string(),
            Some(record.label()),
            record,
        ));
    }

    /// Record an edit in the audit log, with a field-level summary
    pub fn log_update<T: Record>(&self, before: &T, after: &T) {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(old), Ok(new)) => generate_diff(&old, &new),
            _ => None,
        };
        self.append_audit(AuditEntry::update(
            T::ENTITY,
            after.id().to_string(),
            Some(after.label()),
            before,
            after,
            diff,
        ));
    }

    /// Record a removal in the audit log
    pub fn log_delete<T: Record>(&self, record: &T) {
        self.append_audit(AuditEntry::delete(
            T::ENTITY,
            record.id().to_string(),
            Some(record.label()),
            record,
        ));
    }

    /// Record a full import in the audit log
    pub fn log_import(&self, source: &str, counts: DatasetCounts) {
        self.append_audit(AuditEntry::import(source, counts.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{ClientDraft, Money, ServiceOrderDraft};
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn add_client(storage: &Storage, name: &str) -> Client {
        let draft = ClientDraft::new(name, "123.456.789-09");
        storage
            .clients
            .insert_with(|id| Client::from_draft(id, draft, Utc::now()))
            .unwrap()
    }

    fn add_order(storage: &Storage, client: &Client) -> ServiceOrder {
        let draft = ServiceOrderDraft::new(client.id, "Notebook", Money::from_cents(1000));
        let name = client.name.clone();
        storage
            .service_orders
            .insert_with(|id| ServiceOrder::from_draft(id, 1, name, draft, Utc::now()))
            .unwrap()
    }

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("backups").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_can_delete_client() {
        let (_temp, storage) = create_storage();
        let free = add_client(&storage, "Ana");
        let linked = add_client(&storage, "Bruno");
        add_order(&storage, &linked);

        assert!(storage.can_delete_client(free.id).unwrap());
        assert!(!storage.can_delete_client(linked.id).unwrap());
    }

    #[test]
    fn test_bulk_replace_swaps_everything() {
        let (_temp, storage) = create_storage();
        let old = add_client(&storage, "Old");
        add_order(&storage, &old);

        let mut new_client = old.clone();
        new_client.id = ClientId::new(50);
        new_client.name = "New".into();

        let counts = storage
            .bulk_replace(vec![new_client], Vec::new(), Vec::new())
            .unwrap();

        assert_eq!(
            counts,
            DatasetCounts {
                clients: 1,
                service_orders: 0,
                purchases: 0
            }
        );
        assert!(storage.clients.get(old.id).unwrap().is_none());
        assert_eq!(
            storage.clients.get(ClientId::new(50)).unwrap().unwrap().name,
            "New"
        );
        assert_eq!(storage.service_orders.count().unwrap(), 0);
    }

    #[test]
    fn test_bulk_replace_failure_leaves_data_intact() {
        let (temp, storage) = create_storage();
        let kept = add_client(&storage, "Kept");
        let order = add_order(&storage, &kept);

        let err = storage
            .bulk_replace(Vec::new(), vec![order.clone(), order], Vec::new())
            .unwrap_err();
        assert!(matches!(err, BackofficeError::Validation(_)));

        // The clients file was staged first and must have been thrown away
        assert!(!temp.path().join("data/clients.json.tmp").exists());

        storage.load_all().unwrap();
        assert_eq!(storage.clients.count().unwrap(), 1);
        assert_eq!(storage.service_orders.count().unwrap(), 1);
    }

    #[test]
    fn test_bulk_replace_commit_failure_keeps_every_file() {
        let (temp, storage) = create_storage();
        let old = add_client(&storage, "Old");

        // A directory where the orders file belongs cannot be replaced
        let orders_path = temp.path().join("data/service_orders.json");
        let _ = std::fs::remove_file(&orders_path);
        std::fs::create_dir(&orders_path).unwrap();

        let mut new_client = old.clone();
        new_client.id = ClientId::new(50);
        new_client.name = "New".into();

        let err = storage
            .bulk_replace(vec![new_client], Vec::new(), Vec::new())
            .unwrap_err();
        assert!(matches!(err, BackofficeError::Storage(_)));

        let on_disk = ClientRepository::new(temp.path().join("data/clients.json"));
        on_disk.load().unwrap();
        let names: Vec<String> = on_disk.get_all().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Old".to_string()]);
        assert_eq!(storage.clients.get(old.id).unwrap().unwrap().name, "Old");
        assert!(!temp.path().join("data/clients.json.tmp").exists());
        assert!(!temp.path().join("data/clients.json.bak").exists());
    }

    #[test]
    fn test_mutations_are_audited() {
        let (_temp, storage) = create_storage();
        let client = add_client(&storage, "Ana");
        storage.log_create(&client);

        let mut edited = client.clone();
        edited.phone = "(11) 99999-0000".into();
        storage.log_update(&client, &edited);

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[1].operation, Operation::Update);
        assert!(entries[1]
            .diff_summary
            .as_deref()
            .unwrap()
            .contains("phone"));
    }
}
