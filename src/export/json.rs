//! JSON snapshot export
//!
//! The snapshot is the full data set in one document:
//! `{"clients": [...], "serviceOrders": [...], "purchases": [...], "exportDate": "..."}`.
//! The same format is read back by the importer and written by backups.

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::clock::Clock;
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{Client, Purchase, ServiceOrder};
use crate::storage::{DatasetCounts, Storage};

/// The complete data set as exchanged in backup files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub clients: Vec<Client>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub service_orders: Vec<ServiceOrder>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub purchases: Vec<Purchase>,

    /// When the snapshot was taken; hand-written files may omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Snapshot {
    /// Capture everything currently in storage
    pub fn from_storage(storage: &Storage, clock: &dyn Clock) -> BackofficeResult<Self> {
        Ok(Self {
            clients: storage.clients.get_all()?,
            service_orders: storage.service_orders.get_all()?,
            purchases: storage.purchases.get_all()?,
            export_date: Some(clock.now()),
        })
    }

    /// Parse a snapshot document
    ///
    /// Any syntax or shape problem is reported as one generic error; the
    /// details only go to the debug log.
    pub fn parse(json: &str) -> BackofficeResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            debug!(error = %e, "rejected backup file");
            BackofficeError::Import("Invalid backup file".into())
        })
    }

    /// Read and parse a snapshot file
    pub fn read_from(path: &Path) -> BackofficeResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            BackofficeError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&contents)
    }

    pub fn counts(&self) -> DatasetCounts {
        DatasetCounts {
            clients: self.clients.len(),
            service_orders: self.service_orders.len(),
            purchases: self.purchases.len(),
        }
    }
}

/// Default file name for a JSON export taken on `date`
pub fn default_json_file_name(date: NaiveDate) -> String {
    format!("backup-erp-{}.json", date.format("%Y-%m-%d"))
}

/// Write the full data set as a pretty-printed snapshot
pub fn export_json<W: Write>(
    storage: &Storage,
    clock: &dyn Clock,
    writer: &mut W,
) -> BackofficeResult<DatasetCounts> {
    let snapshot = Snapshot::from_storage(storage, clock)?;

    serde_json::to_writer_pretty(&mut *writer, &snapshot)
        .map_err(|e| BackofficeError::Export(e.to_string()))?;
    writer
        .flush()
        .map_err(|e| BackofficeError::Export(e.to_string()))?;

    Ok(snapshot.counts())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::paths::BackofficePaths;
    use crate::models::{ClientDraft, Money, OrderStatus, PurchaseDraft, ServiceOrderDraft};
    use crate::services::{ClientService, PurchaseService, ServiceOrderService};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_export_uses_camel_case_keys() {
        let (_temp, storage) = create_test_storage();
        let clock = FixedClock::utc(Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap());

        let client = ClientService::with_clock(&storage, &clock)
            .create(ClientDraft::new("Maria", "12345678909"))
            .unwrap();
        ServiceOrderService::with_clock(&storage, &clock)
            .create(ServiceOrderDraft::new(client.id, "Notebook", Money::from_cents(12345)))
            .unwrap();
        let mut purchase = PurchaseDraft::new(clock.now(), "Atacado", Money::from_cents(500));
        purchase.invoice_number = "881".into();
        PurchaseService::new(&storage).create(purchase).unwrap();

        let mut buffer = Vec::new();
        let counts = export_json(&storage, &clock, &mut buffer).unwrap();
        assert_eq!(counts.service_orders, 1);

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["exportDate"], "2024-03-05T10:00:00Z");
        assert_eq!(value["serviceOrders"][0]["clientId"], 1);
        assert_eq!(value["serviceOrders"][0]["clientName"], "Maria");
        assert_eq!(value["serviceOrders"][0]["orderNumber"], 1);
        assert_eq!(value["serviceOrders"][0]["value"], 123.45);
        assert_eq!(value["purchases"][0]["invoiceNumber"], "881");
        assert!(value["clients"][0].get("createdAt").is_some());
        assert!(value["clients"][0].get("cep").is_some());
    }

    #[test]
    fn test_parse_partial_document() {
        let json = r#"{"clients":[],"serviceOrders":[{"id":1,"orderNumber":1,"clientId":3,
            "clientName":"Ana","product":"TV","description":"","priority":"normal",
            "status":"in_progress","value":10,"date":"2024-03-01T12:00:00.000Z"}],
            "purchases":null}"#;

        let snapshot = Snapshot::parse(json).unwrap();
        assert!(snapshot.clients.is_empty());
        assert_eq!(snapshot.service_orders.len(), 1);
        assert_eq!(snapshot.service_orders[0].status, OrderStatus::InProgress);
        assert!(snapshot.purchases.is_empty());
        assert!(snapshot.export_date.is_none());
    }

    #[test]
    fn test_parse_failure_is_generic() {
        for broken in ["not json", "[1, 2]", r#"{"clients": [{"id": "x"}]}"#] {
            let err = Snapshot::parse(broken).unwrap_err();
            assert_eq!(err.to_string(), "Import error: Invalid backup file");
        }
    }

    #[test]
    fn test_default_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(default_json_file_name(date), "backup-erp-2024-03-05.json");
    }
}
