//! Persistent store adapter
//!
//! Each tracked collection lives under one string key in a single redb
//! table, holding the whole collection as a JSON snapshot. Every save
//! overwrites the previous snapshot (last writer wins).
//!
//! A failed write never reaches the mutator: it is logged, the namespace is
//! marked degraded, and that collection stays in-memory only for the rest
//! of the run.

use parking_lot::Mutex;
use redb::{Database, ReadableDatabase, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{AppError, ErrorCode};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Portal state table: key = namespace, value = JSON snapshot
const STATE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("portal_state");

/// Persisted collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Active session user (absent when logged out)
    User,
    Hardware,
    Cart,
    Orders,
    ProblemStatements,
}

impl Namespace {
    pub const ALL: [Namespace; 5] = [
        Namespace::User,
        Namespace::Hardware,
        Namespace::Cart,
        Namespace::Orders,
        Namespace::ProblemStatements,
    ];

    /// Stable storage key
    pub fn key(&self) -> &'static str {
        match self {
            Namespace::User => "ic_user",
            Namespace::Hardware => "ic_hardware",
            Namespace::Cart => "ic_cart",
            Namespace::Orders => "ic_orders",
            Namespace::ProblemStatements => "ic_problems",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let message = match &err {
            StoreError::Serialization(_) => "Failed to encode stored data",
            _ if is_disk_full(&err) => "Storage is full",
            _ => "Storage is unavailable",
        };
        AppError::with_message(ErrorCode::StorageError, message)
            .with_detail("cause", err.to_string())
    }
}

/// redb surfaces I/O failures as strings
fn is_disk_full(err: &StoreError) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("no space") || msg.contains("disk full") || msg.contains("enospc")
}

/// Durable string-keyed byte store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, ns: Namespace) -> StoreResult<Option<Vec<u8>>>;
    fn put(&self, ns: Namespace, value: &[u8]) -> StoreResult<()>;
    fn remove(&self, ns: Namespace) -> StoreResult<()>;
}

/// redb-backed store
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open in-memory database (tests and throwaway sessions)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(STATE_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, ns: Namespace) -> StoreResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STATE_TABLE)?;
        Ok(table.get(ns.key())?.map(|guard| guard.value().to_vec()))
    }

    fn put(&self, ns: Namespace, value: &[u8]) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(STATE_TABLE)?;
            table.insert(ns.key(), value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn remove(&self, ns: Namespace) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(STATE_TABLE)?;
            table.remove(ns.key())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

/// Typed snapshot persistence over a [`KeyValueStore`]
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
    degraded: Arc<Mutex<HashSet<Namespace>>>,
}

impl fmt::Debug for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persistence")
            .field("degraded", &*self.degraded.lock())
            .finish_non_exhaustive()
    }
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            degraded: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Load a snapshot. Absent, unreadable and undecodable entries all
    /// yield `None` so the caller falls back to seed data.
    pub fn load<T: DeserializeOwned>(&self, ns: Namespace) -> Option<T> {
        let bytes = match self.store.get(ns) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!(namespace = %ns, "No stored snapshot");
                return None;
            }
            Err(e) => {
                tracing::error!(namespace = %ns, error = %e, "Failed to read snapshot");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(namespace = %ns, error = %e, "Stored snapshot is not decodable, ignoring");
                None
            }
        }
    }

    /// Overwrite a snapshot. Failures are logged and degrade the namespace.
    pub fn save<T: Serialize + ?Sized>(&self, ns: Namespace, value: &T) {
        if self.is_degraded(ns) {
            tracing::debug!(namespace = %ns, "Namespace degraded, skipping save");
            return;
        }

        let result = serde_json::to_vec(value)
            .map_err(StoreError::from)
            .and_then(|bytes| self.store.put(ns, &bytes));

        if let Err(e) = result {
            self.degrade(ns, &e);
        }
    }

    /// Drop a snapshot (logout clears the active user)
    pub fn clear(&self, ns: Namespace) {
        if self.is_degraded(ns) {
            return;
        }
        if let Err(e) = self.store.remove(ns) {
            self.degrade(ns, &e);
        }
    }

    pub fn is_degraded(&self, ns: Namespace) -> bool {
        self.degraded.lock().contains(&ns)
    }

    fn degrade(&self, ns: Namespace, err: &StoreError) {
        tracing::error!(
            namespace = %ns,
            error = %err,
            "Failed to persist snapshot, continuing in-memory only"
        );
        self.degraded.lock().insert(ns);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use shared::models::{HardwareItem, Order, OrderStatus, ProblemStatement};

    /// Store whose writes always fail
    pub(crate) struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _ns: Namespace) -> StoreResult<Option<Vec<u8>>> {
            Ok(None)
        }

        fn put(&self, _ns: Namespace, _value: &[u8]) -> StoreResult<()> {
            Err(StoreError::Storage(redb::StorageError::Io(std::io::Error::other(
                "No space left on device",
            ))))
        }

        fn remove(&self, _ns: Namespace) -> StoreResult<()> {
            Ok(())
        }
    }

    fn persistence() -> Persistence {
        Persistence::new(Arc::new(RedbStore::open_in_memory().unwrap()))
    }

    fn sample_hardware() -> Vec<HardwareItem> {
        vec![HardwareItem {
            id: "1".into(),
            name: "Arduino Uno R3".into(),
            description: "Microcontroller board".into(),
            price_per_day: 50,
            image: "https://picsum.photos/400/300?random=1".into(),
            available: true,
            stock: 10,
            category: "Microcontrollers".into(),
        }]
    }

    #[test]
    fn test_namespace_keys() {
        let keys: Vec<_> = Namespace::ALL.iter().map(|ns| ns.key()).collect();
        assert_eq!(
            keys,
            vec!["ic_user", "ic_hardware", "ic_cart", "ic_orders", "ic_problems"]
        );
    }

    #[test]
    fn test_missing_namespace_loads_none() {
        let p = persistence();
        assert!(p.load::<Vec<HardwareItem>>(Namespace::Hardware).is_none());
    }

    #[test]
    fn test_save_then_load() {
        let p = persistence();
        let hardware = sample_hardware();
        p.save(Namespace::Hardware, &hardware);
        assert_eq!(p.load::<Vec<HardwareItem>>(Namespace::Hardware), Some(hardware));

        let problems = vec![ProblemStatement {
            id: "p1".into(),
            title: "Smart Campus Energy Management".into(),
            description: "Monitor energy use".into(),
            deadline: "2024-12-01".into(),
        }];
        p.save(Namespace::ProblemStatements, &problems);
        assert_eq!(
            p.load::<Vec<ProblemStatement>>(Namespace::ProblemStatements),
            Some(problems)
        );
    }

    #[test]
    fn test_orders_round_trip() {
        let p = persistence();
        let mut board = sample_hardware().remove(0);
        board.description = "Board with \"quotes\", commas, ₹ and\nnewlines".into();
        let mut sensor = board.clone();
        sensor.id = "3".into();
        sensor.name = "Ultrasonic Sensor".into();
        sensor.available = false;
        sensor.stock = 0;

        let orders = vec![
            Order {
                id: "ORD-1718000000000".into(),
                user_id: "u1".into(),
                user_name: "Rahul Kumar".into(),
                user_email: "rahul@sona.edu".into(),
                items: vec![board.clone(), sensor],
                total_amount: 100,
                status: OrderStatus::Delivered,
                date: "2024-06-10T09:30:00.000Z".into(),
                address: "Room 1, Main Road, Salem, Tamil Nadu - 636005, India".into(),
                college_id: "21IT101".into(),
                contact: "9876543210".into(),
            },
            Order {
                id: "ORD-1718000000001".into(),
                user_id: "guest".into(),
                user_name: String::new(),
                user_email: String::new(),
                items: vec![board],
                total_amount: 50,
                status: OrderStatus::Pending,
                date: "2024-06-11T10:00:00.000Z".into(),
                address: String::new(),
                college_id: String::new(),
                contact: String::new(),
            },
        ];

        p.save(Namespace::Orders, &orders);
        assert_eq!(p.load::<Vec<Order>>(Namespace::Orders), Some(orders));
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let p = persistence();
        p.save(Namespace::Cart, &vec!["1".to_string(), "2".to_string()]);
        p.save(Namespace::Cart, &vec!["3".to_string()]);
        assert_eq!(
            p.load::<Vec<String>>(Namespace::Cart),
            Some(vec!["3".to_string()])
        );
    }

    #[test]
    fn test_clear_removes_snapshot() {
        let p = persistence();
        p.save(Namespace::User, &"u1");
        p.clear(Namespace::User);
        assert!(p.load::<String>(Namespace::User).is_none());
    }

    #[test]
    fn test_undecodable_snapshot_is_ignored() {
        let store = Arc::new(RedbStore::open_in_memory().unwrap());
        store.put(Namespace::Orders, b"{not json").unwrap();
        let p = Persistence::new(store);
        assert!(p.load::<Vec<HardwareItem>>(Namespace::Orders).is_none());
    }

    #[test]
    fn test_write_failure_degrades_namespace() {
        let p = Persistence::new(Arc::new(BrokenStore));
        p.save(Namespace::Orders, &Vec::<String>::new());
        assert!(p.is_degraded(Namespace::Orders));
        assert!(!p.is_degraded(Namespace::Cart));
    }

    #[test]
    fn test_store_error_maps_to_storage_code() {
        let err = StoreError::Storage(redb::StorageError::Io(std::io::Error::other(
            "No space left on device",
        )));
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::StorageError);
        assert_eq!(app.message, "Storage is full");
    }
}
