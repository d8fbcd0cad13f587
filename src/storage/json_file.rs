//! JSON snapshot file storage backend.
//!
//! The whole store lives in one file holding a pretty-printed JSON array of
//! orders in stored order. There is no incremental log: every commit
//! re-derives and rewrites the complete snapshot.
//!
//! # Commit protocol
//!
//! 1. Take the store's writer lock (one read-modify-write cycle at a time).
//! 2. Load the complete prior snapshot (a missing file is an empty store).
//! 3. Merge the batch in memory with [`merge_orders`].
//! 4. Write the new snapshot through a buffered writer to a temporary file in
//!    the same directory, fsync it, then rename it over the snapshot path.
//!
//! The rename is atomic, so readers (which never take the writer lock) load
//! either the snapshot before the commit or the one after it.
//!
//! File I/O is synchronous and runs on `tokio::task::spawn_blocking`.

use crate::core::error::StorageError;
use crate::core::order::Order;
use crate::core::query::OrderFilter;
use crate::core::store::{OrderStore, UpsertSummary};
use crate::storage::{OrderSnapshot, merge_orders, snapshot_from};
use async_trait::async_trait;
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

/// File-backed implementation of [`OrderStore`]
///
/// Clones share the same writer lock, so every handle derived from one
/// `JsonFileOrderStore` serializes its commits against the others.
///
/// # Example
///
/// ```rust,ignore
/// use order_ingest::storage::JsonFileOrderStore;
///
/// let store = JsonFileOrderStore::new("data/orders.json");
/// store.upsert_all(orders).await?;
/// ```
#[derive(Clone)]
pub struct JsonFileOrderStore {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileOrderStore {
    /// Create a store handle for the snapshot at `path`
    ///
    /// Nothing is touched on disk until the first commit.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every stored order, in stored order
    pub async fn load_all(&self) -> Result<Vec<Order>, StorageError> {
        let path = self.path.clone();
        let snapshot = tokio::task::spawn_blocking(move || load_snapshot(&path)).await??;
        Ok(snapshot.into_values().collect())
    }
}

#[async_trait]
impl OrderStore for JsonFileOrderStore {
    async fn upsert_all(&self, orders: Vec<Order>) -> Result<UpsertSummary, StorageError> {
        if orders.is_empty() {
            return Ok(UpsertSummary::default());
        }

        // The guard moves into the blocking task so the lock is held until the
        // rename has happened, even if this future is dropped early.
        let guard = self.write_lock.clone().lock_owned().await;
        let path = self.path.clone();

        let (summary, total) = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            let mut snapshot = load_snapshot(&path)?;
            let summary = merge_orders(&mut snapshot, orders);
            write_snapshot(&path, &snapshot)?;
            Ok::<_, StorageError>((summary, snapshot.len()))
        })
        .await??;

        tracing::info!(
            path = %self.path.display(),
            inserted = summary.inserted,
            replaced = summary.replaced,
            total,
            "order snapshot written"
        );

        Ok(summary)
    }

    async fn find(&self, filter: &OrderFilter) -> Result<Vec<Order>, StorageError> {
        let path = self.path.clone();
        let snapshot = tokio::task::spawn_blocking(move || load_snapshot(&path)).await??;
        Ok(filter.apply(snapshot.values()))
    }
}

fn io_error(path: &Path, err: impl std::fmt::Display) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

fn load_snapshot(path: &Path) -> Result<OrderSnapshot, StorageError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no snapshot yet, starting empty");
            return Ok(OrderSnapshot::new());
        }
        Err(e) => return Err(io_error(path, e)),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(OrderSnapshot::new());
    }

    let orders: Vec<Order> =
        serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupted {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    tracing::debug!(path = %path.display(), count = orders.len(), "snapshot loaded");
    Ok(snapshot_from(orders))
}

fn write_snapshot(path: &Path, snapshot: &OrderSnapshot) -> Result<(), StorageError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    let orders: Vec<&Order> = snapshot.values().collect();
    let tmp = NamedTempFile::new_in(dir).map_err(|e| io_error(dir, e))?;
    let mut writer = BufWriter::new(tmp);

    serde_json::to_writer_pretty(&mut writer, &orders).map_err(|e| {
        StorageError::Serialization {
            message: e.to_string(),
        }
    })?;
    let tmp = writer.into_inner().map_err(|e| io_error(dir, e.error()))?;
    tmp.as_file().sync_all().map_err(|e| io_error(tmp.path(), e))?;

    tmp.persist(path).map_err(|e| io_error(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn order(id: &str, value: f64, date: &str) -> Order {
        Order::new(
            "83".to_string(),
            "Frances Satterfield".to_string(),
            id.to_string(),
            6,
            value,
            date.to_string(),
        )
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileOrderStore::new(dir.path().join("orders.json"));

        assert!(store.find(&OrderFilter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_does_not_create_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileOrderStore::new(dir.path().join("orders.json"));

        store.upsert_all(Vec::new()).await.unwrap();

        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileOrderStore::new(dir.path().join("nested/data/orders.json"));

        store
            .upsert_all(vec![order("791", 224.75, "2021-11-22")])
            .await
            .unwrap();

        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orders.json");

        JsonFileOrderStore::new(&path)
            .upsert_all(vec![
                order("791", 224.75, "2021-11-22"),
                order("836", 1899.02, "2021-09-09"),
            ])
            .await
            .unwrap();

        let reopened = JsonFileOrderStore::new(&path);
        let ids: Vec<String> = reopened
            .load_all()
            .await
            .unwrap()
            .iter()
            .map(|o| o.order_id().to_string())
            .collect();
        assert_eq!(ids, vec!["791", "836"]);
    }

    #[tokio::test]
    async fn test_snapshot_file_is_a_json_array() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileOrderStore::new(dir.path().join("orders.json"));
        store
            .upsert_all(vec![order("791", 224.75, "2021-11-22")])
            .await
            .unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["orderId"], "791");
        assert_eq!(json[0]["productId"], 6);
    }

    #[tokio::test]
    async fn test_large_snapshot_is_written_whole() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileOrderStore::new(dir.path().join("orders.json"));
        let orders: Vec<Order> = (1..=2000)
            .map(|i| order(&i.to_string(), i as f64 / 100.0, "2021-11-22"))
            .collect();

        store.upsert_all(orders.clone()).await.unwrap();
        store
            .upsert_all(vec![order("2001", 1.0, "2021-11-23")])
            .await
            .unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded.len(), 2001);
        assert_eq!(&loaded[..2000], &orders[..]);
        assert_eq!(loaded[2000].order_id(), "2001");
    }

    #[tokio::test]
    async fn test_corrupted_snapshot_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orders.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileOrderStore::new(&path);

        let err = store.find(&OrderFilter::all()).await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupted { .. }));

        let err = store
            .upsert_all(vec![order("1", 1.0, "2021-01-01")])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Corrupted { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn test_reads_legacy_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orders.json");
        std::fs::write(
            &path,
            r#"[{"userId":"88","userName":"Terra Daniel DDS","orderId":"836","prodId":3,"value":1899.02,"date":"2021-09-09"}]"#,
        )
        .unwrap();

        let found = JsonFileOrderStore::new(&path)
            .find(&OrderFilter::all().by_order_id("836"))
            .await
            .unwrap();
        assert_eq!(found[0].product_id(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_upserts_do_not_lose_updates() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileOrderStore::new(dir.path().join("orders.json"));

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .upsert_all(vec![order(&i.to_string(), i as f64, "2021-01-01")])
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.load_all().await.unwrap().len(), 16);
    }
}
