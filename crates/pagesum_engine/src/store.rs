use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex, MutexGuard};
use std::time::Duration;

use pagesum_core::{JobStatus, StatusUpdate, STATUS_KEYS};
use pagesum_logging::{pagesum_debug, pagesum_info, pagesum_warn};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::persist::{write_atomically, PersistError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to persist store: {0}")]
    Persist(#[from] PersistError),
}

/// Keys touched by one write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub keys: Vec<String>,
}

impl StoreChange {
    pub fn touches_any(&self, keys: &[&str]) -> bool {
        self.keys.iter().any(|k| keys.contains(&k.as_str()))
    }
}

/// Receiving end of store mutation notifications. Dropping it unsubscribes.
#[derive(Debug)]
pub struct StoreSubscription {
    rx: mpsc::Receiver<StoreChange>,
}

impl StoreSubscription {
    /// Blocks until the next change; `None` once the store is gone.
    pub fn recv(&self) -> Option<StoreChange> {
        self.rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<StoreChange, mpsc::RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    pub fn try_recv(&self) -> Option<StoreChange> {
        self.rx.try_recv().ok()
    }
}

/// Local key-value store shared by the worker and every foreground instance.
pub trait KeyValueStore: Send + Sync {
    /// Values for the requested keys; absent keys are omitted.
    fn get(&self, keys: &[&str]) -> Map<String, Value>;

    /// Upserts all entries as one write and notifies subscribers once.
    fn set(&self, entries: Map<String, Value>) -> Result<(), StoreError>;

    fn subscribe(&self) -> StoreSubscription;
}

#[derive(Default)]
struct Inner {
    entries: Map<String, Value>,
    subscribers: Vec<mpsc::Sender<StoreChange>>,
}

/// In-memory map, optionally mirrored to a JSON file on every write.
pub struct LocalStore {
    path: Option<PathBuf>,
    inner: Mutex<Inner>,
}

impl LocalStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Opens a file-backed store. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self {
            path: Some(path),
            inner: Mutex::new(Inner {
                entries,
                subscribers: Vec::new(),
            }),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, keys: &[&str]) -> Map<String, Value> {
        let inner = self.lock();
        keys.iter()
            .filter_map(|key| {
                inner
                    .entries
                    .get(*key)
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect()
    }

    fn set(&self, entries: Map<String, Value>) -> Result<(), StoreError> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut inner = self.lock();
        let mut next = inner.entries.clone();
        let keys: Vec<String> = entries.keys().cloned().collect();
        next.extend(entries);

        // Writes stay serialised under the lock so the file never goes backwards.
        if let Some(path) = &self.path {
            let content = serde_json::to_vec_pretty(&next)?;
            write_atomically(path, &content)?;
        }
        inner.entries = next;

        let change = StoreChange { keys };
        inner
            .subscribers
            .retain(|subscriber| subscriber.send(change.clone()).is_ok());
        Ok(())
    }

    fn subscribe(&self) -> StoreSubscription {
        let (tx, rx) = mpsc::channel();
        self.lock().subscribers.push(tx);
        StoreSubscription { rx }
    }
}

fn load_entries(path: &Path) -> Map<String, Value> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Map::new(),
        Err(err) => {
            pagesum_warn!("Failed to read store from {:?}: {}", path, err);
            return Map::new();
        }
    };
    match serde_json::from_str::<Map<String, Value>>(&content) {
        Ok(entries) => {
            pagesum_info!("Loaded {} store entries from {:?}", entries.len(), path);
            entries
        }
        Err(err) => {
            pagesum_warn!("Failed to parse store at {:?}: {}", path, err);
            Map::new()
        }
    }
}

/// Current status record, rebuilt from the store alone.
pub fn read_status(store: &dyn KeyValueStore) -> JobStatus {
    JobStatus::from_entries(&store.get(&STATUS_KEYS))
}

/// Writes one coherent subset of the record. A backwards transition is
/// logged but still written; the last writer wins.
pub fn write_status(store: &dyn KeyValueStore, update: StatusUpdate) -> Result<(), StoreError> {
    let mut record = read_status(store);
    if let Some(next) = update.status {
        if !record.status.can_advance_to(next) {
            pagesum_warn!("Status moves out of order: {} -> {}", record.status, next);
        }
    }
    record.apply(&update);
    store.set(update.into_entries())?;
    pagesum_debug!("Status record now {}", record.status);
    Ok(())
}
