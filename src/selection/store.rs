//! Persisted pick lists, one per screen scope (e.g. "requisition:site-12").
//! The SQLite store keeps the whole list as a JSON document per scope.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::catalog::SelectionEntry;

#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Sqlite(e) => write!(f, "selection store error: {e}"),
            StoreError::Encode(e) => write!(f, "selection encoding error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sqlite(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Encode(e)
    }
}

/// Get/set of a pick list under a screen-scoped key.
pub trait SelectionStore: Send + Sync {
    /// Stored list for `scope`, empty if nothing was saved.
    fn load(&self, scope: &str) -> Result<Vec<SelectionEntry>, StoreError>;
    fn save(&self, scope: &str, selection: &[SelectionEntry]) -> Result<(), StoreError>;
    fn clear(&self, scope: &str) -> Result<(), StoreError>;
}

/// Process-local store, for tests and screens that need no durability.
#[derive(Default)]
pub struct MemorySelectionStore {
    scopes: Mutex<HashMap<String, Vec<SelectionEntry>>>,
}

impl MemorySelectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStore for MemorySelectionStore {
    fn load(&self, scope: &str) -> Result<Vec<SelectionEntry>, StoreError> {
        Ok(self.scopes.lock().get(scope).cloned().unwrap_or_default())
    }

    fn save(&self, scope: &str, selection: &[SelectionEntry]) -> Result<(), StoreError> {
        self.scopes
            .lock()
            .insert(scope.to_string(), selection.to_vec());
        Ok(())
    }

    fn clear(&self, scope: &str) -> Result<(), StoreError> {
        self.scopes.lock().remove(scope);
        Ok(())
    }
}

/// SQLite-backed store.
pub struct SqliteSelectionStore {
    conn: Mutex<Connection>,
}

impl SqliteSelectionStore {
    /// Open (or create) the selection database at the given path.
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        let store = Self::with_connection(conn)?;
        info!(path = %db_path.display(), "selection store opened");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS selection_store (
                scope TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Scopes with a stored list, oldest update first.
    pub fn scopes(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT scope FROM selection_store ORDER BY updated_at, scope")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let scopes = rows.collect::<Result<Vec<String>, _>>()?;
        Ok(scopes)
    }
}

impl SelectionStore for SqliteSelectionStore {
    fn load(&self, scope: &str) -> Result<Vec<SelectionEntry>, StoreError> {
        let payload: Option<String> = self
            .conn
            .lock()
            .query_row(
                "SELECT payload FROM selection_store WHERE scope = ?1",
                params![scope],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(json) => {
                let selection: Vec<SelectionEntry> = serde_json::from_str(&json)?;
                debug!(scope, entries = selection.len(), "selection loaded");
                Ok(selection)
            }
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, scope: &str, selection: &[SelectionEntry]) -> Result<(), StoreError> {
        let payload = serde_json::to_string(selection)?;
        self.conn.lock().execute(
            "INSERT OR REPLACE INTO selection_store (scope, payload, updated_at)
             VALUES (?1, ?2, ?3)",
            params![scope, payload, now_unix()],
        )?;
        debug!(scope, entries = selection.len(), "selection saved");
        Ok(())
    }

    fn clear(&self, scope: &str) -> Result<(), StoreError> {
        self.conn.lock().execute(
            "DELETE FROM selection_store WHERE scope = ?1",
            params![scope],
        )?;
        Ok(())
    }
}

/// Current time as Unix timestamp (seconds).
fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;

    fn sample() -> Vec<SelectionEntry> {
        let mut first: SelectionEntry = CatalogItem::new("A1", "", "Red MCB").into();
        first.edits.qty = "4".into();
        vec![first, CatalogItem::new("B2", "3", "Cable Tray").into()]
    }

    fn exercise(store: &dyn SelectionStore) {
        assert!(store.load("issue").unwrap().is_empty());
        store.save("issue", &sample()).unwrap();
        assert_eq!(store.load("issue").unwrap(), sample());
        assert!(store.load("receive").unwrap().is_empty());

        store.save("issue", &sample()[..1]).unwrap();
        assert_eq!(store.load("issue").unwrap().len(), 1);

        store.clear("issue").unwrap();
        assert!(store.load("issue").unwrap().is_empty());
    }

    #[test]
    fn memory_store_scopes_lists() {
        exercise(&MemorySelectionStore::new());
    }

    #[test]
    fn sqlite_store_scopes_lists() {
        exercise(&SqliteSelectionStore::open_in_memory().unwrap());
    }

    #[test]
    fn sqlite_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selection.db");
        {
            let store = SqliteSelectionStore::open(&path).unwrap();
            store.save("requisition", &sample()).unwrap();
        }
        let store = SqliteSelectionStore::open(&path).unwrap();
        assert_eq!(store.load("requisition").unwrap(), sample());
        assert_eq!(store.scopes().unwrap(), vec!["requisition".to_string()]);
    }
}
