use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use crate::errors::PortalError;

pub struct Database {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(path: &str) -> Result<Self, PortalError> {
        // Ensure parent directory exists
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| PortalError::Persistence(format!("Failed to open database: {}", e)))?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| PortalError::Persistence(format!("Failed to set pragmas: {}", e)))?;

        let db = Self { conn: Arc::new(Mutex::new(conn)) };
        db.initialize()?;
        Ok(db)
    }

    pub fn in_memory() -> Result<Self, PortalError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| PortalError::Persistence(format!("Failed to open in-memory db: {}", e)))?;
        let db = Self { conn: Arc::new(Mutex::new(conn)) };
        db.initialize()?;
        Ok(db)
    }

    fn initialize(&self) -> Result<(), PortalError> {
        let conn = self.lock()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| PortalError::Persistence(format!("Failed to set pragmas: {}", e)))?;
        conn.execute_batch(super::schema::CREATE_TABLES)
            .map_err(|e| PortalError::Persistence(format!("Failed to create tables: {}", e)))?;
        Ok(())
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, PortalError> {
        self.conn
            .lock()
            .map_err(|_| PortalError::Internal("database connection lock poisoned".into()))
    }

    /// Run a read or a single-statement write against the connection.
    pub fn read<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, PortalError>,
    ) -> Result<T, PortalError> {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Run `f` inside one transaction. Any error rolls every write back.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> Result<T, PortalError>,
    ) -> Result<T, PortalError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self { conn: self.conn.clone() }
    }
}
