//! libSQL implementation of the key-value port

use std::sync::Arc;

use libsql::Connection;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::storage::{KeyValueStore, KvWrite};

use super::Database;

/// Key-value store persisted in the `kv_store` table
#[derive(Clone)]
pub struct LibSqlKeyValueStore {
    db: Arc<Database>,
    // Every statement goes through this lock so no call runs on the
    // connection while a transaction is open on it
    conn_lock: Arc<Mutex<()>>,
}

impl LibSqlKeyValueStore {
    /// Create a store over an open database
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            conn_lock: Arc::new(Mutex::new(())),
        }
    }

    fn conn(&self) -> &Connection {
        self.db.connection()
    }
}

async fn read_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut rows = conn
        .query("SELECT value FROM kv_store WHERE key = ?", [key])
        .await?;

    if let Some(row) = rows.next().await? {
        let value: String = row.get(0)?;
        Ok(Some(value))
    } else {
        Ok(None)
    }
}

async fn write_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp_millis();
    conn.execute(
        "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)",
        libsql::params![key, value, now],
    )
    .await?;
    Ok(())
}

async fn delete_value(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM kv_store WHERE key = ?", [key])
        .await?;
    Ok(())
}

impl KeyValueStore for LibSqlKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.conn_lock.lock().await;
        read_value(self.conn(), key).await
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        // One read transaction so every key comes from the same snapshot
        let _guard = self.conn_lock.lock().await;
        let tx = self.conn().transaction().await?;
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(read_value(&tx, key).await?);
        }
        tx.commit().await?;
        Ok(values)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.conn_lock.lock().await;
        write_value(self.conn(), key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.conn_lock.lock().await;
        delete_value(self.conn(), key).await
    }

    async fn write_batch(&self, writes: Vec<KvWrite>) -> Result<()> {
        // Dropping the transaction without commit rolls it back
        let _guard = self.conn_lock.lock().await;
        let tx = self.conn().transaction().await?;
        for write in &writes {
            match write {
                KvWrite::Set { key, value } => write_value(&tx, key, value).await?,
                KvWrite::Remove { key } => delete_value(&tx, key).await?,
            }
        }
        tx.commit().await?;
        tracing::debug!(writes = writes.len(), "Committed key-value batch");
        Ok(())
    }
}
