use tokio_rusqlite::Connection;
use std::path::Path;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use std::sync::Arc;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] tokio_rusqlite::Error),
    #[error("Database connection error: {0}")]
    Connection(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key/value store standing in for browser local storage.
///
/// Values are JSON text stored under fixed keys; writing a key replaces
/// whatever was there before.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Connection>,
}

impl Database {
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        let db = Self {
            conn: Arc::new(conn),
        };
        db.initialize().await?;
        Ok(db)
    }

    pub async fn in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        let db = Self {
            conn: Arc::new(conn),
        };
        db.initialize().await?;
        Ok(db)
    }

    async fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn.call(|conn| {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS local_storage (
                    key TEXT PRIMARY KEY NOT NULL,
                    value TEXT NOT NULL,
                    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
                );"
            )
        })
        .await?;

        info!("Local storage initialized successfully");
        Ok(())
    }

    pub async fn set(&self, key: &str, value: String) -> Result<(), DatabaseError> {
        let key = key.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO local_storage (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)",
                    [&key, &value],
                )
            })
            .await?;

        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let key = key.to_string();
        let result = self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM local_storage WHERE key = ?")?;
                let mut rows = stmt.query([&key])?;

                if let Some(row) = rows.next()? {
                    Ok(Some(row.get::<_, String>(0)?))
                } else {
                    Ok(None)
                }
            })
            .await?;

        Ok(result)
    }

    /// Returns true when a value was actually removed.
    pub async fn remove(&self, key: &str) -> Result<bool, DatabaseError> {
        let key = key.to_string();
        let removed = self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM local_storage WHERE key = ?1", [&key])
            })
            .await?;

        Ok(removed > 0)
    }

    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, DatabaseError> {
        let pattern = format!("{}%", prefix.replace('%', "\\%").replace('_', "\\_"));
        let result = self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT key FROM local_storage WHERE key LIKE ?1 ESCAPE '\\' ORDER BY key"
                )?;

                let rows = stmt.query_map([&pattern], |row| row.get::<_, String>(0))?;

                let mut keys = Vec::new();
                for row in rows {
                    keys.push(row?);
                }

                Ok(keys)
            })
            .await?;

        Ok(result)
    }

    pub async fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), DatabaseError> {
        let json = serde_json::to_string(value)?;
        self.set(key, json).await
    }

    /// Load a JSON value. Corrupt entries are logged and read as absent.
    pub async fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DatabaseError> {
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Ignoring unreadable value stored under {}: {}", key, e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_replaces_previous_value() {
        let db = Database::in_memory().await.unwrap();
        db.set("planMyDietary_level", "1".to_string()).await.unwrap();
        db.set("planMyDietary_level", "2".to_string()).await.unwrap();

        assert_eq!(db.get("planMyDietary_level").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_remove() {
        let db = Database::in_memory().await.unwrap();
        db.set("geneticAnalysisResult", "{}".to_string()).await.unwrap();

        assert!(db.remove("geneticAnalysisResult").await.unwrap());
        assert!(!db.remove("geneticAnalysisResult").await.unwrap());
        assert_eq!(db.get("geneticAnalysisResult").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_prefix_listing_escapes_wildcards() {
        let db = Database::in_memory().await.unwrap();
        db.set("genetic_report_GR1", "{}".to_string()).await.unwrap();
        db.set("genetic_report_GR2", "{}".to_string()).await.unwrap();
        db.set("geneticXreport_GR3", "{}".to_string()).await.unwrap();

        let keys = db.keys_with_prefix("genetic_report_").await.unwrap();
        assert_eq!(keys, vec!["genetic_report_GR1".to_string(), "genetic_report_GR2".to_string()]);
    }

    #[tokio::test]
    async fn test_corrupt_json_reads_as_absent() {
        let db = Database::in_memory().await.unwrap();
        db.set("planMyDietary_profile", "{not json".to_string()).await.unwrap();

        let loaded: Option<serde_json::Value> = db.load_json("planMyDietary_profile").await.unwrap();
        assert!(loaded.is_none());
    }
}
