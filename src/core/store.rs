//! Durable storage for the credential and model preference.
//!
//! The stored credential outlives any one session and survives
//! restarts. A key that was never set reads back as absent rather
//! than an error.
use anyhow::{Error, Result};
use tokio_rusqlite::Connection;

const API_KEY_KEY: &str = "internal_api_key";
const MODEL_KEY: &str = "selected_model";

pub struct CredentialStore {
    db: Connection,
}

impl CredentialStore {
    pub async fn open(db_path: &str) -> Result<Self, Error> {
        let db = Connection::open(db_path).await?;
        let store = Self { db };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn open_in_memory() -> Result<Self, Error> {
        let db = Connection::open_in_memory().await?;
        let store = Self { db };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), Error> {
        self.db
            .call(|conn| {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS settings (
                        key TEXT PRIMARY KEY,
                        value TEXT NOT NULL
                    )",
                    [],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn api_key(&self) -> Result<Option<String>, Error> {
        self.get(API_KEY_KEY).await
    }

    pub async fn set_api_key(&self, api_key: &str) -> Result<(), Error> {
        self.set(API_KEY_KEY, api_key).await
    }

    pub async fn clear_api_key(&self) -> Result<(), Error> {
        self.remove(API_KEY_KEY).await
    }

    pub async fn model(&self) -> Result<Option<String>, Error> {
        self.get(MODEL_KEY).await
    }

    pub async fn set_model(&self, model: &str) -> Result<(), Error> {
        self.set(MODEL_KEY, model).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let key = key.to_owned();
        let value = self
            .db
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?")?;
                let mut rows = stmt.query_map([key], |row| row.get::<_, String>(0))?;
                Ok(rows.next().transpose()?)
            })
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let key = key.to_owned();
        let value = value.to_owned();
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO settings (key, value) VALUES (?, ?)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    [key, value],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        let key = key.to_owned();
        self.db
            .call(move |conn| {
                conn.execute("DELETE FROM settings WHERE key = ?", [key])?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}
