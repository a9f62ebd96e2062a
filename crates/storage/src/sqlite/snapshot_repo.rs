use chrono::Utc;
use sqlx::Row;
use tracing::debug;

use super::SqliteRepository;
use crate::repository::{SnapshotRepository, Slot, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

const UPSERT: &str = r"
    INSERT INTO snapshots (slot, payload, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(slot) DO UPDATE SET
        payload = excluded.payload,
        updated_at = excluded.updated_at
";

const DELETE: &str = "DELETE FROM snapshots WHERE slot = ?1";

#[async_trait::async_trait]
impl SnapshotRepository for SqliteRepository {
    async fn load(&self, slot: Slot) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT payload FROM snapshots WHERE slot = ?1")
            .bind(slot.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        match row {
            Some(row) => {
                let payload: String = row.try_get("payload").map_err(conn)?;
                debug!(%slot, bytes = payload.len(), "loaded snapshot row");
                Ok(Some(payload))
            }
            None => Ok(None),
        }
    }

    async fn store(&self, slot: Slot, payload: &str) -> Result<(), StorageError> {
        sqlx::query(UPSERT)
            .bind(slot.as_str())
            .bind(payload)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        debug!(%slot, bytes = payload.len(), "stored snapshot row");
        Ok(())
    }

    async fn store_all(&self, batch: &[(Slot, String)]) -> Result<(), StorageError> {
        self.apply_batch(batch, &[]).await
    }

    async fn apply_batch(
        &self,
        writes: &[(Slot, String)],
        removals: &[Slot],
    ) -> Result<(), StorageError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(conn)?;
        for (slot, payload) in writes {
            sqlx::query(UPSERT)
                .bind(slot.as_str())
                .bind(payload.as_str())
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
        }
        for slot in removals {
            sqlx::query(DELETE)
                .bind(slot.as_str())
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
        }
        tx.commit().await.map_err(conn)?;
        debug!(writes = writes.len(), removals = removals.len(), "applied snapshot batch");
        Ok(())
    }

    async fn remove(&self, slot: Slot) -> Result<(), StorageError> {
        sqlx::query(DELETE)
            .bind(slot.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
