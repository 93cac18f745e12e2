//! Repository layer for stored trades.

use crate::domain::TradeRecord;
use serde::Serialize;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::warn;
use uuid::Uuid;

/// A persisted trade record with its storage metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTrade {
    pub id: Uuid,
    #[serde(rename = "trade")]
    pub record: TradeRecord,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Repository for database operations.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Store a new trade under a fresh id.
    pub async fn insert_trade(&self, record: &TradeRecord) -> Result<StoredTrade, sqlx::Error> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now().timestamp_millis();
        let document = encode_document(record)?;

        sqlx::query(
            r#"
            INSERT INTO trades (id, symbol, status, document, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(record.symbol.as_str())
        .bind(record.status.to_string())
        .bind(document)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(StoredTrade {
            id,
            record: record.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the document of an existing trade. `None` if `id` is unknown.
    pub async fn update_trade(
        &self,
        id: Uuid,
        record: &TradeRecord,
    ) -> Result<Option<StoredTrade>, sqlx::Error> {
        let now = chrono::Utc::now().timestamp_millis();
        let document = encode_document(record)?;

        let result = sqlx::query(
            r#"
            UPDATE trades
            SET symbol = ?, status = ?, document = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(record.symbol.as_str())
        .bind(record.status.to_string())
        .bind(document)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_trade(id).await
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn get_trade(&self, id: Uuid) -> Result<Option<StoredTrade>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, document, created_at, updated_at
            FROM trades
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| row_to_stored_trade(&row)).transpose()
    }

    /// Most recently created trades first. Rows whose document no longer
    /// decodes are skipped.
    pub async fn list_trades(&self, limit: i64) -> Result<Vec<StoredTrade>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, document, created_at, updated_at
            FROM trades
            ORDER BY created_at DESC, id ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .filter_map(|row| match row_to_stored_trade(row) {
                Ok(trade) => Some(trade),
                Err(e) => {
                    warn!(error = %e, "skipping undecodable trade row");
                    None
                }
            })
            .collect())
    }

    pub async fn count_trades(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM trades")
            .fetch_one(&self.pool)
            .await?;
        row.try_get("n")
    }
}

fn encode_document(record: &TradeRecord) -> Result<String, sqlx::Error> {
    serde_json::to_string(record)
        .map_err(|e| sqlx::Error::Protocol(format!("trade document not encodable: {}", e)))
}

fn row_to_stored_trade(row: &SqliteRow) -> Result<StoredTrade, sqlx::Error> {
    let id_str: String = row.try_get("id")?;
    let document: String = row.try_get("document")?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        warn!(id = %id_str, error = %e, "stored trade id is not a uuid");
        sqlx::Error::Decode(Box::new(e))
    })?;
    let record: TradeRecord = serde_json::from_str(&document).map_err(|e| {
        warn!(id = %id_str, error = %e, "stored trade document does not decode");
        sqlx::Error::Decode(Box::new(e))
    })?;

    Ok(StoredTrade {
        id,
        record,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::domain::{Field, TradeDraft, TradeStatus};
    use tempfile::TempDir;

    async fn setup_repo() -> (TempDir, Repository) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (temp_dir, Repository::new(pool))
    }

    fn record(symbol: &str) -> TradeRecord {
        let mut draft = TradeDraft::for_status(TradeStatus::Quick);
        draft.symbol = symbol.to_string();
        draft.pnl = Field::Value(crate::domain::Decimal::from_i64(12));
        TradeRecord::from_draft(&draft)
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let (_dir, repo) = setup_repo().await;
        let stored = repo.insert_trade(&record("BTC")).await.unwrap();

        let fetched = repo.get_trade(stored.id).await.unwrap().unwrap();
        assert_eq!(fetched, stored);
        assert_eq!(repo.count_trades().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let (_dir, repo) = setup_repo().await;
        assert!(repo.get_trade(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_document() {
        let (_dir, repo) = setup_repo().await;
        let stored = repo.insert_trade(&record("BTC")).await.unwrap();

        let updated = repo
            .update_trade(stored.id, &record("ETH"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.record.symbol, "ETH");
        assert_eq!(updated.created_at, stored.created_at);

        let missing = repo.update_trade(Uuid::new_v4(), &record("SOL")).await.unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_encoded_document_decodes_to_same_record() {
        let original = record("BTC");
        let document = encode_document(&original).unwrap();
        let decoded: TradeRecord = serde_json::from_str(&document).unwrap();
        assert_eq!(decoded, original);
    }

    #[tokio::test]
    async fn test_older_document_without_fee_fields_loads() {
        let (_dir, repo) = setup_repo().await;
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO trades (id, symbol, status, document, created_at, updated_at) \
             VALUES (?, 'ADA', 'quick', ?, 5, 5)",
        )
        .bind(id.to_string())
        .bind(r#"{"symbol":"ADA","direction":"short","status":"quick","pnl":"3"}"#)
        .execute(&repo.pool)
        .await
        .unwrap();

        let stored = repo.get_trade(id).await.unwrap().unwrap();
        assert_eq!(stored.record.symbol, "ADA");
        assert!(stored.record.fees.is_unset());
        assert_eq!(stored.record.pnl, Field::Value(crate::domain::Decimal::from_i64(3)));
    }

    #[tokio::test]
    async fn test_list_skips_corrupt_rows() {
        let (_dir, repo) = setup_repo().await;
        repo.insert_trade(&record("BTC")).await.unwrap();
        sqlx::query(
            "INSERT INTO trades (id, symbol, status, document, created_at, updated_at) \
             VALUES ('not-a-uuid', 'X', 'quick', '{}', 0, 0)",
        )
        .execute(&repo.pool)
        .await
        .unwrap();

        let trades = repo.list_trades(10).await.unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].record.symbol, "BTC");
        assert_eq!(repo.count_trades().await.unwrap(), 2);
    }
}
