//! Local JSON-lines payment store, used when no hosted table is configured

use super::traits::PaymentStore;
use crate::state::PaymentRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// One line of the store file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRow {
    pub saved_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: PaymentRecord,
}

/// Appends each inserted record as a line of JSON
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PaymentStore for JsonFileStore {
    async fn insert(&self, record: &PaymentRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let row = StoredRow {
            saved_at: Utc::now(),
            record: record.clone(),
        };
        let mut line = serde_json::to_string(&row)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(path = %self.path.display(), "payment row appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("card-form-tui-{}", Uuid::new_v4()))
            .join("payment_details.jsonl")
    }

    /// Read every stored row back
    async fn read_rows(path: &Path) -> Result<Vec<StoredRow>> {
        if !fs::try_exists(path).await? {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).await?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).context("Malformed row in payment store"))
            .collect()
    }

    fn record(last4: &str) -> PaymentRecord {
        PaymentRecord {
            user_id: Uuid::new_v4(),
            name: "Jane Doe".to_string(),
            card_last4: last4.to_string(),
            expiry: "12/29".to_string(),
        }
    }

    #[tokio::test]
    async fn test_rows_empty_when_file_missing() {
        assert!(read_rows(&temp_path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_appends_one_line_per_record() {
        let path = temp_path();
        let store = JsonFileStore::new(&path);
        store.insert(&record("1111")).await.unwrap();
        store.insert(&record("4242")).await.unwrap();

        let rows = read_rows(&path).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].record.card_last4, "1111");
        assert_eq!(rows[1].record.card_last4, "4242");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(!content.contains("cvv"));

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_insert_from_blocking_context() {
        let path = temp_path();
        let store = JsonFileStore::new(&path);
        tokio_test::block_on(store.insert(&record("0005"))).unwrap();
        let rows = tokio_test::block_on(read_rows(&path)).unwrap();
        assert_eq!(rows.len(), 1);
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
