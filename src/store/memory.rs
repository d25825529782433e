use super::RecordStore;
use crate::error::BankError;
use crate::questions::record::stored_row;
use crate::questions::{QuestionRow, StoredRow};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-local store, used by tests and for running without Google credentials.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<StoredRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<StoredRow>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn read_all(&self) -> Result<Vec<StoredRow>, BankError> {
        Ok(self.rows.read().await.clone())
    }

    async fn append(&self, row: QuestionRow) -> Result<(), BankError> {
        self.rows.write().await.push(stored_row(&row));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::{QuestionRecord, categorize};

    #[tokio::test]
    async fn appended_rows_read_back_in_order() {
        let store = MemoryStore::new();
        for (q, kind) in [("a", "scenario_based"), ("b", "live_interview")] {
            let record = QuestionRecord {
                question: q.into(),
                kind: kind.into(),
                ..Default::default()
            };
            store.append(record.into_row()).await.unwrap();
        }

        let rows = store.read_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Question"], "a");
        assert_eq!(rows[1]["Type"], "live_interview");
    }

    #[tokio::test]
    async fn repeated_reads_partition_identically() {
        let store = MemoryStore::new();
        for kind in ["interview_based", "multiple_choice", "community_driven", "other"] {
            let record = QuestionRecord {
                kind: kind.into(),
                ..Default::default()
            };
            store.append(record.into_row()).await.unwrap();
        }
        let first = categorize(store.read_all().await.unwrap());
        let second = categorize(store.read_all().await.unwrap());
        assert_eq!(first, second);
        assert_eq!(first.interview_based_questions.len(), 2);
    }
}
