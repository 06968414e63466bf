//! In-Memory Case Snapshot Reader
//!
//! Holds snapshots keyed by case and owning client.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{CaseId, UserId};
use crate::domain::lifecycle::CaseSnapshot;
use crate::ports::{CaseSnapshotReader, SnapshotReadError};

#[derive(Debug, Clone)]
struct StoredCase {
    client_id: UserId,
    snapshot: CaseSnapshot,
}

/// In-memory snapshot store
#[derive(Debug, Clone, Default)]
pub struct InMemoryCaseSnapshotReader {
    cases: Arc<RwLock<HashMap<CaseId, StoredCase>>>,
}

impl InMemoryCaseSnapshotReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a case owned by `client_id`.
    pub async fn insert(&self, client_id: UserId, snapshot: CaseSnapshot) {
        self.cases
            .write()
            .await
            .insert(snapshot.id, StoredCase { client_id, snapshot });
    }

    /// Clear all stored cases (useful for tests)
    pub async fn clear(&self) {
        self.cases.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.cases.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cases.read().await.is_empty()
    }
}

#[async_trait]
impl CaseSnapshotReader for InMemoryCaseSnapshotReader {
    async fn get_snapshot(&self, id: &CaseId) -> Result<CaseSnapshot, SnapshotReadError> {
        let cases = self.cases.read().await;
        cases
            .get(id)
            .map(|stored| stored.snapshot.clone())
            .ok_or(SnapshotReadError::NotFound(*id))
    }

    async fn list_for_client(
        &self,
        client_id: &UserId,
    ) -> Result<Vec<CaseSnapshot>, SnapshotReadError> {
        let cases = self.cases.read().await;
        let mut snapshots: Vec<CaseSnapshot> = cases
            .values()
            .filter(|stored| &stored.client_id == client_id)
            .map(|stored| stored.snapshot.clone())
            .collect();
        snapshots.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    fn client(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn snapshot(days_ago: i64) -> CaseSnapshot {
        let mut s = CaseSnapshot::new(CaseId::new(), "REQ-1", "assigned", Timestamp::now().minus_days(10));
        s.updated_at = Timestamp::now().minus_days(days_ago);
        s
    }

    #[tokio::test]
    async fn returns_inserted_snapshot() {
        let reader = InMemoryCaseSnapshotReader::new();
        let s = snapshot(1);
        reader.insert(client("alice"), s.clone()).await;

        assert_eq!(reader.get_snapshot(&s.id).await.unwrap(), s);
        assert_eq!(reader.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_case_is_not_found() {
        let reader = InMemoryCaseSnapshotReader::new();
        let result = reader.get_snapshot(&CaseId::new()).await;
        assert!(matches!(result, Err(SnapshotReadError::NotFound(_))));
    }

    #[tokio::test]
    async fn lists_only_the_clients_cases_newest_first() {
        let reader = InMemoryCaseSnapshotReader::new();
        let older = snapshot(4);
        let newer = snapshot(1);
        reader.insert(client("alice"), older.clone()).await;
        reader.insert(client("alice"), newer.clone()).await;
        reader.insert(client("bob"), snapshot(2)).await;

        let listed = reader.list_for_client(&client("alice")).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[tokio::test]
    async fn clear_empties_the_store() {
        let reader = InMemoryCaseSnapshotReader::new();
        reader.insert(client("alice"), snapshot(1)).await;
        reader.clear().await;
        assert!(reader.is_empty().await);
    }
}
