//! In-memory finance store
//!
//! Default backend for development and tests. Keeps profiles and records in
//! RwLock-guarded maps; no durability across restarts.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::FinanceError;
use crate::models::{
    FinanceRecord, FinanceRecordDocument, TransactionType, UserProfile, UserProfileDocument,
};
use crate::store::FinanceStore;
use crate::Result;

pub struct InMemoryStore {
    profiles: Arc<RwLock<HashMap<String, UserProfileDocument>>>,
    records: Arc<RwLock<HashMap<Uuid, FinanceRecordDocument>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(RwLock::new(HashMap::new())),
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl FinanceStore for InMemoryStore {

    async fn upsert_profile(&self, doc: UserProfileDocument) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        profiles.insert(doc.user_id.clone(), doc);
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<UserProfileDocument> {
        let profiles = self.profiles.read().await;
        profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| FinanceError::NotFound("User profile".to_string()))
    }

    async fn update_profile(
        &self,
        user_id: &str,
        profile: UserProfile,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        let doc = profiles
            .get_mut(user_id)
            .ok_or_else(|| FinanceError::NotFound("User profile".to_string()))?;

        doc.profile = profile;
        doc.updated_at = updated_at;
        Ok(())
    }

    async fn delete_profile(&self, user_id: &str) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        profiles
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| FinanceError::NotFound("User profile".to_string()))
    }

    async fn create_record(&self, doc: FinanceRecordDocument) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(doc.id, doc);
        Ok(())
    }

    async fn get_record(&self, record_id: Uuid) -> Result<FinanceRecordDocument> {
        let records = self.records.read().await;
        records
            .get(&record_id)
            .cloned()
            .ok_or_else(|| FinanceError::NotFound("Finance record".to_string()))
    }

    async fn update_record(
        &self,
        record_id: Uuid,
        record: FinanceRecord,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut records = self.records.write().await;
        let doc = records
            .get_mut(&record_id)
            .ok_or_else(|| FinanceError::NotFound("Finance record".to_string()))?;

        doc.record = record;
        doc.updated_at = Some(updated_at);
        Ok(())
    }

    async fn delete_record(&self, record_id: Uuid) -> Result<()> {
        let mut records = self.records.write().await;
        records
            .remove(&record_id)
            .map(|_| ())
            .ok_or_else(|| FinanceError::NotFound("Finance record".to_string()))
    }

    async fn list_user_records(
        &self,
        user_id: &str,
        transaction_type: Option<TransactionType>,
        limit: usize,
    ) -> Result<Vec<FinanceRecordDocument>> {
        let records = self.records.read().await;

        let mut matched: Vec<FinanceRecordDocument> = records
            .values()
            .filter(|doc| doc.record.user_id == user_id)
            .filter(|doc| {
                transaction_type
                    .map(|t| doc.record.transaction_type == t)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        matched.sort_by_key(|doc| doc.created_at);
        matched.truncate(limit);

        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_profile;
    use chrono::Duration;

    fn profile_doc(user_id: &str) -> UserProfileDocument {
        let now = Utc::now();
        UserProfileDocument {
            user_id: user_id.to_string(),
            profile: sample_profile(),
            created_at: now,
            updated_at: now,
        }
    }

    fn record_doc(user_id: &str, transaction_type: TransactionType, offset_secs: i64) -> FinanceRecordDocument {
        let now = Utc::now();
        FinanceRecordDocument {
            id: Uuid::new_v4(),
            record: FinanceRecord {
                user_id: user_id.to_string(),
                transaction_type,
                amount: 1_000.0,
                category: "misc".to_string(),
                description: None,
                date: now,
            },
            created_at: now + Duration::seconds(offset_secs),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_profile_crud() {
        let store = InMemoryStore::new();
        let doc = profile_doc("user-1");
        let created_at = doc.created_at;

        store.upsert_profile(doc).await.unwrap();

        let loaded = store.get_profile("user-1").await.unwrap();
        assert_eq!(loaded.profile, sample_profile());

        let mut updated = sample_profile();
        updated.monthly_expenses = 55_000;
        let later = created_at + Duration::seconds(5);
        store.update_profile("user-1", updated.clone(), later).await.unwrap();

        let loaded = store.get_profile("user-1").await.unwrap();
        assert_eq!(loaded.profile, updated);
        assert_eq!(loaded.created_at, created_at);
        assert_eq!(loaded.updated_at, later);

        store.delete_profile("user-1").await.unwrap();
        assert!(store.get_profile("user-1").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_keys_are_not_found() {
        let store = InMemoryStore::new();

        let err = store.get_profile("ghost").await.unwrap_err();
        assert!(matches!(err, FinanceError::NotFound(_)));

        let err = store
            .update_profile("ghost", sample_profile(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, FinanceError::NotFound(_)));

        let err = store.delete_record(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, FinanceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_record_crud() {
        let store = InMemoryStore::new();
        let doc = record_doc("user-1", TransactionType::Income, 0);
        let id = doc.id;

        store.create_record(doc).await.unwrap();

        let loaded = store.get_record(id).await.unwrap();
        assert_eq!(loaded.record.transaction_type, TransactionType::Income);
        assert!(loaded.updated_at.is_none());

        let mut changed = loaded.record.clone();
        changed.amount = 2_500.0;
        store.update_record(id, changed, Utc::now()).await.unwrap();

        let loaded = store.get_record(id).await.unwrap();
        assert_eq!(loaded.record.amount, 2_500.0);
        assert!(loaded.updated_at.is_some());

        store.delete_record(id).await.unwrap();
        assert!(store.get_record(id).await.is_err());
    }

    #[tokio::test]
    async fn test_list_filters_by_user_and_type() {
        let store = InMemoryStore::new();

        store
            .create_record(record_doc("user-1", TransactionType::Income, 0))
            .await
            .unwrap();
        store
            .create_record(record_doc("user-1", TransactionType::Expense, 1))
            .await
            .unwrap();
        store
            .create_record(record_doc("user-2", TransactionType::Income, 2))
            .await
            .unwrap();

        let all = store.list_user_records("user-1", None, 100).await.unwrap();
        assert_eq!(all.len(), 2);

        let incomes = store
            .list_user_records("user-1", Some(TransactionType::Income), 100)
            .await
            .unwrap();
        assert_eq!(incomes.len(), 1);
        assert_eq!(incomes[0].record.transaction_type, TransactionType::Income);

        let none = store
            .list_user_records("user-3", None, 100)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_list_orders_and_limits() {
        let store = InMemoryStore::new();

        for i in 0..5 {
            store
                .create_record(record_doc("user-1", TransactionType::Expense, i))
                .await
                .unwrap();
        }

        let limited = store.list_user_records("user-1", None, 3).await.unwrap();
        assert_eq!(limited.len(), 3);
        assert!(limited.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }
}
