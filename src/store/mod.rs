//! Profile and record persistence
//!
//! One trait, two backends: an in-memory map store for development and a
//! postgres store for deployments. Selected from the environment at startup.

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use chrono::{DateTime, Utc};
use std::env;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{
    FinanceRecord, FinanceRecordDocument, TransactionType, UserProfile, UserProfileDocument,
};
use crate::Result;

/// Keyed document storage for profiles (by user id) and finance records
/// (by generated id).
///
/// Every lookup/update/delete of an absent key yields
/// [`FinanceError::NotFound`](crate::error::FinanceError::NotFound).
#[async_trait::async_trait]
pub trait FinanceStore: Send + Sync {
    /// Create or overwrite the profile stored under `doc.user_id`.
    async fn upsert_profile(&self, doc: UserProfileDocument) -> Result<()>;
    async fn get_profile(&self, user_id: &str) -> Result<UserProfileDocument>;
    /// Replace an existing profile, preserving its `created_at`.
    async fn update_profile(
        &self,
        user_id: &str,
        profile: UserProfile,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;
    async fn delete_profile(&self, user_id: &str) -> Result<()>;

    async fn create_record(&self, doc: FinanceRecordDocument) -> Result<()>;
    async fn get_record(&self, record_id: Uuid) -> Result<FinanceRecordDocument>;
    async fn update_record(
        &self,
        record_id: Uuid,
        record: FinanceRecord,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;
    async fn delete_record(&self, record_id: Uuid) -> Result<()>;
    /// List a user's records, optionally filtered by transaction type,
    /// ordered by creation time, truncated to `limit`.
    async fn list_user_records(
        &self,
        user_id: &str,
        transaction_type: Option<TransactionType>,
        limit: usize,
    ) -> Result<Vec<FinanceRecordDocument>>;
}

/// Select the storage backend from the environment.
///
/// POSTGRES_URL/DATABASE_URL present → postgres; otherwise, or when the pool
/// cannot be created, fall back to the in-memory store so the service stays
/// available.
pub fn build_store_from_env() -> Arc<dyn FinanceStore> {
    let database_url = env::var("POSTGRES_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .ok();

    if let Some(url) = database_url {
        match PgStore::connect_lazy(&url) {
            Ok(store) => {
                info!("Finance store backend: postgres");
                return Arc::new(store);
            }
            Err(error) => {
                warn!(
                    "Failed to initialize postgres store, falling back to in-memory: {}",
                    error
                );
            }
        }
    }

    info!("Finance store backend: in-memory");
    Arc::new(InMemoryStore::new())
}
