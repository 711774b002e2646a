//! Postgres finance store
//!
//! Networked backend over sqlx. The pool is created lazily and the schema is
//! ensured once on first use, so startup never blocks on the database.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::error::FinanceError;
use crate::models::{
    FinanceRecord, FinanceRecordDocument, TransactionType, UserProfile, UserProfileDocument,
};
use crate::store::FinanceStore;
use crate::Result;

pub struct PgStore {
    pool: PgPool,
    schema_ready: OnceCell<()>,
}

impl PgStore {
    /// Build a store over a lazy connection pool. Connection failures surface
    /// on first query, not here.
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(database_url)
            .map_err(|e| FinanceError::Store(format!("Failed to create postgres pool: {}", e)))?;

        Ok(Self {
            pool,
            schema_ready: OnceCell::new(),
        })
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.schema_ready
            .get_or_try_init(|| async {
                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS user_profiles (
                      user_id TEXT PRIMARY KEY,
                      profile JSONB NOT NULL,
                      created_at TIMESTAMPTZ NOT NULL,
                      updated_at TIMESTAMPTZ NOT NULL
                    );
                    "#,
                )
                .execute(&self.pool)
                .await?;

                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS finance_records (
                      id UUID PRIMARY KEY,
                      user_id TEXT NOT NULL,
                      transaction_type TEXT NOT NULL,
                      amount DOUBLE PRECISION NOT NULL,
                      category TEXT NOT NULL,
                      description TEXT,
                      date TIMESTAMPTZ NOT NULL,
                      created_at TIMESTAMPTZ NOT NULL,
                      updated_at TIMESTAMPTZ
                    );
                    "#,
                )
                .execute(&self.pool)
                .await?;

                sqlx::query(
                    r#"
                    CREATE INDEX IF NOT EXISTS idx_finance_records_user_type_time
                    ON finance_records (user_id, transaction_type, created_at);
                    "#,
                )
                .execute(&self.pool)
                .await?;

                Ok::<(), sqlx::Error>(())
            })
            .await
            .map_err(|e| {
                FinanceError::Store(format!("Failed to initialize finance schema: {}", e))
            })?;

        Ok(())
    }

    fn type_to_db(transaction_type: TransactionType) -> &'static str {
        match transaction_type {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Investment => "investment",
        }
    }

    fn type_from_db(value: &str) -> Result<TransactionType> {
        match value {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            "investment" => Ok(TransactionType::Investment),
            other => Err(FinanceError::Store(format!(
                "Unknown transaction type in store: {}",
                other
            ))),
        }
    }

    fn profile_from_row(row: &sqlx::postgres::PgRow) -> Result<UserProfileDocument> {
        let profile_value: serde_json::Value = row
            .try_get("profile")
            .map_err(|e| FinanceError::Store(format!("Failed to read profile column: {}", e)))?;
        let profile: UserProfile = serde_json::from_value(profile_value)?;

        Ok(UserProfileDocument {
            user_id: row
                .try_get("user_id")
                .map_err(|e| FinanceError::Store(format!("Failed to read user_id: {}", e)))?,
            profile,
            created_at: row
                .try_get("created_at")
                .map_err(|e| FinanceError::Store(format!("Failed to read created_at: {}", e)))?,
            updated_at: row
                .try_get("updated_at")
                .map_err(|e| FinanceError::Store(format!("Failed to read updated_at: {}", e)))?,
        })
    }

    fn record_from_row(row: &sqlx::postgres::PgRow) -> Result<FinanceRecordDocument> {
        let db_type: String = row
            .try_get("transaction_type")
            .map_err(|e| FinanceError::Store(format!("Failed to read transaction_type: {}", e)))?;

        let read = |e: sqlx::Error| FinanceError::Store(format!("Failed to read record row: {}", e));

        Ok(FinanceRecordDocument {
            id: row.try_get("id").map_err(read)?,
            record: FinanceRecord {
                user_id: row.try_get("user_id").map_err(read)?,
                transaction_type: Self::type_from_db(&db_type)?,
                amount: row.try_get("amount").map_err(read)?,
                category: row.try_get("category").map_err(read)?,
                description: row.try_get("description").map_err(read)?,
                date: row.try_get("date").map_err(read)?,
            },
            created_at: row.try_get("created_at").map_err(read)?,
            updated_at: row.try_get("updated_at").map_err(read)?,
        })
    }
}

#[async_trait::async_trait]
impl FinanceStore for PgStore {

    async fn upsert_profile(&self, doc: UserProfileDocument) -> Result<()> {
        self.ensure_schema().await?;

        let profile_value = serde_json::to_value(&doc.profile)?;

        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, profile, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id)
            DO UPDATE SET profile = $2, updated_at = $4
            "#,
        )
        .bind(&doc.user_id)
        .bind(&profile_value)
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| FinanceError::Store(format!("Failed to save user profile: {}", e)))?;

        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<UserProfileDocument> {
        self.ensure_schema().await?;

        let row = sqlx::query(
            "SELECT user_id, profile, created_at, updated_at FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| FinanceError::Store(format!("Failed to load user profile: {}", e)))?
        .ok_or_else(|| FinanceError::NotFound("User profile".to_string()))?;

        Self::profile_from_row(&row)
    }

    async fn update_profile(
        &self,
        user_id: &str,
        profile: UserProfile,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        self.ensure_schema().await?;

        let profile_value = serde_json::to_value(&profile)?;

        let result = sqlx::query(
            "UPDATE user_profiles SET profile = $2, updated_at = $3 WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(&profile_value)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| FinanceError::Store(format!("Failed to update user profile: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(FinanceError::NotFound("User profile".to_string()));
        }
        Ok(())
    }

    async fn delete_profile(&self, user_id: &str) -> Result<()> {
        self.ensure_schema().await?;

        let result = sqlx::query("DELETE FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| FinanceError::Store(format!("Failed to delete user profile: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(FinanceError::NotFound("User profile".to_string()));
        }
        Ok(())
    }

    async fn create_record(&self, doc: FinanceRecordDocument) -> Result<()> {
        self.ensure_schema().await?;

        sqlx::query(
            r#"
            INSERT INTO finance_records
              (id, user_id, transaction_type, amount, category, description, date, created_at, updated_at)
            VALUES
              ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(doc.id)
        .bind(&doc.record.user_id)
        .bind(Self::type_to_db(doc.record.transaction_type))
        .bind(doc.record.amount)
        .bind(&doc.record.category)
        .bind(&doc.record.description)
        .bind(doc.record.date)
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| FinanceError::Store(format!("Failed to save finance record: {}", e)))?;

        Ok(())
    }

    async fn get_record(&self, record_id: Uuid) -> Result<FinanceRecordDocument> {
        self.ensure_schema().await?;

        let row = sqlx::query(
            r#"
            SELECT id, user_id, transaction_type, amount, category, description, date, created_at, updated_at
            FROM finance_records
            WHERE id = $1
            "#,
        )
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| FinanceError::Store(format!("Failed to load finance record: {}", e)))?
        .ok_or_else(|| FinanceError::NotFound("Finance record".to_string()))?;

        Self::record_from_row(&row)
    }

    async fn update_record(
        &self,
        record_id: Uuid,
        record: FinanceRecord,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        self.ensure_schema().await?;

        let result = sqlx::query(
            r#"
            UPDATE finance_records
            SET user_id = $2, transaction_type = $3, amount = $4, category = $5,
                description = $6, date = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(record_id)
        .bind(&record.user_id)
        .bind(Self::type_to_db(record.transaction_type))
        .bind(record.amount)
        .bind(&record.category)
        .bind(&record.description)
        .bind(record.date)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| FinanceError::Store(format!("Failed to update finance record: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(FinanceError::NotFound("Finance record".to_string()));
        }
        Ok(())
    }

    async fn delete_record(&self, record_id: Uuid) -> Result<()> {
        self.ensure_schema().await?;

        let result = sqlx::query("DELETE FROM finance_records WHERE id = $1")
            .bind(record_id)
            .execute(&self.pool)
            .await
            .map_err(|e| FinanceError::Store(format!("Failed to delete finance record: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(FinanceError::NotFound("Finance record".to_string()));
        }
        Ok(())
    }

    async fn list_user_records(
        &self,
        user_id: &str,
        transaction_type: Option<TransactionType>,
        limit: usize,
    ) -> Result<Vec<FinanceRecordDocument>> {
        self.ensure_schema().await?;

        let rows = match transaction_type {
            Some(filter) => {
                sqlx::query(
                    r#"
                    SELECT id, user_id, transaction_type, amount, category, description, date, created_at, updated_at
                    FROM finance_records
                    WHERE user_id = $1 AND transaction_type = $2
                    ORDER BY created_at ASC
                    LIMIT $3
                    "#,
                )
                .bind(user_id)
                .bind(Self::type_to_db(filter))
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, user_id, transaction_type, amount, category, description, date, created_at, updated_at
                    FROM finance_records
                    WHERE user_id = $1
                    ORDER BY created_at ASC
                    LIMIT $2
                    "#,
                )
                .bind(user_id)
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| FinanceError::Store(format!("Failed to list finance records: {}", e)))?;

        rows.iter().map(Self::record_from_row).collect()
    }
}
