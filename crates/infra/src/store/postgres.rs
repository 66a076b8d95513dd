//! Postgres-backed profile store.
//!
//! Profiles live in a single document table:
//!
//! ```sql
//! CREATE TABLE "<table>" (id TEXT PRIMARY KEY, document JSONB NOT NULL)
//! ```
//!
//! The table name comes from configuration (`USER_TABLE`) and is always
//! quoted, so names such as `interviewselect-users` work as-is.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use interviewselect_core::{Entity, ProfileId};
use interviewselect_profiles::Profile;

use super::{ProfileStore, StoreError};

#[derive(Debug, Clone)]
pub struct PostgresProfileStore {
    pool: Arc<PgPool>,
    table: String,
}

impl PostgresProfileStore {
    /// Wrap an existing pool. Fails if `table` cannot be used as an identifier.
    pub fn new(pool: PgPool, table: &str) -> Result<Self, StoreError> {
        Ok(Self {
            pool: Arc::new(pool),
            table: quote_ident(table)?,
        })
    }

    /// Connect to `database_url` and make sure the profile table exists.
    pub async fn connect(database_url: &str, table: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(16)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let store = Self::new(pool, table)?;
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, document JSONB NOT NULL)",
            self.table
        );
        sqlx::query(&sql)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    #[instrument(skip(self), fields(profile_id = %id), err)]
    async fn get(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError> {
        let sql = format!("SELECT document FROM {} WHERE id = $1", self.table);
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.map(decode_document).transpose()
    }

    #[instrument(skip(self, profile), fields(profile_id = %profile.id()), err)]
    async fn insert(&self, profile: &Profile) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, document) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(profile.id().to_string())
            .bind(Json(profile))
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(profile.id().to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self, profile), fields(profile_id = %profile.id()), err)]
    async fn put(&self, profile: &Profile) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, document) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET document = EXCLUDED.document",
            self.table
        );
        sqlx::query(&sql)
            .bind(profile.id().to_string())
            .bind(Json(profile))
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("put", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(profile_id = %id), err)]
    async fn delete(&self, id: &ProfileId) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        sqlx::query(&sql)
            .bind(id.to_string())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;
        Ok(())
    }
}

fn decode_document(row: sqlx::postgres::PgRow) -> Result<Profile, StoreError> {
    let doc: serde_json::Value = row
        .try_get("document")
        .map_err(|e| StoreError::Corrupt(e.to_string()))?;
    serde_json::from_value(doc).map_err(|e| StoreError::Corrupt(e.to_string()))
}

/// Double-quote a table name for interpolation into SQL.
fn quote_ident(name: &str) -> Result<String, StoreError> {
    if name.is_empty() || name.contains('"') || name.contains('\0') {
        return Err(StoreError::Backend(format!("invalid table name: {name:?}")));
    }
    Ok(format!("\"{name}\""))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {operation}: {}", db_err.message());
            match db_err.code().as_deref() {
                // Unique violation
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::Backend(format!("connection pool closed in {operation}")),
        other => StoreError::Backend(format!("sqlx error in {operation}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use interviewselect_profiles::{
        FreelancerPatch, ProfileFields, ProfileUpdate, RegistrationInput, build, merge, validate_registration,
    };

    use super::*;

    fn profile(name: &str) -> Profile {
        let input = validate_registration(RegistrationInput {
            email: format!("{}@example.com", name.to_lowercase()),
            password: Some("password123".to_string()),
            kind: "freelancer".to_string(),
            profile: ProfileFields {
                name: Some(name.to_string()),
                ..Default::default()
            },
        })
        .unwrap();
        build(&input, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    /// Connects to `TEST_DATABASE_URL` with a throwaway table, or returns
    /// `None` when no database is available.
    async fn scratch_store() -> Option<PostgresProfileStore> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let table = format!("profiles-test-{}", ProfileId::new());
        Some(PostgresProfileStore::connect(&url, &table).await.unwrap())
    }

    async fn drop_table(store: PostgresProfileStore) {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", store.table))
            .execute(&*store.pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn postgres_insert_of_existing_id_is_conflict() {
        let Some(store) = scratch_store().await else {
            eprintln!("TEST_DATABASE_URL not set; skipping");
            return;
        };

        let p = profile("Ada");
        store.insert(&p).await.unwrap();
        let err = store.insert(&p).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)), "got {err:?}");
        assert_eq!(store.get(p.id()).await.unwrap(), Some(p));

        drop_table(store).await;
    }

    #[tokio::test]
    async fn postgres_put_overwrites_and_delete_is_idempotent() {
        let Some(store) = scratch_store().await else {
            eprintln!("TEST_DATABASE_URL not set; skipping");
            return;
        };

        let p = profile("Grace");
        store.insert(&p).await.unwrap();

        let update = ProfileUpdate::Freelancer(FreelancerPatch {
            bio: Some("Compilers".to_string()),
            ..Default::default()
        });
        let updated = merge(&p, &update, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()).unwrap();
        store.put(&updated).await.unwrap();
        assert_eq!(store.get(p.id()).await.unwrap(), Some(updated));

        store.delete(p.id()).await.unwrap();
        store.delete(p.id()).await.unwrap();
        assert_eq!(store.get(p.id()).await.unwrap(), None);

        drop_table(store).await;
    }

    #[test]
    fn table_names_are_quoted() {
        assert_eq!(quote_ident("interviewselect-users").unwrap(), "\"interviewselect-users\"");
        assert_eq!(quote_ident("users").unwrap(), "\"users\"");
    }

    #[test]
    fn unsafe_table_names_are_rejected() {
        assert!(quote_ident("").is_err());
        assert!(quote_ident("users\"; DROP TABLE x; --").is_err());
    }
}
