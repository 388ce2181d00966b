//! Postgres store backend (sqlx).
//!
//! The schema-light `assets`/`beneficiaries`/`file` fields live in JSONB
//! columns; everything else is typed. The schema is created on connect.

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use serde_json::Value;

use super::models::estate::{cast_list, DigitalEstate, EstateDraft, EstatePatch};
use super::models::user::User;
use super::{Store, StoreError};
use crate::files::StoredFile;

const CREATE_USERS: &str = "
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
)";

const CREATE_ESTATES: &str = "
CREATE TABLE IF NOT EXISTS digital_estates (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    dob DATE NOT NULL,
    assets JSONB NOT NULL,
    beneficiaries JSONB NOT NULL,
    file JSONB,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)";

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and make sure the schema exists.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        tracing::info!("Connected to Postgres store");
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_USERS).execute(&self.pool).await?;
        sqlx::query(CREATE_ESTATES).execute(&self.pool).await?;
        Ok(())
    }
}

fn row_to_estate(row: &PgRow) -> Result<DigitalEstate, StoreError> {
    let assets: Value = row.try_get("assets")?;
    let beneficiaries: Value = row.try_get("beneficiaries")?;
    let file: Option<Value> = row.try_get("file")?;
    let file = file
        .map(serde_json::from_value::<StoredFile>)
        .transpose()
        .map_err(|e| StoreError::Query(format!("malformed file descriptor: {e}")))?;

    Ok(DigitalEstate {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        dob: row.try_get("dob")?,
        assets: cast_list(assets),
        beneficiaries: cast_list(beneficiaries),
        file,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl Store for PostgresStore {
    async fn insert_estate(&self, draft: EstateDraft) -> Result<DigitalEstate, StoreError> {
        let record = draft.into_record()?;

        sqlx::query(
            "INSERT INTO digital_estates \
             (id, name, dob, assets, beneficiaries, file, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(record.dob)
        .bind(Json(&record.assets))
        .bind(Json(&record.beneficiaries))
        .bind(record.file.as_ref().map(Json))
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_estates(&self) -> Result<Vec<DigitalEstate>, StoreError> {
        let rows = sqlx::query("SELECT * FROM digital_estates ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_estate).collect()
    }

    async fn find_estate(&self, id: Uuid) -> Result<Option<DigitalEstate>, StoreError> {
        let row = sqlx::query("SELECT * FROM digital_estates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_estate).transpose()
    }

    async fn update_estate(
        &self,
        id: Uuid,
        patch: EstatePatch,
    ) -> Result<Option<DigitalEstate>, StoreError> {
        let cast = patch.cast()?;

        // Single-statement merge; absent fields keep their stored value.
        let row = sqlx::query(
            "UPDATE digital_estates SET \
             name = COALESCE($2, name), \
             dob = COALESCE($3, dob), \
             assets = COALESCE($4, assets), \
             beneficiaries = COALESCE($5, beneficiaries), \
             updated_at = $6 \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(cast.name)
        .bind(cast.dob)
        .bind(cast.assets.map(Json))
        .bind(cast.beneficiaries.map(Json))
        .bind(chrono::Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_estate).transpose()
    }

    async fn delete_estate(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM digital_estates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_user(&self, user: User) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Conflict(user.username))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn delete_user(&self, username: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
