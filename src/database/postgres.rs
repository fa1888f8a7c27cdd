use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::domain::{Post, Profile, User};

use super::{DocumentStore, StoreError};

/// Postgres-backed document store: one JSONB document per row, with keyed
/// columns only where lookups or ordering need them.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(url)
            .await?;

        Ok(Self { pool })
    }

    /// Bootstrap the collection tables.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                doc JSONB NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS profiles (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL UNIQUE,
                doc JSONB NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS posts (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                doc JSONB NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("document tables ready");
        Ok(())
    }
}

fn encode<T: Serialize>(doc: &T) -> Result<Value, StoreError> {
    serde_json::to_value(doc).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn decode<T: DeserializeOwned>(doc: Value) -> Result<T, StoreError> {
    serde_json::from_value(doc).map_err(|e| StoreError::Corrupt(e.to_string()))
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO users (id, email, doc) VALUES ($1, $2, $3)")
            .bind(user.id)
            .bind(&user.email)
            .bind(encode(user)?)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT doc FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(r) => {
                let doc: Value = r.try_get("doc")?;
                Ok(Some(decode(doc)?))
            }
            None => Ok(None),
        }
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT doc FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(r) => {
                let doc: Value = r.try_get("doc")?;
                Ok(Some(decode(doc)?))
            }
            None => Ok(None),
        }
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO profiles (id, user_id, doc) VALUES ($1, $2, $3)")
            .bind(profile.id)
            .bind(profile.user)
            .bind(encode(profile)?)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        sqlx::query("UPDATE profiles SET doc = $2 WHERE id = $1")
            .bind(profile.id)
            .bind(encode(profile)?)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query("SELECT doc FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(r) => {
                let doc: Value = r.try_get("doc")?;
                Ok(Some(decode(doc)?))
            }
            None => Ok(None),
        }
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let rows = sqlx::query("SELECT doc FROM profiles")
            .fetch_all(&self.pool)
            .await?;
        let mut profiles = Vec::with_capacity(rows.len());
        for row in rows {
            let doc: Value = row.try_get("doc")?;
            profiles.push(decode(doc)?);
        }
        Ok(profiles)
    }

    async fn merge_profile(
        &self,
        user_id: Uuid,
        merge: &Map<String, Value>,
    ) -> Result<Option<Profile>, StoreError> {
        // One statement; the shallow `||` merge is atomic at the row level
        let row = sqlx::query("UPDATE profiles SET doc = doc || $2 WHERE user_id = $1 RETURNING doc")
            .bind(user_id)
            .bind(Value::Object(merge.clone()))
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(r) => {
                let doc: Value = r.try_get("doc")?;
                Ok(Some(decode(doc)?))
            }
            None => Ok(None),
        }
    }

    async fn delete_profile_by_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO posts (id, user_id, created_at, doc) VALUES ($1, $2, $3, $4)")
            .bind(post.id)
            .bind(post.user)
            .bind(post.created_at)
            .bind(encode(post)?)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn save_post(&self, post: &Post) -> Result<(), StoreError> {
        sqlx::query("UPDATE posts SET doc = $2 WHERE id = $1")
            .bind(post.id)
            .bind(encode(post)?)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn post_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query("SELECT doc FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(r) => {
                let doc: Value = r.try_get("doc")?;
                Ok(Some(decode(doc)?))
            }
            None => Ok(None),
        }
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query("SELECT doc FROM posts ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        let mut posts = Vec::with_capacity(rows.len());
        for row in rows {
            let doc: Value = row.try_get("doc")?;
            posts.push(decode(doc)?);
        }
        Ok(posts)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_posts_by_user(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
