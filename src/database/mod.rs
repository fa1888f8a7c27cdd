pub mod postgres;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Post, Profile, User};

pub use postgres::PgStore;

/// Errors from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed document: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence for the three parent-document collections.
///
/// Every mutation is load-then-save of a whole document (last-write-wins),
/// except [`merge_profile`](DocumentStore::merge_profile), which applies a
/// shallow merge in a single statement so its race window stays one
/// statement wide.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    // users
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError>;

    // profiles
    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError>;
    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError>;
    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError>;
    /// Shallow top-level merge of `merge` into the profile document owned by
    /// `user_id`. Returns the updated document, or `None` if absent.
    async fn merge_profile(
        &self,
        user_id: Uuid,
        merge: &Map<String, Value>,
    ) -> Result<Option<Profile>, StoreError>;
    async fn delete_profile_by_user(&self, user_id: Uuid) -> Result<bool, StoreError>;

    // posts
    async fn insert_post(&self, post: &Post) -> Result<(), StoreError>;
    async fn save_post(&self, post: &Post) -> Result<(), StoreError>;
    async fn post_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError>;
    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>, StoreError>;
    async fn delete_post(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn delete_posts_by_user(&self, user_id: Uuid) -> Result<u64, StoreError>;
}
