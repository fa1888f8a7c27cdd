use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::{DocumentStore, StoreError};
use crate::domain::{Post, Profile, User};

/// In-memory document store mirroring the Postgres implementation's
/// semantics, including the shallow top-level merge for profile updates.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    profiles: RwLock<HashMap<Uuid, Profile>>,
    posts: RwLock<HashMap<Uuid, Post>>,
}

fn shallow_merge(profile: &Profile, merge: &Map<String, Value>) -> Result<Profile, StoreError> {
    let mut doc = serde_json::to_value(profile).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    if let Value::Object(base) = &mut doc {
        for (key, value) in merge {
            base.insert(key.clone(), value.clone());
        }
    }
    serde_json::from_value(doc).map_err(|e| StoreError::Corrupt(e.to_string()))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.profiles.write().await.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.profiles.write().await.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self
            .profiles
            .read()
            .await
            .values()
            .find(|p| p.user == user_id)
            .cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self.profiles.read().await.values().cloned().collect())
    }

    async fn merge_profile(
        &self,
        user_id: Uuid,
        merge: &Map<String, Value>,
    ) -> Result<Option<Profile>, StoreError> {
        let mut profiles = self.profiles.write().await;
        let Some(current) = profiles.values().find(|p| p.user == user_id).cloned() else {
            return Ok(None);
        };
        let updated = shallow_merge(&current, merge)?;
        profiles.insert(updated.id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_profile_by_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let mut profiles = self.profiles.write().await;
        let id = profiles.values().find(|p| p.user == user_id).map(|p| p.id);
        Ok(id.and_then(|id| profiles.remove(&id)).is_some())
    }

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(())
    }

    async fn save_post(&self, post: &Post) -> Result<(), StoreError> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(())
    }

    async fn post_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.posts.write().await.remove(&id).is_some())
    }

    async fn delete_posts_by_user(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|_, p| p.user != user_id);
        Ok((before - posts.len()) as u64)
    }
}
