use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::embedded::{self, EditError, EmbeddedEntry};
use super::user::User;

/// A post authored by a user, carrying denormalized author name/avatar plus
/// embedded like and comment sub-collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    #[serde(default)]
    pub likes: Vec<Like>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: Uuid,
    pub user: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

impl EmbeddedEntry for Like {
    fn entry_id(&self) -> Uuid {
        self.id
    }

    fn authored_by(&self) -> Option<Uuid> {
        Some(self.user)
    }
}

impl EmbeddedEntry for Comment {
    fn entry_id(&self) -> Uuid {
        self.id
    }

    fn authored_by(&self) -> Option<Uuid> {
        Some(self.user)
    }
}

impl Post {
    pub fn new(author: &User, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: author.id,
            text,
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// At most one like per user.
    pub fn like(&mut self, user: Uuid) -> Result<(), EditError> {
        embedded::append_unique_author(
            &mut self.likes,
            Like {
                id: Uuid::new_v4(),
                user,
            },
        )
    }

    pub fn unlike(&mut self, user: Uuid) -> Result<(), EditError> {
        embedded::remove_by_author(&mut self.likes, user).map(|_| ())
    }

    pub fn add_comment(&mut self, author: &User, text: String) -> Uuid {
        let comment = Comment {
            id: Uuid::new_v4(),
            user: author.id,
            text,
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            date: Utc::now(),
        };
        let id = comment.id;
        embedded::append(&mut self.comments, comment);
        id
    }

    /// Only the comment's author may remove it.
    pub fn remove_comment(&mut self, comment_id: Uuid, requester: Uuid) -> Result<Comment, EditError> {
        embedded::remove_owned(&mut self.comments, comment_id, requester)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(name: &str) -> User {
        User::new(name.into(), format!("{}@example.com", name.to_lowercase()), "phc".into())
    }

    #[test]
    fn second_like_by_same_user_is_rejected() {
        let alice = author("Alice");
        let mut post = Post::new(&alice, "hello".into());

        post.like(alice.id).expect("first like");
        assert_eq!(post.like(alice.id), Err(EditError::Duplicate));
        assert_eq!(post.likes.len(), 1);
        assert_eq!(post.likes[0].user, alice.id);
    }

    #[test]
    fn unlike_without_a_like_fails() {
        let alice = author("Alice");
        let mut post = Post::new(&alice, "hello".into());
        assert_eq!(post.unlike(alice.id), Err(EditError::NotFound));
    }

    #[test]
    fn like_then_unlike_empties_the_collection() {
        let alice = author("Alice");
        let bob = author("Bob");
        let mut post = Post::new(&alice, "hello".into());

        post.like(alice.id).expect("like");
        post.like(bob.id).expect("like");
        post.unlike(alice.id).expect("unlike");
        assert_eq!(post.likes.len(), 1);
        assert_eq!(post.likes[0].user, bob.id);
    }

    #[test]
    fn comments_are_ordered_most_recent_first() {
        let alice = author("Alice");
        let bob = author("Bob");
        let mut post = Post::new(&alice, "hello".into());

        post.add_comment(&alice, "hi".into());
        post.add_comment(&bob, "yo".into());

        assert_eq!(post.comments[0].user, bob.id);
        assert_eq!(post.comments[0].text, "yo");
        assert_eq!(post.comments[1].user, alice.id);
    }

    #[test]
    fn comment_removal_is_keyed_on_the_comment_id() {
        let alice = author("Alice");
        let mut post = Post::new(&alice, "hello".into());

        let first = post.add_comment(&alice, "first".into());
        let second = post.add_comment(&alice, "second".into());

        let removed = post.remove_comment(second, alice.id).expect("remove");
        assert_eq!(removed.id, second);
        assert_eq!(post.comments.len(), 1);
        assert_eq!(post.comments[0].id, first);
    }

    #[test]
    fn only_the_author_can_remove_a_comment() {
        let alice = author("Alice");
        let bob = author("Bob");
        let mut post = Post::new(&alice, "hello".into());

        let id = post.add_comment(&alice, "mine".into());
        assert_eq!(post.remove_comment(id, bob.id), Err(EditError::Forbidden));
        assert_eq!(post.comments.len(), 1);

        post.remove_comment(id, alice.id).expect("author removes");
        assert!(post.comments.is_empty());
    }

    #[test]
    fn missing_comment_reports_not_found() {
        let alice = author("Alice");
        let mut post = Post::new(&alice, "hello".into());
        assert_eq!(post.remove_comment(Uuid::new_v4(), alice.id), Err(EditError::NotFound));
    }
}
