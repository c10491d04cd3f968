//! Post entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::account::AccountId;

/// Post identifier, assigned by the storage layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i64);

impl PostId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A post that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewPost {
    pub owner_id: AccountId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    pub fn new(owner_id: AccountId, content: impl Into<String>) -> Self {
        Self {
            owner_id,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Override the creation time (imports, fixtures)
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    id: PostId,
    owner_id: AccountId,
    content: String,
    created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(id: PostId, post: NewPost) -> Self {
        Self {
            id,
            owner_id: post.owner_id,
            content: post.content,
            created_at: post.created_at,
        }
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn owner_id(&self) -> AccountId {
        self.owner_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_post() {
        let owner = AccountId::new(4);
        let created_at = Utc::now() - Duration::days(1);
        let post = Post::new(
            PostId::new(9),
            NewPost::new(owner, "Lorem ipsum").with_created_at(created_at),
        );

        assert_eq!(post.id().value(), 9);
        assert_eq!(post.owner_id(), owner);
        assert_eq!(post.content(), "Lorem ipsum");
        assert_eq!(post.created_at(), created_at);
    }
}
