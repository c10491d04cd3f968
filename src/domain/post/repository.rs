//! Post repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewPost, Post, PostId};
use crate::domain::account::AccountId;
use crate::domain::DomainError;

/// Repository trait for post storage
#[async_trait]
pub trait PostRepository: Send + Sync + Debug {
    async fn get(&self, id: PostId) -> Result<Option<Post>, DomainError>;

    /// Store a new post; the owner must exist
    async fn create(&self, post: NewPost) -> Result<Post, DomainError>;

    /// Posts owned by an account, newest first (ties: higher ID first)
    async fn list_by_owner(&self, owner_id: AccountId) -> Result<Vec<Post>, DomainError>;

    /// Delete every post owned by an account, returning how many were removed
    async fn delete_by_owner(&self, owner_id: AccountId) -> Result<usize, DomainError>;

    async fn count_by_owner(&self, owner_id: AccountId) -> Result<usize, DomainError> {
        Ok(self.list_by_owner(owner_id).await?.len())
    }
}
