//! In-memory storage for accounts and posts
//!
//! Accounts, posts and the email index live behind one lock, so every write
//! (including the cascading account delete) is a single unit of work.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::account::{normalize_email, Account, AccountDraft, AccountId, AccountRepository};
use crate::domain::post::{NewPost, Post, PostId, PostRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct StoreState {
    accounts: BTreeMap<AccountId, Account>,
    posts: BTreeMap<PostId, Post>,
    /// Lower-cased email -> account ID
    email_index: HashMap<String, AccountId>,
    next_account_id: i64,
    next_post_id: i64,
}

impl StoreState {
    fn allocate_account_id(&mut self) -> AccountId {
        self.next_account_id += 1;
        AccountId::new(self.next_account_id)
    }

    fn allocate_post_id(&mut self) -> PostId {
        self.next_post_id += 1;
        PostId::new(self.next_post_id)
    }
}

/// In-memory implementation of [`AccountRepository`] and [`PostRepository`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn get(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        let state = self.state.read().await;
        Ok(state.accounts.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let state = self.state.read().await;

        Ok(state
            .email_index
            .get(&normalize_email(email))
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    async fn get_by_remember_token(&self, token: &str) -> Result<Option<Account>, DomainError> {
        let state = self.state.read().await;

        Ok(state
            .accounts
            .values()
            .find(|a| a.remember_token() == token)
            .cloned())
    }

    async fn create(&self, draft: AccountDraft) -> Result<Account, DomainError> {
        let mut state = self.state.write().await;
        let key = normalize_email(&draft.email);

        if state.email_index.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                draft.email
            )));
        }

        let id = state.allocate_account_id();
        let account = Account::from_draft(id, draft);

        state.email_index.insert(key, id);
        state.accounts.insert(id, account.clone());

        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<Account, DomainError> {
        let mut state = self.state.write().await;
        let id = account.id();

        let Some(stored) = state.accounts.get(&id) else {
            return Err(DomainError::not_found(format!("Account '{}' not found", id)));
        };

        let mut updated = account.clone();
        updated.keep_stored_flags(stored);

        let old_key = normalize_email(stored.email());
        let new_key = normalize_email(updated.email());

        if old_key != new_key {
            if state.email_index.contains_key(&new_key) {
                return Err(DomainError::conflict(format!(
                    "Email '{}' already exists",
                    account.email()
                )));
            }

            state.email_index.remove(&old_key);
            state.email_index.insert(new_key, id);
        }

        state.accounts.insert(id, updated.clone());

        Ok(updated)
    }

    async fn toggle_admin(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        let mut state = self.state.write().await;

        Ok(state.accounts.get_mut(&id).map(|account| {
            account.toggle_admin();
            account.clone()
        }))
    }

    async fn set_remember_token(
        &self,
        id: AccountId,
        token: &str,
    ) -> Result<Option<Account>, DomainError> {
        let mut state = self.state.write().await;

        Ok(state.accounts.get_mut(&id).map(|account| {
            account.set_remember_token(token);
            account.clone()
        }))
    }

    async fn delete(&self, id: AccountId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;

        let Some(account) = state.accounts.remove(&id) else {
            return Ok(false);
        };

        let before = state.posts.len();
        state.posts.retain(|_, post| post.owner_id() != id);
        state.email_index.remove(&normalize_email(account.email()));

        debug!(id = %id, posts = before - state.posts.len(), "Removed account and owned posts");
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<Account>, DomainError> {
        let state = self.state.read().await;
        Ok(state.accounts.values().cloned().collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let state = self.state.read().await;
        Ok(state.accounts.len())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn get(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        let state = self.state.read().await;
        Ok(state.posts.get(&id).cloned())
    }

    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let mut state = self.state.write().await;

        if !state.accounts.contains_key(&post.owner_id) {
            return Err(DomainError::not_found(format!(
                "Account '{}' not found",
                post.owner_id
            )));
        }

        let id = state.allocate_post_id();
        let post = Post::new(id, post);
        state.posts.insert(id, post.clone());

        Ok(post)
    }

    async fn list_by_owner(&self, owner_id: AccountId) -> Result<Vec<Post>, DomainError> {
        let state = self.state.read().await;

        let mut posts: Vec<Post> = state
            .posts
            .values()
            .filter(|p| p.owner_id() == owner_id)
            .cloned()
            .collect();

        posts.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });

        Ok(posts)
    }

    async fn delete_by_owner(&self, owner_id: AccountId) -> Result<usize, DomainError> {
        let mut state = self.state.write().await;

        let before = state.posts.len();
        state.posts.retain(|_, post| post.owner_id() != owner_id);

        Ok(before - state.posts.len())
    }
}
