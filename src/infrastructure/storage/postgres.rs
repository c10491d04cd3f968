//! PostgreSQL storage for accounts and posts

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::debug;

use crate::domain::account::{Account, AccountDraft, AccountId, AccountRepository};
use crate::domain::post::{NewPost, Post, PostId, PostRepository};
use crate::domain::DomainError;

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/micropost_accounts".to_string(),
            max_connections: 5,
            connect_timeout_secs: 30,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

const ACCOUNT_COLUMNS: &str =
    "id, name, email, password_digest, remember_token, admin, created_at, updated_at";

/// PostgreSQL implementation of [`AccountRepository`] and [`PostRepository`]
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_account(
        &self,
        filter: &str,
        value: &str,
        what: &str,
    ) -> Result<Option<Account>, DomainError> {
        let query = format!("SELECT {} FROM accounts WHERE {}", ACCOUNT_COLUMNS, filter);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get account by {}: {}", what, e)))?;

        row.as_ref().map(row_to_account).transpose()
    }
}

#[async_trait]
impl AccountRepository for PostgresStore {
    async fn get(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        let query = format!("SELECT {} FROM accounts WHERE id = $1", ACCOUNT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get account: {}", e)))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        self.fetch_account("lower(email) = lower($1)", email, "email")
            .await
    }

    async fn get_by_remember_token(&self, token: &str) -> Result<Option<Account>, DomainError> {
        self.fetch_account("remember_token = $1", token, "remember token")
            .await
    }

    async fn create(&self, draft: AccountDraft) -> Result<Account, DomainError> {
        let query = format!(
            r#"
            INSERT INTO accounts (name, email, password_digest, remember_token, admin)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(&draft.name)
            .bind(&draft.email)
            .bind(&draft.password_digest)
            .bind(&draft.remember_token)
            .bind(draft.admin)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &draft.email, "create account"))?;

        row_to_account(&row)
    }

    async fn update(&self, account: &Account) -> Result<Account, DomainError> {
        let query = format!(
            r#"
            UPDATE accounts
            SET name = $2, email = $3, password_digest = $4,
                remember_token = CASE WHEN remember_token = '' THEN $5 ELSE remember_token END,
                updated_at = $6
            WHERE id = $1
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(account.id().value())
            .bind(account.name())
            .bind(account.email())
            .bind(account.password_digest())
            .bind(account.remember_token())
            .bind(account.updated_at())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, account.email(), "update account"))?;

        match row {
            Some(row) => row_to_account(&row),
            None => Err(DomainError::not_found(format!(
                "Account '{}' not found",
                account.id()
            ))),
        }
    }

    async fn toggle_admin(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        let query = format!(
            "UPDATE accounts SET admin = NOT admin, updated_at = NOW() WHERE id = $1 RETURNING {}",
            ACCOUNT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to toggle admin: {}", e)))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn set_remember_token(
        &self,
        id: AccountId,
        token: &str,
    ) -> Result<Option<Account>, DomainError> {
        let query = format!(
            "UPDATE accounts SET remember_token = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            ACCOUNT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id.value())
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to set remember token: {}", e)))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn delete(&self, id: AccountId) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let posts = sqlx::query("DELETE FROM posts WHERE owner_id = $1")
            .bind(id.value())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete posts: {}", e)))?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.value())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete account: {}", e)))?
            .rows_affected()
            > 0;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit delete: {}", e)))?;

        debug!(id = %id, posts, "Removed account and owned posts");
        Ok(deleted)
    }

    async fn list(&self) -> Result<Vec<Account>, DomainError> {
        let query = format!("SELECT {} FROM accounts ORDER BY id", ACCOUNT_COLUMNS);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list accounts: {}", e)))?;

        rows.iter().map(row_to_account).collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count accounts: {}", e)))?;

        Ok(count as usize)
    }
}

#[async_trait]
impl PostRepository for PostgresStore {
    async fn get(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query("SELECT id, owner_id, content, created_at FROM posts WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get post: {}", e)))?;

        row.as_ref().map(row_to_post).transpose()
    }

    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let owner_id = post.owner_id;

        let row = sqlx::query(
            r#"
            INSERT INTO posts (owner_id, content, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, owner_id, content, created_at
            "#,
        )
        .bind(owner_id.value())
        .bind(&post.content)
        .bind(post.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::not_found(format!("Account '{}' not found", owner_id))
            } else {
                DomainError::storage(format!("Failed to create post: {}", e))
            }
        })?;

        row_to_post(&row)
    }

    async fn list_by_owner(&self, owner_id: AccountId) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, content, created_at
            FROM posts
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list posts: {}", e)))?;

        rows.iter().map(row_to_post).collect()
    }

    async fn delete_by_owner(&self, owner_id: AccountId) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM posts WHERE owner_id = $1")
            .bind(owner_id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete posts: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }

    async fn count_by_owner(&self, owner_id: AccountId) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE owner_id = $1")
            .bind(owner_id.value())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count posts: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_account(row: &PgRow) -> Result<Account, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Failed to decode account: {}", e));

    let id: i64 = row.try_get("id").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(decode)?;

    Ok(Account::restore(
        AccountId::new(id),
        row.try_get("name").map_err(decode)?,
        row.try_get("email").map_err(decode)?,
        row.try_get("password_digest").map_err(decode)?,
        row.try_get("remember_token").map_err(decode)?,
        row.try_get("admin").map_err(decode)?,
        created_at,
        updated_at,
    ))
}

fn row_to_post(row: &PgRow) -> Result<Post, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Failed to decode post: {}", e));

    let id: i64 = row.try_get("id").map_err(decode)?;
    let owner_id: i64 = row.try_get("owner_id").map_err(decode)?;
    let content: String = row.try_get("content").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;

    Ok(Post::new(
        PostId::new(id),
        NewPost::new(AccountId::new(owner_id), content).with_created_at(created_at),
    ))
}

fn map_write_error(e: sqlx::Error, email: &str, action: &str) -> DomainError {
    if is_unique_violation(&e) {
        DomainError::conflict(format!("Email '{}' already exists", email))
    } else {
        DomainError::storage(format!("Failed to {}: {}", action, e))
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
}
