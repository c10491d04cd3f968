//! Domain layer - Core business logic and entities

pub mod account;
pub mod error;
pub mod post;

pub use account::{Account, AccountForm, AccountId, AccountRepository, AccountValidationError};
pub use error::{DomainError, ValidationErrors};
pub use post::{NewPost, Post, PostId, PostRepository};
