//! Account infrastructure module
//!
//! Password hashing with Argon2, remember-token generation and the account
//! service that runs the save pipeline on top of the repositories.

mod password;
mod service;
mod token;

pub use password::{Argon2Hasher, PasswordHasher};
pub use service::AccountService;
pub use token::{RememberTokenGenerator, TokenGenerator};
