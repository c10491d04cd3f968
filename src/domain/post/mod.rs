//! Post domain
//!
//! Posts are owned by an account. Only the fields the account model relies on
//! (owner and creation time) carry any rules here.

mod entity;
mod repository;

pub use entity::{NewPost, Post, PostId};
pub use repository::PostRepository;
