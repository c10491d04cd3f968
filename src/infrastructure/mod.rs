//! Infrastructure layer - Hashing, token generation, storage and logging

pub mod account;
pub mod logging;
pub mod storage;
