//! Storage infrastructure - repository implementations

mod in_memory;
pub mod migrations;
mod postgres;

pub use in_memory::InMemoryStore;
pub use migrations::{run_migrations, Migration, PostgresMigrator, MIGRATIONS};
pub use postgres::{PostgresConfig, PostgresStore};
