//! Audit store implementations

mod in_memory;
mod postgres;

pub use in_memory::InMemoryAuditStore;
pub use postgres::{PostgresAuditStore, PostgresConfig};
