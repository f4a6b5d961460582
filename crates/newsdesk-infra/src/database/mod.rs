//! Database access: pool, configuration, entities and repositories.

mod config;
mod connections;
mod error;
pub mod entity;
pub mod repo;

pub use config::{ConfigError, DatabaseConfig};
pub use connections::ConnectionPool;
pub use repo::{DbPostRepository, DbSubjectRegistry, DbUserRepository, DbVoteLedger};

#[cfg(test)]
mod tests;
