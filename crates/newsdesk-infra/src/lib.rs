//! # Newsdesk Infrastructure
//!
//! SeaORM implementations of the ports defined in `newsdesk-core`:
//! the post store, subject registry, vote ledger and user directory, plus
//! the connection pool and its configuration.

pub mod database;

pub use database::{
    ConfigError, ConnectionPool, DatabaseConfig, DbPostRepository, DbSubjectRegistry,
    DbUserRepository, DbVoteLedger,
};
